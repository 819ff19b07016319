//! Schema type to target type mapping.

use crate::naming::to_pascal_case;
use crate::table::TypeTable;
use crate::target::TargetLanguage;
use ironbind_schema::{Container, DeclId, Schema, Type, TypeMappingError, TypeSpelling};

/// How references to user declarations are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferenceMode {
    /// Optional handle that dereferences to the target's generated type.
    #[default]
    Follow,
    /// Opaque identity handle of the target language.
    Leave,
}

impl ReferenceMode {
    /// Returns true for [`ReferenceMode::Follow`].
    #[must_use]
    pub const fn is_follow(self) -> bool {
        matches!(self, Self::Follow)
    }

    /// Converts a follow flag into a mode.
    #[must_use]
    pub const fn from_follow(follow: bool) -> Self {
        if follow { Self::Follow } else { Self::Leave }
    }
}

/// Maps schema types to type spellings of one target language.
///
/// Mapping is pure: the same type always yields the same spelling.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    schema: &'a Schema,
    target: TargetLanguage,
    table: &'static TypeTable,
    prefix: &'a str,
}

impl<'a> TypeMapper<'a> {
    /// Creates a mapper for a schema and target.
    ///
    /// `prefix` is prepended to the generated type name of every declaration.
    #[must_use]
    pub fn new(schema: &'a Schema, target: TargetLanguage, prefix: &'a str) -> Self {
        Self {
            schema,
            target,
            table: target.type_table(),
            prefix,
        }
    }

    /// Returns the target language.
    #[must_use]
    pub const fn target(&self) -> TargetLanguage {
        self.target
    }

    /// Returns the type table in use.
    #[must_use]
    pub const fn table(&self) -> &'static TypeTable {
        self.table
    }

    /// Maps a schema type.
    ///
    /// # Errors
    /// Returns `TypeMappingError::DanglingReference` if a reference points
    /// outside the schema.
    pub fn map_type(&self, ty: &Type, mode: ReferenceMode) -> Result<String, TypeMappingError> {
        match ty {
            Type::Primitive(kind) => Ok(self.table.primitive(*kind).to_string()),
            Type::Reference(id) => {
                let ident = self.type_ident(*id)?;
                Ok(self.handle(&ident, mode))
            }
            Type::Annotation => Ok(self.handle(self.table.any_object, mode)),
            Type::Container(container) => self.map_container(container, mode),
        }
    }

    fn handle(&self, target: &str, mode: ReferenceMode) -> String {
        match mode {
            ReferenceMode::Follow => self.table.apply(self.table.optional_handle, &[target], None),
            ReferenceMode::Leave => self.table.raw_handle.to_string(),
        }
    }

    fn map_container(
        &self,
        container: &Container,
        mode: ReferenceMode,
    ) -> Result<String, TypeMappingError> {
        let (template, length) = match container {
            Container::List(_) => (self.table.list, None),
            Container::Set(_) => (self.table.set, None),
            Container::Map(_, _) => (self.table.map, None),
            Container::VarArray(_) => (self.table.var_array, None),
            Container::FixedArray(_, length) => (self.table.fixed_array, Some(*length)),
        };
        let args = container
            .element_types()
            .into_iter()
            .map(|elem| self.map_type(elem, mode))
            .collect::<Result<Vec<_>, _>>()?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        Ok(self.table.apply(template, &args, length))
    }

    /// Parses a textual type spelling and maps it.
    ///
    /// # Errors
    /// Returns `TypeMappingError::Malformed` or `TypeMappingError::UnknownType`
    /// naming the text if it is not a valid type of this schema.
    pub fn map_spelling(&self, text: &str, mode: ReferenceMode) -> Result<String, TypeMappingError> {
        let lookup = |name: &str| self.schema.find(name);
        let ty = TypeSpelling::parse(text)?.resolve(&lookup)?;
        self.map_type(&ty, mode)
    }

    /// Returns the generated type name of a declaration.
    ///
    /// # Errors
    /// Returns `TypeMappingError::DanglingReference` if `id` is not in the schema.
    pub fn type_ident(&self, id: DeclId) -> Result<String, TypeMappingError> {
        let decl = self
            .schema
            .get(id)
            .ok_or(TypeMappingError::DanglingReference { index: id.index() })?;
        Ok(format!("{}{}", self.prefix, to_pascal_case(&decl.name)))
    }
}
