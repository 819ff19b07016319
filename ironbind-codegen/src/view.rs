//! Render-ready views of declarations.
//!
//! A view holds everything a backend needs to emit one unit: collected
//! fields with their mapped types, subtype names and effective hints.
//! All schema reasoning happens here so backends only format text.

use crate::error::CodegenError;
use crate::mapper::{ReferenceMode, TypeMapper};
use ironbind_schema::order::sort_canonical;
use ironbind_schema::{
    DeclId, HintKind, HintSet, Schema, SchemaIntegrityError, Type, TypeMappingError,
    base_type, collect_owned_fields, transitive_subtypes,
};

/// Another declaration used by a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Schema name.
    pub name: String,
    /// Generated type name, including the prefix.
    pub ident: String,
}

/// Runtime type check of a reference field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceView {
    /// Generated type name of the referenced declaration.
    pub target: String,
    /// Schema names an assigned instance may have: the target and all of
    /// its transitive subtypes.
    pub allowed: Vec<String>,
}

/// A collected field of a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    /// Field name as declared.
    pub name: String,
    /// Name of the declaration the field is declared on.
    pub declared_in: String,
    /// Canonical schema spelling of the field type.
    pub spelling: String,
    /// Target type with references followed.
    pub value_type: String,
    /// Target type with references left as identity handles.
    pub raw_type: String,
    /// Whether the field holds a single reference or annotation.
    pub is_reference: bool,
    /// Present if the field holds a single reference to a declaration.
    pub reference: Option<ReferenceView>,
    /// Length to check on assignment, if the target type does not encode it.
    pub checked_length: Option<usize>,
    /// Largest fixed-length array stored inline in the field.
    pub inline_array_length: Option<usize>,
    /// Rendered hints, e.g. `!owner(a, b)`.
    pub hints: Vec<String>,
    /// Whether accessors are kept private.
    pub hidden: bool,
}

impl FieldView {
    /// Returns true if the field is declared on an ancestor of `decl`.
    #[must_use]
    pub fn is_inherited(&self, decl: &DeclarationView) -> bool {
        self.declared_in != decl.name
    }

    /// One-line description for generated comments, e.g.
    /// `boss: Person (from Employee) !hide`.
    #[must_use]
    pub fn describe(&self, decl: &DeclarationView) -> String {
        let mut doc = format!("{}: {}", self.name, self.spelling);
        if self.is_inherited(decl) {
            doc.push_str(&format!(" (from {})", self.declared_in));
        }
        for hint in &self.hints {
            doc.push(' ');
            doc.push_str(hint);
        }
        doc
    }
}

/// A declaration ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationView {
    /// Schema name.
    pub name: String,
    /// Generated type name, including the prefix.
    pub ident: String,
    /// Schema name of the super type.
    pub super_type: Option<String>,
    /// Schema name of the base type.
    pub base_type: String,
    /// Collected fields, ancestors first, without ignored fields.
    pub fields: Vec<FieldView>,
    /// Schema names of all transitive subtypes in canonical order.
    pub subtypes: Vec<String>,
    /// Rendered hints of the declaration.
    pub hints: Vec<String>,
    /// Whether instances are read-only, as inherited from the base type.
    pub read_only: bool,
    /// Other declarations used by field types, in canonical order.
    pub referenced: Vec<TypeRef>,
}

impl DeclarationView {
    /// Builds the view of a declaration.
    ///
    /// # Errors
    /// Returns `CodegenError::Integrity` for a corrupt hierarchy and
    /// `CodegenError::TypeMapping` for a field type the target cannot express.
    pub fn build(
        schema: &Schema,
        mapper: &TypeMapper<'_>,
        id: DeclId,
    ) -> Result<Self, CodegenError> {
        let decl = schema.declaration(id)?;
        let base = schema.declaration(base_type(schema, id)?)?;
        let super_type = match decl.super_type {
            Some(super_id) => Some(schema.declaration(super_id)?.name.clone()),
            None => None,
        };

        let mut fields = Vec::new();
        let mut references = Vec::new();
        for (owner, field) in collect_owned_fields(schema, id)? {
            if field.has_hint(HintKind::Ignore) {
                continue;
            }
            let owner = schema.declaration(owner)?;
            let mapping_error = |source: TypeMappingError| {
                CodegenError::type_mapping(&owner.name, &field.name, source)
            };

            field.ty.collect_references(&mut references);
            let reference = match &field.ty {
                Type::Reference(target) => Some(reference_view(schema, mapper, *target)?),
                _ => None,
            };
            let checked_length = if mapper.table().fixed_array_checked {
                None
            } else {
                field.ty.fixed_length()
            };

            fields.push(FieldView {
                name: field.name.clone(),
                declared_in: owner.name.clone(),
                spelling: schema.spell(&field.ty),
                value_type: mapper
                    .map_type(&field.ty, ReferenceMode::Follow)
                    .map_err(mapping_error)?,
                raw_type: mapper
                    .map_type(&field.ty, ReferenceMode::Leave)
                    .map_err(mapping_error)?,
                is_reference: field.ty.is_reference(),
                reference,
                checked_length,
                inline_array_length: field.ty.inline_array_length(),
                hints: render_hints(&field.hints),
                hidden: field.has_hint(HintKind::Hide),
            });
        }

        references.retain(|referenced| *referenced != id);
        sort_canonical(schema, &mut references);
        references.dedup();
        let referenced = references
            .into_iter()
            .map(|referenced| {
                Ok(TypeRef {
                    name: schema.declaration(referenced)?.name.clone(),
                    ident: type_ident(mapper, referenced)?,
                })
            })
            .collect::<Result<Vec<_>, CodegenError>>()?;

        let subtypes = transitive_subtypes(schema, id)?
            .into_iter()
            .map(|sub| schema.declaration(sub).map(|d| d.name.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: decl.name.clone(),
            ident: type_ident(mapper, id)?,
            super_type,
            base_type: base.name.clone(),
            fields,
            subtypes,
            hints: render_hints(&decl.hints),
            read_only: base.has_hint(HintKind::ReadOnly),
            referenced,
        })
    }

    /// Returns true if the declaration has no super type.
    #[must_use]
    pub fn is_base_type(&self) -> bool {
        self.super_type.is_none()
    }
}

fn reference_view(
    schema: &Schema,
    mapper: &TypeMapper<'_>,
    target: DeclId,
) -> Result<ReferenceView, CodegenError> {
    let decl = schema.declaration(target)?;
    let mut allowed = vec![decl.name.clone()];
    for sub in transitive_subtypes(schema, target)? {
        allowed.push(schema.declaration(sub)?.name.clone());
    }
    Ok(ReferenceView {
        target: type_ident(mapper, target)?,
        allowed,
    })
}

fn type_ident(mapper: &TypeMapper<'_>, id: DeclId) -> Result<String, CodegenError> {
    mapper.type_ident(id).map_err(|_| {
        SchemaIntegrityError::DanglingDeclaration { index: id.index() }.into()
    })
}

fn render_hints(hints: &HintSet) -> Vec<String> {
    hints.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::TargetLanguage;
    use ironbind_schema::{DeclarationSpec, FieldSpec, Hint, SchemaBuilder};

    fn schema() -> Schema {
        SchemaBuilder::new()
            .declaration(
                DeclarationSpec::new("Person")
                    .hint(Hint::ReadOnly)
                    .field(FieldSpec::new("name", "string"))
                    .field(FieldSpec::new("cache", "i64").hint(Hint::Ignore))
                    .field(FieldSpec::new("secret", "string").hint(Hint::Hide)),
            )
            .declaration(
                DeclarationSpec::new("Employee")
                    .extends("Person")
                    .field(FieldSpec::new("salary", "i32"))
                    .field(FieldSpec::new("boss", "Person"))
                    .field(FieldSpec::new("badge", "i8[4]")),
            )
            .declaration(DeclarationSpec::new("Manager").extends("Employee"))
            .build()
            .expect("Failed to build")
    }

    fn view(target: TargetLanguage, name: &str) -> DeclarationView {
        let schema = schema();
        let mapper = TypeMapper::new(&schema, target, "");
        DeclarationView::build(&schema, &mapper, schema.find(name).unwrap()).unwrap()
    }

    #[test]
    fn test_fields_are_collected_without_ignored() {
        let employee = view(TargetLanguage::Rust, "Employee");
        let names: Vec<&str> = employee.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["name", "secret", "salary", "boss", "badge"]);
        assert!(employee.fields[0].is_inherited(&employee));
        assert!(!employee.fields[2].is_inherited(&employee));
        assert!(employee.fields[1].hidden);
        assert_eq!(employee.fields[0].describe(&employee), "name: string (from Person)");
        assert_eq!(employee.fields[1].describe(&employee), "secret: string (from Person) !hide");
    }

    #[test]
    fn test_read_only_is_inherited_from_base_type() {
        let manager = view(TargetLanguage::Rust, "Manager");
        assert!(manager.read_only);
        assert_eq!(manager.base_type, "Person");
        assert_eq!(manager.super_type.as_deref(), Some("Employee"));
        assert!(manager.hints.is_empty());
    }

    #[test]
    fn test_reference_field_allows_subtypes() {
        let employee = view(TargetLanguage::Rust, "Employee");
        let boss = &employee.fields[3];
        assert_eq!(boss.value_type, "Option<Ptr<Person>>");
        assert_eq!(boss.raw_type, "ObjectId");
        assert!(boss.is_reference);
        let reference = boss.reference.as_ref().unwrap();
        assert_eq!(reference.target, "Person");
        assert_eq!(reference.allowed, ["Person", "Employee", "Manager"]);
        assert_eq!(employee.referenced.len(), 1);
        assert_eq!(employee.referenced[0].name, "Person");
    }

    #[test]
    fn test_subtypes_and_hints() {
        let person = view(TargetLanguage::Cpp, "Person");
        assert_eq!(person.subtypes, ["Employee", "Manager"]);
        assert_eq!(person.hints, ["!readOnly"]);
        assert!(person.is_base_type());
        assert!(person.referenced.is_empty());
    }

    #[test]
    fn test_checked_length_only_where_type_loses_it() {
        let rust = view(TargetLanguage::Rust, "Employee");
        assert_eq!(rust.fields[4].checked_length, None);
        assert_eq!(rust.fields[4].value_type, "[i8; 4]");

        let haskell = view(TargetLanguage::Haskell, "Employee");
        assert_eq!(haskell.fields[4].checked_length, Some(4));
        assert_eq!(haskell.fields[4].value_type, "[Int8]");
        assert_eq!(haskell.fields[4].spelling, "i8[4]");
    }
}
