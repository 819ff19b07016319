//! Name-based schema construction.
//!
//! Loaders describe declarations with names and type spellings; the builder
//! checks names, resolves super types and field types, and produces an
//! index-linked [`Schema`].

use crate::error::{SchemaError, SchemaIntegrityError};
use crate::hints::Hint;
use crate::schema::{Declaration, Field, Schema};
use crate::spelling::{ANNOTATION, CONTAINER_NAMES, TypeSpelling};
use crate::types::{DeclId, PrimitiveKind};
use std::collections::HashMap;

/// Field described by name and type spelling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name.
    pub name: String,
    /// Type spelling, e.g. `list<Person>`.
    pub spelling: String,
    /// Field hints.
    pub hints: Vec<Hint>,
}

impl FieldSpec {
    /// Creates a field spec.
    #[must_use]
    pub fn new(name: impl Into<String>, spelling: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spelling: spelling.into(),
            hints: Vec::new(),
        }
    }

    /// Adds a hint.
    #[must_use]
    pub fn hint(mut self, hint: Hint) -> Self {
        self.hints.push(hint);
        self
    }
}

/// Declaration described by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSpec {
    /// Type name.
    pub name: String,
    /// Super type name.
    pub super_type: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldSpec>,
    /// Declaration hints.
    pub hints: Vec<Hint>,
}

impl DeclarationSpec {
    /// Creates a declaration spec for a base type.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_type: None,
            fields: Vec::new(),
            hints: Vec::new(),
        }
    }

    /// Sets the super type name.
    #[must_use]
    pub fn extends(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a hint.
    #[must_use]
    pub fn hint(mut self, hint: Hint) -> Self {
        self.hints.push(hint);
        self
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    declarations: Vec<DeclarationSpec>,
}

impl SchemaBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declaration.
    #[must_use]
    pub fn declaration(mut self, declaration: DeclarationSpec) -> Self {
        self.push(declaration);
        self
    }

    /// Adds a declaration in place.
    pub fn push(&mut self, declaration: DeclarationSpec) {
        self.declarations.push(declaration);
    }

    /// Builds the schema.
    ///
    /// Declarations keep the order in which they were added. Super types
    /// and field types may refer to declarations added later.
    ///
    /// # Errors
    /// Returns `SchemaError::Integrity` for duplicate or reserved names and
    /// unknown super types, and `SchemaError::FieldType` for a field type
    /// spelling that is malformed or names an unknown type.
    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut index: HashMap<&str, DeclId> = HashMap::with_capacity(self.declarations.len());
        for (i, spec) in self.declarations.iter().enumerate() {
            if is_reserved(&spec.name) {
                return Err(SchemaIntegrityError::ReservedName {
                    name: spec.name.clone(),
                }
                .into());
            }
            if index.insert(spec.name.as_str(), DeclId::new(i)).is_some() {
                return Err(SchemaIntegrityError::DuplicateDeclaration {
                    name: spec.name.clone(),
                }
                .into());
            }
        }

        let lookup = |name: &str| index.get(name).copied();
        let mut declarations = Vec::with_capacity(self.declarations.len());

        for spec in &self.declarations {
            let mut decl = Declaration::new(spec.name.clone());
            if let Some(super_name) = &spec.super_type {
                let super_id =
                    lookup(super_name).ok_or_else(|| SchemaIntegrityError::UnknownSuperType {
                        declaration: spec.name.clone(),
                        super_type: super_name.clone(),
                    })?;
                decl = decl.extends(super_id);
            }
            for hint in &spec.hints {
                decl.hints.insert(hint.clone());
            }
            for field_spec in &spec.fields {
                let ty = TypeSpelling::parse(&field_spec.spelling)
                    .and_then(|spelling| spelling.resolve(&lookup))
                    .map_err(|source| SchemaError::FieldType {
                        declaration: spec.name.clone(),
                        field: field_spec.name.clone(),
                        source,
                    })?;
                let mut field = Field::new(field_spec.name.clone(), ty);
                for hint in &field_spec.hints {
                    field.hints.insert(hint.clone());
                }
                decl.fields.push(field);
            }
            declarations.push(decl);
        }

        Ok(Schema::from_declarations(declarations))
    }
}

/// Returns true for names that always denote built-in types.
fn is_reserved(name: &str) -> bool {
    PrimitiveKind::from_name(name).is_some()
        || name.eq_ignore_ascii_case(ANNOTATION)
        || CONTAINER_NAMES
            .iter()
            .any(|container| name.eq_ignore_ascii_case(container))
}
