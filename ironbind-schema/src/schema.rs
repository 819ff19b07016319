//! The schema model: declarations, their fields and hints.
//!
//! A [`Schema`] owns every [`Declaration`]; declarations refer to each
//! other (super types, field references) through [`DeclId`] indices, so
//! the model has no ownership cycles and is immutable once built.

use crate::error::SchemaIntegrityError;
use crate::hints::{Hint, HintKind, HintSet};
use crate::spelling::TypeSpelling;
use crate::types::{DeclId, Type};

/// A field declared directly on a type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: Type,
    /// Hints attached to the field.
    pub hints: HintSet,
}

impl Field {
    /// Creates a field without hints.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            hints: HintSet::new(),
        }
    }

    /// Adds a hint to the field.
    #[must_use]
    pub fn with_hint(mut self, hint: Hint) -> Self {
        self.hints.insert(hint);
        self
    }

    /// Returns true if the field carries a hint of the given kind.
    #[must_use]
    pub fn has_hint(&self, kind: HintKind) -> bool {
        self.hints.contains(kind)
    }
}

/// A user type declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Type name.
    pub name: String,
    /// Direct super type, if any.
    pub super_type: Option<DeclId>,
    /// Fields declared directly on this type, in declaration order.
    pub fields: Vec<Field>,
    /// Hints attached to the declaration.
    pub hints: HintSet,
}

impl Declaration {
    /// Creates a base type declaration without fields or hints.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            super_type: None,
            fields: Vec::new(),
            hints: HintSet::new(),
        }
    }

    /// Sets the direct super type.
    #[must_use]
    pub fn extends(mut self, super_type: DeclId) -> Self {
        self.super_type = Some(super_type);
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a hint to the declaration.
    #[must_use]
    pub fn with_hint(mut self, hint: Hint) -> Self {
        self.hints.insert(hint);
        self
    }

    /// Returns true if this declaration has no super type.
    #[must_use]
    pub const fn is_base_type(&self) -> bool {
        self.super_type.is_none()
    }

    /// Returns true if the declaration carries a hint of the given kind.
    #[must_use]
    pub fn has_hint(&self, kind: HintKind) -> bool {
        self.hints.contains(kind)
    }
}

/// Complete, immutable schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    declarations: Vec<Declaration>,
}

impl Schema {
    /// Wraps declarations exactly as supplied.
    ///
    /// No checks are performed; run
    /// [`check_hierarchy`](crate::hierarchy::check_hierarchy) before
    /// analysing a schema obtained this way. Use
    /// [`SchemaBuilder`](crate::builder::SchemaBuilder) to build from names.
    #[must_use]
    pub fn from_declarations(declarations: Vec<Declaration>) -> Self {
        Self { declarations }
    }

    /// Returns all declarations in discovery order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Iterates over all declaration ids in discovery order.
    pub fn ids(&self) -> impl Iterator<Item = DeclId> + '_ {
        (0..self.declarations.len()).map(DeclId::new)
    }

    /// Looks up a declaration by id.
    #[must_use]
    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.index())
    }

    /// Looks up a declaration by id, treating a missing one as corruption.
    ///
    /// # Errors
    /// Returns `SchemaIntegrityError::DanglingDeclaration` if `id` is out of range.
    pub fn declaration(&self, id: DeclId) -> Result<&Declaration, SchemaIntegrityError> {
        self.get(id)
            .ok_or(SchemaIntegrityError::DanglingDeclaration { index: id.index() })
    }

    /// Finds a declaration by exact name.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<DeclId> {
        self.declarations
            .iter()
            .position(|decl| decl.name == name)
            .map(DeclId::new)
    }

    /// Returns the number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if the schema has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Returns the canonical spelling of a field type.
    #[must_use]
    pub fn spell(&self, ty: &Type) -> String {
        let name_of = |id: DeclId| self.get(id).map(|decl| decl.name.clone());
        TypeSpelling::of_type(ty, &name_of).to_string()
    }
}
