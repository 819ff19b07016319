//! Error types for schema loading, validation and analysis.

use crate::hints::HintKind;
use std::fmt;
use thiserror::Error;

/// Error type for the XML schema loader.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Unknown element encountered.
    #[error("unknown element '{element}' in context '{context}'")]
    UnknownElement {
        /// Element name.
        element: String,
        /// Parent context.
        context: String,
    },

    /// Unknown hint name.
    #[error("unknown hint '{name}'")]
    UnknownHint {
        /// Hint name as written.
        name: String,
    },

    /// Invalid document structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an unknown element error.
    pub fn unknown_element(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownElement {
            element: element.into(),
            context: context.into(),
        }
    }
}

/// Illegal use of a hint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Hint that is never legal on a type declaration.
    #[error("illegal hint !{hint} on type declaration '{declaration}'")]
    IllegalTypeHint {
        /// Declaration name.
        declaration: String,
        /// Offending hint.
        hint: HintKind,
    },

    /// Inherited hint redeclared below the base type.
    #[error(
        "the hint !{hint} can only be used on base types, because it is inherited anyway: '{declaration}'"
    )]
    BaseTypeOnly {
        /// Declaration name.
        declaration: String,
        /// Offending hint.
        hint: HintKind,
    },

    /// Hint that is never legal on a field declaration.
    #[error("illegal hint !{hint} on field declaration '{declaration}.{field}'")]
    IllegalFieldHint {
        /// Declaring type name.
        declaration: String,
        /// Field name.
        field: String,
        /// Offending hint.
        hint: HintKind,
    },
}

impl ValidationError {
    /// Returns the offending hint kind.
    #[must_use]
    pub const fn hint(&self) -> HintKind {
        match self {
            Self::IllegalTypeHint { hint, .. }
            | Self::BaseTypeOnly { hint, .. }
            | Self::IllegalFieldHint { hint, .. } => *hint,
        }
    }

    /// Returns the name of the declaration the violation was found on.
    #[must_use]
    pub fn declaration(&self) -> &str {
        match self {
            Self::IllegalTypeHint { declaration, .. }
            | Self::BaseTypeOnly { declaration, .. }
            | Self::IllegalFieldHint { declaration, .. } => declaration,
        }
    }
}

/// Every hint violation found in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    /// Wraps a list of violations.
    #[must_use]
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Returns the violations in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if there are no violations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} illegal hint usage(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Structural corruption of the schema model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaIntegrityError {
    /// The super-type chain loops back on itself.
    #[error("cyclic super type chain: {path}")]
    CyclicSuperType {
        /// Names along the chain, ending with the repeated declaration.
        path: String,
    },

    /// A declaration was reached twice while computing subtypes.
    #[error("declaration '{declaration}' reached twice while collecting subtypes of '{root}'")]
    RevisitedSubtype {
        /// Declaration whose subtypes were collected.
        root: String,
        /// Declaration that was reached again.
        declaration: String,
    },

    /// A declaration id does not belong to the schema.
    #[error("declaration id #{index} does not exist")]
    DanglingDeclaration {
        /// Offending index.
        index: usize,
    },

    /// Two declarations share a name.
    #[error("duplicate type declaration '{name}'")]
    DuplicateDeclaration {
        /// Duplicated name.
        name: String,
    },

    /// A declaration uses a built-in type name.
    #[error("'{name}' is a built-in type and cannot be declared")]
    ReservedName {
        /// Reserved name.
        name: String,
    },

    /// A super type name does not resolve to a declaration.
    #[error("declaration '{declaration}' extends unknown type '{super_type}'")]
    UnknownSuperType {
        /// Declaring type name.
        declaration: String,
        /// Unresolved super type name.
        super_type: String,
    },
}

/// A field type that cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeMappingError {
    /// The spelling does not follow the type grammar.
    #[error("malformed type '{spelling}': {reason}")]
    Malformed {
        /// Full type text.
        spelling: String,
        /// What went wrong.
        reason: String,
    },

    /// A name is neither a primitive nor a declared type.
    #[error("unknown type '{spelling}'")]
    UnknownType {
        /// Unresolved name.
        spelling: String,
    },

    /// A reference points outside the schema.
    #[error("type reference to missing declaration #{index}")]
    DanglingReference {
        /// Offending declaration index.
        index: usize,
    },
}

/// Error type for building or loading a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Structural error.
    #[error("schema integrity error: {0}")]
    Integrity(#[from] SchemaIntegrityError),

    /// Field type error.
    #[error("in field '{declaration}.{field}': {source}")]
    FieldType {
        /// Declaring type name.
        declaration: String,
        /// Field name.
        field: String,
        /// Underlying error.
        #[source]
        source: TypeMappingError,
    },
}
