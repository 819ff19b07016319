//! Error types for code generation.

use crate::target::TargetLanguage;
use ironbind_schema::{SchemaError, SchemaIntegrityError, TypeMappingError, ValidationErrors};
use std::path::PathBuf;
use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Schema loading error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Corrupt inheritance structure.
    #[error("schema integrity error: {0}")]
    Integrity(#[from] SchemaIntegrityError),

    /// Illegal hint usage; holds every violation in the schema.
    #[error("schema validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// A field type could not be mapped to the target language.
    #[error("cannot map field '{declaration}.{field}': {source}")]
    TypeMapping {
        /// Declaring type name.
        declaration: String,
        /// Field name.
        field: String,
        /// Underlying error.
        #[source]
        source: TypeMappingError,
    },

    /// Two declarations would produce the same file or type name.
    #[error("declarations '{first}' and '{second}' both generate '{name}'")]
    NameCollision {
        /// Generated name.
        name: String,
        /// Declaration that claimed the name first.
        first: String,
        /// Declaration that claimed it again.
        second: String,
    },

    /// Two members of one unit would share an identifier.
    #[error("'{declaration}' generates '{name}' for both {first} and {second}")]
    MemberCollision {
        /// Declaration name.
        declaration: String,
        /// Generated identifier.
        name: String,
        /// Origin of the first use.
        first: String,
        /// Origin of the second use.
        second: String,
    },

    /// The prefix cannot start identifiers of the target language.
    #[error("prefix '{prefix}' is not valid for {target}: {reason}")]
    InvalidPrefix {
        /// Configured prefix.
        prefix: String,
        /// Target language.
        target: TargetLanguage,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The output location cannot be used.
    #[error("invalid output path '{}': {message}", path.display())]
    Output {
        /// Offending path.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a type mapping error for a field.
    pub fn type_mapping(
        declaration: impl Into<String>,
        field: impl Into<String>,
        source: TypeMappingError,
    ) -> Self {
        Self::TypeMapping {
            declaration: declaration.into(),
            field: field.into(),
            source,
        }
    }

    /// Creates an output path error.
    pub fn output(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Output {
            path: path.into(),
            message: message.into(),
        }
    }
}
