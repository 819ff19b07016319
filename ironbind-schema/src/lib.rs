//! # IronBind Schema
//!
//! Schema model and analysis for the IronBind binding generator.
//!
//! This crate provides:
//! - Type declarations, fields and hints linked by [`DeclId`]
//! - XML schema loading and name-based construction via [`SchemaBuilder`]
//! - Hint validation
//! - Inheritance analysis: field collection and subtype closure
//! - Canonical declaration order for deterministic output

pub mod builder;
pub mod error;
pub mod hierarchy;
pub mod hints;
pub mod order;
pub mod parser;
pub mod schema;
pub mod spelling;
pub mod types;
pub mod validation;

pub use builder::{DeclarationSpec, FieldSpec, SchemaBuilder};
pub use error::{
    ParseError, SchemaError, SchemaIntegrityError, TypeMappingError, ValidationError,
    ValidationErrors,
};
pub use hierarchy::{
    base_type, check_hierarchy, collect_fields, collect_owned_fields, direct_subtypes,
    transitive_subtypes,
};
pub use hints::{Hint, HintKind, HintSet};
pub use order::canonical_order;
pub use parser::{parse_schema, parse_schema_file};
pub use schema::{Declaration, Field, Schema};
pub use spelling::TypeSpelling;
pub use types::{Container, ContainerShape, DeclId, PrimitiveKind, Type};
pub use validation::{validate_field_hints, validate_schema, validate_type_hints};
