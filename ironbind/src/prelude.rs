//! Prelude module for convenient imports.
//!
//! ```ignore
//! use ironbind::prelude::*;
//! ```

// Schema types
pub use ironbind_schema::{
    DeclId, Declaration, DeclarationSpec, Field, FieldSpec, Hint, HintSet, Schema, SchemaBuilder,
    SchemaError, Type, parse_schema, parse_schema_file,
};

// Analysis
pub use ironbind_schema::{
    canonical_order, collect_fields, transitive_subtypes, validate_schema,
};

// Generation
pub use ironbind_codegen::{
    Backend, CodegenError, DeclarationView, Generator, GeneratorConfig, ReferenceMode,
    TargetLanguage, TypeMapper, generate, generate_from_file, generate_from_xml,
};
