//! # IronBind
//!
//! Typed bindings generated from hinted XML schemas.
//!
//! A schema declares types with single inheritance, typed fields and hints
//! such as `!readOnly` or `!owner`. IronBind validates the hints, collects
//! inherited fields, computes subtype closures and emits one source unit
//! per type for Rust, Haskell or C++.
//!
//! ## Quick Start
//!
//! ```no_run
//! use ironbind::prelude::*;
//!
//! let xml = r#"<schema>
//!     <type name="Person"><field name="name" type="string"/></type>
//!     <type name="Employee" extends="Person"><field name="boss" type="Person"/></type>
//! </schema>"#;
//!
//! let config = GeneratorConfig::new("generated", TargetLanguage::Haskell).with_prefix("Sk");
//! let paths = generate_from_xml(xml, &config)?;
//! # Ok::<(), CodegenError>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Schema model, XML parsing, hint validation and hierarchy analysis
//! - [`codegen`] - Type mapping, backends and the generation driver

pub mod prelude;

/// Schema model, parsing and validation.
pub mod schema {
    pub use ironbind_schema::*;
}

/// Binding generation from schemas.
pub mod codegen {
    pub use ironbind_codegen::*;
}

// Re-export commonly used items at the crate root
pub use ironbind_codegen::{
    CodegenError, GeneratorConfig, TargetLanguage, generate, generate_from_file, generate_from_xml,
};
pub use ironbind_schema::{Schema, SchemaBuilder, parse_schema, parse_schema_file};
