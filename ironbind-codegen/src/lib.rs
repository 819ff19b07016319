//! # IronBind Codegen
//!
//! Binding generation from IronBind schemas.
//!
//! This crate provides:
//! - Type mapping from schema types to Rust, Haskell and C++ types
//! - Per-declaration views with inherited fields and subtype closures
//! - Backends rendering one source unit per declaration
//! - A generation driver with all-or-nothing output

pub mod backend;
pub mod cpp;
pub mod error;
pub mod generator;
pub mod haskell;
pub mod mapper;
pub mod naming;
pub mod rust;
pub mod table;
pub mod target;
pub mod view;

pub use backend::{Backend, RenderOptions, backend_for};
pub use error::CodegenError;
pub use generator::{GeneratedUnit, Generator, GeneratorConfig};
pub use mapper::{ReferenceMode, TypeMapper};
pub use table::TypeTable;
pub use target::{ParseTargetError, TargetLanguage};
pub use view::{DeclarationView, FieldView};

use ironbind_schema::Schema;
use std::path::PathBuf;

/// Generates bindings for a schema.
///
/// # Arguments
/// * `schema` - Schema to generate bindings for
/// * `config` - Output location, target and options
///
/// # Returns
/// Paths of the written files in canonical order.
///
/// # Errors
/// Returns `CodegenError` if validation, mapping or writing fails. Nothing
/// is written unless every unit was rendered.
pub fn generate(schema: &Schema, config: &GeneratorConfig) -> Result<Vec<PathBuf>, CodegenError> {
    Generator::new(schema, config).generate()
}

/// Generates bindings from an XML schema string.
///
/// # Arguments
/// * `xml` - XML schema content
/// * `config` - Output location, target and options
///
/// # Errors
/// Returns `CodegenError` if parsing or generation fails.
pub fn generate_from_xml(xml: &str, config: &GeneratorConfig) -> Result<Vec<PathBuf>, CodegenError> {
    let schema = ironbind_schema::parse_schema(xml)?;
    generate(&schema, config)
}

/// Generates bindings from an XML schema file.
///
/// # Arguments
/// * `path` - Path to the XML schema file
/// * `config` - Output location, target and options
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(
    path: &std::path::Path,
    config: &GeneratorConfig,
) -> Result<Vec<PathBuf>, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml(&xml, config)
}
