//! Rust code generation.
//!
//! Each declaration becomes one module holding a struct with every
//! collected field, its accessors and an `Object` implementation. Units
//! import the runtime types `Object`, `ObjectId`, `Ptr` and `TypeError`
//! from the `ironbind_runtime` crate.

pub mod accessors;

pub use accessors::AccessorGenerator;

use crate::backend::{Backend, Member, RenderOptions, quoted_list};
use crate::naming::{escape_rust, to_snake_case};
use crate::target::TargetLanguage;
use crate::view::{DeclarationView, FieldView};

/// Largest array length the standard library implements `Default` for.
const MAX_DEFAULT_ARRAY: usize = 32;

/// Snake-case stem of a field, used to derive accessor names.
pub(crate) fn field_stem(field: &FieldView) -> String {
    to_snake_case(&field.name)
}

/// Identifier of a field's struct member, getter and constructor parameter.
pub(crate) fn field_ident(field: &FieldView) -> String {
    escape_rust(&field_stem(field))
}

/// Backend emitting Rust modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustBackend;

/// Shared instance of [`RustBackend`].
pub static RUST_BACKEND: RustBackend = RustBackend;

impl RustBackend {
    fn module_name(name: &str, prefix: &str) -> String {
        format!("{prefix}{}", to_snake_case(name))
    }

    /// Generates the header comment and imports.
    fn generate_header(view: &DeclarationView, options: &RenderOptions<'_>) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "//! Generated by ironbind from type `{}`. Do not edit.\n",
            view.name
        ));
        if !view.hints.is_empty() {
            output.push_str("//!\n");
            output.push_str(&format!("//! Hints: {}\n", view.hints.join(" ")));
        }
        output.push('\n');

        let uses_map = view.fields.iter().any(|f| f.value_type.contains("HashMap<"));
        let uses_set = view.fields.iter().any(|f| f.value_type.contains("HashSet<"));
        match (uses_map, uses_set) {
            (true, true) => output.push_str("use std::collections::{HashMap, HashSet};\n"),
            (true, false) => output.push_str("use std::collections::HashMap;\n"),
            (false, true) => output.push_str("use std::collections::HashSet;\n"),
            (false, false) => {}
        }
        output.push_str("#[allow(unused_imports)]\n");
        output.push_str("use ironbind_runtime::{Object, ObjectId, Ptr, TypeError};\n");
        for referenced in &view.referenced {
            output.push_str(&format!(
                "use super::{}::{};\n",
                escape_rust(&Self::module_name(&referenced.name, options.prefix)),
                referenced.ident
            ));
        }
        output.push('\n');

        output
    }

    /// Generates the struct definition.
    fn generate_struct(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str(&format!("/// Instance of `{}`.\n", view.name));
        if let Some(super_type) = &view.super_type {
            output.push_str("///\n");
            output.push_str(&format!("/// Extends `{super_type}`.\n"));
        }
        let defaultable = view
            .fields
            .iter()
            .all(|f| f.inline_array_length.is_none_or(|n| n <= MAX_DEFAULT_ARRAY));
        if defaultable {
            output.push_str("#[derive(Debug, Clone, Default)]\n");
        } else {
            output.push_str("#[derive(Debug, Clone)]\n");
        }
        output.push_str(&format!("pub struct {} {{\n", view.ident));
        output.push_str("    id: ObjectId,\n");
        for field in &view.fields {
            output.push_str(&format!("    /// {}\n", field.describe(view)));
            output.push_str(&format!(
                "    {}: {},\n",
                field_ident(field),
                field.value_type
            ));
        }
        output.push_str("}\n\n");

        output
    }

    /// Generates the constants and the constructor.
    fn generate_constructor(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str("    /// Schema name of this type.\n");
        output.push_str(&format!(
            "    pub const TYPE_NAME: &'static str = \"{}\";\n",
            view.name
        ));
        output.push_str("    /// Schema names of all subtypes.\n");
        output.push_str(&format!(
            "    pub const SUBTYPES: &'static [&'static str] = &[{}];\n\n",
            quoted_list(&view.subtypes)
        ));

        let params: Vec<String> = view
            .fields
            .iter()
            .map(|f| format!("{}: {}", field_ident(f), f.value_type))
            .collect();
        let names: Vec<String> = view.fields.iter().map(field_ident).collect();

        output.push_str("    /// Creates an instance with the given field values.\n");
        if view.fields.len() >= 7 {
            output.push_str("    #[allow(clippy::too_many_arguments)]\n");
        }
        output.push_str("    #[must_use]\n");
        if params.is_empty() {
            output.push_str("    pub fn new(id: ObjectId) -> Self {\n");
            output.push_str("        Self { id }\n");
        } else {
            output.push_str(&format!(
                "    pub fn new(id: ObjectId, {}) -> Self {{\n",
                params.join(", ")
            ));
            output.push_str(&format!("        Self {{ id, {} }}\n", names.join(", ")));
        }
        output.push_str("    }\n\n");

        output
    }

    /// Generates the `Object` implementation.
    fn generate_object_impl(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str(&format!("impl Object for {} {{\n", view.ident));
        output.push_str("    fn type_name(&self) -> &'static str {\n");
        output.push_str("        Self::TYPE_NAME\n");
        output.push_str("    }\n\n");
        output.push_str("    fn id(&self) -> ObjectId {\n");
        output.push_str("        self.id\n");
        output.push_str("    }\n");
        output.push_str("}\n");

        output
    }
}

impl Backend for RustBackend {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Rust
    }

    fn file_name(&self, view: &DeclarationView, options: &RenderOptions<'_>) -> String {
        format!(
            "{}.{}",
            Self::module_name(&view.name, options.prefix),
            self.target().extension()
        )
    }

    fn members(&self, view: &DeclarationView, _options: &RenderOptions<'_>) -> Vec<Member> {
        let mut members = vec![
            Member::fixed("field", "id"),
            Member::fixed("fn", "new"),
            Member::fixed("fn", "TYPE_NAME"),
            Member::fixed("fn", "SUBTYPES"),
        ];
        for field in &view.fields {
            let stem = field_stem(field);
            members.push(Member::of_field("field", field_ident(field), field));
            members.push(Member::of_field("fn", field_ident(field), field));
            if field.is_reference {
                members.push(Member::of_field("fn", format!("{stem}_id"), field));
            }
            if !view.read_only {
                members.push(Member::of_field("fn", format!("set_{stem}"), field));
            }
        }
        members
    }

    fn render(&self, view: &DeclarationView, options: &RenderOptions<'_>) -> String {
        let mut output = Self::generate_header(view, options);
        output.push_str(&Self::generate_struct(view));

        output.push_str(&format!("impl {} {{\n", view.ident));
        output.push_str(&Self::generate_constructor(view));
        output.push_str(&AccessorGenerator::new(view, options.safe).generate());
        output.push_str("}\n\n");

        output.push_str(&Self::generate_object_impl(view));
        output
    }
}
