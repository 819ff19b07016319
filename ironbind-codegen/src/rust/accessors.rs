//! Getter and setter generation.

use super::{field_ident, field_stem};
use crate::backend::quoted_list;
use crate::view::{DeclarationView, FieldView};

/// Generator for field accessors of one Rust struct.
pub struct AccessorGenerator<'a> {
    view: &'a DeclarationView,
    safe: bool,
}

impl<'a> AccessorGenerator<'a> {
    /// Creates a new accessor generator.
    #[must_use]
    pub fn new(view: &'a DeclarationView, safe: bool) -> Self {
        Self { view, safe }
    }

    /// Generates accessors for every field.
    ///
    /// Read-only types get getters only.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        for field in &self.view.fields {
            output.push_str(&self.generate_getter(field));
            if field.is_reference {
                output.push_str(&self.generate_raw_getter(field));
            }
            if !self.view.read_only {
                output.push_str(&self.generate_setter(field));
            }
        }

        output
    }

    fn visibility(field: &FieldView) -> &'static str {
        if field.hidden { "pub(crate)" } else { "pub" }
    }

    fn generate_getter(&self, field: &FieldView) -> String {
        let mut output = String::new();
        let name = field_ident(field);

        output.push_str(&format!("    /// Returns `{}`.\n", field.name));
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    {} fn {}(&self) -> &{} {{\n",
            Self::visibility(field),
            name,
            field.value_type
        ));
        output.push_str(&format!("        &self.{name}\n"));
        output.push_str("    }\n\n");

        output
    }

    /// Identity handle of a reference field, without following it.
    fn generate_raw_getter(&self, field: &FieldView) -> String {
        let mut output = String::new();
        let name = field_ident(field);
        let stem = field_stem(field);

        output.push_str(&format!(
            "    /// Returns the identity of the instance `{}` points to.\n",
            field.name
        ));
        output.push_str("    #[must_use]\n");
        output.push_str(&format!(
            "    {} fn {stem}_id(&self) -> {} {{\n",
            Self::visibility(field),
            field.raw_type
        ));
        output.push_str(&format!("        ObjectId::of(&self.{name})\n"));
        output.push_str("    }\n\n");

        output
    }

    fn generate_setter(&self, field: &FieldView) -> String {
        let mut output = String::new();
        let name = field_ident(field);
        let stem = field_stem(field);
        let visibility = Self::visibility(field);

        output.push_str(&format!("    /// Sets `{}`.\n", field.name));

        match (&field.reference, self.safe) {
            (Some(reference), true) => {
                output.push_str("    ///\n");
                output.push_str("    /// # Errors\n");
                output.push_str(&format!(
                    "    /// Returns `TypeError` if the instance is not a `{}` or one of its subtypes.\n",
                    reference.target
                ));
                output.push_str(&format!(
                    "    {visibility} fn set_{stem}(&mut self, value: {}) -> Result<(), TypeError> {{\n",
                    field.value_type
                ));
                output.push_str("        if let Some(target) = &value {\n");
                output.push_str(&format!(
                    "            const ALLOWED: &[&str] = &[{}];\n",
                    quoted_list(&reference.allowed)
                ));
                output.push_str("            if !ALLOWED.contains(&target.type_name()) {\n");
                output.push_str(&format!(
                    "                return Err(TypeError::new(\"{}.{}\", target.type_name()));\n",
                    self.view.name, field.name
                ));
                output.push_str("            }\n");
                output.push_str("        }\n");
                output.push_str(&format!("        self.{name} = value;\n"));
                output.push_str("        Ok(())\n");
            }
            _ => {
                output.push_str(&format!(
                    "    {visibility} fn set_{stem}(&mut self, value: {}) {{\n",
                    field.value_type
                ));
                output.push_str(&format!("        self.{name} = value;\n"));
            }
        }
        output.push_str("    }\n\n");

        output
    }
}
