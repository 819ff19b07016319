//! C++ code generation.
//!
//! Each declaration becomes one header holding a class derived from the
//! runtime `Object`, with every collected field stored as a private member.
//! Units include `runtime.h`, which provides `Object`, `ObjectId`, `Ref`,
//! `TypeError`, `idOf` and `isOneOf`.

use crate::backend::{Backend, Member, RenderOptions, quoted_list};
use crate::naming::{escape_cpp, to_camel_case, to_pascal_case};
use crate::target::TargetLanguage;
use crate::view::{DeclarationView, FieldView};

/// Backend emitting C++ headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CppBackend;

/// Shared instance of [`CppBackend`].
pub static CPP_BACKEND: CppBackend = CppBackend;

const STANDARD_HEADERS: [&str; 7] = [
    "array", "cstdint", "map", "optional", "set", "string", "vector",
];

fn member(field: &FieldView) -> String {
    format!("{}_", to_camel_case(&field.name))
}

fn parameter(field: &FieldView) -> String {
    escape_cpp(&to_camel_case(&field.name))
}

impl CppBackend {
    fn generate_header(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "// Generated by ironbind from type {}. Do not edit.\n",
            view.name
        ));
        if !view.hints.is_empty() {
            output.push_str(&format!("// Hints: {}\n", view.hints.join(" ")));
        }
        output.push_str("#pragma once\n\n");
        for header in STANDARD_HEADERS {
            output.push_str(&format!("#include <{header}>\n"));
        }
        output.push_str("\n#include \"runtime.h\"\n\n");

        for referenced in &view.referenced {
            output.push_str(&format!("class {};\n", referenced.ident));
        }
        if !view.referenced.is_empty() {
            output.push('\n');
        }

        output
    }

    fn generate_constants(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str("    /** Schema name of this type. */\n");
        output.push_str(&format!(
            "    static constexpr const char* TYPE_NAME = \"{}\";\n",
            view.name
        ));
        output.push_str("    /** Schema names of all subtypes. */\n");
        output.push_str(&format!(
            "    static constexpr std::array<const char*, {}> SUBTYPES = {{{}}};\n\n",
            view.subtypes.len(),
            quoted_list(&view.subtypes)
        ));

        output
    }

    fn generate_constructors(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str(&format!("    {}() = default;\n\n", view.ident));

        let mut params = vec!["ObjectId id".to_string()];
        params.extend(
            view.fields
                .iter()
                .map(|f| format!("{} {}", f.value_type, parameter(f))),
        );
        let mut inits = vec!["Object(id)".to_string()];
        inits.extend(
            view.fields
                .iter()
                .map(|f| format!("{}(std::move({}))", member(f), parameter(f))),
        );
        output.push_str("    /** Creates an instance with the given field values. */\n");
        output.push_str(&format!(
            "    explicit {}({})\n",
            view.ident,
            params.join(", ")
        ));
        output.push_str(&format!("        : {} {{}}\n\n", inits.join(", ")));

        output.push_str("    const char* typeName() const override { return TYPE_NAME; }\n\n");

        output
    }

    fn generate_accessors(view: &DeclarationView, field: &FieldView, safe: bool) -> String {
        let mut output = String::new();
        let pascal = to_pascal_case(&field.name);
        let member = member(field);

        output.push_str(&format!("    /** Returns {}. */\n", field.name));
        output.push_str(&format!(
            "    const {}& get{pascal}() const {{ return {member}; }}\n",
            field.value_type
        ));

        if field.is_reference {
            output.push_str(&format!(
                "    /** Returns the identity of the instance {} points to. */\n",
                field.name
            ));
            output.push_str(&format!(
                "    {} get{pascal}Id() const {{ return idOf({member}); }}\n",
                field.raw_type
            ));
        }

        if !view.read_only {
            output.push_str(&format!("    /** Sets {}. */\n", field.name));
            output.push_str(&format!(
                "    void set{pascal}({} value) {{\n",
                field.value_type
            ));
            match (&field.reference, field.checked_length, safe) {
                (Some(reference), _, true) => {
                    output.push_str(&format!(
                        "        if (value && !isOneOf(value->typeName(), {{{}}})) {{\n",
                        quoted_list(&reference.allowed)
                    ));
                    output.push_str(&format!(
                        "            throw TypeError(\"{}.{}\", value->typeName());\n",
                        view.name, field.name
                    ));
                    output.push_str("        }\n");
                }
                (None, Some(length), true) => {
                    output.push_str(&format!("        if (value.size() != {length}) {{\n"));
                    output.push_str(&format!(
                        "            throw LengthError(\"{}.{}\", {length}, value.size());\n",
                        view.name, field.name
                    ));
                    output.push_str("        }\n");
                }
                _ => {}
            }
            output.push_str(&format!("        {member} = std::move(value);\n"));
            output.push_str("    }\n");
        }
        output.push('\n');

        output
    }

    fn generate_class(view: &DeclarationView, safe: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!("/** Instance of {}.", view.name));
        if let Some(super_type) = &view.super_type {
            output.push_str(&format!(" Extends {super_type}."));
        }
        output.push_str(" */\n");
        output.push_str(&format!("class {} : public Object {{\n", view.ident));
        output.push_str("public:\n");
        output.push_str(&Self::generate_constants(view));
        output.push_str(&Self::generate_constructors(view));
        for field in view.fields.iter().filter(|f| !f.hidden) {
            output.push_str(&Self::generate_accessors(view, field, safe));
        }

        if view.fields.iter().any(|f| f.hidden) {
            output.push_str("protected:\n");
            for field in view.fields.iter().filter(|f| f.hidden) {
                output.push_str(&Self::generate_accessors(view, field, safe));
            }
        }

        output.push_str("private:\n");
        for field in &view.fields {
            let doc = field.describe(view);
            output.push_str(&format!(
                "    {} {}{{}}; // {doc}\n",
                field.value_type,
                member(field)
            ));
        }
        output.push_str("};\n");

        output
    }
}

impl Backend for CppBackend {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Cpp
    }

    fn file_name(&self, view: &DeclarationView, _options: &RenderOptions<'_>) -> String {
        format!("{}.{}", view.ident, self.target().extension())
    }

    fn members(&self, view: &DeclarationView, _options: &RenderOptions<'_>) -> Vec<Member> {
        let mut members = vec![
            Member::fixed("parameter", "id"),
            Member::fixed("class", "TYPE_NAME"),
            Member::fixed("class", "SUBTYPES"),
            Member::fixed("class", "typeName"),
        ];
        for field in &view.fields {
            let pascal = to_pascal_case(&field.name);
            members.push(Member::of_field("parameter", parameter(field), field));
            members.push(Member::of_field("class", member(field), field));
            members.push(Member::of_field("class", format!("get{pascal}"), field));
            if field.is_reference {
                members.push(Member::of_field("class", format!("get{pascal}Id"), field));
            }
            if !view.read_only {
                members.push(Member::of_field("class", format!("set{pascal}"), field));
            }
        }
        members
    }

    fn render(&self, view: &DeclarationView, options: &RenderOptions<'_>) -> String {
        let mut output = Self::generate_header(view);
        output.push_str(&Self::generate_class(view, options.safe));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TypeMapper;
    use crate::backend::find_clash;
    use ironbind_schema::{DeclId, DeclarationSpec, FieldSpec, Hint, Schema, SchemaBuilder};

    fn schema() -> Schema {
        SchemaBuilder::new()
            .declaration(
                DeclarationSpec::new("Person")
                    .field(FieldSpec::new("name", "string"))
                    .field(FieldSpec::new("scores", "map<string, f32>")),
            )
            .declaration(
                DeclarationSpec::new("Employee")
                    .extends("Person")
                    .field(FieldSpec::new("boss", "Person"))
                    .field(FieldSpec::new("badge", "i8[4]"))
                    .field(FieldSpec::new("pin", "i16").hint(Hint::Hide)),
            )
            .declaration(
                DeclarationSpec::new("Frozen")
                    .hint(Hint::ReadOnly)
                    .field(FieldSpec::new("value", "bool")),
            )
            .build()
            .expect("Failed to build")
    }

    fn render(name: &str, safe: bool) -> (String, String) {
        let schema = schema();
        let mapper = TypeMapper::new(&schema, TargetLanguage::Cpp, "");
        let view = DeclarationView::build(&schema, &mapper, schema.find(name).unwrap()).unwrap();
        let options = RenderOptions { safe, prefix: "" };
        (
            CPP_BACKEND.file_name(&view, &options),
            CPP_BACKEND.render(&view, &options),
        )
    }

    #[test]
    fn test_class_layout() {
        let (file, code) = render("Employee", true);
        assert_eq!(file, "Employee.h");
        assert!(code.contains("class Person;\n"));
        assert!(code.contains("class Employee : public Object {\n"));
        assert!(code.contains("    std::string name_{}; // name: string (from Person)\n"));
        assert!(code.contains("    std::map<std::string, float> scores_{};"));
        assert!(code.contains("    std::array<int8_t, 4> badge_{};"));
        assert!(code.contains("static constexpr const char* TYPE_NAME = \"Employee\";"));
        assert!(code.contains("static constexpr std::array<const char*, 0> SUBTYPES = {};"));
    }

    #[test]
    fn test_safe_reference_setter() {
        let (_, code) = render("Employee", true);
        assert!(code.contains("    void setBoss(std::optional<Ref<Person>> value) {\n"));
        assert!(code.contains("if (value && !isOneOf(value->typeName(), {\"Person\", \"Employee\"})) {"));
        assert!(code.contains("throw TypeError(\"Employee.boss\", value->typeName());"));
        assert!(code.contains(
            "const std::optional<Ref<Person>>& getBoss() const { return boss_; }"
        ));
        assert!(code.contains("ObjectId getBossId() const { return idOf(boss_); }"));
        // std::array carries its length.
        assert!(!code.contains("LengthError"));
    }

    #[test]
    fn test_unsafe_setter() {
        let (_, code) = render("Employee", false);
        assert!(!code.contains("isOneOf"));
        assert!(code.contains("        boss_ = std::move(value);\n"));
    }

    #[test]
    fn test_hidden_accessors_are_protected() {
        let (_, code) = render("Employee", true);
        let protected = code.find("protected:").unwrap();
        let getter = code.find("getPin()").unwrap();
        assert!(getter > protected);
    }

    #[test]
    fn test_read_only() {
        let (_, code) = render("Frozen", true);
        assert!(code.contains("// Hints: !readOnly\n"));
        assert!(code.contains("const bool& getValue() const { return value_; }"));
        assert!(!code.contains("setValue"));
    }

    fn members_and_code(spec: DeclarationSpec) -> (Vec<Member>, String) {
        let schema = SchemaBuilder::new()
            .declaration(spec)
            .build()
            .expect("Failed to build");
        let mapper = TypeMapper::new(&schema, TargetLanguage::Cpp, "");
        let view = DeclarationView::build(&schema, &mapper, DeclId::new(0)).unwrap();
        let options = RenderOptions { safe: true, prefix: "" };
        (
            CPP_BACKEND.members(&view, &options),
            CPP_BACKEND.render(&view, &options),
        )
    }

    #[test]
    fn test_keyword_parameters_are_suffixed() {
        let (members, code) = members_and_code(
            DeclarationSpec::new("Shape")
                .field(FieldSpec::new("class", "string"))
                .field(FieldSpec::new("new", "bool")),
        );
        assert!(find_clash(&members).is_none());
        assert!(code.contains("    explicit Shape(ObjectId id, std::string class_, bool new_)\n"));
        assert!(code.contains(": Object(id), class_(std::move(class_)), new_(std::move(new_)) {}"));
        assert!(code.contains("const std::string& getClass() const { return class_; }"));
    }

    #[test]
    fn test_field_named_id_clashes_with_constructor() {
        let (members, _) = members_and_code(
            DeclarationSpec::new("Shape").field(FieldSpec::new("id", "i32")),
        );
        let (first, second) = find_clash(&members).unwrap();
        assert_eq!(first.scope, "parameter");
        assert_eq!(second.origin(), "field 'id'");
    }
}
