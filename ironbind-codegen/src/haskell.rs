//! Haskell code generation.
//!
//! Each declaration becomes one module holding a record with every
//! collected field, a constructor function and accessor functions.
//! Setters return an updated record; in safe mode checked setters return
//! `Either TypeError`. Units import `Pointer`, `Ref`, `TypeError`, `refOf`
//! and `typeNameOf` from the `Runtime` module.

use crate::backend::{Backend, Member, RenderOptions, quoted_list};
use crate::naming::{to_camel_case, to_pascal_case};
use crate::target::TargetLanguage;
use crate::view::{DeclarationView, FieldView};

/// Backend emitting Haskell modules.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaskellBackend;

/// Shared instance of [`HaskellBackend`].
pub static HASKELL_BACKEND: HaskellBackend = HaskellBackend;

/// Name of a record selector, e.g. `employeeSalary`.
fn selector(view: &DeclarationView, field: &FieldView) -> String {
    format!("{}{}", to_camel_case(&view.ident), to_pascal_case(&field.name))
}

/// Name of the record selector holding the instance identity.
fn ref_selector(view: &DeclarationView) -> String {
    format!("{}Ref", to_camel_case(&view.ident))
}

fn getter(field: &FieldView) -> String {
    format!("get{}", to_pascal_case(&field.name))
}

fn setter(field: &FieldView) -> String {
    format!("set{}", to_pascal_case(&field.name))
}

fn raw_getter(field: &FieldView) -> String {
    format!("get{}Ref", to_pascal_case(&field.name))
}

fn constructor(view: &DeclarationView) -> String {
    format!("new{}", view.ident)
}

/// Returns true if the setter of a field can fail.
fn is_checked(field: &FieldView, safe: bool) -> bool {
    safe && (field.reference.is_some() || field.checked_length.is_some())
}

impl HaskellBackend {
    fn generate_header(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "-- | Generated by ironbind from type {}. Do not edit.\n",
            view.name
        ));
        if !view.hints.is_empty() {
            output.push_str("--\n");
            output.push_str(&format!("-- Hints: {}\n", view.hints.join(" ")));
        }

        let mut exports = vec![
            view.ident.clone(),
            constructor(view),
            "typeName".to_string(),
            "subtypes".to_string(),
        ];
        for field in view.fields.iter().filter(|f| !f.hidden) {
            exports.push(getter(field));
            if field.is_reference {
                exports.push(raw_getter(field));
            }
            if !view.read_only {
                exports.push(setter(field));
            }
        }
        output.push_str(&format!("module {}\n", view.ident));
        for (i, export) in exports.iter().enumerate() {
            let lead = if i == 0 { '(' } else { ',' };
            output.push_str(&format!("  {lead} {export}\n"));
        }
        output.push_str("  ) where\n\n");

        output.push_str("import Data.Int (Int8, Int16, Int32, Int64)\n");
        output.push_str("import qualified Data.Map as M\n");
        output.push_str("import Runtime (Pointer, Ref, TypeError (..), refOf, typeNameOf)\n");
        for referenced in &view.referenced {
            output.push_str(&format!(
                "import {ident} ({ident})\n",
                ident = referenced.ident
            ));
        }
        output.push('\n');

        output
    }

    fn generate_record(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str(&format!("-- | Instance of {}.\n", view.name));
        if let Some(super_type) = &view.super_type {
            output.push_str("--\n");
            output.push_str(&format!("-- Extends {super_type}.\n"));
        }
        output.push_str(&format!("data {ident} = {ident}\n", ident = view.ident));
        output.push_str(&format!("  {{ {} :: Ref\n", ref_selector(view)));
        for field in &view.fields {
            let doc = field.describe(view);
            output.push_str(&format!(
                "  , {} :: {} -- ^ {doc}\n",
                selector(view, field),
                field.value_type
            ));
        }
        output.push_str("  }\n\n");

        output
    }

    fn generate_constants(view: &DeclarationView) -> String {
        let mut output = String::new();

        output.push_str("-- | Schema name of this type.\n");
        output.push_str("typeName :: String\n");
        output.push_str(&format!("typeName = \"{}\"\n\n", view.name));
        output.push_str("-- | Schema names of all subtypes.\n");
        output.push_str("subtypes :: [String]\n");
        output.push_str(&format!("subtypes = [{}]\n\n", quoted_list(&view.subtypes)));

        let mut signature = vec!["Ref".to_string()];
        signature.extend(view.fields.iter().map(|f| f.value_type.clone()));
        signature.push(view.ident.clone());
        output.push_str("-- | Creates an instance with the given field values.\n");
        output.push_str(&format!(
            "{} :: {}\n",
            constructor(view),
            signature.join(" -> ")
        ));
        output.push_str(&format!("{} = {}\n\n", constructor(view), view.ident));

        output
    }

    fn generate_accessors(view: &DeclarationView, safe: bool) -> String {
        let mut output = String::new();

        for field in &view.fields {
            let selector = selector(view, field);

            output.push_str(&format!(
                "{} :: {} -> {}\n",
                getter(field),
                view.ident,
                field.value_type
            ));
            output.push_str(&format!("{} = {selector}\n\n", getter(field)));

            if field.is_reference {
                output.push_str(&format!(
                    "{} :: {} -> {}\n",
                    raw_getter(field),
                    view.ident,
                    field.raw_type
                ));
                output.push_str(&format!("{} = refOf . {selector}\n\n", raw_getter(field)));
            }

            if view.read_only {
                continue;
            }

            let value_type = &field.value_type;
            let location = format!("\"{}.{}\"", view.name, field.name);
            if !is_checked(field, safe) {
                output.push_str(&format!(
                    "{} :: {value_type} -> {ident} -> {ident}\n",
                    setter(field),
                    ident = view.ident
                ));
                output.push_str(&format!(
                    "{} v x = x {{ {selector} = v }}\n\n",
                    setter(field)
                ));
                continue;
            }

            output.push_str(&format!(
                "{} :: {value_type} -> {ident} -> Either TypeError {ident}\n",
                setter(field),
                ident = view.ident
            ));
            if let Some(reference) = &field.reference {
                output.push_str(&format!("{} v x = case v of\n", setter(field)));
                output.push_str(&format!(
                    "  Just target | typeNameOf target `notElem` [{}] ->\n",
                    quoted_list(&reference.allowed)
                ));
                output.push_str(&format!(
                    "    Left (TypeError {location} (typeNameOf target))\n"
                ));
                output.push_str(&format!("  _ -> Right x {{ {selector} = v }}\n\n"));
            } else if let Some(length) = field.checked_length {
                output.push_str(&format!("{} v x\n", setter(field)));
                output.push_str(&format!(
                    "  | length v /= {length} = Left (LengthError {location} {length} (length v))\n"
                ));
                output.push_str(&format!("  | otherwise = Right x {{ {selector} = v }}\n\n"));
            }
        }

        output
    }
}

impl Backend for HaskellBackend {
    fn target(&self) -> TargetLanguage {
        TargetLanguage::Haskell
    }

    fn file_name(&self, view: &DeclarationView, _options: &RenderOptions<'_>) -> String {
        format!("{}.{}", view.ident, self.target().extension())
    }

    fn members(&self, view: &DeclarationView, _options: &RenderOptions<'_>) -> Vec<Member> {
        let mut members = vec![
            Member::fixed("module", ref_selector(view)),
            Member::fixed("module", constructor(view)),
            Member::fixed("module", "typeName"),
            Member::fixed("module", "subtypes"),
        ];
        for field in &view.fields {
            members.push(Member::of_field("module", selector(view, field), field));
            members.push(Member::of_field("module", getter(field), field));
            if field.is_reference {
                members.push(Member::of_field("module", raw_getter(field), field));
            }
            if !view.read_only {
                members.push(Member::of_field("module", setter(field), field));
            }
        }
        members
    }

    fn render(&self, view: &DeclarationView, options: &RenderOptions<'_>) -> String {
        let mut output = Self::generate_header(view);
        output.push_str(&Self::generate_record(view));
        output.push_str(&Self::generate_constants(view));
        output.push_str(&Self::generate_accessors(view, options.safe));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::TypeMapper;
    use crate::backend::find_clash;
    use ironbind_schema::{DeclarationSpec, FieldSpec, Hint, Schema, SchemaBuilder};

    fn schema() -> Schema {
        SchemaBuilder::new()
            .declaration(
                DeclarationSpec::new("Person")
                    .field(FieldSpec::new("name", "string"))
                    .field(FieldSpec::new("friends", "map<string, Person>")),
            )
            .declaration(
                DeclarationSpec::new("Employee")
                    .extends("Person")
                    .field(FieldSpec::new("salary", "i32"))
                    .field(FieldSpec::new("boss", "Person"))
                    .field(FieldSpec::new("badge", "i8[4]"))
                    .field(FieldSpec::new("pin", "i16").hint(Hint::Hide)),
            )
            .declaration(
                DeclarationSpec::new("Frozen")
                    .hint(Hint::ReadOnly)
                    .field(FieldSpec::new("value", "v64")),
            )
            .build()
            .expect("Failed to build")
    }

    fn render(name: &str, safe: bool) -> (String, String) {
        let schema = schema();
        let mapper = TypeMapper::new(&schema, TargetLanguage::Haskell, "");
        let view = DeclarationView::build(&schema, &mapper, schema.find(name).unwrap()).unwrap();
        let options = RenderOptions { safe, prefix: "" };
        (
            HASKELL_BACKEND.file_name(&view, &options),
            HASKELL_BACKEND.render(&view, &options),
        )
    }

    #[test]
    fn test_record_and_module() {
        let (file, code) = render("Employee", true);
        assert_eq!(file, "Employee.hs");
        assert!(code.contains("module Employee\n  ( Employee\n  , newEmployee\n"));
        assert!(code.contains("import Person (Person)\n"));
        assert!(code.contains("  , employeeName :: String -- ^ name: string (from Person)\n"));
        assert!(code.contains("  , employeeFriends :: M.Map String (Maybe Person)"));
        assert!(code.contains("  , employeeBadge :: [Int8] -- ^ badge: i8[4]\n"));
        assert!(code.contains(
            "newEmployee :: Ref -> String -> M.Map String (Maybe Person) -> Int32 -> Maybe Person -> [Int8] -> Int16 -> Employee\n"
        ));
    }

    #[test]
    fn test_checked_setters_in_safe_mode() {
        let (_, code) = render("Employee", true);
        assert!(code.contains("setBoss :: Maybe Person -> Employee -> Either TypeError Employee\n"));
        assert!(code.contains("  Just target | typeNameOf target `notElem` [\"Person\", \"Employee\"] ->\n"));
        assert!(code.contains("setBadge :: [Int8] -> Employee -> Either TypeError Employee\n"));
        assert!(code.contains("  | length v /= 4 = Left (LengthError \"Employee.badge\" 4 (length v))\n"));
        assert!(code.contains("setSalary :: Int32 -> Employee -> Employee\n"));
        assert!(code.contains("getBossRef = refOf . employeeBoss\n"));
    }

    #[test]
    fn test_unsafe_setters_are_total() {
        let (_, code) = render("Employee", false);
        assert!(code.contains("setBoss :: Maybe Person -> Employee -> Employee\n"));
        assert!(code.contains("setBadge :: [Int8] -> Employee -> Employee\n"));
        assert!(!code.contains("Either TypeError"));
    }

    #[test]
    fn test_hidden_field_not_exported() {
        let (_, code) = render("Employee", true);
        assert!(!code.contains("  , getPin\n"));
        assert!(code.contains("getPin :: Employee -> Int16\n"));
    }

    #[test]
    fn test_read_only_has_no_setters() {
        let (_, code) = render("Frozen", true);
        assert!(code.contains("-- Hints: !readOnly\n"));
        assert!(code.contains("getValue :: Frozen -> Int64\n"));
        assert!(!code.contains("setValue"));
    }

    fn members(schema: &Schema, name: &str) -> Vec<Member> {
        let mapper = TypeMapper::new(schema, TargetLanguage::Haskell, "");
        let view = DeclarationView::build(schema, &mapper, schema.find(name).unwrap()).unwrap();
        HASKELL_BACKEND.members(&view, &RenderOptions { safe: true, prefix: "" })
    }

    #[test]
    fn test_members_of_regular_fields_do_not_clash() {
        let schema = schema();
        assert!(find_clash(&members(&schema, "Employee")).is_none());
    }

    #[test]
    fn test_field_named_ref_clashes_with_identity_selector() {
        let schema = SchemaBuilder::new()
            .declaration(DeclarationSpec::new("Link").field(FieldSpec::new("ref", "i64")))
            .build()
            .expect("Failed to build");
        let members = members(&schema, "Link");
        let (first, second) = find_clash(&members).unwrap();
        assert_eq!(first.name, "linkRef");
        assert_eq!(first.origin(), "a generated member");
        assert_eq!(second.origin(), "field 'ref'");
    }
}
