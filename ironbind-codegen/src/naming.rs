//! Identifier casing helpers.

/// Converts a camelCase or PascalCase name to snake_case.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut previous_lower = false;
    for c in s.chars() {
        if c.is_uppercase() && previous_lower {
            result.push('_');
        }
        previous_lower = c.is_lowercase() || c.is_ascii_digit();
        result.push(c.to_ascii_lowercase());
    }
    result
}

/// Converts a string to PascalCase.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if c == '_' || c == '-' {
            capitalize_next = true;
        } else if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}

/// Converts a string to camelCase.
#[must_use]
pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Rust keywords, strict and reserved, as of edition 2024.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Keywords that cannot be written as raw identifiers.
const RUST_NON_RAW: &[&str] = &["crate", "self", "Self", "super"];

/// C++ keywords and alternative operator spellings.
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
];

/// Makes a name usable as a Rust identifier.
///
/// Keywords become raw identifiers (`r#type`); the few keywords that have
/// no raw form get a trailing underscore.
#[must_use]
pub fn escape_rust(ident: &str) -> String {
    if RUST_NON_RAW.contains(&ident) {
        format!("{ident}_")
    } else if RUST_KEYWORDS.contains(&ident) {
        format!("r#{ident}")
    } else {
        ident.to_string()
    }
}

/// Makes a name usable as a C++ identifier by suffixing keywords with `_`.
#[must_use]
pub fn escape_cpp(ident: &str) -> String {
    if CPP_KEYWORDS.contains(&ident) {
        format!("{ident}_")
    } else {
        ident.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("salary"), "salary");
        assert_eq!(to_snake_case("birthDate"), "birth_date");
        assert_eq!(to_snake_case("ProjectMember"), "project_member");
        assert_eq!(to_snake_case("HTTPServer"), "httpserver");
    }

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("person"), "Person");
        assert_eq!(to_pascal_case("project_member"), "ProjectMember");
        assert_eq!(to_pascal_case("ProjectMember"), "ProjectMember");
    }

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("birth_date"), "birthDate");
        assert_eq!(to_camel_case("Salary"), "salary");
        assert_eq!(to_camel_case(""), "");
    }

    #[test]
    fn test_escape_rust() {
        assert_eq!(escape_rust("type"), "r#type");
        assert_eq!(escape_rust("match"), "r#match");
        assert_eq!(escape_rust("self"), "self_");
        assert_eq!(escape_rust("salary"), "salary");
    }

    #[test]
    fn test_escape_cpp() {
        assert_eq!(escape_cpp("class"), "class_");
        assert_eq!(escape_cpp("new"), "new_");
        assert_eq!(escape_cpp("salary"), "salary");
    }
}
