//! Code generation backends.
//!
//! A backend renders one [`DeclarationView`] into the source text of one
//! unit. Backends only format; every decision about fields, types and
//! checks has already been made when the view was built.

use crate::cpp::CPP_BACKEND;
use crate::haskell::HASKELL_BACKEND;
use crate::rust::RUST_BACKEND;
use crate::target::TargetLanguage;
use crate::view::{DeclarationView, FieldView};
use std::collections::HashMap;

/// Options that apply to every unit of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions<'a> {
    /// Whether setters check assigned values at runtime.
    pub safe: bool,
    /// Prefix of generated identifiers and file names.
    pub prefix: &'a str,
}

/// A name a unit defines for its declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Scope the name lives in; names only clash within one scope.
    pub scope: &'static str,
    /// Generated name.
    pub name: String,
    /// Field the name was generated for, `None` for fixed members.
    pub field: Option<String>,
}

impl Member {
    /// Creates a member every unit of the backend has.
    #[must_use]
    pub fn fixed(scope: &'static str, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
            field: None,
        }
    }

    /// Creates a member generated for a field.
    #[must_use]
    pub fn of_field(scope: &'static str, name: impl Into<String>, field: &FieldView) -> Self {
        Self {
            scope,
            name: name.into(),
            field: Some(field.name.clone()),
        }
    }

    /// Describes where the member comes from.
    #[must_use]
    pub fn origin(&self) -> String {
        match &self.field {
            Some(field) => format!("field '{field}'"),
            None => "a generated member".to_string(),
        }
    }
}

/// Returns the first two members that share a name within a scope.
#[must_use]
pub fn find_clash(members: &[Member]) -> Option<(&Member, &Member)> {
    let mut seen: HashMap<(&str, &str), &Member> = HashMap::with_capacity(members.len());
    for member in members {
        if let Some(first) = seen.insert((member.scope, member.name.as_str()), member) {
            return Some((first, member));
        }
    }
    None
}

/// A code generation backend.
pub trait Backend: Send + Sync {
    /// Target language of the backend.
    fn target(&self) -> TargetLanguage;

    /// File name of the unit for a declaration, including the prefix.
    fn file_name(&self, view: &DeclarationView, options: &RenderOptions<'_>) -> String;

    /// Names the unit defines, grouped by scope.
    ///
    /// Used to reject declarations whose fields would produce clashing
    /// identifiers before anything is rendered.
    fn members(&self, view: &DeclarationView, options: &RenderOptions<'_>) -> Vec<Member>;

    /// Renders the unit for a declaration.
    fn render(&self, view: &DeclarationView, options: &RenderOptions<'_>) -> String;
}

/// Returns the backend for a target language.
#[must_use]
pub fn backend_for(target: TargetLanguage) -> &'static dyn Backend {
    match target {
        TargetLanguage::Rust => &RUST_BACKEND,
        TargetLanguage::Haskell => &HASKELL_BACKEND,
        TargetLanguage::Cpp => &CPP_BACKEND,
    }
}

/// Joins strings as a comma separated list of double-quoted literals.
pub(crate) fn quoted_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("\"{item}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_for_each_target() {
        for target in TargetLanguage::ALL {
            assert_eq!(backend_for(target).target(), target);
        }
    }

    #[test]
    fn test_quoted_list() {
        assert_eq!(
            quoted_list(&["Person".to_string(), "Employee".to_string()]),
            "\"Person\", \"Employee\""
        );
        assert_eq!(quoted_list(&[]), "");
    }

    #[test]
    fn test_find_clash_within_scope() {
        let members = vec![
            Member::fixed("field", "id"),
            Member::fixed("fn", "id"),
            Member {
                scope: "field",
                name: "id".to_string(),
                field: Some("id".to_string()),
            },
        ];
        let (first, second) = find_clash(&members).unwrap();
        assert_eq!(first.origin(), "a generated member");
        assert_eq!(second.origin(), "field 'id'");
        assert!(find_clash(&members[..2]).is_none());
    }
}
