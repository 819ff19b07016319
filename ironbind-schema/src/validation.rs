//! Hint legality checks.
//!
//! This module enforces which hints may appear on type declarations and
//! fields. Whole-schema validation collects every violation instead of
//! stopping at the first one.

use crate::error::{ValidationError, ValidationErrors};
use crate::hints::HintKind;
use crate::order::canonical_order;
use crate::schema::{Declaration, Field, Schema};

/// Hints that are never legal on a type declaration.
pub const ILLEGAL_ON_TYPES: [HintKind; 2] = [HintKind::Distributed, HintKind::OnDemand];

/// Hints that are legal on a type declaration only if it is a base type.
pub const BASE_TYPE_ONLY: [HintKind; 2] = [HintKind::Monotone, HintKind::ReadOnly];

/// Hints that are never legal on a field declaration.
pub const ILLEGAL_ON_FIELDS: [HintKind; 4] = [
    HintKind::Unique,
    HintKind::Pure,
    HintKind::Monotone,
    HintKind::ReadOnly,
];

/// Returns every illegal hint on a type declaration.
#[must_use]
pub fn type_hint_violations(decl: &Declaration) -> Vec<ValidationError> {
    let mut violations = Vec::new();

    for hint in ILLEGAL_ON_TYPES {
        if decl.has_hint(hint) {
            violations.push(ValidationError::IllegalTypeHint {
                declaration: decl.name.clone(),
                hint,
            });
        }
    }

    if !decl.is_base_type() {
        for hint in BASE_TYPE_ONLY {
            if decl.has_hint(hint) {
                violations.push(ValidationError::BaseTypeOnly {
                    declaration: decl.name.clone(),
                    hint,
                });
            }
        }
    }

    violations
}

/// Returns every illegal hint on a field of `decl`.
#[must_use]
pub fn field_hint_violations(decl: &Declaration, field: &Field) -> Vec<ValidationError> {
    ILLEGAL_ON_FIELDS
        .into_iter()
        .filter(|hint| field.has_hint(*hint))
        .map(|hint| ValidationError::IllegalFieldHint {
            declaration: decl.name.clone(),
            field: field.name.clone(),
            hint,
        })
        .collect()
}

/// Checks the hints of a type declaration.
///
/// # Errors
/// Returns the first violation found.
pub fn validate_type_hints(decl: &Declaration) -> Result<(), ValidationError> {
    match type_hint_violations(decl).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Checks the hints of a field declared on `decl`.
///
/// # Errors
/// Returns the first violation found.
pub fn validate_field_hints(decl: &Declaration, field: &Field) -> Result<(), ValidationError> {
    match field_hint_violations(decl, field).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Validates the hints of every declaration and field.
///
/// Declarations are visited in canonical order; each declaration's own
/// violations precede those of its fields.
///
/// # Errors
/// Returns `ValidationErrors` holding every violation in the schema.
pub fn validate_schema(schema: &Schema) -> Result<(), ValidationErrors> {
    let mut errors = Vec::new();

    for id in canonical_order(schema) {
        let Some(decl) = schema.get(id) else {
            continue;
        };
        errors.extend(type_hint_violations(decl));
        for field in &decl.fields {
            errors.extend(field_hint_violations(decl, field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors::new(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hints::Hint;
    use crate::schema::Field;
    use crate::types::{DeclId, PrimitiveKind, Type};

    fn base(hint: Hint) -> Declaration {
        Declaration::new("Base").with_hint(hint)
    }

    fn sub(hint: Hint) -> Declaration {
        Declaration::new("Sub").extends(DeclId::new(0)).with_hint(hint)
    }

    fn field(hints: &[Hint]) -> Field {
        hints.iter().fold(
            Field::new("f", Type::Primitive(PrimitiveKind::I32)),
            |field, hint| field.with_hint(hint.clone()),
        )
    }

    #[test]
    fn test_distributed_and_on_demand_illegal_on_types() {
        for hint in [Hint::Distributed, Hint::OnDemand] {
            assert!(validate_type_hints(&base(hint.clone())).is_err());
            assert!(validate_type_hints(&sub(hint)).is_err());
        }
    }

    #[test]
    fn test_monotone_and_read_only_only_on_base_types() {
        for hint in [Hint::Monotone, Hint::ReadOnly] {
            assert!(validate_type_hints(&base(hint.clone())).is_ok());
            let err = validate_type_hints(&sub(hint.clone())).unwrap_err();
            assert_eq!(
                err,
                ValidationError::BaseTypeOnly {
                    declaration: "Sub".to_string(),
                    hint: hint.kind(),
                }
            );
        }
    }

    #[test]
    fn test_other_type_hints_are_legal() {
        for hint in [
            Hint::Unique,
            Hint::Pure,
            Hint::Flat,
            Hint::Mixin,
            Hint::Owner(vec!["tool".to_string()]),
        ] {
            assert!(validate_type_hints(&sub(hint)).is_ok());
        }
    }

    #[test]
    fn test_illegal_field_hints() {
        let decl = Declaration::new("T");
        for hint in [Hint::Unique, Hint::Pure, Hint::Monotone, Hint::ReadOnly] {
            let err = validate_field_hints(&decl, &field(&[Hint::Ignore, hint.clone()])).unwrap_err();
            assert_eq!(err.hint(), hint.kind());
            assert_eq!(
                err.to_string(),
                format!("illegal hint !{} on field declaration 'T.f'", hint.kind())
            );
        }
    }

    #[test]
    fn test_legal_field_hints() {
        let decl = Declaration::new("T");
        let f = field(&[Hint::OnDemand, Hint::Distributed, Hint::Hide, Hint::ConstantMutator]);
        assert!(validate_field_hints(&decl, &f).is_ok());
    }

    #[test]
    fn test_all_violations_of_one_declaration_are_reported() {
        let decl = Declaration::new("Sub")
            .extends(DeclId::new(0))
            .with_hint(Hint::Distributed)
            .with_hint(Hint::ReadOnly);
        let kinds: Vec<HintKind> = type_hint_violations(&decl).iter().map(|e| e.hint()).collect();
        assert_eq!(kinds, [HintKind::Distributed, HintKind::ReadOnly]);
    }

    #[test]
    fn test_validate_schema_collects_everything() {
        let schema = Schema::from_declarations(vec![
            Declaration::new("Zeta")
                .with_hint(Hint::OnDemand)
                .with_field(field(&[Hint::Unique])),
            Declaration::new("Alpha").with_field(field(&[Hint::Pure, Hint::ReadOnly])),
            Declaration::new("Clean").with_hint(Hint::ReadOnly),
        ]);

        let errors = validate_schema(&schema).unwrap_err();
        let found: Vec<(&str, HintKind)> = errors
            .errors()
            .iter()
            .map(|e| (e.declaration(), e.hint()))
            .collect();
        assert_eq!(
            found,
            [
                ("Alpha", HintKind::Pure),
                ("Alpha", HintKind::ReadOnly),
                ("Zeta", HintKind::OnDemand),
                ("Zeta", HintKind::Unique),
            ]
        );
    }

    #[test]
    fn test_validate_schema_ok() {
        let schema = Schema::from_declarations(vec![
            Declaration::new("A").with_hint(Hint::Monotone),
            Declaration::new("B").extends(DeclId::new(0)).with_hint(Hint::Unique),
        ]);
        assert!(validate_schema(&schema).is_ok());
    }
}
