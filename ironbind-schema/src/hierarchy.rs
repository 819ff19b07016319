//! Inheritance analysis.
//!
//! Every walk over the super-type relation is iterative and guarded by a
//! visited set, so a corrupt (cyclic) schema fails with
//! [`SchemaIntegrityError`] instead of looping or duplicating entries.

use crate::error::SchemaIntegrityError;
use crate::order::sort_canonical;
use crate::schema::{Field, Schema};
use crate::types::DeclId;
use std::collections::HashSet;

/// Returns the chain `[id, super, super's super, .., base type]`.
///
/// # Errors
/// Returns `SchemaIntegrityError::CyclicSuperType` if the chain loops and
/// `SchemaIntegrityError::DanglingDeclaration` if a link leaves the schema.
pub fn super_chain(schema: &Schema, id: DeclId) -> Result<Vec<DeclId>, SchemaIntegrityError> {
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = Some(id);

    while let Some(next) = current {
        if !visited.insert(next) {
            let mut path: Vec<&str> = chain
                .iter()
                .filter_map(|id| schema.get(*id).map(|decl| decl.name.as_str()))
                .collect();
            path.push(schema.declaration(next)?.name.as_str());
            return Err(SchemaIntegrityError::CyclicSuperType {
                path: path.join(" -> "),
            });
        }
        chain.push(next);
        current = schema.declaration(next)?.super_type;
    }

    Ok(chain)
}

/// Returns the base type of a declaration (the declaration itself for base types).
///
/// # Errors
/// Propagates the errors of [`super_chain`].
pub fn base_type(schema: &Schema, id: DeclId) -> Result<DeclId, SchemaIntegrityError> {
    let chain = super_chain(schema, id)?;
    Ok(chain.last().copied().unwrap_or(id))
}

/// Collects all fields of a declaration, inherited ones first.
///
/// Fields of the root-most ancestor come first, then each descendant's own
/// fields down to the declaration itself, each level in declared order.
/// This order determines field layout in generated bindings.
///
/// # Errors
/// Propagates the errors of [`super_chain`].
pub fn collect_fields(schema: &Schema, id: DeclId) -> Result<Vec<&Field>, SchemaIntegrityError> {
    Ok(collect_owned_fields(schema, id)?
        .into_iter()
        .map(|(_, field)| field)
        .collect())
}

/// Like [`collect_fields`], paired with the declaration each field is declared on.
///
/// # Errors
/// Propagates the errors of [`super_chain`].
pub fn collect_owned_fields(
    schema: &Schema,
    id: DeclId,
) -> Result<Vec<(DeclId, &Field)>, SchemaIntegrityError> {
    let chain = super_chain(schema, id)?;
    let mut fields = Vec::new();
    for ancestor in chain.iter().rev() {
        let decl = schema.declaration(*ancestor)?;
        fields.extend(decl.fields.iter().map(|field| (*ancestor, field)));
    }
    Ok(fields)
}

/// Returns the declarations whose direct super type is `id`, in discovery order.
#[must_use]
pub fn direct_subtypes(schema: &Schema, id: DeclId) -> Vec<DeclId> {
    schema
        .ids()
        .filter(|candidate| {
            schema
                .get(*candidate)
                .is_some_and(|decl| decl.super_type == Some(id))
        })
        .collect()
}

/// Returns every direct and indirect subtype of a declaration in canonical order.
///
/// # Errors
/// Returns `SchemaIntegrityError::RevisitedSubtype` if a declaration is
/// reached twice, which happens only when the hierarchy contains a cycle.
pub fn transitive_subtypes(schema: &Schema, id: DeclId) -> Result<Vec<DeclId>, SchemaIntegrityError> {
    let root = schema.declaration(id)?;
    let mut visited = HashSet::from([id]);
    let mut worklist = direct_subtypes(schema, id);
    let mut subtypes = Vec::new();

    while let Some(next) = worklist.pop() {
        if !visited.insert(next) {
            return Err(SchemaIntegrityError::RevisitedSubtype {
                root: root.name.clone(),
                declaration: schema.declaration(next)?.name.clone(),
            });
        }
        subtypes.push(next);
        worklist.extend(direct_subtypes(schema, next));
    }

    sort_canonical(schema, &mut subtypes);
    Ok(subtypes)
}

/// Checks that every super-type chain is acyclic and stays inside the schema.
///
/// # Errors
/// Returns the first integrity error found, in discovery order.
pub fn check_hierarchy(schema: &Schema) -> Result<(), SchemaIntegrityError> {
    for id in schema.ids() {
        super_chain(schema, id)?;
    }
    Ok(())
}
