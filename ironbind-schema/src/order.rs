//! Canonical declaration order.
//!
//! Declarations are emitted sorted by name so that regenerating from the
//! same schema yields byte-identical output, whatever order the loader
//! discovered them in.

use crate::schema::Schema;
use crate::types::DeclId;
use std::cmp::Ordering;

/// Compares two names by their UTF-8 bytes, independent of locale.
#[must_use]
pub fn ordinal_cmp(a: &str, b: &str) -> Ordering {
    a.as_bytes().cmp(b.as_bytes())
}

/// Returns every declaration id sorted by declaration name.
#[must_use]
pub fn canonical_order(schema: &Schema) -> Vec<DeclId> {
    let mut ids: Vec<DeclId> = schema.ids().collect();
    sort_canonical(schema, &mut ids);
    ids
}

/// Sorts ids in place by declaration name; dangling ids sort last by index.
pub fn sort_canonical(schema: &Schema, ids: &mut [DeclId]) {
    ids.sort_by(|a, b| match (schema.get(*a), schema.get(*b)) {
        (Some(x), Some(y)) => ordinal_cmp(&x.name, &y.name).then(a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    });
}
