//! Key validation and name disambiguation.

use crate::error::{GeoError, Result};
use crate::geo::EntityKind;

/// One of two mutually exclusive lookup keys.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Either<A, B> {
    Left(A),
    Right(B),
}

pub(crate) fn exactly_one<A, B>(
    entity: EntityKind,
    options: &'static str,
    left: Option<A>,
    right: Option<B>,
) -> Result<Either<A, B>> {
    match (left, right) {
        (Some(a), None) => Ok(Either::Left(a)),
        (None, Some(b)) => Ok(Either::Right(b)),
        _ => Err(GeoError::InvalidArgumentCombination { entity, options }),
    }
}

/// Trim a name key and reject it when blank.
pub(crate) fn name_key(entity: EntityKind, raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(GeoError::invalid_format(entity, raw, "name must not be blank"));
    }
    Ok(name.to_string())
}

/// Reduce the rows of a name lookup to a single match.
///
/// Several rows yield `AmbiguousName` carrying each distinct owner, in the
/// order the store returned them.
pub(crate) fn unique<R, F>(
    entity: EntityKind,
    name: &str,
    scope: &'static str,
    rows: Vec<R>,
    owner: F,
) -> Result<R>
where
    F: Fn(&R) -> String,
{
    let mut rows = rows;
    match rows.len() {
        0 => Err(GeoError::not_found(entity, name)),
        1 => Ok(rows.remove(0)),
        _ => {
            let mut candidates: Vec<String> = Vec::with_capacity(rows.len());
            for row in &rows {
                let candidate = owner(row);
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
            Err(GeoError::AmbiguousName {
                entity,
                name: name.to_string(),
                scope,
                candidates,
            })
        }
    }
}
