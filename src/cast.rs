//! Cast resolution: actor names to actor ids, and the membership-row diff
//! needed to give a movie a particular cast.

use std::collections::{BTreeMap, BTreeSet};

use sea_orm::ConnectionTrait;
use tracing::debug;

use crate::{entities::actor, error::AppResult, store::EntityStore};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CastResolutionError {
    #[error("cast must name at least one actor")]
    Empty,

    #[error("cast names the same actor more than once: {}", .0.join(", "))]
    Duplicate(Vec<String>),

    #[error("no actor named {}", .0.join(", "))]
    Unknown(Vec<String>),

    #[error("more than one actor is named {}", .0.join(", "))]
    Ambiguous(Vec<String>),
}

/// Membership rows to write so that a movie's cast becomes the desired set.
/// Removals are applied before additions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CastDiff {
    pub to_add: BTreeSet<i32>,
    pub to_remove: BTreeSet<i32>,
}

impl CastDiff {
    pub fn between(current: &BTreeSet<i32>, desired: &BTreeSet<i32>) -> Self {
        Self {
            to_add: desired.difference(current).copied().collect(),
            to_remove: current.difference(desired).copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Resolves actor names (exact, case-sensitive match on `name`) to actor ids.
pub async fn resolve<C: ConnectionTrait>(
    store: &EntityStore<C>,
    names: &[String],
) -> AppResult<BTreeSet<i32>> {
    if names.is_empty() {
        return Err(CastResolutionError::Empty.into());
    }
    let actors = store.actors_named(names).await?;
    let ids = match_names(names, &actors)?;
    debug!(requested = names.len(), resolved = ids.len(), "cast resolved");
    Ok(ids)
}

/// Computes the diff between a movie's current cast and `desired`.
pub async fn diff<C: ConnectionTrait>(
    store: &EntityStore<C>,
    movie_id: i32,
    desired: &BTreeSet<i32>,
) -> AppResult<CastDiff> {
    let current = store.cast_ids(movie_id).await?;
    Ok(CastDiff::between(&current, desired))
}

/// Every requested name must be distinct and match exactly one actor.
pub fn match_names(
    names: &[String],
    actors: &[actor::Model],
) -> Result<BTreeSet<i32>, CastResolutionError> {
    let mut requested = BTreeSet::new();
    let duplicates: BTreeSet<&String> = names.iter().filter(|n| !requested.insert(*n)).collect();
    if !duplicates.is_empty() {
        return Err(CastResolutionError::Duplicate(duplicates.into_iter().cloned().collect()));
    }

    let mut by_name: BTreeMap<&str, Vec<i32>> = BTreeMap::new();
    for actor in actors {
        by_name.entry(actor.name.as_str()).or_default().push(actor.id);
    }

    let mut unknown = Vec::new();
    let mut ambiguous = Vec::new();
    let mut ids = BTreeSet::new();
    for name in names {
        match by_name.get(name.as_str()).map(Vec::as_slice) {
            Some([id]) => {
                ids.insert(*id);
            },
            Some([]) | None => unknown.push(name.clone()),
            Some(_) => ambiguous.push(name.clone()),
        }
    }

    if !unknown.is_empty() {
        return Err(CastResolutionError::Unknown(unknown));
    }
    if !ambiguous.is_empty() {
        return Err(CastResolutionError::Ambiguous(ambiguous));
    }
    debug_assert_eq!(ids.len(), names.len());
    Ok(ids)
}
