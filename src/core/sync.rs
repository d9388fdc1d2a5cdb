//! Fetch-and-store batch operations
//!
//! Ties the remote fetcher to the store with per-ID conflict isolation:
//! a remote failure (including not-found) aborts the batch, while a cache
//! conflict only skips that ID. The per-ID outcome makes partial success
//! visible in the type instead of silently swallowing conflicts.

use crate::core::entity::Entity;
use crate::core::error::{CacheError, Result};
use crate::core::fetcher::RemoteFetcher;
use crate::core::kind::EntityKind;
use crate::core::store::EntityStore;

/// Per-ID result of a batch fetch.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Fetched and newly inserted.
    Inserted(Entity),
    /// Already cached; the fetched document was discarded, nothing written.
    Conflict { id: String },
}

/// Fetch each ID from the remote API and insert it into the store.
///
/// Returns one outcome per input ID, in input order. Entities already
/// cached come back as [`FetchOutcome::Conflict`] and the rest of the
/// batch proceeds.
pub fn fetch_and_store(
    store: &mut EntityStore,
    fetcher: &dyn RemoteFetcher,
    kind: EntityKind,
    ids: &[&str],
) -> Result<Vec<FetchOutcome>> {
    let mut outcomes = Vec::with_capacity(ids.len());
    for id in ids {
        let document = fetcher.fetch(kind, id)?;
        let entity = Entity::new(kind, document)?;
        match store.insert(&entity) {
            Ok(()) => outcomes.push(FetchOutcome::Inserted(entity)),
            Err(CacheError::AlreadyExists(id)) => outcomes.push(FetchOutcome::Conflict { id }),
            Err(other) => return Err(other),
        }
    }
    Ok(outcomes)
}

/// Fetch each ID and upsert it, replacing all rows including child
/// collections. Used to re-sync entities that are already cached.
pub fn refresh(
    store: &mut EntityStore,
    fetcher: &dyn RemoteFetcher,
    kind: EntityKind,
    ids: &[&str],
) -> Result<Vec<Entity>> {
    let mut entities = Vec::with_capacity(ids.len());
    for id in ids {
        let document = fetcher.fetch(kind, id)?;
        let entity = Entity::new(kind, document)?;
        store.replace(&entity)?;
        entities.push(entity);
    }
    Ok(entities)
}

/// The entities newly inserted by a batch, in input order.
pub fn inserted(outcomes: Vec<FetchOutcome>) -> Vec<Entity> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            FetchOutcome::Inserted(entity) => Some(entity),
            FetchOutcome::Conflict { .. } => None,
        })
        .collect()
}
