//! Shared helpers for CLI commands

use miette::Result;

use crate::core::EntityKind;

/// Bucket IDs by entity kind, preserving first-seen order.
///
/// The kind comes from `--kind` when given, otherwise from the ID's leading
/// letter (`A5023888391` is an author, `T11636` a topic, ...).
pub fn group_by_kind(
    ids: &[String],
    forced: Option<EntityKind>,
) -> Result<Vec<(EntityKind, Vec<String>)>> {
    let mut groups: Vec<(EntityKind, Vec<String>)> = Vec::new();
    for id in ids {
        let kind = match forced.or_else(|| EntityKind::from_id(id)) {
            Some(kind) => kind,
            None => {
                return Err(miette::miette!(
                    "cannot infer the entity kind of '{}'; pass --kind",
                    id
                ));
            }
        };
        match groups.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, bucket)) => bucket.push(id.clone()),
            None => groups.push((kind, vec![id.clone()])),
        }
    }
    Ok(groups)
}
