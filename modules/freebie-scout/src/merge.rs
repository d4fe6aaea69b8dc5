use std::collections::HashSet;

use tracing::debug;

use freebie_common::GameDeal;

/// Merge deals from all sources into one candidate list keyed by
/// [`GameDeal::key`].
///
/// Input must be ordered richest source first. The first deal seen wins; a
/// later deal is dropped when its id matches a kept deal's id or its name
/// matches a kept deal's name. The name check is what catches one game
/// reported under a Steam app id by one source and an aggregator id by another.
pub fn merge_deals<I>(deals: I) -> Vec<(String, GameDeal)>
where
    I: IntoIterator<Item = GameDeal>,
{
    let mut ids: HashSet<String> = HashSet::new();
    let mut names: HashSet<String> = HashSet::new();
    let mut merged = Vec::new();

    for deal in deals {
        let id = deal.id.as_deref().filter(|id| !id.is_empty());
        let has_name = !deal.name.is_empty();

        if id.is_none() && !has_name {
            continue;
        }

        let dup_id = id.is_some_and(|id| ids.contains(id));
        let dup_name = has_name && names.contains(&deal.name);
        if dup_id || dup_name {
            debug!(key = deal.key(), name = %deal.name, "Dropping duplicate deal");
            continue;
        }

        if let Some(id) = id {
            ids.insert(id.to_string());
        }
        if has_name {
            names.insert(deal.name.clone());
        }
        merged.push((deal.key().to_string(), deal));
    }

    merged
}
