use crate::model::item::Item;

/// Whether `item` stays visible under `filter`.
///
/// The filter is lower-cased but not trimmed; an empty filter shows
/// everything.
pub fn matches(item: &Item, filter: &str) -> bool {
    filter.is_empty() || item.contains(filter)
}

/// Positions (into the full list) of the items visible under `filter`.
pub fn visible_indices<'a>(items: impl IntoIterator<Item = &'a Item>, filter: &str) -> Vec<usize> {
    items
        .into_iter()
        .enumerate()
        .filter(|(_, item)| matches(item, filter))
        .map(|(i, _)| i)
        .collect()
}
