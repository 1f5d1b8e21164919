use std::cmp::Ordering;

use rand::seq::SliceRandom;
use rand::RngCore;

use super::options::SortOrder;
use crate::models::MediaEntry;

/// Sorts in place. All orders except `Random` are stable.
pub fn sort_entries(entries: &mut [MediaEntry], order: SortOrder, rng: &mut dyn RngCore) {
    match order {
        SortOrder::DateAsc => entries.sort_by_key(|e| e.mtime_ms),
        SortOrder::DateDesc => entries.sort_by(|a, b| b.mtime_ms.cmp(&a.mtime_ms)),
        SortOrder::Random => entries.shuffle(rng),
        SortOrder::NameAsc => entries.sort_by(|a, b| compare_names(&a.name, &b.name)),
    }
}

/// Case-insensitive comparison, tie-broken on the raw name.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}
