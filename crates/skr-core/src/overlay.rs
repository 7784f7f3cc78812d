use std::collections::HashSet;
use std::hash::Hash;

/// Flatten `sources` (highest priority first) into one list, keeping only the
/// first item seen for each key.
///
/// Output order is acceptance order: source order, then the order items appear
/// within their source. Later duplicates are dropped without replacing the
/// accepted item.
pub fn overlay_first_wins<S, I, T, K, F>(sources: S, mut key: F) -> Vec<T>
where
    S: IntoIterator<Item = I>,
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    let mut accepted = Vec::new();
    for source in sources {
        for item in source {
            if seen.insert(key(&item)) {
                accepted.push(item);
            }
        }
    }
    accepted
}
