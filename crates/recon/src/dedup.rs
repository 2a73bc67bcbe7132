use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Distinct items in first-occurrence order.
pub fn distinct<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen: HashSet<T> = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

/// Group values by key; groups keep input order.
pub fn index_by<K, V, I>(pairs: I) -> HashMap<K, Vec<V>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, V)>,
{
    let mut index: HashMap<K, Vec<V>> = HashMap::new();
    for (k, v) in pairs {
        index.entry(k).or_default().push(v);
    }
    index
}
