//! Fail-fast column lookups used when rewriting column references.
//!
//! Every helper stops at the first key missing from the mapping and reports
//! only that key.

use std::{borrow::Borrow, collections::HashMap, hash::Hash};

/// Looks up one key, building the error from the key when it is absent.
pub fn lookup<K, Q, V, E, F>(key: &Q, mapping: &HashMap<K, V>, on_missing: F) -> Result<V, E>
where
    K: Borrow<Q> + Eq + Hash,
    Q: Eq + Hash + ?Sized,
    V: Clone,
    F: FnOnce(&Q) -> E,
{
    mapping.get(key).cloned().ok_or_else(|| on_missing(key))
}

/// Maps every key in order; the error names the first key not found.
pub fn lookup_all<'k, K, Q, V, E, F, I>(keys: I, mapping: &HashMap<K, V>, on_missing: F) -> Result<Vec<V>, E>
where
    I: IntoIterator<Item = &'k Q>,
    K: Borrow<Q> + Eq + Hash,
    Q: Eq + Hash + ?Sized + 'k,
    V: Clone,
    F: Fn(&Q) -> E,
{
    keys.into_iter()
        .map(|key| lookup(key, mapping, &on_missing))
        .collect()
}

/// Like [`lookup_all`] for an optional sequence: absent keys stay absent.
pub fn lookup_optional<K, V, E, F>(
    keys: Option<&[K]>,
    mapping: &HashMap<K, V>,
    on_missing: F,
) -> Result<Option<Vec<V>>, E>
where
    K: Eq + Hash,
    V: Clone,
    F: Fn(&K) -> E,
{
    keys.map(|keys| lookup_all(keys, mapping, on_missing))
        .transpose()
}
