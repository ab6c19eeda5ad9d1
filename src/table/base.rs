use std::iter::FromIterator;

use itertools::Itertools;
use num_traits::Float;

use super::{blend, compare_entries, Entry, KeyOrder, Lerp, Table};
use crate::tree::BalancedTree;

/// One-dimensional table: keys map straight to values.
#[derive(Debug, Clone)]
pub struct LookupTable<K, V> {
    tree: BalancedTree<Entry<K, V>, KeyOrder<K, V>>,
}

impl<K: Float, V: Lerp<K>> LookupTable<K, V> {
    pub fn new() -> LookupTable<K, V> {
        LookupTable {
            tree: BalancedTree::new(compare_entries::<K, V> as KeyOrder<K, V>),
        }
    }

    /// Stores `value` at `key`. An existing entry at `key` is left untouched
    /// and `false` is returned.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.tree.insert(Entry::new(key, value))
    }

    /// Inserts every pair in order, returning how many were new.
    pub fn insert_all<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut inserted = 0;
        for (key, value) in entries {
            if self.insert(key, value) {
                inserted += 1;
            }
        }
        inserted
    }

    pub fn remove(&mut self, key: K) -> Option<V> {
        self.tree
            .remove_by(|entry| entry.locate(key))
            .map(|entry| entry.payload)
    }

    /// Removes every key, returning how many were present.
    pub fn remove_all<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter()
            .filter_map(|key| self.remove(key))
            .count()
    }

    /// The value stored exactly at `key`.
    pub fn get(&self, key: K) -> Option<&V> {
        self.tree
            .find_by(|entry| entry.locate(key))
            .map(|entry| &entry.payload)
    }

    /// Linear interpolation between the samples around `key`.
    ///
    /// Keys outside the stored range take the value of the nearest sample.
    /// An empty table gives `V::default()`.
    pub fn lookup(&self, key: K) -> V {
        blend(self.tree.lookup_by(|entry| entry.locate(key)), key, V::clone)
    }

    pub fn lookup_all<I>(&self, keys: I) -> Vec<V>
    where
        I: IntoIterator<Item = K>,
    {
        keys.into_iter().map(|key| self.lookup(key)).collect_vec()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.tree.iter().map(|entry| (entry.key, &entry.payload))
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    pub(crate) fn tree(&self) -> &BalancedTree<Entry<K, V>, KeyOrder<K, V>> {
        &self.tree
    }
}

impl<K: Float, V: Lerp<K>> Default for LookupTable<K, V> {
    fn default() -> Self {
        LookupTable::new()
    }
}

impl<K: Float, V: Lerp<K>> FromIterator<(K, V)> for LookupTable<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = LookupTable::new();
        table.insert_all(iter);
        table
    }
}

impl<K: Float, V: Lerp<K>> Extend<(K, V)> for LookupTable<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<K: Float, V: Lerp<K>> Table for LookupTable<K, V> {
    type Key = K;
    type Value = V;

    const DIM: usize = 1;

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn interpolate(&self, point: &[K]) -> V {
        self.lookup(point[0])
    }

    fn place(&mut self, point: &[K], value: V) -> bool {
        self.insert(point[0], value)
    }
}
