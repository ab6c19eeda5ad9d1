use std::fmt;

use super::{blend, compare_entries, Entry, KeyOrder, LookupError, LookupTable, Table};
use crate::tree::BalancedTree;

pub type LookupTable2<K, V> = NestedTable<LookupTable<K, V>>;
pub type LookupTable3<K, V> = NestedTable<LookupTable2<K, V>>;

/// A table one dimension above `S`.
///
/// Entries are keyed by the outermost coordinate and own their sub-table:
/// removing an entry hands the sub-table back, dropping the table drops all
/// of them.
pub struct NestedTable<S: Table> {
    tree: BalancedTree<Entry<S::Key, S>, KeyOrder<S::Key, S>>,
}

impl<S: Table> NestedTable<S> {
    pub fn new() -> NestedTable<S> {
        NestedTable {
            tree: BalancedTree::new(compare_entries::<S::Key, S> as KeyOrder<S::Key, S>),
        }
    }

    /// Attaches `table` at `key`. If `key` already has a sub-table the new
    /// one is dropped and `false` is returned.
    pub fn insert(&mut self, key: S::Key, table: S) -> bool {
        self.tree.insert(Entry::new(key, table))
    }

    pub fn insert_all<I>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = (S::Key, S)>,
    {
        let mut inserted = 0;
        for (key, table) in entries {
            if self.insert(key, table) {
                inserted += 1;
            }
        }
        inserted
    }

    /// Detaches the sub-table at `key`.
    pub fn remove(&mut self, key: S::Key) -> Option<S> {
        self.tree
            .remove_by(|entry| entry.locate(key))
            .map(|entry| entry.payload)
    }

    pub fn remove_all<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = S::Key>,
    {
        keys.into_iter()
            .filter_map(|key| self.remove(key))
            .count()
    }

    pub fn get(&self, key: S::Key) -> Option<&S> {
        self.tree
            .find_by(|entry| entry.locate(key))
            .map(|entry| &entry.payload)
    }

    pub fn get_mut(&mut self, key: S::Key) -> Option<&mut S> {
        self.tree
            .find_mut_by(|entry| entry.locate(key))
            .map(|entry| &mut entry.payload)
    }

    /// Interpolated value at `point`, which must have exactly `DIM`
    /// coordinates, outermost first.
    pub fn lookup(&self, point: &[S::Key]) -> Result<S::Value, LookupError> {
        self.lookup_point(point)
    }

    /// Looks up every point in order. Fails on the first point of the wrong
    /// dimension.
    pub fn lookup_all<I, P>(&self, points: I) -> Result<Vec<S::Value>, LookupError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[S::Key]>,
    {
        points
            .into_iter()
            .map(|point| self.lookup(point.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Sub-tables in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (S::Key, &S)> + '_ {
        self.tree.iter().map(|entry| (entry.key, &entry.payload))
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }
}

impl<S: Table> Default for NestedTable<S> {
    fn default() -> Self {
        NestedTable::new()
    }
}

impl<S: Table + Clone> Clone for NestedTable<S> {
    fn clone(&self) -> Self {
        NestedTable {
            tree: self.tree.clone(),
        }
    }
}

impl<S> fmt::Debug for NestedTable<S>
where
    S: Table + fmt::Debug,
    S::Key: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedTable").field("tree", &self.tree).finish()
    }
}

impl<S: Table> Table for NestedTable<S> {
    type Key = S::Key;
    type Value = S::Value;

    const DIM: usize = S::DIM + 1;

    fn len(&self) -> usize {
        self.tree.len()
    }

    fn interpolate(&self, point: &[S::Key]) -> S::Value {
        let key = point[0];
        let inner = &point[1..];
        blend(
            self.tree.lookup_by(|entry| entry.locate(key)),
            key,
            |table: &S| table.interpolate(inner),
        )
    }

    fn place(&mut self, point: &[S::Key], value: S::Value) -> bool {
        let key = point[0];
        match self.get_mut(key) {
            Some(table) => table.place(&point[1..], value),
            None => {
                let mut table = S::default();
                table.place(&point[1..], value);
                self.insert(key, table)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// f(x, y) = 10x + y sampled on {0, 1, 2} x {0, 1, 2}
    fn plane() -> LookupTable2<f64, f64> {
        let mut table = LookupTable2::new();
        for x in 0..3 {
            let mut row = LookupTable::new();
            for y in 0..3 {
                row.insert(y as f64, 10.0 * x as f64 + y as f64);
            }
            table.insert(x as f64, row);
        }
        table
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(<LookupTable<f64, f64> as Table>::DIM, 1);
        assert_eq!(<LookupTable2<f64, f64> as Table>::DIM, 2);
        assert_eq!(<LookupTable3<f64, f64> as Table>::DIM, 3);
    }

    #[test]
    fn test_grid_lookup() {
        let table = plane();
        assert_eq!(table.lookup(&[1.0, 2.0]), Ok(12.0));
        assert_eq!(table.lookup(&[0.5, 1.5]), Ok(6.5));
        assert_eq!(table.lookup(&[1.5, 0.0]), Ok(15.0));
    }

    #[test]
    fn test_outer_and_inner_clamping() {
        let table = plane();
        assert_eq!(table.lookup(&[-4.0, 0.5]), Ok(0.5));
        assert_eq!(table.lookup(&[9.0, 1.0]), Ok(21.0));
        assert_eq!(table.lookup(&[0.5, 9.0]), Ok(7.0));
    }

    #[test]
    fn test_cascade_over_unaligned_rows() {
        let mut table = LookupTable2::new();
        table.insert(0.0, vec![(0.0, 0.0), (2.0, 20.0)].into_iter().collect());
        table.insert(1.0, vec![(1.0, 100.0)].into_iter().collect());

        // each row is interpolated (or clamped) on its own first
        assert_eq!(table.lookup(&[0.5, 1.0]), Ok(55.0));
        assert_eq!(table.lookup(&[0.5, 3.0]), Ok(60.0));
        assert_eq!(table.lookup(&[0.25, 0.0]), Ok(25.0));
    }

    #[test]
    fn test_empty_tables_give_default() {
        let table: LookupTable2<f64, f64> = LookupTable2::new();
        assert_eq!(table.lookup(&[1.0, 1.0]), Ok(0.0));

        let mut hollow = LookupTable2::new();
        hollow.insert(0.0, LookupTable::new());
        hollow.insert(1.0, vec![(0.0, 8.0)].into_iter().collect());
        assert_eq!(hollow.lookup(&[0.5, 0.0]), Ok(4.0));
    }

    #[test]
    fn test_wrong_dimension_is_rejected() {
        let table = plane();
        assert_eq!(
            table.lookup(&[1.0]),
            Err(LookupError::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(
            table.lookup(&[1.0, 1.0, 1.0]),
            Err(LookupError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        );
    }

    #[test]
    fn test_duplicate_outer_key_keeps_first_table() {
        let mut table = plane();
        assert!(!table.insert(1.0, vec![(0.0, -1.0)].into_iter().collect()));
        assert_eq!(table.lookup(&[1.0, 0.0]), Ok(10.0));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_remove_hands_back_the_sub_table() {
        let mut table = plane();
        let row = table.remove(1.0);
        assert_eq!(row.map(|row| row.lookup(2.0)), Some(12.0));
        assert!(table.remove(1.0).is_none());

        // now bracketed by the rows at 0 and 2
        assert_eq!(table.lookup(&[1.0, 1.0]), Ok(11.0));
        assert_eq!(table.remove_all(vec![0.0, 2.0, 5.0]), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_get_mut_extends_a_row() {
        let mut table = plane();
        if let Some(row) = table.get_mut(2.0) {
            row.insert(3.0, 50.0);
        }
        assert_eq!(table.get(2.0).map(|row| row.len()), Some(4));
        assert_eq!(table.lookup(&[2.0, 2.5]), Ok(36.0));
    }

    #[test]
    fn test_batch_lookup_preserves_order() {
        let table = plane();
        assert_eq!(
            table.lookup_all(vec![[0.0, 0.0], [2.0, 2.0], [1.0, 0.5]]),
            Ok(vec![0.0, 22.0, 10.5])
        );
        assert!(table.lookup_all(vec![vec![0.0, 0.0], vec![1.0]]).is_err());
    }

    #[test]
    fn test_three_dimensions_from_points() {
        // f(x, y, z) = x + 10y + 100z on the unit cube corners
        let mut table: LookupTable3<f64, f64> = LookupTable3::new();
        for x in 0..2 {
            for y in 0..2 {
                for z in 0..2 {
                    let point = [x as f64, y as f64, z as f64];
                    let value = point[0] + 10.0 * point[1] + 100.0 * point[2];
                    assert_eq!(table.insert_point(&point, value), Ok(true));
                }
            }
        }
        assert_eq!(table.insert_point(&[0.0, 0.0, 0.0], 7.0), Ok(false));
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0.0).map(|plane| plane.len()), Some(2));

        assert_eq!(table.lookup(&[0.5, 0.5, 0.5]), Ok(55.5));
        assert_eq!(table.lookup(&[1.0, 0.0, 1.0]), Ok(101.0));
        assert_eq!(table.lookup(&[0.0, 0.0, 0.0]), Ok(0.0));
    }

    #[test]
    fn test_entries_iterate_in_key_order() {
        let mut table = LookupTable2::new();
        for key in vec![3.0, -1.0, 2.0] {
            table.insert(key, vec![(0.0, key)].into_iter().collect());
        }
        let keys: Vec<f64> = table.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![-1.0, 2.0, 3.0]);
    }
}
