//! N-dimensional interpolating lookup tables over scattered samples.
//!
//! Every dimension is backed by a height-balanced search tree, so samples do
//! not have to lie on a grid and can be added or removed at any time.
//!
//! ```
//! use nd_lookup_table::{LookupTable, LookupTable2};
//!
//! let mut curve = LookupTable::new();
//! curve.insert(1.0, 30.0);
//! curve.insert(2.0, 20.0);
//! assert_eq!(curve.lookup(1.5), 25.0);
//!
//! let mut surface = LookupTable2::new();
//! surface.insert(0.0, curve.clone());
//! surface.insert(1.0, vec![(1.0, 0.0), (2.0, 0.0)].into_iter().collect());
//! assert_eq!(surface.lookup(&[0.5, 1.5]), Ok(12.5));
//! ```

pub mod samples;
pub mod table;
pub mod tree;

pub use samples::SampleError;
pub use table::{Entry, Lerp, LookupError, LookupTable, LookupTable2, LookupTable3, NestedTable, Table};
pub use tree::{BalancedNode, BalancedTree, Comparator};
