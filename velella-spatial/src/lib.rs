//! One-dimensional spatial indexing for the Velella workspace.
//!
//! The centerpiece is [`IntervalRTree`], a build-once, query-many index over
//! closed intervals, typically used as a coarse first-pass filter before
//! expensive exact comparisons:
//!
//! - **[`Interval`]** — closed interval value type `[lo, hi]`
//! - **[`IntervalRTree`]** — sorted, packed interval R-tree with
//!   overlap-pruning queries
//! - **[`ItemVisitor`]** — callback capability invoked per matching item
//!
//! # Quick start
//!
//! ```
//! use velella_spatial::IntervalRTree;
//!
//! let mut index = IntervalRTree::new();
//! index.insert(0.0, 2.0, "a").unwrap();
//! index.insert(5.0, 8.0, "b").unwrap();
//! index.insert(1.0, 3.0, "c").unwrap();
//!
//! // the first query packs the tree; the index is frozen afterwards
//! assert_eq!(index.overlapping(2.0, 4.0), vec![&"a", &"c"]);
//! assert!(index.insert(9.0, 10.0, "d").is_err());
//! ```

pub mod interval;
pub mod rtree;
pub mod visitor;

pub use interval::Interval;
pub use rtree::IntervalRTree;
pub use visitor::ItemVisitor;
