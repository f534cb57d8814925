//! Sorted, packed interval R-tree.
//!
//! [`IntervalRTree`] indexes closed 1-D intervals for overlap queries. It is
//! built exactly once: intervals are accumulated with [`insert`], the first
//! query sorts them and packs them bottom-up into a balanced binary tree of
//! bounding intervals, and from then on the index is frozen. Queries prune
//! whole subtrees whose cached bounds cannot overlap the probe range.
//!
//! [`insert`]: IntervalRTree::insert

use velella_core::{Result, Summarizable, VelellaError};

use crate::interval::Interval;
use crate::visitor::ItemVisitor;

/// Stable handle to a node: an index into the leaf vector or the branch
/// arena. Handles never dangle — both vectors are append-only, and the
/// arena capacity is fixed before the first branch is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeId {
    Leaf(usize),
    Branch(usize),
}

/// One inserted interval and its payload. Never mutated after creation.
#[derive(Debug, Clone)]
struct Leaf<T> {
    bounds: Interval,
    item: T,
}

/// Internal node bounding exactly two children. `bounds` is the union of
/// the children's bounds, computed once here and never recomputed.
#[derive(Debug, Clone)]
struct Branch {
    bounds: Interval,
    left: NodeId,
    right: NodeId,
}

/// A build-once index over closed 1-D intervals, answering "which stored
/// intervals overlap this range?" without testing every stored interval.
///
/// Intervals are accumulated with [`insert`](IntervalRTree::insert); the
/// first query sorts them by `(lo, hi)` and packs them bottom-up, level by
/// level, into a balanced binary tree whose internal nodes cache the union
/// bounds of their children. From that point the index is frozen: further
/// inserts fail with [`VelellaError::Frozen`], and every query reuses the
/// same tree.
///
/// The payload type `T` is opaque to the index — nothing is compared,
/// hashed, or cloned. Callers that must not hand over ownership store a
/// reference (`T = &Item`) or an index handle (`T = usize`) into their own
/// storage.
#[derive(Debug, Clone)]
pub struct IntervalRTree<T> {
    leaves: Vec<Leaf<T>>,
    branches: Vec<Branch>,
    root: Option<NodeId>,
}

impl<T> IntervalRTree<T> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            leaves: Vec::new(),
            branches: Vec::new(),
            root: None,
        }
    }

    /// Insert an interval with an associated item.
    ///
    /// Legal only before the tree is built: the first query freezes the
    /// index, and later inserts fail with [`VelellaError::Frozen`] without
    /// touching it. Malformed bounds (`lo > hi`, or NaN) are rejected with
    /// [`VelellaError::InvalidInput`] and nothing is appended.
    pub fn insert(&mut self, lo: f64, hi: f64, item: T) -> Result<()> {
        if self.root.is_some() {
            return Err(VelellaError::Frozen(
                "index cannot be added to once it has been queried".into(),
            ));
        }
        let bounds = Interval::new(lo, hi)?;
        self.leaves.push(Leaf { bounds, item });
        Ok(())
    }

    /// Visit every stored interval overlapping the closed range `[lo, hi]`.
    ///
    /// Builds the tree on first use. Items are visited synchronously in the
    /// left-to-right depth order of the packed tree; for disjoint intervals
    /// this coincides with ascending interval order. A visitor error aborts
    /// the remaining traversal and propagates unmodified; the index itself
    /// is never affected.
    ///
    /// Querying an index with no intervals visits nothing, does not error,
    /// and leaves the index open for further inserts.
    pub fn query<V>(&mut self, lo: f64, hi: f64, visitor: &mut V) -> Result<()>
    where
        V: ItemVisitor<T> + ?Sized,
    {
        self.build();
        match self.root {
            Some(root) => self.visit_node(root, lo, hi, visitor),
            None => Ok(()),
        }
    }

    /// Collect references to every item overlapping `[lo, hi]`, in the
    /// tree's visit order.
    pub fn overlapping(&mut self, lo: f64, hi: f64) -> Vec<&T> {
        self.build();
        let mut hits = Vec::new();
        if let Some(root) = self.root {
            self.collect_node(root, lo, hi, &mut hits);
        }
        hits
    }

    /// Count the stored intervals overlapping `[lo, hi]` without allocating.
    pub fn count_overlaps(&mut self, lo: f64, hi: f64) -> usize {
        self.build();
        match self.root {
            Some(root) => self.count_node(root, lo, hi),
            None => 0,
        }
    }

    /// Build the tree if it has not been built yet.
    ///
    /// Called automatically by the query methods; exposed so callers can
    /// finish the one-time mutation explicitly before sharing the index.
    /// This check-and-set is the only internal mutation point after
    /// inserts. A no-op when the tree is already built, and also when no
    /// intervals are present — an empty index stays open for later inserts.
    pub fn build(&mut self) {
        if self.root.is_some() || self.leaves.is_empty() {
            return;
        }
        self.root = Some(self.build_tree());
    }

    /// Number of inserted intervals.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the index holds no intervals.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Whether the tree has been built (the index is frozen).
    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Iterate over the inserted intervals and items, in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (&Interval, &T)> {
        self.leaves.iter().map(|leaf| (&leaf.bounds, &leaf.item))
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    fn build_tree(&mut self) -> NodeId {
        // Exactly the number of internal nodes a pairwise bottom-up merge
        // of n leaves produces, however the odd carries fall; the arena
        // never grows past this capacity.
        self.branches = Vec::with_capacity(self.leaves.len() - 1);

        let mut order: Vec<usize> = (0..self.leaves.len()).collect();
        // Stable sort over handles that start in insertion order, so equal
        // (lo, hi) keys keep their relative insertion order.
        order.sort_by(|&a, &b| self.leaves[a].bounds.order(&self.leaves[b].bounds));

        let mut level: Vec<NodeId> = order.into_iter().map(NodeId::Leaf).collect();
        while level.len() > 1 {
            level = self.build_level(&level);
        }
        level[0]
    }

    /// Pair one level left to right. Each full pair becomes an arena branch
    /// bounding both children; an odd trailing node carries forward
    /// unchanged into the next level.
    fn build_level(&mut self, src: &[NodeId]) -> Vec<NodeId> {
        let mut dest = Vec::with_capacity(src.len() / 2 + 1);
        for pair in src.chunks(2) {
            if let [n1, n2] = *pair {
                let bounds = self.bounds_of(n1).union(&self.bounds_of(n2));
                dest.push(NodeId::Branch(self.branches.len()));
                self.branches.push(Branch {
                    bounds,
                    left: n1,
                    right: n2,
                });
            } else {
                dest.push(pair[0]);
            }
        }
        dest
    }

    fn bounds_of(&self, id: NodeId) -> Interval {
        match id {
            NodeId::Leaf(i) => self.leaves[i].bounds,
            NodeId::Branch(i) => self.branches[i].bounds,
        }
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    fn visit_node<V>(&self, id: NodeId, lo: f64, hi: f64, visitor: &mut V) -> Result<()>
    where
        V: ItemVisitor<T> + ?Sized,
    {
        match id {
            NodeId::Leaf(i) => {
                let leaf = &self.leaves[i];
                if leaf.bounds.overlaps_range(lo, hi) {
                    visitor.visit_item(&leaf.item)?;
                }
            }
            NodeId::Branch(i) => {
                let branch = &self.branches[i];
                // The cached bound is only a superset union: prune on it,
                // but descend into both children and let each re-check its
                // own bound.
                if branch.bounds.overlaps_range(lo, hi) {
                    self.visit_node(branch.left, lo, hi, visitor)?;
                    self.visit_node(branch.right, lo, hi, visitor)?;
                }
            }
        }
        Ok(())
    }

    fn collect_node<'a>(&'a self, id: NodeId, lo: f64, hi: f64, out: &mut Vec<&'a T>) {
        match id {
            NodeId::Leaf(i) => {
                let leaf = &self.leaves[i];
                if leaf.bounds.overlaps_range(lo, hi) {
                    out.push(&leaf.item);
                }
            }
            NodeId::Branch(i) => {
                let branch = &self.branches[i];
                if branch.bounds.overlaps_range(lo, hi) {
                    self.collect_node(branch.left, lo, hi, out);
                    self.collect_node(branch.right, lo, hi, out);
                }
            }
        }
    }

    fn count_node(&self, id: NodeId, lo: f64, hi: f64) -> usize {
        match id {
            NodeId::Leaf(i) => usize::from(self.leaves[i].bounds.overlaps_range(lo, hi)),
            NodeId::Branch(i) => {
                let branch = &self.branches[i];
                if branch.bounds.overlaps_range(lo, hi) {
                    self.count_node(branch.left, lo, hi) + self.count_node(branch.right, lo, hi)
                } else {
                    0
                }
            }
        }
    }
}

impl<T> Default for IntervalRTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Summarizable for IntervalRTree<T> {
    fn summary(&self) -> String {
        format!(
            "IntervalRTree: {} intervals ({})",
            self.len(),
            if self.is_built() { "built" } else { "unbuilt" }
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_range() -> impl Strategy<Value = (f64, f64)> {
        (-1000.0..1000.0f64, 0.0..50.0f64).prop_map(|(lo, width)| (lo, lo + width))
    }

    proptest! {
        #[test]
        fn query_matches_brute_force(
            intervals in proptest::collection::vec(arb_range(), 0..64),
            query in arb_range(),
        ) {
            let mut index = IntervalRTree::new();
            for (i, &(lo, hi)) in intervals.iter().enumerate() {
                index.insert(lo, hi, i).unwrap();
            }

            let mut hits: Vec<usize> =
                index.overlapping(query.0, query.1).into_iter().copied().collect();
            hits.sort_unstable();

            let expect: Vec<usize> = intervals
                .iter()
                .enumerate()
                .filter(|&(_, &(lo, hi))| lo <= query.1 && query.0 <= hi)
                .map(|(i, _)| i)
                .collect();

            prop_assert_eq!(hits, expect);
        }

        #[test]
        fn insertion_order_does_not_change_results(
            intervals in proptest::collection::vec(arb_range(), 1..32),
            query in arb_range(),
        ) {
            let mut forward = IntervalRTree::new();
            for (i, &(lo, hi)) in intervals.iter().enumerate() {
                forward.insert(lo, hi, i).unwrap();
            }

            let mut reversed = IntervalRTree::new();
            for (i, &(lo, hi)) in intervals.iter().enumerate().rev() {
                reversed.insert(lo, hi, i).unwrap();
            }

            let mut fwd: Vec<usize> =
                forward.overlapping(query.0, query.1).into_iter().copied().collect();
            let mut rev: Vec<usize> =
                reversed.overlapping(query.0, query.1).into_iter().copied().collect();
            fwd.sort_unstable();
            rev.sort_unstable();
            prop_assert_eq!(fwd, rev);
        }

        #[test]
        fn branch_arena_is_exactly_sized(
            intervals in proptest::collection::vec(arb_range(), 1..64),
        ) {
            let mut index = IntervalRTree::new();
            for (i, &(lo, hi)) in intervals.iter().enumerate() {
                index.insert(lo, hi, i).unwrap();
            }
            index.build();
            prop_assert_eq!(index.branches.len(), intervals.len() - 1);
            prop_assert_eq!(index.branches.capacity(), intervals.len() - 1);
        }
    }
}
