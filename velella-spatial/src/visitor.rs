//! Visitor capability invoked for each matching item during a query.

use velella_core::Result;

/// Callback consumed by [`IntervalRTree::query`](crate::IntervalRTree::query),
/// invoked once per stored interval that overlaps the query range.
pub trait ItemVisitor<T> {
    /// Visit one matching item.
    ///
    /// Returning an error aborts the remaining traversal; the error
    /// propagates unmodified out of the query call.
    fn visit_item(&mut self, item: &T) -> Result<()>;
}

impl<T, F> ItemVisitor<T> for F
where
    F: FnMut(&T) -> Result<()>,
{
    fn visit_item(&mut self, item: &T) -> Result<()> {
        self(item)
    }
}
