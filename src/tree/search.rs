use super::NTree;
use crate::{error::Result, point::SpatialPoint};
use std::sync::Arc;

/// Returns true if every coordinate lies in the closed interval `lower[i]..=upper[i]`.
#[inline]
fn within(coordinates: &[f64], lower: &[f64], upper: &[f64]) -> bool {
    coordinates
        .iter()
        .zip(lower.iter().zip(upper))
        .all(|(x, (lo, hi))| lo <= x && x <= hi)
}

/// What a node holds for a query, read under its shared lock.
pub(crate) enum Visit<'a, T> {
    /// The node has children to descend into.
    Internal(&'a [NTree<T>]),
    /// The node is a leaf, with its point if it matches the query.
    Leaf(Option<Arc<SpatialPoint<T>>>),
}

impl<T> NTree<T> {
    /// Finds all points falling within the box between `lower` and `upper`.
    ///
    /// It is assumed that `lower[i] <= upper[i]` for every dimension `i`. The search is
    /// inclusive, so points with a coordinate equal to a bound of the query match. Children
    /// that cannot intersect the query are skipped entirely. Results come in no particular
    /// order and every matching point appears once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`](crate::Error::DimensionMismatch) if `lower` or
    /// `upper` does not have [`NTree::dimensions`] coordinates.
    pub fn search(&self, lower: &[f64], upper: &[f64]) -> Result<Vec<Arc<SpatialPoint<T>>>> {
        self.check_query(lower, upper)?;

        let mut found = Vec::new();
        self.search_into(lower, upper, &mut found);
        Ok(found)
    }

    #[inline]
    pub(crate) fn check_query(&self, lower: &[f64], upper: &[f64]) -> Result<()> {
        self.check_dimensions(lower.len())?;
        self.check_dimensions(upper.len())
    }

    fn search_into(&self, lower: &[f64], upper: &[f64], found: &mut Vec<Arc<SpatialPoint<T>>>) {
        match self.visit(lower, upper) {
            Visit::Leaf(point) => found.extend(point),
            Visit::Internal(children) => {
                for child in children.iter() {
                    if child.bounds.intersects(lower, upper) {
                        child.search_into(lower, upper, found);
                    }
                }
            }
        }
    }

    /// Holds the shared lock only while reading this node, never while descending.
    pub(crate) fn visit(&self, lower: &[f64], upper: &[f64]) -> Visit<'_, T> {
        let state = self.state.read();
        match self.children.get() {
            Some(children) => Visit::Internal(children),
            None => Visit::Leaf(
                state
                    .point
                    .as_ref()
                    .filter(|point| within(point.coordinates(), lower, upper))
                    .cloned(),
            ),
        }
    }
}
