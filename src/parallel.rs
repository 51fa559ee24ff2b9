use crate::{
    error::Result,
    point::SpatialPoint,
    tree::{search::Visit, NTree},
};
use rayon::prelude::*;
use std::sync::Arc;

impl<T> NTree<T>
where
    T: Send + Sync,
{
    /// Same as [`NTree::search`], but the children intersecting the query are searched in
    /// parallel on the rayon thread pool.
    ///
    /// # Errors
    ///
    /// See [`NTree::search`].
    pub fn par_search(&self, lower: &[f64], upper: &[f64]) -> Result<Vec<Arc<SpatialPoint<T>>>> {
        self.check_query(lower, upper)?;
        Ok(self.par_search_unchecked(lower, upper))
    }

    fn par_search_unchecked(&self, lower: &[f64], upper: &[f64]) -> Vec<Arc<SpatialPoint<T>>> {
        match self.visit(lower, upper) {
            Visit::Leaf(point) => point.into_iter().collect(),
            Visit::Internal(children) => children
                .par_iter()
                .filter(|child| child.bounds().intersects(lower, upper))
                .flat_map_iter(|child| child.par_search_unchecked(lower, upper))
                .collect(),
        }
    }

    /// Inserts every point of the parallel iterator from the rayon thread pool.
    ///
    /// # Errors
    ///
    /// See [`NTree::insert`]. Points are inserted in no particular order, so on error an
    /// arbitrary subset of the other points has been inserted.
    pub fn par_extend<I>(&self, points: I) -> Result<()>
    where
        I: IntoParallelIterator<Item = SpatialPoint<T>>,
    {
        points
            .into_par_iter()
            .try_for_each(|point| self.insert(point))
    }
}
