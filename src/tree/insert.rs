use super::{NTree, State};
use crate::{
    error::{Error, Result},
    point::SpatialPoint,
};
use std::sync::Arc;
use tracing::{debug, trace};

impl<T> NTree<T> {
    /// Inserts a new point in the [`NTree`].
    ///
    /// The point descends to the leaf covering it. A leaf that already holds a point splits
    /// into `2^N` children and both points are pushed down, splitting again for as long as they
    /// share an orthant. Coincident points keep splitting until halving the half-extent
    /// underflows, which fails with a [`ConfigError`](crate::ConfigError).
    ///
    /// # Errors
    ///
    /// - [`Error::DimensionMismatch`] if the point has the wrong number of coordinates.
    /// - [`Error::OutOfBounds`] if the point lies outside of this node.
    /// - [`Error::Config`] or [`Error::Allocation`] if a split failed to create its children.
    ///   The node that failed to split keeps its previous point.
    #[inline]
    pub fn insert(&self, point: SpatialPoint<T>) -> Result<()> {
        self.insert_shared(Arc::new(point))
    }

    /// Inserts a point that may already be shared with the caller.
    ///
    /// # Errors
    ///
    /// See [`NTree::insert`].
    pub fn insert_shared(&self, point: Arc<SpatialPoint<T>>) -> Result<()> {
        if let Err(error) = self.check_dimensions(point.dimensions()) {
            trace!(%error, "rejected point");
            return Err(error);
        }
        if !self.bounds.contains(point.coordinates()) {
            trace!(coordinates = ?point.coordinates(), "rejected out of bounds point");
            return Err(Error::OutOfBounds);
        }

        self.insert_contained(point)
    }

    /// Inserts every point of the iterator, stopping at the first error.
    ///
    /// # Errors
    ///
    /// See [`NTree::insert`].
    #[inline]
    pub fn extend<I>(&self, points: I) -> Result<()>
    where
        I: IntoIterator<Item = SpatialPoint<T>>,
    {
        points.into_iter().try_for_each(|point| self.insert(point))
    }

    // A point inside this node and addressed by `child_index` is inside the child, so the
    // descent skips the validation done at the entry point.
    fn insert_contained(&self, point: Arc<SpatialPoint<T>>) -> Result<()> {
        let mut state = self.state.write();

        if let Some(children) = self.children.get() {
            drop(state);
            return self.descend(children, point);
        }

        let Some(previous) = state.point.take() else {
            state.point = Some(point);
            state.count += 1;
            return Ok(());
        };

        let mut children = match self.split() {
            Ok(children) => children,
            Err(error) => {
                debug!(%error, center = ?self.bounds.center(), "abandoned split");
                state.point = Some(previous);
                return Err(error);
            }
        };
        debug!(
            dimensions = self.dimensions(),
            orthants = children.len(),
            center = ?self.bounds.center(),
            "split leaf"
        );

        // The previous point is in its child before any other thread can reach the children.
        // It never left this subtree, so the count of this node stays as it is.
        let index = self.bounds.child_index(previous.coordinates());
        *children[index].state.get_mut() = State {
            point: Some(previous),
            count: 1,
        };
        let children = self.children.get_or_init(|| children);
        drop(state);

        self.descend(children, point)
    }

    fn descend(&self, children: &[NTree<T>], point: Arc<SpatialPoint<T>>) -> Result<()> {
        children[self.bounds.child_index(point.coordinates())].insert_contained(point)?;
        self.state.write().count += 1;
        Ok(())
    }

    fn split(&self) -> Result<Box<[NTree<T>]>> {
        let dimensions = self.dimensions();
        let orthants = self
            .bounds
            .orthant_count()
            .ok_or(Error::Allocation { dimensions })?;

        let mut children = Vec::new();
        children
            .try_reserve_exact(orthants)
            .map_err(|_| Error::Allocation { dimensions })?;

        for bounds in self.bounds.orthants() {
            children.push(NTree::with_bounds(bounds?));
        }

        Ok(children.into_boxed_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::*;
    use super::*;
    use crate::error::ConfigError;
    use rand::prelude::*;

    #[test]
    fn two_points_split() {
        let tree = unit_tree::<&str>(2);
        tree.insert(SpatialPoint::with_data([-0.5, -0.5], "a")).unwrap();
        assert!(tree.is_leaf());
        assert_eq!(tree.point().and_then(|p| p.data().copied()), Some("a"));

        tree.insert(SpatialPoint::with_data([0.5, 0.5], "b")).unwrap();
        assert!(!tree.is_leaf());
        assert!(tree.point().is_none());
        assert_eq!(tree.count(), 2);

        let children = tree.children().unwrap();
        assert_eq!(children.len(), 4);
        assert_eq!(children[0b00].point().and_then(|p| p.data().copied()), Some("a"));
        assert_eq!(children[0b11].point().and_then(|p| p.data().copied()), Some("b"));
        assert!(children[0b01].is_empty());
        assert!(children[0b10].is_empty());
        assert!(children.iter().all(NTree::is_leaf));
    }

    #[test]
    fn same_orthant_splits_again() {
        let tree = unit_tree::<()>(2);
        tree.insert(SpatialPoint::new([0.25, 0.25])).unwrap();
        tree.insert(SpatialPoint::new([0.75, 0.75])).unwrap();

        let upper = &tree.children().unwrap()[0b11];
        assert!(!upper.is_leaf());
        assert_eq!(upper.count(), 2);
        assert_eq!(upper.center(), &[0.5, 0.5]);
        assert_eq!(upper.half_extent(), &[0.5, 0.5]);

        let grandchildren = upper.children().unwrap();
        assert!(grandchildren[0b00].point().is_some());
        assert!(grandchildren[0b11].point().is_some());
    }

    #[test]
    fn out_of_bounds() {
        let tree = unit_tree::<()>(3);
        tree.insert(SpatialPoint::new([0.1, 0.1, 0.1])).unwrap();

        assert_eq!(
            tree.insert(SpatialPoint::new([0.0, 1.5, 0.0])),
            Err(Error::OutOfBounds)
        );
        assert_eq!(
            tree.insert(SpatialPoint::new([f64::NAN, 0.0, 0.0])),
            Err(Error::OutOfBounds)
        );
        assert_eq!(tree.count(), 1);
        assert!(tree.is_leaf());
    }

    #[test]
    fn boundary_points() {
        let tree = unit_tree::<()>(2);
        for corner in [[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0], [1.0, 1.0], [0.0, 0.0]] {
            tree.insert(SpatialPoint::new(corner)).unwrap();
        }

        assert_eq!(tree.count(), 5);
        assert_eq!(tree.search(&[-1.0, -1.0], &[1.0, 1.0]).unwrap().len(), 5);
    }

    #[test]
    fn dimension_mismatch() {
        let tree = unit_tree::<()>(2);
        tree.insert(SpatialPoint::new([0.5, 0.5])).unwrap();

        assert_eq!(
            tree.insert(SpatialPoint::new([0.5])),
            Err(Error::DimensionMismatch {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(tree.count(), 1);
        assert!(tree.is_leaf());
    }

    #[test]
    fn coincident_points_underflow() {
        // Tiny bounds keep the chain of splits short before the half-extent underflows.
        let tree = NTree::new([0.0], [1e-300]).unwrap();
        tree.insert(SpatialPoint::with_data([0.0], 1)).unwrap();

        let result = tree.insert(SpatialPoint::with_data([0.0], 2));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidBound { .. }))
        ));

        // The first point is still reachable and counted once.
        let found = tree.search(&[0.0], &[0.0]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].data(), Some(&1));
        assert_eq!(tree.count(), 1);
    }

    #[test]
    fn too_many_orthants() {
        let tree = unit_tree::<()>(MAX);
        tree.insert(SpatialPoint::new(vec![0.5; MAX])).unwrap();

        assert_eq!(
            tree.insert(SpatialPoint::new(vec![-0.5; MAX])),
            Err(Error::Allocation { dimensions: MAX })
        );
        assert!(tree.is_leaf());
        assert_eq!(tree.count(), 1);
        assert!(tree.point().is_some());
    }

    const MAX: usize = crate::MAX_DIMENSIONS;

    #[test]
    fn count_matches_inserted() {
        let mut rng = StdRng::seed_from_u64(1808);
        for n in 1..=8 {
            let tree = unit_tree(n);
            tree.extend(random_points(&mut rng, n, 500)).unwrap();

            assert_eq!(tree.count(), 500);

            let mut leaves = 0;
            walk(&tree, &mut |node: &NTree<usize>| {
                if let Some(children) = node.children() {
                    let sum = children.iter().map(NTree::count).sum::<u64>();
                    assert_eq!(node.count(), sum);
                    assert!(node.point().is_none());
                } else {
                    leaves += node.point().map_or(0, |_| 1);
                }
            });
            assert_eq!(leaves, 500);
        }
    }

    #[test]
    fn concurrent_insertion() {
        let mut rng = StdRng::seed_from_u64(1808);
        let workers = 8;

        for n in 1..=6 {
            let points = random_points(&mut rng, n, 1_000);
            let tree = unit_tree(n);

            std::thread::scope(|scope| {
                for chunk in points.chunks(points.len() / workers) {
                    let tree = &tree;
                    scope.spawn(move || {
                        for point in chunk {
                            tree.insert(point.clone()).unwrap();
                        }
                    });
                }
            });

            let (min, max) = tree.bound_points();
            let found = tree.search(&min, &max).unwrap();
            assert_eq!(ids(&found), (0..points.len()).collect::<Vec<_>>());
            assert_eq!(tree.count(), points.len() as u64);
        }
    }

    #[test]
    fn concurrent_same_leaf() {
        // Every thread hammers the same small region to force racing splits.
        let tree = unit_tree::<usize>(2);
        std::thread::scope(|scope| {
            for t in 0..8 {
                let tree = &tree;
                scope.spawn(move || {
                    for i in 0..100 {
                        let offset = (t * 100 + i) as f64 * 1e-6;
                        tree.insert(SpatialPoint::with_data([0.1 + offset, 0.1], t * 100 + i))
                            .unwrap();
                    }
                });
            }
        });

        assert_eq!(tree.count(), 800);
        let found = tree.search(&[-1.0, -1.0], &[1.0, 1.0]).unwrap();
        assert_eq!(ids(&found), (0..800).collect::<Vec<_>>());
    }

    #[test]
    fn racing_splits_keep_stored_points() {
        use std::sync::Barrier;

        for _ in 0..2_000 {
            // Id 2 is coincident with id 0, so its chain of splits ends in an underflow.
            let tree = NTree::new([0.0], [1e-300]).unwrap();
            tree.insert(SpatialPoint::with_data([5e-301], 0)).unwrap();

            let barrier = Barrier::new(3);
            let inserted = std::thread::scope(|scope| {
                let inserters = [(1, -5e-301), (2, 5e-301)].map(|(id, x)| {
                    let (tree, barrier) = (&tree, &barrier);
                    scope.spawn(move || {
                        barrier.wait();
                        tree.insert(SpatialPoint::with_data([x], id)).map(|_| id)
                    })
                });

                let (tree, barrier) = (&tree, &barrier);
                scope.spawn(move || {
                    barrier.wait();
                    walk(tree, &mut |node: &NTree<i32>| {
                        node.for_each(|visited| {
                            assert!(visited.is_leaf() || visited.point().is_none());
                        });
                    });
                });

                inserters
                    .into_iter()
                    .filter_map(|handle| handle.join().unwrap().ok())
                    .collect::<Vec<_>>()
            });

            let found = tree.search(&[-1e-300], &[1e-300]).unwrap();
            let mut ids = found
                .iter()
                .filter_map(|p| p.data().copied())
                .collect::<Vec<_>>();
            ids.sort_unstable();

            let mut expected = [vec![0], inserted].concat();
            expected.sort_unstable();
            assert_eq!(ids, expected);
            assert_eq!(tree.count(), found.len() as u64);

            walk(&tree, &mut |node: &NTree<i32>| {
                assert!(node.is_leaf() || node.point().is_none());
            });
        }
    }
}
