/// Geometry of nodes and orthant addressing.
pub mod partition;

mod insert;
pub(crate) mod search;

pub use partition::Bounds;

use crate::{
    error::{ConfigError, Error, Result},
    point::SpatialPoint,
};
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

/// Mutable part of a node, guarded by its lock.
#[derive(Debug)]
struct State<T> {
    point: Option<Arc<SpatialPoint<T>>>,
    count: u64,
}

/// N-dimensional generalisation of quadtrees/octrees.
///
/// A node covers the volume described by its [`Bounds`] and is either a leaf holding at most
/// one [`SpatialPoint`], or an internal node owning exactly `2^N` children, one per orthant.
/// The orthant at index `i` lies in the upper half of dimension `j` when bit `j` of `i` is set.
///
/// Every node has its own reader/writer lock, so an [`NTree`] can be shared between threads
/// and filled and searched concurrently. No operation ever holds the exclusive lock of two
/// nodes at once.
///
/// # Example
///
/// ```
/// # use ntree::prelude::*;
/// let tree = NTree::new([0.0, 0.0], [1.0, 1.0])?;
///
/// tree.insert(SpatialPoint::with_data([-0.5, -0.5], "a"))?;
/// tree.insert(SpatialPoint::with_data([0.5, 0.5], "b"))?;
///
/// let found = tree.search(&[-1.0, -1.0], &[0.0, 0.0])?;
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].data(), Some(&"a"));
/// assert_eq!(tree.count(), 2);
/// # Ok::<(), ntree::Error>(())
/// ```
#[derive(Debug)]
pub struct NTree<T = ()> {
    bounds: Bounds,
    state: RwLock<State<T>>,
    // Set once, under the exclusive lock, when the leaf splits.
    children: OnceLock<Box<[NTree<T>]>>,
}

impl<T> NTree<T> {
    /// Creates a new empty [`NTree`] covering `center[i] ± half_extent[i]` in every dimension.
    ///
    /// # Errors
    ///
    /// See [`Bounds::new`].
    #[inline]
    pub fn new(
        center: impl Into<Vec<f64>>,
        half_extent: impl Into<Vec<f64>>,
    ) -> Result<Self, ConfigError> {
        Bounds::new(center, half_extent).map(Self::with_bounds)
    }

    /// Creates a new empty [`NTree`] covering the given [`Bounds`].
    #[inline]
    pub fn with_bounds(bounds: Bounds) -> Self {
        Self {
            bounds,
            state: RwLock::new(State {
                point: None,
                count: 0,
            }),
            children: OnceLock::new(),
        }
    }

    /// Returns the number of dimensions (N) of this [`NTree`].
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.bounds.dimensions()
    }

    /// Returns the [`Bounds`] covered by this node.
    #[inline]
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Returns the center of this node.
    #[inline]
    pub fn center(&self) -> &[f64] {
        self.bounds.center()
    }

    /// Returns the half-extent of this node in every dimension.
    #[inline]
    pub fn half_extent(&self) -> &[f64] {
        self.bounds.half_extent()
    }

    /// Returns the minimum and maximum corners of this node.
    #[inline]
    pub fn bound_points(&self) -> (Vec<f64>, Vec<f64>) {
        self.bounds.corners()
    }

    /// Returns the point stored in this node. Always `None` for internal nodes.
    ///
    /// The point is shared: this clones the [`Arc`] under the shared lock, so the returned
    /// handle stays valid after the node splits.
    #[inline]
    pub fn point(&self) -> Option<Arc<SpatialPoint<T>>> {
        self.state.read().point.clone()
    }

    /// Returns this node's estimate of how many points lie within it.
    ///
    /// The estimate is exact when no insertion is in flight.
    #[inline]
    pub fn count(&self) -> u64 {
        self.state.read().count
    }

    /// Returns true if no point was inserted in this node yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Returns true if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.get().is_none()
    }

    /// Returns the `2^N` children of this node, or `None` for a leaf.
    #[inline]
    pub fn children(&self) -> Option<&[NTree<T>]> {
        self.children.get().map(|children| &**children)
    }

    /// Returns true if the given point lies within the bounds of this node, boundaries
    /// included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the point does not have [`NTree::dimensions`]
    /// coordinates.
    #[inline]
    pub fn contains<P>(&self, point: &P) -> Result<bool>
    where
        P: AsRef<[f64]> + ?Sized,
    {
        let coordinates = point.as_ref();
        self.check_dimensions(coordinates.len())?;
        Ok(self.bounds.contains(coordinates))
    }

    /// Runs `visit` on this node, then on each of its immediate children.
    ///
    /// This is not a recursive traversal: recurse through [`NTree::children`] to walk the whole
    /// tree. The exclusive lock of this node is held during the whole call and each child is
    /// read-locked while it is visited, so `visit` must not call back into these nodes.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(NodeRef<'_, T>),
    {
        let state = self.state.write();
        visit(NodeRef::new(self, &state));

        if let Some(children) = self.children.get() {
            for child in children.iter() {
                let child_state = child.state.read();
                visit(NodeRef::new(child, &child_state));
            }
        }
    }

    #[inline]
    fn check_dimensions(&self, found: usize) -> Result<()> {
        let expected = self.dimensions();
        if found != expected {
            return Err(Error::DimensionMismatch { expected, found });
        }
        Ok(())
    }
}

/// Snapshot of a node handed to the visitor of [`NTree::for_each`].
#[derive(Debug)]
pub struct NodeRef<'a, T> {
    bounds: &'a Bounds,
    point: Option<&'a Arc<SpatialPoint<T>>>,
    count: u64,
    is_leaf: bool,
}

impl<'a, T> NodeRef<'a, T> {
    #[inline]
    fn new(node: &'a NTree<T>, state: &'a State<T>) -> Self {
        Self {
            bounds: &node.bounds,
            point: state.point.as_ref(),
            count: state.count,
            is_leaf: node.is_leaf(),
        }
    }

    /// Returns the [`Bounds`] of the visited node.
    #[inline]
    pub fn bounds(&self) -> &'a Bounds {
        self.bounds
    }

    /// Returns the point stored in the visited node.
    #[inline]
    pub fn point(&self) -> Option<&'a Arc<SpatialPoint<T>>> {
        self.point
    }

    /// Returns the point count of the visited node.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Returns true if the visited node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }
}
