#![warn(missing_docs)]
//! # ntree
//!
//! ntree is a crate providing an N-dimensional generalisation of quadtrees (N = 2) and octrees
//! (N = 3) that can be filled and searched from many threads at once.
//!
//! ## Goals
//!
//! The main goal of this crate is to offer a simple spatial index for points in any number of
//! dimensions, up to [`MAX_DIMENSIONS`], that can be shared between threads without a global
//! lock. It does not remove points, balance itself or answer nearest-neighbour queries; it
//! only focuses on concurrent insertion and orthogonal range search.
//!
//! ## How it works
//!
//! An [`NTree`] covers an axis-aligned box given by a center and a half-extent in every
//! dimension. Each node holds at most one point. When a second point lands in an occupied
//! node, the node splits its box in two along every dimension at once, creating `2^N`
//! children, and both points move down into them. The child covering the upper half of
//! dimension `j` has bit `j` of its index set, which is how a point finds its child.
//!
//! A range search walks down from the root and skips every child whose box does not
//! intersect the query, so only the relevant part of the tree is visited.
//!
//! Every node carries its own reader/writer lock. Insertions lock one node at a time and
//! release it before descending, so threads working in different parts of the tree never
//! wait on each other.
//!
//! ## Using ntree
//!
//! ```
//! use ntree::prelude::*;
//!
//! // A 3-dimensional tree covering [-10, 10] in every dimension.
//! let tree = NTree::new([0.0; 3], [10.0; 3])?;
//!
//! std::thread::scope(|scope| {
//!     for t in 0..4 {
//!         let tree = &tree;
//!         scope.spawn(move || {
//!             for i in 0..100 {
//!                 let x = -9.0 + (t * 100 + i) as f64 * 0.045;
//!                 tree.insert(SpatialPoint::with_data([x, 0.0, 1.0], t * 100 + i))
//!                     .unwrap();
//!             }
//!         });
//!     }
//! });
//!
//! assert_eq!(tree.count(), 400);
//!
//! let found = tree.search(&[0.0, -1.0, 0.0], &[10.0, 1.0, 2.0])?;
//! assert!(found.iter().all(|p| p.coordinates()[0] >= 0.0));
//! # Ok::<(), ntree::Error>(())
//! ```
//!
//! Points are built from anything implementing [`Position`]. Arrays and vectors of floats are
//! supported out of the box; enable the `glam` or `ultraviolet` features to use the vector
//! types of those crates. The `parallel` feature adds [rayon](https://github.com/rayon-rs/rayon)
//! backed [`NTree::par_search`] and [`NTree::par_extend`].
//!
//! [`Position`]: point::Position

/// Error types.
pub mod error;
/// Implementations of [`Position`](point::Position) for vector math libraries.
mod impls;
/// Algorithms that use multiple CPU threads.
#[cfg(feature = "parallel")]
pub mod parallel;
/// Points stored in the tree.
pub mod point;
/// Tree and space partitioning implementation.
pub mod tree;

pub use error::{ConfigError, Error, Result};
pub use point::{Position, SpatialPoint};
pub use tree::{Bounds, NTree, NodeRef};

/// Maximum number of dimensions of an [`NTree`].
///
/// Child addressing uses one bit per dimension of a 64-bit word.
pub const MAX_DIMENSIONS: usize = 63;

/// Everything needed to use the crate.
pub mod prelude {
    pub use crate::error::{ConfigError, Error};
    pub use crate::point::{Position, SpatialPoint};
    pub use crate::tree::{Bounds, NTree, NodeRef};
    pub use crate::MAX_DIMENSIONS;
}
