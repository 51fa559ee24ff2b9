/// Trait to retrieve the coordinates of a position in N-dimensional space.
///
/// Implemented for arrays, slices and vectors of `f32` and `f64`. Enable the `glam` or
/// `ultraviolet` features for implementations on the vector types of those crates.
///
/// # Example
///
/// ```
/// # use ntree::prelude::*;
/// struct Star {
///     x: f64,
///     y: f64,
/// }
///
/// impl Position for Star {
///     fn coordinates(&self) -> Vec<f64> {
///         vec![self.x, self.y]
///     }
/// }
///
/// let point = SpatialPoint::with_data(Star { x: 1.0, y: -2.0 }, "sirius");
/// assert_eq!(point.coordinates(), &[1.0, -2.0]);
/// ```
pub trait Position {
    /// Returns the coordinates of this position, one per dimension.
    fn coordinates(&self) -> Vec<f64>;
}

impl<const D: usize> Position for [f64; D] {
    #[inline]
    fn coordinates(&self) -> Vec<f64> {
        self.to_vec()
    }
}

impl<const D: usize> Position for [f32; D] {
    #[inline]
    fn coordinates(&self) -> Vec<f64> {
        self.iter().copied().map(f64::from).collect()
    }
}

impl Position for [f64] {
    #[inline]
    fn coordinates(&self) -> Vec<f64> {
        self.to_vec()
    }
}

impl Position for Vec<f64> {
    #[inline]
    fn coordinates(&self) -> Vec<f64> {
        self.clone()
    }
}

impl<P: Position + ?Sized> Position for &P {
    #[inline]
    fn coordinates(&self) -> Vec<f64> {
        P::coordinates(self)
    }
}

/// A point stored in the leaves of an [`NTree`](crate::tree::NTree).
///
/// The coordinates are fixed at construction. The optional `data` is owned by the point and
/// never touched by the tree.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialPoint<T = ()> {
    coordinates: Box<[f64]>,
    data: Option<T>,
}

impl<T> SpatialPoint<T> {
    /// Creates a new [`SpatialPoint`] without data.
    #[inline]
    pub fn new<P: Position>(position: P) -> Self {
        Self {
            coordinates: position.coordinates().into_boxed_slice(),
            data: None,
        }
    }

    /// Creates a new [`SpatialPoint`] carrying the given data.
    #[inline]
    pub fn with_data<P: Position>(position: P, data: T) -> Self {
        Self {
            coordinates: position.coordinates().into_boxed_slice(),
            data: Some(data),
        }
    }

    /// Returns the coordinates of this point.
    #[inline]
    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    /// Returns the number of dimensions of this point.
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.coordinates.len()
    }

    /// Returns a reference to the data of this point, if any.
    #[inline]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consumes the point and returns its data, if any.
    #[inline]
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> AsRef<[f64]> for SpatialPoint<T> {
    #[inline]
    fn as_ref(&self) -> &[f64] {
        &self.coordinates
    }
}

impl<T> Position for SpatialPoint<T> {
    #[inline]
    fn coordinates(&self) -> Vec<f64> {
        self.coordinates.to_vec()
    }
}
