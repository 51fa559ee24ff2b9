use crate::{error::ConfigError, MAX_DIMENSIONS};

/// An axis-aligned hyper-rectangle described by its center and its half-extent in every
/// dimension.
///
/// The covered volume in dimension `i` is `center[i] - half_extent[i]..=center[i] +
/// half_extent[i]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    center: Box<[f64]>,
    half_extent: Box<[f64]>,
}

impl Bounds {
    /// Creates new [`Bounds`] from the given center and half-extent.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the lengths differ, if there are no dimensions or more
    /// than [`MAX_DIMENSIONS`], if a half-extent is not strictly positive and finite, or if a
    /// center coordinate is not finite.
    pub fn new(
        center: impl Into<Vec<f64>>,
        half_extent: impl Into<Vec<f64>>,
    ) -> Result<Self, ConfigError> {
        let center = center.into();
        let half_extent = half_extent.into();

        if center.len() > MAX_DIMENSIONS {
            return Err(ConfigError::TooManyDimensions(center.len()));
        }
        if center.len() != half_extent.len() {
            return Err(ConfigError::MismatchedLengths {
                center: center.len(),
                half_extent: half_extent.len(),
            });
        }
        if center.is_empty() {
            return Err(ConfigError::ZeroDimensions);
        }
        for (dimension, &value) in half_extent.iter().enumerate() {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::InvalidBound { dimension, value });
            }
        }
        for (dimension, &value) in center.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::InvalidCenter { dimension, value });
            }
        }

        Ok(Self {
            center: center.into_boxed_slice(),
            half_extent: half_extent.into_boxed_slice(),
        })
    }

    /// Creates new [`Bounds`] spanning the given minimum and maximum corners.
    ///
    /// # Errors
    ///
    /// Same as [`Bounds::new`]; a corner pair with `min[i] >= max[i]` yields an
    /// [`InvalidBound`](ConfigError::InvalidBound).
    pub fn from_corners(min: &[f64], max: &[f64]) -> Result<Self, ConfigError> {
        if min.len() != max.len() {
            return Err(ConfigError::MismatchedLengths {
                center: min.len(),
                half_extent: max.len(),
            });
        }

        let center = min
            .iter()
            .zip(max)
            .map(|(min, max)| min + (max - min) / 2.0)
            .collect::<Vec<_>>();
        let half_extent = min
            .iter()
            .zip(max)
            .map(|(min, max)| (max - min) / 2.0)
            .collect::<Vec<_>>();

        Self::new(center, half_extent)
    }

    /// Returns the number of dimensions of these [`Bounds`].
    #[inline]
    pub fn dimensions(&self) -> usize {
        self.center.len()
    }

    /// Returns the center.
    #[inline]
    pub fn center(&self) -> &[f64] {
        &self.center
    }

    /// Returns the half-extent in every dimension.
    #[inline]
    pub fn half_extent(&self) -> &[f64] {
        &self.half_extent
    }

    /// Returns the minimum corner.
    #[inline]
    pub fn min(&self) -> Vec<f64> {
        self.center
            .iter()
            .zip(self.half_extent.iter())
            .map(|(c, h)| c - h)
            .collect()
    }

    /// Returns the maximum corner.
    #[inline]
    pub fn max(&self) -> Vec<f64> {
        self.center
            .iter()
            .zip(self.half_extent.iter())
            .map(|(c, h)| c + h)
            .collect()
    }

    /// Returns the minimum and maximum corners.
    #[inline]
    pub fn corners(&self) -> (Vec<f64>, Vec<f64>) {
        (self.min(), self.max())
    }

    /// Returns true if the given coordinates lie inside these [`Bounds`], boundaries included.
    ///
    /// Coordinates are compared pairwise, so extra or missing dimensions are not detected
    /// here.
    #[inline]
    pub fn contains(&self, coordinates: &[f64]) -> bool {
        coordinates
            .iter()
            .zip(self.center.iter().zip(self.half_extent.iter()))
            .all(|(&x, (&c, &h))| c - h <= x && x <= c + h)
    }

    /// Returns true if these [`Bounds`] overlap the closed box between `lower` and `upper`.
    #[inline]
    pub fn intersects(&self, lower: &[f64], upper: &[f64]) -> bool {
        lower
            .iter()
            .zip(upper)
            .zip(self.center.iter().zip(self.half_extent.iter()))
            .all(|((&lo, &hi), (&c, &h))| !(c + h < lo || c - h > hi))
    }

    /// Returns the index of the orthant the given coordinates fall in.
    ///
    /// Bit `j` of the index is set when the coordinate is strictly above the center in
    /// dimension `j`.
    #[inline]
    pub fn child_index(&self, coordinates: &[f64]) -> usize {
        coordinates
            .iter()
            .zip(self.center.iter())
            .enumerate()
            .fold(0, |index, (j, (x, c))| index | (usize::from(x > c) << j))
    }

    /// Returns the number of orthants these [`Bounds`] divide into, or `None` if `2^N`
    /// does not fit in a `usize`.
    #[inline]
    pub fn orthant_count(&self) -> Option<usize> {
        u32::try_from(self.dimensions())
            .ok()
            .and_then(|n| 1usize.checked_shl(n))
    }

    /// Returns the [`Bounds`] of the orthant at the given index.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidBound`](ConfigError::InvalidBound) once halving the half-extent
    /// underflows to zero.
    pub fn orthant(&self, index: usize) -> Result<Self, ConfigError> {
        let mut center = Vec::with_capacity(self.dimensions());
        let mut half_extent = Vec::with_capacity(self.dimensions());

        for j in 0..self.dimensions() {
            let half = self.half_extent[j] / 2.0;
            if index & (1 << j) == 0 {
                center.push(self.center[j] - half);
            } else {
                center.push(self.center[j] + half);
            }
            half_extent.push(half);
        }

        Self::new(center, half_extent)
    }

    /// Returns an iterator over the [`Bounds`] of every orthant, in index order.
    #[inline]
    pub fn orthants(&self) -> impl Iterator<Item = Result<Self, ConfigError>> + '_ {
        (0..self.orthant_count().unwrap_or(0)).map(|i| self.orthant(i))
    }
}
