use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Check that every value is finite and larger than the one before it
    ///
    /// Single-value and empty slices are trivially increasing. Any NAN or
    /// infinite values fail the check.
    ///
    /// ```rust
    /// # use ptools_utils::SliceExt;
    /// assert!([0.1, 0.5, 2.2].is_strictly_increasing());
    /// assert!(!([0.1, 0.5, 0.5].is_strictly_increasing()));
    /// assert!(!([0.1, f64::NAN, 2.2].is_strictly_increasing()));
    /// ```
    fn is_strictly_increasing(&self) -> bool;

    /// Find the index of the interval containing `value`
    ///
    /// Intervals are `low <= value < high` over a sorted slice of edges. A
    /// value exactly on the highest edge is considered part of the last
    /// interval, so every value within the overall bounds has a home.
    ///
    /// ```rust
    /// # use ptools_utils::SliceExt;
    /// let edges = vec![0.1, 1.0, 10.0, 20.0];
    ///
    /// assert_eq!(edges.find_interval(0.1), Ok(0));
    /// assert_eq!(edges.find_interval(1.0), Ok(1));
    /// assert_eq!(edges.find_interval(20.0), Ok(2));
    ///
    /// // Values outside the edge bounds are an error case
    /// assert!(edges.find_interval(0.0).is_err());
    /// assert!(edges.find_interval(21.0).is_err());
    /// ```
    fn find_interval(&self, value: T) -> Result<usize>;
}

impl SliceExt<f64> for [f64] {
    fn is_strictly_increasing(&self) -> bool {
        self.iter().all(|v| v.is_finite()) && self.windows(2).all(|w| w[0] < w[1])
    }

    fn find_interval(&self, value: f64) -> Result<usize> {
        // make sure there are enough edges to form an interval
        let n = self.len();
        if n < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: n,
                minimum_required: 2,
            });
        }

        let lower_bound = self[0];
        let upper_bound = self[n - 1];

        // is the value relevant?
        if value < lower_bound || value > upper_bound {
            return Err(Error::ValueOutsideOfBounds {
                value,
                lower_bound,
                upper_bound,
            });
        }

        // special case for being on the upper edge
        if value == upper_bound {
            return Ok(n - 2);
        }

        // first edge strictly above the value closes the interval
        let idx = self.partition_point(|edge| *edge <= value);
        Ok(idx - 1)
    }
}
