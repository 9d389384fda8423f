use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt {
    /// Check the slice can be used as a set of histogram bin edges
    ///
    /// Requires at least two finite values, each strictly greater than the
    /// last.
    ///
    /// ```rust
    /// # use nrefl_utils::{Error, SliceExt};
    /// assert!([0.0, 0.1, 1.0].check_edges().is_ok());
    ///
    /// assert_eq!(
    ///     [0.0, 1.0, 1.0].check_edges(),
    ///     Err(Error::NotStrictlyIncreasing { index: 1, lower: 1.0, upper: 1.0 })
    /// );
    /// assert!([2.0].check_edges().is_err());
    /// ```
    fn check_edges(&self) -> Result<()>;

    /// Find index bin containing 'value', where bins are low <= value < high
    ///
    /// Every bin is half-open, including the last one. A value on the final
    /// upper edge is therefore outside of the histogram, the same as any value
    /// below the first edge or a NaN.
    ///
    /// Edges are assumed to be strictly increasing (see
    /// [check_edges](SliceExt::check_edges)), which allows a binary search.
    ///
    /// ```rust
    /// # use nrefl_utils::SliceExt;
    /// let edges = vec![1.0, 2.0, 4.0, 8.0];
    ///
    /// assert_eq!(edges.find_bin(1.0), Some(0));
    /// assert_eq!(edges.find_bin(3.9), Some(1));
    /// assert_eq!(edges.find_bin(4.0), Some(2));
    ///
    /// // Outside of the edges
    /// assert_eq!(edges.find_bin(0.5), None);
    /// assert_eq!(edges.find_bin(8.0), None);
    /// assert_eq!(edges.find_bin(f64::NAN), None);
    /// ```
    fn find_bin(&self, value: f64) -> Option<usize>;

    /// Centre points between consecutive values
    ///
    /// ```rust
    /// # use nrefl_utils::SliceExt;
    /// assert_eq!([0.0, 1.0, 3.0].midpoints(), vec![0.5, 2.0]);
    /// ```
    fn midpoints(&self) -> Vec<f64>;
}

impl SliceExt for [f64] {
    fn check_edges(&self) -> Result<()> {
        if self.len() < 2 {
            return Err(Error::BelowMinimumSliceLength {
                length: self.len(),
                minimum_required: 2,
            });
        }

        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        }

        match self.windows(2).position(|w| w[0] >= w[1]) {
            Some(index) => Err(Error::NotStrictlyIncreasing {
                index,
                lower: self[index],
                upper: self[index + 1],
            }),
            None => Ok(()),
        }
    }

    fn find_bin(&self, value: f64) -> Option<usize> {
        let (first, last) = (self.first()?, self.last()?);

        // comparisons with NaN are always false, so it falls through here too
        if !(*first <= value && value < *last) {
            return None;
        }

        // number of edges <= value, the bin is the one below that edge
        Some(self.partition_point(|edge| *edge <= value) - 1)
    }

    fn midpoints(&self) -> Vec<f64> {
        self.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}
