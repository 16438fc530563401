//! Uniform grid discretization of continuous sensor readings

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{GridCell, SENSOR_DIMS, SensorState},
};

/// Uniform grid over the three sensor dimensions.
///
/// Each dimension `i` is split into `bins[i]` equal-width bins covering the
/// closed interval `ranges[i]`. Readings outside the interval are clipped to
/// the nearest bound, so every reading maps to a valid cell.
///
/// The grid is validated once at construction; [`StateGrid::discretize`] is
/// then infallible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridSpec", into = "GridSpec")]
pub struct StateGrid {
    bins: [usize; SENSOR_DIMS],
    ranges: [(f64, f64); SENSOR_DIMS],
}

/// Unvalidated wire form of a [`StateGrid`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GridSpec {
    bins: [usize; SENSOR_DIMS],
    ranges: [(f64, f64); SENSOR_DIMS],
}

impl StateGrid {
    /// Create a grid from bin counts and `(low, high)` ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBinCount`] for a zero bin count and
    /// [`Error::DegenerateRange`] when a range is not finite or has
    /// `high <= low`, and [`Error::InvalidConfiguration`] when the total
    /// cell count overflows `usize`.
    pub fn new(bins: [usize; SENSOR_DIMS], ranges: [(f64, f64); SENSOR_DIMS]) -> Result<Self> {
        for (dimension, (&count, &(low, high))) in bins.iter().zip(ranges.iter()).enumerate() {
            if count == 0 {
                return Err(Error::InvalidBinCount { dimension });
            }
            if !low.is_finite() || !high.is_finite() || high <= low {
                return Err(Error::DegenerateRange {
                    dimension,
                    low,
                    high,
                });
            }
        }
        if bins
            .iter()
            .try_fold(1usize, |acc, &count| acc.checked_mul(count))
            .is_none()
        {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "grid of {}x{}x{} bins has more cells than can be addressed",
                    bins[0], bins[1], bins[2]
                ),
            });
        }
        Ok(Self { bins, ranges })
    }

    pub fn bins(&self) -> [usize; SENSOR_DIMS] {
        self.bins
    }

    pub fn ranges(&self) -> [(f64, f64); SENSOR_DIMS] {
        self.ranges
    }

    /// Number of distinct cells in the grid.
    ///
    /// Cannot overflow: construction rejects grids whose product does.
    pub fn cell_count(&self) -> usize {
        self.bins.iter().product()
    }

    /// Map a reading to its grid cell.
    pub fn discretize(&self, state: &SensorState) -> GridCell {
        let mut indices = [0; SENSOR_DIMS];
        for (dim, index) in indices.iter_mut().enumerate() {
            *index = self.bin_index(dim, state.values()[dim]);
        }
        GridCell::new(indices)
    }

    /// Row-major offset of a cell, i.e. its position in a
    /// `bins[0] x bins[1] x bins[2]` array.
    pub fn flat_offset(&self, cell: GridCell) -> usize {
        let [i, j, k] = cell.indices();
        (i * self.bins[1] + j) * self.bins[2] + k
    }

    fn bin_index(&self, dim: usize, value: f64) -> usize {
        let (low, high) = self.ranges[dim];
        let bins = self.bins[dim];

        // NaN carries no position information; treat it as the lower bound
        let clipped = if value.is_nan() {
            low
        } else {
            value.clamp(low, high)
        };
        let bin_width = (high - low) / bins as f64;
        let index = ((clipped - low) / bin_width).floor() as usize;

        // value == high lands one past the last bin
        if index >= bins { bins - 1 } else { index }
    }
}

impl Default for StateGrid {
    fn default() -> Self {
        Self {
            bins: [10, 10, 10],
            ranges: [(0.0, 40.0), (0.0, 20.0), (0.0, 20.0)],
        }
    }
}

impl TryFrom<GridSpec> for StateGrid {
    type Error = Error;

    fn try_from(spec: GridSpec) -> Result<Self> {
        StateGrid::new(spec.bins, spec.ranges)
    }
}

impl From<StateGrid> for GridSpec {
    fn from(grid: StateGrid) -> Self {
        GridSpec {
            bins: grid.bins,
            ranges: grid.ranges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(state: (f64, f64, f64)) -> [usize; 3] {
        StateGrid::default()
            .discretize(&SensorState::from(state))
            .indices()
    }

    #[test]
    fn test_upper_bound_maps_to_last_bin() {
        assert_eq!(cell((40.0, 20.0, 20.0)), [9, 9, 9]);
    }

    #[test]
    fn test_lower_bound_maps_to_first_bin() {
        assert_eq!(cell((0.0, 0.0, 0.0)), [0, 0, 0]);
    }

    #[test]
    fn test_out_of_range_is_clipped() {
        assert_eq!(cell((41.0, -5.0, 25.0)), cell((40.0, 0.0, 20.0)));
        assert_eq!(cell((1e9, -1e9, f64::INFINITY)), [9, 0, 9]);
    }

    #[test]
    fn test_interior_values() {
        // bin widths are 4.0, 2.0, 2.0
        assert_eq!(cell((3.99, 2.0, 19.99)), [0, 1, 9]);
        assert_eq!(cell((20.0, 10.5, 5.0)), [5, 5, 2]);
    }

    #[test]
    fn test_nan_maps_to_first_bin() {
        assert_eq!(cell((f64::NAN, 10.0, 10.0)), [0, 5, 5]);
    }

    #[test]
    fn test_flat_offset_is_row_major() {
        let grid = StateGrid::new([2, 3, 4], [(0.0, 1.0); 3]).unwrap();
        let last = grid.discretize(&SensorState::new(1.0, 1.0, 1.0));
        assert_eq!(grid.flat_offset(last), 23);

        let middle = grid.discretize(&SensorState::new(0.9, 0.0, 0.3));
        assert_eq!(middle.indices(), [1, 0, 1]);
        assert_eq!(grid.flat_offset(middle), 13);
    }

    #[test]
    fn test_rejects_zero_bins() {
        let err = StateGrid::new([10, 0, 10], [(0.0, 1.0); 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidBinCount { dimension: 1 }));
    }

    #[test]
    fn test_rejects_degenerate_range() {
        let err = StateGrid::new([10; 3], [(0.0, 1.0), (0.0, 1.0), (5.0, 5.0)]).unwrap_err();
        assert!(matches!(err, Error::DegenerateRange { dimension: 2, .. }));

        let err = StateGrid::new([10; 3], [(0.0, f64::NAN), (0.0, 1.0), (0.0, 1.0)]).unwrap_err();
        assert!(matches!(err, Error::DegenerateRange { dimension: 0, .. }));
    }

    #[test]
    fn test_rejects_grid_too_large_to_address() {
        let err = StateGrid::new([1 << 32, 1 << 32, 2], [(0.0, 1.0); 3]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));

        let json = format!(
            r#"{{"bins":[{big},{big},2],"ranges":[[0,1],[0,1],[0,1]]}}"#,
            big = 1u64 << 32
        );
        assert!(serde_json::from_str::<StateGrid>(&json).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"bins":[10,10,10],"ranges":[[0.0,40.0],[0.0,20.0],[3.0,1.0]]}"#;
        assert!(serde_json::from_str::<StateGrid>(json).is_err());

        let json = r#"{"bins":[10,10,10],"ranges":[[0.0,40.0],[0.0,20.0],[0.0,20.0]]}"#;
        let grid: StateGrid = serde_json::from_str(json).unwrap();
        assert_eq!(grid, StateGrid::default());
    }
}
