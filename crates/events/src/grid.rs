// external crates
use ndarray::Array2;

// nrefl modules
use nrefl_units::BinEdges;

// internal modules
use crate::coord::Coord;
use crate::error::{Error, Result};
use crate::event_list::EventList;
use crate::histogram::Histogram;
use crate::masks::Masks;

/// Events binned over (`z_index`, wavelength)
///
/// Each cell holds the [EventList] of events that fall in it. Row masks from
/// the `z_index` grouping are kept and become histogram masks in [hist].
///
/// [hist]: EventGrid::hist
#[derive(Debug, Clone, PartialEq)]
pub struct EventGrid {
    z_index: Vec<u32>,
    edges: BinEdges,
    cells: Array2<EventList>,
    masks: Masks,
}

impl EventGrid {
    /// New grid from row-major cells
    pub fn new(
        z_index: Vec<u32>,
        edges: BinEdges,
        cells: Vec<EventList>,
        masks: Masks,
    ) -> Result<Self> {
        let shape = (z_index.len(), edges.n_bins());
        if masks.len() != shape.0 {
            return Err(Error::LengthMismatch {
                name: "row masks".to_string(),
                expected: shape.0,
                found: masks.len(),
            });
        }
        let found = cells.len();
        let cells = Array2::from_shape_vec(shape, cells).map_err(|_| Error::ShapeMismatch {
            name: "event grid".to_string(),
            expected: shape,
            found: (found, 1),
        })?;
        Ok(Self {
            z_index,
            edges,
            cells,
            masks,
        })
    }

    /// The `z_index` of every row
    pub fn z_index(&self) -> &[u32] {
        &self.z_index
    }

    /// Wavelength bin edges
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    /// Events in every cell
    pub fn cells(&self) -> &Array2<EventList> {
        &self.cells
    }

    /// Row masks
    pub fn masks(&self) -> &Masks {
        &self.masks
    }

    /// (`z_index` rows, wavelength bins)
    pub fn shape(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// Sum unmasked weights and variances in every cell
    ///
    /// Row masks are broadcast along wavelength. Masked rows are still summed,
    /// the mask only flags them.
    ///
    /// ```rust
    /// # use nrefl_events::{Coord, EventList, ZGroups};
    /// # use nrefl_units::{BinEdges, Unit};
    /// let row = EventList::new(vec![1.0, 2.0, 4.0], vec![1.0, 1.0, 1.0])
    ///     .unwrap()
    ///     .with_coord(Coord::Wavelength, vec![3.0, 3.5, 5.0])
    ///     .unwrap();
    /// let grid = ZGroups::new(vec![0], vec![row])
    ///     .unwrap()
    ///     .bin_wavelength(&BinEdges::new(vec![2.0, 4.0, 6.0], Unit::Angstrom).unwrap())
    ///     .unwrap();
    ///
    /// let hist = grid.hist().unwrap();
    /// assert_eq!(hist.values()[[0, 0]], 3.0);
    /// assert_eq!(hist.variances()[[0, 0]], 2.0);
    /// assert_eq!(hist.values()[[0, 1]], 4.0);
    /// ```
    pub fn hist(&self) -> Result<Histogram> {
        let values = self.cells.map(|cell| cell.total_weight());
        let variances = self.cells.map(|cell| {
            cell.unmasked_indices()
                .into_iter()
                .map(|i| cell.variances()[i])
                .sum::<f64>()
        });

        let mut hist = Histogram::new(
            self.z_index.clone(),
            self.edges.clone(),
            values,
            variances,
        )?;

        let shape = self.shape();
        for (name, layer) in self.masks.iter() {
            let mask = Array2::from_shape_fn(shape, |(i, _)| layer[i]);
            hist.insert_mask(name, mask)?;
        }
        Ok(hist)
    }

    /// Mean of a coordinate over the unmasked events of every cell
    ///
    /// Cells without any unmasked event get `NaN`.
    ///
    /// ```rust
    /// # use nrefl_events::{Coord, EventList, ZGroups};
    /// # use nrefl_units::{BinEdges, Unit};
    /// let row = EventList::from_counts(vec![1.0, 1.0, 1.0])
    ///     .with_coord(Coord::Wavelength, vec![3.0, 3.1, 3.2])
    ///     .unwrap()
    ///     .with_coord(Coord::Q, vec![0.01, 0.02, 0.06])
    ///     .unwrap();
    /// let grid = ZGroups::new(vec![0], vec![row])
    ///     .unwrap()
    ///     .bin_wavelength(&BinEdges::new(vec![2.0, 4.0, 6.0], Unit::Angstrom).unwrap())
    ///     .unwrap();
    ///
    /// let q = grid.mean(Coord::Q).unwrap();
    /// assert!((q[[0, 0]] - 0.03).abs() < 1e-12);
    /// assert!(q[[0, 1]].is_nan());
    /// ```
    pub fn mean(&self, coord: Coord) -> Result<Array2<f64>> {
        self.try_map_cells(|cell| {
            let values = unmasked_values(cell, coord)?;
            Ok(mean(&values))
        })
    }

    /// Standard deviation over mean of a coordinate in every cell
    ///
    /// `NaN` wherever the ratio is undefined: no unmasked events or a zero
    /// mean.
    pub fn relative_spread(&self, coord: Coord) -> Result<Array2<f64>> {
        self.try_map_cells(|cell| {
            let values = unmasked_values(cell, coord)?;
            let mean = mean(&values);
            if values.is_empty() || mean == 0.0 {
                return Ok(f64::NAN);
            }
            let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
                / values.len() as f64;
            Ok((variance.sqrt() / mean).abs())
        })
    }

    fn try_map_cells<F>(&self, f: F) -> Result<Array2<f64>>
    where
        F: Fn(&EventList) -> Result<f64>,
    {
        let values = self
            .cells
            .iter()
            .map(f)
            .collect::<Result<Vec<f64>>>()?;
        let shape = self.shape();
        Array2::from_shape_vec(shape, values).map_err(|_| Error::ShapeMismatch {
            name: "cell reduction".to_string(),
            expected: shape,
            found: (self.cells.len(), 1),
        })
    }
}

/// Values of `coord` for the unmasked events of a cell
///
/// An empty cell may not carry any coordinate, so it is only looked up when
/// there is something to read.
fn unmasked_values(cell: &EventList, coord: Coord) -> Result<Vec<f64>> {
    let indices = cell.unmasked_indices();
    if indices.is_empty() {
        return Ok(Vec::new());
    }
    let column = cell.coord(coord)?;
    Ok(indices.into_iter().map(|i| column[i]).collect())
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
