//! Sample normalisation by the calibrated reference

// external crates
use log::{debug, trace};
use nalgebra::{DMatrix, DVector};
use ndarray::Array2;
use rayon::prelude::*;

// nrefl modules
use nrefl_events::{Coord, EventList, Masks};
use nrefl_units::BinEdges;

// internal modules
use crate::conversions::Z_INDEX_MASK;
use crate::error::{Error, Result};
use crate::types::{FootprintCorrectedData, IdealReferenceIntensity, QBins, ReflectivityOverQ, Sample};

/// Bin mask for Q bins without reference intensity
pub const NO_REFERENCE: &str = "no_reference";

/// Reflectivity curve of the sample
///
/// Unmasked sample events are histogrammed by their `Q`. The reference is
/// placed on the `Q` the sample has in each (`z_index`, wavelength) cell,
/// not on its own:
///
/// 1. the sample events are binned like the reference and averaged per cell
/// 2. `Q = (a + b z + c z^2) / wavelength` is fitted to those means by linear
///    least squares, over the cells the reference does not mask
/// 3. every unmasked reference cell is histogrammed at its fitted `Q`
///
/// The fit gives a `Q` to cells the sample never reached. The sample is then
/// divided by the reference, whose variances are ignored.
///
/// Bins that receive no reference intensity are masked [NO_REFERENCE] and
/// hold `NaN`. A sample without a single event to fit is
/// [Error::NoSampleQ].
pub fn reflectivity_over_q(
    sample: &FootprintCorrectedData<Sample>,
    reference: &IdealReferenceIntensity,
    q_bins: &QBins,
) -> Result<ReflectivityOverQ> {
    let edges = q_bins.to(Coord::Q.unit())?;
    let n = edges.n_bins();

    let (counts, count_variances) = sample
        .pixels()
        .par_iter()
        .enumerate()
        .filter(|(i, _)| !sample.is_masked(*i))
        .map(|(_, pixel)| q_histogram(&pixel.events, &edges))
        .try_reduce(
            || (vec![0.0; n], vec![0.0; n]),
            |a, b| Ok((add(a.0, &b.0), add(a.1, &b.1))),
        )?;

    let q = sample_q(sample, reference)?;
    let mask = reference.combined_mask();
    let mut norm = vec![0.0; n];
    for ((cell, value), q) in reference.values().indexed_iter().zip(q.iter()) {
        if mask[cell] || !value.is_finite() {
            continue;
        }
        if let Some(bin) = edges.find(*q) {
            norm[bin] += value;
        }
    }

    let missing = norm.iter().map(|v| *v == 0.0).collect::<Vec<bool>>();
    let values = counts
        .iter()
        .zip(&norm)
        .map(|(c, r)| if *r == 0.0 { f64::NAN } else { c / r })
        .collect();
    let variances = count_variances
        .iter()
        .zip(&norm)
        .map(|(v, r)| if *r == 0.0 { f64::NAN } else { v / (r * r) })
        .collect();

    let mut masks = Masks::new(n);
    debug!(
        "Reflectivity over {} Q bins, {} without reference",
        n,
        missing.iter().filter(|m| **m).count()
    );
    masks.insert(NO_REFERENCE, missing)?;

    Ok(ReflectivityOverQ {
        edges,
        values,
        variances,
        masks,
    })
}

/// Fitted sample `Q` of every reference cell
fn sample_q(
    sample: &FootprintCorrectedData<Sample>,
    reference: &IdealReferenceIntensity,
) -> Result<Array2<f64>> {
    let wavelength = reference.edges().to(Coord::Wavelength.unit())?;
    let grid = sample
        .concat_by_z_index(&[Z_INDEX_MASK])?
        .bin_wavelength(&wavelength)?;
    let mean_q = grid.mean(Coord::Q)?;

    let z_index = reference.z_index();
    let lambda = wavelength.midpoints();
    let mask = reference.combined_mask();

    // means of the sample cells matching an unmasked reference cell
    let mut points = Vec::new();
    for ((row, bin), masked) in mask.indexed_iter() {
        if *masked {
            continue;
        }
        let Ok(sample_row) = grid.z_index().binary_search(&z_index[row]) else {
            continue;
        };
        if grid.masks().is_masked(sample_row) {
            continue;
        }
        let q = mean_q[[sample_row, bin]];
        if q.is_finite() {
            points.push((z_index[row] as f64, lambda[bin], q));
        }
    }

    let fit = QModel::fit(&points)?;
    trace!("Sample Q fitted over {} cells: {fit:?}", points.len());
    Ok(Array2::from_shape_fn(reference.shape(), |(row, bin)| {
        fit.q(z_index[row] as f64, lambda[bin])
    }))
}

/// `Q = (a + b z + c z^2) / wavelength`, with `z` taken from its mean
#[derive(Debug, Clone, Copy, PartialEq)]
struct QModel {
    z_mean: f64,
    a: f64,
    b: f64,
    c: f64,
}

impl QModel {
    /// Least squares fit to (`z`, wavelength, `Q`) points
    ///
    /// Fewer points than parameters, or a single `z`, still give the
    /// minimum norm solution.
    fn fit(points: &[(f64, f64, f64)]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::NoSampleQ);
        }
        let z_mean = points.iter().map(|p| p.0).sum::<f64>() / points.len() as f64;

        let mut design = Vec::with_capacity(points.len() * 3);
        for (z, lambda, _) in points {
            let z = z - z_mean;
            design.extend_from_slice(&[1.0 / lambda, z / lambda, z * z / lambda]);
        }
        let design = DMatrix::from_row_slice(points.len(), 3, &design);
        let q = DVector::from_iterator(points.len(), points.iter().map(|p| p.2));

        let svd = design.svd(true, true);
        let eps = 1e-12 * svd.singular_values.max();
        let p = svd.solve(&q, eps).map_err(|_| Error::NoSampleQ)?;

        Ok(Self {
            z_mean,
            a: p[0],
            b: p[1],
            c: p[2],
        })
    }

    fn q(&self, z: f64, lambda: f64) -> f64 {
        let z = z - self.z_mean;
        (self.a + self.b * z + self.c * z * z) / lambda
    }
}

/// Sum unmasked weights and variances of a pixel over Q bins
fn q_histogram(events: &EventList, edges: &BinEdges) -> Result<(Vec<f64>, Vec<f64>)> {
    let n = edges.n_bins();
    let mut counts = vec![0.0; n];
    let mut variances = vec![0.0; n];

    let indices = events.unmasked_indices();
    if indices.is_empty() {
        return Ok((counts, variances));
    }

    let q = events.coord(Coord::Q)?;
    for i in indices {
        if let Some(bin) = edges.find(q[i]) {
            counts[bin] += events.weights()[i];
            variances[bin] += events.variances()[i];
        }
    }
    Ok((counts, variances))
}

fn add(mut a: Vec<f64>, b: &[f64]) -> Vec<f64> {
    a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
    a
}
