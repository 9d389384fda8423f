//! Supermirror reflectivity model

// external crates
use log::debug;

// nrefl modules
use nrefl_events::Coord;
use nrefl_units::Unit;

// internal modules
use crate::error::Result;
use crate::types::{
    Alpha, CriticalEdge, MValue, ReferenceIntensity, SupermirrorReflectivityCorrection,
};

/// Reflectivity of a supermirror at momentum transfer `q`
///
/// Total reflection up to the critical edge `c`, then a linear decrease with
/// slope `alpha` below the cut-off `m * c`. From the cut-off on the
/// reflectivity is not known and `NaN` is returned, as it is for a `NaN`
/// input.
///
/// `q` and `c` share an inverse length unit and `alpha` is in the matching
/// length unit.
///
/// ```rust
/// # use nrefl_reflectometry::supermirror_reflectivity;
/// assert_eq!(supermirror_reflectivity(0.01, 0.022, 5.0, 2.5), 1.0);
/// assert!((supermirror_reflectivity(0.032, 0.022, 5.0, 2.5) - 0.975).abs() < 1e-12);
/// assert!(supermirror_reflectivity(0.2, 0.022, 5.0, 2.5).is_nan());
/// ```
pub fn supermirror_reflectivity(q: f64, critical_edge: f64, m_value: f64, alpha: f64) -> f64 {
    if q.is_nan() || q >= m_value * critical_edge {
        f64::NAN
    } else if q < critical_edge {
        1.0
    } else {
        1.0 - alpha * (q - critical_edge)
    }
}

/// Inverse supermirror reflectivity at the `Q` of every reference cell
///
/// Cells at or beyond the supermirror cut-off get a `NaN` factor.
pub fn calibration_factor(
    intensity: &ReferenceIntensity,
    m_value: &MValue,
    critical_edge: &CriticalEdge,
    alpha: &Alpha,
) -> Result<SupermirrorReflectivityCorrection> {
    let c = critical_edge.0.value_in(Unit::InverseAngstrom)?;
    let alpha = alpha.0.value_in(Unit::Angstrom)?;
    let m = m_value.0;

    let q = intensity.coord(Coord::Q)?;
    let factors = q.mapv(|q| 1.0 / supermirror_reflectivity(q, c, m, alpha));

    debug!(
        "Supermirror correction with m = {m}, critical edge {}, {} cells beyond the cut-off",
        critical_edge.0,
        factors.iter().filter(|f| f.is_nan()).count()
    );
    Ok(SupermirrorReflectivityCorrection::per_cell(
        intensity.z_index().to_vec(),
        intensity.edges().clone(),
        factors,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use ndarray::array;
    use nrefl_events::Histogram;
    use nrefl_units::{BinEdges, Quantity};

    fn intensity(q: [f64; 3]) -> ReferenceIntensity {
        let edges = BinEdges::new(vec![2.0, 3.0, 4.0, 5.0], Unit::Angstrom).unwrap();
        let mut hist =
            Histogram::new(vec![0], edges, array![[1.0, 1.0, 1.0]], array![[1.0, 1.0, 1.0]])
                .unwrap();
        hist.insert_coord(Coord::Q, array![[q[0], q[1], q[2]]]).unwrap();
        ReferenceIntensity(hist)
    }

    fn parameters() -> (MValue, CriticalEdge, Alpha) {
        (
            MValue(5.0),
            CriticalEdge(Quantity::new(0.022, Unit::InverseAngstrom)),
            Alpha(Quantity::new(0.25 / 0.088, Unit::Angstrom)),
        )
    }

    #[test]
    fn factors_are_inverse_reflectivity() {
        let (m, c, alpha) = parameters();
        let correction = calibration_factor(&intensity([0.01, 0.05, 0.5]), &m, &c, &alpha).unwrap();
        let factors = correction.factors();

        assert_eq!(factors[[0, 0]], 1.0);
        let expected = 1.0 / (1.0 - 0.25 / 0.088 * (0.05 - 0.022));
        assert!((factors[[0, 1]] - expected).abs() < 1e-12);
        assert!(factors[[0, 2]].is_nan());
        assert_eq!(correction.z_index(), Some(&[0][..]));
        assert_eq!(correction.edges().values(), &[2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn linear_above_critical_edge() {
        let r = supermirror_reflectivity(0.1, 0.022, 5.0, 2.0);
        assert!((r - (1.0 - 2.0 * 0.078)).abs() < 1e-12);
    }

    #[test]
    fn cut_off_is_exclusive() {
        let (c, m) = (0.02, 4.0);
        assert!(supermirror_reflectivity(m * c, c, m, 2.0).is_nan());
        let below = supermirror_reflectivity(0.0799, c, m, 2.0);
        assert!((below - (1.0 - 2.0 * 0.0599)).abs() < 1e-12);
        assert_eq!(supermirror_reflectivity(c, c, m, 2.0), 1.0);
    }

    #[test]
    fn alpha_must_be_a_length() {
        let (m, c, _) = parameters();
        let alpha = Alpha(Quantity::new(1.0, Unit::Radian));
        assert!(matches!(
            calibration_factor(&intensity([0.01, 0.02, 0.03]), &m, &c, &alpha),
            Err(Error::Units(_))
        ));
    }
}
