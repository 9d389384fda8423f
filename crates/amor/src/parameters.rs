//! Instrument settings of a reduction

// standard library
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// external crates
use log::debug;
use serde::{Deserialize, Serialize};

// nrefl modules
use nrefl_reflectometry::{
    for_each_role, Alpha, BeamSize, CriticalEdge, MValue, QBins, QTolerance, Role, RoleVisitor,
    SamplePosition, SampleSize, WavelengthBins, YIndexLimits, ZIndexLimits,
};
use nrefl_units::{BinEdges, Quantity, Unit, VectorQuantity};
use nrefl_workflow::Pipeline;

// internal modules
use crate::error::Result;
use crate::types::{Chopper1Position, Chopper2Position, DetectorSpatialResolution};

/// How a set of bin edges is described in a parameter file
///
/// ```rust
/// # use nrefl_amor::Binning;
/// let binning: Binning = serde_json::from_str(
///     r#"{ "geomspace": { "start": 1.0, "stop": 100.0, "num": 3, "unit": "angstrom" } }"#,
/// )
/// .unwrap();
/// assert_eq!(binning.edges().unwrap().n_bins(), 2);
///
/// let binning: Binning = serde_json::from_str(
///     r#"{ "edges": { "values": [0.01, 0.02, 0.05], "unit": "1/angstrom" } }"#,
/// )
/// .unwrap();
/// assert_eq!(binning.edges().unwrap().upper(), 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binning {
    /// `num` logarithmically spaced edges from `start` to `stop`
    Geomspace {
        start: f64,
        stop: f64,
        num: usize,
        unit: Unit,
    },
    /// `num` evenly spaced edges from `start` to `stop`
    Linspace {
        start: f64,
        stop: f64,
        num: usize,
        unit: Unit,
    },
    /// Explicit edge values
    Edges(BinEdges),
}

impl Binning {
    /// Build the bin edges
    pub fn edges(&self) -> Result<BinEdges> {
        let edges = match self {
            Self::Geomspace {
                start,
                stop,
                num,
                unit,
            } => BinEdges::geomspace(*start, *stop, *num, *unit)?,
            Self::Linspace {
                start,
                stop,
                num,
                unit,
            } => BinEdges::linspace(*start, *stop, *num, *unit)?,
            Self::Edges(edges) => edges.clone(),
        };
        Ok(edges)
    }
}

/// Everything needed to reduce an Amor experiment apart from the event data
///
/// The same beam, sample and chopper settings are used for both runs. Fields
/// missing from a parameter file keep their default value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmorParameters {
    /// Full width at half maximum of the beam
    pub beam_size: Quantity,
    /// Length of the sample along the beam
    pub sample_size: Quantity,
    /// Position of the first chopper
    pub chopper1_position: VectorQuantity,
    /// Position of the second chopper
    pub chopper2_position: VectorQuantity,
    /// Position of the sample
    pub sample_position: VectorQuantity,
    /// Full width at half maximum of the detector position resolution
    pub detector_spatial_resolution: Quantity,
    /// Supermirror m-value
    pub m_value: f64,
    /// Critical edge of the supermirror
    pub critical_edge: Quantity,
    /// Reflectivity slope of the supermirror above the critical edge
    pub alpha: Quantity,
    /// Wavelength bins of the reference intensity
    pub wavelength_bins: Binning,
    /// Q bins of the reflectivity curve
    pub q_bins: Binning,
    /// Inclusive `y_index` range of the detector region of interest
    pub y_index_limits: [u32; 2],
    /// Inclusive `z_index` range of the detector region of interest
    pub z_index_limits: [u32; 2],
    /// Largest relative Q spread accepted in a reference cell
    pub q_tolerance: Option<f64>,
}

impl Default for AmorParameters {
    fn default() -> Self {
        Self {
            beam_size: Quantity::new(2.0, Unit::Millimetre),
            sample_size: Quantity::new(10.0, Unit::Millimetre),
            chopper1_position: VectorQuantity::new(0.0, 0.0, -15.5, Unit::Metre),
            chopper2_position: VectorQuantity::new(0.0, 0.0, -14.5, Unit::Metre),
            sample_position: VectorQuantity::new(0.0, 0.0, 0.0, Unit::Metre),
            detector_spatial_resolution: Quantity::new(0.0025, Unit::Metre),
            m_value: 5.0,
            critical_edge: Quantity::new(0.022, Unit::InverseAngstrom),
            alpha: Quantity::new(0.25 / 0.088, Unit::Angstrom),
            wavelength_bins: Binning::Geomspace {
                start: 2.8,
                stop: 12.0,
                num: 300,
                unit: Unit::Angstrom,
            },
            q_bins: Binning::Geomspace {
                start: 0.005,
                stop: 0.115,
                num: 391,
                unit: Unit::InverseAngstrom,
            },
            y_index_limits: [11, 41],
            z_index_limits: [80, 370],
            q_tolerance: None,
        }
    }
}

impl AmorParameters {
    /// Parse parameters from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read parameters from a JSON file
    ///
    /// ```rust, no_run
    /// # use nrefl_amor::AmorParameters;
    /// let parameters = AmorParameters::read_json("path/to/amor.json").unwrap();
    /// ```
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialise the parameters to pretty printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Insert every parameter into a pipeline, the per-run ones for both roles
    ///
    /// Bin edges are built first, so nothing is inserted if they are invalid.
    pub fn apply(&self, pipeline: &mut Pipeline) -> Result<()> {
        let wavelength_bins = self.wavelength_bins.edges()?;
        let q_bins = self.q_bins.edges()?;

        for_each_role(&mut RunParameters {
            parameters: self,
            pipeline: &mut *pipeline,
        });

        pipeline
            .insert(WavelengthBins(wavelength_bins))
            .insert(QBins(q_bins))
            .insert(YIndexLimits {
                lower: self.y_index_limits[0],
                upper: self.y_index_limits[1],
            })
            .insert(ZIndexLimits {
                lower: self.z_index_limits[0],
                upper: self.z_index_limits[1],
            })
            .insert(QTolerance(self.q_tolerance))
            .insert(MValue(self.m_value))
            .insert(CriticalEdge(self.critical_edge))
            .insert(Alpha(self.alpha));

        debug!("Inserted Amor parameters");
        Ok(())
    }
}

struct RunParameters<'a> {
    parameters: &'a AmorParameters,
    pipeline: &'a mut Pipeline,
}

impl RoleVisitor for RunParameters<'_> {
    fn visit<R: Role>(&mut self) {
        let p = self.parameters;
        self.pipeline
            .insert(BeamSize::<R>::new(p.beam_size))
            .insert(SampleSize::<R>::new(p.sample_size))
            .insert(SamplePosition::<R>::new(p.sample_position))
            .insert(Chopper1Position::<R>::new(p.chopper1_position))
            .insert(Chopper2Position::<R>::new(p.chopper2_position))
            .insert(DetectorSpatialResolution::<R>::new(
                p.detector_spatial_resolution,
            ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nrefl_reflectometry::{Reference, Sample};

    #[test]
    fn default_bins() {
        let parameters = AmorParameters::default();

        let wavelength = parameters.wavelength_bins.edges().unwrap();
        assert_eq!(wavelength.values().len(), 300);
        assert_eq!(wavelength.lower(), 2.8);
        assert_eq!(wavelength.upper(), 12.0);

        let q = parameters.q_bins.edges().unwrap();
        assert_eq!(q.values().len(), 391);
        assert_eq!(q.unit(), Unit::InverseAngstrom);
    }

    #[test]
    fn json_round_trip_of_defaults() {
        let parameters = AmorParameters::default();
        let json = parameters.to_json().unwrap();
        let parsed = AmorParameters::from_json(&json).unwrap();

        assert_eq!(parsed.wavelength_bins, parameters.wavelength_bins);
        assert_eq!(parsed.chopper1_position, parameters.chopper1_position);
        assert_eq!(parsed.z_index_limits, [80, 370]);
        assert_eq!(parsed.q_tolerance, None);
        assert!((parsed.alpha.value - parameters.alpha.value).abs() < 1e-12);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let result =
            AmorParameters::from_json(r#"{ "beam_size": { "value": 2.0, "unit": "inch" } }"#);
        assert!(matches!(result, Err(crate::Error::FailedSerde(_))));
    }

    #[test]
    fn apply_inserts_both_roles() {
        let mut pipeline = Pipeline::new();
        AmorParameters::default().apply(&mut pipeline).unwrap();

        assert!(pipeline.contains::<BeamSize<Sample>>());
        assert!(pipeline.contains::<BeamSize<Reference>>());
        assert!(pipeline.contains::<Chopper2Position<Reference>>());
        assert!(pipeline.contains::<DetectorSpatialResolution<Sample>>());
        assert!(pipeline.contains::<QTolerance>());

        let limits = pipeline.compute::<ZIndexLimits>().unwrap();
        assert_eq!(*limits, ZIndexLimits { lower: 80, upper: 370 });
    }

    #[test]
    fn invalid_bins_insert_nothing() {
        let parameters = AmorParameters {
            q_bins: Binning::Linspace {
                start: 0.1,
                stop: 0.0,
                num: 10,
                unit: Unit::InverseAngstrom,
            },
            ..Default::default()
        };
        let mut pipeline = Pipeline::new();

        assert!(parameters.apply(&mut pipeline).is_err());
        assert!(!pipeline.contains::<BeamSize<Sample>>());
    }
}
