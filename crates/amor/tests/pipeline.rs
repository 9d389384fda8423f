//! End to end reduction of synthetic Amor runs

use nrefl_amor::*;
use nrefl_events::{Coord, DetectorData, EventList, Pixel};
use nrefl_reflectometry::*;
use nrefl_units::{Quantity, Unit, VectorQuantity};
use nrefl_workflow::{Error as WorkflowError, Pipeline};
use rstest::{fixture, rstest};

/// Centre of the default wavelength bin holding `wavelength`
fn bin_centre(wavelength: f64) -> f64 {
    let edges = AmorParameters::default().wavelength_bins.edges().unwrap();
    let bin = edges.find(wavelength).unwrap();
    edges.midpoints()[bin]
}

/// Events at the centres of the wavelength bins, with `Q = k / wavelength`
fn events(k: f64, wavelength: Vec<f64>) -> EventList {
    let wavelength = wavelength.into_iter().map(bin_centre).collect::<Vec<f64>>();
    let q = wavelength.iter().map(|l| k / l).collect::<Vec<f64>>();
    let n = wavelength.len();
    EventList::from_counts(vec![50.0; n])
        .with_coord(Coord::Wavelength, wavelength)
        .unwrap()
        .with_coord(Coord::Q, q)
        .unwrap()
        .with_coord(Coord::Theta, vec![0.01; n])
        .unwrap()
}

/// Every wavelength cell holds a single event, one pixel is outside the limits
fn run<R: Role>() -> EventData<R> {
    EventData::new(DetectorData::new(vec![
        Pixel::new(100, 20, events(0.048, vec![4.0, 8.0])),
        Pixel::new(200, 20, events(0.06, vec![4.0])),
        Pixel::new(200, 5, events(0.18, vec![6.0])),
    ]))
}

/// Distinct Q bins holding an unmasked event of [run]
fn covered_q_bins() -> usize {
    let q_bins = AmorParameters::default().q_bins.edges().unwrap();
    let mut bins = [(0.048, 4.0), (0.048, 8.0), (0.06, 4.0)]
        .iter()
        .filter_map(|(k, l)| q_bins.find(k / bin_centre(*l)))
        .collect::<Vec<usize>>();
    bins.sort();
    bins.dedup();
    bins.len()
}

#[fixture]
fn parameters() -> AmorParameters {
    AmorParameters::default()
}

#[fixture]
fn pipeline(parameters: AmorParameters) -> Pipeline {
    let mut pipeline = amor_workflow(&parameters).unwrap();
    pipeline.insert(run::<Sample>()).insert(run::<Reference>());
    pipeline
}

#[rstest]
fn identical_runs_below_critical_edge(pipeline: Pipeline) {
    let reflectivity = pipeline.compute::<ReflectivityOverQ>().unwrap();
    assert_eq!(reflectivity.values.len(), 390);

    let no_reference = reflectivity.masks.get(NO_REFERENCE).unwrap();
    let covered = no_reference.iter().filter(|m| !**m).count();
    assert_eq!(covered, covered_q_bins());
    assert_eq!(covered, 3);

    for (value, masked) in reflectivity.values.iter().zip(no_reference) {
        if *masked {
            assert!(value.is_nan());
        } else {
            assert!((value - 1.0).abs() < 1e-12);
        }
    }
}

#[rstest]
fn pixel_outside_limits_is_masked(pipeline: Pipeline) {
    let masked = pipeline.compute::<MaskedEventData<Reference>>().unwrap();
    assert_eq!(
        masked.masks().get(Y_INDEX_MASK),
        Some(&[false, false, true][..])
    );

    let corrected = pipeline
        .compute::<FootprintCorrectedData<Reference>>()
        .unwrap();
    let intensity = pipeline.compute::<ReferenceIntensity>().unwrap();
    assert_eq!(intensity.z_index(), &[100, 200]);
    assert!((intensity.values().sum() - corrected.total_weight()).abs() < 1e-9);
}

#[rstest]
fn corrections_in_order(pipeline: Pipeline) {
    assert_eq!(
        applied_corrections::<ReflectivityOverQ>(&pipeline).unwrap(),
        vec![FOOTPRINT_CORRECTION, SUPERMIRROR_CALIBRATION]
    );
}

#[rstest]
#[case(r#"{ "sample_size": { "value": 0.0, "unit": "mm" } }"#)] // case 1
#[case(r#"{ "beam_size": { "value": 2.0, "unit": "deg" } }"#)] // case 2
fn invalid_sizes_fail_the_footprint_correction(#[case] json: &str) {
    let parameters = AmorParameters::from_json(json).unwrap();
    let mut pipeline = amor_workflow(&parameters).unwrap();
    pipeline.insert(run::<Sample>()).insert(run::<Reference>());

    match pipeline.compute::<ReflectivityOverQ>().unwrap_err() {
        WorkflowError::Provider {
            provider, output, ..
        } => {
            assert!(provider.contains("footprint_correction"));
            assert!(output.contains("FootprintCorrectedData"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[rstest]
fn incident_beam_per_role(mut pipeline: Pipeline) {
    pipeline.insert(SamplePosition::<Reference>::new(
        nrefl_units::VectorQuantity::new(0.0, 0.0, 1.0, Unit::Metre),
    ));

    let sample = pipeline.compute::<IncidentBeam<Sample>>().unwrap();
    let reference = pipeline.compute::<IncidentBeam<Reference>>().unwrap();
    assert_eq!(sample.value.z, 15.0);
    assert_eq!(reference.value.z, 16.0);
}

#[rstest]
fn parameters_override_defaults(parameters: AmorParameters) {
    let json = r#"{
        "m_value": 10.0,
        "critical_edge": { "value": 0.0022, "unit": "1/angstrom" },
        "z_index_limits": [150, 370]
    }"#;
    let custom = AmorParameters::from_json(json).unwrap();

    assert_eq!(custom.m_value, 10.0);
    assert_eq!(custom.beam_size, parameters.beam_size);

    let mut pipeline = amor_workflow(&custom).unwrap();
    pipeline.insert(run::<Sample>()).insert(run::<Reference>());

    // the whole z_index 100 row is masked but kept
    let intensity = pipeline.compute::<ReferenceIntensity>().unwrap();
    assert_eq!(intensity.z_index(), &[100, 200]);
    let z_mask = intensity.mask(Z_INDEX_MASK).unwrap();
    assert!(z_mask.row(0).iter().all(|m| *m));
    assert!(z_mask.row(1).iter().all(|m| !*m));

    // every cell is now above the critical edge, R = 1 - alpha (q - c)
    let bin = pipeline
        .compute::<WavelengthBins>()
        .unwrap()
        .find(4.0)
        .unwrap();
    let correction = pipeline
        .compute::<SupermirrorReflectivityCorrection>()
        .unwrap();
    let alpha = 0.25 / 0.088;
    let q = 0.06 / bin_centre(4.0);
    let expected = 1.0 / (1.0 - alpha * (q - 0.0022));
    assert!((correction.factors()[[1, bin]] - expected).abs() < 1e-9);

    let expected_q = Quantity::new(0.0022, Unit::InverseAngstrom);
    assert_eq!(
        *pipeline.compute::<CriticalEdge>().unwrap(),
        CriticalEdge(expected_q)
    );
}

#[rstest]
fn q_resolution_of_the_sample(mut pipeline: Pipeline) {
    let positions = [4.0, 4.0, 4.5]
        .iter()
        .map(|z| VectorQuantity::new(0.0, 0.0, *z, Unit::Metre))
        .collect();
    pipeline.insert(DetectorPosition::<Sample>::new(positions));

    let resolution = pipeline.compute::<QResolution>().unwrap();
    assert_eq!(resolution.values.len(), 390);

    // the pixel at 4.5 m is masked, theta is the same everywhere
    let wavelength = fwhm_to_std(1.0 / 19.0);
    let sample_size = fwhm_to_std(0.01 / 4.0);
    let angular = fwhm_to_std((0.0025_f64 / 4.0).atan()) / 0.01;
    let expected = (wavelength.powi(2) + sample_size.powi(2) + angular.powi(2)).sqrt();
    assert!((resolution.relative - expected).abs() < 1e-12);

    let centre = resolution.edges.midpoints()[10];
    assert!((resolution.values[10] - expected * centre).abs() < 1e-12);
}

#[rstest]
fn q_resolution_needs_detector_positions(pipeline: Pipeline) {
    match pipeline.compute::<QResolution>() {
        Err(WorkflowError::Unsatisfied { missing, .. }) => {
            assert!(missing.contains("DetectorPosition"));
        }
        other => panic!("unexpected {other:?}"),
    }
    // the reflectivity never needs them
    assert!(pipeline.compute::<ReflectivityOverQ>().is_ok());
}
