//! Integration tests for the registered providers

use nrefl_events::{Coord, DetectorData, EventList, Pixel};
use nrefl_reflectometry::*;
use nrefl_units::{BinEdges, Quantity, Unit};
use nrefl_workflow::{Error as WorkflowError, Pipeline, StepKind};
use rstest::{fixture, rstest};

/// One pixel in range and one outside the `y_index` limits
///
/// Events sit at the wavelength bin centres with `Q = 0.03 / wavelength`.
fn run<R: Role>() -> EventData<R> {
    let events = EventList::from_counts(vec![10.0, 20.0, 5.0])
        .with_coord(Coord::Wavelength, vec![3.0, 5.0, 13.0])
        .unwrap()
        .with_coord(Coord::Q, vec![0.01, 0.006, 0.03 / 13.0])
        .unwrap()
        .with_coord(Coord::Theta, vec![0.01, 0.01, 0.01])
        .unwrap();
    EventData::new(DetectorData::new(vec![
        Pixel::new(0, 0, events.clone()),
        Pixel::new(0, 1, events),
    ]))
}

struct RunParameters<'a>(&'a mut Pipeline);

impl RoleVisitor for RunParameters<'_> {
    fn visit<R: Role>(&mut self) {
        self.0
            .insert(run::<R>())
            .insert(BeamSize::<R>::new(Quantity::new(2.0, Unit::Millimetre)))
            .insert(SampleSize::<R>::new(Quantity::new(10.0, Unit::Millimetre)));
    }
}

#[fixture]
fn pipeline() -> Pipeline {
    let mut pipeline = Pipeline::new();
    register_providers(&mut pipeline);
    for_each_role(&mut RunParameters(&mut pipeline));
    pipeline
        .insert(YIndexLimits { lower: 0, upper: 0 })
        .insert(ZIndexLimits { lower: 0, upper: 0 })
        .insert(WavelengthBins(
            BinEdges::new(vec![2.0, 4.0, 6.0], Unit::Angstrom).unwrap(),
        ))
        .insert(QBins(
            BinEdges::new(vec![0.0, 0.0075, 0.015, 0.03], Unit::InverseAngstrom).unwrap(),
        ))
        .insert(QTolerance::default())
        .insert(MValue(5.0))
        .insert(CriticalEdge(Quantity::new(0.022, Unit::InverseAngstrom)))
        .insert(Alpha(Quantity::new(0.25 / 0.088, Unit::Angstrom)));
    pipeline
}

#[rstest]
fn identical_runs_reflect_fully(pipeline: Pipeline) {
    let reflectivity = pipeline.compute::<ReflectivityOverQ>().unwrap();

    // below the critical edge the supermirror reflects everything
    assert!((reflectivity.values[0] - 1.0).abs() < 1e-12);
    assert!((reflectivity.values[1] - 1.0).abs() < 1e-12);
    assert!(reflectivity.values[2].is_nan());
    assert_eq!(
        reflectivity.masks.get(NO_REFERENCE),
        Some(&[false, false, true][..])
    );
}

#[rstest]
fn reference_is_placed_on_sample_q(mut pipeline: Pipeline) {
    // the sample reflects at twice the angle of the reference
    let events = EventList::from_counts(vec![10.0, 20.0])
        .with_coord(Coord::Wavelength, vec![3.0, 5.0])
        .unwrap()
        .with_coord(Coord::Q, vec![0.02, 0.012])
        .unwrap()
        .with_coord(Coord::Theta, vec![0.01, 0.01])
        .unwrap();
    pipeline.insert(EventData::<Sample>::new(DetectorData::new(vec![
        Pixel::new(0, 0, events),
    ])));

    let reflectivity = pipeline.compute::<ReflectivityOverQ>().unwrap();
    assert_eq!(
        reflectivity.masks.get(NO_REFERENCE),
        Some(&[true, false, false][..])
    );
    assert!((reflectivity.values[1] - 1.0).abs() < 1e-12);
    assert!((reflectivity.values[2] - 1.0).abs() < 1e-12);
}

#[rstest]
fn masked_pixel_is_corrected_but_not_counted(pipeline: Pipeline) {
    let masked = pipeline.compute::<MaskedEventData<Sample>>().unwrap();
    assert_eq!(masked.masks().get(Y_INDEX_MASK), Some(&[false, true][..]));
    assert_eq!(masked.total_weight(), 30.0);

    let corrected = pipeline.compute::<FootprintCorrectedData<Sample>>().unwrap();
    let scale = footprint_scale(2.0, 10.0, 0.01);
    for (pixel, original) in corrected.pixels().iter().zip(masked.pixels()) {
        for (w, w0) in pixel.events.weights().iter().zip(original.events.weights()) {
            assert!((w - w0 / scale).abs() < 1e-9);
        }
    }
    assert_eq!(corrected.masks(), masked.masks());
    assert!((corrected.total_weight() - 30.0 / scale).abs() < 1e-9);
}

#[rstest]
fn corrections_in_order(pipeline: Pipeline) {
    assert_eq!(
        applied_corrections::<ReflectivityOverQ>(&pipeline).unwrap(),
        vec![FOOTPRINT_CORRECTION, SUPERMIRROR_CALIBRATION]
    );
    assert_eq!(
        applied_corrections::<ReferenceIntensity>(&pipeline).unwrap(),
        vec![FOOTPRINT_CORRECTION]
    );

    let plan = pipeline.plan::<ReflectivityOverQ>().unwrap();
    assert!(matches!(plan.last().unwrap().kind, StepKind::Provider(_)));
    assert!(plan.iter().any(|s| s.output.contains("IdealReferenceIntensity")));
}

#[rstest]
fn role_parameters_are_separate(mut pipeline: Pipeline) {
    // a broken reference leaves the sample side computable
    pipeline.insert(BeamSize::<Reference>::new(Quantity::new(-2.0, Unit::Millimetre)));

    assert!(pipeline.compute::<FootprintCorrectedData<Sample>>().is_ok());
    let error = pipeline.compute::<ReflectivityOverQ>().unwrap_err();
    match &error {
        WorkflowError::Provider { output, .. } => {
            assert!(output.contains("FootprintCorrectedData"));
            assert!(output.contains("Reference"));
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[rstest]
fn missing_parameter_is_named() {
    let mut pipeline = Pipeline::new();
    register_providers(&mut pipeline);

    match pipeline.compute::<SupermirrorReflectivityCorrection>() {
        Err(WorkflowError::Unsatisfied {
            missing,
            required_by,
        }) => {
            // the deepest missing input is the first one reported
            assert!(missing.contains("::EventData<") && missing.contains("Reference"));
            assert!(required_by.contains("add_masks"));
        }
        other => panic!("unexpected {other:?}"),
    }
}
