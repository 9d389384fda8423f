//! Integration tests for bin edges and quantities from parameter files

use nrefl_units::{BinEdges, Dimension, Error, Quantity, Unit, VectorQuantity};
use rstest::{fixture, rstest};

/// Default wavelength binning of a reduction
#[fixture]
fn wavelength() -> BinEdges {
    BinEdges::geomspace(2.8, 12.0, 300, Unit::Angstrom).unwrap()
}

#[rstest]
#[case(2.8, Some(0))] // case 1
#[case(11.9999, Some(298))] // case 2
#[case(12.0, None)] // case 3
#[case(2.7999, None)] // case 4
#[case(f64::NAN, None)] // case 5
fn half_open_lookup(wavelength: BinEdges, #[case] value: f64, #[case] bin: Option<usize>) {
    assert_eq!(wavelength.find(value), bin);
    assert_eq!(wavelength.contains(value), bin.is_some());
}

#[rstest]
fn every_midpoint_is_in_its_bin(wavelength: BinEdges) {
    for (i, centre) in wavelength.midpoints().iter().enumerate() {
        assert_eq!(wavelength.find(*centre), Some(i));
    }
}

#[rstest]
fn lookup_survives_conversion(wavelength: BinEdges) {
    let metres = wavelength.to(Unit::Metre).unwrap();
    assert_eq!(metres.n_bins(), wavelength.n_bins());
    assert_eq!(metres.find(5e-10), wavelength.find(5.0));
}

#[rstest]
#[case(r#"{"values": [1.0], "unit": "angstrom"}"#)] // case 1
#[case(r#"{"values": [1.0, 1.0], "unit": "angstrom"}"#)] // case 2
#[case(r#"{"values": [1.0, null], "unit": "angstrom"}"#)] // case 3
#[case(r#"{"values": [1.0, 2.0], "unit": "parsec"}"#)] // case 4
fn invalid_edges_are_rejected(#[case] json: &str) {
    assert!(serde_json::from_str::<BinEdges>(json).is_err());
}

#[rstest]
#[case(Quantity::new(2.0, Unit::Millimetre), Ok(()))] // case 1
#[case(Quantity::new(0.0, Unit::Millimetre), Err(Error::NotPositive { name: "size", value: 0.0 }))] // case 2
#[case(
    Quantity::new(2.0, Unit::Degree),
    Err(Error::IncompatibleUnits { expected: Dimension::Length, found: Unit::Degree })
)] // case 3
fn positive_lengths(#[case] size: Quantity, #[case] expected: Result<(), Error>) {
    assert_eq!(size.require_positive("size", Dimension::Length), expected);
}

#[rstest]
fn midpoint_in_first_unit() {
    let a = VectorQuantity::new(0.0, 0.0, -15.5, Unit::Metre);
    let b = VectorQuantity::new(0.0, 0.0, -14500.0, Unit::Millimetre);
    let midpoint = a.midpoint(&b).unwrap();
    assert_eq!(midpoint.unit, Unit::Metre);
    assert!((midpoint.value.z + 15.0).abs() < 1e-12);
}
