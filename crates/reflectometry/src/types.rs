//! Role tags and the quantities of a reduction
//!
//! Quantities that exist once per run are generic over a [Role]. Everything
//! else, like the bins shared by both runs or results that only make sense
//! for one role, is a plain type.

// external crates
use ndarray::Array2;

// nrefl modules
use nrefl_events::{DetectorData, Histogram, Masks};
use nrefl_units::{BinEdges, Quantity, Unit, VectorQuantity};

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Sample {}
    impl Sealed for super::Reference {}
}

/// Role of a run in the experiment
///
/// Only [Sample] and [Reference] implement this, and neither can be
/// instantiated. Roles only ever appear as type parameters.
pub trait Role:
    sealed::Sealed + std::fmt::Debug + Clone + PartialEq + Send + Sync + 'static
{
    /// Human readable name of the role
    const NAME: &'static str;
}

/// The measurement of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sample {}

/// The supermirror measurement used for normalisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {}

impl Role for Sample {
    const NAME: &'static str = "sample";
}

impl Role for Reference {
    const NAME: &'static str = "reference";
}

/// Routine to run once for every [Role]
///
/// ```rust
/// # use nrefl_reflectometry::{for_each_role, Role, RoleVisitor};
/// struct Names(Vec<&'static str>);
///
/// impl RoleVisitor for Names {
///     fn visit<R: Role>(&mut self) {
///         self.0.push(R::NAME);
///     }
/// }
///
/// let mut names = Names(Vec::new());
/// for_each_role(&mut names);
/// assert_eq!(names.0, vec!["sample", "reference"]);
/// ```
pub trait RoleVisitor {
    /// Called once per role
    fn visit<R: Role>(&mut self);
}

/// Run a [RoleVisitor] for every role
pub fn for_each_role<V: RoleVisitor>(visitor: &mut V) {
    visitor.visit::<Sample>();
    visitor.visit::<Reference>();
}

/// Define a wrapper type that is generic over a [Role]
///
/// The wrapper derefs to its contents and can only be built with `new`, so
/// the role is always chosen explicitly.
#[macro_export]
macro_rules! role_scoped {
    ($(#[$meta:meta])* $name:ident($inner:ty)) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name<R: $crate::Role> {
            inner: $inner,
            role: ::std::marker::PhantomData<R>,
        }

        impl<R: $crate::Role> $name<R> {
            /// Wrap a value for role `R`
            pub fn new(value: $inner) -> Self {
                Self {
                    inner: value,
                    role: ::std::marker::PhantomData,
                }
            }

            /// Unwrap the value
            pub fn into_inner(self) -> $inner {
                self.inner
            }
        }

        impl<R: $crate::Role> ::std::ops::Deref for $name<R> {
            type Target = $inner;

            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    };
}

role_scoped!(
    /// Full width at half maximum of the beam
    BeamSize(Quantity)
);

role_scoped!(
    /// Length of the sample along the beam
    SampleSize(Quantity)
);

role_scoped!(
    /// Position of the sample in the lab frame
    SamplePosition(VectorQuantity)
);

role_scoped!(
    /// Direction and length of the beam arriving at the sample
    IncidentBeam(VectorQuantity)
);

role_scoped!(
    /// Events of a run, binned by detector pixel
    EventData(DetectorData)
);

role_scoped!(
    /// Events with pixels and events outside the region of interest masked
    MaskedEventData(DetectorData)
);

role_scoped!(
    /// Events with weights corrected for the beam footprint
    FootprintCorrectedData(DetectorData)
);

/// Wavelength bin edges, shared by both runs
#[derive(Debug, Clone, PartialEq)]
pub struct WavelengthBins(pub BinEdges);

impl std::ops::Deref for WavelengthBins {
    type Target = BinEdges;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Q bin edges of the reflectivity curve
#[derive(Debug, Clone, PartialEq)]
pub struct QBins(pub BinEdges);

impl std::ops::Deref for QBins {
    type Target = BinEdges;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Inclusive range of `y_index` values to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YIndexLimits {
    /// Lowest kept index
    pub lower: u32,
    /// Highest kept index
    pub upper: u32,
}

/// Inclusive range of `z_index` values to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZIndexLimits {
    /// Lowest kept index
    pub lower: u32,
    /// Highest kept index
    pub upper: u32,
}

/// Largest accepted relative spread of `Q` within a reference cell
///
/// `None` accepts any spread.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QTolerance(pub Option<f64>);

/// Reference counts over (`z_index`, wavelength)
///
/// Always carries the `too_few_events` mask and a `Q` coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceIntensity(pub Histogram);

/// Reference counts with the supermirror reflectivity removed
#[derive(Debug, Clone, PartialEq)]
pub struct IdealReferenceIntensity(pub Histogram);

impl std::ops::Deref for ReferenceIntensity {
    type Target = Histogram;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::ops::Deref for IdealReferenceIntensity {
    type Target = Histogram;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Inverse reflectivity of the supermirror
///
/// Either one factor per (`z_index`, wavelength) cell or a single row of one
/// factor per wavelength bin, applied to every `z_index`. The correction
/// keeps the wavelength edges, and the `z_index` of every row for a per cell
/// correction, so that it is only ever applied to the cells it was made for.
#[derive(Debug, Clone, PartialEq)]
pub struct SupermirrorReflectivityCorrection {
    z_index: Option<Vec<u32>>,
    edges: BinEdges,
    factors: Array2<f64>,
    unit: Unit,
}

impl SupermirrorReflectivityCorrection {
    /// Dimensionless factors for every cell
    pub fn per_cell(z_index: Vec<u32>, edges: BinEdges, factors: Array2<f64>) -> Self {
        Self {
            z_index: Some(z_index),
            edges,
            factors,
            unit: Unit::Dimensionless,
        }
    }

    /// Dimensionless factors for every wavelength bin
    pub fn per_wavelength(edges: BinEdges, factors: Vec<f64>) -> Self {
        let n = factors.len();
        let factors = Array2::from_shape_fn((1, n), |(_, j)| factors[j]);
        Self {
            z_index: None,
            edges,
            factors,
            unit: Unit::Dimensionless,
        }
    }

    /// Same factors with another unit, which must be dimensionless to be used
    pub fn with_unit(self, unit: Unit) -> Self {
        Self { unit, ..self }
    }

    /// The `z_index` of every row, `None` for a single wavelength row
    pub fn z_index(&self) -> Option<&[u32]> {
        self.z_index.as_deref()
    }

    /// Wavelength bin edges
    pub fn edges(&self) -> &BinEdges {
        &self.edges
    }

    /// Correction factors
    pub fn factors(&self) -> &Array2<f64> {
        &self.factors
    }

    /// Unit of the factors
    pub fn unit(&self) -> Unit {
        self.unit
    }
}

/// Supermirror m-value, the reflectivity cut-off in multiples of the critical edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MValue(pub f64);

/// Critical edge of the supermirror coating, in inverse length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalEdge(pub Quantity);

/// Slope of the supermirror reflectivity above the critical edge, in length
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alpha(pub Quantity);

/// Normalised reflectivity over Q
///
/// Bins without any reference intensity are masked `no_reference` and hold
/// `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReflectivityOverQ {
    /// Q bin edges
    pub edges: BinEdges,
    /// Reflectivity of every bin
    pub values: Vec<f64>,
    /// Variance of every bin
    pub variances: Vec<f64>,
    /// Bin masks
    pub masks: Masks,
}
