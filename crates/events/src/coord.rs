use nrefl_units::Unit;

/// Per-event coordinates
///
/// Values are always stored in the canonical unit of the coordinate, so event
/// tables never need to carry units of their own.
///
/// | Coordinate   | Unit          |
/// | ------------ | ------------- |
/// | `Theta`      | rad           |
/// | `Wavelength` | angstrom      |
/// | `Q`          | 1/angstrom    |
///
/// ```rust
/// # use nrefl_events::Coord;
/// # use nrefl_units::Unit;
/// assert_eq!(Coord::Q.unit(), Unit::InverseAngstrom);
/// assert_eq!(Coord::Theta.to_string(), "theta");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Coord {
    /// Scattering angle relative to the sample surface
    Theta,
    /// Neutron wavelength
    Wavelength,
    /// Momentum transfer
    Q,
}

impl Coord {
    /// Canonical unit for stored values
    pub const fn unit(&self) -> Unit {
        match self {
            Self::Theta => Unit::Radian,
            Self::Wavelength => Unit::Angstrom,
            Self::Q => Unit::InverseAngstrom,
        }
    }

    /// Name of the coordinate
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Theta => "theta",
            Self::Wavelength => "wavelength",
            Self::Q => "Q",
        }
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
