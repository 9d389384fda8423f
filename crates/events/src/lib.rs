//! Binned neutron event data
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod coord;
mod detector;
mod error;
mod event_list;
mod grid;
mod histogram;
mod masks;

#[doc(inline)]
pub use coord::Coord;

#[doc(inline)]
pub use detector::{DetectorData, Pixel, ZGroups};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use event_list::EventList;

#[doc(inline)]
pub use grid::EventGrid;

#[doc(inline)]
pub use histogram::Histogram;

#[doc(inline)]
pub use masks::Masks;
