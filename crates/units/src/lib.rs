//! Unit-aware quantities for reflectometry reduction
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod edges;
mod error;
mod quantity;
mod unit;
mod vector;

#[doc(inline)]
pub use edges::BinEdges;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use quantity::Quantity;

#[doc(inline)]
pub use unit::{Dimension, Unit};

#[doc(inline)]
pub use vector::VectorQuantity;
