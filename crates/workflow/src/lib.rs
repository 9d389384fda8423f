//! Typed dependency resolution
//!
#![doc = include_str!("../readme.md")]

mod error;
mod key;
mod pipeline;
mod provider;

#[doc(inline)]
pub use crate::error::{BoxError, Error, Result};

#[doc(inline)]
pub use crate::key::Key;

#[doc(inline)]
pub use crate::pipeline::{Pipeline, Registered, Step, StepKind};

#[doc(inline)]
pub use crate::provider::{Provider, Value};
