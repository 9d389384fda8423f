//! `nrefl` is a modular toolkit for correcting and normalising neutron
//! reflectometry data
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use nrefl_events as events;

#[doc(inline)]
pub use nrefl_units as units;

#[doc(inline)]
pub use nrefl_utils as utils;

#[cfg(feature = "workflow")]
#[cfg_attr(docsrs, doc(cfg(feature = "workflow")))]
#[doc(inline)]
pub use nrefl_workflow as workflow;

#[cfg(feature = "reflectometry")]
#[cfg_attr(docsrs, doc(cfg(feature = "reflectometry")))]
#[doc(inline)]
pub use nrefl_reflectometry as reflectometry;

#[cfg(feature = "amor")]
#[cfg_attr(docsrs, doc(cfg(feature = "amor")))]
#[doc(inline)]
pub use nrefl_amor as amor;
