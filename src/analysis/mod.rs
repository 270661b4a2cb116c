//! Streak analysis algorithms.
//!
//! # Stages
//!
//! - [`segmenter`] - maximal same-sign runs over a percent-change series
//! - [`extrema`] - longest-run selection and row-space index translation
//! - [`recovery`] - recovery timing for the longest runs and for every run
//! - [`stats`] - descriptive statistics for any numeric column
//!
//! Everything here is a pure function over immutable inputs; the crate root
//! ties the stages together in [`crate::analyze`].

pub mod extrema;
pub mod recovery;
pub mod segmenter;
pub mod stats;

// Re-export the stage functions for convenience
pub use extrema::*;
pub use recovery::*;
pub use segmenter::*;
pub use stats::*;
