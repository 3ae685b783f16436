//! Time-series analysis of river-quality measurements.
//!
//! Analyses of a station are folded into one [`TimeSeriesCandidate`] per
//! parameter: how many usable measurements exist and which dates they span.

pub mod aggregate;
pub mod types;
pub mod utility;

pub use aggregate::{ParameterAccumulator, aggregate};
pub use types::{StationResult, StationStatus, TimeSeriesCandidate};
