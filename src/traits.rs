//! Core interfaces for the itinerary planner.
//!
//! These are intentionally minimal. Concrete apps plug in their own source
//! of travel durations: a routing backend, a precomputed table, or an
//! estimator chosen at the boundary.

use std::fmt;

use crate::matrix::DurationMatrix;
use crate::types::Location;

/// Failure of a duration-matrix lookup.
#[derive(Debug)]
pub enum ProviderError {
    /// The provider could not be reached or answered with an error.
    Unavailable(String),
    /// The provider answered but did not cover every requested pair.
    Incomplete(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unavailable(reason) => write!(f, "provider unavailable: {reason}"),
            ProviderError::Incomplete(reason) => write!(f, "incomplete matrix: {reason}"),
        }
    }
}

impl std::error::Error for ProviderError {}

/// Supplies pairwise travel durations, in minutes, for a set of locations.
///
/// The matrix is indexed by the provided location order. A failed lookup
/// must surface as an error, never as a partial or guessed matrix; the
/// optimizer treats whatever it receives as ground truth.
pub trait DurationMatrixProvider {
    fn matrix_for(&self, locations: &[Location]) -> Result<DurationMatrix, ProviderError>;
}
