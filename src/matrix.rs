//! Validated travel-duration matrix and the precomputed-table provider.

use crate::traits::{DurationMatrixProvider, ProviderError};
use crate::types::Location;

/// Complete pairwise travel times in minutes, row-major.
///
/// Construction validates shape and the self-to-self = 0 invariant, so the
/// solver can index without further checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationMatrix {
    size: usize,
    minutes: Vec<i32>,
}

impl DurationMatrix {
    pub fn from_rows(rows: Vec<Vec<i32>>) -> Result<Self, ProviderError> {
        let size = rows.len();
        let mut minutes = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ProviderError::Incomplete(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            for (j, value) in row.into_iter().enumerate() {
                if value < 0 {
                    return Err(ProviderError::Incomplete(format!(
                        "negative duration {value} between {i} and {j}"
                    )));
                }
                if i == j && value != 0 {
                    return Err(ProviderError::Incomplete(format!(
                        "self-to-self duration for {i} is {value}, expected 0"
                    )));
                }
                minutes.push(value);
            }
        }
        Ok(Self { size, minutes })
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Travel time in minutes from `from` to `to` (location indices).
    pub fn minutes_between(&self, from: usize, to: usize) -> i32 {
        self.minutes[from * self.size + to]
    }
}

/// Provider backed by a caller-supplied table, for callers that already
/// resolved travel times out of band.
#[derive(Debug, Clone)]
pub struct FixedDurations {
    rows: Vec<Vec<i32>>,
}

impl FixedDurations {
    pub fn new(rows: Vec<Vec<i32>>) -> Self {
        Self { rows }
    }
}

impl DurationMatrixProvider for FixedDurations {
    fn matrix_for(&self, locations: &[Location]) -> Result<DurationMatrix, ProviderError> {
        if self.rows.len() != locations.len() {
            return Err(ProviderError::Incomplete(format!(
                "table covers {} locations, request has {}",
                self.rows.len(),
                locations.len()
            )));
        }
        DurationMatrix::from_rows(self.rows.clone())
    }
}
