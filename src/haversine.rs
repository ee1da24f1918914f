//! Haversine duration-matrix provider (fallback when no routing backend
//! is deployed).
//!
//! Uses great-circle distance and an assumed speed to estimate travel
//! minutes. Less accurate than a road network, but always available. The
//! estimate happens here, at the boundary; the optimizer still treats the
//! resulting matrix as ground truth.

use crate::matrix::DurationMatrix;
use crate::traits::{DurationMatrixProvider, ProviderError};
use crate::types::Location;

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Great-circle distance between two points in kilometers.
    fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn km_to_minutes(&self, km: f64) -> i32 {
        let hours = km / self.speed_kmh;
        (hours * 60.0).round() as i32
    }
}

impl DurationMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[Location]) -> Result<DurationMatrix, ProviderError> {
        let mut coords = Vec::with_capacity(locations.len());
        for location in locations {
            let Some(point) = location.coords else {
                return Err(ProviderError::Incomplete(format!(
                    "no coordinates for {}",
                    location.address
                )));
            };
            coords.push(point);
        }

        let rows = coords
            .iter()
            .map(|&from| {
                coords
                    .iter()
                    .map(|&to| {
                        if from == to {
                            0
                        } else {
                            self.km_to_minutes(Self::haversine_km(from, to))
                        }
                    })
                    .collect()
            })
            .collect();
        DurationMatrix::from_rows(rows)
    }
}
