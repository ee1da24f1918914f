//! OSRM HTTP adapter for travel-duration matrices.

use serde::Deserialize;

use crate::matrix::DurationMatrix;
use crate::traits::{DurationMatrixProvider, ProviderError};
use crate::types::Location;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }
}

impl DurationMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[Location]) -> Result<DurationMatrix, ProviderError> {
        let mut coords = Vec::with_capacity(locations.len());
        for location in locations {
            let Some((lat, lng)) = location.coords else {
                return Err(ProviderError::Incomplete(format!(
                    "no coordinates for {}",
                    location.address
                )));
            };
            coords.push(format!("{:.6},{:.6}", lng, lat));
        }

        let url = format!(
            "{}/table/v1/{}/{}?annotations=duration",
            self.config.base_url,
            self.config.profile,
            coords.join(";")
        );

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())
            .map_err(|err| ProviderError::Unavailable(err.to_string()))?;

        let durations = body.durations.ok_or_else(|| {
            ProviderError::Incomplete("response carries no durations".to_string())
        })?;

        let mut rows = Vec::with_capacity(durations.len());
        for (i, row) in durations.into_iter().enumerate() {
            let mut minutes_row = Vec::with_capacity(row.len());
            for (j, seconds) in row.into_iter().enumerate() {
                let seconds = seconds.ok_or_else(|| {
                    ProviderError::Incomplete(format!("pair ({i}, {j}) is unroutable"))
                })?;
                minutes_row.push((seconds / 60.0).ceil() as i32);
            }
            rows.push(minutes_row);
        }
        DurationMatrix::from_rows(rows)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
}
