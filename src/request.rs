//! Request/response contract and the per-request planning entry point.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::itinerary::{self, ItineraryStop};
use crate::solver::{self, SolveOptions};
use crate::traits::DurationMatrixProvider;
use crate::types::{DayWindows, Location, PlanError, TimeWindow};

/// Planning request as consumed from the caller.
///
/// The base is identified either by `hotel_index` into `addresses`, or by
/// `hotel_address`: matched against `addresses` by value, and prepended as
/// its own zero-service stop when absent from the list.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanRequest {
    pub addresses: Vec<String>,
    #[serde(default)]
    pub hotel_address: Option<String>,
    #[serde(default)]
    pub hotel_index: Option<usize>,
    /// Minutes spent at each address, same length and order as `addresses`.
    pub service_times: Vec<i32>,
    #[serde(default = "default_start_hour")]
    pub start_hour: i32,
    #[serde(default = "default_end_hour")]
    pub end_hour: i32,
    #[serde(default = "default_lunch_start_hour")]
    pub lunch_start_hour: i32,
    #[serde(default = "default_lunch_end_hour")]
    pub lunch_end_hour: i32,
    #[serde(default = "default_dinner_start_hour")]
    pub dinner_start_hour: i32,
    #[serde(default = "default_dinner_end_hour")]
    pub dinner_end_hour: i32,
}

fn default_start_hour() -> i32 {
    9
}
fn default_end_hour() -> i32 {
    21
}
fn default_lunch_start_hour() -> i32 {
    11
}
fn default_lunch_end_hour() -> i32 {
    13
}
fn default_dinner_start_hour() -> i32 {
    17
}
fn default_dinner_end_hour() -> i32 {
    19
}

/// Structured outcome handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanResponse {
    pub route: Vec<ItineraryStop>,
    pub success: bool,
    pub error: Option<String>,
}

/// Runs one full planning pass: validate, fetch durations, search, label,
/// assemble. Every failure comes back as `success = false` with a reason;
/// nothing escapes as a panic.
pub fn plan<P: DurationMatrixProvider>(
    request: &PlanRequest,
    provider: &P,
    options: &SolveOptions,
) -> PlanResponse {
    match try_plan(request, provider, options) {
        Ok(route) => PlanResponse {
            route,
            success: true,
            error: None,
        },
        Err(err) => {
            warn!(error = %err, "planning failed");
            PlanResponse {
                route: Vec::new(),
                success: false,
                error: Some(err.to_string()),
            }
        }
    }
}

/// The fallible pipeline behind [`plan`], for callers that prefer `Result`.
pub fn try_plan<P: DurationMatrixProvider>(
    request: &PlanRequest,
    provider: &P,
    options: &SolveOptions,
) -> Result<Vec<ItineraryStop>, PlanError> {
    let (locations, base) = resolve_locations(request)?;
    let windows = resolve_windows(request)?;

    let matrix = provider.matrix_for(&locations)?;
    if matrix.len() != locations.len() {
        return Err(PlanError::Provider(
            crate::traits::ProviderError::Incomplete(format!(
                "matrix covers {} locations, request has {}",
                matrix.len(),
                locations.len()
            )),
        ));
    }

    let solved = solver::solve(&locations, base, &matrix, &windows, options)?;
    debug!(
        stops = solved.order.len(),
        quality = ?solved.quality,
        "itinerary solved"
    );

    Ok(itinerary::assemble(&locations, base, &solved, &windows))
}

fn resolve_locations(request: &PlanRequest) -> Result<(Vec<Location>, usize), PlanError> {
    if request.addresses.is_empty() {
        return Err(PlanError::InputMismatch(
            "at least one address is required".to_string(),
        ));
    }
    if request.addresses.len() != request.service_times.len() {
        return Err(PlanError::InputMismatch(format!(
            "length of addresses ({}) and service_times ({}) must match",
            request.addresses.len(),
            request.service_times.len()
        )));
    }
    if let Some(&minutes) = request.service_times.iter().find(|&&minutes| minutes < 0) {
        return Err(PlanError::InputMismatch(format!(
            "service time {minutes} is negative"
        )));
    }

    let mut locations: Vec<Location> = request
        .addresses
        .iter()
        .zip(&request.service_times)
        .map(|(address, &minutes)| Location::new(address.clone(), minutes))
        .collect();

    let base = match (request.hotel_index, request.hotel_address.as_deref()) {
        (Some(index), _) => {
            if index >= locations.len() {
                return Err(PlanError::InputMismatch(format!(
                    "hotel_index {index} is out of range for {} addresses",
                    locations.len()
                )));
            }
            index
        }
        (None, Some(address)) => match locations.iter().position(|l| l.address == address) {
            Some(index) => index,
            None => {
                locations.insert(0, Location::new(address, 0));
                0
            }
        },
        (None, None) => {
            return Err(PlanError::InputMismatch(
                "hotel_address or hotel_index is required".to_string(),
            ));
        }
    };

    // The base is never serviced.
    locations[base].service_minutes = 0;
    Ok((locations, base))
}

fn resolve_windows(request: &PlanRequest) -> Result<DayWindows, PlanError> {
    let window = |name: &str, start: i32, end: i32| {
        if !(0..=24).contains(&start) || !(0..=24).contains(&end) || start >= end {
            return Err(PlanError::InputMismatch(format!(
                "{name} window [{start}, {end}) is malformed"
            )));
        }
        Ok(TimeWindow::from_hours(start, end))
    };
    Ok(DayWindows {
        day: window("day", request.start_hour, request.end_hour)?,
        lunch: window("lunch", request.lunch_start_hour, request.lunch_end_hour)?,
        dinner: window("dinner", request.dinner_start_hour, request.dinner_end_hour)?,
    })
}
