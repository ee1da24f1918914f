//! Shared data types for the itinerary planner.

use std::fmt;

use serde::Serialize;

use crate::traits::ProviderError;

/// A place the vehicle can visit.
///
/// The address is an opaque place key; nothing in the planner interprets it.
/// Coordinates are only needed by providers that query a road network.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub address: String,
    pub label: Option<String>,
    /// Minutes spent at the stop once arrived.
    pub service_minutes: i32,
    /// (lat, lng), when known.
    pub coords: Option<(f64, f64)>,
}

impl Location {
    pub fn new(address: impl Into<String>, service_minutes: i32) -> Self {
        Self {
            address: address.into(),
            label: None,
            service_minutes,
            coords: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_coords(mut self, lat: f64, lng: f64) -> Self {
        self.coords = Some((lat, lng));
        self
    }
}

/// Half-open interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i32,
    pub end: i32,
}

impl TimeWindow {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn from_hours(start_hour: i32, end_hour: i32) -> Self {
        Self {
            start: start_hour * 60,
            end: end_hour * 60,
        }
    }

    /// True when the visit interval `[arrival, departure)` overlaps this window.
    /// An empty interval (zero service) overlaps nothing.
    pub fn intersects(&self, arrival: i32, departure: i32) -> bool {
        arrival < departure && arrival < self.end && departure > self.start
    }
}

/// Per-request time configuration: the working day plus the two meal windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindows {
    pub day: TimeWindow,
    pub lunch: TimeWindow,
    pub dinner: TimeWindow,
}

/// Derived label for an emitted stop. Computed from time-window overlap,
/// never stored on a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopRole {
    Start,
    Attraction,
    Lunch,
    Dinner,
    End,
}

/// Why the search engine could not produce a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfeasibleReason {
    /// Even the bare base-to-base round trip does not fit the day window.
    DayTooShort,
    /// Feasible orderings exist but none admits a lunch + dinner assignment.
    NoMealPlacement,
}

impl fmt::Display for InfeasibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InfeasibleReason::DayTooShort => {
                write!(f, "day window too short for base round trip")
            }
            InfeasibleReason::NoMealPlacement => {
                write!(f, "no feasible meal-window placement")
            }
        }
    }
}

/// Structured failure surfaced through the planning boundary.
#[derive(Debug)]
pub enum PlanError {
    /// Malformed input: mismatched lengths, bad hour bounds, missing base.
    InputMismatch(String),
    /// The duration-matrix provider failed or returned an unusable matrix.
    Provider(ProviderError),
    /// The search space holds no route satisfying every hard constraint.
    Infeasible(InfeasibleReason),
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanError::InputMismatch(reason) => write!(f, "{reason}"),
            PlanError::Provider(err) => write!(f, "duration matrix provider failed: {err}"),
            PlanError::Infeasible(reason) => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for PlanError {}

impl From<ProviderError> for PlanError {
    fn from(err: ProviderError) -> Self {
        PlanError::Provider(err)
    }
}

impl From<InfeasibleReason> for PlanError {
    fn from(reason: InfeasibleReason) -> Self {
        PlanError::Infeasible(reason)
    }
}
