//! Final itinerary assembly.
//!
//! One formatting walk over the solved route; the only computation here is
//! the minutes-to-wall-clock conversion.

use serde::Serialize;

use crate::solver::SolvedRoute;
use crate::types::{DayWindows, Location, StopRole};

/// One emitted stop of the day plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItineraryStop {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Wall-clock arrival, `HH:MM`.
    pub arrival_time: String,
    /// Minutes spent at the stop.
    pub service_time: i32,
    #[serde(rename = "type")]
    pub role: StopRole,
}

/// Converts minutes since midnight to `HH:MM`.
pub fn format_clock(minutes: i32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Emits the ordered stop list: Start at the base, the visited stops with
/// their derived roles, End back at the base.
pub fn assemble(
    locations: &[Location],
    base: usize,
    solved: &SolvedRoute,
    windows: &DayWindows,
) -> Vec<ItineraryStop> {
    let mut route = Vec::with_capacity(solved.timeline.stops.len() + 2);
    route.push(stop(&locations[base], windows.day.start, StopRole::Start));

    for (position, times) in solved.timeline.stops.iter().enumerate() {
        let role = match solved.meals {
            Some(meals) if meals.lunch == position => StopRole::Lunch,
            Some(meals) if meals.dinner == position => StopRole::Dinner,
            _ => StopRole::Attraction,
        };
        route.push(stop(&locations[times.location], times.arrival, role));
    }

    route.push(stop(
        &locations[base],
        solved.timeline.return_arrival,
        StopRole::End,
    ));
    route
}

fn stop(location: &Location, arrival: i32, role: StopRole) -> ItineraryStop {
    ItineraryStop {
        address: location.address.clone(),
        label: location.label.clone(),
        arrival_time: format_clock(arrival),
        service_time: location.service_minutes,
        role,
    }
}
