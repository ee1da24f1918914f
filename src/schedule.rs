//! Feasibility evaluation: walk an ordering forward and check the day window.

use crate::matrix::DurationMatrix;
use crate::types::TimeWindow;

/// Arrival and departure of one scheduled stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopTimes {
    /// Index into the location slice.
    pub location: usize,
    pub arrival: i32,
    pub departure: i32,
}

/// Computed times for one base-to-base walk of an ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    pub stops: Vec<StopTimes>,
    /// Arrival back at the base.
    pub return_arrival: i32,
    /// Sum of travel legs, service excluded.
    pub total_travel: i32,
}

/// Why an ordering was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Arrival at the stop in this order position falls after day end.
    LateArrival { position: usize, arrival: i32 },
    /// Arrival back at the base falls after day end.
    LateReturn { arrival: i32 },
}

/// Walks `order` (location indices, base excluded) bracketed by the base at
/// both ends, starting at `day.start`. Pure over its inputs; meal windows
/// are not this layer's concern.
pub fn evaluate(
    order: &[usize],
    base: usize,
    service_minutes: &[i32],
    matrix: &DurationMatrix,
    day: TimeWindow,
) -> Result<Timeline, Rejection> {
    let mut time = day.start;
    let mut previous = base;
    let mut total_travel = 0;
    let mut stops = Vec::with_capacity(order.len());

    for (position, &location) in order.iter().enumerate() {
        let travel = matrix.minutes_between(previous, location);
        let arrival = time + travel;
        if arrival > day.end {
            return Err(Rejection::LateArrival { position, arrival });
        }
        let departure = arrival + service_minutes[location];
        stops.push(StopTimes {
            location,
            arrival,
            departure,
        });
        total_travel += travel;
        time = departure;
        previous = location;
    }

    let travel = matrix.minutes_between(previous, base);
    let return_arrival = time + travel;
    if return_arrival > day.end {
        return Err(Rejection::LateReturn {
            arrival: return_arrival,
        });
    }
    total_travel += travel;

    Ok(Timeline {
        stops,
        return_arrival,
        total_travel,
    })
}
