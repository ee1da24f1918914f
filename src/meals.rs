//! Meal-window assignment for a scheduled route.
//!
//! A pure post-condition labeler: it never recomputes arrival times and
//! never reorders anything. Failure here is the signal the search engine
//! uses to reject a candidate ordering.

use crate::schedule::Timeline;
use crate::types::{DayWindows, TimeWindow};

/// Positions (into `Timeline::stops`) chosen for the two meals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MealAssignment {
    pub lunch: usize,
    pub dinner: usize,
}

/// Picks the lunch and dinner stops for a scheduled route, or `None` when
/// the obligations cannot be met by two distinct stops.
pub fn assign(timeline: &Timeline, windows: &DayWindows) -> Option<MealAssignment> {
    let lunch = candidates(timeline, windows.lunch);
    let dinner = candidates(timeline, windows.dinner);
    if lunch.is_empty() || dinner.is_empty() {
        return None;
    }

    if lunch[0] != dinner[0] {
        return Some(MealAssignment {
            lunch: lunch[0],
            dinner: dinner[0],
        });
    }

    // One stop heads both lists; dinner takes its runner-up, then lunch yields.
    if let Some(&alternative) = dinner.get(1) {
        return Some(MealAssignment {
            lunch: lunch[0],
            dinner: alternative,
        });
    }
    if let Some(&alternative) = lunch.get(1) {
        return Some(MealAssignment {
            lunch: alternative,
            dinner: dinner[0],
        });
    }
    None
}

/// Stop positions whose visit interval overlaps `window`, ordered by
/// closeness of arrival to the window midpoint, earliest arrival on ties.
fn candidates(timeline: &Timeline, window: TimeWindow) -> Vec<usize> {
    let mut positions: Vec<usize> = timeline
        .stops
        .iter()
        .enumerate()
        .filter(|(_, stop)| window.intersects(stop.arrival, stop.departure))
        .map(|(position, _)| position)
        .collect();
    // Doubling avoids halving the midpoint into a fractional minute.
    let doubled_midpoint = window.start + window.end;
    positions.sort_by_key(|&position| {
        let arrival = timeline.stops[position].arrival;
        ((2 * arrival - doubled_midpoint).abs(), arrival, position)
    });
    positions
}
