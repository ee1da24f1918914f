//! Route search engine.
//!
//! Exact bitmask dynamic programming over visited subsets for small location
//! counts; nearest-feasible-neighbor construction plus local search beyond
//! that. The objective is lexicographic: most stops visited, then least
//! total travel, then earliest finish.

use rayon::prelude::*;
use tracing::debug;

use crate::matrix::DurationMatrix;
use crate::meals::{self, MealAssignment};
use crate::schedule::{self, Timeline};
use crate::types::{DayWindows, InfeasibleReason, Location, TimeWindow};

/// Exact search is capped here no matter what the caller asks for; the
/// state space doubles per extra location.
const MAX_EXACT_LOCATIONS: usize = 18;

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Largest non-base location count handled by the exact search.
    pub exact_limit: usize,
    /// Iteration cap for the local-search improvement loop.
    pub local_search_iterations: usize,
    /// Construction restarts on the heuristic path.
    pub restarts: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            exact_limit: 16,
            local_search_iterations: 100,
            restarts: 8,
        }
    }
}

/// Whether the search proved optimality or returned its best effort within
/// the iteration budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchQuality {
    Optimal,
    BestEffort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolvedRoute {
    /// Visiting order as indices into the location slice, base excluded.
    pub order: Vec<usize>,
    pub timeline: Timeline,
    /// Meal choices; `None` only when there are no non-base stops.
    pub meals: Option<MealAssignment>,
    pub quality: SearchQuality,
}

/// Finds the best feasible visiting order bracketed by the base.
///
/// Locations the day cannot accommodate are left out; when any non-base
/// stop is visited, the route must also admit a lunch and dinner
/// assignment, otherwise the whole instance is infeasible.
pub fn solve(
    locations: &[Location],
    base: usize,
    matrix: &DurationMatrix,
    windows: &DayWindows,
    options: &SolveOptions,
) -> Result<SolvedRoute, InfeasibleReason> {
    let services: Vec<i32> = locations.iter().map(|l| l.service_minutes).collect();

    let bare = schedule::evaluate(&[], base, &services, matrix, windows.day)
        .map_err(|_| InfeasibleReason::DayTooShort)?;

    let others: Vec<usize> = (0..locations.len()).filter(|&i| i != base).collect();
    if others.is_empty() {
        return Ok(SolvedRoute {
            order: Vec::new(),
            timeline: bare,
            meals: None,
            quality: SearchQuality::Optimal,
        });
    }

    if others.len() <= options.exact_limit.min(MAX_EXACT_LOCATIONS) {
        exact_search(&others, base, &services, matrix, windows)
    } else {
        heuristic_search(&others, base, &services, matrix, windows, options)
    }
}

// ============================================================================
// Exact search: bitmask DP over (visited subset, last stop)
// ============================================================================

/// One DP state cell: earliest departure reaching (subset, last), plus the
/// predecessor stop for route reconstruction. `parent < 0` means the base.
#[derive(Debug, Clone, Copy)]
struct Cell {
    departure: i32,
    parent: i8,
}

const UNREACHED: Cell = Cell {
    departure: i32::MAX,
    parent: -1,
};

impl Cell {
    fn reached(&self) -> bool {
        self.departure != i32::MAX
    }
}

fn exact_search(
    others: &[usize],
    base: usize,
    services: &[i32],
    matrix: &DurationMatrix,
    windows: &DayWindows,
) -> Result<SolvedRoute, InfeasibleReason> {
    let n = others.len();
    let full = 1usize << n;
    let day = windows.day;

    let mut cells = vec![UNREACHED; full * n];

    // Seed single-stop subsets from the base.
    for i in 0..n {
        let location = others[i];
        let arrival = day.start + matrix.minutes_between(base, location);
        if arrival > day.end {
            continue;
        }
        let departure = arrival + services[location];
        if departure + matrix.minutes_between(location, base) > day.end {
            continue;
        }
        cells[(1 << i) * n + i] = Cell {
            departure,
            parent: -1,
        };
    }

    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); n + 1];
    for mask in 1..full {
        layers[mask.count_ones() as usize].push(mask);
    }

    // Layer k+1 reads only completed layer k, so each target mask can be
    // computed independently and written back in one sweep.
    for size in 1..n {
        let updates: Vec<(usize, Vec<Cell>)> = layers[size + 1]
            .par_iter()
            .map(|&mask| (mask, extend_into(mask, others, base, services, matrix, day, &cells)))
            .collect();
        for (mask, row) in updates {
            cells[mask * n..mask * n + n].copy_from_slice(&row);
        }
    }

    // Total service per subset, for the travel-time tie-break.
    let mut service_sums = vec![0i32; full];
    for mask in 1..full {
        let low = mask.trailing_zeros() as usize;
        service_sums[mask] = service_sums[mask & (mask - 1)] + services[others[low]];
    }

    // Close every reachable state with the return leg and rank by objective.
    // Meals need two distinct stops, so singleton subsets never qualify.
    struct Candidate {
        count: u32,
        travel: i32,
        finish: i32,
        mask: usize,
        last: usize,
    }
    let mut candidates = Vec::new();
    for mask in 1..full {
        let count = mask.count_ones();
        if count < 2 {
            continue;
        }
        for last in 0..n {
            if mask & (1 << last) == 0 {
                continue;
            }
            let cell = cells[mask * n + last];
            if !cell.reached() {
                continue;
            }
            let return_leg = matrix.minutes_between(others[last], base);
            candidates.push(Candidate {
                count,
                travel: cell.departure - day.start - service_sums[mask] + return_leg,
                finish: cell.departure + return_leg,
                mask,
                last,
            });
        }
    }
    candidates.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then(a.travel.cmp(&b.travel))
            .then(a.finish.cmp(&b.finish))
            .then(a.mask.cmp(&b.mask))
            .then(a.last.cmp(&b.last))
    });

    debug!(
        states = candidates.len(),
        locations = n,
        "exact search ranked closed states"
    );

    for candidate in &candidates {
        let order = reconstruct(&cells, others, n, candidate.mask, candidate.last);
        let Ok(timeline) = schedule::evaluate(&order, base, services, matrix, day) else {
            continue;
        };
        if let Some(assignment) = meals::assign(&timeline, windows) {
            debug!(
                stops = order.len(),
                finish = timeline.return_arrival,
                "exact search settled"
            );
            return Ok(SolvedRoute {
                order,
                timeline,
                meals: Some(assignment),
                quality: SearchQuality::Optimal,
            });
        }
    }

    Err(InfeasibleReason::NoMealPlacement)
}

/// Computes the DP row for one target mask from its one-smaller subsets.
fn extend_into(
    mask: usize,
    others: &[usize],
    base: usize,
    services: &[i32],
    matrix: &DurationMatrix,
    day: TimeWindow,
    cells: &[Cell],
) -> Vec<Cell> {
    let n = others.len();
    let mut row = vec![UNREACHED; n];
    for last in 0..n {
        if mask & (1 << last) == 0 {
            continue;
        }
        let previous_mask = mask & !(1 << last);
        let location = others[last];
        let mut best = UNREACHED;
        for previous in 0..n {
            if previous_mask & (1 << previous) == 0 {
                continue;
            }
            let cell = cells[previous_mask * n + previous];
            if !cell.reached() {
                continue;
            }
            let arrival = cell.departure + matrix.minutes_between(others[previous], location);
            if arrival > day.end {
                continue;
            }
            let departure = arrival + services[location];
            if departure + matrix.minutes_between(location, base) > day.end {
                continue;
            }
            if departure < best.departure {
                best = Cell {
                    departure,
                    parent: previous as i8,
                };
            }
        }
        row[last] = best;
    }
    row
}

/// Follows parent pointers back to the base.
fn reconstruct(cells: &[Cell], others: &[usize], n: usize, mask: usize, last: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(mask.count_ones() as usize);
    let mut mask = mask;
    let mut last = last;
    loop {
        order.push(others[last]);
        let parent = cells[mask * n + last].parent;
        mask &= !(1 << last);
        if parent < 0 {
            break;
        }
        last = parent as usize;
    }
    order.reverse();
    order
}

// ============================================================================
// Heuristic path: greedy construction + local search
// ============================================================================

fn heuristic_search(
    others: &[usize],
    base: usize,
    services: &[i32],
    matrix: &DurationMatrix,
    windows: &DayWindows,
    options: &SolveOptions,
) -> Result<SolvedRoute, InfeasibleReason> {
    let mut best: Option<SolvedRoute> = None;

    let restarts = options.restarts.clamp(1, others.len());
    for seed in 0..restarts {
        let mut order = construct(others, base, services, matrix, windows.day, seed);
        local_search(&mut order, others, base, services, matrix, windows.day, options);

        let Ok(timeline) = schedule::evaluate(&order, base, services, matrix, windows.day) else {
            continue;
        };
        let Some(assignment) = meals::assign(&timeline, windows) else {
            continue;
        };
        debug!(seed, stops = order.len(), "heuristic restart produced a route");

        let keep = match &best {
            Some(incumbent) => improves(&timeline, &incumbent.timeline),
            None => true,
        };
        if keep {
            best = Some(SolvedRoute {
                order,
                timeline,
                meals: Some(assignment),
                quality: SearchQuality::BestEffort,
            });
        }
    }

    best.ok_or(InfeasibleReason::NoMealPlacement)
}

/// Greedy construction: repeatedly extend with the nearest unvisited stop
/// that keeps the partial route (plus the owed return leg) inside the day.
/// `seed` picks the seed-th nearest stop for the first extension, giving
/// each restart a different opening.
fn construct(
    others: &[usize],
    base: usize,
    services: &[i32],
    matrix: &DurationMatrix,
    day: TimeWindow,
    seed: usize,
) -> Vec<usize> {
    let mut remaining: Vec<usize> = others.to_vec();
    let mut order = Vec::new();
    let mut time = day.start;
    let mut current = base;
    let mut first = true;

    while !remaining.is_empty() {
        let mut feasible: Vec<(i32, usize)> = remaining
            .iter()
            .enumerate()
            .filter_map(|(slot, &location)| {
                let travel = matrix.minutes_between(current, location);
                let arrival = time + travel;
                if arrival > day.end {
                    return None;
                }
                let departure = arrival + services[location];
                if departure + matrix.minutes_between(location, base) > day.end {
                    return None;
                }
                Some((travel, slot))
            })
            .collect();
        if feasible.is_empty() {
            break;
        }
        feasible.sort();

        let (travel, slot) = if first {
            feasible[seed.min(feasible.len() - 1)]
        } else {
            feasible[0]
        };
        first = false;

        let location = remaining.remove(slot);
        time += travel + services[location];
        current = location;
        order.push(location);
    }

    order
}

fn objective(timeline: &Timeline) -> (usize, i32, i32) {
    (
        timeline.stops.len(),
        timeline.total_travel,
        timeline.return_arrival,
    )
}

/// Strict lexicographic improvement: more stops, else same stops with less
/// travel, else an earlier finish.
fn improves(candidate: &Timeline, incumbent: &Timeline) -> bool {
    let (count, travel, finish) = objective(candidate);
    let (base_count, base_travel, base_finish) = objective(incumbent);
    count > base_count
        || (count == base_count
            && (travel < base_travel || (travel == base_travel && finish < base_finish)))
}

/// First-improvement local search over insertion of an unvisited stop,
/// pairwise exchange, and single-stop relocation.
fn local_search(
    order: &mut Vec<usize>,
    others: &[usize],
    base: usize,
    services: &[i32],
    matrix: &DurationMatrix,
    day: TimeWindow,
    options: &SolveOptions,
) {
    let Ok(mut incumbent) = schedule::evaluate(order, base, services, matrix, day) else {
        return;
    };

    for _ in 0..options.local_search_iterations {
        if insert_improve(order, &mut incumbent, others, base, services, matrix, day) {
            continue;
        }
        if exchange_improve(order, &mut incumbent, base, services, matrix, day) {
            continue;
        }
        if relocate_improve(order, &mut incumbent, base, services, matrix, day) {
            continue;
        }
        break;
    }
}

/// Try adding a skipped stop at every position. Returns true on the first
/// improving, feasible insertion.
fn insert_improve(
    order: &mut Vec<usize>,
    incumbent: &mut Timeline,
    others: &[usize],
    base: usize,
    services: &[i32],
    matrix: &DurationMatrix,
    day: TimeWindow,
) -> bool {
    for &location in others {
        if order.contains(&location) {
            continue;
        }
        for position in 0..=order.len() {
            let mut candidate = order.clone();
            candidate.insert(position, location);
            if let Ok(timeline) = schedule::evaluate(&candidate, base, services, matrix, day) {
                if improves(&timeline, incumbent) {
                    *order = candidate;
                    *incumbent = timeline;
                    return true;
                }
            }
        }
    }
    false
}

/// Swap two visited stops. Returns true on the first improving exchange.
fn exchange_improve(
    order: &mut Vec<usize>,
    incumbent: &mut Timeline,
    base: usize,
    services: &[i32],
    matrix: &DurationMatrix,
    day: TimeWindow,
) -> bool {
    for i in 0..order.len() {
        for j in i + 1..order.len() {
            let mut candidate = order.clone();
            candidate.swap(i, j);
            if let Ok(timeline) = schedule::evaluate(&candidate, base, services, matrix, day) {
                if improves(&timeline, incumbent) {
                    *order = candidate;
                    *incumbent = timeline;
                    return true;
                }
            }
        }
    }
    false
}

/// Move one visited stop to another position. Returns true on the first
/// improving relocation.
fn relocate_improve(
    order: &mut Vec<usize>,
    incumbent: &mut Timeline,
    base: usize,
    services: &[i32],
    matrix: &DurationMatrix,
    day: TimeWindow,
) -> bool {
    for from in 0..order.len() {
        for to in 0..order.len() {
            if to == from {
                continue;
            }
            let mut candidate = order.clone();
            let location = candidate.remove(from);
            candidate.insert(to, location);
            if candidate == *order {
                continue;
            }
            if let Ok(timeline) = schedule::evaluate(&candidate, base, services, matrix, day) {
                if improves(&timeline, incumbent) {
                    *order = candidate;
                    *incumbent = timeline;
                    return true;
                }
            }
        }
    }
    false
}
