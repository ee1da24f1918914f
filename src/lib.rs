//! Single-day sightseeing itinerary planner.
//!
//! Orders a set of points of interest around a base location so that the
//! whole day fits inside an operating window and the route passes through
//! lunch and dinner intervals. Travel times come from a pluggable
//! duration-matrix provider; the optimizer itself never estimates them.

pub mod traits;
pub mod types;
pub mod matrix;
pub mod schedule;
pub mod meals;
pub mod solver;
pub mod itinerary;
pub mod request;
pub mod osrm;
pub mod haversine;
