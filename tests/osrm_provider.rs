//! OSRM-backed provider test.
//!
//! Needs a running OSRM instance with Nevada data; set OSRM_URL to enable,
//! e.g. OSRM_URL=http://127.0.0.1:5000. Skipped otherwise.

use trip_planner::osrm::{OsrmClient, OsrmConfig};
use trip_planner::traits::DurationMatrixProvider;
use trip_planner::types::Location;

#[test]
fn osrm_table_produces_a_complete_minute_matrix() {
    let Ok(base_url) = std::env::var("OSRM_URL") else {
        eprintln!("OSRM_URL not set; skipping");
        return;
    };

    let client = OsrmClient::new(OsrmConfig {
        base_url,
        ..OsrmConfig::default()
    })
    .expect("build OSRM client");

    let locations = vec![
        Location::new("bellagio", 0).with_coords(36.1126, -115.1767),
        Location::new("fremont street", 60).with_coords(36.1699, -115.1398),
        Location::new("welcome sign", 15).with_coords(36.0820, -115.1728),
    ];

    let matrix = client.matrix_for(&locations).expect("table lookup");
    assert_eq!(matrix.len(), locations.len());
    for i in 0..locations.len() {
        assert_eq!(matrix.minutes_between(i, i), 0);
        for j in 0..locations.len() {
            if i != j {
                assert!(matrix.minutes_between(i, j) > 0);
            }
        }
    }
}

#[test]
fn missing_coordinates_never_reach_the_network() {
    let client = OsrmClient::new(OsrmConfig::default()).expect("build OSRM client");
    let locations = vec![Location::new("unresolved address", 30)];
    assert!(client.matrix_for(&locations).is_err());
}
