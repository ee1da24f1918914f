//! End-to-end planning tests over the JSON contract.

use serde_json::json;

use trip_planner::matrix::FixedDurations;
use trip_planner::request::{plan, PlanRequest};
use trip_planner::solver::SolveOptions;
use trip_planner::types::StopRole;

fn city_rows() -> Vec<Vec<i32>> {
    vec![
        vec![0, 12, 23, 34, 45, 21, 32, 28],
        vec![12, 0, 17, 29, 38, 19, 27, 24],
        vec![23, 17, 0, 15, 27, 22, 18, 20],
        vec![34, 29, 15, 0, 16, 25, 21, 19],
        vec![45, 38, 27, 16, 0, 30, 24, 22],
        vec![21, 19, 22, 25, 30, 0, 14, 18],
        vec![32, 27, 18, 21, 24, 14, 0, 13],
        vec![28, 24, 20, 19, 22, 18, 13, 0],
    ]
}

fn city_request() -> PlanRequest {
    // The hotel is not among the addresses, so it is prepended at index 0,
    // matching the first row of the fixture table.
    serde_json::from_value(json!({
        "addresses": [
            "museum", "old town", "gardens", "castle", "market", "gallery", "pier"
        ],
        "hotel_address": "city hotel",
        "service_times": [30, 120, 120, 120, 30, 60, 45],
    }))
    .unwrap()
}

fn role_count(stops: &[trip_planner::itinerary::ItineraryStop], role: StopRole) -> usize {
    stops.iter().filter(|stop| stop.role == role).count()
}

#[test]
fn a_full_day_request_returns_a_labeled_route() {
    let provider = FixedDurations::new(city_rows());
    let response = plan(&city_request(), &provider, &SolveOptions::default());

    assert!(response.success, "error: {:?}", response.error);
    assert_eq!(response.error, None);
    assert_eq!(response.route.len(), 9);

    let first = &response.route[0];
    assert_eq!(first.role, StopRole::Start);
    assert_eq!(first.address, "city hotel");
    assert_eq!(first.arrival_time, "09:00");

    let last = response.route.last().unwrap();
    assert_eq!(last.role, StopRole::End);
    assert_eq!(last.address, "city hotel");
    assert!(last.arrival_time.as_str() <= "21:00");

    assert_eq!(role_count(&response.route, StopRole::Lunch), 1);
    assert_eq!(role_count(&response.route, StopRole::Dinner), 1);
    assert_eq!(role_count(&response.route, StopRole::Attraction), 5);
}

#[test]
fn the_response_serializes_to_the_documented_shape() {
    let provider = FixedDurations::new(city_rows());
    let response = plan(&city_request(), &provider, &SolveOptions::default());
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["success"], json!(true));
    assert!(value["error"].is_null());
    assert_eq!(value["route"][0]["type"], json!("Start"));
    assert_eq!(value["route"][0]["arrival_time"], json!("09:00"));
    assert_eq!(value["route"][0]["service_time"], json!(0));
    // No label was supplied, so none is emitted.
    assert!(value["route"][0].get("label").is_none());
}

#[test]
fn planning_twice_yields_byte_identical_responses() {
    let provider = FixedDurations::new(city_rows());
    let request = city_request();
    let first = plan(&request, &provider, &SolveOptions::default());
    let second = plan(&request, &provider, &SolveOptions::default());
    assert_eq!(first, second);
}

#[test]
fn omitted_hours_fall_back_to_the_documented_defaults() {
    let request = city_request();
    assert_eq!(request.start_hour, 9);
    assert_eq!(request.end_hour, 21);
    assert_eq!(request.lunch_start_hour, 11);
    assert_eq!(request.lunch_end_hour, 13);
    assert_eq!(request.dinner_start_hour, 17);
    assert_eq!(request.dinner_end_hour, 19);
}

#[test]
fn mismatched_lengths_are_reported_not_thrown() {
    let request: PlanRequest = serde_json::from_value(json!({
        "addresses": ["a", "b", "c", "d", "e", "f", "g"],
        "hotel_address": "hotel",
        "service_times": [30, 30, 30, 30, 30, 30],
    }))
    .unwrap();
    let provider = FixedDurations::new(Vec::new());
    let response = plan(&request, &provider, &SolveOptions::default());

    assert!(!response.success);
    assert!(response.route.is_empty());
    assert!(response.error.unwrap().contains("must match"));
}

#[test]
fn a_provider_failure_aborts_before_the_search() {
    let request: PlanRequest = serde_json::from_value(json!({
        "addresses": ["a", "b"],
        "hotel_index": 0,
        "service_times": [0, 30],
    }))
    .unwrap();
    // Table sized for three locations, request resolves to two.
    let provider = FixedDurations::new(vec![vec![0, 1, 2], vec![1, 0, 3], vec![2, 3, 0]]);
    let response = plan(&request, &provider, &SolveOptions::default());

    assert!(!response.success);
    assert!(response.error.unwrap().contains("provider"));
}

#[test]
fn a_lone_hotel_round_trips_at_day_start() {
    let request: PlanRequest = serde_json::from_value(json!({
        "addresses": ["city hotel"],
        "hotel_index": 0,
        "service_times": [0],
    }))
    .unwrap();
    let provider = FixedDurations::new(vec![vec![0]]);
    let response = plan(&request, &provider, &SolveOptions::default());

    assert!(response.success, "error: {:?}", response.error);
    assert_eq!(response.route.len(), 2);
    assert_eq!(response.route[0].role, StopRole::Start);
    assert_eq!(response.route[0].arrival_time, "09:00");
    assert_eq!(response.route[1].role, StopRole::End);
    assert_eq!(response.route[1].arrival_time, "09:00");
}

#[test]
fn meal_window_arrivals_land_inside_their_windows() {
    let request: PlanRequest = serde_json::from_value(json!({
        "addresses": ["cafe", "lookout"],
        "hotel_address": "city hotel",
        "service_times": [120, 60],
    }))
    .unwrap();
    let provider = FixedDurations::new(vec![
        vec![0, 120, 60],
        vec![120, 0, 240],
        vec![60, 240, 0],
    ]);
    let response = plan(&request, &provider, &SolveOptions::default());

    assert!(response.success, "error: {:?}", response.error);
    let kinds: Vec<(StopRole, &str)> = response
        .route
        .iter()
        .map(|stop| (stop.role, stop.arrival_time.as_str()))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (StopRole::Start, "09:00"),
            (StopRole::Lunch, "11:00"),
            (StopRole::Dinner, "17:00"),
            (StopRole::End, "19:00"),
        ]
    );
}

#[test]
fn an_out_of_range_hotel_index_is_rejected_up_front() {
    let request: PlanRequest = serde_json::from_value(json!({
        "addresses": ["museum"],
        "hotel_index": 1,
        "service_times": [30],
        "end_hour": 10,
    }))
    .unwrap();
    let provider = FixedDurations::new(vec![vec![0, 20], vec![20, 0]]);
    let response = plan(&request, &provider, &SolveOptions::default());
    assert!(!response.success);
    assert!(response.error.unwrap().contains("out of range"));
}

#[test]
fn a_short_day_with_a_required_stop_is_infeasible() {
    let request: PlanRequest = serde_json::from_value(json!({
        "addresses": ["museum"],
        "hotel_address": "city hotel",
        "service_times": [30],
        "end_hour": 10,
    }))
    .unwrap();
    let provider = FixedDurations::new(vec![vec![0, 20], vec![20, 0]]);
    let response = plan(&request, &provider, &SolveOptions::default());

    assert!(!response.success);
    assert_eq!(
        response.error.unwrap(),
        "no feasible meal-window placement"
    );
}
