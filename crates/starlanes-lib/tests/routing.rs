//! Integration tests for the route-finding service.
//!
//! These tests verify:
//! - End-to-end request/response behavior on the worked example
//! - Exclusion pruning, including rerouting around an excluded star
//! - Error classification (invalid request vs unknown star vs no route)
//! - JSON shapes for requests and results

use starlanes_lib::{find_routes, BuildStrategy, Error, Point3, RouteRequest, Star};

fn fixture_stars() -> Vec<Star> {
    vec![
        Star::new("A", Point3::new(0.0, 0.0, 0.0)),
        Star::new("B", Point3::new(3.0, 0.0, 0.0)),
        Star::new("C", Point3::new(3.0, 4.0, 0.0)),
        Star::new("D", Point3::new(10.0, 10.0, 10.0)),
    ]
}

fn diamond_stars() -> Vec<Star> {
    vec![
        Star::new("A", Point3::new(0.0, 0.0, 0.0)),
        Star::new("B", Point3::new(1.0, 1.0, 0.0)),
        Star::new("C", Point3::new(1.0, -1.0, 0.0)),
        Star::new("D", Point3::new(2.0, 0.0, 0.0)),
    ]
}

#[test]
fn end_to_end_route_search() {
    let request = RouteRequest::new("A", "C", 5.1).with_route_count(2);
    let set = find_routes(&fixture_stars(), &request).expect("search");

    assert_eq!(set.origin, "A");
    assert_eq!(set.destination, "C");
    assert_eq!(set.max_jump_distance, 5.1);
    assert_eq!(set.strategy, BuildStrategy::Naive, "auto resolves by count");
    assert_eq!(set.len(), 2);

    let best = set.best().expect("best route");
    assert_eq!(best.steps, vec!["A", "C"]);
    assert_eq!(best.total_distance, 5.0);
    assert_eq!(set.routes[1].steps, vec!["A", "B", "C"]);
    assert_eq!(set.routes[1].total_distance, 7.0);
}

#[test]
fn excluded_star_forces_a_detour() {
    let request = RouteRequest::new("A", "D", 1.5).with_excluded_stars(["B"]);
    let set = find_routes(&diamond_stars(), &request).expect("search");

    let best = set.best().expect("detour exists");
    assert_eq!(best.steps, vec!["A", "C", "D"], "routes around excluded B");

    // Excluding a star off the route changes nothing.
    let request = RouteRequest::new("A", "D", 1.5).with_excluded_stars(["C"]);
    let set = find_routes(&diamond_stars(), &request).expect("search");
    assert_eq!(set.best().expect("route exists").steps, vec!["A", "B", "D"]);
}

#[test]
fn exclusion_can_disconnect_the_route() {
    let stars = vec![
        Star::new("A", Point3::new(0.0, 0.0, 0.0)),
        Star::new("B", Point3::new(1.0, 0.0, 0.0)),
        Star::new("C", Point3::new(2.0, 0.0, 0.0)),
    ];
    let request = RouteRequest::new("A", "C", 1.5).with_excluded_stars(["B"]);
    let set = find_routes(&stars, &request).expect("search");
    assert!(set.is_empty(), "the only waypoint was excluded");
    assert!(set.best().is_none());
}

#[test]
fn excluded_endpoint_is_an_invalid_request() {
    let request = RouteRequest::new("A", "D", 5.1).with_excluded_stars(["A"]);
    let err = find_routes(&fixture_stars(), &request).expect_err("must fail");
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn zero_route_count_is_an_invalid_request() {
    let request = RouteRequest::new("A", "C", 5.1).with_route_count(0);
    let err = find_routes(&fixture_stars(), &request).expect_err("must fail");
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn unknown_endpoint_is_distinguished_from_no_route() {
    let request = RouteRequest::new("A", "Nowhere", 5.1);
    let err = find_routes(&fixture_stars(), &request).expect_err("must fail");
    match err {
        Error::UnknownStar { id } => assert_eq!(id, "Nowhere"),
        other => panic!("expected UnknownStar, got {other:?}"),
    }
}

#[test]
fn unreachable_destination_yields_an_empty_set() {
    let request = RouteRequest::new("A", "D", 5.1).with_route_count(3);
    let set = find_routes(&fixture_stars(), &request).expect("search");
    assert!(set.is_empty(), "no jump chain reaches D");
    assert_eq!(set.origin, "A");
    assert_eq!(set.destination, "D");
    assert_eq!(set.strategy, BuildStrategy::Naive);
}

#[test]
fn requested_strategy_is_honoured_and_recorded() {
    let request = RouteRequest::new("A", "C", 5.1).with_strategy(BuildStrategy::Spatial);
    let set = find_routes(&fixture_stars(), &request).expect("search");
    assert_eq!(set.strategy, BuildStrategy::Spatial);
    assert_eq!(set.best().expect("route exists").steps, vec!["A", "C"]);
}

#[test]
fn request_json_fills_in_defaults() {
    let request: RouteRequest =
        serde_json::from_str(r#"{"origin":"A","destination":"C","max_jump_distance":5.1}"#)
            .expect("parse request");
    assert_eq!(request.origin, "A");
    assert_eq!(request.route_count, 1);
    assert!(request.excluded_stars.is_empty());
    assert_eq!(request.strategy, BuildStrategy::Auto);

    let request: RouteRequest = serde_json::from_str(
        r#"{"origin":"A","destination":"C","max_jump_distance":5.1,"route_count":4,"strategy":"spatial"}"#,
    )
    .expect("parse request");
    assert_eq!(request.route_count, 4);
    assert_eq!(request.strategy, BuildStrategy::Spatial);
}

#[test]
fn route_set_serializes_for_presentation() {
    let request = RouteRequest::new("A", "C", 5.1).with_route_count(2);
    let set = find_routes(&fixture_stars(), &request).expect("search");

    let value = serde_json::to_value(&set).expect("serialize");
    assert_eq!(value["origin"], "A");
    assert_eq!(value["strategy"], "naive");
    assert_eq!(value["routes"][0]["steps"][0], "A");
    assert_eq!(value["routes"][0]["steps"][1], "C");
    assert_eq!(value["routes"][0]["total_distance"], 5.0);
    assert_eq!(value["routes"][1]["steps"].as_array().map(Vec::len), Some(3));
}
