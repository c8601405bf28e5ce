//! Integration tests for the spatial index module.
//!
//! These tests verify:
//! - Radius queries return exactly the brute-force result set
//! - Boundary distances are included
//! - Nearest-neighbour queries and their ordering
//! - Deterministic ordering of equidistant results

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starlanes_lib::{Point3, SpatialIndex, Star};

/// Stars scattered uniformly through a sphere, with zero-padded identifiers
/// so lexicographic and numeric order agree.
fn seeded_star_field(count: usize, radius: f64, seed: u64) -> Vec<Star> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let r = radius * rng.gen::<f64>().cbrt();
            let theta = rng.gen::<f64>() * std::f64::consts::TAU;
            let phi = (2.0 * rng.gen::<f64>() - 1.0).acos();
            Star::new(
                format!("STAR-{i:04}"),
                Point3::new(
                    r * phi.sin() * theta.cos(),
                    r * phi.sin() * theta.sin(),
                    r * phi.cos(),
                ),
            )
        })
        .collect()
}

fn brute_force_within(stars: &[Star], center: Point3, radius: f64) -> Vec<(String, f64)> {
    let mut hits: Vec<(String, f64)> = stars
        .iter()
        .map(|star| (star.id.clone(), star.position.distance_to(&center)))
        .filter(|(_, distance)| *distance <= radius)
        .collect();
    hits.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    hits
}

#[test]
fn radius_query_matches_brute_force_scan() {
    let stars = seeded_star_field(300, 50.0, 12345);
    let index = SpatialIndex::build(&stars).expect("build index");

    for center in [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(10.0, -20.0, 5.0),
        Point3::new(60.0, 60.0, 60.0), // outside the field entirely
    ] {
        for radius in [0.0, 3.0, 12.5, 40.0, 200.0] {
            let expected = brute_force_within(&stars, center, radius);
            let actual: Vec<(String, f64)> = index
                .within_radius(center, radius)
                .expect("radius query")
                .into_iter()
                .map(|(star, distance)| (star.id.clone(), distance))
                .collect();
            assert_eq!(
                actual, expected,
                "index and brute force disagree at radius {radius}"
            );
        }
    }
}

#[test]
fn radius_boundary_distance_is_included() {
    let stars = vec![
        Star::new("A", Point3::new(0.0, 0.0, 0.0)),
        Star::new("B", Point3::new(3.0, 4.0, 0.0)), // exactly 5.0 away
        Star::new("C", Point3::new(6.0, 0.0, 0.0)),
    ];
    let index = SpatialIndex::build(&stars).expect("build index");

    let hits = index
        .within_radius(Point3::new(0.0, 0.0, 0.0), 5.0)
        .expect("radius query");
    let ids: Vec<&str> = hits.iter().map(|(star, _)| star.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"], "distance == radius must be a hit");
}

#[test]
fn zero_radius_returns_only_coincident_stars() {
    let stars = vec![
        Star::new("A", Point3::new(1.0, 2.0, 3.0)),
        Star::new("B", Point3::new(1.0, 2.0, 3.0)),
        Star::new("C", Point3::new(1.0, 2.0, 3.1)),
    ];
    let index = SpatialIndex::build(&stars).expect("build index");

    let hits = index
        .within_radius(Point3::new(1.0, 2.0, 3.0), 0.0)
        .expect("radius query");
    let ids: Vec<&str> = hits.iter().map(|(star, _)| star.id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B"]);
    assert!(hits.iter().all(|(_, distance)| *distance == 0.0));
}

#[test]
fn results_are_sorted_by_distance_then_id() {
    let stars = seeded_star_field(150, 30.0, 7);
    let index = SpatialIndex::build(&stars).expect("build index");

    let hits = index
        .within_radius(Point3::new(0.0, 0.0, 0.0), 25.0)
        .expect("radius query");
    for window in hits.windows(2) {
        let closer = (window[0].1, window[0].0.id.as_str());
        let farther = (window[1].1, window[1].0.id.as_str());
        assert!(
            closer <= farther,
            "results out of order: {closer:?} before {farther:?}"
        );
    }
}

#[test]
fn nearest_matches_brute_force_prefix() {
    let stars = seeded_star_field(200, 40.0, 99);
    let index = SpatialIndex::build(&stars).expect("build index");
    let center = Point3::new(5.0, 5.0, 5.0);

    // Brute force: sort everything by (distance, id) and take the prefix.
    let all = brute_force_within(&stars, center, f64::INFINITY);
    for count in [1, 7, 25] {
        let expected: Vec<(String, f64)> = all.iter().take(count).cloned().collect();
        let actual: Vec<(String, f64)> = index
            .nearest(center, count)
            .into_iter()
            .map(|(star, distance)| (star.id.clone(), distance))
            .collect();
        assert_eq!(actual, expected, "nearest({count}) disagrees");
    }
}

#[test]
fn nearest_with_count_beyond_len_returns_everything() {
    let stars = seeded_star_field(10, 20.0, 3);
    let index = SpatialIndex::build(&stars).expect("build index");

    let hits = index.nearest(Point3::new(0.0, 0.0, 0.0), 50);
    assert_eq!(hits.len(), 10);
}

#[test]
fn nearest_to_star_excludes_itself_and_rejects_unknown_ids() {
    let stars = vec![
        Star::new("A", Point3::new(0.0, 0.0, 0.0)),
        Star::new("B", Point3::new(1.0, 0.0, 0.0)),
        Star::new("C", Point3::new(2.0, 0.0, 0.0)),
    ];
    let index = SpatialIndex::build(&stars).expect("build index");

    let hits = index.nearest_to_star("A", 2).expect("nearest to star");
    let ids: Vec<&str> = hits.iter().map(|(star, _)| star.id.as_str()).collect();
    assert_eq!(ids, vec!["B", "C"], "the query star itself is excluded");

    assert!(
        index.nearest_to_star("Nowhere", 2).is_err(),
        "unknown identifier must be rejected"
    );
}

#[test]
fn equidistant_stars_are_ordered_by_identifier() {
    let stars = vec![
        Star::new("D", Point3::new(0.0, 0.0, 1.0)),
        Star::new("B", Point3::new(0.0, 1.0, 0.0)),
        Star::new("C", Point3::new(1.0, 0.0, 0.0)),
    ];
    let index = SpatialIndex::build(&stars).expect("build index");

    let hits = index.nearest(Point3::new(0.0, 0.0, 0.0), 3);
    let ids: Vec<&str> = hits.iter().map(|(star, _)| star.id.as_str()).collect();
    assert_eq!(ids, vec!["B", "C", "D"]);
}
