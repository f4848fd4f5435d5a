//! Tests for the clustering driver.

use super::*;
use crate::config::ExtentPolicy;
use crate::testing::init_tracing;

fn clustering(border: f64, positions: &[(f64, f64)]) -> Clustering {
    Clustering::with_sources(
        Config::default().with_border(border),
        positions.iter().copied(),
    )
    .unwrap()
}

#[test]
fn test_first_step_spawns_on_central_point() {
    let mut run = clustering(1.0, &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
    assert_eq!(run.cheapest_candidate().unwrap(), None);

    let step = run.step().unwrap();
    assert_eq!(
        step,
        Some(Step::Spawned {
            rectangle: 0,
            point: PointId::new(1),
        })
    );
    assert_eq!(run.rectangles().len(), 1);
}

#[test]
fn test_close_point_grows_existing_rectangle() {
    let mut run = clustering(1.0, &[(0.0, 0.0), (0.5, 0.0)]);
    run.step().unwrap();

    assert_eq!(
        run.step().unwrap(),
        Some(Step::Grew {
            rectangle: 0,
            point: PointId::new(1),
            cost: 1.0,
        })
    );
    assert!(run.is_finished());
    assert_eq!(run.step().unwrap(), None);
}

#[test]
fn test_distant_point_spawns_new_rectangle() {
    let mut run = clustering(1.0, &[(0.0, 0.0), (100.0, 100.0)]);
    run.step().unwrap();

    let cheapest = run.cheapest_candidate().unwrap().unwrap();
    assert!(cheapest.cost > run.config().promotion_threshold());

    assert_eq!(
        run.step().unwrap(),
        Some(Step::Spawned {
            rectangle: 1,
            point: PointId::new(1),
        })
    );
}

#[test]
fn test_cost_equal_to_threshold_still_grows() {
    // Absorbing (2, 0) costs 2 * 2 = 4 = (2 * border)^2.
    let mut run = clustering(1.0, &[(0.0, 0.0), (2.0, 0.0)]);
    run.step().unwrap();
    assert!(matches!(
        run.step().unwrap(),
        Some(Step::Grew { cost, .. }) if cost == 4.0
    ));
}

#[test]
fn test_candidate_tie_goes_to_first_rectangle() {
    let mut run = clustering(1.0, &[(0.0, 0.0), (100.0, 0.0)]);
    run.step().unwrap();
    run.step().unwrap();
    assert_eq!(run.rectangles().len(), 2);

    // Equidistant from both rectangles.
    let middle = run.add_point(50.0, 0.0, 0.0).unwrap();
    let candidates = run.candidates().unwrap();
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].cost, candidates[1].cost);

    let cheapest = run.cheapest_candidate().unwrap().unwrap();
    assert_eq!(cheapest.rectangle, 0);
    assert_eq!(cheapest.point, middle);
}

#[test]
fn test_zero_border_only_grows_for_free() {
    init_tracing();
    let mut run = clustering(0.0, &[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]);
    run.run().unwrap();

    let coverage = run.into_coverage();
    assert_eq!(coverage.len(), 2);
    assert_eq!(coverage.regions[0].members, vec![0, 1]);
    assert_eq!(coverage.regions[0].bounds, Bounds::new(0.0, 0.0, 1.0, 0.0));
    assert_eq!(coverage.regions[1].members, vec![2]);
}

#[test]
fn test_parallel_candidates_match_sequential() {
    let positions: Vec<(f64, f64)> = (0..40)
        .map(|i| {
            let t = i as f64;
            ((t * 2.3).sin() * 30.0, (t * 1.1).cos() * 30.0)
        })
        .collect();

    let mut sequential = clustering(2.0, &positions);
    let mut parallel = Clustering::with_sources(
        Config::default().with_border(2.0).with_parallel(true),
        positions.iter().copied(),
    )
    .unwrap();

    loop {
        assert_eq!(
            sequential.candidates().unwrap(),
            parallel.candidates().unwrap()
        );
        let a = sequential.step().unwrap();
        let b = parallel.step().unwrap();
        assert_eq!(a, b);
        if a.is_none() {
            break;
        }
    }
}

#[test]
fn test_invalid_source_aborts_before_clustering() {
    let result = Clustering::with_sources(Config::default(), [(0.0, 0.0), (f64::NAN, 1.0)]);
    assert!(matches!(
        result,
        Err(Error::InvalidInput(crate::InvalidInput::NonFinitePosition { index: 1, .. }))
    ));
}

#[test]
#[should_panic(expected = "border must be non-negative")]
fn test_invalid_config_panics() {
    Clustering::new(Config::default().with_border(-0.5));
}

#[test]
fn test_find_efficient_coverage_empty_input() {
    let coverage = find_efficient_coverage(Vec::<Source>::new(), Config::default()).unwrap();
    assert!(coverage.is_empty());
    assert_eq!(coverage.total_area(), 0.0);
    assert_eq!(coverage.member_count(), 0);
}

#[test]
fn test_find_efficient_coverage_accepts_triples() {
    init_tracing();
    let coverage = find_efficient_coverage(
        [(0.0, 0.0, 0.2), (0.5, 0.0, -0.2)],
        Config::default()
            .with_border(1.0)
            .with_extent_policy(ExtentPolicy::Contain),
    )
    .unwrap();

    assert_eq!(coverage.len(), 1);
    assert_eq!(coverage.member_count(), 2);
    assert_eq!(coverage.region_of(0), Some(0));
    assert_eq!(coverage.region_of(1), Some(0));
    assert_eq!(coverage.region_of(2), None);
}

#[test]
fn test_source_conversions() {
    assert_eq!(Source::from((1.0, 2.0)), Source::new(1.0, 2.0));
    assert_eq!(
        Source::from((1.0, 2.0, 0.5)),
        Source::new(1.0, 2.0).with_extent(0.5)
    );
    let source: Source = serde_json::from_str(r#"{"x": 1.0, "y": 2.0}"#).unwrap();
    assert_eq!(source.extent, 0.0);
}

#[test]
fn test_coverage_json_export() {
    let coverage = find_efficient_coverage(
        [(0.0, 0.0), (0.5, 0.0), (100.0, 100.0)],
        Config::default().with_border(1.0),
    )
    .unwrap();

    let json = coverage.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["border"], 1.0);
    assert_eq!(value["regions"].as_array().unwrap().len(), 2);
    assert!(value["regions"][0]["bounds"]["x0"].is_number());
    assert_eq!(value["regions"][1]["members"], serde_json::json!([2]));

    let parsed: Coverage = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, coverage);
}

#[test]
fn test_region_from_rectangle() {
    let mut run = clustering(1.0, &[(2.0, 3.0)]);
    run.run().unwrap();
    let region = Region::from(&run.rectangles()[0]);
    assert_eq!(region.center(), DVec2::new(2.0, 3.0));
    assert_eq!(region.area(), 4.0);
    assert_eq!(region.members, vec![0]);
}
