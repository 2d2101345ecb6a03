//! End-to-end build + query scenarios against concrete coordinates.

use fixed_navmesh::{
    build, build_from_rect, BuildConfig, BuildError, Fixed64, FixedVec2, PathQuery, Polygon,
};

fn p(x: f64, y: f64) -> FixedVec2 {
    FixedVec2::from_f64(x, y)
}

fn open_boundary() -> (FixedVec2, FixedVec2) {
    (p(-5.0, -5.0), p(5.0, 5.0))
}

#[test]
fn open_field_direct_path() {
    let (min, max) = open_boundary();
    let mesh = build_from_rect(min, max, &[], &[], BuildConfig::default()).unwrap();
    let mut query = PathQuery::new(mesh.triangle_count());

    let result = fixed_navmesh::find_path(&mesh, &mut query, p(-4.0, -4.0), p(4.0, 4.0));
    assert!(result.success);
    assert_eq!(result.path, vec![p(-4.0, -4.0), p(4.0, 4.0)]);

    let expected_len = p(-4.0, -4.0).distance(p(4.0, 4.0));
    let diff = (result.length - expected_len).abs();
    assert!(diff.to_f64() < 1e-4, "length {} vs expected {}", result.length, expected_len);
}

#[test]
fn square_obstacle_forces_a_detour() {
    let (min, max) = open_boundary();
    let obstacle = Polygon::new(vec![p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]);
    let mesh = build_from_rect(min, max, &[obstacle], &[], BuildConfig::default()).unwrap();
    let mut query = PathQuery::new(mesh.triangle_count());

    let result = fixed_navmesh::find_path(&mesh, &mut query, p(-3.0, 0.0), p(3.0, 0.0));
    assert!(result.success);

    // spec.md scenario 2: exactly four waypoints, hugging either the top
    // corner pair (-1,1),(1,1) or the bottom corner pair (-1,-1),(1,-1) —
    // either symmetric choice is accepted, but it must be exactly one of
    // the two, not some other corridor.
    let via_top = vec![p(-3.0, 0.0), p(-1.0, 1.0), p(1.0, 1.0), p(3.0, 0.0)];
    let via_bottom = vec![p(-3.0, 0.0), p(-1.0, -1.0), p(1.0, -1.0), p(3.0, 0.0)];
    assert!(
        result.path == via_top || result.path == via_bottom,
        "path {:?} did not hug either symmetric detour corner pair",
        result.path
    );

    let expected_length = p(-3.0, 0.0).distance(p(-1.0, 1.0))
        + p(-1.0, 1.0).distance(p(1.0, 1.0))
        + p(1.0, 1.0).distance(p(3.0, 0.0));
    let diff = (result.length - expected_length).abs();
    assert!(
        diff.to_f64() < 1e-3,
        "length {} vs expected detour length {}",
        result.length,
        expected_length
    );
}

#[test]
fn obstacle_spanning_the_boundary_makes_the_region_unreachable() {
    let (min, max) = open_boundary();
    let band = Polygon::new(vec![p(-0.5, -5.0), p(0.5, -5.0), p(0.5, 5.0), p(-0.5, 5.0)]);
    let mesh = build_from_rect(min, max, &[band], &[], BuildConfig::default()).unwrap();
    let mut query = PathQuery::new(mesh.triangle_count());

    let result = fixed_navmesh::find_path(&mesh, &mut query, p(-3.0, 0.0), p(3.0, 0.0));
    assert!(!result.success);
    assert!(result.path.is_empty());
}

#[test]
fn start_inside_an_obstacle_is_clamped_before_pathing() {
    let (min, max) = open_boundary();
    let obstacle = Polygon::new(vec![p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]);
    let mesh = build_from_rect(min, max, &[obstacle], &[], BuildConfig::default()).unwrap();
    let mut query = PathQuery::new(mesh.triangle_count());

    let result = fixed_navmesh::find_path(&mesh, &mut query, p(0.0, 0.0), p(3.0, 0.0));
    assert!(result.success);

    // (0,0) is the obstacle's centroid: all four edge midpoints are exactly
    // distance 1 away, so clamp_to_mesh's tie-break deterministically picks
    // one of them. spec.md scenario 4's literal example is the right-edge
    // midpoint (1,0), which sits on the straight line to the query end and
    // needs no further detour (length 2); the other three midpoints need a
    // corner detour instead, so pin down the exact expected geometry for
    // whichever one clamping actually produced.
    let clamped_start = result.path.first().copied().unwrap();
    let right = p(1.0, 0.0);
    let left = p(-1.0, 0.0);
    let top = p(0.0, 1.0);
    let bottom = p(0.0, -1.0);
    assert!(
        [right, left, top, bottom].contains(&clamped_start),
        "clamped start {:?} is not one of the obstacle's four edge midpoints",
        clamped_start
    );

    let end = p(3.0, 0.0);
    if clamped_start == right {
        // On the direct line to `end`: no detour needed at all.
        assert_eq!(result.path, vec![right, end]);
        let diff = (result.length - right.distance(end)).abs();
        assert!(diff.to_f64() < 1e-3, "length {} vs expected {}", result.length, right.distance(end));
    } else if clamped_start == left {
        // Symmetric start: the detour may hug either corner pair, same as
        // scenario 2, but must be exactly one of the two.
        let via_top = vec![left, p(-1.0, 1.0), p(1.0, 1.0), end];
        let via_bottom = vec![left, p(-1.0, -1.0), p(1.0, -1.0), end];
        assert!(
            result.path == via_top || result.path == via_bottom,
            "path {:?} did not hug either symmetric detour corner pair",
            result.path
        );
        let expected_length = left.distance(p(-1.0, 1.0)) + p(-1.0, 1.0).distance(p(1.0, 1.0)) + p(1.0, 1.0).distance(end);
        let diff = (result.length - expected_length).abs();
        assert!(diff.to_f64() < 1e-3, "length {} vs expected {}", result.length, expected_length);
    } else if clamped_start == top {
        let expected_path = vec![top, p(1.0, 1.0), end];
        let expected_length = top.distance(p(1.0, 1.0)) + p(1.0, 1.0).distance(end);
        assert_eq!(result.path, expected_path);
        let diff = (result.length - expected_length).abs();
        assert!(diff.to_f64() < 1e-3, "length {} vs expected {}", result.length, expected_length);
    } else {
        let expected_path = vec![bottom, p(1.0, -1.0), end];
        let expected_length = bottom.distance(p(1.0, -1.0)) + p(1.0, -1.0).distance(end);
        assert_eq!(result.path, expected_path);
        let diff = (result.length - expected_length).abs();
        assert!(diff.to_f64() < 1e-3, "length {} vs expected {}", result.length, expected_length);
    }
}

#[test]
fn overlapping_obstacles_reject_the_build() {
    let (min, max) = open_boundary();
    let a = Polygon::new(vec![p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]);
    let b = Polygon::new(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]);
    let err = build_from_rect(min, max, &[a, b], &[], BuildConfig::default()).unwrap_err();
    assert!(matches!(err, BuildError::OverlappingObstacles { a: 0, b: 1, .. }));
}

#[test]
fn funnel_recovers_the_straight_line_on_a_dense_subdivided_mesh() {
    let (min, max) = open_boundary();
    let config = BuildConfig {
        max_triangle_count: Some(200),
        ..BuildConfig::default()
    };
    let mesh = build_from_rect(min, max, &[], &[], config).unwrap();
    assert!(mesh.triangle_count() >= 200);

    let mut query = PathQuery::new(mesh.triangle_count());
    let result = fixed_navmesh::find_path(&mesh, &mut query, p(-4.0, -4.0), p(4.0, 4.0));
    assert!(result.success);

    let expected_len = p(-4.0, -4.0).distance(p(4.0, 4.0));
    let diff = (result.length - expected_len).abs();
    assert!(diff.to_f64() < 1e-3, "expected the corridor to collapse to the direct line");
}

#[test]
fn boundary_with_too_few_vertices_is_rejected() {
    let boundary = Polygon::new(vec![p(0.0, 0.0), p(1.0, 1.0)]);
    let err = build(&boundary, &[], &[], BuildConfig::default()).unwrap_err();
    assert!(matches!(err, BuildError::TooFewBoundaryVertices { found: 2 }));
}
