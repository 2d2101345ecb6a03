//! Bit-exact serialize/deserialize round trip (§6, §8): a mesh rebuilt from
//! its persisted vertex/triangle arrays must answer every query identically.

#![cfg(feature = "serde")]

use fixed_navmesh::{build_from_rect, find_path, BuildConfig, FixedVec2, NavMesh, PathQuery, Polygon};

fn p(x: f64, y: f64) -> FixedVec2 {
    FixedVec2::from_f64(x, y)
}

fn scene() -> NavMesh {
    let obstacle = Polygon::new(vec![p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]);
    build_from_rect(p(-5.0, -5.0), p(5.0, 5.0), &[obstacle], &[], BuildConfig::default()).unwrap()
}

#[test]
fn round_trip_preserves_vertex_and_triangle_data() {
    let mesh = scene();
    let json = serde_json::to_string(&mesh).unwrap();
    let restored: NavMesh = serde_json::from_str(&json).unwrap();

    assert_eq!(mesh.vertex_count(), restored.vertex_count());
    assert_eq!(mesh.triangle_count(), restored.triangle_count());
    for i in 0..mesh.vertex_count() {
        assert_eq!(mesh.get_vertex(i), restored.get_vertex(i));
    }
    for i in 0..mesh.triangle_count() {
        assert_eq!(mesh.get_triangle(i), restored.get_triangle(i));
    }
}

#[test]
fn round_trip_preserves_query_results() {
    let mesh = scene();
    let json = serde_json::to_string(&mesh).unwrap();
    let restored: NavMesh = serde_json::from_str(&json).unwrap();

    let mut q1 = PathQuery::new(mesh.triangle_count());
    let mut q2 = PathQuery::new(restored.triangle_count());

    let r1 = find_path(&mesh, &mut q1, p(-3.0, 0.0), p(3.0, 0.0));
    let r2 = find_path(&restored, &mut q2, p(-3.0, 0.0), p(3.0, 0.0));

    assert_eq!(r1.success, r2.success);
    assert_eq!(r1.path, r2.path);
    assert_eq!(r1.length, r2.length);
}
