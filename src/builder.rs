//! Build pipeline orchestration (§2 data flow, §4.3-§4.5): validates
//! input, runs constrained Delaunay triangulation, carves holes, optionally
//! subdivides, and finalizes into a queryable [`NavMesh`].

use tracing::{debug, warn};

use crate::error::{BuildError, BuildResult};
use crate::fixed::Fixed64;
use crate::geom::Polygon;
use crate::navmesh::NavMesh;
use crate::triangulate::constrain::{
    recover_constraint_edge, remove_degenerate, remove_super_triangle_triangles,
    remove_triangles_where, validate_no_obstacle_overlap,
};
use crate::triangulate::delaunay::{add_super_triangle, bowyer_watson};
use crate::triangulate::subdivide::subdivide_to_target;
use crate::triangulate::{snap_vertices, WorkingTriangle};
use crate::vec2::FixedVec2;

/// Tunables for [`build`] / [`build_from_rect`]. Every numeric threshold
/// §4 names a concrete default for is exposed here rather than hardcoded,
/// so callers can tune mesh quality per scene without forking the builder.
#[derive(Clone, Copy, Debug)]
pub struct BuildConfig {
    pub snap_tolerance: Fixed64,
    pub grid_resolution: u32,
    pub min_triangle_area: Fixed64,
    pub super_triangle_margin: Fixed64,
    pub max_triangle_count: Option<u32>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            snap_tolerance: Fixed64::from_f64(1e-4),
            grid_resolution: 32,
            min_triangle_area: Fixed64::from_f64(1e-4),
            super_triangle_margin: Fixed64::from_int(20),
            max_triangle_count: None,
        }
    }
}

const MAX_FLIP_ITERATIONS_FACTOR: usize = 2;

/// Builds a NavMesh from a boundary polygon, obstacle polygons (holes) and
/// optional walkable Steiner-point polygons (§4.3, §6).
pub fn build(
    boundary: &Polygon,
    obstacles: &[Polygon],
    walkables: &[Polygon],
    config: BuildConfig,
) -> BuildResult<NavMesh> {
    if boundary.len() < 3 {
        return Err(BuildError::TooFewBoundaryVertices { found: boundary.len() });
    }

    validate_no_obstacle_overlap(obstacles)?;

    let mut raw_points: Vec<FixedVec2> = Vec::new();
    raw_points.extend_from_slice(boundary.vertices());
    for obstacle in obstacles {
        raw_points.extend_from_slice(obstacle.vertices());
    }
    for walkable in walkables {
        raw_points.extend_from_slice(walkable.vertices());
    }

    let (mut vertices, mapping) = snap_vertices(&raw_points, config.snap_tolerance);
    let real_vertex_count = vertices.len() as u32;
    debug!(
        input = raw_points.len(),
        snapped = vertices.len(),
        "collected navmesh input vertices"
    );

    let mut offset = 0usize;
    let boundary_indices: Vec<u32> = (0..boundary.len()).map(|i| mapping[offset + i]).collect();
    offset += boundary.len();
    let mut obstacle_indices: Vec<Vec<u32>> = Vec::with_capacity(obstacles.len());
    for obstacle in obstacles {
        obstacle_indices.push((0..obstacle.len()).map(|i| mapping[offset + i]).collect());
        offset += obstacle.len();
    }

    let super_triangle = add_super_triangle(&mut vertices, config.super_triangle_margin);
    let point_indices: Vec<u32> = (0..real_vertex_count).collect();
    let mut triangles = bowyer_watson(&vertices, super_triangle, &point_indices);

    let max_iterations = MAX_FLIP_ITERATIONS_FACTOR * triangles.len().max(1);
    recover_polygon_edges(
        &vertices,
        &mut triangles,
        &boundary_indices,
        max_iterations,
        config.min_triangle_area,
    );
    for indices in &obstacle_indices {
        recover_polygon_edges(
            &vertices,
            &mut triangles,
            indices,
            max_iterations,
            config.min_triangle_area,
        );
    }

    let boundary_polygon = Polygon::new(boundary_indices.iter().map(|&i| vertices[i as usize]).collect());
    let obstacle_polygons: Vec<Polygon> = obstacle_indices
        .iter()
        .map(|idx| Polygon::new(idx.iter().map(|&i| vertices[i as usize]).collect()))
        .collect();

    triangles = remove_triangles_where(&vertices, triangles, |centroid| {
        !boundary_polygon.contains_point(centroid)
    });
    for obstacle in &obstacle_polygons {
        triangles = remove_triangles_where(&vertices, triangles, |centroid| obstacle.contains_point(centroid));
    }

    triangles = remove_degenerate(&vertices, triangles, config.min_triangle_area);
    triangles = remove_super_triangle_triangles(triangles, real_vertex_count);

    if triangles.is_empty() {
        return Err(BuildError::EmptyTriangulation);
    }

    if let Some(target) = config.max_triangle_count {
        subdivide_to_target(&mut vertices, &mut triangles, target as usize);
    }

    debug!(
        triangles = triangles.len(),
        vertices = vertices.len(),
        "navmesh triangulation finalized"
    );

    Ok(NavMesh::finalize(vertices, triangles, config.grid_resolution))
}

/// Convenience entry point for an axis-aligned rectangular boundary (§6).
pub fn build_from_rect(
    min: FixedVec2,
    max: FixedVec2,
    obstacles: &[Polygon],
    walkables: &[Polygon],
    config: BuildConfig,
) -> BuildResult<NavMesh> {
    let boundary = Polygon::new(vec![
        FixedVec2::new(min.x, min.y),
        FixedVec2::new(max.x, min.y),
        FixedVec2::new(max.x, max.y),
        FixedVec2::new(min.x, max.y),
    ]);
    build(&boundary, obstacles, walkables, config)
}

fn recover_polygon_edges(
    vertices: &[FixedVec2],
    triangles: &mut Vec<WorkingTriangle>,
    indices: &[u32],
    max_iterations: usize,
    min_area: Fixed64,
) {
    let n = indices.len();
    for i in 0..n {
        let a = indices[i];
        let b = indices[(i + 1) % n];
        if a == b {
            continue;
        }
        if !recover_constraint_edge(vertices, triangles, a, b, max_iterations, min_area) {
            warn!(
                v0 = a,
                v1 = b,
                "constraint edge could not be recovered within the flip-iteration bound; corridor may be missing"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> FixedVec2 {
        FixedVec2::from_f64(x, y)
    }

    #[test]
    fn open_field_builds_two_triangles() {
        let mesh = build_from_rect(p(-5.0, -5.0), p(5.0, 5.0), &[], &[], BuildConfig::default()).unwrap();
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn overlapping_obstacles_reject_the_build() {
        let a = Polygon::new(vec![p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]);
        let b = Polygon::new(vec![p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0), p(0.0, 2.0)]);
        let err = build_from_rect(p(-5.0, -5.0), p(5.0, 5.0), &[a, b], &[], BuildConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::OverlappingObstacles { .. }));
    }

    #[test]
    fn too_few_boundary_vertices_is_rejected() {
        let boundary = Polygon::new(vec![p(0.0, 0.0), p(1.0, 0.0)]);
        let err = build(&boundary, &[], &[], BuildConfig::default()).unwrap_err();
        assert!(matches!(err, BuildError::TooFewBoundaryVertices { found: 2 }));
    }

    #[test]
    fn square_obstacle_carves_a_hole() {
        let obstacle = Polygon::new(vec![p(-1.0, -1.0), p(1.0, -1.0), p(1.0, 1.0), p(-1.0, 1.0)]);
        let mesh = build_from_rect(
            p(-5.0, -5.0),
            p(5.0, 5.0),
            &[obstacle],
            &[],
            BuildConfig::default(),
        )
        .unwrap();

        for i in 0..mesh.triangle_count() {
            let centroid = mesh.get_triangle_geometry(i).centroid();
            assert!(centroid.x.abs() > Fixed64::ONE || centroid.y.abs() > Fixed64::ONE);
        }
    }

    #[test]
    fn subdivision_target_is_honored() {
        let config = BuildConfig {
            max_triangle_count: Some(32),
            ..BuildConfig::default()
        };
        let mesh = build_from_rect(p(-5.0, -5.0), p(5.0, 5.0), &[], &[], config).unwrap();
        assert!(mesh.triangle_count() >= 32);
    }
}
