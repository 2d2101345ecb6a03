//! Constraint-edge recovery by flipping, hole carving, exterior removal,
//! the degenerate filter, super-triangle cleanup, and obstacle-overlap
//! validation (§4.3 steps 1, 4–8).

use crate::error::BuildError;
use crate::fixed::Fixed64;
use crate::geom::{segments_strictly_cross, Polygon};
use crate::triangulate::common::{compute_adjacency, WorkingTriangle};
use crate::vec2::FixedVec2;

/// §4.3 step 1: reject the build if any two obstacle polygons overlap,
/// either by an edge-edge crossing (ignoring identical shared edges) or by
/// a non-shared vertex of one lying inside the other.
pub fn validate_no_obstacle_overlap(obstacles: &[Polygon]) -> Result<(), BuildError> {
    for i in 0..obstacles.len() {
        for j in (i + 1)..obstacles.len() {
            let a = &obstacles[i];
            let b = &obstacles[j];

            for (p0, p1) in a.edges() {
                for (q0, q1) in b.edges() {
                    if segments_strictly_cross(p0, p1 - p0, q0, q1 - q0) {
                        return Err(BuildError::OverlappingObstacles {
                            a: i,
                            b: j,
                            detail: "obstacle edges cross",
                        });
                    }
                }
            }

            for &v in a.vertices() {
                if b.contains_point(v) {
                    return Err(BuildError::OverlappingObstacles {
                        a: i,
                        b: j,
                        detail: "a vertex of one obstacle lies inside the other",
                    });
                }
            }
            for &v in b.vertices() {
                if a.contains_point(v) {
                    return Err(BuildError::OverlappingObstacles {
                        a: i,
                        b: j,
                        detail: "a vertex of one obstacle lies inside the other",
                    });
                }
            }
        }
    }
    Ok(())
}

fn has_edge(triangles: &[WorkingTriangle], a: u32, b: u32) -> bool {
    triangles
        .iter()
        .any(|t| (0..3).any(|e| t.edge(e) == (a, b) || t.edge(e) == (b, a)))
}

/// Finds one side of an internal (non-boundary) edge that strictly crosses
/// the segment `(a,b)`, returning `(triangle index, edge index)`. Edges
/// touching either constraint endpoint are never candidates — a segment
/// that merely touches `a` or `b` is not a crossing to resolve.
fn find_crossing_edge(
    vertices: &[FixedVec2],
    triangles: &[WorkingTriangle],
    adjacency: &[[i32; 3]],
    a: u32,
    b: u32,
) -> Option<(usize, usize)> {
    let pa = vertices[a as usize];
    let pb = vertices[b as usize];

    for (t_idx, tri) in triangles.iter().enumerate() {
        for e in 0..3 {
            if adjacency[t_idx][e] < 0 {
                continue;
            }
            let (v0, v1) = tri.edge(e);
            if v0 == a || v0 == b || v1 == a || v1 == b {
                continue;
            }
            let p0 = vertices[v0 as usize];
            let p1 = vertices[v1 as usize];
            if segments_strictly_cross(pa, pb - pa, p0, p1 - p0) {
                return Some((t_idx, e));
            }
        }
    }
    None
}

/// Flips the diagonal of the quad formed by the two triangles sharing edge
/// `e` of `triangles[t_idx]`. Returns `false` (no mutation) if either
/// resulting triangle would have non-positive area.
fn try_flip(
    vertices: &[FixedVec2],
    triangles: &mut [WorkingTriangle],
    adjacency: &[[i32; 3]],
    t_idx: usize,
    e: usize,
    min_area: Fixed64,
) -> bool {
    let u_idx = adjacency[t_idx][e];
    if u_idx < 0 {
        return false;
    }
    let u_idx = u_idx as usize;

    let (v0, v1) = triangles[t_idx].edge(e);
    let r = triangles[t_idx]
        .verts()
        .into_iter()
        .find(|&v| v != v0 && v != v1)
        .unwrap();

    let u_verts = triangles[u_idx].verts();
    let s = u_verts.into_iter().find(|&v| v != v0 && v != v1).unwrap();

    let new_t1 = WorkingTriangle::new(v0, s, r);
    let new_t2 = WorkingTriangle::new(v1, r, s);

    if new_t1.geometry(vertices).signed_area_x2() <= min_area
        || new_t2.geometry(vertices).signed_area_x2() <= min_area
    {
        return false;
    }

    triangles[t_idx] = new_t1;
    triangles[u_idx] = new_t2;
    true
}

/// §4.3 step 4: walks the mesh flipping edges crossed by `(a,b)` until the
/// constraint edge is present, bounded at `max_iterations`. Returns `true`
/// on success; `false` means the edge could not be recovered within the
/// bound (caller logs a warning and moves on, §7).
pub fn recover_constraint_edge(
    vertices: &[FixedVec2],
    triangles: &mut Vec<WorkingTriangle>,
    a: u32,
    b: u32,
    max_iterations: usize,
    min_area: Fixed64,
) -> bool {
    for _ in 0..max_iterations {
        if has_edge(triangles, a, b) {
            return true;
        }
        let adjacency = compute_adjacency(triangles);
        match find_crossing_edge(vertices, triangles, &adjacency, a, b) {
            Some((t_idx, e)) => {
                try_flip(vertices, triangles, &adjacency, t_idx, e, min_area);
            }
            None => return has_edge(triangles, a, b),
        }
    }
    has_edge(triangles, a, b)
}

/// §4.3 step 5/6: drop triangles whose centroid falls inside any obstacle,
/// or outside the boundary (pass the complement polygon and negate, or call
/// with the appropriate predicate — see `builder.rs`).
pub fn remove_triangles_where(
    vertices: &[FixedVec2],
    triangles: Vec<WorkingTriangle>,
    mut drop_if: impl FnMut(FixedVec2) -> bool,
) -> Vec<WorkingTriangle> {
    triangles
        .into_iter()
        .filter(|t| !drop_if(t.geometry(vertices).centroid()))
        .collect()
}

/// §4.3 step 7: remove triangles with duplicate vertices or `|area| < min`.
pub fn remove_degenerate(
    vertices: &[FixedVec2],
    triangles: Vec<WorkingTriangle>,
    min_area: Fixed64,
) -> Vec<WorkingTriangle> {
    triangles
        .into_iter()
        .filter(|t| {
            let v = t.verts();
            let distinct = v[0] != v[1] && v[1] != v[2] && v[0] != v[2];
            distinct && !t.geometry(vertices).is_degenerate(min_area)
        })
        .collect()
}

/// §4.3 step 8: remove any triangle referencing a super-triangle vertex
/// (vertex index `>= real_vertex_count`).
pub fn remove_super_triangle_triangles(
    triangles: Vec<WorkingTriangle>,
    real_vertex_count: u32,
) -> Vec<WorkingTriangle> {
    triangles
        .into_iter()
        .filter(|t| t.verts().iter().all(|&v| v < real_vertex_count))
        .collect()
}
