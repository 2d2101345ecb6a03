//! Query façade (§4.9, §6): point location, clamping, raycasting and the
//! composed `find_path` pipeline (locate → A* → funnel).

use crate::astar::PathQuery;
use crate::fixed::Fixed64;
use crate::geom::{closest_point_on_segment, segment_intersection_t};
use crate::funnel::string_pull;
use crate::navmesh::NavMesh;
use crate::vec2::FixedVec2;

/// Result of [`find_path`] (§6). `success = false` carries an empty path —
/// query functions never error, they only report failure (§7).
#[derive(Clone, Debug, Default)]
pub struct PathResult {
    pub success: bool,
    pub path: Vec<FixedVec2>,
    pub length: Fixed64,
    pub triangle_path: Vec<u32>,
    pub portals: Vec<(FixedVec2, FixedVec2)>,
}

impl PathResult {
    fn failure() -> Self {
        PathResult {
            success: false,
            path: Vec::new(),
            length: Fixed64::ZERO,
            triangle_path: Vec::new(),
            portals: Vec::new(),
        }
    }
}

fn locate_triangle(mesh: &NavMesh, p: FixedVec2) -> Option<usize> {
    let grid = mesh.grid();
    let (cx, cy) = grid.cell_coords_unclamped(p);
    if !grid.in_bounds(cx, cy) {
        return None;
    }
    grid.triangles_in_cell(cx, cy)
        .iter()
        .find(|&&tri_idx| mesh.get_triangle_geometry(tri_idx as usize).contains_point(p))
        .map(|&tri_idx| tri_idx as usize)
}

pub fn is_point_on_mesh(mesh: &NavMesh, p: FixedVec2) -> bool {
    locate_triangle(mesh, p).is_some()
}

fn ring_cells(cx: i32, cy: i32, ring: i32) -> Vec<(i32, i32)> {
    if ring == 0 {
        return vec![(cx, cy)];
    }
    let mut cells = Vec::with_capacity((8 * ring) as usize);
    for dx in -ring..=ring {
        cells.push((cx + dx, cy - ring));
        cells.push((cx + dx, cy + ring));
    }
    for dy in -(ring - 1)..=(ring - 1) {
        cells.push((cx - ring, cy + dy));
        cells.push((cx + ring, cy + dy));
    }
    cells
}

/// Snaps `p` onto the mesh: returns `p` unchanged if it already lies on a
/// triangle, otherwise finds the nearest point on any triangle edge via a
/// ring-expanding grid search, terminating early once no further ring could
/// possibly beat the current best (§4.9).
pub fn clamp_to_mesh(mesh: &NavMesh, p: FixedVec2) -> FixedVec2 {
    if is_point_on_mesh(mesh, p) {
        return p;
    }

    let grid = mesh.grid();
    let (cx, cy) = grid.cell_coords_unclamped(p);
    let min_cell = grid.cell_w().min(grid.cell_h()).max(Fixed64::EPSILON);

    let mut best: Option<(Fixed64, FixedVec2)> = None;
    let max_ring = grid.resolution() as i32 * 2 + 2;

    for ring in 0..=max_ring {
        if let Some((best_d2, _)) = best {
            let bound = Fixed64::from_int(ring).mul(min_cell);
            if bound.sqr() > best_d2 {
                break;
            }
        }

        let mut touched_grid = ring == 0;
        for (gx, gy) in ring_cells(cx, cy, ring) {
            if !grid.in_bounds(gx, gy) {
                continue;
            }
            touched_grid = true;
            for &tri_idx in grid.triangles_in_cell(gx, gy) {
                let tri = mesh.get_triangle_geometry(tri_idx as usize);
                for (a, b) in tri.edges() {
                    let candidate = closest_point_on_segment(p, a, b);
                    let d2 = p.sqr_distance(candidate);
                    if best.map_or(true, |(best_d2, _)| d2 < best_d2) {
                        best = Some((d2, candidate));
                    }
                }
            }
        }

        if !touched_grid && best.is_some() {
            break;
        }
    }

    best.map(|(_, pt)| pt).unwrap_or(p)
}

/// Walks from `origin` toward `origin + dir·max_dist`, crossing one
/// triangle edge at a time, stopping at the boundary edge the segment
/// exits through or at the target if it stays inside the mesh (§4.9).
/// Returns `origin` unchanged if it is not on the mesh.
pub fn raycast(mesh: &NavMesh, origin: FixedVec2, dir: FixedVec2, max_dist: Fixed64) -> FixedVec2 {
    let direction = dir.normalize();
    if direction == FixedVec2::ZERO {
        return origin;
    }
    let target = origin + direction.scale(max_dist);

    let Some(mut tri_idx) = locate_triangle(mesh, origin) else {
        return origin;
    };

    let mut skip_edge: i32 = -1;
    let bound = 2 * mesh.triangle_count().max(1);

    for _ in 0..bound {
        let geom = mesh.get_triangle_geometry(tri_idx);
        if geom.contains_point(target) {
            return target;
        }

        let tri = mesh.get_triangle(tri_idx);
        let mut crossed = None;
        for e in 0..3 {
            if e as i32 == skip_edge {
                continue;
            }
            let (v0, v1) = tri.edge(e);
            let a = mesh.get_vertex(v0 as usize);
            let b = mesh.get_vertex(v1 as usize);
            if let Some(t) = segment_intersection_t(origin, target - origin, a, b - a) {
                crossed = Some((e, t));
                break;
            }
        }

        let Some((e, t)) = crossed else {
            return geom
                .edges()
                .iter()
                .map(|&(a, b)| closest_point_on_segment(target, a, b))
                .min_by_key(|&c| target.sqr_distance(c))
                .unwrap_or(target);
        };

        let neighbor = tri.neighbors()[e];
        if neighbor < 0 {
            return origin + (target - origin).scale(t);
        }
        skip_edge = mesh.neighbor_entry_edge(tri_idx, e);
        tri_idx = neighbor as usize;
    }

    target
}

/// Composed `locate -> A* -> funnel` pipeline (§4.9, §6). `query` carries
/// the reusable per-thread scratch buffers from [`PathQuery`].
pub fn find_path(mesh: &NavMesh, query: &mut PathQuery, start: FixedVec2, end: FixedVec2) -> PathResult {
    let start = clamp_to_mesh(mesh, start);
    let end = clamp_to_mesh(mesh, end);

    if start == end {
        return PathResult {
            success: true,
            path: vec![start],
            length: Fixed64::ZERO,
            triangle_path: Vec::new(),
            portals: Vec::new(),
        };
    }

    let (Some(start_tri), Some(end_tri)) = (locate_triangle(mesh, start), locate_triangle(mesh, end)) else {
        return PathResult::failure();
    };

    let Some(corridor) = query.find_corridor(mesh, start_tri, end_tri, start, end) else {
        return PathResult::failure();
    };

    let path = string_pull(start, end, &corridor.portals);
    let length = path
        .windows(2)
        .fold(Fixed64::ZERO, |acc, w| acc + w[0].distance(w[1]));

    PathResult {
        success: true,
        path,
        length,
        triangle_path: corridor.triangles.iter().map(|&i| i as u32).collect(),
        portals: corridor.portals,
    }
}
