//! Conforming longest-edge subdivision to a triangle budget (§4.4).

use crate::triangulate::common::{compute_adjacency, WorkingTriangle};
use crate::vec2::FixedVec2;

/// While `triangles.len() < target`, finds the single longest edge in the
/// whole mesh and splits it at its midpoint, splitting the neighbor sharing
/// that edge too so no hanging vertices are introduced (conforming split).
/// Appends new vertices to `vertices`. Stops early if a full scan can no
/// longer find an edge to split (degenerate input).
pub fn subdivide_to_target(vertices: &mut Vec<FixedVec2>, triangles: &mut Vec<WorkingTriangle>, target: usize) {
    while triangles.len() < target {
        let adjacency = compute_adjacency(triangles);

        let mut best: Option<(usize, usize)> = None;
        let mut best_len2 = crate::fixed::Fixed64::ZERO;
        for (t_idx, tri) in triangles.iter().enumerate() {
            for e in 0..3 {
                let (a, b) = tri.edge(e);
                let len2 = vertices[a as usize].sqr_distance(vertices[b as usize]);
                if best.is_none() || len2 > best_len2 {
                    best = Some((t_idx, e));
                    best_len2 = len2;
                }
            }
        }

        let Some((t_idx, e)) = best else { break };
        split_edge(vertices, triangles, &adjacency, t_idx, e);
    }
}

fn split_edge(
    vertices: &mut Vec<FixedVec2>,
    triangles: &mut Vec<WorkingTriangle>,
    adjacency: &[[i32; 3]],
    t_idx: usize,
    e: usize,
) {
    let tri = triangles[t_idx];
    let (v0, v1) = tri.edge(e);
    let r = tri.verts().into_iter().find(|&v| v != v0 && v != v1).unwrap();

    let midpoint = vertices[v0 as usize].midpoint(vertices[v1 as usize]);
    let m = vertices.len() as u32;
    vertices.push(midpoint);

    let neighbor = adjacency[t_idx][e];

    triangles[t_idx] = WorkingTriangle::new(v0, m, r);
    triangles.push(WorkingTriangle::new(m, v1, r));

    if neighbor >= 0 {
        let u_idx = neighbor as usize;
        let u_verts = triangles[u_idx].verts();
        let s = u_verts.into_iter().find(|&v| v != v0 && v != v1).unwrap();
        triangles[u_idx] = WorkingTriangle::new(v1, m, s);
        triangles.push(WorkingTriangle::new(m, v0, s));
    }
}
