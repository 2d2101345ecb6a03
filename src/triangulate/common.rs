//! Shared working-mesh representation used while the triangulator is still
//! mutating triangles — before neighbor indices, the grid and the caches
//! are frozen into a [`crate::navmesh::NavMesh`] (§4.5).

use std::collections::BTreeMap;

use crate::fixed::Fixed64;
use crate::geom::Triangle;
use crate::vec2::FixedVec2;

/// A triangle referencing vertex-pool indices, with no neighbor links.
/// Working representation for Bowyer-Watson and constraint recovery; the
/// final `NavTriangle` (with neighbors) is only materialized at finalize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkingTriangle {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
}

impl WorkingTriangle {
    pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn verts(&self) -> [u32; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn edge(&self, i: usize) -> (u32, u32) {
        let v = self.verts();
        (v[i], v[(i + 1) % 3])
    }

    pub fn geometry(&self, vertices: &[FixedVec2]) -> Triangle {
        Triangle::new(
            vertices[self.v0 as usize],
            vertices[self.v1 as usize],
            vertices[self.v2 as usize],
        )
    }

    pub fn contains_vertex(&self, v: u32) -> bool {
        self.v0 == v || self.v1 == v || self.v2 == v
    }
}

fn sorted_pair(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Computes neighbor-by-edge adjacency for a triangle soup. `-1` means the
/// edge is a mesh boundary. Uses a `BTreeMap` (not a hash map) so the result
/// — and therefore everything downstream of it — is deterministic across
/// runs and platforms regardless of allocator/hasher behavior (§8).
pub fn compute_adjacency(triangles: &[WorkingTriangle]) -> Vec<[i32; 3]> {
    let mut neighbors = vec![[-1i32; 3]; triangles.len()];
    let mut edge_map: BTreeMap<(u32, u32), (u32, u8)> = BTreeMap::new();

    for (t_idx, tri) in triangles.iter().enumerate() {
        for e in 0..3 {
            let (a, b) = tri.edge(e);
            let key = sorted_pair(a, b);
            if let Some((other_tri, other_edge)) = edge_map.remove(&key) {
                neighbors[t_idx][e] = other_tri as i32;
                neighbors[other_tri as usize][other_edge as usize] = t_idx as i32;
            } else {
                edge_map.insert(key, (t_idx as u32, e as u8));
            }
        }
    }

    neighbors
}

/// Unifies vertices within `tolerance` of one another by snapping later
/// duplicates onto the first-seen representative (§4.3 step 2). Returns the
/// deduplicated vertex pool and a mapping from original input index to
/// pool index.
pub fn snap_vertices(points: &[FixedVec2], tolerance: Fixed64) -> (Vec<FixedVec2>, Vec<u32>) {
    let tol2 = tolerance.mul(tolerance);
    let mut pool: Vec<FixedVec2> = Vec::with_capacity(points.len());
    let mut mapping = Vec::with_capacity(points.len());

    for &p in points {
        let mut found = None;
        for (idx, existing) in pool.iter().enumerate() {
            if p.sqr_distance(*existing) <= tol2 {
                found = Some(idx as u32);
                break;
            }
        }
        match found {
            Some(idx) => mapping.push(idx),
            None => {
                mapping.push(pool.len() as u32);
                pool.push(p);
            }
        }
    }

    (pool, mapping)
}
