//! The baked navmesh data structure (§3, §4.5): vertex pool, triangle pool
//! with neighbor indices, uniform grid, and the edge-midpoint / edge-pair
//! distance / neighbor entry-edge caches A* reads without recomputing
//! anything. Built once by the builder, read-only afterward (§5).

use crate::fixed::Fixed64;
use crate::geom::Triangle;
use crate::grid::UniformGrid;
use crate::triangulate::{compute_adjacency, WorkingTriangle};
use crate::vec2::FixedVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const NO_NEIGHBOR: i32 = -1;

/// Three vertex indices and three neighbor triangle indices. `n_i` is the
/// triangle sharing edge `(v_i, v_{(i+1)%3})`, or `-1` on the mesh boundary
/// (§3). Adjacency is symmetric by construction (§8).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NavTriangle {
    pub v0: u32,
    pub v1: u32,
    pub v2: u32,
    pub n0: i32,
    pub n1: i32,
    pub n2: i32,
}

impl NavTriangle {
    pub fn verts(&self) -> [u32; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn neighbors(&self) -> [i32; 3] {
        [self.n0, self.n1, self.n2]
    }

    pub fn edge(&self, i: usize) -> (u32, u32) {
        let v = self.verts();
        (v[i], v[(i + 1) % 3])
    }
}

#[derive(Clone, Debug)]
pub struct NavMesh {
    vertices: Vec<FixedVec2>,
    triangles: Vec<NavTriangle>,
    grid: UniformGrid,
    edge_midpoints: Vec<FixedVec2>,
    edge_pair_distances: Vec<Fixed64>,
    neighbor_entry_edge: Vec<i32>,
}

impl NavMesh {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn get_triangle(&self, i: usize) -> NavTriangle {
        self.triangles[i]
    }

    pub fn get_vertex(&self, i: usize) -> FixedVec2 {
        self.vertices[i]
    }

    pub fn get_triangle_geometry(&self, i: usize) -> Triangle {
        let t = self.triangles[i];
        Triangle::new(
            self.vertices[t.v0 as usize],
            self.vertices[t.v1 as usize],
            self.vertices[t.v2 as usize],
        )
    }

    pub(crate) fn vertices(&self) -> &[FixedVec2] {
        &self.vertices
    }

    pub(crate) fn triangles(&self) -> &[NavTriangle] {
        &self.triangles
    }

    pub(crate) fn grid(&self) -> &UniformGrid {
        &self.grid
    }

    pub(crate) fn edge_midpoint(&self, tri: usize, edge: usize) -> FixedVec2 {
        self.edge_midpoints[3 * tri + edge]
    }

    /// Crossing cost for triangle `tri` between edge pair `p` (`0`:(0,1),
    /// `1`:(0,2), `2`:(1,2)).
    pub(crate) fn edge_pair_distance(&self, tri: usize, p: usize) -> Fixed64 {
        self.edge_pair_distances[3 * tri + p]
    }

    /// Distance between the midpoints of `edge_a` and `edge_b` of `tri`
    /// (order-independent), reading the precomputed pair cache.
    pub(crate) fn crossing_cost(&self, tri: usize, edge_a: usize, edge_b: usize) -> Fixed64 {
        let p = pair_index(edge_a, edge_b);
        self.edge_pair_distance(tri, p)
    }

    /// Edge index on `triangle.n_e` that corresponds to the same shared
    /// edge as exit edge `e` of `tri` — so A* knows its entry edge on
    /// arrival at the neighbor (§3, §4.7).
    pub(crate) fn neighbor_entry_edge(&self, tri: usize, exit_edge: usize) -> i32 {
        self.neighbor_entry_edge[3 * tri + exit_edge]
    }

    /// Finalizes a working triangle soup into a queryable `NavMesh`: compacts
    /// unreferenced vertices (vertex interning, §4.5 step 1), computes
    /// adjacency, builds the spatial grid, and precomputes the edge-midpoint
    /// and edge-pair-distance caches (§4.5 steps 2–6).
    pub fn finalize(
        vertices: Vec<FixedVec2>,
        triangles: Vec<WorkingTriangle>,
        grid_resolution: u32,
    ) -> NavMesh {
        let (vertices, triangles) = compact_vertices(vertices, triangles);

        let adjacency = compute_adjacency(&triangles);
        let nav_triangles: Vec<NavTriangle> = triangles
            .iter()
            .zip(adjacency.iter())
            .map(|(t, n)| NavTriangle {
                v0: t.v0,
                v1: t.v1,
                v2: t.v2,
                n0: n[0],
                n1: n[1],
                n2: n[2],
            })
            .collect();

        let geometries: Vec<Triangle> = nav_triangles
            .iter()
            .map(|t| {
                Triangle::new(
                    vertices[t.v0 as usize],
                    vertices[t.v1 as usize],
                    vertices[t.v2 as usize],
                )
            })
            .collect();

        let (aabb_min, aabb_max) = vertex_aabb(&vertices);
        let grid = UniformGrid::build(
            grid_resolution,
            aabb_min,
            aabb_max,
            Fixed64::from_f64(1e-3),
            &geometries,
        );

        let mut edge_midpoints = Vec::with_capacity(nav_triangles.len() * 3);
        for t in &nav_triangles {
            for e in 0..3 {
                let (a, b) = t.edge(e);
                edge_midpoints.push(vertices[a as usize].midpoint(vertices[b as usize]));
            }
        }

        let mut edge_pair_distances = Vec::with_capacity(nav_triangles.len() * 3);
        for t_idx in 0..nav_triangles.len() {
            let m0 = edge_midpoints[3 * t_idx];
            let m1 = edge_midpoints[3 * t_idx + 1];
            let m2 = edge_midpoints[3 * t_idx + 2];
            edge_pair_distances.push(m0.distance(m1)); // pair (0,1)
            edge_pair_distances.push(m0.distance(m2)); // pair (0,2)
            edge_pair_distances.push(m1.distance(m2)); // pair (1,2)
        }

        let mut neighbor_entry_edge = vec![NO_NEIGHBOR; nav_triangles.len() * 3];
        for (t_idx, t) in nav_triangles.iter().enumerate() {
            for e in 0..3 {
                let n = t.neighbors()[e];
                if n < 0 {
                    continue;
                }
                let (a, b) = t.edge(e);
                let neighbor = &nav_triangles[n as usize];
                for e2 in 0..3 {
                    let (na, nb) = neighbor.edge(e2);
                    if na == b && nb == a {
                        neighbor_entry_edge[3 * t_idx + e] = e2 as i32;
                        break;
                    }
                }
            }
        }

        NavMesh {
            vertices,
            triangles: nav_triangles,
            grid,
            edge_midpoints,
            edge_pair_distances,
            neighbor_entry_edge,
        }
    }
}

/// Maps an unordered edge-index pair to its slot in the 3-entry pair cache:
/// `(0,1)->0`, `(0,2)->1`, `(1,2)->2`.
fn pair_index(edge_a: usize, edge_b: usize) -> usize {
    match (edge_a.min(edge_b), edge_a.max(edge_b)) {
        (0, 1) => 0,
        (0, 2) => 1,
        (1, 2) => 2,
        _ => unreachable!("edge index must be 0, 1 or 2"),
    }
}

fn vertex_aabb(vertices: &[FixedVec2]) -> (FixedVec2, FixedVec2) {
    let mut min = vertices[0];
    let mut max = vertices[0];
    for &v in vertices.iter() {
        min = FixedVec2::new(min.x.min(v.x), min.y.min(v.y));
        max = FixedVec2::new(max.x.max(v.x), max.y.max(v.y));
    }
    (min, max)
}

/// Drops vertices no triangle references and remaps indices accordingly —
/// the "vertex interning" of §4.5 step 1, applied as a final compaction
/// rather than during every intermediate triangulation step.
fn compact_vertices(
    vertices: Vec<FixedVec2>,
    triangles: Vec<WorkingTriangle>,
) -> (Vec<FixedVec2>, Vec<WorkingTriangle>) {
    let mut used = vec![false; vertices.len()];
    for t in &triangles {
        for v in t.verts() {
            used[v as usize] = true;
        }
    }

    let mut remap = vec![0u32; vertices.len()];
    let mut compacted = Vec::new();
    for (old_idx, keep) in used.iter().enumerate() {
        if *keep {
            remap[old_idx] = compacted.len() as u32;
            compacted.push(vertices[old_idx]);
        }
    }

    let remapped_triangles = triangles
        .into_iter()
        .map(|t| WorkingTriangle::new(remap[t.v0 as usize], remap[t.v1 as usize], remap[t.v2 as usize]))
        .collect();

    (compacted, remapped_triangles)
}

/// Persisted state layout (§6): only the vertex and triangle arrays survive
/// serialization. The grid and caches are rebuilt by [`NavMesh::finalize`]
/// on load, so a round trip is bit-exact for every downstream query.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct PersistedNavMesh {
    vertices: Vec<(i64, i64)>,
    triangles: Vec<([u32; 3], [i32; 3])>,
    grid_resolution: u32,
}

#[cfg(feature = "serde")]
impl Serialize for NavMesh {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let vertices = self.vertices.iter().map(|v| (v.x.raw(), v.y.raw())).collect();
        let triangles = self
            .triangles
            .iter()
            .map(|t| (t.verts(), t.neighbors()))
            .collect();
        PersistedNavMesh {
            vertices,
            triangles,
            grid_resolution: self.grid.resolution(),
        }
        .serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for NavMesh {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let data = PersistedNavMesh::deserialize(deserializer)?;
        let vertices: Vec<FixedVec2> = data
            .vertices
            .into_iter()
            .map(|(x, y)| FixedVec2::new(Fixed64::from_raw(x), Fixed64::from_raw(y)))
            .collect();
        let triangles: Vec<WorkingTriangle> = data
            .triangles
            .iter()
            .map(|(v, _n)| WorkingTriangle::new(v[0], v[1], v[2]))
            .collect();
        Ok(NavMesh::finalize(vertices, triangles, data.grid_resolution))
    }
}
