//! Triangle-graph A* (§4.7) over a [`NavMesh`]'s adjacency, using the
//! indexed min-heap as the open set and generation tagging for the closed
//! set so a [`PathQuery`] is reusable across many searches without
//! reallocating (§5, §9 "global mutable state" made per-instance).

use crate::fixed::Fixed64;
use crate::heap::IndexedMinHeap;
use crate::navmesh::NavMesh;
use crate::vec2::FixedVec2;

/// A triangle corridor from A*: the visited triangle indices in order, and
/// the shared-edge portal for every step between consecutive triangles, in
/// the raw (not yet funnel-normalized) orientation stored by the
/// triangulator.
pub struct Corridor {
    pub triangles: Vec<usize>,
    pub portals: Vec<(FixedVec2, FixedVec2)>,
}

/// Per-thread reusable A* scratch state, sized to a mesh's triangle count.
/// Open set, g-scores, parent pointers and the closed set all survive
/// across queries; [`PathQuery::find_corridor`] resets them in O(1) via
/// generation tagging rather than reallocating or zeroing (§5).
pub struct PathQuery {
    open: IndexedMinHeap,
    g_score: Vec<Fixed64>,
    came_from: Vec<i32>,
    entry_edge: Vec<i32>,
    closed: Vec<u32>,
    generation: u32,
}

const NONE: i32 = -1;

impl PathQuery {
    pub fn new(triangle_count: usize) -> Self {
        Self {
            open: IndexedMinHeap::new(triangle_count),
            g_score: vec![Fixed64::ZERO; triangle_count],
            came_from: vec![NONE; triangle_count],
            entry_edge: vec![NONE; triangle_count],
            closed: vec![0; triangle_count],
            generation: 1,
        }
    }

    fn reset(&mut self) {
        self.open.clear();
        if self.generation == u32::MAX {
            self.closed.fill(0);
            self.generation = 1;
        } else {
            self.generation += 1;
        }
    }

    fn is_closed(&self, idx: usize) -> bool {
        self.closed[idx] == self.generation
    }

    fn close(&mut self, idx: usize) {
        self.closed[idx] = self.generation;
    }

    /// Finds the triangle corridor from `start_tri` to `end_tri`. `start`
    /// and `end` are the literal query points, used only for the heuristic
    /// and the initial push — not folded into g-scores, so the triangle
    /// route A* settles on never double-counts or inflates a point-to-
    /// midpoint hop the funnel will account for exactly anyway.
    pub fn find_corridor(
        &mut self,
        mesh: &NavMesh,
        start_tri: usize,
        end_tri: usize,
        start: FixedVec2,
        end: FixedVec2,
    ) -> Option<Corridor> {
        if start_tri == end_tri {
            return Some(Corridor {
                triangles: vec![start_tri],
                portals: Vec::new(),
            });
        }

        self.reset();
        self.g_score[start_tri] = Fixed64::ZERO;
        self.entry_edge[start_tri] = NONE;
        self.open.insert(start_tri, Fixed64::ZERO, start.distance(end));

        while !self.open.is_empty() {
            let current = self.open.extract_min();
            if current == end_tri {
                return Some(self.reconstruct(mesh, start_tri, end_tri));
            }
            self.close(current);

            let tri = mesh.get_triangle(current);
            let entry = self.entry_edge[current];
            for exit_edge in 0..3 {
                let neighbor = tri.neighbors()[exit_edge];
                if neighbor < 0 {
                    continue;
                }
                let neighbor = neighbor as usize;
                if self.is_closed(neighbor) {
                    continue;
                }

                // The start triangle has no entry edge — its first hop is
                // free; the literal start-to-portal distance is left to
                // the funnel (§9 open question).
                let step_cost = if entry < 0 {
                    Fixed64::ZERO
                } else {
                    mesh.crossing_cost(current, entry as usize, exit_edge)
                };
                let tentative_g = self.g_score[current] + step_cost;

                let in_open = self.open.contains(neighbor);
                if in_open && tentative_g >= self.g_score[neighbor] {
                    continue;
                }

                let h = if neighbor == end_tri {
                    Fixed64::ZERO
                } else {
                    mesh.edge_midpoint(current, exit_edge).distance(end)
                };

                self.g_score[neighbor] = tentative_g;
                self.came_from[neighbor] = current as i32;
                self.entry_edge[neighbor] = mesh.neighbor_entry_edge(current, exit_edge);
                self.open.insert_or_update(neighbor, tentative_g, h);
            }
        }

        None
    }

    fn reconstruct(&self, mesh: &NavMesh, start_tri: usize, end_tri: usize) -> Corridor {
        let mut triangles = vec![end_tri];
        let mut cur = end_tri;
        while cur != start_tri {
            let prev = self.came_from[cur];
            debug_assert!(prev >= 0, "came_from chain broken before reaching start");
            cur = prev as usize;
            triangles.push(cur);
        }
        triangles.reverse();

        let mut portals = Vec::with_capacity(triangles.len().saturating_sub(1));
        for window in triangles.windows(2) {
            let (a, b) = (window[0], window[1]);
            let tri = mesh.get_triangle(a);
            let exit_edge = (0..3)
                .find(|&e| tri.neighbors()[e] == b as i32)
                .expect("adjacent corridor triangles must share an edge");
            let (v0, v1) = tri.edge(exit_edge);
            portals.push((mesh.get_vertex(v0 as usize), mesh.get_vertex(v1 as usize)));
        }

        Corridor { triangles, portals }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::WorkingTriangle;

    fn p(x: f64, y: f64) -> FixedVec2 {
        FixedVec2::from_f64(x, y)
    }

    fn strip_mesh(n: usize) -> NavMesh {
        // A 1 x n strip of unit squares, each split into two triangles,
        // giving a corridor exactly n squares long.
        let mut vertices = Vec::new();
        for i in 0..=n {
            vertices.push(p(i as f64, 0.0));
            vertices.push(p(i as f64, 1.0));
        }
        let mut triangles = Vec::new();
        for i in 0..n {
            let bl = (2 * i) as u32;
            let tl = (2 * i + 1) as u32;
            let br = (2 * i + 2) as u32;
            let tr = (2 * i + 3) as u32;
            triangles.push(WorkingTriangle::new(bl, br, tr));
            triangles.push(WorkingTriangle::new(bl, tr, tl));
        }
        NavMesh::finalize(vertices, triangles, 8)
    }

    #[test]
    fn finds_corridor_across_a_strip() {
        let mesh = strip_mesh(4);
        let mut query = PathQuery::new(mesh.triangle_count());
        let corridor = query
            .find_corridor(&mesh, 0, mesh.triangle_count() - 1, p(0.1, 0.5), p(3.9, 0.5))
            .expect("a path must exist across a connected strip");
        assert_eq!(corridor.triangles.first(), Some(&0));
        assert_eq!(corridor.triangles.last(), Some(&(mesh.triangle_count() - 1)));
        assert_eq!(corridor.portals.len(), corridor.triangles.len() - 1);
    }

    #[test]
    fn same_triangle_is_a_degenerate_corridor() {
        let mesh = strip_mesh(2);
        let mut query = PathQuery::new(mesh.triangle_count());
        let corridor = query
            .find_corridor(&mesh, 0, 0, p(0.2, 0.2), p(0.3, 0.3))
            .unwrap();
        assert_eq!(corridor.triangles, vec![0]);
        assert!(corridor.portals.is_empty());
    }

    #[test]
    fn scratch_state_is_reusable_across_queries() {
        let mesh = strip_mesh(3);
        let mut query = PathQuery::new(mesh.triangle_count());
        let last = mesh.triangle_count() - 1;
        for _ in 0..3 {
            let corridor = query
                .find_corridor(&mesh, 0, last, p(0.1, 0.5), p(2.9, 0.5))
                .unwrap();
            assert_eq!(corridor.triangles.last(), Some(&last));
        }
    }
}
