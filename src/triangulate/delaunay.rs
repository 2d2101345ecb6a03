//! Unconstrained Delaunay triangulation via Bowyer–Watson with a
//! super-triangle (§4.3 step 3).

use std::collections::BTreeMap;

use crate::fixed::Fixed64;
use crate::triangulate::common::WorkingTriangle;
use crate::vec2::FixedVec2;

/// Appends a super-triangle enclosing every point in `vertices` (margin is
/// `margin_factor * bounding box diagonal`) and returns its three new vertex
/// indices alongside the mutated vertex pool.
pub fn add_super_triangle(vertices: &mut Vec<FixedVec2>, margin_factor: Fixed64) -> [u32; 3] {
    let mut min = vertices[0];
    let mut max = vertices[0];
    for &v in vertices.iter() {
        min = FixedVec2::new(min.x.min(v.x), min.y.min(v.y));
        max = FixedVec2::new(max.x.max(v.x), max.y.max(v.y));
    }

    let diagonal = min.distance(max).max(Fixed64::ONE);
    let margin = diagonal.mul(margin_factor);
    let cx = (min.x + max.x).div(Fixed64::from_int(2));
    let cy = (min.y + max.y).div(Fixed64::from_int(2));

    // A triangle wide enough that its circumcircle contains every input
    // point with room to spare; built directly around the padded AABB.
    let half = margin;
    let top = FixedVec2::new(cx, cy + half.mul(Fixed64::from_int(2)));
    let left = FixedVec2::new(cx - half.mul(Fixed64::from_int(2)), cy - half);
    let right = FixedVec2::new(cx + half.mul(Fixed64::from_int(2)), cy - half);

    let base = vertices.len() as u32;
    vertices.push(left);
    vertices.push(right);
    vertices.push(top);
    [base, base + 1, base + 2]
}

fn sorted_pair(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Runs Bowyer–Watson over `point_indices` (in the given order — insertion
/// order affects intermediate triangle shapes but not the final Delaunay
/// property) against a vertex pool that already contains the super-triangle
/// appended by [`add_super_triangle`].
pub fn bowyer_watson(
    vertices: &[FixedVec2],
    super_triangle: [u32; 3],
    point_indices: &[u32],
) -> Vec<WorkingTriangle> {
    let mut triangles = vec![WorkingTriangle::new(
        super_triangle[0],
        super_triangle[1],
        super_triangle[2],
    )];

    for &point_idx in point_indices {
        let p = vertices[point_idx as usize];

        let mut bad = Vec::new();
        let mut good = Vec::new();
        for tri in triangles.drain(..) {
            if tri.geometry(vertices).circumcircle_contains(p) {
                bad.push(tri);
            } else {
                good.push(tri);
            }
        }
        triangles = good;

        // Boundary edges of the cavity left by removing `bad`: edges that
        // appear in exactly one bad triangle. A BTreeMap keeps this
        // deterministic (§8) regardless of hashing.
        let mut counts: BTreeMap<(u32, u32), u32> = BTreeMap::new();
        let mut oriented: BTreeMap<(u32, u32), (u32, u32)> = BTreeMap::new();
        for tri in &bad {
            for e in 0..3 {
                let (a, b) = tri.edge(e);
                let key = sorted_pair(a, b);
                *counts.entry(key).or_insert(0) += 1;
                oriented.insert(key, (a, b));
            }
        }

        for (key, count) in &counts {
            if *count == 1 {
                let (a, b) = oriented[key];
                triangles.push(WorkingTriangle::new(a, b, point_idx));
            }
        }
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulate::common::compute_adjacency;

    fn p(x: f64, y: f64) -> FixedVec2 {
        FixedVec2::from_f64(x, y)
    }

    #[test]
    fn triangulates_a_square_without_leaving_holes() {
        let mut vertices = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 4.0), p(0.0, 4.0)];
        let super_tri = add_super_triangle(&mut vertices, Fixed64::from_int(20));
        let indices: Vec<u32> = (0..4).collect();
        let triangles = bowyer_watson(&vertices, super_tri, &indices);

        // Every triangle referencing only the 4 real points (no super
        // vertices) should form a manifold once isolated.
        let real: Vec<_> = triangles
            .iter()
            .filter(|t| t.verts().iter().all(|&v| v < 4))
            .copied()
            .collect();
        assert_eq!(real.len(), 2, "a square should split into two triangles");

        let adjacency = compute_adjacency(&real);
        // The two triangles share exactly one edge (2 boundary-less slots).
        let shared_edges: usize = adjacency
            .iter()
            .flatten()
            .filter(|&&n| n >= 0)
            .count();
        assert_eq!(shared_edges, 2); // counted from both sides
    }

    #[test]
    fn every_triangle_has_positive_area() {
        let mut vertices = vec![
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 4.0),
            p(0.0, 4.0),
            p(2.0, 2.0),
        ];
        let super_tri = add_super_triangle(&mut vertices, Fixed64::from_int(20));
        let indices: Vec<u32> = (0..5).collect();
        let triangles = bowyer_watson(&vertices, super_tri, &indices);

        for tri in &triangles {
            let area = tri.geometry(&vertices).signed_area_x2();
            assert!(!area.is_zero(), "triangle must not be degenerate");
        }
    }
}
