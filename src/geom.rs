//! Polygon and triangle geometry primitives (§4.2): winding, area,
//! point-in-polygon, point-in-triangle, the circumcircle predicate and
//! segment intersection. Every predicate here operates purely in `Fixed64`
//! — no float ever enters a geometric decision.

use crate::fixed::Fixed64;
use crate::vec2::FixedVec2;

/// An ordered, implicitly-closed sequence of vertices (§3). Non-self-
/// intersection is a caller obligation; the engine only enforces that
/// obstacle polygons don't overlap each other (§4.3 step 1).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polygon {
    vertices: Vec<FixedVec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<FixedVec2>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[FixedVec2] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate the implicitly-closed edges `(v_i, v_{i+1 mod n})`.
    pub fn edges(&self) -> impl Iterator<Item = (FixedVec2, FixedVec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Twice the signed area (shoelace sum), left as `2*area` so callers
    /// that only need the sign or a comparison against `2*min_area` avoid
    /// an extra division.
    pub fn signed_area_x2(&self) -> Fixed64 {
        let mut acc = Fixed64::ZERO;
        for (a, b) in self.edges() {
            acc += a.cross(b);
        }
        acc
    }

    pub fn centroid(&self) -> FixedVec2 {
        let n = self.vertices.len();
        if n == 0 {
            return FixedVec2::ZERO;
        }
        let mut sum = FixedVec2::ZERO;
        for v in &self.vertices {
            sum = sum + *v;
        }
        sum.scale(Fixed64::ONE.div(Fixed64::from_int(n as i32)))
    }

    /// Standard ray-cast crossing-parity test with the tie-break from §4.2:
    /// `vi.y > p.y != vj.y > p.y`.
    pub fn contains_point(&self, p: FixedVec2) -> bool {
        let n = self.vertices.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let vi = self.vertices[i];
            let vj = self.vertices[j];
            let straddles = (vi.y > p.y) != (vj.y > p.y);
            if straddles {
                let slope_x = vj.x - vi.x;
                let dy = vj.y - vi.y;
                // x at which the edge crosses p.y, compared against p.x.
                let cross_x = vi.x + slope_x.mul(p.y - vi.y).div(dy);
                if p.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// A geometric triangle: three vertices, no topology. Always non-degenerate
/// once it survives the builder's degenerate filter (§4.3 step 7).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle {
    pub a: FixedVec2,
    pub b: FixedVec2,
    pub c: FixedVec2,
}

impl Triangle {
    pub fn new(a: FixedVec2, b: FixedVec2, c: FixedVec2) -> Self {
        Self { a, b, c }
    }

    pub fn signed_area_x2(&self) -> Fixed64 {
        (self.b - self.a).cross(self.c - self.a)
    }

    pub fn is_degenerate(&self, min_area: Fixed64) -> bool {
        let two = Fixed64::from_int(2);
        self.signed_area_x2().abs() < min_area.mul(two)
    }

    pub fn centroid(&self) -> FixedVec2 {
        let three = Fixed64::from_int(3);
        FixedVec2::new(
            (self.a.x + self.b.x + self.c.x).div(three),
            (self.a.y + self.b.y + self.c.y).div(three),
        )
    }

    pub fn vertices(&self) -> [FixedVec2; 3] {
        [self.a, self.b, self.c]
    }

    pub fn edges(&self) -> [(FixedVec2, FixedVec2); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    pub fn is_ccw(&self) -> bool {
        !self.signed_area_x2().is_negative()
    }

    /// Barycentric sign test (§4.2): inside iff the three signed-edge values
    /// share a sign, ties (on-edge) counted as inside.
    pub fn contains_point(&self, p: FixedVec2) -> bool {
        let ab = edge_sign(self.a, self.b, p);
        let bc = edge_sign(self.b, self.c, p);
        let ca = edge_sign(self.c, self.a, p);
        let has_neg = ab.is_negative() || bc.is_negative() || ca.is_negative();
        let has_pos = ab.signum() > 0 || bc.signum() > 0 || ca.signum() > 0;
        !(has_neg && has_pos)
    }

    /// 3x3 determinant circumcircle predicate, translated by the query point
    /// (§4.2). Returns true iff `p` lies strictly inside the circumcircle of
    /// `self`. Degenerate (collinear) triangles fall back to a centroid
    /// comparison since they have no finite circumcenter.
    pub fn circumcircle_contains(&self, p: FixedVec2) -> bool {
        if self.is_degenerate(Fixed64::EPSILON) {
            let c = self.centroid();
            let r2 = c.sqr_distance(self.a);
            return p.sqr_distance(c) < r2;
        }

        let ax = self.a.x - p.x;
        let ay = self.a.y - p.y;
        let bx = self.b.x - p.x;
        let by = self.b.y - p.y;
        let cx = self.c.x - p.x;
        let cy = self.c.y - p.y;

        let a2 = ax.mul(ax) + ay.mul(ay);
        let b2 = bx.mul(bx) + by.mul(by);
        let c2 = cx.mul(cx) + cy.mul(cy);

        // det | ax ay a2 |
        //     | bx by b2 |
        //     | cx cy c2 |
        let det = ax.mul(by.mul(c2) - b2.mul(cy)) - ay.mul(bx.mul(c2) - b2.mul(cx))
            + a2.mul(bx.mul(cy) - by.mul(cx));

        if self.is_ccw() {
            det.signum() > 0
        } else {
            det.signum() < 0
        }
    }
}

fn edge_sign(a: FixedVec2, b: FixedVec2, p: FixedVec2) -> Fixed64 {
    (b - a).cross(p - a)
}

/// Closest point on the closed segment `a..b` to `p`.
pub fn closest_point_on_segment(p: FixedVec2, a: FixedVec2, b: FixedVec2) -> FixedVec2 {
    let ab = b - a;
    let denom = ab.sqr_length();
    if denom.is_zero() {
        return a;
    }
    let t = (p - a).dot(ab).div(denom);
    let t = t.max(Fixed64::ZERO).min(Fixed64::ONE);
    a + ab.scale(t)
}

/// Intersection between segment `p + t*r` (`t` in `[0,1]`) and segment
/// `q + u*s` (`u` in `[0,1]`). Returns the parametric `t` of the hit.
/// Collinear overlaps (`denom == 0`) are treated as non-intersecting (§4.2);
/// shared endpoints are handled by the caller (e.g. adjacent polygon edges).
pub fn segment_intersection_t(
    p: FixedVec2,
    r: FixedVec2,
    q: FixedVec2,
    s: FixedVec2,
) -> Option<Fixed64> {
    let denom = r.cross(s);
    if denom.is_zero() {
        return None;
    }
    let qp = q - p;
    let t = qp.cross(s).div(denom);
    let u = qp.cross(r).div(denom);
    let zero = Fixed64::ZERO;
    let one = Fixed64::ONE;
    if t >= zero && t <= one && u >= zero && u <= one {
        Some(t)
    } else {
        None
    }
}

/// Strict segment-segment crossing test used by obstacle-overlap validation
/// (§4.3 step 1): both parameters must be strictly interior, so shared
/// endpoints between adjacent edges of the same polygon never count.
pub fn segments_strictly_cross(
    p: FixedVec2,
    r: FixedVec2,
    q: FixedVec2,
    s: FixedVec2,
) -> bool {
    let denom = r.cross(s);
    if denom.is_zero() {
        return false;
    }
    let qp = q - p;
    let t = qp.cross(s).div(denom);
    let u = qp.cross(r).div(denom);
    let zero = Fixed64::ZERO;
    let one = Fixed64::ONE;
    t > zero && t < one && u > zero && u < one
}
