//! Uniform grid spatial index (§3, §4.5 step 3) used for point-location
//! during builds and queries. Fixed 32×32 resolution by default; every
//! triangle is indexed in every cell its AABB overlaps, via a two-pass
//! count-then-fill build that avoids per-cell `Vec` allocations.

use crate::fixed::Fixed64;
use crate::geom::Triangle;
use crate::vec2::FixedVec2;

#[derive(Clone, Debug)]
pub struct UniformGrid {
    resolution: u32,
    min: FixedVec2,
    cell_w: Fixed64,
    cell_h: Fixed64,
    /// `offsets[c]..offsets[c+1]` indexes into `data` for cell `c`.
    offsets: Vec<u32>,
    data: Vec<u32>,
}

impl UniformGrid {
    /// Build the grid from a vertex AABB (padded by `epsilon`) and the final
    /// triangle set. `resolution` cells per axis.
    pub fn build(
        resolution: u32,
        aabb_min: FixedVec2,
        aabb_max: FixedVec2,
        epsilon: Fixed64,
        triangles: &[Triangle],
    ) -> Self {
        let min = FixedVec2::new(aabb_min.x - epsilon, aabb_min.y - epsilon);
        let max = FixedVec2::new(aabb_max.x + epsilon, aabb_max.y + epsilon);
        let span_x = (max.x - min.x).max(Fixed64::EPSILON);
        let span_y = (max.y - min.y).max(Fixed64::EPSILON);
        let res = Fixed64::from_int(resolution as i32);
        let cell_w = span_x.div(res);
        let cell_h = span_y.div(res);

        let cell_count = (resolution as usize) * (resolution as usize);
        let mut counts = vec![0u32; cell_count];

        let cell_range = |tri: &Triangle, min: FixedVec2, cell_w: Fixed64, cell_h: Fixed64| {
            let [a, b, c] = tri.vertices();
            let min_x = a.x.min(b.x).min(c.x);
            let max_x = a.x.max(b.x).max(c.x);
            let min_y = a.y.min(b.y).min(c.y);
            let max_y = a.y.max(b.y).max(c.y);
            let cx0 = cell_index(min_x, min.x, cell_w, resolution);
            let cx1 = cell_index(max_x, min.x, cell_w, resolution);
            let cy0 = cell_index(min_y, min.y, cell_h, resolution);
            let cy1 = cell_index(max_y, min.y, cell_h, resolution);
            (cx0, cx1, cy0, cy1)
        };

        for tri in triangles {
            let (cx0, cx1, cy0, cy1) = cell_range(tri, min, cell_w, cell_h);
            for cy in cy0..=cy1 {
                for cx in cx0..=cx1 {
                    counts[(cy * resolution + cx) as usize] += 1;
                }
            }
        }

        let mut offsets = vec![0u32; cell_count + 1];
        for i in 0..cell_count {
            offsets[i + 1] = offsets[i] + counts[i];
        }

        let mut data = vec![0u32; offsets[cell_count] as usize];
        let mut cursor = offsets.clone();
        for (tri_idx, tri) in triangles.iter().enumerate() {
            let (cx0, cx1, cy0, cy1) = cell_range(tri, min, cell_w, cell_h);
            for cy in cy0..=cy1 {
                for cx in cx0..=cx1 {
                    let cell = (cy * resolution + cx) as usize;
                    data[cursor[cell] as usize] = tri_idx as u32;
                    cursor[cell] += 1;
                }
            }
        }

        Self {
            resolution,
            min,
            cell_w,
            cell_h,
            offsets,
            data,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn cell_w(&self) -> Fixed64 {
        self.cell_w
    }

    pub fn cell_h(&self) -> Fixed64 {
        self.cell_h
    }

    pub fn min(&self) -> FixedVec2 {
        self.min
    }

    /// Unclamped cell coordinates for `p` — may fall outside `[0,resolution)`
    /// when `p` is outside the grid's AABB; callers that need a ring search
    /// use this to seed the expansion even from outside the mesh.
    pub fn cell_coords_unclamped(&self, p: FixedVec2) -> (i32, i32) {
        let cx = cell_index_signed(p.x, self.min.x, self.cell_w);
        let cy = cell_index_signed(p.y, self.min.y, self.cell_h);
        (cx, cy)
    }

    pub fn in_bounds(&self, cx: i32, cy: i32) -> bool {
        cx >= 0 && cy >= 0 && cx < self.resolution as i32 && cy < self.resolution as i32
    }

    pub fn triangles_in_cell(&self, cx: i32, cy: i32) -> &[u32] {
        if !self.in_bounds(cx, cy) {
            return &[];
        }
        let cell = (cy as u32 * self.resolution + cx as u32) as usize;
        let start = self.offsets[cell] as usize;
        let end = self.offsets[cell + 1] as usize;
        &self.data[start..end]
    }
}

fn cell_index(value: Fixed64, min: Fixed64, cell_size: Fixed64, resolution: u32) -> u32 {
    let idx = cell_index_signed(value, min, cell_size);
    idx.clamp(0, resolution as i32 - 1) as u32
}

fn cell_index_signed(value: Fixed64, min: Fixed64, cell_size: Fixed64) -> i32 {
    let rel = (value - min).div(cell_size);
    rel.to_f64().floor() as i32
}
