//! Navmesh construction pipeline (§4.3, §4.4): Bowyer–Watson, constraint
//! recovery, hole carving, subdivision.

pub mod common;
pub mod constrain;
pub mod delaunay;
pub mod subdivide;

pub use common::{compute_adjacency, snap_vertices, WorkingTriangle};
