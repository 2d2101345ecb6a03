//! Deterministic fixed-point navmesh baking and pathfinding.
//!
//! All geometry runs on [`fixed::Fixed64`] (Q31.32) so that builds and
//! queries are bit-exact across platforms. A [`NavMesh`](navmesh::NavMesh)
//! is built once by [`builder::build`] / [`builder::build_from_rect`] from
//! a boundary polygon, obstacle polygons (holes) and optional walkable
//! Steiner-point polygons, then queried read-only through
//! [`query::find_path`] and friends.

pub mod astar;
pub mod builder;
pub mod error;
pub mod fixed;
pub mod funnel;
pub mod geom;
pub mod grid;
pub mod heap;
pub mod navmesh;
pub mod query;
pub mod triangulate;
pub mod vec2;

pub use astar::{Corridor, PathQuery};
pub use builder::{build, build_from_rect, BuildConfig};
pub use error::{BuildError, BuildResult};
pub use fixed::Fixed64;
pub use geom::{Polygon, Triangle};
pub use navmesh::{NavMesh, NavTriangle};
pub use query::{clamp_to_mesh, find_path, is_point_on_mesh, raycast, PathResult};
pub use vec2::FixedVec2;
