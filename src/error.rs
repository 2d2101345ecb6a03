//! Build-time error surface (§6, §7). Query functions never return `Result`
//! — they report failure as data (`PathResult::success`, `Option`, …).

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("boundary polygon has {found} vertices, at least 3 are required")]
    TooFewBoundaryVertices { found: usize },

    #[error("obstacles {a} and {b} overlap ({detail})")]
    OverlappingObstacles {
        a: usize,
        b: usize,
        detail: &'static str,
    },

    #[error("triangulation produced zero triangles after carving and filtering")]
    EmptyTriangulation,

    #[error("constraint edge ({v0}, {v1}) could not be recovered within the flip-iteration bound")]
    ConstraintRecoveryFailed { v0: usize, v1: usize },
}

pub type BuildResult<T> = Result<T, BuildError>;
