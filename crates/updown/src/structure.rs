//! Structure Engine contract consumed by the search core.
//!
//! Purpose
//! - Describe the handful of capabilities the search needs from a mutable
//!   triangulation: enumerate feasible sites, commit one, count cells, and
//!   round-trip through a canonical signature.
//!
//! Invalidation
//! - Every commit may relabel or merge cells, so a [`Site`] is only meaningful
//!   for the structure state it was enumerated from. Sites carry that state's
//!   generation; implementations bump the generation on every commit and must
//!   reject older sites in `commit` and `is_feasible`.
//!
//! References
//! - Concrete engine: `crate::tri4::Triangulation4`.
//! - Consumers: `crate::search::{descend, lateral_search, perturb, simplify}`.

use std::fmt;

use serde::Serialize;

use crate::error::{MoveError, SignatureError};

/// Effect of a move family on the number of top-dimensional cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SizeEffect {
    Reducing,
    Preserving,
    Increasing,
}

/// Move families used by the search phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// 4-2 move about a degree-4 edge.
    EdgeCollapse,
    /// 5-1 move about a degree-5 vertex.
    VertexCollapse,
    /// 3-3 move about a degree-3 triangle.
    TriangleFlip,
    /// 4-4 move about a degree-4 edge.
    EdgeFlip,
    /// 2-4 move about an internal tetrahedron.
    TetSubdivide,
}

impl MoveKind {
    pub const ALL: [MoveKind; 5] = [
        MoveKind::EdgeCollapse,
        MoveKind::VertexCollapse,
        MoveKind::TriangleFlip,
        MoveKind::EdgeFlip,
        MoveKind::TetSubdivide,
    ];

    /// Dimension of the face a site of this kind refers to.
    pub fn face_dim(self) -> usize {
        match self {
            MoveKind::VertexCollapse => 0,
            MoveKind::EdgeCollapse | MoveKind::EdgeFlip => 1,
            MoveKind::TriangleFlip => 2,
            MoveKind::TetSubdivide => 3,
        }
    }

    pub fn effect(self) -> SizeEffect {
        match self {
            MoveKind::EdgeCollapse | MoveKind::VertexCollapse => SizeEffect::Reducing,
            MoveKind::TriangleFlip | MoveKind::EdgeFlip => SizeEffect::Preserving,
            MoveKind::TetSubdivide => SizeEffect::Increasing,
        }
    }

    /// Conventional Pachner-style name ("pentachora before"-"after").
    pub fn label(self) -> &'static str {
        match self {
            MoveKind::EdgeCollapse => "4-2",
            MoveKind::VertexCollapse => "5-1",
            MoveKind::TriangleFlip => "3-3",
            MoveKind::EdgeFlip => "4-4",
            MoveKind::TetSubdivide => "2-4",
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            MoveKind::EdgeCollapse => 0,
            MoveKind::VertexCollapse => 1,
            MoveKind::TriangleFlip => 2,
            MoveKind::EdgeFlip => 3,
            MoveKind::TetSubdivide => 4,
        }
    }
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Handle to one face where a move of `kind` was feasible.
///
/// Invariants:
/// - `face` indexes the structure's face list of dimension `kind.face_dim()`
///   as it was at `generation`; it means nothing after a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Site {
    kind: MoveKind,
    face: usize,
    generation: u64,
}

impl Site {
    pub fn new(kind: MoveKind, face: usize, generation: u64) -> Self {
        Self {
            kind,
            face,
            generation,
        }
    }
    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }
    #[inline]
    pub fn face(&self) -> usize {
        self.face
    }
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Number of cells of each dimension.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CellCounts {
    pub vertices: usize,
    pub edges: usize,
    pub triangles: usize,
    pub tetrahedra: usize,
    pub pentachora: usize,
}

impl CellCounts {
    pub fn of_dim(&self, dim: usize) -> Option<usize> {
        match dim {
            0 => Some(self.vertices),
            1 => Some(self.edges),
            2 => Some(self.triangles),
            3 => Some(self.tetrahedra),
            4 => Some(self.pentachora),
            _ => None,
        }
    }

    /// Alternating sum of the counts; 2 for every triangulated 4-sphere.
    pub fn euler_characteristic(&self) -> i64 {
        self.vertices as i64 - self.edges as i64 + self.triangles as i64
            - self.tetrahedra as i64
            + self.pentachora as i64
    }
}

/// Mutable triangulation as seen by the search.
pub trait Structure: Sized {
    /// Rebuild a structure from a signature produced by [`Structure::signature`]
    /// (or any equivalent one).
    fn from_signature(sig: &str) -> Result<Self, SignatureError>;

    /// Canonical signature: equal for isomorphic structures.
    fn signature(&self) -> String;

    fn counts(&self) -> CellCounts;

    /// Number of top-dimensional cells.
    fn size(&self) -> usize {
        self.counts().pentachora
    }

    /// Commit counter; sites from other generations are stale.
    fn generation(&self) -> u64;

    /// All sites where a move of `kind` is currently feasible, in a
    /// deterministic order. Does not mutate.
    fn feasible(&self, kind: MoveKind) -> Vec<Site>;

    /// Pure check; false for stale sites.
    fn is_feasible(&self, site: &Site) -> bool;

    /// Apply the move at `site`. Invalidates every outstanding site.
    fn commit(&mut self, site: Site) -> Result<(), MoveError>;
}
