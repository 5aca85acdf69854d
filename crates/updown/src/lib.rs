//! Up-side-Down simplification of 4-manifold triangulations.
//!
//! Layout
//! - `structure`: the contract the search consumes (`Structure`, `Site`, `MoveKind`).
//! - `tri4`: the bundled engine, pentachora glued along facets with
//!   isomorphism signatures.
//! - `search`: descent, lateral search, perturbation and the epoch controller.
//! - `error`: error enums shared by all of the above.
//!
//! API Policy
//! - This crate is project-internal. There is no stable public API.

pub mod error;
pub mod search;
pub mod structure;
pub mod tri4;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{MoveError, SearchError, SignatureError};
pub use search::{simplify, RunSummary, SearchCfg, Selection};
pub use structure::{CellCounts, MoveKind, Site, Structure};
pub use tri4::Triangulation4;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::error::{MoveError, SearchError, SignatureError};
    pub use crate::search::{
        descend, lateral_search, perturb, simplify, EpochReport, FinalReport, MoveSchedule,
        MoveSelector, MoveTally, RunSummary, SearchCfg, Selection,
    };
    pub use crate::structure::{CellCounts, MoveKind, SizeEffect, Site, Structure};
    pub use crate::tri4::{decode_signature, encode_signature, Triangulation4};
}
