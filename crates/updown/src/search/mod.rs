//! Up-side-Down local search over a `Structure`.
//!
//! Purpose
//! - Shrink a triangulation (fewer edges, fewer pentachora) using only moves
//!   that keep the underlying space: greedy descent, bounded lateral search,
//!   bounded perturbation, restarted from a canonical signature every epoch.
//!
//! Why this design
//! - Sites die on every commit, so each phase re-enumerates after each move
//!   and never holds a site across a commit.
//! - The structure is moved into each phase and returned; there is no shared
//!   mutable state besides the selector's random source.
//! - One function per phase pattern, parameterized by `MoveKind`, instead of
//!   a copy per move family.
//! - Restarting from the signature (not the best structure seen) keeps the
//!   walk going through sideways and uphill states.
//!
//! References
//! - Code cross-refs: `crate::structure::Structure`, `crate::tri4`.

mod descent;
mod epoch;
mod lateral;
mod perturb;
mod select;
mod types;

pub use descent::descend;
pub use epoch::simplify;
pub use lateral::lateral_search;
pub use perturb::perturb;
pub use select::MoveSelector;
pub use types::{
    EpochReport, FinalReport, MoveSchedule, MoveTally, Phase, RunSummary, SearchCfg, Selection,
};

#[cfg(test)]
mod tests;
