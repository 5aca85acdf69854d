//! Combinatorial 4-manifold triangulations (the bundled Structure Engine).
//!
//! Purpose
//! - A small, explicit implementation of the `Structure` contract: pentachora
//!   glued along facets, face classes, Pachner-style moves and canonical
//!   signatures. Enough to run the search end to end and to test it on real
//!   triangulations.
//!
//! Why this design (short)
//! - Generalized triangulations (self-identified faces allowed) so that very
//!   small spheres such as the two-pentachoron one are representable.
//! - Every move is a labelled-star replacement; one feasibility check and one
//!   rewiring routine cover 2-4, 3-3, 4-2 and 5-1, and 4-4 is a 2-4 followed
//!   by a 4-2.
//! - The skeleton is recomputed on demand instead of maintained incrementally;
//!   moves are rare compared to the cost of getting incremental updates right.
//!
//! Conventions
//! - Vertices of a pentachoron are `0..5`; facet `f` is opposite vertex `f`.
//! - Faces are vertex bitmasks within a pentachoron.
//!
//! References
//! - Code cross-refs: `crate::structure::Structure`, `crate::search`.

mod isosig;
mod moves;
mod pachner;
mod perm;
mod skeleton;
pub mod special;
mod types;

pub use isosig::{decode as decode_signature, encode as encode_signature};
pub use perm::{Perm5, PERM5_COUNT};
pub use skeleton::{Face, Skeleton};
pub use types::{Gluing, Pentachoron, Triangulation4};
