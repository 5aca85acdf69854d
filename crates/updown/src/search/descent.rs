//! Greedy descent under size-reducing moves.

use tracing::debug;

use crate::error::SearchError;
use crate::structure::{MoveKind, Structure};

use super::types::MoveTally;

/// Apply size-reducing moves until none of `kinds` is feasible.
///
/// One sub-pass per kind, in order: commit the first enumerated site and
/// re-enumerate until the enumeration comes back empty. A kind whose
/// enumeration is empty on entry leaves the structure unchanged and the next
/// sub-pass still runs. Earlier kinds are not revisited, so a later sub-pass
/// may re-enable moves of an earlier kind.
pub fn descend<S: Structure>(
    mut s: S,
    kinds: &[MoveKind],
    tally: &mut MoveTally,
) -> Result<S, SearchError> {
    for &kind in kinds {
        let mut committed = 0usize;
        while let Some(site) = s.feasible(kind).into_iter().next() {
            s.commit(site)?;
            tally.record(kind);
            committed += 1;
        }
        debug!(kind = %kind, committed, size = s.size(), "descent sub-pass done");
    }
    Ok(s)
}
