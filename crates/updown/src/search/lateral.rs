//! Bounded search over size-preserving moves.

use tracing::debug;

use crate::error::SearchError;
use crate::structure::{MoveKind, Structure};

use super::descent::descend;
use super::select::MoveSelector;
use super::types::{MoveTally, SearchCfg};

/// Up to `width` moves of `kind`, each followed by a full descent.
///
/// Stops early when `kind` has no feasible site. The output is never larger
/// than the input: flips keep the size and descent only shrinks it.
pub fn lateral_search<S: Structure>(
    mut s: S,
    kind: MoveKind,
    width: usize,
    descent: &[MoveKind],
    selector: &mut MoveSelector,
    tally: &mut MoveTally,
) -> Result<S, SearchError> {
    let mut attempts = 0;
    while attempts < width {
        let sites = s.feasible(kind);
        if sites.is_empty() {
            break;
        }
        let site = selector.select(sites, attempts)?;
        s.commit(site)?;
        tally.record(kind);
        s = descend(s, descent, tally)?;
        attempts += 1;
    }
    debug!(kind = %kind, attempts, size = s.size(), "lateral search done");
    Ok(s)
}

/// Lateral search for every size-preserving kind of the schedule, in order.
pub(crate) fn lateral_pass<S: Structure>(
    mut s: S,
    cfg: &SearchCfg,
    selector: &mut MoveSelector,
    tally: &mut MoveTally,
) -> Result<S, SearchError> {
    for &kind in &cfg.schedule.lateral {
        s = lateral_search(s, kind, cfg.width, &cfg.schedule.descent, selector, tally)?;
    }
    Ok(s)
}
