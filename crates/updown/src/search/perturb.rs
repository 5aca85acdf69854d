//! Size-increasing kicks that move the search out of a local minimum.

use tracing::debug;

use crate::error::SearchError;
use crate::structure::Structure;

use super::lateral::lateral_pass;
use super::select::MoveSelector;
use super::types::{MoveTally, SearchCfg};

/// `cfg.height` subdivisions, each followed by lateral search for every
/// size-preserving kind.
///
/// Errors
/// - `InvariantViolation` if the subdivision kind has no feasible site; a
///   closed triangulation always has one, so this means the engine or the
///   input is broken.
pub fn perturb<S: Structure>(
    mut s: S,
    cfg: &SearchCfg,
    selector: &mut MoveSelector,
    tally: &mut MoveTally,
) -> Result<S, SearchError> {
    let kind = cfg.schedule.perturb;
    for attempt in 0..cfg.height {
        let sites = s.feasible(kind);
        if sites.is_empty() {
            return Err(SearchError::invariant(format!(
                "no feasible {kind} site at perturbation attempt {attempt}"
            )));
        }
        let site = selector.select(sites, attempt)?;
        s.commit(site)?;
        tally.record(kind);
        debug!(attempt, size = s.size(), "perturbation step");
        s = lateral_pass(s, cfg, selector, tally)?;
    }
    Ok(s)
}
