//! Epoch controller: restore, descend, search sideways, perturb, report.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::SearchError;
use crate::structure::Structure;

use super::descent::descend;
use super::lateral::lateral_pass;
use super::perturb::perturb;
use super::select::MoveSelector;
use super::types::{EpochReport, FinalReport, MoveTally, Phase, RunSummary, SearchCfg};

/// Run the full search on the structure encoded by `input`.
///
/// Epochs `1..cfg.epochs` each restore the working structure from the
/// previous epoch's signature (the input for the first one), descend, run
/// lateral search for every flip kind, then perturb. An epoch whose result has
/// fewer edges than the input is passed to `on_improvement` as soon as it
/// finishes. The last epoch's signature is the next epoch's start whether or
/// not it improved. A final descent and lateral pass on the working structure
/// always follows.
///
/// Errors
/// - `Signature` if `input` does not decode.
/// - `InvalidConfig` if the schedule mixes up size effects.
/// - `InvariantViolation` if the engine rejects a freshly enumerated site,
///   runs out of subdivision sites, or cannot decode its own signature.
pub fn simplify<S, F>(
    input: &str,
    cfg: &SearchCfg,
    mut on_improvement: F,
) -> Result<RunSummary, SearchError>
where
    S: Structure,
    F: FnMut(&EpochReport),
{
    cfg.schedule.validate()?;
    let mut working = S::from_signature(input)?;
    let original_edges = working.counts().edges;
    let mut selector = MoveSelector::new(cfg.selection);
    debug!(random = selector.is_random(), "selector ready");
    let mut last_sig = input.to_owned();
    let mut total = MoveTally::default();
    let mut improvements = Vec::new();
    info!(
        edges = original_edges,
        size = working.size(),
        epochs = cfg.epochs,
        "search started"
    );

    for epoch in 1..cfg.epochs {
        let mut tally = MoveTally::default();

        debug!(epoch, phase = %Phase::Restoring);
        let s = S::from_signature(&last_sig).map_err(|e| {
            SearchError::invariant(format!("epoch {epoch} could not restore its signature: {e}"))
        })?;
        let clock = Instant::now();

        debug!(epoch, phase = %Phase::Descending);
        let s = descend(s, &cfg.schedule.descent, &mut tally)?;
        let edges_before = s.counts().edges;

        debug!(epoch, phase = %Phase::LateralSearching);
        let s = lateral_pass(s, cfg, &mut selector, &mut tally)?;

        debug!(epoch, phase = %Phase::Perturbing);
        let s = perturb(s, cfg, &mut selector, &mut tally)?;

        debug!(epoch, phase = %Phase::Reporting);
        last_sig = s.signature();
        let counts = s.counts();
        let elapsed = clock.elapsed();
        total.absorb(&tally);
        info!(
            epoch,
            edges = counts.edges,
            size = counts.pentachora,
            moves = tally.total(),
            elapsed_s = elapsed.as_secs_f64(),
            "epoch finished"
        );
        if counts.edges < original_edges {
            let report = EpochReport {
                signature: last_sig.clone(),
                epoch,
                vertices: counts.vertices,
                edges_before,
                edges_after: counts.edges,
                size: counts.pentachora,
                elapsed,
                tally,
            };
            on_improvement(&report);
            improvements.push(report);
        }
        working = s;
    }

    debug!(phase = %Phase::Descending, "final pass");
    let s = descend(working, &cfg.schedule.descent, &mut total)?;
    let s = lateral_pass(s, cfg, &mut selector, &mut total)?;
    let counts = s.counts();
    let final_report = FinalReport {
        signature: s.signature(),
        vertices: counts.vertices,
        original_edges,
        edges: counts.edges,
        size: counts.pentachora,
        improved: counts.edges < original_edges,
        tally: total,
    };
    info!(
        edges = final_report.edges,
        size = final_report.size,
        improved = final_report.improved,
        moves = total.total(),
        "search finished"
    );
    Ok(RunSummary {
        improvements,
        final_report,
    })
}
