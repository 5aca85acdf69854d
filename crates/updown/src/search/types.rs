//! Configuration, counters and report records of the search.

use std::fmt;
use std::time::Duration;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::SearchError;
use crate::structure::{MoveKind, SizeEffect};

/// How the selector picks among candidate sites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Selection {
    /// `candidates[attempt % len]`.
    #[default]
    Deterministic,
    /// Uniform choice from a `StdRng` seeded once with `seed`.
    Random { seed: u64 },
}

/// Move kinds used by each phase, in the order they run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoveSchedule {
    pub descent: Vec<MoveKind>,
    pub lateral: Vec<MoveKind>,
    pub perturb: MoveKind,
}

impl Default for MoveSchedule {
    fn default() -> Self {
        Self {
            descent: vec![MoveKind::EdgeCollapse, MoveKind::VertexCollapse],
            lateral: vec![MoveKind::TriangleFlip, MoveKind::EdgeFlip],
            perturb: MoveKind::TetSubdivide,
        }
    }
}

impl MoveSchedule {
    /// Every kind must have the size effect of the phase it is scheduled in.
    pub fn validate(&self) -> Result<(), SearchError> {
        let check = |kind: MoveKind, want: SizeEffect, phase: &str| {
            if kind.effect() == want {
                Ok(())
            } else {
                Err(SearchError::InvalidConfig {
                    reason: format!("{kind} move scheduled in {phase} has effect {:?}", kind.effect()),
                })
            }
        };
        for &k in &self.descent {
            check(k, SizeEffect::Reducing, "descent")?;
        }
        for &k in &self.lateral {
            check(k, SizeEffect::Preserving, "lateral search")?;
        }
        check(self.perturb, SizeEffect::Increasing, "perturbation")
    }
}

/// Search parameters; fixed for the duration of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchCfg {
    /// Size-increasing attempts per epoch.
    pub height: usize,
    /// Size-preserving attempts per lateral search.
    pub width: usize,
    /// The epoch loop runs `epochs - 1` times before the final pass.
    pub epochs: usize,
    pub selection: Selection,
    pub schedule: MoveSchedule,
}

impl Default for SearchCfg {
    fn default() -> Self {
        Self {
            height: 10,
            width: 30,
            epochs: 10,
            selection: Selection::Deterministic,
            schedule: MoveSchedule::default(),
        }
    }
}

/// Where the epoch controller currently is; used in log events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Restoring,
    Descending,
    LateralSearching,
    Perturbing,
    Reporting,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Restoring => "restoring",
            Phase::Descending => "descending",
            Phase::LateralSearching => "lateral_searching",
            Phase::Perturbing => "perturbing",
            Phase::Reporting => "reporting",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Committed moves per kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveTally {
    counts: [u64; MoveKind::ALL.len()],
}

impl MoveTally {
    pub fn record(&mut self, kind: MoveKind) {
        self.counts[kind.slot()] += 1;
    }

    pub fn get(&self, kind: MoveKind) -> u64 {
        self.counts[kind.slot()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Add `other` into `self`.
    pub fn absorb(&mut self, other: &MoveTally) {
        for (mine, theirs) in self.counts.iter_mut().zip(other.counts.iter()) {
            *mine += theirs;
        }
    }
}

impl Serialize for MoveTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MoveKind::ALL.len()))?;
        for kind in MoveKind::ALL {
            map.serialize_entry(kind.label(), &self.get(kind))?;
        }
        map.end()
    }
}

/// An epoch that ended with fewer edges than the input.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpochReport {
    pub signature: String,
    pub epoch: usize,
    pub vertices: usize,
    /// Edge count right after the epoch's first descent.
    pub edges_before: usize,
    pub edges_after: usize,
    pub size: usize,
    #[serde(serialize_with = "as_secs")]
    pub elapsed: Duration,
    /// Moves committed during this epoch.
    pub tally: MoveTally,
}

impl fmt::Display for EpochReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.signature)?;
        write!(
            f,
            "{} | {}, {} -> {}, {} | {:.3}",
            self.epoch,
            self.vertices,
            self.edges_before,
            self.edges_after,
            self.size,
            self.elapsed.as_secs_f64()
        )
    }
}

/// Result of the final pass; always produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FinalReport {
    pub signature: String,
    pub vertices: usize,
    pub original_edges: usize,
    pub edges: usize,
    pub size: usize,
    /// `edges < original_edges`.
    pub improved: bool,
    /// Moves committed over the whole run.
    pub tally: MoveTally,
}

impl fmt::Display for FinalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.signature)?;
        write!(
            f,
            "End | {}, {} -> {}, {}",
            self.vertices, self.original_edges, self.edges, self.size
        )
    }
}

/// Everything a run produced, in order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub improvements: Vec<EpochReport>,
    #[serde(rename = "final")]
    pub final_report: FinalReport,
}

fn as_secs<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}
