//! Error types shared by the engine and the search core.
//!
//! Routine infeasibility (an empty enumeration, a face of the wrong degree) is
//! not an error; these types cover malformed input and broken contracts only.

use std::fmt;

use crate::structure::MoveKind;

/// Failure to decode a canonical signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureError {
    Empty,
    InvalidChar { pos: usize, ch: char },
    Truncated,
    Malformed { reason: String },
}

impl SignatureError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty signature"),
            Self::InvalidChar { pos, ch } => {
                write!(f, "invalid signature character {ch:?} at position {pos}")
            }
            Self::Truncated => write!(f, "signature ends unexpectedly"),
            Self::Malformed { reason } => write!(f, "malformed signature: {reason}"),
        }
    }
}

impl std::error::Error for SignatureError {}

/// A site handed to `commit` could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// The site was enumerated before the most recent commit.
    StaleSite { site: u64, current: u64 },
    /// The face index does not exist in the current skeleton.
    UnknownFace { kind: MoveKind, face: usize },
    /// The face exists but the move's preconditions do not hold.
    Infeasible { kind: MoveKind, face: usize },
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleSite { site, current } => write!(
                f,
                "stale site from generation {site} (structure is at generation {current})"
            ),
            Self::UnknownFace { kind, face } => write!(f, "{kind} move: no face #{face}"),
            Self::Infeasible { kind, face } => write!(f, "{kind} move not feasible on face #{face}"),
        }
    }
}

impl std::error::Error for MoveError {}

/// Fatal conditions raised by the search core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A selection was attempted on zero candidates.
    EmptyCandidateSet,
    /// The engine or the input broke an assumption the search relies on.
    InvariantViolation { detail: String },
    /// The input signature could not be decoded.
    Signature(SignatureError),
    /// A move kind was scheduled in a phase whose size effect it lacks.
    InvalidConfig { reason: String },
}

impl SearchError {
    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCandidateSet => write!(f, "cannot select from an empty candidate set"),
            Self::InvariantViolation { detail } => write!(f, "invariant violation: {detail}"),
            Self::Signature(e) => write!(f, "input signature: {e}"),
            Self::InvalidConfig { reason } => write!(f, "invalid search config: {reason}"),
        }
    }
}

impl std::error::Error for SearchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Signature(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SignatureError> for SearchError {
    fn from(e: SignatureError) -> Self {
        Self::Signature(e)
    }
}

impl From<MoveError> for SearchError {
    fn from(e: MoveError) -> Self {
        Self::invariant(format!("engine rejected an enumerated site: {e}"))
    }
}
