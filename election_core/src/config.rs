// ********* Record data structures ***********

use std::error::Error;
use std::fmt::Display;

use crate::store::StoreError;

/// Identifier of a candidate or of a voter.
pub type Id = i64;

/// Longest name (in bytes) that is kept when registering a candidate.
pub const MAX_NAME_LEN: usize = 255;

/// A registered candidate, as stored in the candidate store.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    pub id: Id,
    pub name: String,
}

/// A single vote, as stored in the vote store.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Vote {
    pub voter_id: Id,
    pub candidate_id: Id,
}

// ******** Output data structures *********

/// The number of votes received by one candidate.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CandidateTally {
    pub id: Id,
    pub name: String,
    pub votes: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionResults {
    /// All the candidates in store order.
    pub candidates: Vec<CandidateTally>,
    /// None only when no candidate is registered.
    pub winner: Option<CandidateTally>,
}

/// Errors reported by the command handlers.
///
/// None of them is fatal: the caller is expected to report the reason code
/// and carry on.
#[derive(Debug)]
pub enum ElectionErrors {
    /// The underlying store could not be read or written.
    Io(StoreError),
    /// A candidate with this id is already registered.
    CandidateExists(Id),
    CandidateNotFound(Id),
    DuplicateVoter(Id),
    /// The text could not be understood as an identifier.
    InvalidId(String),
}

impl ElectionErrors {
    /// The machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            ElectionErrors::Io(_) => "io_error",
            ElectionErrors::CandidateExists(_) => "exists",
            ElectionErrors::CandidateNotFound(_) => "candidate_not_found",
            ElectionErrors::DuplicateVoter(_) => "duplicate_voter",
            ElectionErrors::InvalidId(_) => "invalid_id",
        }
    }
}

impl Error for ElectionErrors {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ElectionErrors::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for ElectionErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ElectionErrors::Io(e) => write!(f, "store error: {}", e),
            ElectionErrors::CandidateExists(id) => write!(f, "candidate {} already exists", id),
            ElectionErrors::CandidateNotFound(id) => write!(f, "candidate {} not found", id),
            ElectionErrors::DuplicateVoter(id) => write!(f, "voter {} has already voted", id),
            ElectionErrors::InvalidId(s) => write!(f, "not a valid identifier: {:?}", s),
        }
    }
}

impl From<StoreError> for ElectionErrors {
    fn from(e: StoreError) -> Self {
        ElectionErrors::Io(e)
    }
}
