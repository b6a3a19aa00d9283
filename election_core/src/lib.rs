mod config;
pub mod manual;
pub mod store;

use log::{debug, info, warn};

use std::collections::HashMap;

pub use crate::config::*;
use crate::store::{RawRecord, RecordStore, StoreKind};

/// Parses an identifier typed by a user.
///
/// Surrounding whitespace is ignored. Anything else that is not a base-10
/// integer is rejected instead of being read as 0.
pub fn parse_id(s: &str) -> Result<Id, ElectionErrors> {
    s.trim()
        .parse::<Id>()
        .map_err(|_| ElectionErrors::InvalidId(s.to_string()))
}

/// Cleans a candidate name so that it fits on one line of the candidate store.
///
/// Delimiters become spaces, the name stops at the first line break and is
/// capped at [`MAX_NAME_LEN`] bytes (cut on a character boundary).
pub fn sanitize_name(name: &str) -> String {
    let mut res = String::with_capacity(name.len().min(MAX_NAME_LEN));
    for c in name.chars() {
        let c = match c {
            '\n' | '\r' => break,
            store::DELIMITER => ' ',
            c => c,
        };
        if res.len() + c.len_utf8() > MAX_NAME_LEN {
            break;
        }
        res.push(c);
    }
    res
}

/// Counts the votes of each candidate, in candidate order.
///
/// A vote goes to the first candidate carrying its id. Votes for unknown ids
/// are ignored.
pub fn tally(candidates: &[Candidate], votes: &[Vote]) -> Vec<CandidateTally> {
    let mut index_by_id: HashMap<Id, usize> = HashMap::new();
    for (idx, c) in candidates.iter().enumerate() {
        index_by_id.entry(c.id).or_insert(idx);
    }
    let mut counts: Vec<u64> = vec![0; candidates.len()];
    for v in votes.iter() {
        match index_by_id.get(&v.candidate_id) {
            Some(idx) => counts[*idx] += 1,
            None => debug!("tally: ignoring vote for unknown candidate {:?}", v),
        }
    }
    candidates
        .iter()
        .zip(counts)
        .map(|(c, votes)| CandidateTally {
            id: c.id,
            name: c.name.clone(),
            votes,
        })
        .collect()
}

/// The candidate with the most votes. Ties go to the one listed first.
pub fn pick_winner(tallies: &[CandidateTally]) -> Option<&CandidateTally> {
    let mut winner: Option<&CandidateTally> = None;
    for t in tallies.iter() {
        match winner {
            Some(w) if t.votes <= w.votes => {}
            _ => winner = Some(t),
        }
    }
    winner
}

fn parse_candidate(r: &RawRecord) -> Option<Candidate> {
    match parse_id(&r.key) {
        Ok(id) => Some(Candidate {
            id,
            name: r.value.clone(),
        }),
        Err(e) => {
            warn!("skipping malformed candidate record {:?}: {}", r, e);
            None
        }
    }
}

fn parse_vote(r: &RawRecord) -> Option<Vote> {
    match (parse_id(&r.key), parse_id(&r.value)) {
        (Ok(voter_id), Ok(candidate_id)) => Some(Vote {
            voter_id,
            candidate_id,
        }),
        _ => {
            warn!("skipping malformed vote record {:?}", r);
            None
        }
    }
}

/// An election backed by a record store.
///
/// Every operation reads the store afresh: nothing is cached between calls.
pub struct Election<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> Election<S> {
    pub fn new(store: S) -> Election<S> {
        Election { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // **** Validation ****

    pub fn candidates(&self) -> Result<Vec<Candidate>, ElectionErrors> {
        let records = self.store.read_all(StoreKind::Candidates)?;
        Ok(records.iter().filter_map(parse_candidate).collect())
    }

    pub fn votes(&self) -> Result<Vec<Vote>, ElectionErrors> {
        let records = self.store.read_all(StoreKind::Votes)?;
        Ok(records.iter().filter_map(parse_vote).collect())
    }

    pub fn candidate_exists(&self, id: Id) -> Result<bool, ElectionErrors> {
        Ok(self.candidates()?.iter().any(|c| c.id == id))
    }

    /// Stops at the first vote cast by this voter.
    pub fn voter_has_voted(&self, voter_id: Id) -> Result<bool, ElectionErrors> {
        let records = self.store.read_all(StoreKind::Votes)?;
        // Only the voter field matters here, even if the candidate field is damaged.
        Ok(records
            .iter()
            .any(|r| matches!(parse_id(&r.key), Ok(v) if v == voter_id)))
    }

    // **** Commands ****

    /// Registers a new candidate. The name is sanitized before being stored.
    pub fn add_candidate(&mut self, id: Id, name: &str) -> Result<Candidate, ElectionErrors> {
        if self.candidate_exists(id)? {
            info!("add_candidate: candidate {} already exists", id);
            return Err(ElectionErrors::CandidateExists(id));
        }
        let candidate = Candidate {
            id,
            name: sanitize_name(name),
        };
        debug!("add_candidate: {:?}", candidate);
        self.store.append(
            StoreKind::Candidates,
            &RawRecord::new(id.to_string(), candidate.name.clone()),
        )?;
        info!("add_candidate: added candidate {}", id);
        Ok(candidate)
    }

    /// Records a vote. The candidate must exist and the voter must not have voted yet.
    pub fn cast_vote(&mut self, voter_id: Id, candidate_id: Id) -> Result<Vote, ElectionErrors> {
        if !self.candidate_exists(candidate_id)? {
            info!("cast_vote: candidate {} not found", candidate_id);
            return Err(ElectionErrors::CandidateNotFound(candidate_id));
        }
        if self.voter_has_voted(voter_id)? {
            info!("cast_vote: voter {} has already voted", voter_id);
            return Err(ElectionErrors::DuplicateVoter(voter_id));
        }
        self.store.append(
            StoreKind::Votes,
            &RawRecord::new(voter_id.to_string(), candidate_id.to_string()),
        )?;
        info!("cast_vote: voter {} -> candidate {}", voter_id, candidate_id);
        Ok(Vote {
            voter_id,
            candidate_id,
        })
    }

    pub fn list_candidates(&self) -> Result<Vec<CandidateTally>, ElectionErrors> {
        let candidates = self.candidates()?;
        let votes = self.votes()?;
        debug!(
            "list_candidates: {} candidates, {} votes",
            candidates.len(),
            votes.len()
        );
        Ok(tally(&candidates, &votes))
    }

    /// All the votes, in the order they were cast.
    pub fn list_votes(&self) -> Result<Vec<Vote>, ElectionErrors> {
        self.votes()
    }

    pub fn results(&self) -> Result<ElectionResults, ElectionErrors> {
        let candidates = self.list_candidates()?;
        let winner = pick_winner(&candidates).cloned();
        info!("results: winner {:?}", winner);
        Ok(ElectionResults { candidates, winner })
    }

    /// Removes all the candidates and votes.
    ///
    /// Both stores are cleared even if the first one fails; the first error is returned.
    pub fn reset(&mut self) -> Result<(), ElectionErrors> {
        let mut first_err: Option<ElectionErrors> = None;
        for kind in StoreKind::ALL {
            if let Err(e) = self.store.clear(kind) {
                warn!("reset: failed to clear {:?}: {}", kind, e);
                if first_err.is_none() {
                    first_err = Some(e.into());
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => {
                info!("reset: election cleared");
                Ok(())
            }
        }
    }
}
