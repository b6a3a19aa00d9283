// Rendering of command outcomes as single-line JSON documents.

use election_core::{CandidateTally, Vote};
use serde_json::json;
use serde_json::Value as JSValue;

use crate::election::Outcome;

fn candidate_to_json(c: &CandidateTally) -> JSValue {
    json!({"id": c.id, "name": c.name, "votes": c.votes})
}

fn candidates_to_json(cs: &[CandidateTally]) -> Vec<JSValue> {
    cs.iter().map(candidate_to_json).collect()
}

fn vote_to_json(v: &Vote) -> JSValue {
    json!({"voter": v.voter_id, "candidate": v.candidate_id})
}

pub fn outcome_to_json(outcome: &Outcome) -> JSValue {
    match outcome {
        Outcome::CandidateAdded => json!({"ok": true, "msg": "candidate_added"}),
        Outcome::VoteRecorded => json!({"ok": true, "msg": "vote_recorded"}),
        Outcome::Reset => json!({"ok": true}),
        Outcome::Refused(code) => json!({"ok": false, "msg": code}),
        Outcome::Candidates(cs) => json!({ "candidates": candidates_to_json(cs) }),
        Outcome::Votes(vs) => {
            let votes: Vec<JSValue> = vs.iter().map(vote_to_json).collect();
            json!({ "votes": votes })
        }
        Outcome::Results(res) => {
            let winner = match &res.winner {
                Some(w) => candidate_to_json(w),
                None => JSValue::Null,
            };
            json!({"candidates": candidates_to_json(&res.candidates), "winner": winner})
        }
    }
}

/// The compact JSON text for an outcome, without a trailing newline.
pub fn render(outcome: &Outcome) -> String {
    outcome_to_json(outcome).to_string()
}
