use log::{debug, info, warn};

use election_core::store::RecordStore;
use election_core::*;
use snafu::Snafu;

use std::path::Path;

use clap::ErrorKind;

use crate::args::Command;
use crate::election::io_csv::CsvStore;

pub mod io_csv;
pub mod output;

#[derive(Debug, Snafu)]
pub enum ElectionError {
    #[snafu(display("Error opening store {path}"))]
    OpenStore {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading a record from store {path}"))]
    ReadRecord { source: csv::Error, path: String },
    #[snafu(display("Error writing a record to store {path}"))]
    WriteRecord { source: csv::Error, path: String },
    #[snafu(display("Error flushing store {path}"))]
    FlushStore {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error removing store {path}"))]
    RemoveStore {
        source: std::io::Error,
        path: String,
    },
}

pub type ElectionResult<T> = Result<T, ElectionError>;

/// What a command produced, before it gets rendered.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Outcome {
    CandidateAdded,
    VoteRecorded,
    Reset,
    Candidates(Vec<CandidateTally>),
    Votes(Vec<Vote>),
    Results(ElectionResults),
    /// The command was refused, with the reason code.
    Refused(&'static str),
}

pub const USAGE: &str = "usage";
pub const INVALID_COMMAND: &str = "invalid_command";

impl From<ElectionErrors> for Outcome {
    fn from(e: ElectionErrors) -> Self {
        Outcome::Refused(e.code())
    }
}

/// Runs one command against the stores found in `data_dir`.
///
/// Failures are reported in the outcome, never returned.
pub fn run_command(command: Option<&Command>, data_dir: &Path) -> Outcome {
    let command = match command {
        Some(c) => c,
        None => {
            info!("No command given");
            return Outcome::Refused(USAGE);
        }
    };
    debug!("run_command: {:?} in {:?}", command, data_dir);
    let mut election = Election::new(CsvStore::new(data_dir));
    match execute(&mut election, command) {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Command {:?} refused: {}", command, e);
            e.into()
        }
    }
}

fn execute<S: RecordStore>(
    election: &mut Election<S>,
    command: &Command,
) -> Result<Outcome, ElectionErrors> {
    let outcome = match command {
        Command::Add { id, name } => {
            let id = parse_id(id)?;
            election.add_candidate(id, &name.join(" "))?;
            Outcome::CandidateAdded
        }
        Command::Vote {
            voter_id,
            candidate_id,
        } => {
            let voter_id = parse_id(voter_id)?;
            let candidate_id = parse_id(candidate_id)?;
            election.cast_vote(voter_id, candidate_id)?;
            Outcome::VoteRecorded
        }
        Command::ListCandidates => Outcome::Candidates(election.list_candidates()?),
        Command::ListVotes => Outcome::Votes(election.list_votes()?),
        Command::Results => Outcome::Results(election.results()?),
        Command::Reset => {
            election.reset()?;
            Outcome::Reset
        }
    };
    Ok(outcome)
}

/// The outcome to report when the command line could not be parsed.
///
/// Returns None for help and version requests, which clap prints itself.
pub fn parse_error_outcome(e: &clap::Error) -> Option<Outcome> {
    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        ErrorKind::MissingSubcommand | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            Some(Outcome::Refused(USAGE))
        }
        k => {
            debug!("Could not parse the command line ({:?}): {}", k, e);
            Some(Outcome::Refused(INVALID_COMMAND))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::Args;
    use crate::election::output::render;
    use clap::Parser;
    use std::fs;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Parses the command line and runs it in `dir`, returning the rendered output.
    fn run(dir: &Path, argv: &[&str]) -> String {
        init();
        let mut full = vec!["election"];
        full.extend_from_slice(argv);
        let outcome = match Args::try_parse_from(full) {
            Ok(args) => run_command(args.command.as_ref(), dir),
            Err(e) => parse_error_outcome(&e).expect("not a help request"),
        };
        render(&outcome)
    }

    #[test]
    fn no_command_is_usage() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(run(dir.path(), &[]), r#"{"ok":false,"msg":"usage"}"#);
    }

    #[test]
    fn unknown_or_incomplete_commands_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let invalid = r#"{"ok":false,"msg":"invalid_command"}"#;
        assert_eq!(run(dir.path(), &["bogus"]), invalid);
        assert_eq!(run(dir.path(), &["add", "1"]), invalid);
        assert_eq!(run(dir.path(), &["vote", "1"]), invalid);
        assert_eq!(run(dir.path(), &["vote", "1", "2", "3"]), invalid);
        assert_eq!(run(dir.path(), &["help"]), invalid);
        assert_eq!(run(dir.path(), &["help", "add"]), invalid);
    }

    #[test]
    fn help_is_left_to_clap() {
        let e = Args::try_parse_from(["election", "--help"]).unwrap_err();
        assert_eq!(parse_error_outcome(&e), None);
    }

    #[test]
    fn add_then_list_candidates() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            run(dir.path(), &["add", "1", "Alice"]),
            r#"{"ok":true,"msg":"candidate_added"}"#
        );
        assert_eq!(
            run(dir.path(), &["list_candidates"]),
            r#"{"candidates":[{"id":1,"name":"Alice","votes":0}]}"#
        );
    }

    #[test]
    fn add_joins_name_arguments_and_sanitizes() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["add", "7", "Mary", "Ann,", "Smith"]);
        let raw = fs::read_to_string(dir.path().join("candidates.csv")).unwrap();
        assert_eq!(raw, "7,Mary Ann  Smith\n");
    }

    #[test]
    fn add_twice_keeps_one_record() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["add", "1", "Alice"]);
        assert_eq!(
            run(dir.path(), &["add", "1", "Alicia"]),
            r#"{"ok":false,"msg":"exists"}"#
        );
        let raw = fs::read_to_string(dir.path().join("candidates.csv")).unwrap();
        assert_eq!(raw, "1,Alice\n");
    }

    #[test]
    fn non_numeric_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let invalid_id = r#"{"ok":false,"msg":"invalid_id"}"#;
        assert_eq!(run(dir.path(), &["add", "abc", "Alice"]), invalid_id);
        run(dir.path(), &["add", "0", "Zero"]);
        assert_eq!(run(dir.path(), &["vote", "x", "0"]), invalid_id);
        assert_eq!(run(dir.path(), &["vote", "1", "zero"]), invalid_id);
        assert!(!dir.path().join("votes.csv").exists());
    }

    #[test]
    fn negative_ids_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            run(dir.path(), &["add", "-3", "Minus"]),
            r#"{"ok":true,"msg":"candidate_added"}"#
        );
        assert_eq!(
            run(dir.path(), &["vote", "-1", "-3"]),
            r#"{"ok":true,"msg":"vote_recorded"}"#
        );
    }

    #[test]
    fn voting_flow() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["add", "1", "Alice"]);
        run(dir.path(), &["add", "2", "Bob"]);
        assert_eq!(
            run(dir.path(), &["vote", "100", "3"]),
            r#"{"ok":false,"msg":"candidate_not_found"}"#
        );
        assert!(!dir.path().join("votes.csv").exists());
        assert_eq!(
            run(dir.path(), &["vote", "100", "2"]),
            r#"{"ok":true,"msg":"vote_recorded"}"#
        );
        assert_eq!(
            run(dir.path(), &["vote", "100", "1"]),
            r#"{"ok":false,"msg":"duplicate_voter"}"#
        );
        run(dir.path(), &["vote", "101", "1"]);
        assert_eq!(
            run(dir.path(), &["list_votes"]),
            r#"{"votes":[{"voter":100,"candidate":2},{"voter":101,"candidate":1}]}"#
        );
        // Tie: Alice is first in the candidate store.
        assert_eq!(
            run(dir.path(), &["results"]),
            concat!(
                r#"{"candidates":[{"id":1,"name":"Alice","votes":1},{"id":2,"name":"Bob","votes":1}],"#,
                r#""winner":{"id":1,"name":"Alice","votes":1}}"#
            )
        );
        run(dir.path(), &["vote", "102", "2"]);
        assert!(run(dir.path(), &["results"]).ends_with(r#""winner":{"id":2,"name":"Bob","votes":2}}"#));
    }

    #[test]
    fn results_on_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            run(dir.path(), &["results"]),
            r#"{"candidates":[],"winner":null}"#
        );
        assert_eq!(run(dir.path(), &["list_votes"]), r#"{"votes":[]}"#);
    }

    #[test]
    fn reset_then_list() {
        let dir = tempfile::tempdir().unwrap();
        run(dir.path(), &["add", "1", "Alice"]);
        run(dir.path(), &["vote", "5", "1"]);
        assert_eq!(run(dir.path(), &["reset"]), r#"{"ok":true}"#);
        assert_eq!(
            run(dir.path(), &["list_candidates"]),
            r#"{"candidates":[]}"#
        );
        assert_eq!(run(dir.path(), &["list_votes"]), r#"{"votes":[]}"#);
        assert_eq!(run(dir.path(), &["reset"]), r#"{"ok":true}"#);
    }

    #[test]
    fn missing_data_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert_eq!(
            run(&missing, &["add", "1", "Alice"]),
            r#"{"ok":false,"msg":"io_error"}"#
        );
        // Reading an absent store is not an error.
        assert_eq!(run(&missing, &["list_candidates"]), r#"{"candidates":[]}"#);
    }
}
