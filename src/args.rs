use clap::{Parser, Subcommand};

/// Records election candidates and votes in flat files and reports tallies as JSON.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None, disable_help_subcommand = true)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// (directory path, default: current directory) The directory holding candidates.csv and votes.csv.
    #[clap(long, global = true, env = "ELECTION_DATA_DIR", value_parser, default_value = ".")]
    pub data_dir: String,

    /// If passed as an argument, will turn on verbose logging to the standard error.
    #[clap(long, global = true, takes_value = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Registers a candidate. The name may span several arguments.
    #[clap(name = "add")]
    Add {
        #[clap(value_parser, allow_hyphen_values = true)]
        id: String,
        #[clap(value_parser, required = true, multiple_values = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },
    /// Casts the vote of a voter for a candidate.
    #[clap(name = "vote")]
    Vote {
        #[clap(value_parser, allow_hyphen_values = true)]
        voter_id: String,
        #[clap(value_parser, allow_hyphen_values = true)]
        candidate_id: String,
    },
    /// Lists the candidates with their vote counts.
    #[clap(name = "list_candidates")]
    ListCandidates,
    /// Lists all the votes in the order they were cast.
    #[clap(name = "list_votes")]
    ListVotes,
    /// Lists the candidates and the winner.
    #[clap(name = "results")]
    Results,
    /// Deletes all the candidates and votes.
    #[clap(name = "reset")]
    Reset,
}
