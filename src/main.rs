mod args;
mod election;

use std::io::Write;
use std::path::Path;

use clap::Parser;
use log::{debug, warn, LevelFilter};

use crate::args::Args;
use crate::election::output::render;

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    let _ = builder.try_init();
}

fn main() {
    let outcome = match Args::try_parse() {
        Ok(args) => {
            init_logging(args.verbose);
            debug!("args: {:?}", args);
            election::run_command(args.command.as_ref(), Path::new(&args.data_dir))
        }
        Err(e) => {
            init_logging(false);
            match election::parse_error_outcome(&e) {
                Some(outcome) => outcome,
                None => {
                    // Help and version requests.
                    let _ = e.print();
                    return;
                }
            }
        }
    };

    write_output(&mut std::io::stdout(), &outcome);
}

/// Writes the rendered outcome. A failure is logged and otherwise ignored.
fn write_output(out: &mut impl Write, outcome: &election::Outcome) -> bool {
    match out
        .write_all(render(outcome).as_bytes())
        .and_then(|_| out.flush())
    {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not write the output: {}", e);
            false
        }
    }
}
