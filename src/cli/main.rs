//! `wsp_cli` — the thin CLI binary: `solve <instance-path>
//! <result-path>`. Selects the (only) reference back-end and enables every
//! constraint family by default; `--deadline`, `--quiet`, and `--json` are
//! supplemental flags on top of that contract.

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{value_parser, Arg, Command};
use log::Level;

use wsp_sat::config::Config;
use wsp_sat::context::Context;
use wsp_sat::parse;
use wsp_sat::report::{self, MachineResult};
use wsp_sat::solve::Outcome;

const SOLVER_TAG: &str = "wsp_sat::solve (reference backtracking)";

fn cli() -> Command {
    Command::new("wsp_cli")
        .about("Decides the Workflow Satisfiability Problem for a textual instance")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("instance")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the instance file (see the grammar docs on `parse`)"),
        )
        .arg(
            Arg::new("result")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to write the result report to"),
        )
        .arg(
            Arg::new("deadline")
                .long("deadline")
                .value_parser(value_parser!(u64))
                .num_args(1)
                .default_value("0")
                .help("Solve deadline in seconds; 0 means no deadline"),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .num_args(0)
                .help("Suppress the analysis appendix in the text report"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .num_args(0)
                .help("Write the machine-readable JSON result instead of text"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .num_args(0)
                .help("Log at debug level instead of the default (warn)"),
        )
}

fn main() -> ExitCode {
    let matches = cli().get_matches();

    logging::install(if matches.get_flag("verbose") { Level::Debug } else { Level::Warn });

    let instance_path = matches.get_one::<PathBuf>("instance").expect("required");
    let result_path = matches.get_one::<PathBuf>("result").expect("required");
    let deadline_secs = *matches.get_one::<u64>("deadline").expect("has default");
    let quiet = matches.get_flag("quiet");
    let as_json = matches.get_flag("json");

    let instance = match parse::parse_path(instance_path) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("parse error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = Config::default();
    config.deadline = Duration::from_secs(deadline_secs);

    let active = config.active;
    let mut context = Context::new(instance, config);
    let outcome = context.solve();

    let rendered = if as_json {
        match MachineResult::from_outcome(&outcome).to_json() {
            Ok(json) => json,
            Err(e) => {
                eprintln!("failed to serialize result: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        report::render_text(context.instance(), &outcome, &active, SOLVER_TAG, quiet)
    };

    if let Err(e) = std::fs::write(result_path, rendered) {
        eprintln!("failed to write result to {}: {e}", result_path.display());
        return ExitCode::FAILURE;
    }

    match outcome {
        Outcome::Sat { .. } | Outcome::Unsat { .. } => ExitCode::SUCCESS,
        Outcome::Error { message, .. } => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}
