//! CSV collector CLI entrypoint.
//!
//! This binary collects the operator's historical CSVs, writes the upgrade
//! chain to the output directory, and prints the latest CSV name on stdout.

use clap::Parser;
use csv_collector::cli::Cli;
use csv_collector::error::Result;
use csv_collector::output::write_stderr_line;
use csv_collector::pipeline::run;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format_args!("error: {err}"));
            err.exit_code()
        }
    }
}
