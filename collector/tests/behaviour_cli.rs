//! End-to-end CLI behaviour tests for `collect-csvs`.
//!
//! These scenarios invoke the binary and only exercise paths that finish
//! before any registry request is made.

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use std::process::{Command, Output};
use tempfile::TempDir;

struct CliWorld {
    args: RefCell<Vec<String>>,
    output: RefCell<Option<Output>>,
    // Keep the working directory alive for the lifetime of the scenario.
    work_dir: TempDir,
}

#[fixture]
fn cli_world() -> CliWorld {
    CliWorld {
        args: RefCell::default(),
        output: RefCell::default(),
        work_dir: TempDir::new().expect("failed to create temp dir"),
    }
}

/// Helper function to retrieve the command output from the CLI world.
fn get_output(cli_world: &CliWorld) -> std::cell::Ref<'_, Output> {
    let output = cli_world.output.borrow();
    std::cell::Ref::map(output, |opt| opt.as_ref().expect("output not set"))
}

#[given("the collector is invoked with source \"{source}\"")]
fn given_source(cli_world: &CliWorld, source: String) {
    cli_world
        .args
        .replace(vec!["--source".to_owned(), source, "--outdir".to_owned(), String::new()]);
}

#[given("the collector is invoked with \"{args}\"")]
fn given_args(cli_world: &CliWorld, args: String) {
    cli_world
        .args
        .replace(args.split_whitespace().map(str::to_owned).collect());
}

#[when("the collector CLI is run")]
fn when_collector_cli_run(cli_world: &CliWorld) {
    let args = cli_world.args.borrow();
    let output = Command::new(env!("CARGO_BIN_EXE_collect-csvs"))
        .args(args.iter())
        .current_dir(cli_world.work_dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run collect-csvs");
    cli_world.output.replace(Some(output));
}

#[then("the CLI exits with code {code}")]
fn then_cli_exits_with_code(cli_world: &CliWorld, code: i32) {
    let output = get_output(cli_world);
    assert_eq!(
        output.status.code(),
        Some(code),
        "stdout: {}, stderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[then("stderr mentions \"{text}\"")]
fn then_stderr_mentions(cli_world: &CliWorld, text: String) {
    let output = get_output(cli_world);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&text), "unexpected stderr: {stderr}");
}

#[then("stdout mentions \"{text}\"")]
fn then_stdout_mentions(cli_world: &CliWorld, text: String) {
    let output = get_output(cli_world);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&text), "unexpected stdout: {stdout}");
}

#[then("nothing is printed on stdout")]
fn then_stdout_is_empty(cli_world: &CliWorld) {
    let output = get_output(cli_world);
    assert!(
        output.stdout.is_empty(),
        "unexpected stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[scenario(path = "tests/features/cli.feature", name = "An unknown source is rejected")]
fn scenario_unknown_source(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(
    path = "tests/features/cli.feature",
    name = "Verbose and quiet cannot be combined"
)]
fn scenario_verbose_quiet_conflict(cli_world: CliWorld) {
    let _ = cli_world;
}

#[scenario(path = "tests/features/cli.feature", name = "Help describes the source option")]
fn scenario_help(cli_world: CliWorld) {
    let _ = cli_world;
}
