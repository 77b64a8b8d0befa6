//! Runs the `courier-sat` binary on the instances in `tests/instances`.
#![allow(
    dead_code,
    reason = "is used in integration tests but unable to find a way to silence these warnings"
)]

use std::fs::File;
use std::path::PathBuf;
use std::process::Command;
use std::process::ExitStatus;
use std::process::Stdio;
use std::time::Duration;

use wait_timeout::ChildExt;

#[derive(Debug)]
pub(crate) struct SolverOutput {
    pub(crate) status: ExitStatus,
    pub(crate) stdout: String,
}

pub(crate) fn instance_path(file_name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/tests/instances/{file_name}",
        env!("CARGO_MANIFEST_DIR")
    ))
}

/// Runs the solver on `instance_path`; `prefix` keeps the output files of concurrent runs on
/// the same instance apart.
pub(crate) fn run_solver(
    instance_path: PathBuf,
    args: impl IntoIterator<Item = String>,
    prefix: &str,
) -> SolverOutput {
    const TEST_TIMEOUT: Duration = Duration::from_secs(60);

    let solver = PathBuf::from(env!("CARGO_BIN_EXE_courier-sat"));

    let log_file_path = instance_path.with_extension(format!("{prefix}.log"));
    let err_file_path = instance_path.with_extension(format!("{prefix}.err"));

    let mut command = Command::new(solver);
    for arg in args {
        let _ = command.arg(arg);
    }

    let mut child = command
        .arg(&instance_path)
        .stdout(File::create(&log_file_path).expect("Failed to create log file."))
        .stderr(File::create(&err_file_path).expect("Failed to create error file."))
        .stdin(Stdio::null())
        .spawn()
        .expect("Failed to run solver.");

    let status = match child.wait_timeout(TEST_TIMEOUT) {
        Ok(None) => panic!("solver took more than {} seconds", TEST_TIMEOUT.as_secs()),
        Ok(Some(status)) => status,
        Err(e) => panic!("error starting solver: {e}"),
    };

    let stdout = std::fs::read_to_string(&log_file_path).expect("Failed to read log file.");

    std::fs::remove_file(log_file_path).expect("Failed to remove log file.");
    std::fs::remove_file(err_file_path).expect("Failed to remove error file.");

    SolverOutput { status, stdout }
}

/// The value on the objective line, if any.
pub(crate) fn reported_objective(stdout: &str) -> Option<u64> {
    let objective = regex::Regex::new(r"(?m)^o (\d+)$").expect("valid regex");
    objective
        .captures(stdout)
        .map(|captures| captures[1].parse().expect("objective is a number"))
}

/// The delivered items per courier, in the order the couriers are printed.
pub(crate) fn reported_routes(stdout: &str) -> Vec<Vec<usize>> {
    let route = regex::Regex::new(r"(?m)^v(( \d+)*)$").expect("valid regex");
    route
        .captures_iter(stdout)
        .map(|captures| {
            captures[1]
                .split_whitespace()
                .map(|item| item.parse().expect("item is a number"))
                .collect()
        })
        .collect()
}
