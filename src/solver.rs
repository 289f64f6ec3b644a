//! External solver launch and supervision.

mod proc_errors;
mod supervisor;
mod residuals;

use std::collections::BTreeMap;
use std::io::BufReader;
use std::path::Path;
use std::process::Command;

use crate::physics::SolverApplication;

pub use proc_errors::{
    SolverError,
    ProcResult,
    err_str,
};
pub use supervisor::{
    Supervisor,
    SupervisorOptions,
    StreamLine,
    Outcome,
    TERMINATE,
    interrupt,
};
pub use residuals::{
    ResidualSample,
    ResidualMonitor,
};

/// How a solver run finished.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub code: i32,
    /// Simulated time reached.
    pub time: f64,
    /// Latest initial residual per field.
    pub residuals: BTreeMap<String, f64>,
    pub timed_out: bool,
}

/// Run `<program> <args..>` under the supervisor, relaying its output.
/// The supervisor's own stdin is watched for `terminate`.
pub fn supervise(program: &str, args: &[String], options: SupervisorOptions) -> ProcResult<Outcome> {
    let supervisor = Supervisor::spawn(Command::new(program).args(args), options)?;
    supervisor.run(BufReader::new(std::io::stdin()), |line| match line {
        StreamLine::Stdout(text) => println!("{}", text),
        StreamLine::Stderr(text) => eprintln!("{}", text),
    })
}

/// Run the solver application on a written case directory.
/// Solver output is relayed unless `quiet`, in which case only residuals are shown.
pub fn run_case<P: AsRef<Path>>(application: SolverApplication, case_dir: P, options: SupervisorOptions, quiet: bool) -> ProcResult<RunSummary> {
    let case_dir = case_dir.as_ref();
    if !case_dir.join("system").join("controlDict").is_file() {
        return err_str(&format!("{} is not a case directory (system/controlDict missing)", case_dir.display()));
    }
    let program = application.to_string();
    let mut command = Command::new(&program);
    command.arg("-case").arg(case_dir);
    if !quiet {
        println!("Running {} on {}...", program, case_dir.display());
    }

    let supervisor = Supervisor::spawn(&mut command, options)?;
    let mut monitor = ResidualMonitor::new();
    let outcome = supervisor.run(BufReader::new(std::io::stdin()), |line| match line {
        StreamLine::Stdout(text) => {
            let sample = monitor.feed(text);
            if !quiet {
                println!("{}", text);
            } else if let Some(sample) = sample {
                println!("t = {}: {} residual {:e}", sample.time, sample.field, sample.initial_residual);
            }
        },
        StreamLine::Stderr(text) => eprintln!("{}", text),
    })?;

    if outcome.code != 0 {
        return Err(SolverError::ExitStatus{code: outcome.code, stderr: outcome.stderr_tail.join("\n")});
    }
    if !quiet {
        println!("{} finished at t = {}", program, monitor.time());
    }
    Ok(RunSummary{
        code: outcome.code,
        time: monitor.time(),
        residuals: monitor.latest(),
        timed_out: outcome.timed_out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_case_needs_a_case_directory() {
        let dir = std::env::temp_dir().join(format!("cfdcase_not_a_case_{}", std::process::id()));
        let error = run_case(SolverApplication::SimpleFoam, &dir, SupervisorOptions::default(), true).unwrap_err();
        assert!(matches!(error, SolverError::StringOnly(message) if message.contains("controlDict")));
    }
}
