mod proc_errors;

use std::time::Duration;
use clap::{
    Args,
    Parser,
    Subcommand,
    ValueEnum,
};

use crate::boundary::{BoundaryCategory, BoundarySubtype};
use crate::physics::TurbulenceModel;

pub use proc_errors::{
    ArgError,
    ProcResult,
    err_str,
};

/// CFD case pre-processor: validate analyses, write solver case directories, run and supervise the solver.
#[derive(Debug, Parser)]
#[command(name = "cfdcase", version)]
pub struct CfdCli {
    #[arg(short, long, global = true)]
    /// Suppress progress output.
    pub quiet: bool,

    #[clap(subcommand)]
    pub command: CfdCommand,
}

/// Parser for the subcommands of the cfdcase binary using clap.
#[derive(Debug, Subcommand)]
pub enum CfdCommand {
    #[command(name = "write")]
    /// Validate an analysis and write its case directory.
    Write(WriteArgs),

    #[command(name = "validate")]
    /// Validate an analysis and report every problem found.
    Validate(ValidateArgs),

    #[command(name = "run")]
    /// Write the case directory, then run the solver on it.
    Run(RunArgs),

    #[command(name = "supervise")]
    /// Run a program, relaying its output; a "terminate" line on stdin interrupts it.
    Supervise(SuperviseArgs),

    #[command(name = "schema")]
    /// Print the inputs of a boundary subtype or the turbulence inlet modes of a model.
    Schema(SchemaArgs),

    #[command(name = "example")]
    /// Print an example analysis config.
    Example(ExampleArgs),
}

/// Config file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Yaml,
    Json,
    Toml,
}

/// Compiled arguments for the write command.
#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Path to the analysis config file (.yaml/.yml, .json or .toml).
    pub analysis: String,

    #[arg(short, long = "output")]
    /// Case directory to write. Defaults to the analysis name, next to the config file.
    pub case_dir: Option<String>,
}

/// Compiled arguments for the validate command.
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the analysis config file (.yaml/.yml, .json or .toml).
    pub analysis: String,
}

/// Process supervision arguments, shared by run and supervise.
#[derive(Debug, Args)]
pub struct SupervisionArgs {
    #[arg(long)]
    /// Interrupt the process after this many seconds.
    pub timeout: Option<f64>,

    #[arg(long)]
    /// Also type "exit" into the process's stdin on termination.
    pub exit_keys: bool,
}
impl SupervisionArgs {
    /// Timeout as a duration; must be positive if given.
    pub fn timeout(&self) -> ProcResult<Option<Duration>> {
        match self.timeout {
            None => Ok(None),
            Some(seconds) if seconds > 0.0 => match Duration::try_from_secs_f64(seconds) {
                Ok(timeout) => Ok(Some(timeout)),
                Err(error) => err_str(&format!("Timeout of {} seconds is out of range: {}", seconds, error)),
            },
            Some(seconds) => err_str(&format!("Timeout must be a positive number of seconds, got {}", seconds)),
        }
    }
}

/// Compiled arguments for the run command.
#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub write_args: WriteArgs,

    #[command(flatten)]
    pub supervision: SupervisionArgs,
}

/// Compiled arguments for the supervise command.
#[derive(Debug, Args)]
pub struct SuperviseArgs {
    #[command(flatten)]
    pub supervision: SupervisionArgs,

    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    /// Program to run, followed by its arguments.
    pub command: Vec<String>,
}

/// Compiled arguments for the schema command.
#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[arg(required_unless_present = "turbulence")]
    /// Boundary category (wall, inlet, outlet, open, constraint, baffle).
    pub category: Option<BoundaryCategory>,

    /// Boundary subtype. All subtypes of the category if left out.
    pub subtype: Option<BoundarySubtype>,

    #[arg(short, long, conflicts_with_all = ["category", "subtype"])]
    /// Turbulence model to list the inlet modes of, e.g. kOmegaSST.
    pub turbulence: Option<TurbulenceModel>,
}

/// Compiled arguments for the example command.
#[derive(Debug, Args)]
pub struct ExampleArgs {
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    /// Config format to print.
    pub format: Format,
}

/// Parse the command line arguments for the cfdcase binary.
pub fn parse_cli_args() -> CfdCli {
    CfdCli::parse()
}

/// Parse arguments from an iterator, reporting errors instead of exiting.
pub fn parse_cli_args_from<I, T>(args: I) -> ProcResult<CfdCli>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Ok(CfdCli::try_parse_from(args)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supervised_command_verbatim() {
        let cli = parse_cli_args_from(["cfdcase", "supervise", "--timeout", "5", "--", "solver", "-case", "duct"]).unwrap();
        match cli.command {
            CfdCommand::Supervise(args) => {
                assert_eq!(args.command, vec!["solver", "-case", "duct"]);
                assert_eq!(args.supervision.timeout().unwrap(), Some(Duration::from_secs(5)));
                assert!(!args.supervision.exit_keys);
            },
            other => panic!("expected supervise, got {:?}", other),
        }
    }

    #[test]
    fn parses_schema_keys() {
        let cli = parse_cli_args_from(["cfdcase", "-q", "schema", "inlet", "massFlowRateInlet"]).unwrap();
        assert!(cli.quiet);
        match cli.command {
            CfdCommand::Schema(args) => {
                assert_eq!(args.category, Some(BoundaryCategory::Inlet));
                assert_eq!(args.subtype, Some(BoundarySubtype::MassFlowRateInlet));
            },
            other => panic!("expected schema, got {:?}", other),
        }
        let cli = parse_cli_args_from(["cfdcase", "schema", "--turbulence", "kOmegaSST"]).unwrap();
        assert!(matches!(cli.command, CfdCommand::Schema(SchemaArgs{turbulence: Some(TurbulenceModel::KOmegaSst), ..})));
        assert!(matches!(parse_cli_args_from(["cfdcase", "schema", "roof"]), Err(ArgError::ClapError(_))));
    }

    #[test]
    fn rejects_non_positive_timeout() {
        let supervision = SupervisionArgs{timeout: Some(0.0), exit_keys: false};
        assert!(supervision.timeout().is_err());
    }

    #[test]
    fn rejects_out_of_range_timeout() {
        for seconds in [1e30, f64::INFINITY, f64::NAN] {
            let supervision = SupervisionArgs{timeout: Some(seconds), exit_keys: false};
            assert!(supervision.timeout().is_err(), "{}", seconds);
        }
        let supervision = SupervisionArgs{timeout: Some(2.5), exit_keys: false};
        assert_eq!(supervision.timeout().unwrap(), Some(Duration::from_millis(2500)));
    }
}
