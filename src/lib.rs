pub mod units;
pub mod geo_3d;
pub mod io;
pub mod validation;
pub mod physics;
pub mod material;
pub mod boundary;
pub mod analysis;
pub mod case;
pub mod solver;
pub mod args;
pub mod example;
mod crate_errors;

use std::path::{Path, PathBuf};
use itertools::Itertools;

use args::CfdCommand;
use boundary::{BoundaryCategory, BoundarySubtype};

pub use crate_errors::{
    CfdError,
    CfdResult,
    err_str,
};

/// Run the command parsed from the command line.
/// Returns the process exit code on success.
pub fn handle_cli_args(cli_args: args::CfdCli) -> CfdResult<i32> {
    let quiet = cli_args.quiet;
    match cli_args.command {
        CfdCommand::Write(write_args) => {
            write_command(&write_args, quiet)?;
            Ok(0)
        },
        CfdCommand::Validate(validate_args) => {
            validate_command(&validate_args.analysis, quiet)?;
            Ok(0)
        },
        CfdCommand::Run(run_args) => {
            let options = supervisor_options(&run_args.supervision)?;
            let summary = write_command(&run_args.write_args, quiet)?;
            let run = solver::run_case(summary.application, &summary.case_dir, options, quiet)?;
            if run.timed_out {
                eprintln!("{} was interrupted by the timeout at t = {}", summary.application, run.time);
            }
            if !quiet && !run.residuals.is_empty() {
                println!("Final initial residuals:");
                for (field, residual) in run.residuals.iter() {
                    println!("  {:<10} {:e}", field, residual);
                }
            }
            Ok(run.code)
        },
        CfdCommand::Supervise(supervise_args) => {
            let options = supervisor_options(&supervise_args.supervision)?;
            let (program, program_args) = match supervise_args.command.split_first() {
                Some(split) => split,
                None => return Err(args::ArgError::StringOnly("No program to supervise".to_string()).into()),
            };
            let outcome = solver::supervise(program, program_args, options)?;
            Ok(outcome.code)
        },
        CfdCommand::Schema(schema_args) => {
            print_schema(schema_args)?;
            Ok(0)
        },
        CfdCommand::Example(example_args) => {
            example::display_config(example_args)?;
            Ok(0)
        },
    }
}

fn supervisor_options(supervision: &args::SupervisionArgs) -> CfdResult<solver::SupervisorOptions> {
    Ok(solver::SupervisorOptions{
        exit_keys: supervision.exit_keys,
        timeout: supervision.timeout()?,
    })
}

/// Load an analysis config and the faces it refers to.
pub fn load<P: AsRef<Path>>(path: P, quiet: bool) -> CfdResult<(analysis::Analysis, geo_3d::Geometry)> {
    if !quiet {
        println!("Loading analysis config file: {}...", path.as_ref().display());
    }
    let analysis = analysis::load_analysis(&path)?;
    let geometry = analysis.load_geometry()?;
    Ok((analysis, geometry))
}

/// Write the case directory of an analysis config.
pub fn write_command(write_args: &args::WriteArgs, quiet: bool) -> CfdResult<case::CaseSummary> {
    let (analysis, geometry) = load(&write_args.analysis, quiet)?;
    let case_dir = match &write_args.case_dir {
        Some(case_dir) => PathBuf::from(case_dir),
        None => analysis.resolve_path(&analysis.name),
    };
    Ok(case::write_case(&analysis, &geometry, case_dir, quiet)?)
}

/// Check an analysis config, rendering every case file without writing any.
pub fn validate_command<P: AsRef<Path>>(path: P, quiet: bool) -> CfdResult<()> {
    let (analysis, geometry) = load(&path, quiet)?;
    let (application, files) = case::render_case(&analysis, &geometry)?;
    if !quiet {
        println!("Analysis \"{}\" is valid: {} case files for {}", analysis.name, files.len(), application);
    }
    Ok(())
}

/// Print the inputs of boundary subtypes, or the turbulence inlet modes of a model.
pub fn print_schema(schema_args: args::SchemaArgs) -> CfdResult<()> {
    if let Some(model) = schema_args.turbulence {
        println!("Turbulence inlet modes of {} (the first is the default):", model);
        for mode in boundary::get_turbulence_inlet_spec(model).modes.iter() {
            println!("  {} [{}]: {}", mode.name, mode.key, mode.help);
            println!("    sets: {}", mode.quantities.iter().join(", "));
        }
        return Ok(());
    }

    let category = match schema_args.category {
        Some(category) => category,
        None => panic!("BUG: Schema without a category or turbulence model! Should've been checked!"),
    };
    let subtypes = match schema_args.subtype {
        Some(subtype) if subtype.category() != category => {
            return err_str(&format!("Subtype {} is not part of category {}. Subtypes: {}",
                subtype, category, category.subtypes().iter().join(", ")));
        },
        Some(subtype) => vec![subtype],
        None => category.subtypes(),
    };
    println!("{} boundaries:", category.label());
    for subtype in subtypes {
        print_subtype(category, subtype);
    }
    Ok(())
}

fn print_subtype(category: BoundaryCategory, subtype: BoundarySubtype) {
    let spec = boundary::get_boundary_ui_spec(category, subtype);
    println!();
    println!("{} ({}): {}", subtype.label(), subtype, subtype.help());
    for input in spec.fields.iter() {
        println!("  {:<20} {} [default {}]", input.name(), input.help(), input.default_value());
    }
    if spec.reverse_default {
        println!("  Derived flow direction points into the domain");
    }
    let mut panels = Vec::new();
    if spec.turbulence_panel {
        panels.push("turbulence".to_string());
    }
    if spec.volume_fraction_panel {
        panels.push("volume fraction".to_string());
    }
    if spec.thermal_panel {
        panels.push(format!("thermal ({})", spec.thermal_types.iter().join(", ")));
    }
    if !panels.is_empty() {
        println!("  Also takes: {}", panels.join("; "));
    }
}
