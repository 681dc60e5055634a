use clap::Parser;
use epi_progression::{
    demo::run_demo,
    error::ProgressionError,
    outcomes::OutcomeTally,
    parameters::{load_params, Params, RunType},
    pathogen::Pathogen,
    profiling::{print_profiling_data, write_profiling_data},
    random::stream_rng,
    reports::{self, output_path, PathogenReport},
    sweep::{run_sweep, SweepConfig},
    trial::{print_trial_header, run_trial},
};
use log::{error, info};
use std::{fs, path::PathBuf};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// path to the input file
    #[arg(short, long)]
    input_file: PathBuf,

    /// path to the output directory
    #[arg(short, long)]
    output_directory: PathBuf,
}

fn initialize(args: &Args) -> Result<Params, ProgressionError> {
    let parameters = load_params(&args.input_file)?;
    fs::create_dir_all(&args.output_directory)?;
    // make it easy for the user to see what the parameters are
    info!("{parameters:?}");
    Ok(parameters)
}

/// Runs the configured driver. Returns the outcome totals for trials and
/// sweeps; a demo follows a single course and has none.
fn run(args: &Args) -> Result<Option<OutcomeTally>, ProgressionError> {
    let parameters = initialize(args)?;
    let mut reports = reports::init(&parameters, &args.output_directory)?;

    let tally = match parameters.run {
        RunType::Demo {
            pathogen_code,
            fragility,
        } => {
            let mut rng = stream_rng(parameters.seed, "demo", 0);
            run_demo(
                pathogen_code,
                fragility,
                parameters.max_days,
                &mut rng,
                reports.course.as_mut(),
            )?;
            None
        }
        RunType::Trial {
            population,
            pathogen_code,
            fragility,
        } => {
            let mut rng = stream_rng(parameters.seed, "trial", 0);
            let pathogen = match pathogen_code {
                Some(code) => Pathogen::new(code)?,
                None => Pathogen::random(&mut rng),
            };
            print_trial_header(&pathogen, population);
            let tally = run_trial(
                &pathogen,
                population,
                fragility,
                parameters.max_days,
                &mut rng,
            )?;
            if let Some(report) = reports.pathogen.as_mut() {
                report.send_report(&PathogenReport::new(&pathogen, &tally))?;
            }
            Some(tally)
        }
        RunType::Sweep {
            first_code,
            end_code,
            individuals_per_pathogen,
            fragility,
        } => {
            let config = SweepConfig {
                seed: parameters.seed,
                first_code,
                end_code,
                individuals_per_pathogen,
                fragility,
                max_days: parameters.max_days,
            };
            Some(run_sweep(&config, reports.pathogen.as_mut())?)
        }
    };
    reports.finish()?;

    if let Some(tally) = &tally {
        tally.print_summary();
    }
    print_profiling_data();
    write_profiling_file(&parameters, args);
    Ok(tally)
}

/// Profiling output is best effort: problems are logged, never fatal.
fn write_profiling_file(parameters: &Params, args: &Args) {
    let Some(name) = &parameters.profiling_data_path else {
        return;
    };
    let path = output_path(&args.output_directory, &parameters.report_options, name);
    if !parameters.report_options.overwrite && path.exists() {
        error!("profiling output file already exists: {}", path.display());
        return;
    }
    match write_profiling_data(&path) {
        Ok(()) => info!("Wrote profiling data to {}", path.display()),
        Err(e) => error!("could not write profiling data to {}: {e}", path.display()),
    }
}

fn main() -> Result<(), ProgressionError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    run(&args)?;
    Ok(())
}
