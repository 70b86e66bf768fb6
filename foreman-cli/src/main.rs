mod instance;
mod result;

use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use foreman_lib::dataset::Dataset;
use foreman_lib::engine::Solver;
use foreman_lib::engine::SolverOptions;
use foreman_lib::formulation::formulate;
use foreman_lib::formulation::FormulationOptions;
use foreman_lib::results::SolveResult;
use foreman_lib::statistics::configure_statistic_logging;
use log::error;
use log::info;
use log::LevelFilter;
use result::ForemanResult;

use crate::instance::parse_instance;

const MSG_INFEASIBLE: &str = "=====INFEASIBLE=====";
const MSG_UNKNOWN: &str = "=====UNKNOWN=====";

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The instance to solve, given in the line-oriented table format:
    /// a 'counts' header followed by one named section per table.
    #[clap(verbatim_doc_comment)]
    instance_path: PathBuf,

    /// The time budget for the solver, given in seconds. Defaults to 200 seconds.
    ///
    /// Possible values: u64 (Optional)
    #[arg(short = 't', long = "time-limit", verbatim_doc_comment)]
    time_limit: Option<u64>,

    /// The number of threads the backend may use. Defaults to the available parallelism.
    ///
    /// Possible values: usize (Optional)
    #[arg(long = "threads", verbatim_doc_comment)]
    threads: Option<usize>,

    /// Restricts every worker to at most one assignment per 3-shift day.
    ///
    /// Possible values: bool
    #[arg(long = "one-assignment-per-day", verbatim_doc_comment)]
    one_assignment_per_day: bool,

    /// Enforces the per-line productivity floors of the instance as hard constraints.
    ///
    /// Possible values: bool
    #[arg(long = "enforce-productivity-floors", verbatim_doc_comment)]
    enforce_productivity_floors: bool,

    /// Enables log message output from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", verbatim_doc_comment)]
    log_statistics: bool,
}

fn configure_logging(verbose: bool, log_statistics: bool) -> std::io::Result<()> {
    if log_statistics {
        configure_statistic_logging("%%%stat:", Some("%%%stat-end"), None);
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> ForemanResult<()> {
    let args = Args::parse();

    configure_logging(args.verbose, args.log_statistics)?;

    let file = File::open(&args.instance_path)?;
    let tables = parse_instance(BufReader::new(file))?;
    let dataset = Dataset::populate(tables)?;

    let formulation_options = FormulationOptions {
        one_assignment_per_worker_per_day: args.one_assignment_per_day,
        enforce_minimum_line_productivity: args.enforce_productivity_floors,
    };
    let formulated = formulate(&dataset, formulation_options)?;

    let mut solver_options = SolverOptions::default();
    if let Some(seconds) = args.time_limit {
        solver_options.time_limit = Some(Duration::from_secs(seconds));
    }
    if let Some(threads) = args.threads {
        solver_options.parallelism_hint = threads;
    }

    let mut solver = Solver::with_options(solver_options);
    let result = solver.solve(formulated.model());

    match result {
        SolveResult::Optimal(solution) => {
            let schedule = formulated.extract_schedule(&solution);
            print!("{schedule}");
            println!(
                "objective = {}",
                solution.get_integer_value(formulated.objective_variable())
            );
            println!("==========");
        }
        SolveResult::Feasible(solution) => {
            let schedule = formulated.extract_schedule(&solution);
            print!("{schedule}");
            println!(
                "objective = {}",
                solution.get_integer_value(formulated.objective_variable())
            );
        }
        SolveResult::Infeasible => println!("{MSG_INFEASIBLE}"),
        SolveResult::Timeout => {
            info!("The time budget was exhausted before any solution was found");
            println!("{MSG_UNKNOWN}");
        }
        SolveResult::Unknown => println!("{MSG_UNKNOWN}"),
    }

    Ok(())
}
