mod instance_reader;
mod os_signal_termination;
mod result;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use courier_sat::asserts::SAT_ASSERT_LEVEL_DEFINITION;
use courier_sat::asserts::SAT_ASSERT_MODERATE;
use courier_sat::basic_types::Stopwatch;
use courier_sat::context::CdclContext;
use courier_sat::context::SolverContext;
use courier_sat::context::SolverOption;
use courier_sat::engine::SatSolverOptions;
use courier_sat::optimisation::OptimisationReport;
use courier_sat::optimisation::OptimisationResult;
use courier_sat::optimisation::OptimisationSolver;
use courier_sat::optimisation::OptimisationStrategy;
use courier_sat::routing::RoutingModelBuilder;
use courier_sat::routing::RoutingSolution;
use itertools::Itertools;
use log::error;
use log::info;
use log::warn;
use log::LevelFilter;
use os_signal_termination::OsSignal;
use result::CourierError;
use result::CourierResult;

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
    /// The routing instance to solve, in the `.dat` format: the number of couriers, the number
    /// of items, the capacities, the item sizes and the distance matrix with the origin last.
    instance_path: PathBuf,

    /// The time budget for the whole run in seconds.
    #[arg(short = 't', long = "time-limit", default_value_t = 300)]
    time_limit: u64,

    /// The way the bound on the longest tour is tightened.
    #[arg(short = 's', long = "strategy", value_enum, default_value_t)]
    strategy: OptimisationStrategy,

    /// The seed for the tie-breaking of the variable selection.
    #[arg(short = 'r', long = "random-seed", default_value_t = 42)]
    random_seed: u64,

    /// A hint for the number of threads the solver context may use. The built-in engine is
    /// sequential and ignores values above one.
    #[arg(long = "threads")]
    threads: Option<usize>,

    /// Enables log message output from the solver.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn configure_logging(verbose: bool) {
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "c ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
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

fn run() -> CourierResult<()> {
    let process_time = Stopwatch::starting_now();
    let args = Args::parse();

    configure_logging(args.verbose);

    if SAT_ASSERT_LEVEL_DEFINITION >= SAT_ASSERT_MODERATE {
        warn!(
            "Potential performance degradation: the assert level is set to {SAT_ASSERT_LEVEL_DEFINITION}, meaning many debug asserts are active which may result in performance degradation."
        );
    }

    match args.instance_path.extension().and_then(|ext| ext.to_str()) {
        Some("dat") => {}
        _ => return Err(CourierError::invalid_instance(args.instance_path.display())),
    }

    let instance = instance_reader::read_instance(&args.instance_path)?;
    info!(
        "Read an instance with {} couriers and {} items",
        instance.num_couriers(),
        instance.num_items()
    );

    let options = SatSolverOptions {
        random_seed: args.random_seed,
        ..Default::default()
    };
    let mut context = CdclContext::new(options).with_interrupt(OsSignal::install()?);
    if let Some(threads) = args.threads {
        context.set_option(SolverOption::Threads(threads));
    }

    let model = RoutingModelBuilder::new(&instance, &mut context).build();

    let report = OptimisationSolver::new(
        &mut context,
        &model,
        &instance,
        Duration::from_secs(args.time_limit),
        process_time,
    )
    .solve(args.strategy)?;

    print_report(&report);

    Ok(())
}

fn print_report(report: &OptimisationReport) {
    match &report.result {
        OptimisationResult::Optimal { solution } => {
            println!("s OPTIMUM FOUND");
            print_solution(solution);
        }
        OptimisationResult::Satisfiable { best_solution } => {
            println!("s SATISFIABLE");
            print_solution(best_solution);
        }
        OptimisationResult::Infeasible => println!("s UNSATISFIABLE"),
        OptimisationResult::Unknown => println!("s UNKNOWN"),
    }

    println!("c time {}", report.time.as_secs_f64());
    println!("c checks {}", report.num_checks);
}

fn print_solution(solution: &RoutingSolution) {
    println!("o {}", solution.objective());

    for route in solution.routes() {
        println!("v {}", route.delivered_items().iter().join(" "));
    }
}
