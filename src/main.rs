//! Evolutionary symbolic-regression solver for tabular data.
//!
//! Takes paths to two CSV files (input rows and expected results) plus the
//! ordered variable names, and searches for a closed-form formula reproducing
//! the expected column. Prints the hall of fame and the best candidates on
//! termination; optionally runs an interactive prompt beside the search.
//!

use symbolic_regression_solver::evaluation::FitnessKind;
use symbolic_regression_solver::load_inputs::load_numeric_csv;
use symbolic_regression_solver::repl;
use symbolic_regression_solver::solver::{ALMOST_PERFECT, Solver};

use clap::Parser;
use clap::builder::PossibleValuesParser;

use std::process;
use std::thread;
use std::time::Duration;

/// Structure to collect CLI arguments
#[derive(Parser)]
#[clap(
    version,
    about = "Evolutionary symbolic-regression solver for tabular data."
)]
struct Arguments {
    /// Path to a CSV file with input rows (one value per variable, in order).
    input_path: String,

    /// Path to a CSV file with the expected results (first column of each row).
    expected_path: String,

    /// Names of the formula variables, in column order.
    #[clap(required = true, num_args = 1..)]
    variables: Vec<String>,

    /// Fitness function used for scoring candidates.
    #[clap(long, default_value = "enhanced", value_parser = PossibleValuesParser::new(["basic", "enhanced", "ultra"]))]
    fitness: String,

    /// Shorthand for `--fitness ultra`.
    #[clap(long)]
    ultra: bool,

    /// Early-stop target fitness in (0, 1].
    #[clap(long, default_value_t = ALMOST_PERFECT)]
    target: f64,

    /// Time limit in seconds (0 = no limit).
    #[clap(long, default_value_t = 0)]
    time: u64,

    /// Number of worker threads (0 = all hardware threads but one).
    #[clap(long, default_value_t = 0)]
    threads: usize,

    /// Disable the interactive prompt (batch mode).
    #[clap(long)]
    no_cli: bool,
}

fn main() {
    let args = Arguments::parse();
    match run(args) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(message) => {
            eprintln!("Error: {message}");
            process::exit(1);
        }
    }
}

fn run(args: Arguments) -> Result<bool, String> {
    let input = load_numeric_csv(&args.input_path)?;
    let expected = load_numeric_csv(&args.expected_path)?;
    if input.len() != expected.len() {
        return Err("Both files need to have the same number of lines.".to_string());
    }
    if !(args.target > 0.0 && args.target <= 1.0) {
        return Err("--target must lie in (0, 1].".to_string());
    }

    let fitness = if args.ultra {
        FitnessKind::Ultra
    } else {
        match args.fitness.as_str() {
            "basic" => FitnessKind::Basic,
            "ultra" => FitnessKind::Ultra,
            // the value parser admits nothing else, this is just to be exhaustive
            _ => FitnessKind::Enhanced,
        }
    };
    let time_limit = (args.time > 0).then(|| Duration::from_secs(args.time));
    let variable_count = args.variables.len();

    let solver = Solver::new(
        args.variables,
        input,
        expected,
        fitness,
        args.target,
        args.threads,
        time_limit,
    );

    println!(
        "Starting solver with {variable_count} variable(s). Target: {}. Fitness: {}. Threads: {}.",
        args.target,
        fitness,
        solver.worker_count()
    );
    if let Some(limit) = time_limit {
        println!("Time limit: {}s.", limit.as_secs());
    }

    if args.no_cli {
        return Ok(solver.start());
    }

    let mut success = false;
    thread::scope(|scope| {
        let worker = scope.spawn(|| solver.start());
        repl::interact(&solver);
        success = worker.join().unwrap_or(false);
    });
    Ok(success)
}
