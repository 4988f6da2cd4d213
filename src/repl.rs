//! The interactive command prompt running beside the solver thread.

use crate::solver::{Solver, SolverState};

use std::io::{self, BufRead, Write};
use std::process;
use std::thread;
use std::time::Duration;

/// Read and execute commands until the solver finishes or the user exits.
///
/// Supported commands: `exit`, `help`, `shrink`, `print`, `stop`. On end of
/// input the prompt just waits for the solver to finish.
pub fn interact(solver: &Solver) {
    let stdin = io::stdin();
    while solver.state() != SolverState::Done {
        print!("Solver > ");
        io::stdout().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => {
                // no more input; idle until the workers are done
                while solver.state() != SolverState::Done {
                    thread::sleep(Duration::from_millis(333));
                }
                return;
            }
            Ok(_) => {}
        }

        match line.trim() {
            "" => {}
            "exit" => {
                process::exit(if solver.state() == SolverState::Done { 0 } else { 1 });
            }
            "help" => {
                println!(
                    "You can use the following commands:\n\
                     \texit\tTerminates the solver\n\
                     \thelp\tPrints this output\n\
                     \tshrink\tCleans the solutions cache\n\
                     \tprint\tPrints the best solutions\n\
                     \tstop\tRequests early stop and prints results"
                );
            }
            "shrink" => solver.shrink(),
            "print" => solver.print(),
            "stop" => solver.request_stop(),
            other => {
                println!("{other} is not a supported command. Type help for a list of commands.");
            }
        }
    }
}
