//! gantt - order and chart Gantt task files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = gantt_order::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
