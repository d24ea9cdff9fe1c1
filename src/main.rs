//! gwf-graph - Render the dependency graph of a workflow

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = gwf_graph::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
