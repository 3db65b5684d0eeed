use std::process::ExitCode;

use clap::Parser;
use sjf_sched::app;
use sjf_sched::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start async runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(app::run(cli));
    // A prompt may still be blocked on stdin after Ctrl-C; don't wait for it.
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if app::is_interrupt(&err) => {
            println!("\n\nProgram interrupted by user. Exiting gracefully...");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
