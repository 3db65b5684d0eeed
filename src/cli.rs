//! Command-line interface built on clap.
//!
//! [`Cli`] carries the global flags (`--config`, `--verbose`) and a
//! [`Command`]: `run` for a user-supplied batch, `demo` for the built-in
//! example.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Shortest-Job-First scheduling metrics with a concurrent execution replay.
#[derive(Debug, Parser)]
#[command(name = "sjf", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML config file (defaults to ./sjf.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Schedule a batch of processes, prompting for burst times unless given.
    Run(RunArgs),

    /// Schedule the built-in example bursts 6, 8, 7, 3 and replay them.
    Demo(SimulationArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Comma-separated burst times, e.g. `6,8,7,3`. Skips the prompts.
    #[arg(long)]
    pub bursts: Option<String>,

    /// Run the simulation without asking.
    #[arg(long, conflicts_with = "no_simulate")]
    pub simulate: bool,

    /// Skip the simulation without asking.
    #[arg(long)]
    pub no_simulate: bool,

    /// Print the run as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub simulation: SimulationArgs,
}

impl RunArgs {
    /// Flag-level simulation choice; `None` defers to config or a prompt.
    pub fn simulate_choice(&self) -> Option<bool> {
        if self.simulate {
            Some(true)
        } else if self.no_simulate {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct SimulationArgs {
    /// Simulated seconds per burst unit.
    #[arg(long)]
    pub speed: Option<f64>,

    /// Maximum number of simulation workers that may be launched.
    #[arg(long)]
    pub max_workers: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_run_with_bursts() {
        let cli = Cli::parse_from(["sjf", "run", "--bursts", "6,8,7,3", "--no-simulate"]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.bursts.as_deref(), Some("6,8,7,3"));
                assert_eq!(args.simulate_choice(), Some(false));
                assert!(!args.json);
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_parses_global_flags() {
        let cli = Cli::parse_from(["sjf", "--config", "custom.toml", "--verbose", "demo", "--speed", "0.05"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Command::Demo(args) => assert_eq!(args.speed, Some(0.05)),
            _ => panic!("expected Demo command"),
        }
    }

    #[test]
    fn simulate_flags_conflict() {
        let result = Cli::try_parse_from(["sjf", "run", "--simulate", "--no-simulate"]);
        assert!(result.is_err());
    }

    #[test]
    fn simulate_choice_defaults_to_undecided() {
        let cli = Cli::parse_from(["sjf", "run", "--max-workers", "4"]);
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.simulate_choice(), None);
                assert_eq!(args.simulation.max_workers, Some(4));
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn cli_verify() {
        Cli::command().debug_assert();
    }
}
