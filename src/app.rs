use std::future::Future;

use anyhow::{Context, Result};

use crate::cli::{Cli, Command, RunArgs, SimulationArgs};
use crate::config::SjfConfig;
use crate::error::{InputError, SchedulerError};
use crate::input::{BurstList, ProcessSource, PromptSource};
use crate::logging;
use crate::report::RunReport;
use crate::scheduler::{Job, calculate, summarize};
use crate::simulator::ExecutionSimulator;
use crate::ui::{self, SimulationProgress};

const DEMO_BURSTS: [u64; 4] = [6, 8, 7, 3];

/// Entry point for a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = SjfConfig::load(cli.config.as_deref())?;
    logging::init_tracing(cli.verbose, &config.log_level);
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Command::Run(args) => run_batch(args, &config).await,
        Command::Demo(args) => run_demo(args, &config).await,
    }
}

async fn run_batch(args: RunArgs, config: &SjfConfig) -> Result<()> {
    let choice = args.simulate_choice().or(config.simulate);
    // Reject a bad speed before asking for any input, unless the run will
    // never simulate.
    let simulator = simulator_for(choice, &args.simulation, config)?;

    let jobs = match &args.bursts {
        Some(list) => BurstList::parse(list)?
            .read_jobs()
            .context("failed to read burst list")?,
        None => read_interactively().await?,
    };

    let report = compute(&jobs)?;
    if !args.json {
        ui::print_results(&report.jobs, &report.summary)?;
    }

    let simulate = match choice {
        Some(choice) => choice,
        None if args.json => false,
        None => confirm_interactively("Run concurrent execution simulation?").await?,
    };

    let report = match simulator {
        Some(simulator) if simulate => {
            replay(report, &simulator, !args.json, shutdown_signal()).await?
        }
        _ => report,
    };

    if args.json {
        println!("{}", ui::render_json(&report)?);
    }
    Ok(())
}

async fn run_demo(args: SimulationArgs, config: &SjfConfig) -> Result<()> {
    let simulator = build_simulator(&args, config)?;
    let report = compute(&Job::from_bursts(&DEMO_BURSTS))?;
    ui::print_results(&report.jobs, &report.summary)?;
    replay(report, &simulator, true, shutdown_signal()).await?;
    Ok(())
}

/// Builds the simulator from CLI overrides on top of the configuration.
pub fn build_simulator(
    args: &SimulationArgs,
    config: &SjfConfig,
) -> Result<ExecutionSimulator, SchedulerError> {
    let speed = args.speed.unwrap_or(config.speed);
    let max_workers = args.max_workers.unwrap_or(config.max_workers);
    Ok(ExecutionSimulator::from_secs_f64(speed)?.with_max_workers(max_workers))
}

/// The simulator for a run, or `None` when the simulation is already
/// declined and its settings don't matter.
pub fn simulator_for(
    choice: Option<bool>,
    args: &SimulationArgs,
    config: &SjfConfig,
) -> Result<Option<ExecutionSimulator>, SchedulerError> {
    match choice {
        Some(false) => Ok(None),
        _ => build_simulator(args, config).map(Some),
    }
}

/// Computes the schedule and its summary.
pub fn compute(jobs: &[Job]) -> Result<RunReport, SchedulerError> {
    let scheduled = calculate(jobs)?;
    let summary = summarize(&scheduled)?;
    tracing::info!(
        count = summary.count,
        average_waiting = summary.average_waiting,
        average_turnaround = summary.average_turnaround,
        "schedule computed"
    );
    Ok(RunReport::new(scheduled, summary))
}

/// Replays the computed schedule and attaches the outcome to the report.
pub async fn replay<F>(
    report: RunReport,
    simulator: &ExecutionSimulator,
    show_progress: bool,
    shutdown: F,
) -> Result<RunReport, SchedulerError>
where
    F: Future<Output = ()>,
{
    let progress = show_progress.then(|| SimulationProgress::start(report.jobs.len()));

    let result = simulator
        .run_until(
            &report.jobs,
            |event| {
                tracing::trace!(?event, "simulation event");
                if let Some(progress) = &progress {
                    progress.on_event(event);
                }
            },
            shutdown,
        )
        .await;

    match result {
        Ok(outcome) => {
            if let Some(progress) = &progress {
                progress.complete(&outcome.completion_order);
            }
            Ok(report.with_simulation(outcome))
        }
        Err(err) => {
            if let Some(progress) = &progress {
                let completed = match &err {
                    SchedulerError::SimulationLaunch { completed, .. }
                    | SchedulerError::Interrupted { completed } => *completed,
                    _ => 0,
                };
                progress.abandon(completed);
            }
            Err(err)
        }
    }
}

/// Resolves on Ctrl-C. If the handler cannot be installed it never resolves,
/// leaving the default signal behavior in place.
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(%err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn read_interactively() -> Result<Vec<Job>> {
    with_interrupt(|| {
        let stdin = std::io::stdin();
        PromptSource::new(stdin.lock(), std::io::stdout()).read_jobs()
    })
    .await
}

async fn confirm_interactively(prompt: &'static str) -> Result<bool> {
    with_interrupt(move || {
        let stdin = std::io::stdin();
        PromptSource::new(stdin.lock(), std::io::stdout()).confirm(prompt)
    })
    .await
}

/// Runs a blocking stdin interaction, treating Ctrl-C or end of input as an
/// interrupt.
async fn with_interrupt<T, F>(interaction: F) -> Result<T>
where
    F: FnOnce() -> Result<T, InputError> + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(interaction);
    tokio::select! {
        joined = task => match joined.context("input task failed")? {
            Ok(value) => Ok(value),
            Err(InputError::Eof) => Err(SchedulerError::Interrupted { completed: 0 }.into()),
            Err(err) => Err(err).context("failed to read input"),
        },
        _ = shutdown_signal() => Err(SchedulerError::Interrupted { completed: 0 }.into()),
    }
}

/// Whether an error returned from [`run`] is a user interrupt.
pub fn is_interrupt(err: &anyhow::Error) -> bool {
    err.downcast_ref::<SchedulerError>()
        .is_some_and(SchedulerError::is_interrupt)
}
