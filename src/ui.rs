//! Terminal output: the results table, the JSON report, and a live progress
//! bar for the simulation.
//!
//! Uses `console` for styling and `indicatif` for progress. The table itself
//! is built as plain text by [`render_table`] so it can be tested; styling is
//! only applied when printing.

use std::fmt::{self, Write as _};

use anyhow::Result;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::report::RunReport;
use crate::scheduler::{JobId, ScheduledJob, Summary};
use crate::simulator::SimEvent;

const TABLE_WIDTH: usize = 80;

/// Renders the per-job table followed by the performance summary.
pub fn render_table(jobs: &[ScheduledJob], summary: &Summary) -> Result<String> {
    let mut out = String::new();
    write_table(&mut out, jobs, summary)?;
    Ok(out)
}

fn write_table(out: &mut impl fmt::Write, jobs: &[ScheduledJob], summary: &Summary) -> fmt::Result {
    let rule = "=".repeat(TABLE_WIDTH);
    let thin = "-".repeat(TABLE_WIDTH);

    writeln!(out, "{rule}")?;
    writeln!(out, "SHORTEST JOB FIRST (SJF) SCHEDULING RESULTS")?;
    writeln!(out, "{rule}")?;
    writeln!(
        out,
        "{:<8}{:<15}{:<18}{:<18}{:<18}",
        "PID", "Burst Time", "Waiting Time", "Turnaround Time", "Completion Time"
    )?;
    writeln!(out, "{thin}")?;
    for job in jobs {
        writeln!(
            out,
            "{:<8}{:<15}{:<18}{:<18}{:<18}",
            job.id, job.burst, job.waiting_time, job.turnaround_time, job.completion_time
        )?;
    }
    writeln!(out, "{thin}")?;
    writeln!(out)?;
    writeln!(out, "{:^width$}", "PERFORMANCE METRICS", width = TABLE_WIDTH)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Total Processes:           {}", summary.count)?;
    writeln!(
        out,
        "Average Waiting Time:      {:.2} time units",
        summary.average_waiting
    )?;
    writeln!(
        out,
        "Average Turnaround Time:   {:.2} time units",
        summary.average_turnaround
    )?;
    writeln!(out, "{rule}")
}

pub fn render_json(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Line printed for a simulation event.
pub fn event_line(event: &SimEvent) -> String {
    match event {
        SimEvent::Started { id, burst, worker } => {
            format!("[{worker}] Executing Process {id} (Burst Time: {burst})")
        }
        SimEvent::Completed { id, worker } => format!("[{worker}] Process {id} completed"),
    }
}

pub fn print_results(jobs: &[ScheduledJob], summary: &Summary) -> Result<()> {
    let bold = Style::new().bold();
    println!();
    for line in render_table(jobs, summary)?.lines() {
        if line.starts_with("SHORTEST") || line.trim() == "PERFORMANCE METRICS" {
            println!("{}", bold.apply_to(line));
        } else {
            println!("{line}");
        }
    }
    println!();
    Ok(())
}

/// Progress bar tracking simulation workers as they finish.
///
/// Event lines are printed above the bar so they never tear it.
pub struct SimulationProgress {
    pb: ProgressBar,
    cyan: Style,
    green: Style,
    red: Style,
}

impl SimulationProgress {
    pub fn start(total: usize) -> Self {
        let cyan = Style::new().cyan().bold();
        println!("\n{}", "=".repeat(TABLE_WIDTH));
        println!("{}", cyan.apply_to("STARTING CONCURRENT EXECUTION SIMULATION"));
        println!("{}", "=".repeat(TABLE_WIDTH));

        let pb = ProgressBar::new(total as u64);
        // Template is static; fall back to the default bar if it ever fails.
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} completed")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            cyan,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    pub fn on_event(&self, event: &SimEvent) {
        let line = event_line(event);
        match event {
            SimEvent::Started { .. } => self.pb.println(format!("  {}", self.cyan.apply_to(line))),
            SimEvent::Completed { .. } => {
                self.pb.println(format!("  {} {line}", self.green.apply_to("✓")));
                self.pb.inc(1);
            }
        }
    }

    /// Finishes the bar and prints the observed completion order.
    pub fn complete(&self, completion_order: &[JobId]) {
        self.pb.finish_and_clear();
        println!("\n{}", "=".repeat(TABLE_WIDTH));
        println!("{}", self.green.apply_to("ALL PROCESSES COMPLETED"));
        println!("{}", "=".repeat(TABLE_WIDTH));
        println!("Completion order: {}", format_order(completion_order));
        println!();
        println!("Workers ran concurrently. Real SJF is non-preemptive and runs one job at a time;");
        println!("this replay only demonstrates the concurrency primitives.");
    }

    /// Clears the bar after a failed or interrupted run.
    pub fn abandon(&self, completed: usize) {
        self.pb.abandon();
        println!(
            "  {} Simulation stopped after {completed} completed processes",
            self.red.apply_to("✗")
        );
    }
}

pub fn format_order(order: &[JobId]) -> String {
    order
        .iter()
        .map(|id| format!("P{id}"))
        .collect::<Vec<_>>()
        .join(" -> ")
}
