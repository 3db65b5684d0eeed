//! Process sources: where burst times come from.
//!
//! [`PromptSource`] runs the interactive validation loop over any reader and
//! writer pair, re-prompting until it gets a positive integer. [`BurstList`]
//! takes a comma-separated list from the command line instead. Both hand the
//! calculator jobs with ids `1..=n` in input order.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::error::InputError;
use crate::scheduler::Job;

/// Anything that can produce the batch of jobs to schedule.
pub trait ProcessSource {
    fn read_jobs(&mut self) -> Result<Vec<Job>, InputError>;
}

/// Parses a strictly positive integer, distinguishing garbage from
/// zero or negative numbers.
pub fn parse_positive(text: &str) -> Result<u64, InputError> {
    let trimmed = text.trim();
    let value: i128 = trimmed
        .parse()
        .map_err(|_| InputError::NotANumber(trimmed.to_string()))?;
    if value <= 0 {
        return Err(InputError::NotPositive(value));
    }
    u64::try_from(value).map_err(|_| InputError::NotANumber(trimmed.to_string()))
}

/// Interactive source that asks for a process count and then each burst.
pub struct PromptSource<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> PromptSource<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Prompts until a positive integer is entered. Invalid answers are
    /// reported on the writer and asked again; end of input is `Eof`.
    pub fn prompt_positive(&mut self, prompt: &str, what: &str) -> Result<u64, InputError> {
        loop {
            write!(self.writer, "{prompt}")?;
            self.writer.flush()?;

            let line = self.read_line()?;
            match parse_positive(&line) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    tracing::debug!(input = line.trim(), %err, "rejected {what}");
                    writeln!(self.writer, "Error: {what} must be a positive integer ({err})")?;
                }
            }
        }
    }

    /// Asks a yes/no question; only `y` or `yes` (any case) counts as yes.
    pub fn confirm(&mut self, prompt: &str) -> Result<bool, InputError> {
        write!(self.writer, "{prompt} (y/n): ")?;
        self.writer.flush()?;
        let answer = self.read_line()?.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn read_line(&mut self) -> Result<String, InputError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputError::Eof);
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> ProcessSource for PromptSource<R, W> {
    fn read_jobs(&mut self) -> Result<Vec<Job>, InputError> {
        let count = self.prompt_positive("Enter number of processes: ", "Number of processes")?;

        writeln!(self.writer, "\n{}", "=".repeat(50))?;
        writeln!(self.writer, "Enter burst times for each process")?;
        writeln!(self.writer, "{}", "=".repeat(50))?;

        let mut bursts = Vec::new();
        for i in 1..=count {
            let burst = self.prompt_positive(&format!("Process {i} - Burst time: "), "Burst time")?;
            bursts.push(burst);
        }
        Ok(Job::from_bursts(&bursts))
    }
}

/// Non-interactive source built from a list such as `6,8,7,3`.
#[derive(Debug, Clone)]
pub struct BurstList {
    jobs: Vec<Job>,
}

impl BurstList {
    /// Parses comma-separated burst times. One bad entry rejects the list.
    pub fn parse(text: &str) -> Result<Self> {
        let mut bursts = Vec::new();
        for (i, entry) in text.split(',').enumerate() {
            let burst = parse_positive(entry)
                .with_context(|| format!("burst time #{} ('{}')", i + 1, entry.trim()))?;
            bursts.push(burst);
        }
        Ok(Self {
            jobs: Job::from_bursts(&bursts),
        })
    }
}

impl ProcessSource for BurstList {
    fn read_jobs(&mut self) -> Result<Vec<Job>, InputError> {
        Ok(self.jobs.clone())
    }
}
