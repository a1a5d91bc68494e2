//! An oracle backed by an external program.
//!
//! The subject is materialized to a file and the program is run with the
//! file path as its last argument. Exit status decides the outcome:
//!
//! | exit            | outcome                                  |
//! |-----------------|------------------------------------------|
//! | 0               | `Pass`                                   |
//! | 1               | `LayoutBug(stdout lines)`, `Pass` if none |
//! | killed on timer | `Timeout`                                |
//! | anything else   | `Crash`                                  |

use super::oracle::{Oracle, Outcome};
use crate::error::{Error, Result};
use crate::materialize::Materializer;
use crate::model::RunSubject;
use std::io::Read;
use std::path::Path;
use std::process::{ChildStdout, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use wait_timeout::ChildExt;

pub struct CommandOracle<M> {
    program: String,
    args: Vec<String>,
    timeout: Duration,
    materializer: M,
    keep_files: bool,
}

impl<M: Materializer> CommandOracle<M> {
    /// `argv` is the program followed by its leading arguments.
    pub fn new(argv: &[String], timeout: Duration, materializer: M) -> Result<Self> {
        let (program, args) = argv.split_first().ok_or_else(|| Error::Oracle("empty oracle command".to_string()))?;
        Ok(CommandOracle { program: program.clone(), args: args.to_vec(), timeout, materializer, keep_files: false })
    }

    /// Keep the materialized documents instead of deleting them after each test.
    pub fn keep_files(mut self, keep: bool) -> Self {
        self.keep_files = keep;
        self
    }
}

impl<M> CommandOracle<M> {
    fn run(&self, page: &Path) -> Result<Outcome> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(page)
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| Error::Oracle(format!("failed to start '{}': {err}", self.program)))?;

        // Drain stdout while waiting; a full pipe would stall the oracle.
        let stdout = child.stdout.take().ok_or_else(|| Error::Oracle("failed to capture oracle stdout".to_string()))?;
        let pump = spawn_stdout_pump(stdout);

        let status = match child.wait_timeout(self.timeout) {
            Ok(status) => status,
            Err(err) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(err.into());
            }
        };

        let Some(status) = status else {
            child.kill()?;
            child.wait()?;
            tracing::warn!(page = %page.display(), "oracle timed out");
            return Ok(Outcome::Timeout);
        };

        match status.code() {
            Some(0) => Ok(Outcome::Pass),
            Some(1) => {
                let stdout = pump
                    .join()
                    .map_err(|_| Error::Oracle("oracle stdout reader panicked".to_string()))??;
                let details = stdout.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect();
                Ok(Outcome::from_details(details))
            }
            _ => Ok(Outcome::Crash),
        }
    }
}

fn spawn_stdout_pump(mut stdout: ChildStdout) -> JoinHandle<std::io::Result<String>> {
    thread::spawn(move || {
        let mut text = String::new();
        stdout.read_to_string(&mut text)?;
        Ok(text)
    })
}

impl<M: Materializer> Oracle for CommandOracle<M> {
    fn test(&mut self, subject: &RunSubject) -> Result<Outcome> {
        let page = self.materializer.render(subject)?;
        let outcome = self.run(&page);

        if !self.keep_files {
            if let Err(err) = std::fs::remove_file(&page) {
                tracing::debug!(page = %page.display(), %err, "could not remove materialized page");
            }
        }
        outcome
    }
}
