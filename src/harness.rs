//! Iteration harness for environment-setup runs.
//!
//! Drives the agent through a staged pipeline: a list of one-time setup
//! stages (scan, plan, ...) followed by a bounded build-iterate loop (write
//! the Dockerfile, run it, summarize, update). Stage instruction *content*
//! is supplied by the caller; the harness only sequences turns and stops
//! early once the status file reports success.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::info;

use crate::agent::Agent;
use crate::error::Result;

/// Iterations attempted before giving up on a successful build.
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;

const STATUS_DIR: &str = "envgym";
const STATUS_FILE: &str = "status.txt";
const SUCCESS_MARKER: &str = "SUCCESS";

/// A one-time pipeline stage.
#[derive(Debug, Clone)]
pub struct Stage {
    pub name: String,
    pub instruction: String,
}

impl Stage {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
        }
    }
}

/// A stage executed on every build iteration.
///
/// `first_instruction`, when set, replaces `instruction` on the first
/// iteration only: the write-Dockerfile stage starts from the plan and
/// revises from logs afterwards.
#[derive(Debug, Clone)]
pub struct IterationStage {
    pub name: String,
    pub instruction: String,
    pub first_instruction: Option<String>,
}

impl IterationStage {
    pub fn new(name: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instruction: instruction.into(),
            first_instruction: None,
        }
    }

    pub fn with_first_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.first_instruction = Some(instruction.into());
        self
    }
}

/// Outcome of a harness run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessReport {
    pub iterations_run: u32,
    pub succeeded: bool,
    pub elapsed: Duration,
}

/// Sequences setup and iteration stages through an [`Agent`].
pub struct IterationHarness {
    agent: Agent,
    workdir: PathBuf,
    max_iterations: u32,
}

impl IterationHarness {
    pub fn new(agent: Agent, workdir: impl Into<PathBuf>) -> Self {
        Self {
            agent,
            workdir: workdir.into(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    fn status_path(&self) -> PathBuf {
        self.workdir.join(STATUS_DIR).join(STATUS_FILE)
    }

    /// Whether the bookkeeping status file reports a successful build.
    pub async fn success_reported(&self) -> bool {
        status_file_reports_success(&self.status_path()).await
    }

    /// Run setup stages once, then iterate until success or the iteration
    /// cap. Each stage is one fresh conversation turn.
    pub async fn run(
        &self,
        setup: &[Stage],
        iteration: &[IterationStage],
    ) -> Result<HarnessReport> {
        let started = Instant::now();
        tokio::fs::create_dir_all(self.workdir.join(STATUS_DIR)).await?;

        for stage in setup {
            info!(stage = %stage.name, "setup stage");
            self.agent.process_turn(&stage.instruction, &[]).await?;
        }

        let mut iterations_run = 0;
        let mut succeeded = false;
        for index in 0..self.max_iterations {
            iterations_run = index + 1;
            for stage in iteration {
                let instruction = if index == 0 {
                    stage.first_instruction.as_deref().unwrap_or(&stage.instruction)
                } else {
                    &stage.instruction
                };
                info!(stage = %stage.name, iteration = iterations_run, "iteration stage");
                self.agent.process_turn(instruction, &[]).await?;
            }
            if self.success_reported().await {
                succeeded = true;
                break;
            }
        }

        let report = HarnessReport {
            iterations_run,
            succeeded,
            elapsed: started.elapsed(),
        };
        info!(
            iterations = report.iterations_run,
            succeeded = report.succeeded,
            elapsed_secs = report.elapsed.as_secs(),
            "harness run finished"
        );
        Ok(report)
    }
}

async fn status_file_reports_success(path: &Path) -> bool {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => content.contains(SUCCESS_MARKER),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_status_file_is_not_success() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!status_file_reports_success(&dir.path().join("envgym/status.txt")).await);
    }

    #[tokio::test]
    async fn status_file_with_marker_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let status_dir = dir.path().join("envgym");
        tokio::fs::create_dir_all(&status_dir).await.unwrap();
        let path = status_dir.join("status.txt");
        tokio::fs::write(&path, "build: SUCCESS\n").await.unwrap();

        assert!(status_file_reports_success(&path).await);
    }

    #[tokio::test]
    async fn status_file_without_marker_is_not_success() {
        let dir = tempfile::tempdir().unwrap();
        let status_dir = dir.path().join("envgym");
        tokio::fs::create_dir_all(&status_dir).await.unwrap();
        let path = status_dir.join("status.txt");
        tokio::fs::write(&path, "still failing at step 3\n").await.unwrap();

        assert!(!status_file_reports_success(&path).await);
    }
}
