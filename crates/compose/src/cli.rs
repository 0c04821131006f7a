use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::StackConfig;
use crate::error::{ComposeError, Result};
use crate::runner::{command_line, CommandRunner, ProcessRunner};
use crate::status::{decode_status, StatusListing};

/// Orchestrator subcommands, always scoped to the stack manifest and run
/// from the stack directory.
#[derive(Clone)]
pub struct ComposeCli {
    config: StackConfig,
    runner: Arc<dyn CommandRunner>,
}

impl ComposeCli {
    pub fn new(config: StackConfig) -> Self {
        Self::with_runner(config, Arc::new(ProcessRunner))
    }

    pub fn with_runner(config: StackConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &StackConfig {
        &self.config
    }

    /// Full argument list (after the program) for a subcommand.
    pub fn args_for(&self, subcommand: &[&str]) -> Vec<String> {
        let mut args: Vec<String> = self.config.command.iter().skip(1).cloned().collect();
        args.push("-f".to_string());
        args.push(self.config.manifest_path().display().to_string());
        args.extend(subcommand.iter().map(|s| s.to_string()));
        args
    }

    async fn run(&self, subcommand: &[&str]) -> Result<String> {
        self.run_with_timeout(subcommand, self.config.timeout()).await
    }

    async fn run_with_timeout(
        &self,
        subcommand: &[&str],
        timeout: Option<Duration>,
    ) -> Result<String> {
        let program = self.config.program();
        let args = self.args_for(subcommand);

        let output = self
            .runner
            .run(program, &args, &self.config.dir, timeout)
            .await?;

        if !output.success() {
            let command = command_line(program, &args);
            warn!(command = %command, code = ?output.code, "Orchestrator command failed");
            return Err(ComposeError::CommandFailed {
                command,
                stderr: output.stderr,
            });
        }

        debug!(subcommand = ?subcommand, bytes = output.stdout.len(), "Orchestrator command succeeded");
        Ok(output.stdout)
    }

    /// Raw `ps --format json` output.
    pub async fn ps(&self) -> Result<String> {
        self.run(&["ps", "--format", "json"]).await
    }

    /// `ps` decoded per the configured [`crate::StatusDecode`] mode.
    pub async fn status(&self) -> Result<StatusListing> {
        let stdout = self.ps().await?;
        decode_status(&stdout, self.config.status_decode)
    }

    /// Bounded by `pull_timeout_secs` rather than the general timeout.
    pub async fn pull(&self) -> Result<String> {
        self.run_with_timeout(&["pull"], self.config.pull_timeout())
            .await
    }

    pub async fn up(&self) -> Result<String> {
        self.run(&["up", "-d"]).await
    }

    pub async fn down(&self) -> Result<String> {
        self.run(&["down"]).await
    }

    /// Last `log_tail` lines of one service's logs.
    pub async fn logs(&self, service: &str) -> Result<String> {
        let tail = self.config.log_tail.to_string();
        self.run(&["logs", "--tail", &tail, service]).await
    }
}
