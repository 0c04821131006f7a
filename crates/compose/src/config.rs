use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ComposeError, Result};

const DEFAULT_STACK_DIR: &str = "/app/docker-stack";
const DEFAULT_MANIFEST: &str = "docker-compose.yml";
const DEFAULT_ENV_FILE: &str = ".env";
const DEFAULT_LOG_TAIL: u32 = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_PULL_TIMEOUT_SECS: u64 = 1800;

const DEFAULT_SERVICES: [&str; 6] = [
    "traefik",
    "postgresql",
    "redis",
    "authentik-server",
    "authentik-worker",
    "pgadmin",
];

/// How `ps --format json` output is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusDecode {
    /// Keep the records that decode and report the lines that don't
    #[default]
    Lenient,
    /// Any malformed line fails the whole listing
    Strict,
}

/// Location of the stack and how to drive the orchestrator against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    /// Working directory for every orchestrator invocation
    pub dir: PathBuf,
    /// Manifest file name, relative to `dir`
    pub manifest: String,
    /// Environment file name, relative to `dir`
    pub env_file: String,
    /// Orchestrator program followed by its leading arguments
    pub command: Vec<String>,
    /// Services the stack is expected to run; also the allow-list for logs
    pub services: Vec<String>,
    pub log_tail: u32,
    /// Per-invocation bound for every subcommand except `pull`; 0 waits forever
    pub timeout_secs: u64,
    /// Bound for `pull`, which downloads images and can run far longer; 0 waits forever
    pub pull_timeout_secs: u64,
    pub status_decode: StatusDecode,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_STACK_DIR),
            manifest: DEFAULT_MANIFEST.to_string(),
            env_file: DEFAULT_ENV_FILE.to_string(),
            command: vec!["docker".to_string(), "compose".to_string()],
            services: DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
            log_tail: DEFAULT_LOG_TAIL,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            pull_timeout_secs: DEFAULT_PULL_TIMEOUT_SECS,
            status_decode: StatusDecode::default(),
        }
    }
}

impl StackConfig {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(&self.manifest)
    }

    pub fn env_path(&self) -> PathBuf {
        self.dir.join(&self.env_file)
    }

    pub fn program(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }

    pub fn timeout(&self) -> Option<Duration> {
        bounded(self.timeout_secs)
    }

    pub fn pull_timeout(&self) -> Option<Duration> {
        bounded(self.pull_timeout_secs)
    }

    pub fn is_known_service(&self, name: &str) -> bool {
        self.services.iter().any(|s| s == name)
    }

    pub fn validate(&self) -> Result<()> {
        if self.command.first().map_or(true, |p| p.trim().is_empty()) {
            return Err(ComposeError::Config(
                "stack.command must name the orchestrator program".to_string(),
            ));
        }
        if self.manifest.trim().is_empty() {
            return Err(ComposeError::Config(
                "stack.manifest must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn bounded(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
