use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Displays the orchestrator's stderr verbatim.
    #[error("{stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("{command} timed out after {secs}s")]
    Timeout { command: String, secs: u64 },

    #[error("Invalid status output on line {line}: {source}")]
    Decode {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ComposeError {
    pub fn kind(&self) -> stack_core::ErrorKind {
        use stack_core::ErrorKind;

        match self {
            Self::Spawn { .. } => ErrorKind::Spawn,
            Self::CommandFailed { .. } => ErrorKind::CommandFailed,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_displays_stderr_verbatim() {
        let err = ComposeError::CommandFailed {
            command: "docker compose down".to_string(),
            stderr: "no configuration file provided: not found\n".to_string(),
        };
        assert_eq!(err.to_string(), "no configuration file provided: not found\n");
        assert_eq!(err.kind(), stack_core::ErrorKind::CommandFailed);
    }

    #[test]
    fn test_timeout_display() {
        let err = ComposeError::Timeout {
            command: "docker compose pull".to_string(),
            secs: 300,
        };
        assert_eq!(err.to_string(), "docker compose pull timed out after 300s");
        assert_eq!(err.kind(), stack_core::ErrorKind::Timeout);
    }

    #[test]
    fn test_config_error_has_config_kind() {
        let err = ComposeError::Config("stack.command must name the orchestrator program".to_string());
        assert_eq!(err.kind(), stack_core::ErrorKind::Config);
        assert!(err.to_string().starts_with("Invalid configuration: "));
    }
}
