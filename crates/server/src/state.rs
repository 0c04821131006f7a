use compose::{CommandRunner, ComposeCli, StackConfig};
use std::path::PathBuf;
use std::sync::Arc;

use crate::stack_service::StackService;

#[derive(Clone)]
pub struct AppState {
    pub stack: Arc<StackService>,
    /// Directory served at `/` instead of the built-in dashboard
    pub dashboard_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(config: StackConfig) -> Self {
        Self::from_compose(ComposeCli::new(config))
    }

    /// Drives the orchestrator through `runner` instead of real subprocesses.
    pub fn with_runner(config: StackConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self::from_compose(ComposeCli::with_runner(config, runner))
    }

    fn from_compose(compose: ComposeCli) -> Self {
        Self {
            stack: Arc::new(StackService::new(compose)),
            dashboard_dir: None,
        }
    }

    pub fn with_dashboard_dir(mut self, dashboard_dir: PathBuf) -> Self {
        self.dashboard_dir = Some(dashboard_dir);
        self
    }
}
