//! The five stack operations.
//!
//! Each call is independent. Deploy and stop mutate the stack through the
//! orchestrator and are serialized on one lock; reads never take it.

use compose::{ComposeCli, StackConfig};
use stack_core::Envelope;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::AppError;

pub struct StackService {
    compose: ComposeCli,
    mutation: Mutex<()>,
}

impl StackService {
    pub fn new(compose: ComposeCli) -> Self {
        Self {
            compose,
            mutation: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StackConfig {
        self.compose.config()
    }

    async fn lock_mutations(&self, operation: &str) -> MutexGuard<'_, ()> {
        match self.mutation.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                info!(operation, "Waiting for in-flight stack operation to finish");
                self.mutation.lock().await
            }
        }
    }

    pub async fn status(&self) -> Result<Envelope, AppError> {
        let listing = self.compose.status().await?;

        debug!(
            services = listing.services.len(),
            failed_lines = listing.failures.len(),
            "Stack status collected"
        );

        Ok(Envelope::status_listing(listing.services, listing.failures))
    }

    /// Pulls images, then brings the stack up detached. A failed pull stops
    /// the sequence before `up`.
    pub async fn deploy(&self) -> Result<Envelope, AppError> {
        let _guard = self.lock_mutations("deploy").await;

        info!("Pulling latest images");
        self.compose.pull().await.map_err(AppError::PullFailed)?;

        info!("Deploying stack");
        self.compose.up().await?;

        info!("Stack deployed");
        Ok(Envelope::success_message("Stack deployed successfully"))
    }

    pub async fn stop(&self) -> Result<Envelope, AppError> {
        let _guard = self.lock_mutations("stop").await;

        info!("Stopping stack");
        self.compose.down().await?;

        info!("Stack stopped");
        Ok(Envelope::success_message("Stack stopped successfully"))
    }

    pub async fn logs(&self, service: &str) -> Result<Envelope, AppError> {
        if !self.config().is_known_service(service) {
            return Err(AppError::UnknownService(service.to_string()));
        }

        let logs = self.compose.logs(service).await?;
        Ok(Envelope::logs(logs))
    }

    /// Raw environment file plus the configured service names.
    pub async fn env_config(&self) -> Result<Envelope, AppError> {
        let path = self.config().env_path();

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| AppError::Io { path, source })?;

        Ok(Envelope::config(content, self.config().services.clone()))
    }
}
