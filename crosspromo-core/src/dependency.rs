use std::future::Future;
use std::time::Duration;
use tracing::error;
use crate::repository::RepoResult;
use crate::{CoreError, CoreResult};

/// Bounds every persistence call with a deadline and folds adapter failures
/// into `CoreError::DependencyError`. The underlying error text is logged,
/// not returned.
#[derive(Debug, Clone, Copy)]
pub struct DependencyGuard {
    timeout: Duration,
}

impl DependencyGuard {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn call<T, F>(&self, operation: &'static str, fut: F) -> CoreResult<T>
    where
        F: Future<Output = RepoResult<T>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                error!("{} failed: {}", operation, e);
                Err(CoreError::dependency(format!("{} failed", operation)))
            }
            Err(_) => {
                error!("{} timed out after {:?}", operation, self.timeout);
                Err(CoreError::dependency(format!("{} timed out", operation)))
            }
        }
    }
}

impl Default for DependencyGuard {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}
