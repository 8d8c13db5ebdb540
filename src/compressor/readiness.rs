use crate::error::AppError;
use backon::{ConstantBuilder, Retryable};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Fixed-interval poll schedule for an input file that is still being shared.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_retries: usize,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_retries: 300,
        }
    }
}

impl PollPolicy {
    fn backoff(&self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.interval)
            .with_max_times(self.max_retries)
    }
}

/// Block until `path` exists.
///
/// Only "not found" is waited on; any other stat failure is returned as is.
/// After `max_retries` unsuccessful re-probes the wait ends with
/// [`AppError::Timeout`].
pub async fn wait_for_ready(path: &Path, policy: PollPolicy) -> Result<(), AppError> {
    let probe = || async move {
        tokio::fs::metadata(path).await?;
        Ok::<(), AppError>(())
    };

    let outcome = probe
        .retry(policy.backoff())
        .when(|e: &AppError| e.is_not_found())
        .notify(|_, _| {
            info!(path = %path.display(), "file is not yet present");
        })
        .await;

    match outcome {
        Ok(()) => {
            info!(path = %path.display(), "file is present");
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            warn!(path = %path.display(), "timeout waiting for file");
            Err(AppError::Timeout {
                path: path.to_path_buf(),
                attempts: policy.max_retries + 1,
            })
        }
        Err(e) => Err(e),
    }
}
