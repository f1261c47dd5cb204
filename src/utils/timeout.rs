use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use tracing::error;

use crate::errors::{Result, ReturnError};

/// Execute a future, failing with `ReturnError::Timeout` once `duration` elapses
pub async fn with_timeout<F, T>(future: F, duration: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => {
            error!("Operation '{}' timed out after {:?}", operation_name, duration);
            Err(ReturnError::Timeout {
                operation: operation_name.to_string(),
                seconds: duration.as_secs(),
            })
        }
    }
}
