use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use policy_config::RetryConfig;

use crate::Error;

/// Runs `operation`, retrying retryable failures with exponential backoff.
pub(crate) async fn retry_with_config<F, Fut, T>(
    config: &RetryConfig,
    operation: F,
) -> Result<T, Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, Error>>,
{
    let strategy = ExponentialBuilder::default()
        .with_min_delay(Duration::from_millis(config.min_delay_ms))
        .with_factor(config.backoff_factor as f32)
        .with_max_times(config.max_retry_attempts)
        .with_jitter();

    operation
        .retry(strategy)
        .when(|error: &Error| error.is_retryable(&config.retry_status_codes))
        .notify(|error: &Error, delay: Duration| {
            tracing::warn!(
                error = %error,
                delay_ms = delay.as_millis() as u64,
                "Retrying answer request"
            );
        })
        .await
}
