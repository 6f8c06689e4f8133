//! Bounded retry for network-level failures.

use std::time::Duration;

use super::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// How often and how patiently to retry transient transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub attempts: u32,
    /// Fixed delay between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            delay: Duration::from_secs(5),
        }
    }
}

/// Send `request`, retrying transient failures according to `policy`.
///
/// HTTP error statuses are not failures at this level; they come back as
/// responses for the caller to classify.
pub async fn send_with_retry<T: HttpTransport + ?Sized>(
    transport: &T,
    request: &HttpRequest,
    policy: &RetryPolicy,
) -> Result<HttpResponse, TransportError> {
    let attempts = policy.attempts.max(1);
    let mut attempt = 1;

    loop {
        match transport.send(request).await {
            Ok(response) => return Ok(response),
            Err(e) if e.is_transient() && attempt < attempts => {
                tracing::warn!(
                    target: "catalog::retry",
                    url = %request.url,
                    attempt,
                    error = %e,
                    "Transient transport failure, retrying in {:?}",
                    policy.delay
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
