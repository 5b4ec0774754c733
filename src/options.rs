/// Timeout and retry behavior of [`crate::CypherClient`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Base retry backoff in milliseconds, doubled on each attempt.
    pub retry_backoff_ms: u64,
}

impl ClientOptions {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_retries(mut self, max_retries: usize, retry_backoff_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff_ms = retry_backoff_ms;
        self
    }

    /// Delay before retry number `attempt` (zero-based).
    pub(crate) fn backoff_ms(&self, attempt: usize) -> u64 {
        let exp = attempt.min(16) as u32;
        self.retry_backoff_ms.saturating_mul(1u64 << exp)
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            max_retries: 0,
            retry_backoff_ms: 250,
        }
    }
}
