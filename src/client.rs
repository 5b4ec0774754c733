use std::fmt;
use std::time::Duration;

use reqwest::{header, StatusCode};

// tokio::time::sleep is only available on non-WASM targets.
#[cfg(not(target_arch = "wasm32"))]
use tokio::time::sleep;

use crate::{
    decode::{build_request, decode_response},
    wire::{CypherRequest, CypherResponse, ErrorResponse},
    ClientOptions, CypherError, CypherResult, Result, ResultSetParser, Statement,
};

const CYPHER_PATH: &str = "/db/data/cypher";

/// Formats a server base URL into the Cypher endpoint URL.
///
/// Example: `"http://localhost:7474"` → `"http://localhost:7474/db/data/cypher"`
pub fn cypher_endpoint_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.ends_with(CYPHER_PATH) {
        trimmed.to_owned()
    } else {
        format!("{trimmed}{CYPHER_PATH}")
    }
}

#[derive(Clone)]
struct Credentials {
    user: String,
    password: Option<String>,
}

#[derive(Clone)]
/// HTTP client for the Neo4j REST Cypher endpoint.
pub struct CypherClient {
    http: reqwest::Client,
    endpoint_url: String,
    credentials: Option<Credentials>,
    options: ClientOptions,
}

impl fmt::Debug for CypherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CypherClient")
            .field("endpoint_url", &self.endpoint_url)
            .field(
                "credentials",
                &self.credentials.as_ref().map(|_| "<redacted>"),
            )
            .field("options", &self.options)
            .finish()
    }
}

impl CypherClient {
    /// Creates an unauthenticated client for a server base URL such as
    /// `http://localhost:7474`.
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint_url: cypher_endpoint_url(base_url.as_ref()),
            credentials: None,
            options: ClientOptions::default(),
        }
    }

    /// Sends HTTP basic credentials with every request.
    pub fn with_basic_auth(mut self, user: impl Into<String>, password: Option<String>) -> Self {
        self.credentials = Some(Credentials {
            user: user.into(),
            password,
        });
        self
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `NEO4J_URL` — server base URL (required)
    /// - `NEO4J_USER` / `NEO4J_PASSWORD` — basic auth credentials (optional)
    ///
    /// **Not available on `wasm32` targets.**
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        let url = std::env::var("NEO4J_URL")
            .map_err(|_| "missing NEO4J_URL environment variable".to_owned())?;
        if url.trim().is_empty() {
            return Err("NEO4J_URL is set but empty".to_owned());
        }

        let client = Self::new(url);
        match std::env::var("NEO4J_USER") {
            Ok(user) if !user.trim().is_empty() => {
                Ok(client.with_basic_auth(user, std::env::var("NEO4J_PASSWORD").ok()))
            }
            _ => Ok(client),
        }
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    /// Runs a statement and returns its rows.
    pub async fn query(&self, statement: impl Into<Statement>) -> Result<CypherResult> {
        let request = build_request(statement.into());
        let response = self.send_with_retry(&request).await?;
        decode_response(response)
    }

    /// Runs a statement and parses its rows with `parser`.
    pub async fn query_as<T: 'static>(
        &self,
        statement: impl Into<Statement>,
        parser: &ResultSetParser<T>,
    ) -> Result<T> {
        let result = self.query(statement).await?;
        Ok(result.parse(parser)?)
    }

    /// Runs a statement for its side effects, discarding any rows.
    pub async fn execute(&self, statement: impl Into<Statement>) -> Result<()> {
        self.query(statement).await.map(|_| ())
    }

    async fn send_with_retry(&self, payload: &CypherRequest) -> Result<CypherResponse> {
        let mut attempt = 0usize;
        loop {
            let mut request = self
                .http
                .post(&self.endpoint_url)
                .header(header::ACCEPT, "application/json")
                .timeout(Duration::from_millis(self.options.timeout_ms))
                .json(payload);
            if let Some(credentials) = &self.credentials {
                request = request.basic_auth(&credentials.user, credentials.password.as_ref());
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.map_err(CypherError::Transport)?;

                    if !status.is_success() {
                        if self.should_retry_status(status) && attempt < self.options.max_retries {
                            self.wait_before_retry(attempt).await;
                            attempt += 1;
                            continue;
                        }

                        return Err(error_from_body(status, body));
                    }

                    return serde_json::from_str::<CypherResponse>(&body).map_err(|err| {
                        CypherError::Decode(format!(
                            "invalid cypher response JSON: {err}; body: {body}"
                        ))
                    });
                }
                Err(err) => {
                    if self.should_retry_transport(&err) && attempt < self.options.max_retries {
                        self.wait_before_retry(attempt).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(CypherError::Transport(err));
                }
            }
        }
    }

    fn should_retry_status(&self, status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::TOO_MANY_REQUESTS
                | StatusCode::INTERNAL_SERVER_ERROR
                | StatusCode::BAD_GATEWAY
                | StatusCode::SERVICE_UNAVAILABLE
                | StatusCode::GATEWAY_TIMEOUT
        )
    }

    fn should_retry_transport(&self, err: &reqwest::Error) -> bool {
        err.is_timeout()
            || err.is_request()
            || err.is_body()
            // is_connect() is not available on wasm32 targets (no TCP)
            || {
                #[cfg(not(target_arch = "wasm32"))]
                { err.is_connect() }
                #[cfg(target_arch = "wasm32")]
                { false }
            }
    }

    /// Waits before the next retry attempt.
    ///
    /// On WASM targets this is a no-op; `tokio::time::sleep` is not available.
    async fn wait_before_retry(&self, attempt: usize) {
        let delay_ms = self.options.backoff_ms(attempt);

        #[cfg(feature = "tracing")]
        tracing::debug!("retrying cypher request after {} ms", delay_ms);

        #[cfg(not(target_arch = "wasm32"))]
        sleep(Duration::from_millis(delay_ms)).await;

        #[cfg(target_arch = "wasm32")]
        let _ = delay_ms;
    }
}

/// Neo4j reports statement failures as `{"message": ..., "exception": ...}`;
/// anything else is surfaced as a plain HTTP error.
fn error_from_body(status: StatusCode, body: String) -> CypherError {
    #[cfg(feature = "tracing")]
    tracing::debug!("cypher request failed with status {}", status);

    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(error) => CypherError::Neo4j {
            message: error.message,
            exception: error.exception,
        },
        Err(_) => CypherError::Http {
            status: status.as_u16(),
            body,
        },
    }
}
