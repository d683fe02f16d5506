//! Signed request dispatch with throttling and retries.

use crate::config::{ClientConfig, Credentials};
use crate::error::{Error, Result};
use crate::paapi::operation::Operation;
use crate::paapi::signer::RequestSigner;
use crate::paapi::xml::{self, Value};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use wreq::Client;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executes signed GETs against one marketplace endpoint.
///
/// Holds the only mutable per-instance state in the crate: the start time of
/// the last request, used for qps spacing. Instances are fully independent.
pub struct Transport {
    client: Client,
    signer: RequestSigner,
    host: String,
    qps: Option<f64>,
    retry_count: u32,
    retry_backoff: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl Transport {
    /// Creates a transport for the configured region.
    pub fn new(credentials: Credentials, config: &ClientConfig) -> Result<Self> {
        Self::with_host(credentials, config, None)
    }

    /// Creates a transport aimed at a custom host (for testing).
    pub fn with_host(
        credentials: Credentials,
        config: &ClientConfig,
        host_override: Option<String>,
    ) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .gzip(true)
            .timeout(config.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let host = host_override.unwrap_or_else(|| config.region.host().to_string());
        let signer = RequestSigner::new(credentials, &config.service, &config.version);

        Ok(Self {
            client,
            signer,
            host,
            qps: config.qps,
            retry_count: config.retry_count,
            retry_backoff: config.retry_backoff,
            last_request: Mutex::new(None),
        })
    }

    /// Issues one operation call: throttle once, then attempt the request up
    /// to `retry_count + 1` times, retrying vendor errors and timeouts with a
    /// fixed backoff. Returns the unwrapped response payload.
    pub async fn execute(&self, operation: Operation, params: &[(String, String)]) -> Result<Value> {
        self.throttle().await;

        let mut attempt = 0;
        loop {
            match self.attempt(operation, params).await {
                Ok(payload) => return Ok(payload),
                Err(err) if err.is_retryable() && attempt < self.retry_count => {
                    attempt += 1;
                    warn!(
                        "{} failed: {}. Retrying in {:?} ({}/{})",
                        operation, err, self.retry_backoff, attempt, self.retry_count
                    );
                    tokio::time::sleep(self.retry_backoff).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One signed GET with a fresh timestamp.
    async fn attempt(&self, operation: Operation, params: &[(String, String)]) -> Result<Value> {
        let url = self.signer.signed_url(&self.host, operation, params);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(Error::from)?;
        let status = response.status();
        debug!("Response status: {}", status);
        let body = response.text().await.map_err(Error::from)?;

        if !status.is_success() {
            return Err(decode_error_envelope(operation, status.as_u16(), &body));
        }

        let (root, payload) = xml::parse(&body)?;
        if root != operation.response_envelope() {
            return Err(Error::Xml(format!(
                "expected <{}>, got <{}>",
                operation.response_envelope(),
                root
            )));
        }

        if let Some(result) = payload.get(operation.result_root()) {
            interpret_errors(result)?;
        }

        Ok(payload)
    }

    /// Delays so no two requests start less than `1/qps` seconds apart.
    async fn throttle(&self) {
        let Some(qps) = self.qps else { return };
        let interval = Duration::from_secs_f64(1.0 / qps);

        let wait = {
            let mut last = match self.last_request.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let now = Instant::now();
            let start = match *last {
                Some(prev) if prev + interval > now => prev + interval,
                _ => now,
            };
            *last = Some(start);
            start - now
        };

        if !wait.is_zero() {
            warn!("Waiting {:?} to send the next request", wait);
            tokio::time::sleep(wait).await;
        }
    }
}

/// Inspects a result fragment for a vendor `Errors` section; fails with every
/// reported code and message, otherwise passes the fragment through.
pub(crate) fn interpret_errors(result: &Value) -> Result<()> {
    let Some(errors) = result.path(&["Request", "Errors", "Error"]) else {
        return Ok(());
    };

    // a single error arrives unwrapped, items() handles both shapes
    let reported: Vec<String> = errors
        .items()
        .into_iter()
        .map(|err| {
            let code = err.text_of("Code").unwrap_or("Unknown");
            let message = err.text_of("Message").unwrap_or("");
            error!("{}  -  {}", code, message);
            format!("{} - {}", code, message)
        })
        .collect();

    if reported.is_empty() {
        Ok(())
    } else {
        Err(Error::Vendor(reported.join(" , ")))
    }
}

/// Decodes a non-200 body as the `<OperationErrorResponse>` envelope.
fn decode_error_envelope(operation: Operation, status: u16, body: &str) -> Error {
    match xml::parse(body) {
        Ok((root, value)) if root == operation.error_envelope() => {
            let reported: Vec<String> = value
                .get("Error")
                .map(|errors| {
                    errors
                        .items()
                        .into_iter()
                        .map(|err| {
                            format!(
                                "{} - {}",
                                err.text_of("Code").unwrap_or("Unknown"),
                                err.text_of("Message").unwrap_or("")
                            )
                        })
                        .collect()
                })
                .unwrap_or_default();
            error!("{} request returned {}: {}", operation, status, reported.join(" , "));
            Error::Vendor(format!("HTTP {}: {}", status, reported.join(" , ")))
        }
        _ => Error::Vendor(format!("HTTP {} with unrecognized error body", status)),
    }
}
