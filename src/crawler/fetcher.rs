//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the chain:
//! - Building the HTTP client with a total request timeout
//! - GET requests returning the raw body, whatever the status code
//! - Error classification (timeout vs. other transport failures)
//! - Diagnostic logging of the response

use crate::GetterError;
use reqwest::{Client, Response};
use std::future::Future;
use std::time::Duration;

/// Something that can download a URL
pub trait Fetcher {
    /// Fetches `url` and returns the full response body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, GetterError>> + Send;
}

impl<T: Fetcher + Sync> Fetcher for &T {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, GetterError>> + Send {
        (**self).fetch(url)
    }
}

/// Builds an HTTP client with proper configuration
///
/// Certificate validation stays on and redirects follow the client default.
///
/// # Arguments
///
/// * `timeout` - Upper bound on a whole request, body included
///
/// # Example
///
/// ```no_run
/// use getter::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .tls_info(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, GetterError> {
        Ok(Self {
            client: build_http_client(timeout)?,
        })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, GetterError> {
        tracing::info!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        log_response(&response);

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url, e))?;

        tracing::debug!("Received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

/// Maps a reqwest failure onto the timeout / network split
fn classify_error(url: &str, error: reqwest::Error) -> GetterError {
    if error.is_timeout() {
        GetterError::Timeout {
            url: url.to_string(),
        }
    } else {
        GetterError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

fn log_response(response: &Response) {
    let status = response.status();
    if status.is_success() {
        tracing::debug!("{} {:?} from {}", status, response.version(), response.url());
    } else {
        tracing::warn!(
            "{} {:?} from {} (body is still used)",
            status,
            response.version(),
            response.url()
        );
    }

    for (name, value) in response.headers() {
        tracing::debug!("header {}: {}", name, value.to_str().unwrap_or("<binary>"));
    }

    match response.extensions().get::<reqwest::tls::TlsInfo>() {
        Some(info) => tracing::debug!(
            "TLS peer certificate: {}",
            info.peer_certificate()
                .map(|der| format!("{} bytes DER", der.len()))
                .unwrap_or_else(|| "none".to_string())
        ),
        None => tracing::trace!("No TLS session"),
    }
}
