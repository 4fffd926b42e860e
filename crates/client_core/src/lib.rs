use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::Beer,
    error::{ApiError, ApiException},
    routes::BEERS_ROUTE,
};
use thiserror::Error;
use tracing::debug;
use url::Url;

mod filter;
mod list_controller;
pub use filter::filter_beers;
pub use list_controller::{ListController, ListEvent, ListStatus, FETCH_ERROR_MESSAGE};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Coarse split of gateway failures; both are shown to users the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Fetch,
    Parse,
}

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("invalid catalog base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("catalog responded with status {status}{}", detail_suffix(.detail))]
    Status { status: u16, detail: Option<String> },
    #[error("malformed catalog payload: {0}")]
    Parse(String),
}

impl GatewayError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GatewayError::Parse(_) => FailureKind::Parse,
            GatewayError::InvalidBaseUrl { .. }
            | GatewayError::Transport(_)
            | GatewayError::Status { .. } => FailureKind::Fetch,
        }
    }
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|detail| format!(" ({detail})"))
        .unwrap_or_default()
}

/// Source of the full beer collection. One call returns every record, in
/// backend order; filtering is never delegated to the gateway.
#[async_trait]
pub trait BeerGateway: Send + Sync {
    async fn fetch_beers(&self) -> Result<Vec<Beer>, GatewayError>;
}

pub struct MissingBeerGateway;

#[async_trait]
impl BeerGateway for MissingBeerGateway {
    async fn fetch_beers(&self) -> Result<Vec<Beer>, GatewayError> {
        Err(GatewayError::Transport(
            "no catalog backend is configured".to_string(),
        ))
    }
}

pub struct HttpBeerGateway {
    http: Client,
    endpoint: Url,
}

impl HttpBeerGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, GatewayError> {
        Ok(Self {
            http,
            endpoint: beers_endpoint(base_url)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn beers_endpoint(base_url: &str) -> Result<Url, GatewayError> {
    let invalid = |reason: String| GatewayError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let mut base = Url::parse(base_url.trim()).map_err(|err| invalid(err.to_string()))?;
    if base.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a base".to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(BEERS_ROUTE.trim_start_matches('/'))
        .map_err(|err| invalid(err.to_string()))
}

#[async_trait]
impl BeerGateway for HttpBeerGateway {
    async fn fetch_beers(&self) -> Result<Vec<Beer>, GatewayError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<ApiError>(&body)
                .ok()
                .map(|api_error| ApiException::from(api_error).to_string());
            return Err(GatewayError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let beers: Vec<Beer> =
            serde_json::from_slice(&body).map_err(|err| GatewayError::Parse(err.to_string()))?;
        debug!(endpoint = %self.endpoint, count = beers.len(), "fetched beer collection");
        Ok(beers)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
