//! HTTP fetch adapter for the job portal backend
//!
//! The backend exposes one listing endpoint per resource and wraps results in
//! an envelope:
//!
//! ```text
//! GET {base}/company/get  ->  { "success": true, "companies": [...] }
//! GET {base}/job/get      ->  { "success": true, "jobs": [...] }
//! ```

use crate::core::entity::{Company, Entity, Job};
use crate::core::error::FetchError;
use crate::core::fetch::{FetchAdapter, FetchResult};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

/// Which listing collection an adapter reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingResource {
    Companies,
    Jobs,
}

impl ListingResource {
    /// Path relative to the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            ListingResource::Companies => "company/get",
            ListingResource::Jobs => "job/get",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    companies: Vec<Company>,
    #[serde(default)]
    jobs: Vec<Job>,
}

fn default_success() -> bool {
    true
}

/// Decode a listing envelope body into entities of `resource`'s kind
pub fn decode_listing_body(resource: ListingResource, body: &[u8]) -> FetchResult {
    let envelope: ListingEnvelope =
        serde_json::from_slice(body).map_err(|e| FetchError::decode(e.to_string()))?;

    if !envelope.success {
        return Err(FetchError::server(
            StatusCode::OK.as_u16(),
            envelope
                .message
                .unwrap_or_else(|| "request was not successful".to_string()),
        ));
    }

    Ok(match resource {
        ListingResource::Companies => envelope.companies.into_iter().map(Entity::from).collect(),
        ListingResource::Jobs => envelope.jobs.into_iter().map(Entity::from).collect(),
    })
}

/// reqwest-backed [`FetchAdapter`]
#[derive(Debug, Clone)]
pub struct HttpFetchAdapter {
    client: reqwest::Client,
    url: String,
    resource: ListingResource,
    bearer_token: Option<String>,
}

impl HttpFetchAdapter {
    pub fn new(base_url: &str, resource: ListingResource) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, resource)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, resource: ListingResource) -> Self {
        Self {
            client,
            url: format!("{}/{}", base_url.trim_end_matches('/'), resource.path()),
            resource,
            bearer_token: None,
        }
    }

    /// Send `token` as a bearer credential on every request
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FetchAdapter for HttpFetchAdapter {
    async fn fetch_all(&self) -> FetchResult {
        let mut request = self.client.get(&self.url);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::auth(String::from_utf8_lossy(&body).into_owned()));
        }
        if !status.is_success() {
            return Err(FetchError::server(
                status.as_u16(),
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }

        decode_listing_body(self.resource, &body)
    }

    fn name(&self) -> &str {
        &self.url
    }
}
