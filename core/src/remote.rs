//! Async host for `ListClient` requests.
//!
//! # Design
//! `RemoteListClient` pairs the stateless builder with a `reqwest::Client`
//! and performs exactly one network exchange per call. Whatever status comes
//! back is returned as an `HttpResponse`; only a failure to obtain a response
//! becomes `ApiError::Transport`. No retries, no caching, no status mapping.
//!
//! The inner `reqwest::Client` is cheap to clone and safe to share, so
//! concurrent calls need no coordination here.

use reqwest::{redirect::Policy, Method, Url};
use tracing::debug;

use crate::client::ListClient;
use crate::config::ListServiceConfig;
use crate::error::ApiError;
use crate::etag::EntityTag;
use crate::http::{header, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AccessToken, RequestBody};

#[derive(Debug, Clone)]
pub struct RemoteListClient {
    requests: ListClient,
    http: reqwest::Client,
}

impl RemoteListClient {
    /// Build a client from configuration, applying its optional timeout.
    /// Redirects are never followed: a 3xx goes back to the caller as is.
    pub fn new(config: ListServiceConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().redirect(Policy::none());
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self::with_http_client(config, http))
    }

    /// Reuse an existing `reqwest::Client` (shared pool, custom TLS, proxies).
    ///
    /// The client's redirect policy is used unchanged; build it with
    /// `redirect(Policy::none())` to keep 3xx responses visible.
    pub fn with_http_client(config: ListServiceConfig, http: reqwest::Client) -> Self {
        Self {
            requests: ListClient::new(config),
            http,
        }
    }

    /// The request builder, for URI helpers and configuration.
    pub fn requests(&self) -> &ListClient {
        &self.requests
    }

    pub async fn read(
        &self,
        uri: &str,
        token: &AccessToken,
        etag: &EntityTag,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.requests.build_read(uri, token, etag)?;
        self.execute(request).await
    }

    pub async fn create(
        &self,
        uri: &str,
        token: &AccessToken,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.requests.build_create(uri, token, body.into())?;
        self.execute(request).await
    }

    pub async fn update(
        &self,
        uri: &str,
        token: &AccessToken,
        etag: &EntityTag,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.requests.build_update(uri, token, etag, body.into())?;
        self.execute(request).await
    }

    pub async fn delete(
        &self,
        uri: &str,
        token: &AccessToken,
        etag: &EntityTag,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.requests.build_delete(uri, token, etag)?;
        self.execute(request).await
    }

    /// Send a prebuilt request and return the response as data.
    pub async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Delete => Method::DELETE,
        };
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            if_match = request.header(header::IF_MATCH),
            if_none_match = request.header(header::IF_NONE_MATCH),
            "sending list request"
        );

        let url = Url::parse(&request.url).map_err(|e| ApiError::InvalidUri {
            uri: request.url.clone(),
            reason: e.to_string(),
        })?;
        let mut builder = self.http.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            debug!(url = %request.url, error = %e, "list request failed before a response");
            ApiError::from(e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        debug!(url = %request.url, status, "list response received");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
