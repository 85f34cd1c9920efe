//! Authenticated request gateway for the library REST service.
//!
//! Every feature client goes through [`Gateway`] so that credential injection
//! and response handling stay identical across screens. The gateway reads the
//! session it was built with and never writes it. Calls are one-shot: no
//! timeout, retry or cancellation is applied here.

mod error;

pub use error::{GENERIC_FAILURE, GatewayError};

use crate::session::SessionStore;
use anyhow::{Context, Result, anyhow};
use reqwest::{
    Client, Method, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue},
    multipart::Form,
};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{fmt, sync::Arc};
use tracing::{Instrument, debug, info_span, warn};
use url::Url;

/// Default base URL of the library service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/svc/library";

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl GatewayConfig {
    /// Validates the base URL; only `http` and `https` are accepted.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute HTTP(S) URL.
    pub fn new(base_url: &str) -> Result<Self> {
        let url = Url::parse(base_url.trim())
            .with_context(|| format!("invalid library API URL: {base_url}"))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => return Err(anyhow!("unsupported scheme {scheme} in library API URL")),
        }

        if url.host().is_none() {
            return Err(anyhow!("library API URL has no host: {base_url}"));
        }

        Ok(Self {
            base_url: base_url.trim().to_string(),
            user_agent: crate::APP_USER_AGENT.to_string(),
        })
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: crate::APP_USER_AGENT.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl fmt::Debug for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("session", &"***")
            .finish_non_exhaustive()
    }
}

impl Gateway {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &GatewayConfig, session: Arc<dyn SessionStore>) -> Result<Self> {
        let client = Client::builder().user_agent(&config.user_agent).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    /// Sends an authenticated JSON request and returns the decoded body.
    ///
    /// # Errors
    /// Returns [`GatewayError::NoSession`] without any network I/O when no
    /// token is stored, and [`GatewayError::RequestFailed`] for every remote or
    /// transport failure.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(String, String)],
    ) -> Result<Value, GatewayError> {
        let token = self.require_token(&method, path)?;
        let headers = json_headers(headers, Some(&token))?;
        self.dispatch(method, path, body, headers).await
    }

    /// Same as [`Gateway::request`] but decodes the body into `T`.
    ///
    /// # Errors
    /// See [`Gateway::request`]; a body that does not match `T` is a
    /// [`GatewayError::RequestFailed`].
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(String, String)],
    ) -> Result<T, GatewayError> {
        let value = self.request(method, path, body, headers).await?;
        decode_value(value)
    }

    /// Sends an authenticated JSON request whose success body is not needed.
    /// Failures are normalized exactly like [`Gateway::request`].
    ///
    /// # Errors
    /// See [`Gateway::request`].
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(String, String)],
    ) -> Result<(), GatewayError> {
        let token = self.require_token(&method, path)?;
        let headers = json_headers(headers, Some(&token))?;
        self.send(method, path, body, headers).await.map(|_| ())
    }

    /// Sends a JSON request without session credentials. Used by registration,
    /// which runs before a token exists. Caller headers are sent as given,
    /// including any `Authorization`.
    ///
    /// # Errors
    /// Returns [`GatewayError::RequestFailed`] for every remote or transport failure.
    pub async fn request_anonymous(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(String, String)],
    ) -> Result<Value, GatewayError> {
        let headers = json_headers(headers, None)?;
        let body = self.send(method, path, body, headers).await?;
        decode_success_body(&body)
    }

    /// Anonymous request returning the raw success body. Login needs this
    /// because the service may answer with a bare token instead of JSON.
    ///
    /// # Errors
    /// Returns [`GatewayError::RequestFailed`] for every remote or transport failure.
    pub async fn request_anonymous_text(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: &[(String, String)],
    ) -> Result<String, GatewayError> {
        let headers = json_headers(headers, None)?;
        let body = self.send(method, path, body, headers).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Posts a multipart form with the session token. No JSON content type is
    /// set so the client can emit the multipart boundary.
    ///
    /// # Errors
    /// Same as [`Gateway::request`].
    pub async fn upload(&self, path: &str, form: Form) -> Result<(), GatewayError> {
        let token = self.require_token(&Method::POST, path)?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer_value(&token)?);

        let url = self.url(path);
        let span = info_span!("gateway.upload", http.method = "POST", url = %url);
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .multipart(form)
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        read_success_body(response).await.map(|_| ())
    }

    fn require_token(&self, method: &Method, path: &str) -> Result<SecretString, GatewayError> {
        self.session.token().ok_or_else(|| {
            debug!(http.method = %method, path, "no session token, request not sent");
            GatewayError::NoSession
        })
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Value, GatewayError> {
        let body = self.send(method, path, body, headers).await?;
        decode_success_body(&body)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> Result<Vec<u8>, GatewayError> {
        let url = self.url(path);
        let span = info_span!("gateway.request", http.method = %method, url = %url);

        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|err| GatewayError::request(format!("Failed to encode request: {err}")))?;
            builder = builder.body(payload);
        }

        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;

        read_success_body(response).await
    }
}

/// Builds a URL from an explicit base URL and the provided path.
fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Base JSON headers, caller headers on top, then the bearer token. A caller
/// `Authorization` is dropped whenever a token is attached.
fn json_headers(
    extra: &[(String, String)],
    token: Option<&SecretString>,
) -> Result<HeaderMap, GatewayError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| GatewayError::request(format!("Request error: invalid header name {name}")))?;

        if token.is_some() && name == AUTHORIZATION {
            warn!("caller-supplied Authorization header ignored");
            continue;
        }

        let mut value = HeaderValue::from_str(value)
            .map_err(|_| GatewayError::request(format!("Request error: invalid value for {name}")))?;
        if name == AUTHORIZATION {
            value.set_sensitive(true);
        }
        headers.insert(name, value);
    }

    if let Some(token) = token {
        headers.insert(AUTHORIZATION, bearer_value(token)?);
    }

    Ok(headers)
}

fn bearer_value(token: &SecretString) -> Result<HeaderValue, GatewayError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|_| GatewayError::request("Request error: session token is not a valid header"))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Maps transport errors into `RequestFailed` with timeout detection.
fn map_request_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::request("Request timed out. Please try again.")
    } else {
        GatewayError::request(format!("Unable to reach the server: {err}"))
    }
}

/// Total status branch: 2xx yields the body, everything else is `RequestFailed`.
async fn read_success_body(response: Response) -> Result<Vec<u8>, GatewayError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_request_error)?;

    if status.is_success() {
        Ok(body.to_vec())
    } else {
        let message = failure_message(&body);
        warn!(http.status = status.as_u16(), "request failed: {message}");
        Err(GatewayError::RequestFailed(message))
    }
}

fn decode_success_body(body: &[u8]) -> Result<Value, GatewayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body)
        .map_err(|err| GatewayError::request(format!("Failed to decode response: {err}")))
}

fn failure_message(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

pub(crate) fn decode_value<T: DeserializeOwned>(value: Value) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|err| GatewayError::request(format!("Failed to decode response: {err}")))
}
