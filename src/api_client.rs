use crate::report::Reporter;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Value, json};
use std::time::Duration;

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// One line summary of an error and all of its causes.
pub fn error_chain_message(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut current = e.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}

#[derive(thiserror::Error)]
pub enum ApiError {
    #[error("Failed to connect to {url}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Request to {url} timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to encode the request payload")]
    Encode(#[source] serde_json::Error),
    #[error("Response from {url} ({status}) is not valid JSON")]
    Decode {
        url: String,
        status: StatusCode,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to build the HTTP client")]
    ClientBuild(#[source] reqwest::Error),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl std::fmt::Debug for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ApiError {
    fn from_transport(error: reqwest::Error, url: &str) -> Self {
        if error.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
                source: error,
            }
        } else if error.is_connect() {
            ApiError::Connect {
                url: url.to_string(),
                source: error,
            }
        } else {
            ApiError::Transport(error)
        }
    }
}

/// A call to be made against one service. Payload serialization errors are
/// kept until the request is sent, like `reqwest::RequestBuilder` does.
#[derive(Debug)]
pub struct ApiRequest {
    method: Method,
    endpoint: String,
    body: Option<Result<Value, serde_json::Error>>,
    query: Option<Result<Value, serde_json::Error>>,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            query: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// JSON body. Also allowed on GET, some services read filters from it.
    pub fn json(mut self, body: impl serde::Serialize) -> Self {
        self.body = Some(serde_json::to_value(body));
        self
    }

    pub fn query(mut self, query: impl serde::Serialize) -> Self {
        self.query = Some(serde_json::to_value(query));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Parsed outcome of a call.
///
/// JSON responses are kept as they are. Other responses are wrapped as
/// `{"status_code": .., "text": ..}` and failed calls as `{"error": ..}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    status: Option<StatusCode>,
    body: Value,
}

impl ApiResponse {
    pub fn new(status: Option<StatusCode>, body: Value) -> Self {
        Self { status, body }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(None, json!({ "error": message.into() }))
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// `true` when no HTTP response was received at all.
    pub fn is_failed(&self) -> bool {
        self.status.is_none()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.body.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// JSON pointer lookup, e.g. `/data/id`.
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.body.pointer(pointer)
    }

    /// String form of a scalar at `pointer`; numbers are formatted.
    pub fn text_at(&self, pointer: &str) -> Option<String> {
        match self.pointer(pointer)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn i64_at(&self, pointer: &str) -> Option<i64> {
        match self.pointer(pointer)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Case-insensitive search through the serialized body.
    pub fn mentions(&self, needle: &str) -> bool {
        self.body
            .to_string()
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

/// HTTP client bound to one service, with an optional bearer token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    service_name: String,
    base_url: String,
    http_client: Client,
    token: Option<Secret<String>>,
    reporter: Reporter,
}

impl ApiClient {
    pub fn new(
        service_name: impl Into<String>,
        base_url: &str,
        timeout: Duration,
        reporter: Reporter,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;
        Ok(Self {
            service_name: service_name.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
            token: None,
            reporter,
        })
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn set_token(&mut self, token: Secret<String>) {
        self.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn token(&self) -> Option<&Secret<String>> {
        self.token.as_ref()
    }

    /// Send `request`, printing the request and response trace.
    #[tracing::instrument(
        name = "Calling service",
        skip(self, request),
        fields(
            service = %self.service_name,
            method = %request.method,
            endpoint = %request.endpoint,
            status = tracing::field::Empty
        )
    )]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let ApiRequest {
            method,
            endpoint,
            body,
            query,
        } = request;
        let url = format!("{}{}", self.base_url, endpoint);

        self.reporter
            .request(&self.service_name, method.as_str(), &endpoint);
        let body = body.transpose().map_err(ApiError::Encode)?;
        let query = query.transpose().map_err(ApiError::Encode)?;
        if let Some(body) = body.as_ref().filter(|b| !is_blank(b)) {
            self.reporter.request_body(body);
        }
        if let Some(query) = query.as_ref().filter(|q| !is_blank(q)) {
            self.reporter.request_params(query);
        }

        let mut builder = self.http_client.request(method, &url);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }
        if let Some(query) = &query {
            builder = builder.query(query);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::from_transport(e, &url))?;
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());
        self.reporter.status(status.as_u16());

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::from_transport(e, &url))?;

        if is_json {
            let body: Value = serde_json::from_str(&text).map_err(|source| ApiError::Decode {
                url: url.clone(),
                status,
                source,
            })?;
            self.reporter.response_json(&body);
            Ok(ApiResponse::new(Some(status), body))
        } else {
            self.reporter.response_text(&text);
            Ok(ApiResponse::new(
                Some(status),
                json!({ "status_code": status.as_u16(), "text": text }),
            ))
        }
    }

    /// Like [`ApiClient::send`], but failures are reported and turned into an
    /// `{"error": ..}` response instead of being returned.
    pub async fn call(&self, request: ApiRequest) -> ApiResponse {
        match self.send(request).await {
            Ok(response) => response,
            Err(e) => {
                let message = error_chain_message(&e);
                tracing::error!(service = %self.service_name, "Request failed: {:?}", e);
                self.reporter.error(&message);
                ApiResponse::failed(message)
            }
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
