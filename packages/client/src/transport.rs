//! HTTP transport seam.
//!
//! The portal client speaks to the backend through [`HttpTransport`], a
//! trait over whole request/response exchanges. [`ReqwestTransport`] is
//! the real implementation; tests script a mock instead. The transport
//! retries transient failures (timeouts, connection resets, 429, 5xx)
//! with exponential backoff, but reports every final status verbatim so
//! the caller can run its own 401 refresh handling.

use std::time::Duration;

use async_trait::async_trait;

use crate::ApiError;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Maximum retry attempts for transient HTTP errors.
const MAX_RETRIES: u32 = 2;

/// HTTP methods the backend API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
}

/// Body of an outgoing API request.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

/// One field of a multipart form.
#[derive(Debug, Clone)]
pub struct FormPart {
    /// Form field name.
    pub name: String,
    /// Field content.
    pub value: FormValue,
}

/// Content of a multipart form field.
#[derive(Debug, Clone)]
pub enum FormValue {
    /// Plain text field.
    Text(String),
    /// File upload field.
    File {
        /// Raw file bytes.
        bytes: Vec<u8>,
        /// File name sent with the part.
        file_name: String,
        /// MIME type of the content.
        mime: String,
    },
}

/// An API request, addressed by path relative to the backend base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path, e.g. `/api/reports/`.
    pub path: String,
    /// Bearer token to attach, if the endpoint is authenticated.
    pub bearer: Option<String>,
    /// Request body.
    pub body: RequestBody,
}

impl ApiRequest {
    /// A bodyless GET.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    /// A POST with a JSON body.
    #[must_use]
    pub fn post_json(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            bearer: None,
            body: RequestBody::Json(body),
        }
    }

    /// A POST with a multipart body.
    #[must_use]
    pub fn post_multipart(path: impl Into<String>, parts: Vec<FormPart>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            bearer: None,
            body: RequestBody::Multipart(parts),
        }
    }

    /// A PATCH with a JSON body.
    #[must_use]
    pub fn patch_json(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Patch,
            path: path.into(),
            bearer: None,
            body: RequestBody::Json(body),
        }
    }

    /// Attaches a bearer token.
    #[must_use]
    pub fn with_bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }
}

/// A completed API exchange.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode {
            message: format!("response body is not JSON: {e}"),
        })
    }

    /// Deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the body does not match `T`.
    pub fn parse<T: serde::de::DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode {
            message: format!("unexpected response shape: {e}"),
        })
    }
}

/// Executes whole API exchanges against the backend.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Executes `request` and returns the final response.
    ///
    /// Non-2xx statuses are returned, not mapped to errors.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] only when no response could be obtained at
    /// all (connection failure after retries, malformed request).
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// [`HttpTransport`] backed by a shared [`reqwest::Client`].
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport for `base_url` (no trailing slash).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying client cannot be
    /// constructed.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Patch => self.client.patch(&url),
        };

        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer);
        }

        match &request.body {
            RequestBody::Empty => {}
            RequestBody::Json(value) => builder = builder.json(value),
            RequestBody::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match &part.value {
                        FormValue::Text(text) => form.text(part.name.clone(), text.clone()),
                        FormValue::File {
                            bytes,
                            file_name,
                            mime,
                        } => {
                            let file = reqwest::multipart::Part::bytes(bytes.clone())
                                .file_name(file_name.clone())
                                .mime_str(mime)
                                .map_err(|e| ApiError::Request {
                                    message: format!("invalid MIME type {mime}: {e}"),
                                })?;
                            form.part(part.name.clone(), file)
                        }
                    };
                }
                builder = builder.multipart(form);
            }
        }

        Ok(builder)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = Duration::from_millis(500 << attempt);
                log::warn!("  retry {attempt}/{MAX_RETRIES} in {delay:?}...");
                tokio::time::sleep(delay).await;
            }

            match self.build(request)?.send().await {
                Err(e) if is_transient(&e) && attempt < MAX_RETRIES => {
                    log::warn!("  transient error on {}: {e}", request.path);
                }
                Err(e) => return Err(ApiError::Http(e)),
                Ok(response) => {
                    let status = response.status();
                    if (status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error())
                        && attempt < MAX_RETRIES
                    {
                        log::warn!("  HTTP {status} on {}", request.path);
                        continue;
                    }
                    let body = response.text().await?;
                    return Ok(ApiResponse {
                        status: status.as_u16(),
                        body,
                    });
                }
            }
        }

        unreachable!("retry loop exited without returning")
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body() || e.is_decode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let transport = ReqwestTransport::new("http://localhost:8000/").unwrap();
        assert_eq!(transport.base_url, "http://localhost:8000");
    }

    #[test]
    fn success_covers_2xx_only() {
        let ok = ApiResponse {
            status: 201,
            body: String::new(),
        };
        let unauthorized = ApiResponse {
            status: 401,
            body: String::new(),
        };
        assert!(ok.is_success());
        assert!(!unauthorized.is_success());
    }

    #[test]
    fn json_rejects_non_json_bodies() {
        let response = ApiResponse {
            status: 200,
            body: "<html>gateway error</html>".to_string(),
        };
        assert!(matches!(response.json(), Err(ApiError::Decode { .. })));
    }
}
