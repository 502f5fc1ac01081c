#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Authenticated client for the grievance portal backend.
//!
//! All traffic goes through the [`transport::HttpTransport`] seam. On a
//! 401 the client exchanges its refresh token for a new access token and
//! retries the original request exactly once; if the refresh itself is
//! rejected the stored credentials are cleared and the call fails with
//! [`ApiError::SessionExpired`], forcing a fresh login.

pub mod announcements;
pub mod auth;
pub mod reports;
pub mod tokens;
pub mod transport;

use std::sync::Arc;

use thiserror::Error;

use crate::tokens::{TokenPair, TokenStore};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};

/// Errors from talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request.
    #[error("Backend returned HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error detail from the response body.
        message: String,
    },

    /// No stored credentials; the operation requires a login.
    #[error("Not signed in")]
    Unauthenticated,

    /// The session could not be refreshed; credentials were cleared.
    #[error("Session expired, please sign in again")]
    SessionExpired,

    /// A response or token could not be decoded.
    #[error("Decode error: {message}")]
    Decode {
        /// Description of the decode failure.
        message: String,
    },

    /// A request could not be constructed.
    #[error("Request error: {message}")]
    Request {
        /// Description of the request failure.
        message: String,
    },

    /// Credential file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Client for the portal backend API.
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    store: TokenStore,
}

impl ApiClient {
    /// Creates a client for `base_url` with the default credential path.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_store(base_url, TokenStore::new(TokenStore::default_path()))
    }

    /// Creates a client for `base_url` with an explicit credential store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn with_store(base_url: &str, store: TokenStore) -> Result<Self, ApiError> {
        Ok(Self {
            transport: Arc::new(ReqwestTransport::new(base_url)?),
            store,
        })
    }

    /// Creates a client over an arbitrary transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HttpTransport>, store: TokenStore) -> Self {
        Self { transport, store }
    }

    /// The credential store backing this client.
    #[must_use]
    pub const fn store(&self) -> &TokenStore {
        &self.store
    }

    /// Sends an unauthenticated request and maps non-2xx to errors.
    pub(crate) async fn send_public(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let response = self.transport.execute(&request).await?;
        check(response)
    }

    /// Sends an authenticated request with refresh-once 401 handling.
    pub(crate) async fn send_authed(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let Some(pair) = self.store.load()? else {
            return Err(ApiError::Unauthenticated);
        };

        let first = self
            .transport
            .execute(&request.clone().with_bearer(&pair.access))
            .await?;
        if first.status != 401 {
            return check(first);
        }

        log::debug!("Access token rejected on {}, refreshing", request.path);
        let access = self.refresh(&pair).await?;

        let retried = self.transport.execute(&request.with_bearer(&access)).await?;
        if retried.status == 401 {
            // Fresh token rejected too; the session is gone.
            self.store.clear()?;
            return Err(ApiError::SessionExpired);
        }
        check(retried)
    }

    /// Exchanges the refresh token for a new access token, persisting it.
    ///
    /// Clears stored credentials if the backend rejects the refresh.
    async fn refresh(&self, pair: &TokenPair) -> Result<String, ApiError> {
        let request = ApiRequest::post_json(
            auth::TOKEN_REFRESH_PATH,
            serde_json::json!({ "refresh": pair.refresh }),
        );
        let response = self.transport.execute(&request).await?;

        if !response.is_success() {
            log::info!("Token refresh rejected (HTTP {}), signing out", response.status);
            self.store.clear()?;
            return Err(ApiError::SessionExpired);
        }

        let body = response.json()?;
        let Some(access) = body.get("access").and_then(serde_json::Value::as_str) else {
            self.store.clear()?;
            return Err(ApiError::Decode {
                message: "refresh response is missing the access token".to_string(),
            });
        };

        self.store.save(&TokenPair {
            access: access.to_string(),
            refresh: pair.refresh.clone(),
        })?;
        Ok(access.to_string())
    }
}

/// Maps non-2xx responses to [`ApiError::Status`].
fn check(response: ApiResponse) -> Result<ApiResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }

    // Django REST framework puts human-readable errors under "detail".
    let message = response
        .json()
        .ok()
        .and_then(|body| {
            body.get("detail")
                .and_then(serde_json::Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| response.body.chars().take(200).collect());

    Err(ApiError::Status {
        status: response.status,
        message,
    })
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::test_transport::{ScriptedTransport, signed_in_store, temp_store};
    use super::*;
    use crate::transport::Method;

    #[tokio::test]
    async fn expired_access_token_refreshes_once_and_retries() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            (401, json!({ "detail": "token expired" })),
            (200, json!({ "access": "fresh-access" })),
            (200, json!([])),
        ]));
        let store = signed_in_store("refresh-retry");
        let client = ApiClient::with_transport(transport.clone(), store);

        let response = client
            .send_authed(ApiRequest::get("/api/reports/"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        assert_eq!(
            transport.request_paths(),
            vec!["/api/reports/", "/api/token/refresh/", "/api/reports/"],
        );

        // The refreshed access token was persisted for later invocations.
        let pair = client.store().load().unwrap().unwrap();
        assert_eq!(pair.access, "fresh-access");
        assert_eq!(pair.refresh, "refresh-token");

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[2].bearer.as_deref(), Some("fresh-access"));
        client.store().clear().unwrap();
    }

    #[tokio::test]
    async fn rejected_refresh_clears_credentials() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            (401, json!({ "detail": "token expired" })),
            (401, json!({ "detail": "refresh expired" })),
        ]));
        let store = signed_in_store("refresh-rejected");
        let client = ApiClient::with_transport(transport.clone(), store);

        let err = client
            .send_authed(ApiRequest::get("/api/reports/"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired));
        assert!(client.store().load().unwrap().is_none());

        // No third request: the original call is not retried.
        assert_eq!(transport.request_paths().len(), 2);
    }

    #[tokio::test]
    async fn refresh_happens_at_most_once() {
        // Even if the backend keeps answering 401 with a working refresh
        // endpoint, the client retries the original request exactly once.
        let transport = Arc::new(ScriptedTransport::new(vec![
            (401, json!({ "detail": "token expired" })),
            (200, json!({ "access": "fresh-access" })),
            (401, json!({ "detail": "still expired" })),
        ]));
        let store = signed_in_store("refresh-once");
        let client = ApiClient::with_transport(transport.clone(), store);

        let err = client
            .send_authed(ApiRequest::get("/api/reports/"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::SessionExpired));
        assert_eq!(transport.request_paths().len(), 3);
        assert!(client.store().load().unwrap().is_none());
    }

    #[tokio::test]
    async fn authed_calls_require_a_session() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let client = ApiClient::with_transport(transport.clone(), temp_store("no-session"));

        let err = client
            .send_authed(ApiRequest::get("/api/reports/"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated));
        assert!(transport.request_paths().is_empty());
    }

    #[tokio::test]
    async fn backend_errors_surface_detail() {
        let transport = Arc::new(ScriptedTransport::new(vec![(
            400,
            json!({ "detail": "description too long" }),
        )]));
        let client = ApiClient::with_transport(transport, temp_store("detail"));

        let err = client
            .send_public(ApiRequest::post_json("/api/user/register/", json!({})))
            .await
            .unwrap_err();
        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "description too long");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn request_builders_set_method() {
        assert_eq!(ApiRequest::get("/a").method, Method::Get);
        assert_eq!(
            ApiRequest::patch_json("/a", json!({})).method,
            Method::Patch
        );
    }
}
