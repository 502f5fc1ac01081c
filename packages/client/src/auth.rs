//! Account endpoints: signup, Aadhaar verification, and the JWT session.
//!
//! The backend authenticates by `full_name` and issues an access/refresh
//! pair from `/api/token/`. Aadhaar verification is a separate post-signup
//! step that flips `is_verified` on the account.

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::tokens::{Claims, TokenPair, decode_claims};
use crate::transport::ApiRequest;
use crate::{ApiClient, ApiError};

pub(crate) const TOKEN_PATH: &str = "/api/token/";
pub(crate) const TOKEN_REFRESH_PATH: &str = "/api/token/refresh/";
pub(crate) const REGISTER_PATH: &str = "/api/user/register/";
pub(crate) const VERIFY_AADHAAR_PATH: &str = "/api/user/verify-aadhaar/";

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    /// Files and tracks complaints.
    Citizen,
    /// Triages complaints and posts announcements.
    DistrictLeader,
}

/// Signup payload for `/api/user/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Unique display name; doubles as the login identifier.
    pub full_name: String,
    /// Plain-text password, hashed server-side.
    pub password: String,
    /// Requested role.
    pub role: Role,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Aadhaar number, verified later via the OTP step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aadhar_number: Option<String>,
}

impl ApiClient {
    /// Signs in, persists the issued token pair, and returns the identity
    /// claims from the access token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] on rejected credentials and
    /// [`ApiError::Decode`] if the token response is malformed.
    pub async fn login(&self, full_name: &str, password: &str) -> Result<Claims, ApiError> {
        let response = self
            .send_public(ApiRequest::post_json(
                TOKEN_PATH,
                serde_json::json!({ "full_name": full_name, "password": password }),
            ))
            .await?;

        let pair: TokenPair = response.parse()?;
        let claims = decode_claims(&pair.access)?;
        self.store().save(&pair)?;
        log::info!("Signed in as {full_name}");
        Ok(claims)
    }

    /// Signs out by discarding stored credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] if the credential file cannot be removed.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.store().clear()
    }

    /// Identity claims of the stored session, if signed in.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the stored access token is not a
    /// readable JWT.
    pub fn current_claims(&self) -> Result<Option<Claims>, ApiError> {
        self.store()
            .load()?
            .map(|pair| decode_claims(&pair.access))
            .transpose()
    }

    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] if the backend rejects the signup,
    /// e.g. a duplicate `full_name`.
    pub async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Request {
            message: format!("failed to serialize signup: {e}"),
        })?;
        self.send_public(ApiRequest::post_json(REGISTER_PATH, body))
            .await?;
        Ok(())
    }

    /// Verifies an Aadhaar number with the OTP sent to its holder.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Status`] on an invalid number, wrong OTP, or
    /// unknown account.
    pub async fn verify_aadhaar(&self, aadhaar_number: &str, otp: &str) -> Result<(), ApiError> {
        self.send_public(ApiRequest::post_json(
            VERIFY_AADHAAR_PATH,
            serde_json::json!({ "aadhaar_number": aadhaar_number, "otp": otp }),
        ))
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::Engine as _;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use serde_json::json;

    use super::*;
    use crate::test_transport::{ScriptedTransport, temp_store};
    use crate::transport::RequestBody;

    fn access_token(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.sig")
    }

    #[tokio::test]
    async fn login_persists_tokens_and_decodes_claims() {
        let access = access_token(json!({
            "full_name": "Asha Patel",
            "role": "citizen",
            "is_verified": false,
        }));
        let transport = Arc::new(ScriptedTransport::new(vec![(
            200,
            json!({ "access": access, "refresh": "refresh-token" }),
        )]));
        let client = ApiClient::with_transport(transport.clone(), temp_store("login"));

        let claims = client.login("Asha Patel", "hunter2").await.unwrap();
        assert_eq!(claims.full_name.as_deref(), Some("Asha Patel"));
        assert_eq!(claims.role.as_deref(), Some("citizen"));

        let pair = client.store().load().unwrap().unwrap();
        assert_eq!(pair.refresh, "refresh-token");

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].path, TOKEN_PATH);
        match &requests[0].body {
            RequestBody::Json(body) => {
                assert_eq!(body["full_name"], "Asha Patel");
                assert_eq!(body["password"], "hunter2");
            }
            other => panic!("unexpected body: {other:?}"),
        }
        drop(requests);
        client.store().clear().unwrap();
    }

    #[tokio::test]
    async fn rejected_login_stores_nothing() {
        let transport = Arc::new(ScriptedTransport::new(vec![(
            401,
            json!({ "detail": "No active account found" }),
        )]));
        let client = ApiClient::with_transport(transport, temp_store("bad-login"));

        let err = client.login("Asha Patel", "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        assert!(client.store().load().unwrap().is_none());
    }

    #[tokio::test]
    async fn register_sends_optional_fields_only_when_set() {
        let transport = Arc::new(ScriptedTransport::new(vec![(200, json!({ "id": 1 }))]));
        let client = ApiClient::with_transport(transport.clone(), temp_store("register"));

        client
            .register(&RegisterRequest {
                full_name: "Asha Patel".to_string(),
                password: "hunter2".to_string(),
                role: Role::Citizen,
                email: None,
                phone: None,
                aadhar_number: Some("123456789012".to_string()),
            })
            .await
            .unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].path, REGISTER_PATH);
        match &requests[0].body {
            RequestBody::Json(body) => {
                assert_eq!(body["role"], "citizen");
                assert_eq!(body["aadhar_number"], "123456789012");
                assert!(body.get("email").is_none());
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn aadhaar_verification_failure_surfaces_status() {
        let transport = Arc::new(ScriptedTransport::new(vec![(
            400,
            json!({ "error": "Invalid OTP" }),
        )]));
        let client = ApiClient::with_transport(transport, temp_store("aadhaar"));

        let err = client
            .verify_aadhaar("123456789012", "000000")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 400, .. }));
    }

    #[test]
    fn role_wire_names_are_snake_case() {
        assert_eq!(Role::DistrictLeader.to_string(), "district_leader");
        assert_eq!(
            serde_json::to_value(Role::Citizen).unwrap(),
            json!("citizen")
        );
    }
}
