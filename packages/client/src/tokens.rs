//! Credential persistence and JWT claim inspection.
//!
//! The backend issues an access/refresh token pair at login. The pair is
//! kept in a JSON file so separate CLI invocations share one session;
//! clearing the file is how logout and forced re-authentication work.
//! Access tokens are decoded locally (payload only, no signature check)
//! to surface the identity claims the portal shows in its header.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};

use crate::ApiError;

/// An access/refresh token pair issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived bearer token attached to every authenticated request.
    pub access: String,
    /// Long-lived token exchanged for a new access token on expiry.
    pub refresh: String,
}

/// Identity claims carried in the access token payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    /// Display name of the signed-in user.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Role, `citizen` or `district_leader`.
    #[serde(default)]
    pub role: Option<String>,
    /// Whether Aadhaar verification has completed.
    #[serde(default)]
    pub is_verified: Option<bool>,
}

/// Decodes the claims from a JWT access token without verifying it.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] if the token is not three dot-separated
/// segments with a base64url JSON payload.
pub fn decode_claims(access: &str) -> Result<Claims, ApiError> {
    let payload = access.split('.').nth(1).ok_or_else(|| ApiError::Decode {
        message: "access token is not a JWT".to_string(),
    })?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ApiError::Decode {
            message: format!("access token payload is not base64url: {e}"),
        })?;

    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
        message: format!("access token payload is not JSON: {e}"),
    })
}

/// File-backed storage for the signed-in session's token pair.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default credentials path: `$HOME/.config/samadhan/credentials.json`,
    /// falling back to the system temp directory when `HOME` is unset.
    #[must_use]
    pub fn default_path() -> PathBuf {
        std::env::var_os("HOME").map_or_else(
            || std::env::temp_dir().join("samadhan-credentials.json"),
            |home| {
                PathBuf::from(home)
                    .join(".config")
                    .join("samadhan")
                    .join("credentials.json")
            },
        )
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored pair, if one exists.
    ///
    /// A corrupt file is treated as signed out.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] on read failures other than the file not
    /// existing.
    pub fn load(&self) -> Result<Option<TokenPair>, ApiError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ApiError::Io(e)),
        };

        match serde_json::from_slice(&bytes) {
            Ok(pair) => Ok(Some(pair)),
            Err(e) => {
                log::warn!(
                    "Ignoring corrupt credentials file {}: {e}",
                    self.path.display()
                );
                Ok(None)
            }
        }
    }

    /// Persists `pair`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] if the file cannot be written.
    pub fn save(&self, pair: &TokenPair) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(pair).map_err(|e| ApiError::Decode {
            message: format!("failed to serialize credentials: {e}"),
        })?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Removes the stored pair. Missing file is fine.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Io`] if an existing file cannot be removed.
    pub fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> TokenStore {
        TokenStore::new(std::env::temp_dir().join(format!("samadhan-test-{name}.json")))
    }

    fn jwt_with_payload(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.signature")
    }

    #[test]
    fn save_load_clear_round_trip() {
        let store = temp_store("round-trip");
        let pair = TokenPair {
            access: "a".to_string(),
            refresh: "r".to_string(),
        };

        store.save(&pair).unwrap();
        assert_eq!(store.load().unwrap(), Some(pair));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_signed_out() {
        let store = temp_store("corrupt");
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.clear().unwrap();
    }

    #[test]
    fn claims_decode_from_access_token() {
        let token = jwt_with_payload(&serde_json::json!({
            "full_name": "Asha Patel",
            "role": "district_leader",
            "is_verified": true,
            "exp": 1_700_000_000,
        }));

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.full_name.as_deref(), Some("Asha Patel"));
        assert_eq!(claims.role.as_deref(), Some("district_leader"));
        assert_eq!(claims.is_verified, Some(true));
    }

    #[test]
    fn missing_claims_default_to_none() {
        let token = jwt_with_payload(&serde_json::json!({ "exp": 1 }));
        let claims = decode_claims(&token).unwrap();
        assert!(claims.full_name.is_none());
        assert!(claims.role.is_none());
        assert!(claims.is_verified.is_none());
    }

    #[test]
    fn non_jwt_tokens_are_rejected() {
        assert!(decode_claims("opaque-token").is_err());
        assert!(decode_claims("a.!!!.c").is_err());
    }
}
