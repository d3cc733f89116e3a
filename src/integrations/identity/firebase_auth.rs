// src/integrations/identity/firebase_auth.rs
//
// Firebase Authentication over the Identity Toolkit REST API.
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Provider error codes are translated into readable messages here

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::{AuthenticatedIdentity, Credentials, IdentityProvider};
use crate::error::{AppError, AppResult};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    id_token: String,
    refresh_token: String,
    /// Seconds, as a decimal string
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct FirebaseAuthClient {
    base_url: String,
    api_key: String,
    http_client: Client,
}

impl FirebaseAuthClient {
    pub fn new(api_key: impl Into<String>) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
            api_key: api_key.into(),
            http_client,
        })
    }

    /// Point the client at another endpoint, e.g. the auth emulator
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/accounts:{}", self.base_url.trim_end_matches('/'), method)
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> AppResult<T> {
        let response = self
            .http_client
            .post(self.endpoint(method))
            .query(&[("key", self.api_key.as_str())])
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::External(format!(
                    "Could not reach the identity provider. Check your internet connection: {}",
                    e
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let code = response
                .json::<ErrorEnvelope>()
                .await
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.to_string());
            log::warn!("Identity provider rejected {}: {}", method, code);
            return Err(AppError::Auth(describe_error(&code)));
        }

        response.json().await.map_err(|e| {
            AppError::External(format!("Failed to parse identity provider response: {}", e))
        })
    }
}

fn into_identity(response: TokenResponse) -> AppResult<AuthenticatedIdentity> {
    let seconds: i64 = response.expires_in.parse().map_err(|_| {
        AppError::External(format!("Invalid token lifetime: {}", response.expires_in))
    })?;

    Ok(AuthenticatedIdentity {
        uid: response.local_id,
        email: response.email,
        display_name: response.display_name.filter(|n| !n.is_empty()),
        id_token: response.id_token,
        refresh_token: response.refresh_token,
        expires_at: Utc::now() + chrono::Duration::seconds(seconds),
    })
}

/// Translate an Identity Toolkit error code into a message for the user
///
/// Codes may carry a suffix, e.g. `WEAK_PASSWORD : Password should be...`.
pub fn describe_error(code: &str) -> String {
    let key = code.split(':').next().unwrap_or(code).trim();
    let message = match key {
        "EMAIL_NOT_FOUND" => "No account exists with this email",
        "INVALID_PASSWORD" => "Incorrect password",
        "INVALID_LOGIN_CREDENTIALS" => "Incorrect email or password",
        "EMAIL_EXISTS" => "An account with this email already exists",
        "WEAK_PASSWORD" => "Password must be at least 6 characters",
        "INVALID_EMAIL" => "Invalid email",
        "TOO_MANY_ATTEMPTS_TRY_LATER" => "Too many attempts. Try again later",
        "USER_DISABLED" => "This account has been disabled",
        "OPERATION_NOT_ALLOWED" => "Email/password sign-in is disabled for this project",
        _ => return format!("Authentication failed: {}", code),
    };
    message.to_string()
}

#[async_trait]
impl IdentityProvider for FirebaseAuthClient {
    async fn sign_up(
        &self,
        credentials: Credentials,
        display_name: Option<String>,
    ) -> AppResult<AuthenticatedIdentity> {
        let mut body = json!({
            "email": credentials.email,
            "password": credentials.password,
            "returnSecureToken": true,
        });
        if let Some(name) = display_name.filter(|n| !n.trim().is_empty()) {
            body["displayName"] = Value::String(name);
        }

        let response: TokenResponse = self.call("signUp", body).await?;
        into_identity(response)
    }

    async fn sign_in(&self, credentials: Credentials) -> AppResult<AuthenticatedIdentity> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password,
            "returnSecureToken": true,
        });

        let response: TokenResponse = self.call("signInWithPassword", body).await?;
        into_identity(response)
    }

    async fn send_password_reset(&self, email: String) -> AppResult<()> {
        let body = json!({
            "requestType": "PASSWORD_RESET",
            "email": email,
        });

        let _: Value = self.call("sendOobCode", body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let client = FirebaseAuthClient::new("key").unwrap();
        assert_eq!(
            client.endpoint("signUp"),
            "https://identitytoolkit.googleapis.com/v1/accounts:signUp"
        );
    }

    #[test]
    fn test_error_codes_are_translated() {
        assert_eq!(describe_error("EMAIL_EXISTS"), "An account with this email already exists");
        assert_eq!(
            describe_error("WEAK_PASSWORD : Password should be at least 6 characters"),
            "Password must be at least 6 characters"
        );
        assert_eq!(describe_error("SOMETHING_NEW"), "Authentication failed: SOMETHING_NEW");
    }

    #[test]
    fn test_token_response_maps_to_identity() {
        let response: TokenResponse = serde_json::from_value(json!({
            "localId": "uid-1",
            "email": "ana@uni.edu",
            "displayName": "",
            "idToken": "id",
            "refreshToken": "refresh",
            "expiresIn": "3600"
        }))
        .unwrap();

        let identity = into_identity(response).unwrap();
        assert_eq!(identity.uid, "uid-1");
        assert_eq!(identity.display_name, None);
        assert!(!identity.is_expired());
    }
}
