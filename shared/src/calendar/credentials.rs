//! Google service-account credentials.
//!
//! The key is loaded once at cold start. Each request exchanges a freshly
//! signed JWT assertion for a short-lived access token.

use std::fmt;
use std::path::Path;

use aws_sdk_secretsmanager::Client as SecretsClient;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CredentialsSource;
use crate::secrets::get_secret;
use crate::{Error, Result};

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Fields of a service-account JSON key used for token exchange.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Claims of the JWT-bearer assertion.
#[derive(Debug, Serialize, Deserialize)]
struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl ServiceAccountKey {
    /// Parse a service-account JSON key.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Credentials(format!("Invalid service account key: {}", e)))
    }

    /// Read a service-account JSON key file.
    pub async fn from_file(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            Error::Credentials(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Load the key from wherever the configuration points.
    pub async fn load(source: &CredentialsSource) -> Result<Self> {
        match source {
            CredentialsSource::File(path) => Self::from_file(path).await,
            CredentialsSource::Secret(arn) => {
                let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
                let client = SecretsClient::new(&config);
                Self::from_json(&get_secret(&client, arn).await?)
            }
        }
    }

    /// Sign a JWT-bearer assertion for `scope`.
    fn assertion(&self, scope: &str) -> Result<String> {
        let iat = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: scope.to_string(),
            aud: self.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .map_err(|e| Error::Credentials(format!("Invalid private key: {}", e)))?;

        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| Error::Credentials(format!("Failed to sign assertion: {}", e)))
    }

    /// Exchange a signed assertion for an access token.
    pub async fn access_token(&self, http: &reqwest::Client, scope: &str) -> Result<String> {
        let assertion = self.assertion(scope)?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        let response = http
            .post(&self.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::Credentials(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Credentials(format!(
                "Token exchange failed: HTTP {} - {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::Credentials(format!("Failed to parse token response: {}", e)))?;

        debug!(client_email = %self.client_email, "Obtained access token");
        Ok(token.access_token)
    }
}
