//! AWS Secrets Manager integration.

use aws_sdk_secretsmanager::Client as SecretsClient;

use crate::{Error, Result};

/// Get a secret string from Secrets Manager.
///
/// Called once at cold start; nothing is cached between invocations.
pub async fn get_secret(client: &SecretsClient, secret_arn: &str) -> Result<String> {
    let response = client
        .get_secret_value()
        .secret_id(secret_arn)
        .send()
        .await
        .map_err(|e| Error::Aws(format!("Failed to get secret: {}", e)))?;

    response
        .secret_string()
        .map(str::to_string)
        .ok_or_else(|| Error::Aws("Secret has no string value".to_string()))
}
