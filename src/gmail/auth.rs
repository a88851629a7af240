use log::debug;
use serde::Deserialize;

use crate::{
    config::Credentials,
    gmail::{GmailSession, ProviderError},
};

const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges the stored refresh token for a bearer access token and returns
/// a ready session. The interactive consent flow is out of scope; a missing
/// or revoked refresh token surfaces as an authentication error.
pub async fn authenticate(credentials: &Credentials) -> Result<GmailSession, ProviderError> {
    let http = reqwest::Client::new();
    let params = [
        ("client_id", credentials.client_id().as_str()),
        ("client_secret", credentials.client_secret().as_str()),
        ("refresh_token", credentials.refresh_token().as_str()),
        ("grant_type", "refresh_token"),
    ];

    let response = http
        .post(TOKEN_ENDPOINT)
        .form(&params)
        .send()
        .await
        .map_err(|err| ProviderError::Transient(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Auth(format!(
            "token refresh failed with HTTP {status}: {body}"
        )));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|err| ProviderError::Auth(format!("malformed token response: {err}")))?;
    debug!("obtained fresh access token");

    Ok(GmailSession::new(http, token.access_token))
}
