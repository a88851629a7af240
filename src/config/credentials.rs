use derive_getters::Getters;
use serde::Deserialize;

/// OAuth client material and the long-lived refresh token.
///
/// Obtaining the refresh token (the interactive consent flow) is outside
/// this tool; paste it into the config once.
#[derive(Debug, Deserialize, Getters)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    refresh_token: String,
}
