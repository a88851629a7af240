use derive_getters::Getters;
use log::debug;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    gmail::{ProviderError, Query, wire},
    mailbox::{Header, MessageMetadata, MessageRef},
};

const API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
const LIST_FIELDS: &str = "messages/id,nextPageToken,resultSizeEstimate";

/// One page of a message listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub refs: Vec<MessageRef>,
    pub next_cursor: Option<String>,
    pub result_size_estimate: Option<u64>,
}

#[derive(Debug, Clone, Getters)]
pub struct Profile {
    email_address: String,
    messages_total: Option<u64>,
}

impl Profile {
    pub fn new(email_address: impl Into<String>, messages_total: Option<u64>) -> Self {
        Self {
            email_address: email_address.into(),
            messages_total,
        }
    }
}

/// An authenticated handle to the remote mailbox.
///
/// Passed explicitly into every operation; its lifecycle is owned by the
/// caller. All calls are sequential and may block on network latency.
pub trait MailSession {
    async fn list_messages(
        &self,
        query: &Query,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListPage, ProviderError>;

    async fn message_metadata(
        &self,
        id: &str,
        header_names: &[&str],
    ) -> Result<MessageMetadata, ProviderError>;

    async fn delete_message(&self, id: &str) -> Result<(), ProviderError>;

    async fn batch_delete(&self, ids: &[String]) -> Result<(), ProviderError>;

    async fn batch_trash(&self, ids: &[String]) -> Result<(), ProviderError>;

    async fn profile(&self) -> Result<Profile, ProviderError>;
}

/// `MailSession` over the Gmail REST v1 surface.
pub struct GmailSession {
    http: reqwest::Client,
    access_token: String,
}

impl GmailSession {
    pub fn new(http: reqwest::Client, access_token: String) -> Self {
        Self { http, access_token }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;

        response.json().await.map_err(transport_error)
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<(), ProviderError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;

        Ok(())
    }

    /// The list call carries no timestamps, so each id costs one minimal
    /// fetch to attach the server-assigned `internalDate`.
    async fn resolve_ref(&self, id: String) -> Result<MessageRef, ProviderError> {
        let url = format!("{API_BASE}/messages/{id}");
        let message: wire::Message = self
            .get_json(&url, &[("format", "minimal"), ("fields", "id,internalDate")])
            .await?;

        Ok(MessageRef::new(id, message.internal_date_ms()))
    }
}

impl MailSession for GmailSession {
    async fn list_messages(
        &self,
        query: &Query,
        cursor: Option<&str>,
        page_size: u32,
    ) -> Result<ListPage, ProviderError> {
        let search = query.to_search_string();
        let max_results = page_size.to_string();
        let mut params = vec![
            ("q", search.as_str()),
            ("maxResults", max_results.as_str()),
            ("fields", LIST_FIELDS),
        ];
        if let Some(cursor) = cursor {
            params.push(("pageToken", cursor));
        }

        let url = format!("{API_BASE}/messages");
        let listing: wire::ListResponse = self.get_json(&url, &params).await?;

        let mut refs = Vec::with_capacity(listing.messages.len());
        for listed in listing.messages {
            if listed.id.is_empty() {
                debug!("skipping listed record without id");
                continue;
            }
            refs.push(self.resolve_ref(listed.id).await?);
        }

        Ok(ListPage {
            refs,
            next_cursor: listing.next_page_token,
            result_size_estimate: listing.result_size_estimate,
        })
    }

    async fn message_metadata(
        &self,
        id: &str,
        header_names: &[&str],
    ) -> Result<MessageMetadata, ProviderError> {
        let mut params = vec![("format", "metadata")];
        for name in header_names {
            params.push(("metadataHeaders", *name));
        }

        let url = format!("{API_BASE}/messages/{id}");
        let message: wire::Message = self.get_json(&url, &params).await?;

        let headers = message
            .payload
            .as_ref()
            .map(|payload| {
                payload
                    .headers
                    .iter()
                    .map(|header| Header::new(header.name.clone(), header.value.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let internal_date_ms = message.internal_date_ms();

        Ok(MessageMetadata::new(
            message.id,
            headers,
            message.snippet,
            internal_date_ms,
        ))
    }

    async fn delete_message(&self, id: &str) -> Result<(), ProviderError> {
        let response = self
            .http
            .delete(format!("{API_BASE}/messages/{id}"))
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await?;

        Ok(())
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<(), ProviderError> {
        self.post_json(
            &format!("{API_BASE}/messages/batchDelete"),
            &json!({ "ids": ids }),
        )
        .await
    }

    async fn batch_trash(&self, ids: &[String]) -> Result<(), ProviderError> {
        // The provider has no bulk trash endpoint; adding the TRASH label
        // through batchModify is the documented equivalent.
        self.post_json(
            &format!("{API_BASE}/messages/batchModify"),
            &json!({ "ids": ids, "addLabelIds": ["TRASH"] }),
        )
        .await
    }

    async fn profile(&self) -> Result<Profile, ProviderError> {
        let profile: wire::ProfileResponse =
            self.get_json(&format!("{API_BASE}/profile"), &[]).await?;

        Ok(Profile::new(profile.email_address, profile.messages_total))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = wire::error_message(&body).unwrap_or_else(|| format!("HTTP {status}"));

    Err(ProviderError::from_status(status.as_u16(), detail))
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    ProviderError::Transient(err.to_string())
}
