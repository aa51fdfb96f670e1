//! REST client for the remote record service.

use super::remote::{AccountStatus, RemoteRecord, RemoteRecordStore};
use crate::{
    config::SyncConfig,
    errors::{Error, Result},
};
use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder,
    multipart::{Form, Part},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

#[derive(Debug, Deserialize)]
struct AccountResponse {
    status: AccountStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordPayload<'a> {
    record_type: &'a str,
    fields: serde_json::Map<String, serde_json::Value>,
}

/// Record store reached over HTTP.
#[derive(Clone)]
pub struct HttpRecordStore {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for HttpRecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRecordStore")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl HttpRecordStore {
    /// Builds a client for `{endpoint}/containers/{container}`.
    ///
    /// # Errors
    /// Returns `Http` if the client cannot be constructed.
    pub fn new(
        endpoint: &str,
        container: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: format!("{}/containers/{container}", endpoint.trim_end_matches('/')),
            token,
        })
    }

    /// Builds a client from the `[sync]` section, or `None` when no endpoint
    /// is configured.
    pub fn from_config(config: &SyncConfig) -> Result<Option<Self>> {
        let Some(endpoint) = config.endpoint.as_deref() else {
            return Ok(None);
        };
        Self::new(
            endpoint,
            &config.container,
            config.token(),
            Duration::from_secs(config.timeout_secs),
        )
        .map(Some)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl RemoteRecordStore for HttpRecordStore {
    #[instrument(skip(self))]
    async fn account_status(&self) -> Result<AccountStatus> {
        let response = self
            .authorized(self.client.get(format!("{}/account", self.base_url)))
            .send()
            .await
            .map_err(|e| Error::RemoteUnavailable {
                reason: format!("account check failed: {e}"),
            })?;

        if !response.status().is_success() {
            return Err(Error::RemoteUnavailable {
                reason: format!("account check returned {}", response.status()),
            });
        }

        let body: AccountResponse = response.json().await.map_err(|e| Error::RemoteUnavailable {
            reason: format!("unreadable account status: {e}"),
        })?;
        debug!(status = %body.status, "Remote account status");
        Ok(body.status)
    }

    #[instrument(skip(self, record), fields(record_type = %record.record_type))]
    async fn save_record(&self, record: &RemoteRecord) -> Result<()> {
        let payload = RecordPayload {
            record_type: &record.record_type,
            fields: record.scalar_fields(),
        };
        let mut form = Form::new().part(
            "record",
            Part::text(serde_json::to_string(&payload)?).mime_str("application/json")?,
        );
        for (key, path) in record.assets() {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .map_or_else(|| key.to_string(), |name| name.to_string_lossy().into_owned());
            form = form.part(
                key.to_string(),
                Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("application/octet-stream")?,
            );
        }

        let response = self
            .authorized(self.client.post(format!("{}/records", self.base_url)))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, "Remote record upload rejected");
            return Err(Error::Remote {
                message: format!("upload returned {status}: {body}"),
            });
        }
        debug!("Remote record saved");
        Ok(())
    }
}
