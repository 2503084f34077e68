use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::{ClientError, ClientResult, HistoryClient};
use crate::domain::*;

/// REST client for the history service.
pub struct HttpHistoryClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpHistoryClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ClientResult<Self> {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::ConfigError(format!(
                "api url must start with http:// or https://, got {}",
                base_url
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ConfigError(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!("Using history service at {}", base_url);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let request = self.client.get(self.url(path));
        match self.token {
            Some(ref token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> ClientResult<T> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let url = response.url().to_string();

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(format!("{} ({})", what, url)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("GET {} returned {}: {}", url, status, body.trim());
            return Err(ClientError::RequestFailed(format!(
                "{} returned {}",
                what,
                status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::ParseError(format!("invalid {} payload: {}", what, e)))
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::ConnectionError(format!("failed to connect: {}", e))
    } else {
        ClientError::RequestFailed(e.to_string())
    }
}

#[async_trait]
impl HistoryClient for HttpHistoryClient {
    async fn list_history(&self) -> ClientResult<Vec<HistoryRecord>> {
        let records: Vec<HistoryRecord> = self.fetch(self.get("history"), "history list").await?;
        tracing::debug!("loaded {} history records", records.len());
        Ok(records)
    }

    async fn get_history(&self, id: &Id) -> ClientResult<HistoryRecord> {
        self.fetch(self.get(&format!("history/{}", id)), "history record")
            .await
    }

    async fn get_previous(
        &self,
        target_id: &Id,
        target_kind: TargetKind,
        current_id: &Id,
    ) -> ClientResult<Option<HistoryRecord>> {
        let path = format!(
            "history/previous/{}/{}/{}",
            target_id,
            target_kind.as_str(),
            current_id
        );
        match self
            .fetch::<HistoryRecord>(self.get(&path), "previous history record")
            .await
        {
            Ok(record) => Ok(Some(record)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn lookup_files(&self, ids: &[FileId]) -> ClientResult<Vec<FileInfo>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let joined = ids.iter().map(Id::as_str).collect::<Vec<_>>().join(",");
        let request = self.get("files/lookup").query(&[("ids", joined)]);
        self.fetch(request, "file lookup").await
    }
}
