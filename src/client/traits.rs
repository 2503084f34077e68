use async_trait::async_trait;
use thiserror::Error;

use crate::domain::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("connection error: {0}")]
    ConnectionError(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("config error: {0}")]
    ConfigError(String),
    #[error("timeout")]
    Timeout,
}

pub type ClientResult<T> = Result<T, ClientError>;

#[async_trait]
pub trait HistoryClient: Send + Sync {
    async fn list_history(&self) -> ClientResult<Vec<HistoryRecord>>;

    async fn get_history(&self, id: &Id) -> ClientResult<HistoryRecord>;

    /// Most recent record for the same target before `current_id`, or `None`
    /// when `current_id` is the first one.
    async fn get_previous(
        &self,
        target_id: &Id,
        target_kind: TargetKind,
        current_id: &Id,
    ) -> ClientResult<Option<HistoryRecord>>;

    async fn lookup_files(&self, ids: &[FileId]) -> ClientResult<Vec<FileInfo>>;
}
