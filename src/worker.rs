use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::action::Action;
use crate::client::{ClientError, HistoryClient};
use crate::diff::{DiffError, HistoryDiff, RecordDetail};
use crate::domain::*;

#[derive(Debug)]
pub enum CliRequest {
    LoadHistory,
    LoadRecord { id: Id },
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Diff(#[from] DiffError),
}

#[derive(Clone)]
pub struct CliHandle {
    tx: mpsc::UnboundedSender<CliRequest>,
}

impl CliHandle {
    pub fn send(&self, request: CliRequest) {
        let _ = self.tx.send(request);
    }
}

pub struct CliWorker {
    client: Arc<dyn HistoryClient>,
    rx: mpsc::UnboundedReceiver<CliRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl CliWorker {
    pub fn new(
        client: Arc<dyn HistoryClient>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, CliHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = CliHandle { tx };
        let worker = Self {
            client,
            rx,
            action_tx,
        };
        (worker, handle)
    }

    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let action = self.process(request).await;
            if self.action_tx.send(action).is_err() {
                break;
            }
        }
    }

    async fn process(&self, request: CliRequest) -> Action {
        match request {
            CliRequest::LoadHistory => match self.client.list_history().await {
                Ok(records) => Action::HistoryLoaded(records),
                Err(e) => Action::Error(format!("failed to load history: {}", e)),
            },
            CliRequest::LoadRecord { id } => match load_record(self.client.as_ref(), &id).await {
                Ok(detail) => Action::RecordLoaded(Box::new(detail)),
                Err(e) => {
                    tracing::warn!("history record {} failed to load: {}", id, e);
                    Action::RecordFailed(id, e.to_string())
                }
            },
        }
    }
}

/// Fetches a record, its predecessor when it is an edit, and the names of
/// the files the diff mentions. A failed name lookup only costs the names.
pub async fn load_record(client: &dyn HistoryClient, id: &Id) -> Result<RecordDetail, LoadError> {
    let record = client.get_history(id).await?;

    let prior = if record.action_kind == ActionKind::Edit {
        client
            .get_previous(&record.target_id, record.target_kind, &record.id)
            .await?
    } else {
        None
    };

    let diff = HistoryDiff::build(&record, prior.as_ref())?;

    let file_ids = diff.file_ids();
    let file_names = if file_ids.is_empty() || !record.has_files() {
        HashMap::new()
    } else {
        match client.lookup_files(&file_ids).await {
            Ok(files) => files
                .into_iter()
                .map(|f| (f.file_id, f.display_name))
                .collect(),
            Err(e) => {
                tracing::warn!("file lookup for record {} failed: {}", record.id, e);
                HashMap::new()
            }
        }
    };

    Ok(RecordDetail {
        record,
        diff,
        file_names,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::client::ClientResult;
    use crate::diff::FileStatus;

    #[derive(Default)]
    pub(crate) struct FakeClient {
        pub records: Vec<HistoryRecord>,
        pub previous: HashMap<Id, HistoryRecord>,
        pub files: Vec<FileInfo>,
        pub fail_lookup: bool,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeClient {
        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HistoryClient for FakeClient {
        async fn list_history(&self) -> ClientResult<Vec<HistoryRecord>> {
            self.log("list".to_string());
            Ok(self.records.clone())
        }

        async fn get_history(&self, id: &Id) -> ClientResult<HistoryRecord> {
            self.log(format!("get {}", id));
            self.records
                .iter()
                .find(|r| &r.id == id)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("history record {}", id)))
        }

        async fn get_previous(
            &self,
            target_id: &Id,
            target_kind: TargetKind,
            current_id: &Id,
        ) -> ClientResult<Option<HistoryRecord>> {
            self.log(format!("previous {} {} {}", target_id, target_kind, current_id));
            Ok(self.previous.get(current_id).cloned())
        }

        async fn lookup_files(&self, ids: &[FileId]) -> ClientResult<Vec<FileInfo>> {
            self.log(format!("files {}", ids.len()));
            if self.fail_lookup {
                return Err(ClientError::Timeout);
            }
            Ok(self
                .files
                .iter()
                .filter(|f| ids.contains(&f.file_id))
                .cloned()
                .collect())
        }
    }

    pub(crate) fn record(id: i64, action: ActionKind, snapshot: &str, files: &str) -> HistoryRecord {
        HistoryRecord {
            id: Id::from(id),
            action_kind: action,
            target_kind: TargetKind::Project,
            target_id: Id::from(20),
            snapshot: Some(snapshot.to_string()),
            file_refs: Some(files.to_string()),
            admin_name: Some("Eduardo Novais".to_string()),
            recorded_at: None,
        }
    }

    fn file(id: i64, name: &str) -> FileInfo {
        FileInfo {
            file_id: Id::from(id),
            display_name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn edit_fetches_previous_then_file_names() {
        let client = FakeClient {
            records: vec![record(2, ActionKind::Edit, r#"{"valor":1000}"#, "[1,2]")],
            previous: HashMap::from([(
                Id::from(2),
                record(1, ActionKind::Create, r#"{"valor":800}"#, "[2,3]"),
            )]),
            files: vec![file(1, "plano.pdf"), file(3, "orcamento.xlsx")],
            ..Default::default()
        };

        let detail = load_record(&client, &Id::from(2)).await.expect("detail");

        assert_eq!(
            client.calls(),
            vec!["get 2", "previous 20 project 2", "files 3"]
        );
        assert_eq!(detail.diff.changed_count(), 1);
        assert_eq!(detail.file_name(&Id::from(3)), "orcamento.xlsx");
        assert_eq!(detail.file_name(&Id::from(2)), "2");
        let statuses: Vec<_> = detail.diff.files.iter().map(|f| f.status).collect();
        assert_eq!(
            statuses,
            vec![FileStatus::Removed, FileStatus::Added, FileStatus::Kept]
        );
    }

    #[tokio::test]
    async fn non_edit_skips_previous_lookup() {
        let client = FakeClient {
            records: vec![record(5, ActionKind::Create, r#"{"nome":"X"}"#, "[]")],
            ..Default::default()
        };

        let detail = load_record(&client, &Id::from(5)).await.expect("detail");

        assert_eq!(client.calls(), vec!["get 5"]);
        assert!(detail.diff.files.is_empty());
    }

    #[tokio::test]
    async fn admin_records_skip_file_lookup() {
        let mut admin = record(6, ActionKind::Create, r#"{"nome":"Ana"}"#, "[9]");
        admin.target_kind = TargetKind::Admin;
        let client = FakeClient {
            records: vec![admin],
            ..Default::default()
        };

        let detail = load_record(&client, &Id::from(6)).await.expect("detail");

        assert_eq!(client.calls(), vec!["get 6"]);
        assert!(detail.file_names.is_empty());
    }

    #[tokio::test]
    async fn failed_file_lookup_keeps_the_diff() {
        let client = FakeClient {
            records: vec![record(5, ActionKind::Create, "{}", "[9]")],
            fail_lookup: true,
            ..Default::default()
        };

        let detail = load_record(&client, &Id::from(5)).await.expect("detail");

        assert!(detail.file_names.is_empty());
        assert_eq!(detail.file_name(&Id::from(9)), "9");
    }

    #[tokio::test]
    async fn malformed_snapshot_becomes_record_failure() {
        let client = Arc::new(FakeClient {
            records: vec![record(7, ActionKind::Create, "{broken", "[]")],
            ..Default::default()
        });
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let (worker, handle) = CliWorker::new(client, action_tx);
        tokio::spawn(worker.run());

        handle.send(CliRequest::LoadRecord { id: Id::from(7) });

        match action_rx.recv().await {
            Some(Action::RecordFailed(id, message)) => {
                assert_eq!(id, Id::from(7));
                assert!(message.starts_with("could not parse snapshot"), "{message}");
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[tokio::test]
    async fn list_errors_surface_as_error_action() {
        struct Offline;

        #[async_trait]
        impl HistoryClient for Offline {
            async fn list_history(&self) -> ClientResult<Vec<HistoryRecord>> {
                Err(ClientError::ConnectionError("refused".to_string()))
            }
            async fn get_history(&self, id: &Id) -> ClientResult<HistoryRecord> {
                Err(ClientError::NotFound(id.to_string()))
            }
            async fn get_previous(
                &self,
                _target_id: &Id,
                _target_kind: TargetKind,
                _current_id: &Id,
            ) -> ClientResult<Option<HistoryRecord>> {
                Ok(None)
            }
            async fn lookup_files(&self, _ids: &[FileId]) -> ClientResult<Vec<FileInfo>> {
                Ok(vec![])
            }
        }

        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let (worker, handle) = CliWorker::new(Arc::new(Offline), action_tx);
        tokio::spawn(worker.run());

        handle.send(CliRequest::LoadHistory);

        match action_rx.recv().await {
            Some(Action::Error(message)) => assert_eq!(
                message,
                "failed to load history: connection error: refused"
            ),
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
