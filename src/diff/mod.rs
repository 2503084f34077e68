//! Audit-history diff rendering.
//!
//! Turns a history record (and, for edits, the record that preceded it) into
//! display-ready field and file entries. Everything here is pure: fetching
//! the records and resolving file names happens in the worker.

mod fields;
mod files;
mod format;

use std::collections::HashMap;

use thiserror::Error;

pub use fields::{render_fields, FieldDiffEntry, NO_DATA};
pub use files::{render_files, FileDiffEntry, FileStatus};
pub use format::{
    display_value, field_format, format_currency, format_date, format_value, is_excluded,
    label_for, FieldFormat, Transform, EXCLUDED_FIELDS, FIELD_FORMATS, INVALID_DATE,
    MAX_CURRENCY_AMOUNT, NOT_AVAILABLE,
};

use crate::domain::{ActionKind, FileId, HistoryRecord, Id, TargetKind};

/// Field name to value mapping captured with a history record. Key order is
/// the order the server wrote them in.
pub type Snapshot = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    #[error("could not parse {what}: {reason}")]
    DataParse { what: &'static str, reason: String },
    #[error("no earlier revision recorded for {target} {target_id}")]
    MissingSnapshot { target: TargetKind, target_id: Id },
}

/// Decodes a JSON-encoded snapshot. Absent or blank payloads are an empty
/// snapshot; anything that is not a JSON object is an error.
pub fn parse_snapshot(raw: Option<&str>, what: &'static str) -> Result<Snapshot, DiffError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(Snapshot::new());
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(serde_json::Value::Null) => Ok(Snapshot::new()),
        Ok(other) => Err(DiffError::DataParse {
            what,
            reason: format!("expected an object, found {}", json_kind(&other)),
        }),
        Err(e) => Err(DiffError::DataParse {
            what,
            reason: e.to_string(),
        }),
    }
}

/// Decodes a JSON-encoded list of file ids.
pub fn parse_file_refs(raw: Option<&str>, what: &'static str) -> Result<Vec<FileId>, DiffError> {
    let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
        return Ok(vec![]);
    };
    serde_json::from_str::<Option<Vec<FileId>>>(raw)
        .map(Option::unwrap_or_default)
        .map_err(|e| DiffError::DataParse {
            what,
            reason: e.to_string(),
        })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryDiff {
    pub action: ActionKind,
    pub fields: Vec<FieldDiffEntry>,
    pub files: Vec<FileDiffEntry>,
    /// Set when an edit had no earlier revision to compare against; the
    /// fields are then a plain listing.
    pub notice: Option<DiffError>,
}

impl HistoryDiff {
    /// `prior` is only consulted for edits.
    pub fn build(record: &HistoryRecord, prior: Option<&HistoryRecord>) -> Result<Self, DiffError> {
        let current = parse_snapshot(record.snapshot.as_deref(), "snapshot")?;
        let current_files = parse_file_refs(record.file_refs.as_deref(), "file list")?;

        let prior = match (record.action_kind, prior) {
            (ActionKind::Edit, Some(prior)) => Some((
                parse_snapshot(prior.snapshot.as_deref(), "previous snapshot")?,
                parse_file_refs(prior.file_refs.as_deref(), "previous file list")?,
            )),
            _ => None,
        };

        let notice = if record.action_kind == ActionKind::Edit && prior.is_none() {
            tracing::debug!(
                "edit {} has no earlier revision for {} {}",
                record.id,
                record.target_kind,
                record.target_id
            );
            Some(DiffError::MissingSnapshot {
                target: record.target_kind,
                target_id: record.target_id.clone(),
            })
        } else {
            None
        };

        let fields = render_fields(
            Some(&current),
            prior.as_ref().map(|(snapshot, _)| snapshot),
            record.action_kind,
        );

        let files = match (record.action_kind, &prior) {
            (ActionKind::Create, _) => render_files(&current_files, &[]),
            (ActionKind::Delete, _) => render_files(&[], &current_files),
            (ActionKind::Edit, Some((_, prior_files))) => render_files(&current_files, prior_files),
            (ActionKind::Edit, None) | (ActionKind::Activate | ActionKind::Deactivate, _) => {
                render_files(&current_files, &current_files)
            }
        };

        Ok(Self {
            action: record.action_kind,
            fields,
            files,
            notice,
        })
    }

    pub fn is_compared(&self) -> bool {
        self.action == ActionKind::Edit && self.notice.is_none()
    }

    pub fn changed_count(&self) -> usize {
        self.fields.iter().filter(|f| f.changed()).count()
    }

    pub fn file_ids(&self) -> Vec<FileId> {
        self.files.iter().map(|f| f.file_id.clone()).collect()
    }

    pub fn files_with_status(&self, status: FileStatus) -> impl Iterator<Item = &FileDiffEntry> {
        self.files.iter().filter(move |f| f.status == status)
    }

    /// Message shown in place of an empty file section.
    pub fn empty_files_message(&self) -> &'static str {
        if self.action == ActionKind::Edit {
            "No file changes"
        } else {
            "No files associated"
        }
    }
}

/// A record with its rendered diff and whatever file names could be
/// resolved for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDetail {
    pub record: HistoryRecord,
    pub diff: HistoryDiff,
    pub file_names: HashMap<FileId, String>,
}

impl RecordDetail {
    pub fn file_name<'a>(&'a self, id: &'a FileId) -> &'a str {
        self.file_names
            .get(id)
            .map(String::as_str)
            .unwrap_or(id.as_str())
    }
}
