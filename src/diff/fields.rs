use serde_json::Value;

use super::format::{format_value, is_excluded, label_for};
use super::Snapshot;
use crate::domain::ActionKind;

pub const NO_DATA: &str = "No data available";

/// One displayable line of a snapshot, possibly compared against the
/// previous revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldDiffEntry {
    Plain {
        field_name: String,
        label: String,
        value: String,
    },
    Changed {
        field_name: String,
        label: String,
        old: String,
        new: String,
    },
    /// A nested mapping: a heading followed by its own entries.
    Group {
        field_name: String,
        label: String,
        entries: Vec<FieldDiffEntry>,
    },
    /// Stands in for a snapshot with nothing to show.
    NoData,
}

impl FieldDiffEntry {
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Plain { field_name, .. }
            | Self::Changed { field_name, .. }
            | Self::Group { field_name, .. } => Some(field_name.as_str()),
            Self::NoData => None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Plain { label, .. } | Self::Changed { label, .. } | Self::Group { label, .. } => {
                Some(label.as_str())
            }
            Self::NoData => None,
        }
    }

    pub fn changed(&self) -> bool {
        match self {
            Self::Changed { .. } => true,
            Self::Group { entries, .. } => entries.iter().any(FieldDiffEntry::changed),
            Self::Plain { .. } | Self::NoData => false,
        }
    }

    pub fn old_value(&self) -> Option<&str> {
        match self {
            Self::Changed { old, .. } => Some(old.as_str()),
            _ => None,
        }
    }

    pub fn new_value(&self) -> Option<&str> {
        match self {
            Self::Plain { value, .. } => Some(value.as_str()),
            Self::Changed { new, .. } => Some(new.as_str()),
            _ => None,
        }
    }
}

/// Renders `current` in key order, comparing against `previous` only for
/// edits. Excluded keys are dropped at every level.
pub fn render_fields(
    current: Option<&Snapshot>,
    previous: Option<&Snapshot>,
    action: ActionKind,
) -> Vec<FieldDiffEntry> {
    let Some(current) = current.filter(|snapshot| !snapshot.is_empty()) else {
        return vec![FieldDiffEntry::NoData];
    };
    let previous = if action == ActionKind::Edit {
        previous
    } else {
        None
    };
    render_map(current, previous)
}

fn render_map(current: &Snapshot, previous: Option<&Snapshot>) -> Vec<FieldDiffEntry> {
    current
        .iter()
        .filter(|(key, _)| !is_excluded(key))
        .map(|(key, value)| {
            let prior = previous.and_then(|p| p.get(key));
            render_entry(key, value, prior)
        })
        .collect()
}

fn render_entry(key: &str, value: &Value, prior: Option<&Value>) -> FieldDiffEntry {
    let field_name = key.to_string();
    let label = label_for(key).to_string();

    if let Value::Object(nested) = value {
        return match prior {
            // A scalar or list that became a mapping has nothing to recurse into.
            Some(old) if !old.is_object() => FieldDiffEntry::Changed {
                field_name,
                label,
                old: format_value(key, old),
                new: format_value(key, value),
            },
            _ => FieldDiffEntry::Group {
                field_name,
                label,
                entries: render_map(nested, prior.and_then(Value::as_object)),
            },
        };
    }

    match prior {
        Some(old) if old != value => FieldDiffEntry::Changed {
            field_name,
            label,
            old: format_value(key, old),
            new: format_value(key, value),
        },
        _ => FieldDiffEntry::Plain {
            field_name,
            label,
            value: format_value(key, value),
        },
    }
}
