use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Opaque identifier. The history service sends numbers for some ids and
/// strings for others, so both are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Id(String);

impl Id {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Wire::deserialize(deserializer)? {
            Wire::Text(text) => Id(text),
            Wire::Number(number) => Id(number.to_string()),
        })
    }
}

pub type FileId = Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Edit,
    Delete,
    Activate,
    Deactivate,
}

/// How an action reads at a glance. Reactivation shares the look of a
/// creation and deactivation the look of a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Neutral,
    Negative,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Create => "Creation",
            Self::Edit => "Edit",
            Self::Delete => "Deletion",
            Self::Activate => "Activation",
            Self::Deactivate => "Deactivation",
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "created",
            Self::Edit => "edited",
            Self::Delete => "deleted",
            Self::Activate => "reactivated",
            Self::Deactivate => "deactivated",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Edit => "✎",
            Self::Delete => "✗",
            Self::Activate => "●",
            Self::Deactivate => "○",
        }
    }

    pub fn tone(&self) -> Tone {
        match self {
            Self::Create | Self::Activate => Tone::Positive,
            Self::Edit => Tone::Neutral,
            Self::Delete | Self::Deactivate => Tone::Negative,
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Project,
    Admin,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Admin => "admin",
        }
    }

    /// Noun used in sentences ("the project ID 10").
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Admin => "administrator",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry of the audit history as served by `GET /history/{id}`.
///
/// `snapshot` and `file_refs` arrive as JSON-encoded strings and stay that
/// way here; decoding them is the diff renderer's job so that a malformed
/// payload fails the render instead of the whole list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: Id,
    pub action_kind: ActionKind,
    pub target_kind: TargetKind,
    pub target_id: Id,
    #[serde(default)]
    pub snapshot: Option<String>,
    #[serde(default)]
    pub file_refs: Option<String>,
    #[serde(default)]
    pub admin_name: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
}

impl HistoryRecord {
    pub fn summary(&self) -> String {
        let admin = self.admin_name.as_deref().unwrap_or("(unknown)");
        format!(
            "Admin {} {} the {} ID {}",
            admin,
            self.action_kind.verb(),
            self.target_kind.noun(),
            self.target_id
        )
    }

    pub fn recorded_date(&self) -> Option<NaiveDate> {
        self.recorded_at.map(|at| at.date_naive())
    }

    /// Whether attached files are meaningful for this record's target.
    pub fn has_files(&self) -> bool {
        self.target_kind == TargetKind::Project
    }
}
