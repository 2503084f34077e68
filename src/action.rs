use crate::diff::RecordDetail;
use crate::domain::*;

#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateTop,
    NavigateBottom,
    PageUp,
    PageDown,
    Select,
    Back,

    // Vim chord
    EnterPendingG,

    // UI
    OpenCommandInput,
    OpenSearch,
    CloseOverlay,
    SubmitCommandInput(String),
    SubmitSearch(String),
    UpdateInputBuffer(String),
    ToggleHelp,

    // Tab navigation (detail view)
    NextTab,
    PrevTab,

    // Data responses
    HistoryLoaded(Vec<HistoryRecord>),
    RecordLoaded(Box<RecordDetail>),
    RecordFailed(Id, String),

    // App control
    Refresh,
    Quit,
    Tick,
    Error(String),
    ClearError,
    TogglePolling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailTab {
    Fields,
    Files,
}

impl DetailTab {
    pub const ALL: [DetailTab; 2] = [DetailTab::Fields, DetailTab::Files];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Fields => "Fields",
            Self::Files => "Files",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Fields => Self::Files,
            Self::Files => Self::Fields,
        }
    }

    pub fn prev(self) -> Self {
        // Two tabs: stepping back is the same as stepping forward.
        self.next()
    }
}
