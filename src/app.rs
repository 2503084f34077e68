use std::time::{Duration, Instant};

use ratatui::widgets::TableState;

use crate::action::{Action, DetailTab};
use crate::diff::RecordDetail;
use crate::domain::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Search,
    PendingG,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
}

#[derive(Debug, Clone)]
pub enum LoadState<T> {
    NotLoaded,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadHistory,
    LoadRecord(Id),
    Quit,
}

pub struct App {
    // View state
    pub view: View,
    pub input_mode: InputMode,
    pub overlay: Overlay,

    // Connection
    pub api_url: String,
    pub connection_status: ConnectionStatus,

    // History list
    pub history: LoadState<Vec<HistoryRecord>>,
    pub filter: HistoryFilter,
    pub table_state: TableState,

    // Record detail
    pub detail: LoadState<RecordDetail>,
    pub detail_id: Option<Id>,
    pub detail_tab: DetailTab,
    pub detail_scroll: u16,

    // Input
    pub input_buffer: String,

    // Polling
    pub polling_enabled: bool,
    pub polling_interval: Duration,
    pub base_polling_interval: Duration,
    pub last_refresh: Option<Instant>,
    pub error_count: u32,

    // App
    pub should_quit: bool,
    pub last_error: Option<(String, Instant)>,
}

impl App {
    pub fn new(api_url: String, poll_interval: Duration) -> Self {
        Self {
            view: View::List,
            input_mode: InputMode::Normal,
            overlay: Overlay::None,

            api_url,
            connection_status: ConnectionStatus::Connecting,

            history: LoadState::NotLoaded,
            filter: HistoryFilter::default(),
            table_state: TableState::default(),

            detail: LoadState::NotLoaded,
            detail_id: None,
            detail_tab: DetailTab::Fields,
            detail_scroll: 0,

            input_buffer: String::new(),

            polling_enabled: true,
            polling_interval: poll_interval,
            base_polling_interval: poll_interval,
            last_refresh: None,
            error_count: 0,

            should_quit: false,
            last_error: None,
        }
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        // Clear stale error toasts
        if let Some((_, at)) = &self.last_error {
            if at.elapsed() > Duration::from_secs(5) {
                self.last_error = None;
            }
        }

        // A chord only lives for one key
        if self.input_mode == InputMode::PendingG && !matches!(action, Action::Tick) {
            self.input_mode = InputMode::Normal;
        }

        match action {
            // Navigation
            Action::NavigateUp => {
                match self.view {
                    View::Detail => self.detail_scroll = self.detail_scroll.saturating_sub(1),
                    View::List => self.move_selection(-1),
                }
                vec![]
            }
            Action::NavigateDown => {
                match self.view {
                    View::Detail => self.detail_scroll = self.detail_scroll.saturating_add(1),
                    View::List => self.move_selection(1),
                }
                vec![]
            }
            Action::NavigateTop => {
                match self.view {
                    View::Detail => self.detail_scroll = 0,
                    View::List => self.select_index(0),
                }
                vec![]
            }
            Action::NavigateBottom => {
                match self.view {
                    View::Detail => self.detail_scroll = u16::MAX,
                    View::List => self.select_index(usize::MAX),
                }
                vec![]
            }
            Action::PageUp => {
                let page = self.page_height();
                match self.view {
                    View::Detail => {
                        self.detail_scroll = self.detail_scroll.saturating_sub(page as u16)
                    }
                    View::List => self.move_selection(-(page as isize)),
                }
                vec![]
            }
            Action::PageDown => {
                let page = self.page_height();
                match self.view {
                    View::Detail => {
                        self.detail_scroll = self.detail_scroll.saturating_add(page as u16)
                    }
                    View::List => self.move_selection(page as isize),
                }
                vec![]
            }
            Action::Select => match (self.view, self.selected_record()) {
                (View::List, Some(record)) => {
                    let id = record.id.clone();
                    self.open_record(id)
                }
                _ => vec![],
            },
            Action::Back => {
                if self.view == View::Detail {
                    self.view = View::List;
                    self.detail = LoadState::NotLoaded;
                    self.detail_id = None;
                    self.detail_scroll = 0;
                }
                vec![]
            }

            // Vim chord
            Action::EnterPendingG => {
                self.input_mode = InputMode::PendingG;
                vec![]
            }

            // UI
            Action::OpenCommandInput => {
                self.input_mode = InputMode::Command;
                self.input_buffer.clear();
                vec![]
            }
            Action::OpenSearch => {
                self.input_mode = InputMode::Search;
                self.input_buffer = self.filter.text().unwrap_or_default().to_string();
                vec![]
            }
            Action::CloseOverlay => {
                if self.overlay != Overlay::None {
                    self.overlay = Overlay::None;
                } else if self.input_mode != InputMode::Normal {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                }
                vec![]
            }
            Action::SubmitCommandInput(cmd) => {
                self.input_mode = InputMode::Normal;
                let effects = self.execute_command(&cmd);
                self.input_buffer.clear();
                effects
            }
            Action::SubmitSearch(query) => {
                self.input_mode = InputMode::Normal;
                self.filter.set_text(&query);
                self.input_buffer.clear();
                self.select_index(0);
                vec![]
            }
            Action::UpdateInputBuffer(buf) => {
                self.input_buffer = buf;
                vec![]
            }
            Action::ToggleHelp => {
                self.overlay = if self.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                vec![]
            }
            Action::NextTab => {
                if self.view == View::Detail {
                    self.detail_tab = self.detail_tab.next();
                    self.detail_scroll = 0;
                }
                vec![]
            }
            Action::PrevTab => {
                if self.view == View::Detail {
                    self.detail_tab = self.detail_tab.prev();
                    self.detail_scroll = 0;
                }
                vec![]
            }

            // Data responses
            Action::HistoryLoaded(mut records) => {
                let keep = self.selected_record().map(|r| r.id.clone());
                records.sort_by(|a, b| {
                    b.recorded_at
                        .cmp(&a.recorded_at)
                        .then_with(|| b.id.cmp(&a.id))
                });
                self.history = LoadState::Loaded(records);
                self.connection_status = ConnectionStatus::Connected;
                self.reset_backoff();
                self.reselect(keep);
                vec![]
            }
            Action::RecordLoaded(detail) => {
                if self.detail_id.as_ref() == Some(&detail.record.id) {
                    self.detail = LoadState::Loaded(*detail);
                } else {
                    tracing::debug!("dropping stale detail for record {}", detail.record.id);
                }
                vec![]
            }
            Action::RecordFailed(id, reason) => {
                if self.detail_id.as_ref() == Some(&id) {
                    self.detail = LoadState::Error(reason);
                }
                vec![]
            }

            // App control
            Action::Refresh => self.refresh_current_view(),
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Tick => {
                if self.polling_enabled && self.view == View::List {
                    let should_poll = self
                        .last_refresh
                        .map(|t| t.elapsed() >= self.polling_interval)
                        .unwrap_or(true);
                    if should_poll {
                        return self.refresh_current_view();
                    }
                }
                vec![]
            }
            Action::Error(msg) => {
                self.last_error = Some((msg.clone(), Instant::now()));
                self.error_count += 1;
                self.apply_backoff();
                if self.history.is_loading() {
                    self.history = LoadState::Error(msg.clone());
                }
                self.connection_status = ConnectionStatus::Error(msg);
                vec![]
            }
            Action::ClearError => {
                self.last_error = None;
                vec![]
            }
            Action::TogglePolling => {
                self.polling_enabled = !self.polling_enabled;
                vec![]
            }
        }
    }

    /// Records that pass the current filter, newest first.
    pub fn visible_records(&self) -> Vec<&HistoryRecord> {
        self.history
            .data()
            .map(|records| self.filter.apply(records))
            .unwrap_or_default()
    }

    pub fn selected_record(&self) -> Option<&HistoryRecord> {
        let idx = self.table_state.selected()?;
        self.visible_records().get(idx).copied()
    }

    fn open_record(&mut self, id: Id) -> Vec<Effect> {
        self.view = View::Detail;
        self.detail = LoadState::Loading;
        self.detail_id = Some(id.clone());
        self.detail_tab = DetailTab::Fields;
        self.detail_scroll = 0;
        vec![Effect::LoadRecord(id)]
    }

    fn execute_command(&mut self, cmd: &str) -> Vec<Effect> {
        let parts: Vec<&str> = cmd.trim().splitn(2, ' ').collect();
        let command = parts[0].to_lowercase();
        let args = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

        match command.as_str() {
            "open" | "o" => match args {
                Some(id) => self.open_record(Id::from(id)),
                None => {
                    self.show_error("usage: :open <history id>");
                    vec![]
                }
            },
            "from" | "until" => {
                let date = match args.map(parse_date).transpose() {
                    Ok(date) => date,
                    Err(e) => {
                        self.show_error(&e.to_string());
                        return vec![];
                    }
                };
                let keep = self.selected_record().map(|r| r.id.clone());
                let result = if command == "from" {
                    self.filter.set_from(date)
                } else {
                    self.filter.set_until(date)
                };
                match result {
                    Ok(()) => self.reselect(keep),
                    Err(e) => self.show_error(&e.to_string()),
                }
                vec![]
            }
            "clear" => {
                let keep = self.selected_record().map(|r| r.id.clone());
                self.filter.clear();
                self.reselect(keep);
                vec![]
            }
            "quit" | "q" => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            "help" | "h" => {
                self.overlay = Overlay::Help;
                vec![]
            }
            _ => {
                self.show_error(&format!("unknown command: {}", command));
                vec![]
            }
        }
    }

    fn refresh_current_view(&mut self) -> Vec<Effect> {
        self.last_refresh = Some(Instant::now());
        match self.view {
            View::List => {
                if matches!(self.history, LoadState::NotLoaded | LoadState::Error(_)) {
                    self.history = LoadState::Loading;
                }
                vec![Effect::LoadHistory]
            }
            View::Detail => match self.detail_id.clone() {
                Some(id) => {
                    self.detail = LoadState::Loading;
                    vec![Effect::LoadRecord(id)]
                }
                None => vec![],
            },
        }
    }

    fn show_error(&mut self, msg: &str) {
        self.last_error = Some((msg.to_string(), Instant::now()));
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.visible_records().len();
        if len == 0 {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1);
        self.table_state.select(Some(next as usize));
    }

    fn select_index(&mut self, idx: usize) {
        let len = self.visible_records().len();
        if len == 0 {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(len - 1)));
        }
    }

    /// Keeps the selection on the same record when it is still visible.
    fn reselect(&mut self, keep: Option<Id>) {
        let position = keep.and_then(|id| self.visible_records().iter().position(|r| r.id == id));
        self.select_index(position.unwrap_or(0));
    }

    fn reset_backoff(&mut self) {
        self.error_count = 0;
        self.polling_interval = self.base_polling_interval;
    }

    fn apply_backoff(&mut self) {
        let multiplier = 2u64.pow(self.error_count.min(5));
        let backoff_secs = self.base_polling_interval.as_secs().saturating_mul(multiplier);
        self.polling_interval = Duration::from_secs(backoff_secs.min(60));
    }

    fn page_height(&self) -> usize {
        20
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::diff::HistoryDiff;

    fn record(id: i64, admin: &str, day: u32) -> HistoryRecord {
        HistoryRecord {
            id: Id::from(id),
            action_kind: ActionKind::Create,
            target_kind: TargetKind::Project,
            target_id: Id::from(100 + id),
            snapshot: Some(r#"{"nome":"Projeto"}"#.to_string()),
            file_refs: None,
            admin_name: Some(admin.to_string()),
            recorded_at: Some(Utc.with_ymd_and_hms(2024, 11, day, 12, 0, 0).unwrap()),
        }
    }

    fn loaded_app() -> App {
        let mut app = App::new("http://localhost:8080".to_string(), Duration::from_secs(5));
        app.update(Action::HistoryLoaded(vec![
            record(1, "Amanda Shnapp", 10),
            record(2, "Eduardo Novais", 12),
            record(3, "Amanda Shnapp", 14),
        ]));
        app
    }

    fn visible_ids(app: &App) -> Vec<String> {
        app.visible_records()
            .iter()
            .map(|r| r.id.to_string())
            .collect()
    }

    fn detail_for(record: HistoryRecord) -> Box<RecordDetail> {
        let diff = HistoryDiff::build(&record, None).expect("diff");
        Box::new(RecordDetail {
            record,
            diff,
            file_names: Default::default(),
        })
    }

    #[test]
    fn history_is_sorted_newest_first() {
        let app = loaded_app();
        assert_eq!(visible_ids(&app), vec!["3", "2", "1"]);
        assert_eq!(app.table_state.selected(), Some(0));
        assert_eq!(app.connection_status, ConnectionStatus::Connected);
    }

    #[test]
    fn refresh_keeps_the_selected_record() {
        let mut app = loaded_app();
        app.update(Action::NavigateDown);
        assert_eq!(app.selected_record().map(|r| r.id.as_str()), Some("2"));

        app.update(Action::HistoryLoaded(vec![
            record(1, "Amanda Shnapp", 10),
            record(2, "Eduardo Novais", 12),
            record(3, "Amanda Shnapp", 14),
            record(4, "Eduardo Novais", 15),
        ]));

        assert_eq!(app.selected_record().map(|r| r.id.as_str()), Some("2"));
        assert_eq!(app.table_state.selected(), Some(2));
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut app = loaded_app();
        app.update(Action::NavigateUp);
        assert_eq!(app.table_state.selected(), Some(0));
        app.update(Action::PageDown);
        assert_eq!(app.table_state.selected(), Some(2));
        app.update(Action::EnterPendingG);
        assert_eq!(app.input_mode, InputMode::PendingG);
        app.update(Action::NavigateTop);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn select_opens_detail_and_requests_record() {
        let mut app = loaded_app();
        let effects = app.update(Action::Select);

        assert_eq!(effects, vec![Effect::LoadRecord(Id::from(3))]);
        assert_eq!(app.view, View::Detail);
        assert!(app.detail.is_loading());

        app.update(Action::RecordLoaded(detail_for(record(3, "Amanda Shnapp", 14))));
        assert!(app.detail.data().is_some());

        app.update(Action::Back);
        assert_eq!(app.view, View::List);
        assert!(app.detail_id.is_none());
    }

    #[test]
    fn stale_detail_responses_are_ignored() {
        let mut app = loaded_app();
        app.update(Action::SubmitCommandInput("open 2".to_string()));

        app.update(Action::RecordLoaded(detail_for(record(1, "Amanda Shnapp", 10))));
        assert!(app.detail.is_loading());

        app.update(Action::RecordFailed(Id::from(1), "boom".to_string()));
        assert!(app.detail.is_loading());

        app.update(Action::RecordFailed(Id::from(2), "bad snapshot".to_string()));
        assert!(matches!(app.detail, LoadState::Error(ref reason) if reason == "bad snapshot"));
    }

    #[test]
    fn search_filters_and_resets_selection() {
        let mut app = loaded_app();
        app.update(Action::NavigateBottom);
        app.update(Action::OpenSearch);
        assert_eq!(app.input_mode, InputMode::Search);

        app.update(Action::SubmitSearch("amanda".to_string()));

        assert_eq!(visible_ids(&app), vec!["3", "1"]);
        assert_eq!(app.table_state.selected(), Some(0));
        assert_eq!(app.input_mode, InputMode::Normal);

        app.update(Action::OpenSearch);
        assert_eq!(app.input_buffer, "amanda");
    }

    #[test]
    fn date_commands_narrow_the_list() {
        let mut app = loaded_app();
        app.update(Action::SubmitCommandInput("from 2024-11-11".to_string()));
        app.update(Action::SubmitCommandInput("until 2024-11-13".to_string()));
        assert_eq!(visible_ids(&app), vec!["2"]);

        app.update(Action::SubmitCommandInput("until".to_string()));
        assert_eq!(visible_ids(&app), vec!["3", "2"]);

        app.update(Action::SubmitCommandInput("clear".to_string()));
        assert_eq!(visible_ids(&app), vec!["3", "2", "1"]);
        assert!(app.last_error.is_none());
    }

    #[test]
    fn bad_command_arguments_show_a_toast() {
        let mut app = loaded_app();

        app.update(Action::SubmitCommandInput("from 12/11/2024".to_string()));
        assert!(app.last_error.is_some());
        assert!(app.filter.from().is_none());

        app.update(Action::SubmitCommandInput("from 2024-11-20".to_string()));
        app.update(Action::ClearError);
        app.update(Action::SubmitCommandInput("until 2024-11-01".to_string()));
        let (msg, _) = app.last_error.clone().expect("toast");
        assert!(msg.starts_with("empty date range"), "{msg}");

        app.update(Action::SubmitCommandInput("bogus".to_string()));
        let (msg, _) = app.last_error.clone().expect("toast");
        assert_eq!(msg, "unknown command: bogus");

        let effects = app.update(Action::SubmitCommandInput("open".to_string()));
        assert!(effects.is_empty());
        assert_eq!(app.view, View::List);
    }

    #[test]
    fn errors_back_off_and_success_resets() {
        let mut app = App::new("http://localhost:8080".to_string(), Duration::from_secs(5));
        let effects = app.update(Action::Tick);
        assert_eq!(effects, vec![Effect::LoadHistory]);
        assert!(app.history.is_loading());

        app.update(Action::Error("failed to load history: timeout".to_string()));
        assert_eq!(app.polling_interval, Duration::from_secs(10));
        assert!(matches!(app.history, LoadState::Error(_)));

        app.update(Action::Error("again".to_string()));
        app.update(Action::Error("again".to_string()));
        app.update(Action::Error("again".to_string()));
        app.update(Action::Error("again".to_string()));
        assert_eq!(app.polling_interval, Duration::from_secs(60));

        app.update(Action::HistoryLoaded(vec![]));
        assert_eq!(app.polling_interval, Duration::from_secs(5));
        assert_eq!(app.error_count, 0);
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn huge_poll_interval_backs_off_to_the_cap() {
        let mut app = App::new("http://localhost:8080".to_string(), Duration::from_secs(u64::MAX));
        app.error_count = 5;

        app.update(Action::Error("refused".to_string()));

        assert_eq!(app.polling_interval, Duration::from_secs(60));
    }

    #[test]
    fn tick_only_polls_the_list() {
        let mut app = loaded_app();
        assert_eq!(app.update(Action::Tick), vec![Effect::LoadHistory]);
        assert!(app.update(Action::Tick).is_empty());

        app.update(Action::Select);
        app.last_refresh = None;
        assert!(app.update(Action::Tick).is_empty());

        app.update(Action::Back);
        app.update(Action::TogglePolling);
        assert!(app.update(Action::Tick).is_empty());
    }

    #[test]
    fn detail_tabs_cycle_and_reset_scroll() {
        let mut app = loaded_app();
        app.update(Action::NextTab);
        assert_eq!(app.detail_tab, DetailTab::Fields);

        app.update(Action::Select);
        app.update(Action::NavigateDown);
        assert_eq!(app.detail_scroll, 1);
        app.update(Action::NextTab);
        assert_eq!(app.detail_tab, DetailTab::Files);
        assert_eq!(app.detail_scroll, 0);
        app.update(Action::PrevTab);
        assert_eq!(app.detail_tab, DetailTab::Fields);
    }

    #[test]
    fn quit_command_and_help() {
        let mut app = loaded_app();
        app.update(Action::SubmitCommandInput("help".to_string()));
        assert_eq!(app.overlay, Overlay::Help);
        app.update(Action::CloseOverlay);
        assert_eq!(app.overlay, Overlay::None);

        let effects = app.update(Action::SubmitCommandInput("q".to_string()));
        assert_eq!(effects, vec![Effect::Quit]);
        assert!(app.should_quit);
    }
}
