use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

use crate::api::HttpGenerator;
use crate::backend::Backend;
use crate::config::Config;
use crate::mock::MockGenerator;
use crate::notice::{Notice, NOTICE_TTL_TICKS};
use crate::plc::GeneratedCode;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    History,
    Settings,
}

impl Section {
    pub fn all() -> [Section; 3] {
        [Section::Dashboard, Section::History, Section::Settings]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::History => "History",
            Section::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Sidebar,
    Input,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Done,
    Failed,
}

/// One submitted request in the session log. The log records requests, not
/// results; only one generation result is ever current.
#[derive(Debug, Clone)]
pub struct RequestEntry {
    pub description: String,
    pub status: RequestStatus,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub section: Section,
    pub sidebar_state: ListState,
    pub input_mode: InputMode,
    pub focus: FocusPane,
    pub theme: Theme,

    // Description input
    pub description_input: String,
    pub input_cursor: usize, // cursor position in chars

    // Generation lifecycle
    pub busy: bool,
    pub generation_task: Option<JoinHandle<anyhow::Result<GeneratedCode>>>,
    pub generated: GeneratedCode,
    pub history: Vec<RequestEntry>,
    pub history_state: ListState,

    // Structured Text panel scroll
    pub output_scroll: u16,
    pub output_height: u16,
    pub output_lines: u16,

    // Transient notice
    pub notice: Option<Notice>,
    notice_ttl: usize,

    // Animation state (0-2 for ellipsis while busy)
    pub animation_frame: u8,

    // Generation backends
    pub backend: Backend,
    pub mock: MockGenerator,
    pub http: Option<HttpGenerator>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let theme = config
            .theme
            .as_deref()
            .and_then(Theme::from_str)
            .unwrap_or(Theme::Dark);

        let http = config.endpoint.as_deref().map(HttpGenerator::new);

        // Fall back to the stub when config names the HTTP backend but no
        // endpoint is set
        let backend = config
            .backend
            .as_deref()
            .and_then(Backend::from_str)
            .filter(|b| *b != Backend::Http || http.is_some())
            .unwrap_or(Backend::Mock);

        let mut sidebar_state = ListState::default();
        sidebar_state.select(Some(0));

        Self {
            should_quit: false,
            section: Section::Dashboard,
            sidebar_state,
            input_mode: InputMode::Normal,
            focus: FocusPane::Sidebar,
            theme,

            description_input: String::new(),
            input_cursor: 0,

            busy: false,
            generation_task: None,
            generated: GeneratedCode::sample(),
            history: Vec::new(),
            history_state: ListState::default(),

            output_scroll: 0,
            output_height: 0,
            output_lines: 0,

            notice: None,
            notice_ttl: 0,

            animation_frame: 0,

            backend,
            mock: MockGenerator::new(),
            http,
        }
    }

    // Request lifecycle

    /// Validate the description and dispatch a generation request on a
    /// background task. Empty input raises a validation notice and changes
    /// nothing else. Single-flight is enforced at the key-handling layer,
    /// not here.
    pub fn submit(&mut self) {
        let description = self.description_input.trim().to_string();
        if description.is_empty() {
            self.notify(Notice::error(
                "Input required",
                "Describe the machine logic you want to generate.",
            ));
            return;
        }

        let task = match self.backend {
            Backend::Mock => {
                let generator = self.mock.clone();
                let request = description.clone();
                tokio::spawn(async move { generator.generate(&request).await })
            }
            Backend::Http => {
                let Some(generator) = self.http.clone() else {
                    self.notify(Notice::error(
                        "Backend not configured",
                        "Set an endpoint or switch to the built-in stub in Settings.",
                    ));
                    return;
                };
                let request = description.clone();
                tokio::spawn(async move { generator.generate(&request).await })
            }
        };

        self.history.push(RequestEntry {
            description,
            status: RequestStatus::Pending,
        });
        self.busy = true;
        self.generation_task = Some(task);
    }

    /// Settle a finished generation task. Called on Tick so the UI never
    /// blocks on the in-flight request.
    pub async fn poll_generation(&mut self) {
        let finished = self
            .generation_task
            .as_ref()
            .is_some_and(|task| task.is_finished());
        if !finished {
            return;
        }

        if let Some(task) = self.generation_task.take() {
            let outcome = match task.await {
                Ok(result) => result,
                Err(err) => Err(anyhow::anyhow!("generation task aborted: {err}")),
            };
            self.finish_generation(outcome);
        }
    }

    /// Apply a settled outcome: busy drops exactly once on every exit path,
    /// and a failure leaves the previous result untouched.
    pub fn finish_generation(&mut self, outcome: anyhow::Result<GeneratedCode>) {
        self.busy = false;
        match outcome {
            Ok(code) => {
                self.generated = code;
                self.output_scroll = 0;
                self.settle_last_pending(RequestStatus::Done);
                self.notify(Notice::success(
                    "Code generated",
                    "Your PLC code is ready for review.",
                ));
            }
            Err(_) => {
                self.settle_last_pending(RequestStatus::Failed);
                self.notify(Notice::error(
                    "Generation failed",
                    "Could not generate PLC code. Please try again.",
                ));
            }
        }
    }

    fn settle_last_pending(&mut self, status: RequestStatus) {
        if let Some(entry) = self
            .history
            .iter_mut()
            .rev()
            .find(|e| e.status == RequestStatus::Pending)
        {
            entry.status = status;
        }
    }

    // Notices

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.notice_ttl = NOTICE_TTL_TICKS;
    }

    /// Advance the animation frame and expire the notice. Called on Tick.
    pub fn tick(&mut self) {
        if self.busy {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }

        if self.notice.is_some() {
            self.notice_ttl = self.notice_ttl.saturating_sub(1);
            if self.notice_ttl == 0 {
                self.notice = None;
            }
        }
    }

    // Theme

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        self.notify(Notice::info(
            &format!("Switched to {}", self.theme.display_name()),
            "Theme updated successfully.",
        ));
    }

    // Backend selection

    pub fn cycle_backend(&mut self) {
        let backends = Backend::all();
        let i = backends
            .iter()
            .position(|b| *b == self.backend)
            .unwrap_or(0);
        let next = backends[(i + 1) % backends.len()];

        if next == Backend::Http && self.http.is_none() {
            self.notify(Notice::error(
                "No endpoint configured",
                "Add \"endpoint\" to the config file to use the HTTP service.",
            ));
            return;
        }

        self.backend = next;
        self.notify(Notice::info(
            "Backend changed",
            &format!("Now generating with: {}", next.display_name()),
        ));
    }

    // Sidebar navigation

    pub fn sidebar_down(&mut self) {
        let sections = Section::all();
        let i = self.sidebar_state.selected().unwrap_or(0);
        let next = (i + 1).min(sections.len() - 1);
        self.sidebar_state.select(Some(next));
        self.section = sections[next];
    }

    pub fn sidebar_up(&mut self) {
        let sections = Section::all();
        let i = self.sidebar_state.selected().unwrap_or(0);
        let prev = i.saturating_sub(1);
        self.sidebar_state.select(Some(prev));
        self.section = sections[prev];
    }

    // History navigation

    pub fn history_nav_down(&mut self) {
        let len = self.history.len();
        if len > 0 {
            let i = self.history_state.selected().unwrap_or(0);
            self.history_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn history_nav_up(&mut self) {
        let i = self.history_state.selected().unwrap_or(0);
        self.history_state.select(Some(i.saturating_sub(1)));
    }

    // Structured Text panel scrolling

    pub fn scroll_output_down(&mut self) {
        if self.output_scroll < self.output_lines.saturating_sub(self.output_height) {
            self.output_scroll = self.output_scroll.saturating_add(1);
        }
    }

    pub fn scroll_output_up(&mut self) {
        self.output_scroll = self.output_scroll.saturating_sub(1);
    }

    pub fn scroll_output_half_page_down(&mut self) {
        let half_page = self.output_height / 2;
        let max_scroll = self.output_lines.saturating_sub(self.output_height);
        self.output_scroll = (self.output_scroll + half_page).min(max_scroll);
    }

    pub fn scroll_output_half_page_up(&mut self) {
        let half_page = self.output_height / 2;
        self.output_scroll = self.output_scroll.saturating_sub(half_page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice::NoticeLevel;
    use std::time::Duration;

    fn test_app() -> App {
        let mut app = App::new(Config::new());
        app.mock = MockGenerator::with_delay(Duration::ZERO);
        app
    }

    async fn settle(app: &mut App) {
        let task = app.generation_task.take().expect("task spawned");
        let outcome = task.await.expect("task ran to completion");
        app.finish_generation(outcome);
    }

    #[tokio::test]
    async fn empty_description_is_rejected_without_dispatch() {
        let mut app = test_app();
        app.description_input = "   \t ".to_string();
        let before = app.generated.clone();

        app.submit();

        assert!(!app.busy);
        assert!(app.generation_task.is_none());
        assert!(app.history.is_empty());
        assert_eq!(app.generated, before);
        let notice = app.notice.clone().expect("validation notice raised");
        assert_eq!(notice.level, NoticeLevel::Error);
    }

    #[tokio::test]
    async fn successful_generation_replaces_result() {
        let mut app = test_app();
        app.description_input = "start motor on button press".to_string();

        app.submit();
        assert!(app.busy, "busy transitions true on dispatch");

        settle(&mut app).await;

        assert!(!app.busy, "busy drops after settlement");
        assert!(app
            .generated
            .structured_text
            .contains("start motor on button press"));
        assert_eq!(
            app.notice.clone().expect("success notice").level,
            NoticeLevel::Success
        );
        assert_eq!(app.history.last().unwrap().status, RequestStatus::Done);
    }

    #[tokio::test]
    async fn failed_generation_keeps_previous_result() {
        let mut app = test_app();
        app.mock = MockGenerator::failing();
        let before = app.generated.clone();
        app.description_input = "open valve when tank is full".to_string();

        app.submit();
        settle(&mut app).await;

        assert!(!app.busy);
        assert_eq!(app.generated, before, "failure never overwrites the result");
        assert_eq!(
            app.notice.clone().expect("failure notice").level,
            NoticeLevel::Error
        );
        assert_eq!(app.history.last().unwrap().status, RequestStatus::Failed);
    }

    /// Drive settlement the way the event loop does: poll on every tick
    /// until the in-flight task is gone.
    async fn poll_until_settled(app: &mut App) {
        while app.generation_task.is_some() {
            app.poll_generation().await;
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn tick_polling_settles_successful_generation() {
        let mut app = test_app();
        app.description_input = "start motor on button press".to_string();

        app.submit();
        assert!(app.busy);

        poll_until_settled(&mut app).await;

        assert!(!app.busy, "busy drops exactly once via the tick path");
        assert!(app
            .generated
            .structured_text
            .contains("start motor on button press"));
        assert_eq!(
            app.notice.clone().expect("success notice").level,
            NoticeLevel::Success
        );
        assert_eq!(app.history.last().unwrap().status, RequestStatus::Done);
    }

    #[tokio::test]
    async fn aborted_task_settles_as_generic_failure() {
        let mut app = test_app();
        app.mock = MockGenerator::with_delay(Duration::from_secs(60));
        let before = app.generated.clone();
        app.description_input = "run conveyor until limit switch".to_string();

        app.submit();
        app.generation_task.as_ref().expect("task spawned").abort();

        poll_until_settled(&mut app).await;

        assert!(!app.busy);
        assert_eq!(app.generated, before, "aborted task never overwrites the result");
        assert_eq!(
            app.notice.clone().expect("failure notice").level,
            NoticeLevel::Error
        );
        assert_eq!(app.history.last().unwrap().status, RequestStatus::Failed);
    }

    #[tokio::test]
    async fn http_backend_without_endpoint_is_rejected() {
        let mut app = test_app();
        app.backend = Backend::Http;
        app.http = None;
        app.description_input = "run conveyor".to_string();

        app.submit();

        assert!(!app.busy);
        assert!(app.generation_task.is_none());
        assert_eq!(
            app.notice.clone().expect("config notice").level,
            NoticeLevel::Error
        );
    }

    #[test]
    fn theme_toggle_flips_and_notifies() {
        let mut app = App::new(Config::new());
        assert_eq!(app.theme, Theme::Dark);

        app.toggle_theme();

        assert_eq!(app.theme, Theme::Light);
        assert_eq!(
            app.notice.clone().expect("theme notice").level,
            NoticeLevel::Info
        );
    }

    #[test]
    fn cycle_backend_requires_endpoint() {
        let mut app = App::new(Config::new());
        assert_eq!(app.backend, Backend::Mock);

        app.cycle_backend();
        assert_eq!(app.backend, Backend::Mock, "no endpoint, stays on stub");

        app.http = Some(crate::api::HttpGenerator::new("http://localhost:8080"));
        app.cycle_backend();
        assert_eq!(app.backend, Backend::Http);
    }

    #[test]
    fn notice_expires_after_ttl() {
        let mut app = App::new(Config::new());
        app.notify(Notice::info("Hello", "World"));

        for _ in 0..NOTICE_TTL_TICKS {
            assert!(app.notice.is_some());
            app.tick();
        }
        assert!(app.notice.is_none());
    }
}
