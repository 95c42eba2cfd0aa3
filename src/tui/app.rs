//! Chat view controller.
//!
//! [`App`] owns every piece of client state: the rendered message history,
//! the current session, the sidebar's session list, view preferences, the
//! input buffer and transient toasts. All mutation goes through its methods;
//! keyboard input arrives as [`Action`]s and backend results as
//! [`Completion`]s drained from the task runner.
//!
//! # Send state
//!
//! Sending is the only stateful flow: `Idle → Sending` when a message is
//! submitted, `Sending → Idle` when the reply (or a failure) is applied.
//! While sending, further submits are ignored. Session loads, deletes and
//! list refreshes are not serialised against it.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut app = App::new(backend, prefs, AppOptions::from(&config));
//! app.start();
//! app.run(&mut terminal)?;
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{info, warn};

use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use super::tasks::{Completion, Job, TaskRunner};
use crate::api::{ApiResult, ChatBackend, ChatReply, MessagePage, NewChat, SessionList};
use crate::clipboard::{ClipboardProvider, SystemClipboard, copy_message};
use crate::config::ClientConfig;
use crate::models::{ChatRecord, Role, Session};
use crate::preferences::{Theme, ViewPreferences};
use crate::transcript::save_transcript;
use crate::utils::format_path_with_tilde;

/// Duration for success and info toasts (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error toasts (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Input is capped to keep a stuck key from building a huge request
const MAX_INPUT_CHARS: usize = 4000;

pub const SEND_FAILED_REPLY: &str = "Sorry, I encountered an error. Please try again.";
pub const CONNECTION_FAILED_REPLY: &str =
    "Connection error. Please check your internet and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// Transient status line message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: ToastKind,
    pub expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Sidebar,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionListState {
    Loading,
    Loaded(Vec<Session>),
    Failed,
}

/// Destructive action waiting for a yes/no answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirm {
    DeleteSession(String),
    ClearChat,
}

impl Confirm {
    pub fn prompt(&self) -> &'static str {
        match self {
            Confirm::DeleteSession(_) => "Are you sure you want to delete this chat?",
            Confirm::ClearChat => "Are you sure you want to clear this conversation?",
        }
    }
}

/// Settings the controller takes from [`ClientConfig`]
#[derive(Debug, Clone)]
pub struct AppOptions {
    pub download_dir: PathBuf,
    pub quick_questions: Vec<String>,
}

impl From<&ClientConfig> for AppOptions {
    fn from(config: &ClientConfig) -> Self {
        Self {
            download_dir: config.download_dir.clone(),
            quick_questions: config.quick_questions.clone(),
        }
    }
}

pub struct App {
    tasks: TaskRunner,
    prefs: ViewPreferences,
    clipboard: Box<dyn ClipboardProvider>,
    options: AppOptions,
    // Server-backed view
    sessions: SessionListState,
    current_session_id: Option<String>,
    // Id handed out by the last new-chat call, adopted once its first message is saved
    pending_session_id: Option<String>,
    history: Vec<ChatRecord>,
    welcome_visible: bool,
    send_state: SendState,
    // Local UI state
    input: String,
    focus: Focus,
    selected_session: usize,
    scroll_from_bottom: u16,
    confirm: Option<Confirm>,
    status_message: Option<StatusMessage>,
    should_quit: bool,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, prefs: ViewPreferences, options: AppOptions) -> Self {
        Self {
            tasks: TaskRunner::new(backend),
            prefs,
            clipboard: Box::new(SystemClipboard),
            options,
            sessions: SessionListState::Loading,
            current_session_id: None,
            pending_session_id: None,
            history: Vec::new(),
            welcome_visible: true,
            send_state: SendState::Idle,
            input: String::new(),
            focus: Focus::Input,
            selected_session: 0,
            scroll_from_bottom: 0,
            confirm: None,
            status_message: None,
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    /// Replace the clipboard sink
    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardProvider>) -> Self {
        self.clipboard = clipboard;
        self
    }

    /// Initial loads: the session list and the server's current conversation
    pub fn start(&mut self) {
        self.load_chat_sessions();
        self.load_current_chat_history();
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while !self.should_quit {
            self.check_and_clear_expired_status();
            self.drain_completions();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= Duration::from_millis(100) {
                self.draw(terminal)?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            self.handle_action(action);
        }

        Ok(())
    }

    /// Draw one frame and clamp the chat scroll offset to what that frame can show
    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let state = self.render_state();
        let mut max_scroll = 0;
        terminal.draw(|f| {
            max_scroll = render_ui(f, &state);
        })?;
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_scroll);
        Ok(())
    }

    fn render_state(&self) -> RenderState<'_> {
        RenderState {
            theme: self.prefs.theme(),
            sidebar_open: self.prefs.sidebar_open(),
            sessions: &self.sessions,
            selected_session: self.selected_session,
            current_session_id: self.current_session_id.as_deref(),
            history: &self.history,
            welcome_visible: self.welcome_visible,
            sending: self.send_state == SendState::Sending,
            input: &self.input,
            input_lines: self.input_line_count(),
            focus: self.focus,
            scroll_from_bottom: self.scroll_from_bottom,
            confirm: self.confirm.as_ref(),
            status_message: self.status_message.as_ref(),
            quick_questions: &self.options.quick_questions,
        }
    }

    fn input_line_count(&self) -> u16 {
        let lines = self.input.split('\n').count();
        u16::try_from(lines).unwrap_or(u16::MAX)
    }

    // Toasts

    fn set_status(&mut self, text: impl Into<String>, kind: ToastKind) {
        let duration_ms = match kind {
            ToastKind::Error => STATUS_ERROR_DURATION_MS,
            ToastKind::Success | ToastKind::Info => STATUS_SUCCESS_DURATION_MS,
        };
        self.status_message = Some(StatusMessage {
            text: text.into(),
            kind,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn check_and_clear_expired_status(&mut self) {
        let expired =
            self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at);
        if expired {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    // Key handling

    fn handle_action(&mut self, action: Action) {
        if action == Action::None {
            return;
        }
        self.needs_redraw = true;

        if self.confirm.is_some() {
            self.handle_confirm_action(action);
            return;
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => match self.focus {
                Focus::Input => {
                    self.send_message();
                }
                Focus::Sidebar => self.open_selected_session(),
            },
            Action::InsertNewline => self.insert_char('\n'),
            Action::Input(c) => {
                self.focus = Focus::Input;
                self.insert_char(c);
            }
            Action::DeleteChar => {
                self.input.pop();
            }
            Action::Dismiss => {
                if self.status_message.is_some() {
                    self.status_message = None;
                } else if self.focus == Focus::Sidebar {
                    self.focus = Focus::Input;
                } else {
                    self.input.clear();
                }
            }
            Action::MoveUp => self.move_up(1),
            Action::MoveDown => self.move_down(1),
            Action::PageUp => self.scroll_up(10),
            Action::PageDown => self.scroll_down(10),
            Action::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Input if self.prefs.sidebar_open() => Focus::Sidebar,
                    _ => Focus::Input,
                };
            }
            Action::NewChat => self.create_new_chat(),
            Action::ClearChat => self.confirm = Some(Confirm::ClearChat),
            Action::DeleteSession => {
                if let Some(session) = self.selected_session() {
                    self.confirm = Some(Confirm::DeleteSession(session.session_id.clone()));
                }
            }
            Action::DownloadChat => {
                self.download_chat();
            }
            Action::CopyMessage => self.copy_last_reply(),
            Action::ToggleTheme => self.toggle_theme(),
            Action::ToggleSidebar => self.toggle_sidebar(),
            Action::RefreshSessions => {
                self.load_chat_sessions();
                self.set_status("Refreshing chats", ToastKind::Info);
            }
            Action::QuickQuestion(idx) => self.quick_question(idx),
            Action::None => {}
        }
    }

    fn handle_confirm_action(&mut self, action: Action) {
        match action {
            Action::Input('y' | 'Y') | Action::Submit => {
                if let Some(confirm) = self.confirm.take() {
                    match confirm {
                        Confirm::DeleteSession(session_id) => self.delete_session(session_id),
                        Confirm::ClearChat => self.clear_chat(),
                    }
                }
            }
            Action::Input('n' | 'N') | Action::Dismiss => self.confirm = None,
            Action::Quit => self.should_quit = true,
            _ => {}
        }
    }

    fn insert_char(&mut self, c: char) {
        if self.input.chars().count() < MAX_INPUT_CHARS {
            self.input.push(c);
        }
    }

    fn move_up(&mut self, delta: usize) {
        match self.focus {
            Focus::Sidebar => self.selected_session = self.selected_session.saturating_sub(delta),
            Focus::Input => self.scroll_up(delta as u16),
        }
    }

    fn move_down(&mut self, delta: usize) {
        match self.focus {
            Focus::Sidebar => {
                let count = self.session_count();
                if count > 0 {
                    self.selected_session = (self.selected_session + delta).min(count - 1);
                }
            }
            Focus::Input => self.scroll_down(delta as u16),
        }
    }

    fn scroll_up(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_add(rows);
    }

    fn scroll_down(&mut self, rows: u16) {
        self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(rows);
    }

    fn session_count(&self) -> usize {
        match &self.sessions {
            SessionListState::Loaded(sessions) => sessions.len(),
            _ => 0,
        }
    }

    fn selected_session(&self) -> Option<&Session> {
        match &self.sessions {
            SessionListState::Loaded(sessions) if self.prefs.sidebar_open() => {
                sessions.get(self.selected_session)
            }
            _ => None,
        }
    }

    fn open_selected_session(&mut self) {
        if let Some(session_id) = self.selected_session().map(|s| s.session_id.clone()) {
            self.load_session(session_id);
        }
    }

    // Operations

    /// Submit the input as a chat message.
    ///
    /// Returns false (and does nothing) for blank input or while a send is
    /// in flight.
    pub fn send_message(&mut self) -> bool {
        let message = self.input.trim().to_string();
        if message.is_empty() || self.send_state == SendState::Sending {
            return false;
        }

        self.welcome_visible = false;
        self.push_record(ChatRecord::new(message.clone(), Role::User, None, None));
        self.input.clear();
        self.send_state = SendState::Sending;
        self.needs_redraw = true;

        info!(chars = message.len(), "sending chat message");
        self.tasks.spawn(Job::SendChat {
            message,
            pending_session_id: self.pending_session_id.clone(),
        });
        true
    }

    pub fn load_session(&mut self, session_id: String) {
        self.tasks.spawn(Job::LoadSession(session_id));
    }

    pub fn load_current_chat_history(&mut self) {
        self.tasks.spawn(Job::LoadHistory);
    }

    pub fn load_chat_sessions(&mut self) {
        self.tasks.spawn(Job::LoadSessions);
    }

    /// Delete a session. Callers go through the confirmation prompt first.
    pub fn delete_session(&mut self, session_id: String) {
        self.tasks.spawn(Job::DeleteSession(session_id));
    }

    pub fn create_new_chat(&mut self) {
        self.tasks.spawn(Job::NewChat { announce: true });
    }

    /// Clear the server-side conversation. Callers confirm first.
    pub fn clear_chat(&mut self) {
        self.tasks.spawn(Job::Clear);
    }

    /// Save the in-memory history as a transcript in the download directory
    pub fn download_chat(&mut self) -> Option<PathBuf> {
        if self.history.is_empty() {
            self.set_status("No messages to download", ToastKind::Error);
            return None;
        }

        match save_transcript(&self.options.download_dir, &self.history, Utc::now()) {
            Ok(path) => {
                self.set_status(
                    format!("Chat downloaded successfully ({})", format_path_with_tilde(&path)),
                    ToastKind::Success,
                );
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "transcript export failed");
                self.set_status(format!("Failed to download chat: {}", e), ToastKind::Error);
                None
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        let result = self.prefs.toggle_theme();
        let theme = self.prefs.theme();
        if let Err(e) = result {
            warn!(error = %e, "failed to persist theme");
        }
        let label = match theme {
            Theme::Dark => "Dark",
            Theme::Light => "Light",
        };
        self.set_status(format!("{} mode activated", label), ToastKind::Success);
    }

    pub fn toggle_sidebar(&mut self) {
        if let Err(e) = self.prefs.toggle_sidebar() {
            warn!(error = %e, "failed to persist sidebar state");
        }
        if !self.prefs.sidebar_open() {
            self.focus = Focus::Input;
        }
        self.needs_redraw = true;
    }

    /// Copy the most recent assistant reply to the clipboard
    pub fn copy_last_reply(&mut self) {
        let Some(record) = self.history.iter().rev().find(|r| r.role == Role::Assistant) else {
            self.set_status("No reply to copy", ToastKind::Error);
            return;
        };

        match copy_message(record, self.clipboard.as_mut()) {
            Ok(()) => self.set_status("Message copied", ToastKind::Success),
            Err(e) => {
                warn!(error = %e, "clipboard copy failed");
                self.set_status("Failed to copy", ToastKind::Error);
            }
        }
    }

    /// Fill the input with a welcome-screen question and send it
    pub fn quick_question(&mut self, idx: usize) {
        if let Some(question) = self.options.quick_questions.get(idx).cloned() {
            self.input = question;
            self.focus = Focus::Input;
            self.send_message();
        }
    }

    fn push_record(&mut self, record: ChatRecord) {
        self.history.push(record);
        self.scroll_from_bottom = 0;
    }

    fn replace_history(&mut self, page: MessagePage) {
        self.history = page.messages.into_iter().map(ChatRecord::from).collect();
        self.scroll_from_bottom = 0;
    }

    fn reset_to_new_chat(&mut self) {
        self.history.clear();
        self.welcome_visible = true;
        self.current_session_id = None;
        self.scroll_from_bottom = 0;
    }

    // Backend completions

    fn drain_completions(&mut self) {
        while let Some(completion) = self.tasks.try_next() {
            self.apply(completion);
        }
    }

    fn apply(&mut self, completion: Completion) {
        self.needs_redraw = true;
        match completion {
            Completion::Sessions(result) => self.on_sessions(result),
            Completion::Session { session_id, result } => self.on_session(session_id, result),
            Completion::History(result) => self.on_history(result),
            Completion::Deleted { session_id, result } => self.on_deleted(session_id, result),
            Completion::ChatReply { pending_session_id, result } => {
                self.on_chat_reply(pending_session_id, result)
            }
            Completion::NewChat { announce, result } => self.on_new_chat(announce, result),
            Completion::Cleared(result) => self.on_cleared(result),
        }
    }

    fn on_sessions(&mut self, result: ApiResult<SessionList>) {
        match result {
            Ok(list) if list.success => {
                let count = list.sessions.len();
                self.selected_session = self.selected_session.min(count.saturating_sub(1));
                self.sessions = SessionListState::Loaded(list.sessions);
            }
            Ok(_) => {
                warn!("session list request was not successful");
                self.sessions = SessionListState::Failed;
            }
            Err(e) => {
                warn!(error = %e, "failed to load sessions");
                self.sessions = SessionListState::Failed;
            }
        }
    }

    fn on_session(&mut self, session_id: String, result: ApiResult<MessagePage>) {
        match result {
            Ok(page) if page.success => {
                info!(session_id = %session_id, messages = page.messages.len(), "session loaded");
                self.replace_history(page);
                self.current_session_id = Some(session_id);
                self.pending_session_id = None;
                self.welcome_visible = false;
                self.set_status("Chat loaded successfully", ToastKind::Success);
            }
            Ok(_) => self.set_status("Failed to load chat", ToastKind::Error),
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "failed to load session");
                self.set_status("Failed to load chat", ToastKind::Error);
            }
        }
    }

    fn on_history(&mut self, result: ApiResult<MessagePage>) {
        match result {
            Ok(page) if page.success && !page.messages.is_empty() => {
                self.welcome_visible = false;
                self.replace_history(page);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "failed to load current history");
                self.set_status("Failed to load history", ToastKind::Error);
            }
        }
    }

    fn on_deleted(&mut self, session_id: String, result: ApiResult<()>) {
        match result {
            Ok(()) => {
                info!(session_id = %session_id, "session deleted");
                self.load_chat_sessions();
                if self.current_session_id.as_deref() == Some(session_id.as_str()) {
                    self.reset_to_new_chat();
                    self.tasks.spawn(Job::NewChat { announce: false });
                }
                if self.pending_session_id.as_deref() == Some(session_id.as_str()) {
                    self.pending_session_id = None;
                }
                self.set_status("Chat deleted successfully", ToastKind::Success);
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "failed to delete session");
                self.set_status("Failed to delete chat", ToastKind::Error);
            }
        }
    }

    /// `sent_under` is the pending new-chat id at send time. It is adopted only
    /// if no newer chat replaced it while the request was in flight.
    fn on_chat_reply(&mut self, sent_under: Option<String>, result: ApiResult<ChatReply>) {
        self.send_state = SendState::Idle;
        match result {
            Ok(reply) if reply.success => {
                self.push_record(ChatRecord::new(
                    reply.response,
                    Role::Assistant,
                    reply.timestamp.as_deref(),
                    reply.source,
                ));
                if self.current_session_id.is_none()
                    && sent_under.is_some()
                    && sent_under == self.pending_session_id
                {
                    self.current_session_id = self.pending_session_id.take();
                }
                self.set_status("Response received", ToastKind::Success);
                self.load_chat_sessions();
            }
            Ok(reply) => {
                warn!(error = ?reply.error, "chat request was not successful");
                self.push_record(ChatRecord::new(SEND_FAILED_REPLY, Role::Assistant, None, None));
                self.set_status("Error occurred", ToastKind::Error);
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.push_record(ChatRecord::new(
                    CONNECTION_FAILED_REPLY,
                    Role::Assistant,
                    None,
                    None,
                ));
                self.set_status("Connection error", ToastKind::Error);
            }
        }
    }

    fn on_new_chat(&mut self, announce: bool, result: ApiResult<NewChat>) {
        match result {
            Ok(new_chat) => {
                if announce {
                    self.reset_to_new_chat();
                    self.set_status("New chat created", ToastKind::Success);
                }
                if self.current_session_id.is_none() {
                    self.pending_session_id = new_chat.session_id;
                }
                self.load_chat_sessions();
            }
            Err(e) => {
                warn!(error = %e, "failed to create new chat");
                if announce {
                    self.set_status("Failed to create new chat", ToastKind::Error);
                }
            }
        }
    }

    fn on_cleared(&mut self, result: ApiResult<()>) {
        match result {
            Ok(()) => {
                self.history.clear();
                self.welcome_visible = true;
                self.scroll_from_bottom = 0;
                self.set_status("Conversation cleared", ToastKind::Success);
            }
            Err(e) => {
                warn!(error = %e, "failed to clear conversation");
                self.set_status("Failed to clear conversation", ToastKind::Error);
            }
        }
    }

    // Accessors

    pub fn history(&self) -> &[ChatRecord] {
        &self.history
    }

    pub fn current_session_id(&self) -> Option<&str> {
        self.current_session_id.as_deref()
    }

    pub fn send_state(&self) -> SendState {
        self.send_state
    }

    pub fn welcome_visible(&self) -> bool {
        self.welcome_visible
    }

    pub fn status_message(&self) -> Option<&StatusMessage> {
        self.status_message.as_ref()
    }

    pub fn sessions(&self) -> &SessionListState {
        &self.sessions
    }

    pub fn theme(&self) -> Theme {
        self.prefs.theme()
    }

    pub fn sidebar_open(&self) -> bool {
        self.prefs.sidebar_open()
    }
}
