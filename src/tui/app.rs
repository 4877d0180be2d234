// app state for the tui

use crate::tui::theme::{Theme, ThemeKind};
use crate::{Emotion, Exchange, Reply, ReplySource};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Chat,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Themes,
    ConfirmClear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Ok,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Companion,
}

#[derive(Debug, Clone)]
pub struct ChatLine {
    pub speaker: Speaker,
    pub text: String,
    pub emotion: Option<Emotion>,
    pub crisis: bool,
}

pub struct App {
    pub running: bool,
    pub mode: Mode,
    pub panel: Panel,
    pub popup: Popup,
    pub theme_kind: ThemeKind,
    pub theme: Theme,

    pub user_id: String,
    pub provider: String,

    // message being typed, cursor counts chars not bytes
    pub input: String,
    pub input_cursor: usize,

    pub lines: Vec<ChatLine>,
    pub logs: Vec<LogEntry>,

    pub loading: bool,
    pub mood: Option<Emotion>,
    pub crisis: bool,
    pub latency_ms: Option<u64>,
    pub turn_start: Option<Instant>,

    // scroll
    pub chat_scroll: usize,
    pub follow_chat: bool,
    pub log_scroll: usize,
    pub theme_scroll: usize,

    // messages sent this session, for up/down recall
    pub sent: Vec<String>,
    pub sent_index: Option<usize>,
}

impl App {
    pub fn new(user_id: &str, provider: &str, history: &[Exchange], theme_kind: ThemeKind) -> Self {
        let mut app = Self {
            running: true,
            mode: Mode::Insert,
            panel: Panel::Chat,
            popup: Popup::None,
            theme_kind,
            theme: Theme::from_kind(theme_kind),
            user_id: user_id.to_string(),
            provider: provider.to_string(),
            input: String::new(),
            input_cursor: 0,
            lines: Vec::new(),
            logs: Vec::new(),
            loading: false,
            mood: None,
            crisis: false,
            latency_ms: None,
            turn_start: None,
            chat_scroll: 0,
            follow_chat: true,
            log_scroll: 0,
            theme_scroll: theme_kind.index(),
            sent: Vec::new(),
            sent_index: None,
        };

        app.load_history(history);
        app.log(LogLevel::Ok, format!("memory opened for {user_id}"));
        app.log(
            LogLevel::Info,
            format!("{} earlier exchanges", history.len()),
        );
        if provider == "offline" {
            app.log(LogLevel::Warn, "no api key, answering offline".to_string());
        } else {
            app.log(LogLevel::Ok, format!("model: {provider}"));
        }

        app
    }

    fn load_history(&mut self, history: &[Exchange]) {
        for exchange in history {
            self.lines.push(ChatLine {
                speaker: Speaker::User,
                text: exchange.user_msg.clone(),
                emotion: exchange.emotion,
                crisis: false,
            });
            self.lines.push(ChatLine {
                speaker: Speaker::Companion,
                text: exchange.bot_msg.clone(),
                emotion: None,
                crisis: false,
            });
        }
        self.mood = history.last().and_then(|e| e.emotion);
    }

    pub fn log(&mut self, level: LogLevel, message: String) {
        self.logs.push(LogEntry { level, message });
        // auto-scroll to bottom
        if self.logs.len() > 1 {
            self.log_scroll = self.logs.len().saturating_sub(10);
        }
    }

    // conversation updates

    pub fn push_user(&mut self, text: &str) {
        self.lines.push(ChatLine {
            speaker: Speaker::User,
            text: text.to_string(),
            emotion: None,
            crisis: false,
        });
        self.follow_chat = true;
    }

    pub fn set_reply(&mut self, reply: &Reply) {
        if let Some(start) = self.turn_start.take() {
            self.latency_ms = Some(start.elapsed().as_millis() as u64);
        }

        // tag the message that caused this reply
        if let Some(last) = self
            .lines
            .iter_mut()
            .rev()
            .find(|l| l.speaker == Speaker::User)
        {
            last.emotion = Some(reply.emotion);
        }

        self.lines.push(ChatLine {
            speaker: Speaker::Companion,
            text: reply.text.clone(),
            emotion: None,
            crisis: reply.is_crisis,
        });

        self.mood = Some(reply.emotion);
        self.crisis = reply.is_crisis;
        self.loading = false;
        self.follow_chat = true;

        match reply.source {
            ReplySource::Crisis => self.log(
                LogLevel::Warn,
                "crisis language detected, showing safety message".to_string(),
            ),
            ReplySource::Generated => self.log(
                LogLevel::Ok,
                format!("reply ({}ms)", self.latency_ms.unwrap_or(0)),
            ),
            ReplySource::Template if self.provider != "offline" => self.log(
                LogLevel::Warn,
                "model unavailable, used an offline reply".to_string(),
            ),
            ReplySource::Template => {
                self.log(LogLevel::Info, "offline reply".to_string())
            }
        }
    }

    pub fn set_error(&mut self, err: String) {
        self.turn_start = None;
        self.loading = false;
        self.log(LogLevel::Error, err);
    }

    pub fn clear_conversation(&mut self) {
        self.lines.clear();
        self.mood = None;
        self.crisis = false;
        self.chat_scroll = 0;
        self.follow_chat = true;
    }

    // popups

    pub fn set_theme(&mut self, kind: ThemeKind) {
        self.theme_kind = kind;
        self.theme = Theme::from_kind(kind);
        self.theme_scroll = kind.index();
    }

    pub fn open_theme_popup(&mut self) {
        self.popup = Popup::Themes;
        self.theme_scroll = self.theme_kind.index();
    }

    pub fn open_clear_popup(&mut self) {
        self.popup = Popup::ConfirmClear;
    }

    pub fn close_popup(&mut self) {
        self.popup = Popup::None;
    }

    pub fn theme_scroll_up(&mut self) {
        if self.theme_scroll > 0 {
            self.set_theme(ThemeKind::ALL[self.theme_scroll - 1]);
        }
    }

    pub fn theme_scroll_down(&mut self) {
        if self.theme_scroll + 1 < ThemeKind::ALL.len() {
            self.set_theme(ThemeKind::ALL[self.theme_scroll + 1]);
        }
    }

    pub fn select_theme(&mut self) {
        self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        self.close_popup();
    }

    // modes and panels

    pub fn cycle_panel(&mut self) {
        self.panel = match self.panel {
            Panel::Chat => Panel::Logs,
            Panel::Logs => Panel::Chat,
        };
    }

    pub fn enter_insert(&mut self) {
        self.mode = Mode::Insert;
        self.panel = Panel::Chat;
    }

    pub fn exit_insert(&mut self) {
        self.mode = Mode::Normal;
    }

    // input editing

    fn byte_index(&self, cursor: usize) -> usize {
        self.input
            .char_indices()
            .nth(cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }

    fn input_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.input_cursor);
        self.input.insert(at, c);
        self.input_cursor += 1;
    }

    pub fn delete_char(&mut self) {
        if self.input_cursor > 0 {
            self.input_cursor -= 1;
            let at = self.byte_index(self.input_cursor);
            self.input.remove(at);
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.input_cursor < self.input_len() {
            let at = self.byte_index(self.input_cursor);
            self.input.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.input_cursor = self.input_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.input_cursor < self.input_len() {
            self.input_cursor += 1;
        }
    }

    pub fn move_cursor_start(&mut self) {
        self.input_cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.input_cursor = self.input_len();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    fn recall(&mut self, index: usize) {
        self.sent_index = Some(index);
        self.input = self.sent[index].clone();
        self.input_cursor = self.input_len();
    }

    pub fn sent_up(&mut self) {
        match self.sent_index {
            None if !self.sent.is_empty() => self.recall(self.sent.len() - 1),
            Some(i) if i > 0 => self.recall(i - 1),
            _ => {}
        }
    }

    pub fn sent_down(&mut self) {
        match self.sent_index {
            Some(i) if i + 1 < self.sent.len() => self.recall(i + 1),
            Some(_) => {
                self.sent_index = None;
                self.clear_input();
            }
            None => {}
        }
    }

    /// Takes the typed message, or `None` while it is blank or a reply is pending.
    pub fn submit(&mut self) -> Option<String> {
        if self.loading || self.input.trim().is_empty() {
            return None;
        }
        let message = self.input.trim().to_string();
        self.sent.push(message.clone());
        self.sent_index = None;
        self.clear_input();
        self.loading = true;
        self.turn_start = Some(Instant::now());
        Some(message)
    }

    // scrolling

    pub fn scroll_up(&mut self) {
        match self.panel {
            Panel::Chat => {
                self.follow_chat = false;
                self.chat_scroll = self.chat_scroll.saturating_sub(1);
            }
            Panel::Logs => self.log_scroll = self.log_scroll.saturating_sub(1),
        }
    }

    pub fn scroll_down(&mut self) {
        match self.panel {
            Panel::Chat => self.chat_scroll += 1,
            Panel::Logs => self.log_scroll += 1,
        }
    }

    pub fn scroll_bottom(&mut self) {
        match self.panel {
            Panel::Chat => self.follow_chat = true,
            Panel::Logs => self.log_scroll = self.logs.len().saturating_sub(10),
        }
    }
}
