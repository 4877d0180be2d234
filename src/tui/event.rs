// event handling

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::tui::app::{App, Mode, Popup};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit(String),
    ClearMemory,
}

pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_event(app: &mut App, event: Event) -> Action {
    match event {
        // windows also reports releases
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key),
        _ => Action::None,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    match app.popup {
        Popup::Themes => return handle_theme_popup(app, key),
        Popup::ConfirmClear => return handle_clear_popup(app, key),
        Popup::None => {}
    }

    match app.mode {
        Mode::Normal => handle_normal_key(app, key),
        Mode::Insert => handle_insert_key(app, key),
    }
}

fn handle_theme_popup(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_popup(),
        KeyCode::Char('j') | KeyCode::Down => app.theme_scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.theme_scroll_up(),
        KeyCode::Enter => app.select_theme(),
        _ => {}
    }
    Action::None
}

fn handle_clear_popup(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.close_popup();
            Action::ClearMemory
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.close_popup();
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => return Action::Quit,

        KeyCode::Char('i') => app.enter_insert(),
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.move_cursor_end();
            app.enter_insert();
        }
        KeyCode::Char('I') => {
            app.move_cursor_start();
            app.enter_insert();
        }

        KeyCode::Tab => app.cycle_panel(),
        KeyCode::Char('t') => app.open_theme_popup(),
        KeyCode::Char('C') => app.open_clear_popup(),

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('G') | KeyCode::End => app.scroll_bottom(),

        KeyCode::Enter => {
            if let Some(message) = app.submit() {
                return Action::Submit(message);
            }
        }

        _ => {}
    }
    Action::None
}

fn handle_insert_key(app: &mut App, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('a') => app.move_cursor_start(),
            KeyCode::Char('e') => app.move_cursor_end(),
            KeyCode::Char('u') => app.clear_input(),
            KeyCode::Char('p') => app.sent_up(),
            KeyCode::Char('n') => app.sent_down(),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Esc => app.exit_insert(),

        // stay in insert mode, the conversation goes on
        KeyCode::Enter => {
            if let Some(message) = app.submit() {
                return Action::Submit(message);
            }
        }

        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),

        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_start(),
        KeyCode::End => app.move_cursor_end(),

        KeyCode::Up => app.sent_up(),
        KeyCode::Down => app.sent_down(),

        _ => {}
    }
    Action::None
}
