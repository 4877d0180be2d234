// terminal ui

mod app;
mod event;
mod theme;
mod ui;

pub use app::App;
pub use theme::ThemeKind;

use crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};
use std::time::Duration;

use crate::{Companion, Error};
use app::{LogLevel, Mode};
use event::{Action, handle_event, poll_event};

fn term_err(e: impl std::fmt::Display) -> Error {
    Error::Terminal(e.to_string())
}

/// Runs the interactive chat until the user quits.
pub async fn run(companion: Companion) -> Result<(), Error> {
    enable_raw_mode().map_err(term_err)?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(term_err)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(term_err)?;

    let result = run_app(&mut terminal, &companion).await;

    // restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    companion: &Companion,
) -> Result<(), Error> {
    let history = companion.history();
    let mut app = App::new(
        companion.user_id(),
        companion.provider().label(),
        &history,
        theme::detect_theme(),
    );

    // app starts in insert mode, so force the first cursor update
    let mut last_mode = None;

    loop {
        if last_mode != Some(app.mode) {
            let cursor_style = match app.mode {
                Mode::Insert => SetCursorStyle::BlinkingBar,
                Mode::Normal => SetCursorStyle::BlinkingBlock,
            };
            execute!(terminal.backend_mut(), cursor_style).ok();
            last_mode = Some(app.mode);
        }

        terminal
            .draw(|frame| ui::render(frame, &mut app))
            .map_err(term_err)?;

        let Some(event) = poll_event(Duration::from_millis(100)).map_err(term_err)? else {
            continue;
        };

        match handle_event(&mut app, event) {
            Action::Quit => break,

            Action::Submit(message) => {
                app.push_user(&message);

                // show the message and the pending state before waiting on the model
                terminal
                    .draw(|frame| ui::render(frame, &mut app))
                    .map_err(term_err)?;

                match companion.turn(&message).await {
                    Ok(reply) => app.set_reply(&reply),
                    Err(e) => app.set_error(e.to_string()),
                }
            }

            Action::ClearMemory => match companion.forget() {
                Ok(true) => {
                    app.clear_conversation();
                    app.log(LogLevel::Ok, "conversation forgotten".to_string());
                }
                Ok(false) => app.log(LogLevel::Info, "nothing stored yet".to_string()),
                Err(e) => app.log(LogLevel::Error, format!("could not forget: {e}")),
            },

            Action::None => {}
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
