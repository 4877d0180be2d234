// ui rendering

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::tui::app::{App, ChatLine, LogLevel, Mode, Panel, Popup, Speaker};
use crate::tui::theme::{Theme, ThemeKind};

pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = &app.theme;

    frame.render_widget(Clear, frame.area());
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(6),    // chat + logs
            Constraint::Length(3), // input
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, main[0]);
    render_content(frame, app, main[1]);
    render_input(frame, app, main[2]);
    render_footer(frame, app, main[3]);

    match app.popup {
        Popup::Themes => render_theme_popup(frame, app),
        Popup::ConfirmClear => render_clear_popup(frame, app),
        Popup::None => {}
    }
}

fn render_header(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if app.crisis {
            theme.error()
        } else {
            theme.border()
        })
        .style(theme.base());

    let latency = app
        .latency_ms
        .map(|ms| format!("{ms}ms"))
        .unwrap_or_else(|| "-".to_string());

    let mode = match app.mode {
        Mode::Normal => "normal",
        Mode::Insert => "insert",
    };

    let mut spans = vec![
        Span::styled(" serena ", theme.title()),
        Span::styled("| user: ", theme.muted()),
        Span::styled(&app.user_id, theme.base()),
        Span::styled("  | model: ", theme.muted()),
        Span::styled(&app.provider, theme.base()),
        Span::styled("  | ", theme.muted()),
        Span::styled(latency, theme.accent()),
        Span::styled("  | mode: ", theme.muted()),
        Span::styled(mode, theme.accent()),
        Span::styled("  | mood: ", theme.muted()),
    ];

    match app.mood {
        Some(emotion) => spans.push(Span::styled(emotion.as_str(), theme.emotion(emotion))),
        None => spans.push(Span::styled("-", theme.muted())),
    }

    if app.crisis {
        spans.push(Span::styled("  | support resources shown", theme.error()));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(block)
        .style(theme.base());
    frame.render_widget(header, area);
}

fn render_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    render_chat(frame, app, cols[0]);
    render_logs(frame, app, cols[1]);
}

fn chat_lines<'a>(theme: &Theme, lines: &'a [ChatLine]) -> Vec<Line<'a>> {
    let mut out = Vec::new();

    for line in lines {
        let mut label = match line.speaker {
            Speaker::User => vec![Span::styled("you", theme.accent())],
            Speaker::Companion if line.crisis => vec![Span::styled("serena !", theme.error())],
            Speaker::Companion => vec![Span::styled("serena", theme.success())],
        };
        if let Some(emotion) = line.emotion {
            label.push(Span::styled(" (", theme.muted()));
            label.push(Span::styled(emotion.as_str(), theme.emotion(emotion)));
            label.push(Span::styled(")", theme.muted()));
        }
        out.push(Line::from(label));

        let style = if line.crisis {
            theme.error()
        } else {
            theme.base()
        };
        for text in line.text.lines() {
            out.push(Line::styled(format!("  {text}"), style));
        }
        out.push(Line::from(""));
    }

    out
}

// rows the text takes once wrapped at `width`
fn wrapped_height(lines: &[Line], width: u16) -> usize {
    let width = width.max(1) as usize;
    lines
        .iter()
        .map(|l| l.width().div_ceil(width).max(1))
        .sum()
}

fn render_chat(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = app.theme.clone();
    let active = app.panel == Panel::Chat;

    let block = Block::default()
        .title(Span::styled(" Conversation ", theme.title()))
        .borders(Borders::ALL)
        .border_style(if active {
            theme.accent()
        } else {
            theme.border()
        })
        .style(theme.base());

    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });

    let mut lines = if app.lines.is_empty() {
        vec![
            Line::styled("nothing here yet.", theme.muted()),
            Line::styled("say whatever is on your mind.", theme.muted()),
        ]
    } else {
        chat_lines(&theme, &app.lines)
    };

    if app.loading {
        lines.push(Line::styled("serena is thinking...", theme.muted()));
    }

    // keep the newest message in view unless the user scrolled away
    let max_scroll = wrapped_height(&lines, inner.width).saturating_sub(inner.height as usize);
    if app.follow_chat || app.chat_scroll > max_scroll {
        app.chat_scroll = max_scroll;
        app.follow_chat = true;
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll as u16, 0));

    frame.render_widget(paragraph, area);
}

fn render_logs(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let active = app.panel == Panel::Logs;

    let block = Block::default()
        .title(Span::styled(" Logs ", theme.title()))
        .borders(Borders::ALL)
        .border_style(if active {
            theme.accent()
        } else {
            theme.border()
        })
        .style(theme.base());

    let lines: Vec<Line> = app
        .logs
        .iter()
        .map(|entry| {
            let (prefix, style) = match entry.level {
                LogLevel::Ok => ("[OK]", theme.success()),
                LogLevel::Info => ("[--]", theme.muted()),
                LogLevel::Warn => ("[!!]", theme.warning()),
                LogLevel::Error => ("[ERR]", theme.error()),
            };
            Line::from(vec![
                Span::styled(format!("{prefix} "), style),
                Span::styled(&entry.message, theme.base()),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .wrap(Wrap { trim: false })
        .scroll((app.log_scroll as u16, 0));

    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;
    let editing = app.mode == Mode::Insert && app.popup == Popup::None;

    let block = Block::default()
        .title(Span::styled(" Message ", theme.title()))
        .borders(Borders::ALL)
        .border_style(if editing {
            theme.accent()
        } else {
            theme.border()
        })
        .style(theme.base());

    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });

    // scroll sideways so the cursor stays visible on long messages
    let width = inner.width.max(1) as usize;
    let offset = app.input_cursor.saturating_sub(width - 1);
    let visible: String = app.input.chars().skip(offset).take(width).collect();

    let content = if app.input.is_empty() && !editing {
        Line::styled("press 'i' to type a message...", theme.muted())
    } else {
        Line::styled(visible, theme.base())
    };

    frame.render_widget(Paragraph::new(content).block(block).style(theme.base()), area);

    if editing {
        let x = inner.x + (app.input_cursor - offset) as u16;
        if x < inner.right() {
            frame.set_cursor_position((x, inner.y));
        }
    }
}

fn render_footer(frame: &mut Frame, app: &mut App, area: Rect) {
    let theme = &app.theme;

    let key = |k: &'static str| Span::styled(k, theme.accent());
    let label = |l: &'static str| Span::styled(l, theme.muted());
    let sep = || Span::styled("| ", theme.border());

    let parts = vec![
        Span::styled(" Enter ", theme.base().bg(theme.accent).fg(theme.bg)),
        label(" Send "),
        sep(),
        key("i "),
        label("Type "),
        key("esc "),
        label("Stop "),
        sep(),
        key("j/k "),
        label("Scroll "),
        key("tab "),
        label("Panel "),
        sep(),
        key("C "),
        label("Forget "),
        sep(),
        key("t "),
        label("Theme "),
        sep(),
        key("q "),
        label("Quit "),
    ];

    let paragraph = Paragraph::new(Line::from(parts))
        .style(theme.base())
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_theme_popup(frame: &mut Frame, app: &mut App) {
    let theme = &app.theme;
    let area = centered_rect(40, 60, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" select theme ", theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.accent())
        .style(theme.base());

    let mut lines: Vec<Line> = ThemeKind::ALL
        .iter()
        .enumerate()
        .map(|(i, &kind)| {
            let name = kind.name();
            if i == app.theme_scroll {
                Line::from(vec![
                    Span::styled(" > ", theme.accent()),
                    Span::styled(name, theme.selected().fg(theme.accent)),
                ])
            } else {
                Line::styled(format!("   {name}"), theme.base())
            }
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" j/k ", theme.accent()),
        Span::styled("navigate  ", theme.muted()),
        Span::styled("enter ", theme.accent()),
        Span::styled("select  ", theme.muted()),
        Span::styled("esc ", theme.accent()),
        Span::styled("close", theme.muted()),
    ]));

    let paragraph = Paragraph::new(lines).block(block).style(theme.base());
    frame.render_widget(paragraph, area);
}

fn render_clear_popup(frame: &mut Frame, app: &mut App) {
    let theme = &app.theme;
    let area = centered_rect(50, 30, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(" forget conversation ", theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.warning())
        .style(theme.base());

    let lines = vec![
        Line::from(vec![
            Span::styled("everything stored for ", theme.base()),
            Span::styled(&app.user_id, theme.accent()),
            Span::styled(" will be deleted.", theme.base()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("continue? ", theme.base()),
            Span::styled("[y]es ", theme.error()),
            Span::styled("[n]o", theme.success()),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Emotion;

    #[test]
    fn wrapped_height_counts_overflow_rows() {
        let lines = vec![
            Line::from("abcdefghij"),
            Line::from(""),
            Line::from("abc"),
        ];
        assert_eq!(wrapped_height(&lines, 4), 3 + 1 + 1);
        assert_eq!(wrapped_height(&lines, 20), 3);
    }

    #[test]
    fn chat_lines_label_each_message() {
        let theme = Theme::from_kind(ThemeKind::Dark);
        let lines = vec![
            ChatLine {
                speaker: Speaker::User,
                text: "hi".to_string(),
                emotion: Some(Emotion::Neutral),
                crisis: false,
            },
            ChatLine {
                speaker: Speaker::Companion,
                text: "hello\nthere".to_string(),
                emotion: None,
                crisis: false,
            },
        ];

        let rendered = chat_lines(&theme, &lines);
        // label + text + blank, then label + two text rows + blank
        assert_eq!(rendered.len(), 3 + 4);
        assert_eq!(rendered[0].to_string(), "you (neutral)");
        assert_eq!(rendered[4].to_string(), "  hello");
    }
}
