use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{Confirm, Focus, SessionListState, StatusMessage, ToastKind};
use super::layout::{AppLayout, centered_rect};
use super::theme::{Palette, palette};
use super::timestamps::format_last_active;
use crate::models::{ChatRecord, Role};
use crate::preferences::Theme;
use crate::utils::terminal::strip_ansi_codes;

/// Sidebar titles are cut to this many characters
const SIDEBAR_TITLE_CHARS: usize = 40;

/// Everything the renderer needs from the controller for one frame
pub struct RenderState<'a> {
    pub theme: Theme,
    pub sidebar_open: bool,
    pub sessions: &'a SessionListState,
    pub selected_session: usize,
    pub current_session_id: Option<&'a str>,
    pub history: &'a [ChatRecord],
    pub welcome_visible: bool,
    pub sending: bool,
    pub input: &'a str,
    pub input_lines: u16,
    pub focus: Focus,
    pub scroll_from_bottom: u16,
    pub confirm: Option<&'a Confirm>,
    pub status_message: Option<&'a StatusMessage>,
    pub quick_questions: &'a [String],
}

/// Render the entire UI.
///
/// Returns the furthest the chat view can scroll up from the bottom for this
/// frame size, so the caller can clamp its scroll offset.
pub fn render_ui(frame: &mut Frame, state: &RenderState) -> u16 {
    let colors = palette(state.theme);
    let area = frame.area();
    frame.render_widget(
        Block::default().style(Style::default().bg(colors.background).fg(colors.text)),
        area,
    );

    let layout = AppLayout::new(area, state.sidebar_open, state.input_lines);

    if let Some(sidebar_area) = layout.sidebar_area {
        render_sidebar(frame, sidebar_area, state, colors);
    }
    render_header(frame, layout.header_area, state, colors);
    let max_scroll = if state.welcome_visible {
        render_welcome(frame, layout.chat_area, state.quick_questions, colors);
        0
    } else {
        render_chat(frame, layout.chat_area, state, colors)
    };
    render_input(frame, layout.input_area, state, colors);
    render_status_bar(frame, layout.status_area, state.status_message, colors);

    if let Some(confirm) = state.confirm {
        render_confirm(frame, area, confirm, colors);
    }

    max_scroll
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &RenderState, colors: &Palette) {
    let focused = state.focus == Focus::Sidebar;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { colors.accent } else { colors.border }))
        .title(" Chats ");

    let sessions = match state.sessions {
        SessionListState::Loaded(sessions) if !sessions.is_empty() => sessions,
        other => {
            let placeholder = match other {
                SessionListState::Loading => "Loading chats…",
                SessionListState::Failed => "Failed to load chats",
                SessionListState::Loaded(_) => "No chat history yet",
            };
            let paragraph = Paragraph::new(placeholder)
                .style(Style::default().fg(colors.muted))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let items: Vec<ListItem> = sessions
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let active = state.current_session_id == Some(session.session_id.as_str());
            let marker = if active { "▶ " } else { "  " };
            let title: String =
                strip_ansi_codes(session.title()).chars().take(SIDEBAR_TITLE_CHARS).collect();
            let age = format_last_active(session.last_active.as_ref());

            let style = if focused && idx == state.selected_session {
                Style::default().fg(colors.on_accent).bg(colors.accent).add_modifier(Modifier::BOLD)
            } else if active {
                Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text)
            };

            ListItem::new(Text::from(vec![
                Line::from(format!("{}{}", marker, title)),
                Line::from(Span::styled(format!("  {}", age), Style::default().fg(colors.muted))),
            ]))
            .style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_header(frame: &mut Frame, area: Rect, state: &RenderState, colors: &Palette) {
    let session_label = match state.current_session_id {
        Some(id) => format!("Session {}", short_id(id)),
        None => "New chat".to_string(),
    };
    let title = Line::from(vec![
        Span::styled(
            " ✚ MediGenius ",
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("· {}", session_label), Style::default().fg(colors.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), area);

    let theme_label = match state.theme {
        Theme::Light => "☀ light ",
        Theme::Dark => "☾ dark ",
    };
    frame.render_widget(
        Paragraph::new(Span::styled(theme_label, Style::default().fg(colors.muted)))
            .alignment(Alignment::Right),
        area,
    );
}

fn render_welcome(frame: &mut Frame, area: Rect, quick_questions: &[String], colors: &Palette) {
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to MediGenius",
            Style::default().fg(colors.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your medical assistant. Ask a question to get started.",
            Style::default().fg(colors.muted),
        )),
        Line::from(""),
    ];
    for (idx, question) in quick_questions.iter().take(4).enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("F{}  ", idx + 1), Style::default().fg(colors.accent)),
            Span::raw(question.clone()),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(paragraph, area);
}

fn render_chat(frame: &mut Frame, area: Rect, state: &RenderState, colors: &Palette) -> u16 {
    let lines = chat_lines(state.history, state.sending, colors);
    let inner_width = area.width.saturating_sub(2);
    let total_rows = wrapped_height(&lines, inner_width);
    let visible_rows = area.height.saturating_sub(2);
    let max_scroll = total_rows.saturating_sub(visible_rows);
    let offset = max_scroll.saturating_sub(state.scroll_from_bottom);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border)),
        )
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    frame.render_widget(paragraph, area);
    max_scroll
}

/// Lines for the message history plus the typing indicator
fn chat_lines(history: &[ChatRecord], sending: bool, colors: &Palette) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for record in history {
        let (icon, color) = match record.role {
            Role::User => ("👤", colors.user),
            Role::Assistant => ("🤖", colors.assistant),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} {}", icon, record.role.sender_label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", record.timestamp), Style::default().fg(colors.muted)),
        ]));

        for line in strip_ansi_codes(&record.content).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }

        if let Some(source) = &record.source {
            lines.push(Line::from(Span::styled(
                format!("  ⛁ {}", strip_ansi_codes(source)),
                Style::default().fg(colors.muted).add_modifier(Modifier::ITALIC),
            )));
        }
        lines.push(Line::from(""));
    }

    if sending {
        lines.push(Line::from(Span::styled(
            "🤖 MediGenius is typing…",
            Style::default().fg(colors.muted).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

/// Rows `lines` occupy when wrapped to `width` columns
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let width = usize::from(width);
    let rows: usize = lines.iter().map(|line| line.width().div_ceil(width).max(1)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_input(frame: &mut Frame, area: Rect, state: &RenderState, colors: &Palette) {
    let focused = state.focus == Focus::Input;
    let title = if state.sending { " Waiting for reply… " } else { " Message (Enter to send) " };

    let content = if state.input.is_empty() {
        Text::from(Span::styled(
            "Ask a medical question…",
            Style::default().fg(colors.muted),
        ))
    } else {
        let mut text = Text::from(state.input.to_string());
        if focused && let Some(last) = text.lines.last_mut() {
            last.push_span(Span::styled("▏", Style::default().fg(colors.accent)));
        }
        text
    };

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused { colors.accent } else { colors.border }))
                .title(title),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    status_message: Option<&StatusMessage>,
    colors: &Palette,
) {
    let line = if let Some(msg) = status_message {
        let (icon, color) = match msg.kind {
            ToastKind::Success => ("✓", colors.success),
            ToastKind::Error => ("✗", colors.error),
            ToastKind::Info => ("ℹ", colors.info),
        };
        Line::from(Span::styled(
            format!(" {} {}", icon, msg.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(Span::styled(
            " Enter send · Tab chats · ^N new · ^L clear · ^D delete · ^S save · ^Y copy · ^T theme · ^B sidebar · ^Q quit",
            Style::default().fg(colors.muted),
        ))
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_confirm(frame: &mut Frame, area: Rect, confirm: &Confirm, colors: &Palette) {
    let popup = centered_rect(52, 6, area);
    let text = Text::from(vec![
        Line::from(""),
        Line::from(confirm.prompt()),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] ", Style::default().fg(colors.accent).add_modifier(Modifier::BOLD)),
            Span::raw("Yes    "),
            Span::styled("[n] ", Style::default().fg(colors.error).add_modifier(Modifier::BOLD)),
            Span::raw("No"),
        ]),
    ]);

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(colors.background).fg(colors.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.accent))
                .title(" Confirm "),
        );
    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
