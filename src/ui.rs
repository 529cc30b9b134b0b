use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Wrap,
    },
    Frame,
};

use crate::app::{App, FocusPane, InputMode, RequestStatus, Section};
use crate::notice::NoticeLevel;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Paint the theme background before anything else
    let backdrop = Block::default().style(Style::default().bg(app.theme.bg()).fg(app.theme.fg()));
    frame.render_widget(backdrop, area);

    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(20), Constraint::Min(0)]).areas(body_area);

    render_sidebar(app, frame, sidebar_area);

    match app.section {
        Section::Dashboard => render_dashboard(app, frame, content_area),
        Section::History => render_history(app, frame, content_area),
        Section::Settings => render_settings(app, frame, content_area),
    }

    render_footer(app, frame, footer_area);
}

fn ellipsis(frame: u8) -> &'static str {
    match frame % 3 {
        0 => ".",
        1 => "..",
        _ => "...",
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status = if app.busy {
        Span::styled(" ◌ Generating ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ● System Ready ", Style::default().fg(Color::Green))
    };

    let title = Line::from(vec![
        Span::styled(
            " EasyPLC ",
            Style::default().fg(app.theme.accent()).bold(),
        ),
        Span::styled(
            "PLC Code Generator ",
            Style::default().fg(app.theme.muted()),
        ),
        status,
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(app.theme.muted()),
        ),
    ]);

    frame.render_widget(Paragraph::new(title), area);
}

fn render_sidebar(app: &mut App, frame: &mut Frame, area: Rect) {
    let border_color = if app.focus == FocusPane::Sidebar {
        app.theme.accent()
    } else {
        app.theme.border()
    };

    let items: Vec<ListItem> = Section::all()
        .iter()
        .map(|section| ListItem::new(format!("  {}", section.title())))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(" Menu "),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.accent())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.sidebar_state);
}

fn render_dashboard(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, output_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    render_input_panel(app, frame, input_area);

    let [st_area, ld_area] =
        Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(output_area);

    render_structured_text(app, frame, st_area);
    render_ladder(app, frame, ld_area);
}

const INPUT_PLACEHOLDER: &str = "\
Describe your automation logic here...

For example:
- Start motor when button pressed
- Stop motor after 5 seconds or when stop button pressed
- Include safety interlocks
- Add process monitoring";

fn render_input_panel(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.input_mode == InputMode::Editing {
        Color::Yellow
    } else if app.focus == FocusPane::Input {
        app.theme.accent()
    } else {
        app.theme.border()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Describe Machine Logic ");

    let text = if app.description_input.is_empty() && app.input_mode != InputMode::Editing {
        Text::styled(INPUT_PLACEHOLDER, Style::default().fg(app.theme.muted()))
    } else if app.busy {
        // Input is the disabled control while a request is in flight
        Text::styled(
            app.description_input.clone(),
            Style::default().fg(app.theme.muted()),
        )
    } else {
        Text::from(input_line(app))
    };

    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// The description with a block cursor at the edit position.
fn input_line(app: &App) -> Line<'static> {
    let input = &app.description_input;

    if app.input_mode != InputMode::Editing {
        return Line::from(input.clone());
    }

    let byte_pos = input
        .char_indices()
        .nth(app.input_cursor)
        .map(|(i, _)| i)
        .unwrap_or(input.len());

    let before = input[..byte_pos].to_string();
    let mut rest = input[byte_pos..].chars();
    let cursor_char = rest.next();
    let after: String = rest.collect();

    let cursor_span = Span::styled(
        cursor_char.map(String::from).unwrap_or_else(|| " ".to_string()),
        Style::default().add_modifier(Modifier::REVERSED),
    );

    Line::from(vec![Span::raw(before), cursor_span, Span::raw(after)])
}

fn render_structured_text(app: &mut App, frame: &mut Frame, area: Rect) {
    let border_color = if app.focus == FocusPane::Output {
        app.theme.accent()
    } else {
        app.theme.border()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Structured Text (ST) ");

    if app.busy {
        let loading = Paragraph::new(format!(
            "Generating structured text{}",
            ellipsis(app.animation_frame)
        ))
        .style(Style::default().fg(app.theme.muted()))
        .block(block);
        frame.render_widget(loading, area);
        return;
    }

    // Track viewport geometry so scroll clamping and the scrollbar stay honest
    app.output_height = area.height.saturating_sub(2);
    app.output_lines = clamped_line_count(&app.generated.structured_text);
    let max_scroll = app.output_lines.saturating_sub(app.output_height);
    app.output_scroll = app.output_scroll.min(max_scroll);

    let code = Paragraph::new(app.generated.structured_text.clone())
        .style(Style::default().fg(app.theme.code()))
        .block(block)
        .scroll((app.output_scroll, 0));
    frame.render_widget(code, area);

    if app.output_lines > app.output_height {
        let mut scrollbar_state = ScrollbarState::new(max_scroll as usize)
            .position(app.output_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            area,
            &mut scrollbar_state,
        );
    }
}

/// Line count saturated to the scroll range, so oversized responses cannot
/// wrap around and corrupt clamping.
fn clamped_line_count(text: &str) -> u16 {
    u16::try_from(text.lines().count()).unwrap_or(u16::MAX)
}

fn render_ladder(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border()))
        .title(" Ladder Logic (LD) ");

    let text = if app.busy {
        Text::styled(
            format!("Generating ladder diagram{}", ellipsis(app.animation_frame)),
            Style::default().fg(app.theme.muted()),
        )
    } else {
        Text::from(vec![
            Line::raw(""),
            Line::from(app.generated.ladder_summary.clone()),
            Line::raw(""),
            Line::styled(
                "Visual diagram rendering coming soon",
                Style::default().fg(app.theme.muted()).italic(),
            ),
        ])
    };

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(paragraph, area);
}

fn render_history(app: &mut App, frame: &mut Frame, area: Rect) {
    let border_color = if app.focus == FocusPane::Output {
        app.theme.accent()
    } else {
        app.theme.border()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Session Requests ");

    if app.history.is_empty() {
        let empty = Paragraph::new("No requests yet. Generate code from the Dashboard.")
            .style(Style::default().fg(app.theme.muted()))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .history
        .iter()
        .map(|entry| {
            let (symbol, color) = match entry.status {
                RequestStatus::Pending => ("… ", Color::Yellow),
                RequestStatus::Done => ("✓ ", Color::Green),
                RequestStatus::Failed => ("✗ ", Color::Red),
            };
            ListItem::new(Line::from(vec![
                Span::styled(symbol, Style::default().fg(color)),
                Span::raw(entry.description.clone()),
            ]))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(app.theme.accent())
            .add_modifier(Modifier::BOLD),
    );

    frame.render_stateful_widget(list, area, &mut app.history_state);
}

fn render_settings(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border()))
        .title(" Settings ");

    let label = Style::default().fg(app.theme.muted());
    let value = Style::default().fg(app.theme.fg()).bold();

    let endpoint = app
        .http
        .as_ref()
        .map(|g| g.base_url().to_string())
        .unwrap_or_else(|| "<not configured>".to_string());

    let lines = vec![
        Line::raw(""),
        Line::from(vec![
            Span::styled("  Theme     ", label),
            Span::styled(app.theme.display_name(), value),
            Span::styled("   (t to toggle)", label),
        ]),
        Line::from(vec![
            Span::styled("  Backend   ", label),
            Span::styled(app.backend.display_name(), value),
            Span::styled("   (b to switch)", label),
        ]),
        Line::from(vec![
            Span::styled("  Endpoint  ", label),
            Span::styled(endpoint, value),
        ]),
        Line::raw(""),
        Line::styled(
            "  Preferences are stored in easyplc/config.json under the user config directory.",
            label,
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    if let Some(notice) = &app.notice {
        let color = match notice.level {
            NoticeLevel::Info => app.theme.accent(),
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", notice.title),
                Style::default().fg(color).bold(),
            ),
            Span::styled(notice.body.clone(), Style::default().fg(app.theme.fg())),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().fg(app.theme.muted());

    let hints: Vec<Span> = match (app.section, app.input_mode) {
        (Section::Dashboard, InputMode::Editing) => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" generate ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" done ", label_style),
        ],
        (Section::Dashboard, InputMode::Normal) => vec![
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" describe ", label_style),
            Span::styled(" c/C ", key_style),
            Span::styled(" copy ST/LD ", label_style),
            Span::styled(" s ", key_style),
            Span::styled(" simulate ", label_style),
            Span::styled(" t ", key_style),
            Span::styled(" theme ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Section::History, _) => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
            Span::styled(" t ", key_style),
            Span::styled(" theme ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        (Section::Settings, _) => vec![
            Span::styled(" b ", key_style),
            Span::styled(" backend ", label_style),
            Span::styled(" t ", key_style),
            Span::styled(" theme ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_saturates_for_oversized_output() {
        assert_eq!(clamped_line_count(""), 0);
        assert_eq!(clamped_line_count("a\nb\nc"), 3);

        let huge = "x\n".repeat(u16::MAX as usize + 100);
        assert_eq!(clamped_line_count(&huge), u16::MAX);
    }
}
