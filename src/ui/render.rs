use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, FormFocus};

use super::styles;

/// Width of the text inside the identifier/password brackets.
const FIELD_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Login form
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_login_form(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if app.notice.is_open() {
        render_notice_overlay(frame, app);
    }
}

fn render_title_bar(frame: &mut Frame, _app: &App, area: Rect) {
    let title = "  Member Portal";
    let help_hint = "[Esc] Quit";

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            area.width
                .saturating_sub(title.len() as u16 + help_hint.len() as u16 + 4)
                as usize,
        )),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_login_form(frame: &mut Frame, app: &App, area: Rect) {
    // Fixed size dialog - the validation line adds a row when shown
    let height = if app.show_validation() { 15 } else { 14 };
    let dialog = centered_rect_fixed(46, height, area);

    frame.render_widget(Clear, dialog);

    let mut lines = vec![];

    // ASCII art logo (centered)
    lines.push(Line::from(Span::styled(
        "        ╔═╗╔═╗╦═╗╔╦╗╔═╗╦  ",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "        ╠═╝║ ║╠╦╝ ║ ╠═╣║  ",
        styles::title_style(),
    )));
    lines.push(Line::from(Span::styled(
        "        ╩  ╚═╝╩╚═ ╩ ╩ ╩╩═╝",
        styles::title_style(),
    )));
    lines.push(Line::from(""));

    // Identifier field
    let id_focused = app.focus == FormFocus::Identifier;
    let id_style = if id_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    let shown: String = app
        .identifier
        .chars()
        .rev()
        .take(FIELD_WIDTH)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    let cursor = if id_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("      ID: [", styles::muted_style()),
        Span::styled(format!("{:<FIELD_WIDTH$}{}", shown, cursor), id_style),
        Span::styled("]", styles::muted_style()),
    ]));

    // Validation verdict, shown only while the identifier is non-empty
    if app.show_validation() {
        let style = if app.validation.is_valid {
            styles::success_style()
        } else {
            styles::error_style()
        };
        lines.push(Line::from(vec![
            Span::raw("      "),
            Span::styled(app.validation.message, style),
        ]));
    }

    // Password field (masked)
    let pw_focused = app.focus == FormFocus::Password;
    let pw_style = if pw_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    let masked: String = "*".repeat(app.password.chars().count().min(FIELD_WIDTH));
    let cursor = if pw_focused { "▌" } else { "" };
    lines.push(Line::from(vec![
        Span::raw("      "),
        Span::styled("Password: [", styles::muted_style()),
        Span::styled(format!("{:<FIELD_WIDTH$}{}", masked, cursor), pw_style),
        Span::styled("]", styles::muted_style()),
    ]));
    lines.push(Line::from(""));

    // Remember-me checkbox
    let remember_focused = app.focus == FormFocus::Remember;
    let check = if app.remember { "[x]" } else { "[ ]" };
    let remember_style = if remember_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    lines.push(Line::from(vec![
        Span::raw("            "),
        Span::styled(format!("{} Remember me", check), remember_style),
    ]));
    lines.push(Line::from(""));

    // Login button, dimmed until submission is enabled
    let button_focused = app.focus == FormFocus::Button;
    let button_style = if !app.can_submit() {
        styles::disabled_style()
    } else if button_focused {
        styles::selected_style()
    } else {
        styles::field_style()
    };
    let label = if app.submitting {
        " Signing in... "
    } else if button_focused {
        " ▶ Login ◀ "
    } else {
        "   Login   "
    };
    lines.push(Line::from(vec![
        Span::raw("              ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("   "),
        Span::styled("[F2]", styles::help_key_style()),
        Span::styled(" Social login    ", styles::muted_style()),
        Span::styled("[F3]", styles::help_key_style()),
        Span::styled(" Register", styles::muted_style()),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else if app.logged_in {
        let who = app.session.data.as_ref().map(|d| d.identifier.as_str());
        format!(" Signed in as {} ", who.unwrap_or("?"))
    } else {
        " Not signed in ".to_string()
    };

    let right_text = " [Tab] Next field | [Enter] Submit ".to_string();
    let padding = (area.width as usize)
        .saturating_sub(left_text.len())
        .saturating_sub(right_text.len());

    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_notice_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(50, 9, frame.area());

    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.notice.message()),
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("                   ["),
            Span::styled("  OK  ", styles::selected_style()),
            Span::raw("]"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "      Press Enter, Esc, or click to dismiss",
            styles::muted_style(),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
