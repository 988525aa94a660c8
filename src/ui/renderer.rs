use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::preferences::MODEL_CATALOG;
use crate::ui::app::ChatApp;
use crate::ui::scroll::ScrollCalculator;
use crate::ui::settings::SettingsOverlay;

pub fn ui(f: &mut Frame, app: &ChatApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    let lines = ScrollCalculator::build_display_lines(app.conversation.messages());

    // Account for the title row
    let available_height = chunks[0].height.saturating_sub(1);
    let total_wrapped_lines = ScrollCalculator::calculate_wrapped_line_count(&lines, chunks[0].width);

    let max_offset = total_wrapped_lines.saturating_sub(available_height);
    let scroll_offset = if app.auto_scroll {
        max_offset
    } else {
        app.scroll_offset.min(max_offset)
    };

    let prefs = app.store.get();
    let title = format!(
        "causerie v{} • {} @ {}",
        env!("CARGO_PKG_VERSION"),
        prefs.model,
        prefs.temperature
    );

    let messages_paragraph = Paragraph::new(lines)
        .block(Block::default().title(title))
        .wrap(Wrap { trim: true })
        .scroll((scroll_offset, 0));

    f.render_widget(messages_paragraph, chunks[0]);

    let input_title = match &app.status {
        Some(status) => status.clone(),
        None => "Type a message (Enter to send, /help for commands, Ctrl+C to quit)".to_string(),
    };

    // While a reply is in flight, pin a pulsing indicator to the right edge
    // of the input box.
    let input_text = if app.is_sending() {
        let elapsed = app.pulse_start.elapsed().as_millis() as f32 / 1000.0;
        let pulse_phase = (elapsed * 2.0) % 2.0; // 2 cycles per second
        let pulse_intensity = if pulse_phase < 1.0 {
            pulse_phase
        } else {
            2.0 - pulse_phase
        };

        let symbol = if pulse_intensity < 0.33 {
            "○"
        } else if pulse_intensity < 0.66 {
            "◐"
        } else {
            "●"
        };

        let inner_width = chunks[1].width.saturating_sub(2) as usize;
        let mut result = vec![' '; inner_width];

        let input_chars: Vec<char> = app.input.chars().collect();
        let max_input_len = inner_width.saturating_sub(3);

        for (i, &ch) in input_chars.iter().take(max_input_len).enumerate() {
            result[i] = ch;
        }

        if input_chars.len() > max_input_len && max_input_len >= 3 {
            result[max_input_len - 3] = '.';
            result[max_input_len - 2] = '.';
            result[max_input_len - 1] = '.';
        }

        if inner_width > 1 {
            if let Some(symbol_char) = symbol.chars().next() {
                result[inner_width - 2] = symbol_char;
            }
        }

        result.into_iter().collect()
    } else {
        app.input.clone()
    };

    let input = Paragraph::new(input_text.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(input_title.as_str()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(input, chunks[1]);

    if app.settings.is_none() {
        let cursor_chars = app.input_cursor.min(app.input.chars().count()) as u16;
        let max_cursor_x = if app.is_sending() {
            chunks[1].width.saturating_sub(6) // leave room for the indicator
        } else {
            chunks[1].width.saturating_sub(2)
        };
        let cursor_x = (cursor_chars + 1).min(max_cursor_x);
        f.set_cursor_position((chunks[1].x + cursor_x, chunks[1].y + 1));
    }

    if let Some(overlay) = &app.settings {
        draw_settings(f, overlay);
    }
}

fn draw_settings(f: &mut Frame, overlay: &SettingsOverlay) {
    let area = centered_rect(50, 60, f.area());
    f.render_widget(Clear, area);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Model: ", Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(
            overlay.draft.model.clone(),
            Style::default().fg(Color::Cyan),
        ),
    ]));
    lines.push(Line::from(""));

    for (i, option) in MODEL_CATALOG.iter().enumerate() {
        let marked = overlay.marks(i);
        let marker = if marked { "▶ " } else { "  " };
        let style = if marked {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("  {}{}", marker, option.label),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  Temperature  ◂ {} ▸", overlay.draft.temperature),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Up/Down model   Left/Right temperature   Enter apply   Esc cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Settings")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(panel, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let h = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(v[1]);
    h[1]
}
