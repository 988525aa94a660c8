use std::collections::VecDeque;

use chrono::Local;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::core::message::{Message, Role};

/// Scroll-related calculations and transcript line building.
pub struct ScrollCalculator;

impl ScrollCalculator {
    /// Build display lines for all messages.
    pub fn build_display_lines(messages: &VecDeque<Message>) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        for message in messages {
            Self::add_message_lines(&mut lines, message);
        }

        lines
    }

    /// Lines for a single message: content, a dim local-time stamp, spacing.
    fn add_message_lines(lines: &mut Vec<Line<'static>>, message: &Message) {
        match message.role {
            Role::User => {
                lines.push(Line::from(vec![
                    Span::styled(
                        "You: ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(message.content.clone(), Style::default().fg(Color::Cyan)),
                ]));
            }
            Role::System => {
                lines.push(Line::from(Span::styled(
                    message.content.clone(),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            Role::Assistant => {
                for content_line in message.content.lines() {
                    if content_line.trim().is_empty() {
                        lines.push(Line::from(""));
                    } else {
                        lines.push(Line::from(Span::styled(
                            content_line.to_string(),
                            Style::default().fg(Color::White),
                        )));
                    }
                }
            }
        }

        let stamp = message
            .created_at
            .with_timezone(&Local)
            .format("%H:%M:%S")
            .to_string();
        lines.push(Line::from(Span::styled(
            stamp,
            Style::default().fg(Color::DarkGray),
        )));
        lines.push(Line::from(""));
    }

    /// How many terminal rows the given lines occupy once wrapped.
    pub fn calculate_wrapped_line_count(lines: &[Line], terminal_width: u16) -> u16 {
        let mut total_wrapped_lines = 0u16;

        for line in lines {
            let line_text = line.to_string();
            let trimmed_text = line_text.trim();

            if trimmed_text.is_empty() || terminal_width == 0 {
                total_wrapped_lines = total_wrapped_lines.saturating_add(1);
            } else {
                // Word-based wrapping to match ratatui's Wrap { trim: true }
                let wrapped = Self::calculate_word_wrapped_lines(trimmed_text, terminal_width);
                total_wrapped_lines = total_wrapped_lines.saturating_add(wrapped);
            }
        }

        total_wrapped_lines
    }

    fn calculate_word_wrapped_lines(text: &str, terminal_width: u16) -> u16 {
        let mut current_line_len = 0;
        let mut line_count = 1u16;

        for word in text.split_whitespace() {
            let word_len = word.chars().count();

            if current_line_len > 0 && current_line_len + 1 + word_len > terminal_width as usize {
                line_count = line_count.saturating_add(1);
                current_line_len = word_len;
            } else {
                if current_line_len > 0 {
                    current_line_len += 1;
                }
                current_line_len += word_len;
            }
        }

        line_count
    }

    /// Scroll offset that shows the bottom of the transcript.
    pub fn calculate_scroll_to_bottom(
        messages: &VecDeque<Message>,
        terminal_width: u16,
        available_height: u16,
    ) -> u16 {
        let lines = Self::build_display_lines(messages);
        let total_wrapped_lines = Self::calculate_wrapped_line_count(&lines, terminal_width);

        total_wrapped_lines.saturating_sub(available_height)
    }

    pub fn calculate_max_scroll_offset(
        messages: &VecDeque<Message>,
        terminal_width: u16,
        available_height: u16,
    ) -> u16 {
        Self::calculate_scroll_to_bottom(messages, terminal_width, available_height)
    }
}
