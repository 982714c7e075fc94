use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use typero::session::{CharVerdict, Session, WordStatus};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VISIBLE_LINES: usize = 3;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Typing => render_typing(self, area, buf),
            AppState::Results => render_results(self, area, buf),
        }
    }
}

/// Rough words-per-row estimate from the average rendered word width, so the
/// sliding window adapts to the terminal instead of overflowing.
fn words_per_line(words: &[String], max_chars: usize) -> usize {
    if words.is_empty() || max_chars == 0 {
        return 1;
    }
    let avg = words.iter().map(|w| w.width() + 1).sum::<usize>() / words.len();
    (max_chars / avg.max(1)).clamp(1, 16)
}

fn verdict_style(verdict: CharVerdict) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match verdict {
        CharVerdict::Correct => bold.fg(Color::Green),
        CharVerdict::Incorrect => bold.fg(Color::Red),
        CharVerdict::Pending => bold.add_modifier(Modifier::DIM),
    }
}

fn word_spans(session: &Session, idx: usize) -> Vec<Span<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim_bold = bold.add_modifier(Modifier::DIM);

    let word = &session.words[idx];
    let state = &session.word_states[idx];

    match state.status {
        WordStatus::Correct => vec![Span::styled(word.clone(), bold.fg(Color::Green))],
        WordStatus::Incorrect => vec![Span::styled(word.clone(), bold.fg(Color::Red))],
        WordStatus::Pending => vec![Span::styled(word.clone(), dim_bold)],
        WordStatus::Current => {
            let typed_len = session.input.chars().count();
            let mut spans: Vec<Span> = word
                .chars()
                .enumerate()
                .map(|(i, ch)| {
                    let verdict = state
                        .verdicts
                        .get(i)
                        .copied()
                        .unwrap_or(CharVerdict::Pending);
                    let mut style = verdict_style(verdict);
                    if i == typed_len {
                        // next expected character
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }
                    Span::styled(ch.to_string(), style)
                })
                .collect();

            // overflow typed past the end of the word
            for ch in session.input.chars().skip(word.chars().count()) {
                spans.push(Span::styled(ch.to_string(), bold.fg(Color::Red)));
            }
            spans
        }
    }
}

fn word_window(session: &Session, max_chars: usize) -> Vec<Line<'static>> {
    let per_line = words_per_line(&session.words, max_chars);
    let current_line = session.current_word_index / per_line;
    let start_line = current_line.saturating_sub(1);

    let rows: Vec<Vec<usize>> = (0..session.words.len())
        .chunks(per_line)
        .into_iter()
        .map(|chunk| chunk.collect())
        .collect();

    rows.into_iter()
        .skip(start_line)
        .take(VISIBLE_LINES)
        .map(|row| {
            let mut spans = Vec::new();
            for (i, idx) in row.into_iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.extend(word_spans(session, idx));
            }
            Line::from(spans)
        })
        .collect()
}

fn render_typing(app: &App, area: Rect, buf: &mut Buffer) {
    let dim_bold = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::DIM);
    let italic = Style::default().add_modifier(Modifier::ITALIC);

    let top_pad = area.height.saturating_sub(VISIBLE_LINES as u16 + 4) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(top_pad),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(VISIBLE_LINES as u16),
                Constraint::Min(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    let live = app.controller.live();
    let header = Line::from(vec![
        Span::styled(format!("wpm {}", live.wpm), dim_bold),
        Span::raw("   "),
        Span::styled(format!("acc {}%", live.accuracy), dim_bold),
        Span::raw("   "),
        Span::styled(
            format!("time {}s", app.controller.remaining_secs()),
            dim_bold.fg(Color::Yellow),
        ),
    ]);
    Paragraph::new(header)
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let max_chars = chunks[3].width.saturating_sub(1) as usize;
    let lines = word_window(app.controller.session(), max_chars);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    let hint = ["(esc) quit", "(←) restart"].iter().join("   ");
    Paragraph::new(Span::styled(hint, italic))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let result = match app.controller.final_result() {
        Some(r) => r,
        None => return,
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let magenta_bold = bold.fg(Color::Magenta);

    let top_pad = area.height.saturating_sub(8) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints(
            [
                Constraint::Length(top_pad),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Span::styled("time's up!", bold.fg(Color::Yellow)))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    Paragraph::new(Span::styled(
        format!("score {}", result.score),
        magenta_bold,
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Line::from(vec![
        Span::styled(format!("{} wpm", result.wpm), bold),
        Span::raw("   "),
        Span::styled(format!("{}% accuracy", result.accuracy), bold),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "score = wpm x 10 x accuracy multiplier (0.5 to 1.5)",
        italic.add_modifier(Modifier::DIM),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    let legend = ["(r)etry", "(1) 15s", "(2) 30s", "(3) 60s", "(esc) quit"]
        .iter()
        .join("   ");
    Paragraph::new(Span::styled(legend, italic))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);
}
