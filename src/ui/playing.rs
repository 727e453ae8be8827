use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::{popup_area, render_centered, CORRECT, ERROR, GLOW, GOLD};
use crate::levels::MAX_LEVEL;
use crate::session::{Phase, SessionState};

const STAR: char = '★';
const INPUT_PLACEHOLDER: &str = "Press ENTER or click to unleash your typing power...";
const HELP: &str = "ENTER = start/finish | BACKSPACE okay | CLICK results to LEVEL UP! | ESC = Menu";

pub fn level_header(state: &SessionState) -> String {
    format!(
        "Level {}/{} | {} {}{}",
        state.current_level, MAX_LEVEL, state.difficulty, STAR, state.stars_earned
    )
}

/// Countdown while the timer runs, otherwise just the goal
pub fn status_line(state: &SessionState, now: Instant) -> String {
    match state.phase {
        Phase::Active { .. } => format!(
            "Time: {:.1}s | Goal: {:.0}% | Score: {}",
            state.time_remaining(now),
            state.effective_required_accuracy,
            state.total_score
        ),
        _ => format!(
            "Goal: {:.0}% accuracy | Score: {}",
            state.effective_required_accuracy, state.total_score
        ),
    }
}

/// One span per sentence character, coloured by what was typed at that position
pub fn sentence_spans(sentence: &str, typed: &str) -> Vec<Span<'static>> {
    let mut typed = typed.chars();
    let mut cursor_placed = false;

    sentence
        .chars()
        .map(|expected| {
            let style = match typed.next() {
                Some(t) if t == expected => Style::default().fg(CORRECT),
                Some(_) => Style::default().fg(ERROR).add_modifier(Modifier::UNDERLINED),
                None if !cursor_placed => {
                    cursor_placed = true;
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD)
                }
                None => Style::default().fg(Color::Gray),
            };
            Span::styled(expected.to_string(), style)
        })
        .collect()
}

pub fn render(
    state: &SessionState,
    motivation: &str,
    now: Instant,
    area: Rect,
    buf: &mut Buffer,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // level header
            Constraint::Length(2), // status
            Constraint::Length(1), // label
            Constraint::Length(3), // sentence
            Constraint::Length(2), // live accuracy
            Constraint::Length(3), // input
            Constraint::Length(2), // last attempt
            Constraint::Min(0),
            Constraint::Length(1), // help
        ])
        .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    Paragraph::new(Span::styled(level_header(state), bold.fg(GOLD)))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let over_time = state.is_over_time(now);
    Paragraph::new(Span::styled(
        status_line(state, now),
        Style::default().fg(if over_time { ERROR } else { Color::White }),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Paragraph::new("Type exactly:").render(chunks[2], buf);

    Paragraph::new(Line::from(sentence_spans(state.sentence(), &state.typed_text)))
        .wrap(Wrap { trim: false })
        .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        format!("{:.0}%", state.live_accuracy()),
        Style::default().fg(GLOW),
    ))
    .alignment(Alignment::Center)
    .render(chunks[4], buf);

    let input = if state.typed_text.is_empty() {
        Span::styled(
            INPUT_PLACEHOLDER,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(state.typed_text.as_str(), Style::default().fg(Color::White))
    };
    Paragraph::new(input)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GLOW)),
        )
        .render(chunks[5], buf);

    if let (Phase::Idle, Some(result)) = (state.phase, &state.last_result) {
        if !result.passed {
            Paragraph::new(Span::styled(
                format!(
                    "Missed the goal with {:.1}% ({:+} pts). Try again!",
                    result.accuracy, result.score.level_score
                ),
                Style::default().fg(ERROR),
            ))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
        }
    }

    Paragraph::new(Span::styled(HELP, Style::default().fg(Color::LightGreen)))
        .render(chunks[8], buf);

    match state.phase {
        Phase::ResultsShown => render_results(state, motivation, area, buf),
        Phase::Won => render_won(state, area, buf),
        Phase::Idle | Phase::Active { .. } => {}
    }
}

fn overlay(title: &str, color: Color, area: Rect, buf: &mut Buffer) -> Rect {
    let popup = popup_area(area, 60, 13);
    Clear.render(popup, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Center);
    let inner = block.inner(popup);
    block.render(popup, buf);
    inner
}

fn render_results(state: &SessionState, motivation: &str, area: Rect, buf: &mut Buffer) {
    let Some(result) = &state.last_result else {
        return;
    };
    let inner = overlay(" RESULTS ", GOLD, area, buf);
    let ok = Style::default().fg(CORRECT);
    let next = if state.is_final_level() {
        "ENTER / CLICK to claim your crown"
    } else {
        "ENTER / CLICK to dominate the next level"
    };

    render_centered(
        vec![
            Line::styled(
                format!("LEVEL {} CRUSHED!", state.current_level),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Line::styled(motivation.to_string(), Style::default().fg(GLOW)),
            Line::default(),
            Line::styled(format!("Accuracy: {:.1}%", result.accuracy), ok),
            Line::styled(format!("WPM: {:.1}", result.wpm), ok),
            Line::styled(
                format!(
                    "Time: {:.1}s (+{}pts)",
                    result.elapsed_secs, result.score.level_score
                ),
                ok,
            ),
            Line::default(),
            Line::styled(next, Style::default().fg(GLOW)),
        ],
        inner,
        buf,
    );
}

fn render_won(state: &SessionState, area: Rect, buf: &mut Buffer) {
    let inner = overlay(" VICTORY ", GOLD, area, buf);
    render_centered(
        vec![
            Line::styled(
                "TYPING LEGEND!",
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Line::default(),
            Line::styled(
                format!("{} - {}pts", state.player_name, state.total_score),
                Style::default().fg(GOLD),
            ),
            Line::styled(
                format!("{} Mode {}{}", state.difficulty, STAR, state.stars_earned),
                Style::default().fg(GLOW),
            ),
            Line::default(),
            Line::styled("ESC = Main Menu", Style::default().fg(Color::Cyan)),
        ],
        inner,
        buf,
    );
}
