use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use super::{render_centered, GLOW, GOLD};
use crate::highscores::HighScoreEntry;

pub const EMPTY_MESSAGE: &str = "No scores yet! Be the first!";

fn rank_color(rank: usize) -> Color {
    match rank {
        0 => GOLD,
        1 | 2 => GLOW,
        _ => Color::White,
    }
}

pub fn leaderboard_rows(entries: &[HighScoreEntry]) -> Vec<Row<'static>> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            Row::new(vec![
                Cell::from(format!("{}.", i + 1)),
                Cell::from(entry.name.clone()),
                Cell::from(format!("{}pts", entry.score)),
                Cell::from(entry.difficulty.to_string()),
                Cell::from(format!("★{}", entry.stars)),
                Cell::from(entry.date.clone()),
            ])
            .style(Style::default().fg(rank_color(i)))
        })
        .collect()
}

pub fn render(entries: &[HighScoreEntry], area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "GLOBAL LEADERBOARD",
        Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    if entries.is_empty() {
        render_centered(
            vec![Line::styled(EMPTY_MESSAGE, Style::default().fg(GLOW))],
            chunks[1],
            buf,
        );
    } else {
        let header = Row::new(vec!["#", "Name", "Score", "Mode", "Stars", "Date"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);
        let widths = [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(16),
        ];
        Table::new(leaderboard_rows(entries), widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(GLOW)),
            )
            .render(chunks[1], buf);
    }

    Paragraph::new(Span::styled("ESC = Back", Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
}
