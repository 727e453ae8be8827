pub mod leaderboard;
pub mod playing;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, Screen},
    celebration::Celebration,
    controller::Clock,
    highscores::HighScoreStore,
    levels::Difficulty,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

pub(crate) const GOLD: Color = Color::Rgb(255, 215, 0);
pub(crate) const GLOW: Color = Color::Rgb(100, 255, 255);
pub(crate) const CORRECT: Color = Color::Rgb(0, 255, 150);
pub(crate) const ERROR: Color = Color::Rgb(255, 100, 100);

impl<S: HighScoreStore, C: Clock> Widget for &App<S, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);

        if let Some(session) = &self.session {
            Paragraph::new(Span::styled(
                format!(
                    "Player: {} | Score: {}",
                    session.player_name, session.total_score
                ),
                Style::default().fg(GOLD),
            ))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);
        }

        match self.screen {
            Screen::Menu => render_menu(self.menu_selection, self.sound, chunks[1], buf),
            Screen::Leaderboard => leaderboard::render(&self.high_scores, chunks[1], buf),
            Screen::NameEntry => {
                render_name_entry(&self.player_name, self.difficulty, chunks[1], buf)
            }
            Screen::Playing => {
                if let Some(session) = &self.session {
                    playing::render(
                        session,
                        self.motivation,
                        self.controller.now(),
                        chunks[1],
                        buf,
                    );
                }
            }
        }

        if self.celebration.is_active() {
            render_particles(&self.celebration, area, buf);
        }
    }
}

/// Render `lines` centred horizontally and vertically inside `area`
pub(crate) fn render_centered(lines: Vec<Line<'_>>, area: Rect, buf: &mut Buffer) {
    let height = (lines.len() as u16).min(area.height);
    let top = (area.height - height) / 2;
    let inner = Rect::new(area.x, area.y + top, area.width, height);
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(inner, buf);
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit
pub(crate) fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn render_menu(selection: usize, sound: bool, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::styled("TYPING MASTER PRO", bold.fg(GOLD)),
        Line::default(),
        Line::styled("Choose Difficulty", Style::default().fg(GLOW)),
        Line::default(),
    ];
    for (i, difficulty) in Difficulty::ALL.iter().enumerate() {
        let selected = i == selection;
        let style = if selected {
            bold.fg(GOLD)
        } else {
            Style::default().fg(GLOW)
        };
        lines.push(Line::styled(
            format!("[{}] {}", if selected { '>' } else { ' ' }, difficulty),
            style,
        ));
    }
    lines.extend([
        Line::default(),
        Line::styled(
            "ENTER = Select | UP/DOWN = Navigate",
            Style::default().fg(Color::Cyan),
        ),
        Line::styled(
            format!(
                "L = Leaderboard | SPACE = Sound {} | Q = Quit",
                if sound { "ON" } else { "OFF" }
            ),
            Style::default().fg(GOLD),
        ),
    ]);

    render_centered(lines, area, buf);
}

const NAME_PLACEHOLDER: &str = "Type your name here...";

fn render_name_entry(name: &str, difficulty: Difficulty, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(3), // title
            Constraint::Length(3), // name box
            Constraint::Length(2), // hint
            Constraint::Min(0),
        ])
        .split(area);

    render_centered(
        vec![
            Line::styled(
                format!("{} MODE", difficulty.to_string().to_uppercase()),
                Style::default().fg(GOLD).add_modifier(Modifier::BOLD),
            ),
            Line::styled("Enter your name:", Style::default().fg(GLOW)),
        ],
        chunks[1],
        buf,
    );

    let (text, style) = if name.is_empty() {
        (
            NAME_PLACEHOLDER,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        (name, Style::default().fg(Color::White))
    };
    let box_width = (text.width().max(NAME_PLACEHOLDER.width()) + 4) as u16;
    let box_area = popup_area(chunks[2], box_width, 3);
    Paragraph::new(Span::styled(text, style))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(GLOW)),
        )
        .render(box_area, buf);

    render_centered(
        vec![Line::styled(
            "Press ENTER to start! (ESC = back)",
            Style::default().fg(Color::Cyan),
        )],
        chunks[3],
        buf,
    );
}

fn render_particles(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        GOLD,
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::LightRed,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let alpha = particle.alpha();
        let style = if alpha > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if alpha > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}

#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    buf.content().iter().map(|c| c.symbol()).collect()
}
