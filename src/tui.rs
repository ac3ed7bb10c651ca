use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use arcade::snake::{SnakeEvent, SnakeGame};
use arcade::tetris::{CellState, ShapeKind, TetrisEvent, TetrisGame};
use arcade::{MiniGame, Phase};

// ============================================================================
// Visual Constants
// ============================================================================

const CELL_WIDTH: u16 = 2;
const BLOCK_CHAR: &str = "██";
const FOOD_CHAR: &str = "()";
const EMPTY_CHAR: &str = "  ";
const INFO_WIDTH: u16 = 16;

const SNAKE_COLOR: Color = Color::Rgb(0, 255, 255);
const FOOD_COLOR: Color = Color::Rgb(255, 0, 64);

fn shape_color(kind: ShapeKind) -> Color {
    match kind {
        ShapeKind::I => Color::Rgb(255, 0, 64),
        ShapeKind::O => Color::Rgb(0, 255, 255),
        ShapeKind::T => Color::Rgb(255, 0, 255),
        ShapeKind::L => Color::Rgb(255, 165, 0),
        ShapeKind::J => Color::Rgb(0, 255, 0),
        ShapeKind::Z => Color::Rgb(255, 255, 0),
        ShapeKind::S => Color::Rgb(255, 20, 147),
    }
}

/// A game the terminal host can open: engine plus its rendering and logging
pub trait Cabinet: MiniGame {
    fn draw(&self, frame: &mut Frame, balance: u64);

    /// Drain the engine's event queue into the log
    fn log_events(&mut self);
}

impl Cabinet for SnakeGame {
    fn draw(&self, frame: &mut Frame, balance: u64) {
        let snapshot = self.snapshot();
        let width = snapshot.width.max(0) as usize;
        let height = snapshot.height.max(0) as usize;

        let mut cells = vec![vec![(EMPTY_CHAR, Style::default()); width]; height];
        let food = snapshot.food;
        if food.in_bounds(snapshot.width, snapshot.height) {
            cells[food.y as usize][food.x as usize] = (FOOD_CHAR, Style::default().fg(FOOD_COLOR));
        }
        for segment in &snapshot.segments {
            if segment.in_bounds(snapshot.width, snapshot.height) {
                cells[segment.y as usize][segment.x as usize] =
                    (BLOCK_CHAR, Style::default().fg(SNAKE_COLOR));
            }
        }

        render_cabinet(
            frame,
            self.title(),
            cells,
            snapshot.score,
            balance,
            snapshot.phase,
            "Arrows/WASD: Turn | P: Pause | R: Restart | Q/ESC: Close",
        );
    }

    fn log_events(&mut self) {
        for event in self.take_events() {
            match event {
                SnakeEvent::Moved | SnakeEvent::DirectionQueued(_) => {
                    tracing::trace!("snake event {:?}", event)
                }
                _ => tracing::debug!("snake event {:?}", event),
            }
        }
    }
}

impl Cabinet for TetrisGame {
    fn draw(&self, frame: &mut Frame, balance: u64) {
        let visual_board = self.render_grid();
        let cells: Vec<Vec<(&str, Style)>> = visual_board
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        CellState::Empty => (EMPTY_CHAR, Style::default()),
                        CellState::Filled(kind) => (BLOCK_CHAR, Style::default().fg(shape_color(*kind))),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        render_cabinet(
            frame,
            self.title(),
            cells,
            self.score(),
            balance,
            self.phase(),
            "←→: Move | ↓: Drop | ↑/Space: Rotate | P: Pause | R: Restart | Q/ESC: Close",
        );
    }

    fn log_events(&mut self) {
        for event in self.take_events() {
            match event {
                TetrisEvent::PieceMoved | TetrisEvent::PieceRotated => {
                    tracing::trace!("tetris event {:?}", event)
                }
                _ => tracing::debug!("tetris event {:?}", event),
            }
        }
    }
}

// ============================================================================
// Rendering
// ============================================================================

fn render_cabinet(
    frame: &mut Frame,
    title: &str,
    cells: Vec<Vec<(&str, Style)>>,
    score: u32,
    balance: u64,
    phase: Phase,
    controls: &str,
) {
    let area = frame.size();

    let columns = cells.first().map_or(0, Vec::len) as u16;
    let grid_display_width = (columns * CELL_WIDTH) + 2;
    let grid_display_height = cells.len() as u16 + 2;
    let total_width = grid_display_width + INFO_WIDTH + 2;
    let total_height = grid_display_height + 3;

    let main_area = centered_rect(total_width, total_height, area);

    let vertical = Layout::vertical([
        Constraint::Length(grid_display_height),
        Constraint::Fill(1),
    ])
    .split(main_area);

    let game_row = vertical[0];

    // Layout: [Grid][Info]
    let horizontal = Layout::horizontal([
        Constraint::Length(grid_display_width),
        Constraint::Length(INFO_WIDTH),
    ])
    .split(game_row);

    render_grid(frame, title, cells, horizontal[0]);
    render_info(frame, score, balance, horizontal[1]);

    let controls_area = Rect {
        x: area.x,
        y: game_row.y + game_row.height,
        width: area.width,
        height: 2,
    };

    if controls_area.y + 1 < area.height {
        let controls = Paragraph::new(vec![Line::from(controls.to_string())])
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(controls, controls_area);
    }

    match phase {
        Phase::Running => {}
        Phase::Paused => render_paused(frame, area),
        Phase::GameOver => render_game_over(frame, score, area),
    }
}

fn render_grid(frame: &mut Frame, title: &str, cells: Vec<Vec<(&str, Style)>>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = cells
        .into_iter()
        .map(|row| {
            Line::from(
                row.into_iter()
                    .map(|(symbol, style)| Span::styled(symbol, style))
                    .collect::<Vec<Span>>(),
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_info(frame: &mut Frame, score: u32, balance: u64, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Info ")
        .title_alignment(Alignment::Center);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Score", Style::default().fg(Color::Yellow))),
        Line::from(format!("{}", score)),
        Line::from(""),
        Line::from(Span::styled("Blood points", Style::default().fg(FOOD_COLOR))),
        Line::from(format!("{}", balance)),
    ];

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

fn render_game_over(frame: &mut Frame, score: u32, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("GAME OVER", Style::default().fg(Color::Red))),
        Line::from(""),
        Line::from(format!("Score: {}", score)),
        Line::from(""),
        Line::from(Span::styled(
            "Press R to play again",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Game Over ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(26, 10, area);
    frame.render_widget(paragraph, popup_area);
}

fn render_paused(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("PAUSED", Style::default().fg(Color::Yellow))),
        Line::from(""),
        Line::from(Span::styled(
            "Press P to continue",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Press ESC to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Paused ")
            .title_alignment(Alignment::Center)
            .style(Style::default().bg(Color::Black)),
    );

    let popup_area = centered_rect(24, 8, area);
    frame.render_widget(paragraph, popup_area);
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .split(area);

    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .split(horizontal[1]);

    vertical[1]
}
