use rand::Rng;

use crate::config::TetrisConfig;
use crate::grid::Position;
use crate::reward::{NoReward, RewardCallback};
use crate::types::{Command, MiniGame, Phase};

// ============================================================================
// Configuration
// ============================================================================

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;
pub const SPAWN_POSITION: Position = Position::new(4, 0);

// ============================================================================
// Types
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ShapeKind {
    I,
    O,
    T,
    L,
    J,
    Z,
    S,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 7] = [
        ShapeKind::I,
        ShapeKind::O,
        ShapeKind::T,
        ShapeKind::L,
        ShapeKind::J,
        ShapeKind::Z,
        ShapeKind::S,
    ];

    /// Spawn orientation
    pub fn shape(self) -> Shape {
        let rows: &[&[u8]] = match self {
            ShapeKind::I => &[&[1, 1, 1, 1]],
            ShapeKind::O => &[&[1, 1], &[1, 1]],
            ShapeKind::T => &[&[1, 1, 1], &[0, 1, 0]],
            ShapeKind::L => &[&[1, 1, 1], &[1, 0, 0]],
            ShapeKind::J => &[&[1, 1, 1], &[0, 0, 1]],
            ShapeKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            ShapeKind::S => &[&[0, 1, 1], &[1, 1, 0]],
        };
        Shape::from_rows(rows)
    }

    /// Zero-based colour index; locked cells store `color_index() + 1`
    pub fn color_index(self) -> u8 {
        self as u8
    }

    fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// Binary shape mask, row-major with row 0 on top
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    pub fn from_rows(rows: &[&[u8]]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|&cell| cell != 0).collect())
                .collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Offsets (dx, dy) of occupied cells
    pub fn cells(&self) -> impl Iterator<Item = (i16, i16)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| (x as i16, y as i16))
        })
    }

    /// Quarter turn clockwise: transpose, then reverse each row
    pub fn rotated(&self) -> Shape {
        let height = self.height();
        let rows = (0..self.width())
            .map(|x| (0..height).rev().map(|y| self.rows[y][x]).collect())
            .collect();
        Shape { rows }
    }
}

#[derive(Clone, Debug)]
pub struct Piece {
    pub kind: ShapeKind,
    pub shape: Shape,
    pub anchor: Position,
}

impl Piece {
    pub fn new(kind: ShapeKind) -> Self {
        Self::new_at(kind, SPAWN_POSITION.x, SPAWN_POSITION.y)
    }

    pub fn new_at(kind: ShapeKind, x: i16, y: i16) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            anchor: Position::new(x, y),
        }
    }

    /// Board positions of the occupied cells
    pub fn blocks(&self) -> Vec<Position> {
        self.shape
            .cells()
            .map(|(dx, dy)| self.anchor.offset(dx, dy))
            .collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellState {
    Empty,
    Filled(ShapeKind),
}

impl CellState {
    /// 0 for empty, otherwise colour index + 1
    pub fn value(self) -> u8 {
        match self {
            CellState::Empty => 0,
            CellState::Filled(kind) => kind.color_index() + 1,
        }
    }

    pub fn is_filled(self) -> bool {
        self != CellState::Empty
    }
}

pub type Board = Vec<Vec<CellState>>;

pub fn empty_board() -> Board {
    vec![vec![CellState::Empty; BOARD_WIDTH]; BOARD_HEIGHT]
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TetrisEvent {
    PieceMoved,
    PieceRotated,
    PieceLocked,
    LinesCleared(u32),
    Paused,
    Unpaused,
    GameRestarted,
    GameOver,
}

// ============================================================================
// Piece Provider Trait
// ============================================================================

pub trait PieceProvider {
    fn next_piece(&mut self) -> ShapeKind;
}

pub struct RandomPieceProvider;

impl PieceProvider for RandomPieceProvider {
    fn next_piece(&mut self) -> ShapeKind {
        ShapeKind::random()
    }
}

pub struct SequencePieceProvider {
    pieces: Vec<ShapeKind>,
    index: usize,
}

impl SequencePieceProvider {
    pub fn new(pieces: Vec<ShapeKind>) -> Self {
        Self { pieces, index: 0 }
    }
}

impl PieceProvider for SequencePieceProvider {
    fn next_piece(&mut self) -> ShapeKind {
        let piece = self
            .pieces
            .get(self.index % self.pieces.len().max(1))
            .copied()
            .unwrap_or(ShapeKind::I);
        self.index += 1;
        piece
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view handed to the renderer
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TetrisSnapshot {
    /// Locked cells only
    pub board: Board,
    pub active_kind: ShapeKind,
    /// Active piece cells, including any still above the board
    pub active_cells: Vec<Position>,
    pub score: u32,
    pub phase: Phase,
}

// ============================================================================
// Game
// ============================================================================

pub struct TetrisGame {
    config: TetrisConfig,
    board: Board,
    current_piece: Piece,
    score: u32,
    phase: Phase,
    piece_provider: Box<dyn PieceProvider>,
    reward: Box<dyn RewardCallback>,
    events: Vec<TetrisEvent>,
}

impl TetrisGame {
    pub fn new(config: TetrisConfig) -> Self {
        Self::with_provider(config, Box::new(RandomPieceProvider))
    }

    pub fn with_provider(config: TetrisConfig, mut provider: Box<dyn PieceProvider>) -> Self {
        let current_piece = Piece::new(provider.next_piece());
        Self {
            config,
            board: empty_board(),
            current_piece,
            score: 0,
            phase: Phase::Running,
            piece_provider: provider,
            reward: Box::new(NoReward),
            events: Vec::new(),
        }
    }

    /// Start from an arbitrary board and active piece
    pub fn with_board(board: Board, current_piece: Piece) -> Self {
        Self {
            config: TetrisConfig::default(),
            board,
            current_piece,
            score: 0,
            phase: Phase::Running,
            piece_provider: Box::new(RandomPieceProvider),
            reward: Box::new(NoReward),
            events: Vec::new(),
        }
    }

    pub fn with_reward(mut self, reward: impl RewardCallback + 'static) -> Self {
        self.reward = Box::new(reward);
        self
    }

    /// True if `shape` at `anchor` leaves the sides, reaches the floor or
    /// hits a locked cell. Rows above the board only get the side check.
    pub fn collides(&self, shape: &Shape, anchor: Position) -> bool {
        shape.cells().any(|(dx, dy)| {
            let cell = anchor.offset(dx, dy);
            if cell.x < 0 || cell.x >= BOARD_WIDTH as i16 || cell.y >= BOARD_HEIGHT as i16 {
                return true;
            }
            cell.y >= 0 && self.board[cell.y as usize][cell.x as usize].is_filled()
        })
    }

    fn try_shift(&mut self, dx: i16, dy: i16) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let anchor = self.current_piece.anchor.offset(dx, dy);
        if self.collides(&self.current_piece.shape, anchor) {
            tracing::trace!("Blocked shift ({}, {}) of {:?}", dx, dy, self.current_piece.kind);
            return false;
        }
        self.current_piece.anchor = anchor;
        self.events.push(TetrisEvent::PieceMoved);
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1, 0)
    }

    /// One row of gravity. A blocked piece locks, unless it never left the
    /// top row, which ends the game.
    pub fn move_down(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        if self.try_shift(0, 1) {
            return;
        }
        if self.current_piece.anchor.y <= 0 {
            self.phase = Phase::GameOver;
            self.events.push(TetrisEvent::GameOver);
            tracing::info!("Tetris topped out with score {}", self.score);
        } else {
            self.lock();
        }
    }

    /// Rotate clockwise in place. No wall kicks: a blocked rotation is dropped.
    pub fn rotate(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        let rotated = self.current_piece.shape.rotated();
        if self.collides(&rotated, self.current_piece.anchor) {
            tracing::trace!("Blocked rotation of {:?}", self.current_piece.kind);
            return false;
        }
        self.current_piece.shape = rotated;
        self.events.push(TetrisEvent::PieceRotated);
        true
    }

    /// Merge the active piece into the board, clear full rows, score them
    /// and spawn the next piece.
    pub fn lock(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        let kind = self.current_piece.kind;
        for block in self.current_piece.blocks() {
            if block.y >= 0 {
                self.board[block.y as usize][block.x as usize] = CellState::Filled(kind);
            }
        }
        self.events.push(TetrisEvent::PieceLocked);
        tracing::debug!(
            "Locked {:?} at ({}, {})",
            kind,
            self.current_piece.anchor.x,
            self.current_piece.anchor.y
        );

        let cleared = self.clear_lines();
        if cleared > 0 {
            self.score = self
                .score
                .saturating_add(self.config.line_score.saturating_mul(cleared));
            self.reward.reward();
        }

        self.spawn_next_piece();
    }

    /// Remove every full row, bottom to top, re-checking the same index after
    /// each removal since the rows above shift down into it.
    pub fn clear_lines(&mut self) -> u32 {
        let mut cleared_count = 0;
        let mut y = BOARD_HEIGHT;

        while y > 0 {
            if self.is_row_complete(y - 1) {
                self.board.remove(y - 1);
                self.board.insert(0, vec![CellState::Empty; BOARD_WIDTH]);
                cleared_count += 1;
            } else {
                y -= 1;
            }
        }

        if cleared_count > 0 {
            self.events.push(TetrisEvent::LinesCleared(cleared_count));
            tracing::debug!("Cleared {} lines", cleared_count);
        }

        cleared_count
    }

    pub fn spawn_next_piece(&mut self) {
        self.current_piece = Piece::new(self.piece_provider.next_piece());
    }

    pub fn toggle_pause(&mut self) {
        let toggled = self.phase.toggled();
        if toggled == self.phase {
            return;
        }
        self.phase = toggled;
        self.events.push(match toggled {
            Phase::Paused => TetrisEvent::Paused,
            _ => TetrisEvent::Unpaused,
        });
        tracing::debug!("Tetris phase is now {:?}", self.phase);
    }

    pub fn reset(&mut self) {
        self.board = empty_board();
        self.score = 0;
        self.phase = Phase::Running;
        self.events.clear();
        self.spawn_next_piece();
        self.events.push(TetrisEvent::GameRestarted);
        tracing::info!("Tetris restarted");
    }

    pub fn snapshot(&self) -> TetrisSnapshot {
        TetrisSnapshot {
            board: self.board.clone(),
            active_kind: self.current_piece.kind,
            active_cells: self.current_piece.blocks(),
            score: self.score,
            phase: self.phase,
        }
    }

    /// Returns the visual board with the active piece overlaid
    pub fn render_grid(&self) -> Board {
        let mut visual_board = self.board.clone();

        for block in self.current_piece.blocks() {
            if block.y >= 0 && block.y < BOARD_HEIGHT as i16 && block.x >= 0 && block.x < BOARD_WIDTH as i16 {
                visual_board[block.y as usize][block.x as usize] = CellState::Filled(self.current_piece.kind);
            }
        }

        visual_board
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current_piece
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<TetrisEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check if a specific row is complete (all filled)
    pub fn is_row_complete(&self, y: usize) -> bool {
        self.board[y].iter().all(|cell| cell.is_filled())
    }

    /// Count filled cells in a row
    pub fn filled_count_in_row(&self, y: usize) -> usize {
        self.board[y].iter().filter(|cell| cell.is_filled()).count()
    }

    /// Count total filled cells on the board
    pub fn total_filled_cells(&self) -> usize {
        self.board.iter().flatten().filter(|cell| cell.is_filled()).count()
    }
}

impl Default for TetrisGame {
    fn default() -> Self {
        Self::new(TetrisConfig::default())
    }
}

impl MiniGame for TetrisGame {
    fn title(&self) -> &'static str {
        "Neon Tetris"
    }

    fn tick(&mut self) {
        self.move_down();
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Left => {
                self.move_left();
            }
            Command::Right => {
                self.move_right();
            }
            Command::Down => self.move_down(),
            Command::Up | Command::Rotate => {
                self.rotate();
            }
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.reset(),
        }
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn score(&self) -> u32 {
        self.score
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

pub mod test_helpers {
    use super::*;

    pub fn fill_row(board: &mut Board, y: usize) {
        for x in 0..BOARD_WIDTH {
            board[y][x] = CellState::Filled(ShapeKind::T);
        }
    }

    pub fn fill_row_with_gap(board: &mut Board, y: usize, gap_x: usize) {
        for x in 0..BOARD_WIDTH {
            if x != gap_x {
                board[y][x] = CellState::Filled(ShapeKind::T);
            }
        }
    }
}
