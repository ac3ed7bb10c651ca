use std::collections::VecDeque;

use rand::Rng;

use crate::config::SnakeConfig;
use crate::grid::{Direction, Position};
use crate::reward::{NoReward, RewardCallback};
use crate::types::{Command, MiniGame, Phase};

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum SnakeEvent {
    Moved,
    FoodEaten(Position),
    DirectionQueued(Direction),
    Paused,
    Unpaused,
    Restarted,
    GameOver,
}

// ============================================================================
// Food Source Trait
// ============================================================================

/// Where the next food lands. Snake cells are deliberately not excluded.
pub trait FoodSource {
    fn next_food(&mut self, width: i16, height: i16) -> Position;
}

/// Uniform over the whole grid
pub struct RandomFood;

impl FoodSource for RandomFood {
    fn next_food(&mut self, width: i16, height: i16) -> Position {
        let mut rng = rand::thread_rng();
        Position::new(rng.gen_range(0..width), rng.gen_range(0..height))
    }
}

pub struct SequenceFood {
    positions: Vec<Position>,
    index: usize,
}

impl SequenceFood {
    pub fn new(positions: Vec<Position>) -> Self {
        Self {
            positions,
            index: 0,
        }
    }
}

impl FoodSource for SequenceFood {
    fn next_food(&mut self, _width: i16, _height: i16) -> Position {
        let food = self
            .positions
            .get(self.index % self.positions.len().max(1))
            .copied()
            .unwrap_or(Position::new(0, 0));
        self.index += 1;
        food
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Read-only view handed to the renderer
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SnakeSnapshot {
    pub width: i16,
    pub height: i16,
    /// Head first
    pub segments: Vec<Position>,
    pub food: Position,
    pub score: u32,
    pub phase: Phase,
}

// ============================================================================
// Game
// ============================================================================

pub struct SnakeGame {
    config: SnakeConfig,
    segments: VecDeque<Position>,
    direction: Direction,
    pending_direction: Option<Direction>,
    food: Position,
    score: u32,
    phase: Phase,
    food_source: Box<dyn FoodSource>,
    reward: Box<dyn RewardCallback>,
    events: Vec<SnakeEvent>,
}

impl SnakeGame {
    pub fn new(config: SnakeConfig) -> Self {
        Self::with_food_source(config, Box::new(RandomFood))
    }

    /// Opens with food at `config.initial_food`; `food_source` is only
    /// consulted after the first meal or a reset.
    pub fn with_food_source(config: SnakeConfig, food_source: Box<dyn FoodSource>) -> Self {
        let food = config.initial_food;
        Self {
            segments: VecDeque::from([config.start]),
            direction: Direction::Right,
            pending_direction: None,
            food,
            score: 0,
            phase: Phase::Running,
            food_source,
            reward: Box::new(NoReward),
            events: Vec::new(),
            config,
        }
    }

    pub fn with_reward(mut self, reward: impl RewardCallback + 'static) -> Self {
        self.reward = Box::new(reward);
        self
    }

    /// Advance one tick: commit the queued turn, then move the head.
    pub fn step(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }

        let new_head = self.head() + self.direction;

        // The tail counts even though it would move out of the way this tick.
        if !new_head.in_bounds(self.config.width, self.config.height)
            || self.segments.contains(&new_head)
        {
            self.phase = Phase::GameOver;
            self.events.push(SnakeEvent::GameOver);
            tracing::info!(
                "Snake crashed at ({}, {}) with score {}",
                new_head.x,
                new_head.y,
                self.score
            );
            return;
        }

        self.segments.push_front(new_head);

        if new_head == self.food {
            self.score = self.score.saturating_add(self.config.food_score);
            self.events.push(SnakeEvent::FoodEaten(new_head));
            tracing::debug!(
                "Snake ate food at ({}, {}), length {}, score {}",
                new_head.x,
                new_head.y,
                self.segments.len(),
                self.score
            );
            self.reward.reward();
            self.food = self
                .food_source
                .next_food(self.config.width, self.config.height);
        } else {
            self.segments.pop_back();
        }

        self.events.push(SnakeEvent::Moved);
    }

    /// Queue a turn for the next step. Only a change of axis relative to the
    /// committed direction is accepted, so a reversal can never slip in
    /// between two steps.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.phase == Phase::GameOver {
            return;
        }
        if !direction.is_perpendicular(self.direction) {
            tracing::trace!("Rejected turn {:?} while heading {:?}", direction, self.direction);
            return;
        }
        self.pending_direction = Some(direction);
        self.events.push(SnakeEvent::DirectionQueued(direction));
    }

    pub fn toggle_pause(&mut self) {
        let toggled = self.phase.toggled();
        if toggled == self.phase {
            return;
        }
        self.phase = toggled;
        self.events.push(match toggled {
            Phase::Paused => SnakeEvent::Paused,
            _ => SnakeEvent::Unpaused,
        });
        tracing::debug!("Snake phase is now {:?}", self.phase);
    }

    pub fn reset(&mut self) {
        self.segments = VecDeque::from([self.config.start]);
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.score = 0;
        self.phase = Phase::Running;
        self.food = self
            .food_source
            .next_food(self.config.width, self.config.height);
        self.events.clear();
        self.events.push(SnakeEvent::Restarted);
        tracing::info!("Snake restarted");
    }

    pub fn snapshot(&self) -> SnakeSnapshot {
        SnakeSnapshot {
            width: self.config.width,
            height: self.config.height,
            segments: self.segments.iter().copied().collect(),
            food: self.food,
            score: self.score,
            phase: self.phase,
        }
    }

    pub fn head(&self) -> Position {
        // Never empty: built with one segment and only grows.
        self.segments[0]
    }

    pub fn segments(&self) -> &VecDeque<Position> {
        &self.segments
    }

    pub fn length(&self) -> usize {
        self.segments.len()
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    /// Takes and clears all pending events
    pub fn take_events(&mut self) -> Vec<SnakeEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for SnakeGame {
    fn default() -> Self {
        Self::new(SnakeConfig::default())
    }
}

impl MiniGame for SnakeGame {
    fn title(&self) -> &'static str {
        "Snake Carnage"
    }

    fn tick(&mut self) {
        self.step();
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Up => self.set_direction(Direction::Up),
            Command::Down => self.set_direction(Direction::Down),
            Command::Left => self.set_direction(Direction::Left),
            Command::Right => self.set_direction(Direction::Right),
            Command::TogglePause => self.toggle_pause(),
            Command::Restart => self.reset(),
            Command::Rotate => {}
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

    /// Default 20x20 game whose food comes from `foods`
    pub fn game_with_foods(foods: Vec<Position>) -> SnakeGame {
        SnakeGame::with_food_source(SnakeConfig::default(), Box::new(SequenceFood::new(foods)))
    }

    /// Game laid out with `segments` (head first) heading `direction`
    pub fn game_with_body(segments: Vec<Position>, direction: Direction, food: Position) -> SnakeGame {
        let mut game = game_with_foods(vec![Position::new(0, 0)]);
        game.segments = segments.into_iter().collect();
        game.direction = direction;
        game.food = food;
        game
    }
}
