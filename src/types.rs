//! Types shared by both engines and the host that drives them

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Running,
    Paused,
    GameOver,
}

impl Phase {
    /// Running <-> Paused; GameOver stays put
    pub fn toggled(self) -> Phase {
        match self {
            Phase::Running => Phase::Paused,
            Phase::Paused => Phase::Running,
            Phase::GameOver => Phase::GameOver,
        }
    }
}

/// Discrete input forwarded by the render/input adapter
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    Rotate,
    TogglePause,
    Restart,
}

/// A simulation the host can drive with one loop.
///
/// Engines own no timer: the host calls [`MiniGame::tick`] at the game's
/// period and forwards input through [`MiniGame::handle`], strictly one at a
/// time.
pub trait MiniGame {
    fn title(&self) -> &'static str;

    /// Advance the simulation by one timer period
    fn tick(&mut self);

    fn handle(&mut self, command: Command);

    fn phase(&self) -> Phase;

    fn score(&self) -> u32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_only_swaps_running_and_paused() {
        assert_eq!(Phase::Running.toggled(), Phase::Paused);
        assert_eq!(Phase::Paused.toggled(), Phase::Running);
        assert_eq!(Phase::GameOver.toggled(), Phase::GameOver);
    }
}
