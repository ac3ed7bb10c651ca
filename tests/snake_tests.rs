//! Tests for the Snake engine
//!
//! Test categories:
//! - Movement and growth
//! - Direction buffering
//! - Collisions and game over
//! - Pause, reset and snapshots

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use arcade::config::SnakeConfig;
use arcade::grid::{Direction, Position};
use arcade::snake::{test_helpers::*, FoodSource, SequenceFood, SnakeEvent, SnakeGame};
use arcade::{Command, MiniGame, Phase};

fn counting_reward() -> (Rc<Cell<u32>>, impl FnMut()) {
    let count = Rc::new(Cell::new(0));
    let handle = Rc::clone(&count);
    (count, move || handle.set(handle.get() + 1))
}

// ============================================================================
// Movement Tests
// ============================================================================

mod movement {
    use super::*;

    #[test]
    fn opens_with_one_segment_heading_right() {
        let game = SnakeGame::default();

        assert_eq!(game.segments().len(), 1);
        assert_eq!(game.head(), Position::new(10, 10));
        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.food(), Position::new(15, 15));
        assert_eq!(game.score(), 0);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn step_moves_head_without_growing() {
        let mut game = game_with_foods(vec![Position::new(0, 0)]);

        game.step();

        assert_eq!(game.segments().iter().copied().collect::<Vec<_>>(), vec![Position::new(11, 10)]);
        assert_eq!(game.length(), 1);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn long_snake_keeps_length_when_not_eating() {
        let body = vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)];
        let mut game = game_with_body(body, Direction::Right, Position::new(0, 19));

        game.step();

        assert_eq!(game.length(), 3);
        assert_eq!(
            game.segments().iter().copied().collect::<Vec<_>>(),
            vec![Position::new(6, 5), Position::new(5, 5), Position::new(4, 5)]
        );
    }

    #[test]
    fn eating_food_grows_scores_and_rewards_once() {
        let (count, reward) = counting_reward();
        let body = vec![Position::new(14, 15)];
        let mut game =
            game_with_body(body, Direction::Right, Position::new(15, 15)).with_reward(reward);

        game.step();

        assert_eq!(game.head(), Position::new(15, 15));
        assert_eq!(game.score(), 10);
        assert_eq!(game.length(), 2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn new_food_comes_from_the_food_source() {
        let mut game = game_with_foods(vec![Position::new(3, 7)]);
        for _ in 0..5 {
            game.step();
        }

        assert_eq!(game.head(), Position::new(15, 10));
        game.set_direction(Direction::Down);
        for _ in 0..5 {
            game.step();
        }

        // Ate the opening food at (15, 15)
        assert_eq!(game.score(), 10);
        assert_eq!(game.length(), 2);
        assert_eq!(game.food(), Position::new(3, 7));
    }

    #[test]
    fn food_may_land_on_the_snake() {
        // The helper's food source always yields (0, 0), which is the tail here
        let body = vec![Position::new(1, 0), Position::new(0, 0)];
        let mut game = game_with_body(body, Direction::Down, Position::new(1, 1));

        game.step();

        assert_eq!(game.food(), Position::new(0, 0));
        assert!(game.segments().contains(&Position::new(0, 0)));
    }

    #[test]
    fn huge_food_score_saturates() {
        let config = SnakeConfig {
            start: Position::new(14, 15),
            food_score: u32::MAX,
            ..SnakeConfig::default()
        };
        let foods = Box::new(SequenceFood::new(vec![Position::new(16, 15)]));
        let mut game = SnakeGame::with_food_source(config, foods);

        game.step();
        game.step();

        assert_eq!(game.score(), u32::MAX);
        assert_eq!(game.length(), 3);
        assert_eq!(game.phase(), Phase::Running);
    }

    #[test]
    fn empty_food_sequence_falls_back_to_origin() {
        let mut foods = SequenceFood::new(Vec::new());

        assert_eq!(foods.next_food(20, 20), Position::new(0, 0));
    }

    #[test]
    fn eating_emits_event() {
        let mut game = game_with_body(vec![Position::new(14, 15)], Direction::Right, Position::new(15, 15));
        game.take_events();

        game.step();

        let events = game.take_events();
        assert!(events.contains(&SnakeEvent::FoodEaten(Position::new(15, 15))));
        assert!(events.contains(&SnakeEvent::Moved));
    }
}

// ============================================================================
// Direction Tests
// ============================================================================

mod direction {
    use super::*;

    #[test]
    fn reversal_is_ignored() {
        let mut game = SnakeGame::default();

        game.set_direction(Direction::Left);
        game.step();

        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.head(), Position::new(11, 10));
    }

    #[test]
    fn same_direction_is_ignored() {
        let mut game = SnakeGame::default();

        game.set_direction(Direction::Right);

        assert_eq!(game.pending_direction(), None);
    }

    #[test]
    fn turn_applies_on_next_step() {
        let mut game = SnakeGame::default();

        game.set_direction(Direction::Up);
        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.pending_direction(), Some(Direction::Up));

        game.step();

        assert_eq!(game.direction(), Direction::Up);
        assert_eq!(game.head(), Position::new(10, 9));
    }

    #[test]
    fn two_turns_in_one_tick_cannot_reverse() {
        let body = vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)];
        let mut game = game_with_body(body, Direction::Right, Position::new(0, 19));

        // Up is accepted, Left is checked against the committed Right
        game.set_direction(Direction::Up);
        game.set_direction(Direction::Left);
        game.step();

        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.head(), Position::new(5, 4));
    }

    #[test]
    fn later_perpendicular_turn_replaces_queued_one() {
        let mut game = SnakeGame::default();

        game.set_direction(Direction::Up);
        game.set_direction(Direction::Down);
        game.step();

        assert_eq!(game.head(), Position::new(10, 11));
    }

    #[test]
    fn commands_map_to_turns() {
        let mut game = SnakeGame::default();

        game.handle(Command::Down);
        game.tick();

        assert_eq!(game.head(), Position::new(10, 11));
    }

    #[test]
    fn turn_can_be_queued_while_paused() {
        let mut game = SnakeGame::default();
        game.toggle_pause();

        game.set_direction(Direction::Up);
        game.toggle_pause();
        game.step();

        assert_eq!(game.head(), Position::new(10, 9));
    }
}

// ============================================================================
// Collision Tests
// ============================================================================

mod collisions {
    use super::*;

    #[test]
    fn leaving_the_grid_ends_the_game() {
        let mut game = game_with_body(vec![Position::new(0, 10)], Direction::Left, Position::new(5, 5));

        game.step();

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.segments().iter().copied().collect::<Vec<_>>(), vec![Position::new(0, 10)]);
    }

    #[test]
    fn every_wall_is_fatal() {
        let cases = [
            (Position::new(19, 3), Direction::Right),
            (Position::new(3, 0), Direction::Up),
            (Position::new(3, 19), Direction::Down),
            (Position::new(0, 3), Direction::Left),
        ];

        for (head, direction) in cases {
            let mut game = game_with_body(vec![head], direction, Position::new(10, 10));
            game.step();
            assert_eq!(game.phase(), Phase::GameOver, "heading {:?} from {:?}", direction, head);
        }
    }

    #[test]
    fn running_into_body_ends_the_game() {
        // Head at (5,5) heading down into (5,6)
        let body = vec![
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
            Position::new(4, 6),
        ];
        let mut game = game_with_body(body.clone(), Direction::Down, Position::new(0, 0));

        game.step();

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.segments().iter().copied().collect::<Vec<_>>(), body);
    }

    #[test]
    fn moving_onto_the_tail_is_fatal() {
        // A 2x2 loop: the head's next cell is the current tail
        let body = vec![
            Position::new(5, 5),
            Position::new(6, 5),
            Position::new(6, 6),
            Position::new(5, 6),
        ];
        let mut game = game_with_body(body, Direction::Down, Position::new(0, 0));

        game.step();

        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn game_over_emits_event_and_freezes() {
        let mut game = game_with_body(vec![Position::new(19, 0)], Direction::Right, Position::new(5, 5));
        game.take_events();

        game.step();
        assert!(game.take_events().contains(&SnakeEvent::GameOver));

        game.step();
        game.set_direction(Direction::Down);
        game.toggle_pause();

        assert_eq!(game.phase(), Phase::GameOver);
        assert_eq!(game.head(), Position::new(19, 0));
        assert_eq!(game.pending_direction(), None);
    }

    #[test]
    fn segments_stay_unique_while_running() {
        let mut game = game_with_foods(vec![
            Position::new(12, 10),
            Position::new(13, 10),
            Position::new(14, 10),
        ]);
        let turns = [Direction::Down, Direction::Right, Direction::Up, Direction::Right];

        for i in 0..60 {
            if i % 4 == 0 {
                game.set_direction(turns[(i / 4) % turns.len()]);
            }
            game.step();
            if game.phase() != Phase::Running {
                break;
            }
            let unique: HashSet<_> = game.segments().iter().collect();
            assert_eq!(unique.len(), game.length());
        }
    }
}

// ============================================================================
// Lifecycle Tests
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn pause_stops_steps() {
        let mut game = SnakeGame::default();

        game.toggle_pause();
        game.step();

        assert_eq!(game.phase(), Phase::Paused);
        assert_eq!(game.head(), Position::new(10, 10));

        game.toggle_pause();
        game.step();

        assert_eq!(game.head(), Position::new(11, 10));
    }

    #[test]
    fn pause_emits_events() {
        let mut game = SnakeGame::default();

        game.handle(Command::TogglePause);
        game.handle(Command::TogglePause);

        assert_eq!(game.take_events(), vec![SnakeEvent::Paused, SnakeEvent::Unpaused]);
    }

    #[test]
    fn reset_restores_the_opening_state() {
        let mut game = game_with_foods(vec![Position::new(2, 2)]);
        game.set_direction(Direction::Up);
        for _ in 0..15 {
            game.step();
        }
        assert_eq!(game.phase(), Phase::GameOver);

        game.reset();

        assert_eq!(game.phase(), Phase::Running);
        assert_eq!(game.segments().iter().copied().collect::<Vec<_>>(), vec![Position::new(10, 10)]);
        assert_eq!(game.direction(), Direction::Right);
        assert_eq!(game.score(), 0);
        assert_eq!(game.food(), Position::new(2, 2));
        assert_eq!(game.take_events(), vec![SnakeEvent::Restarted]);
    }

    #[test]
    fn random_food_stays_on_the_grid() {
        let mut game = SnakeGame::default();

        for _ in 0..100 {
            game.reset();
            assert!(game.food().in_bounds(20, 20));
        }
    }

    #[test]
    fn custom_grid_is_honoured() {
        let config = SnakeConfig {
            width: 5,
            height: 5,
            start: Position::new(4, 2),
            initial_food: Position::new(0, 0),
            ..SnakeConfig::default()
        };
        let mut game = SnakeGame::new(config);

        game.step();

        assert_eq!(game.phase(), Phase::GameOver);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut game = SnakeGame::default();
        game.step();

        let snapshot = game.snapshot();

        assert_eq!(snapshot.width, 20);
        assert_eq!(snapshot.height, 20);
        assert_eq!(snapshot.segments, vec![Position::new(11, 10)]);
        assert_eq!(snapshot.food, Position::new(15, 15));
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.phase, Phase::Running);
    }
}
