mod tui;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    cell::RefCell,
    io::{self, stdout, Stdout},
    path::PathBuf,
    rc::Rc,
    sync::Mutex,
    time::{Duration, Instant},
};

use arcade::clock::Ticker;
use arcade::config::ArcadeConfig;
use arcade::snake::SnakeGame;
use arcade::tetris::TetrisGame;
use arcade::wallet::Wallet;
use arcade::{Command, Phase};

use tui::Cabinet;

/// arcade - Snake and Tetris in the terminal
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game to open
    #[arg(value_enum)]
    game: GameKind,

    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File holding the blood-points balance
    #[arg(short, long)]
    wallet: Option<PathBuf>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Maximum log level
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GameKind {
    Snake,
    Tetris,
}

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    if let Some(path) = &cli.log_file {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_max_level(cli.log_level)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
    Ok(())
}

fn map_key(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::Right),
        KeyCode::Char(' ') => Some(Command::Rotate),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Command::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        _ => None,
    }
}

// ============================================================================
// Main Loop
// ============================================================================

/// Drive one game view until the player closes it. The ticker lives only as
/// long as this call, so nothing ticks after the view is gone.
fn run_game<G: Cabinet>(
    terminal: &mut Tui,
    game: &mut G,
    period: Duration,
    wallet: &RefCell<Wallet>,
) -> io::Result<()> {
    let mut ticker = Ticker::new(period);
    tracing::info!("Opened {} with a {:?} tick", game.title(), ticker.period());

    loop {
        let balance = wallet.borrow().balance();
        terminal.draw(|frame| game.draw(frame, balance))?;

        if event::poll(ticker.timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => break,
                        code => {
                            if let Some(command) = map_key(code) {
                                let was_running = game.phase() == Phase::Running;
                                game.handle(command);
                                // Resume and restart begin a fresh period
                                if command == Command::Restart
                                    || (!was_running && game.phase() == Phase::Running)
                                {
                                    ticker.restart(Instant::now());
                                }
                            }
                        }
                    }
                }
            }
        }

        if ticker.advance(Instant::now(), game.phase() == Phase::Running) {
            game.tick();
        }

        game.log_events();
    }

    tracing::info!("Closed {} with score {}", game.title(), game.score());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let config = match &cli.config {
        Some(path) => ArcadeConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ArcadeConfig::default(),
    };

    let wallet = match &cli.wallet {
        Some(path) => Wallet::open(path)
            .with_context(|| format!("Failed to open wallet {}", path.display()))?,
        None => Wallet::new(),
    };
    let wallet = Rc::new(RefCell::new(wallet));

    let credit = {
        let wallet = Rc::clone(&wallet);
        let points = config.reward.points_per_reward;
        move || {
            let mut wallet = wallet.borrow_mut();
            wallet.credit(points);
            if let Err(e) = wallet.save() {
                tracing::warn!("Failed to save wallet: {}", e);
            }
        }
    };

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = match cli.game {
        GameKind::Snake => {
            let period = config.snake.tick_period();
            let mut game = SnakeGame::new(config.snake).with_reward(credit);
            run_game(&mut terminal, &mut game, period, &wallet)
        }
        GameKind::Tetris => {
            let period = config.tetris.tick_period();
            let mut game = TetrisGame::new(config.tetris).with_reward(credit);
            run_game(&mut terminal, &mut game, period, &wallet)
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result?;
    println!("Blood points: {}", wallet.borrow().balance());
    Ok(())
}
