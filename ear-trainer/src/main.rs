//! Ear Sharpener (ear-trainer) - Main entry point
//!
//! Terminal front end for the ear training games. Plays each question through
//! the console audio player and reads guesses and commands from stdin.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ear_common::config::TomlConfig;
use ear_common::events::COMBO_GAME_NAME;
use ear_common::pitch::interval_name;
use ear_common::{GameEvent, GameName};
use ear_trainer::audio::ConsoleAudio;
use ear_trainer::persistence::ProgressStore;
use ear_trainer::{GameGuess, Games, Orchestrator, SharedState};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for ear-trainer
#[derive(Parser, Debug)]
#[command(name = "ear-trainer")]
#[command(about = "Ear training games: piano, note names, and note distances")]
#[command(version)]
struct Args {
    /// Path to config file (overrides EAR_SHARPENER_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long)]
    log_level: Option<String>,

    /// Game to play: piano-game, note-name-game, note-distance-game, or combo-game
    #[arg(short, long, default_value = COMBO_GAME_NAME)]
    game: String,

    /// Do not read or write saved progress
    #[arg(long)]
    no_save: bool,
}

/// A single game, or the combo cycling through all of them
#[derive(Debug, Clone, Copy)]
enum Mode {
    Single(GameName),
    Combo,
}

impl Mode {
    fn parse(name: &str) -> Result<Self> {
        if name == COMBO_GAME_NAME {
            return Ok(Mode::Combo);
        }
        let game = name
            .parse()
            .with_context(|| format!("Unknown game '{}'", name))?;
        Ok(Mode::Single(game))
    }

    fn current_game(self, orchestrator: &Orchestrator) -> GameName {
        match self {
            Mode::Single(game) => game,
            Mode::Combo => orchestrator.active_game(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config_result = TomlConfig::load_resolved(args.config.as_deref());

    // Initialize tracing
    let level = args.log_level.clone().unwrap_or_else(|| {
        config_result
            .as_ref()
            .map(|config| config.logging.level.clone())
            .unwrap_or_else(|_| "info".to_string())
    });
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("ear_trainer={level},ear_common={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config_result.context("Failed to load configuration")?;
    let mode = Mode::parse(&args.game)?;
    info!("Starting Ear Sharpener ({})", args.game);

    let store = if args.no_save {
        None
    } else {
        config.progress_file().map(ProgressStore::new)
    };
    let games = restore_games(store.as_ref())?;

    let state = Arc::new(SharedState::new(games));
    let audio = Arc::new(ConsoleAudio::new(config.audio.asset_dir.clone()));
    let mut orchestrator = Orchestrator::new(Arc::clone(&state), audio, config);
    if let Some(store) = store {
        info!("Saving progress to {}", store.path().display());
        orchestrator = orchestrator.with_progress_store(store);
    }

    orchestrator
        .load_audio()
        .await
        .context("Failed to load sound files")?;

    let printer = spawn_event_printer(Arc::clone(&state));
    print_help();
    spawn_present(&orchestrator, mode.current_game(&orchestrator), true);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        let game = mode.current_game(&orchestrator);
        let mut words = line.split_whitespace();

        match words.next() {
            None => continue,
            Some("quit" | "q") => break,
            Some("help" | "?") => print_help(),
            Some("replay" | "r") => spawn_present(&orchestrator, game, false),
            Some("level" | "l") => {
                let level = words.next().and_then(|w| w.parse().ok());
                let step = words.next().and_then(|w| w.parse().ok()).unwrap_or(1);
                match level {
                    Some(level) => spawn_set_difficulty(&orchestrator, game, level, step),
                    None => println!("usage: level <level> [step]"),
                }
            }
            Some(_) => {
                if !state.is_input_enabled() {
                    println!("(listen first...)");
                    continue;
                }
                match GameGuess::parse_for(game, line) {
                    Ok(guess) => spawn_guess(&orchestrator, mode, game, guess),
                    Err(e) => println!("{}", e),
                }
            }
        }
    }

    printer.abort();
    info!("Goodbye");
    Ok(())
}

fn restore_games(store: Option<&ProgressStore>) -> Result<Games> {
    let games = Games::new().context("Failed to create games")?;
    let Some(store) = store else {
        return Ok(games);
    };

    match store.load() {
        Ok(progress) => progress.restore(games).context("Failed to restore progress"),
        Err(e) => {
            warn!("Ignoring saved progress: {}", e);
            Ok(games)
        }
    }
}

fn spawn_present(orchestrator: &Orchestrator, game: GameName, force_refresh: bool) {
    let orchestrator = orchestrator.clone();
    tokio::spawn(async move {
        if let Err(e) = orchestrator.present(game, force_refresh).await {
            error!("Failed to present {}: {}", game, e);
        }
    });
}

fn spawn_set_difficulty(orchestrator: &Orchestrator, game: GameName, level: u32, step: u32) {
    let orchestrator = orchestrator.clone();
    tokio::spawn(async move {
        if let Err(e) = orchestrator.set_difficulty(game, level, step).await {
            error!("Failed to set difficulty of {}: {}", game, e);
        }
    });
}

fn spawn_guess(orchestrator: &Orchestrator, mode: Mode, game: GameName, guess: GameGuess) {
    let orchestrator = orchestrator.clone();
    tokio::spawn(async move {
        let result = match mode {
            Mode::Single(_) => orchestrator.guess(game, guess).await,
            Mode::Combo => orchestrator.combo_guess(game, guess).await,
        };
        if let Err(e) = result {
            error!("Failed to guess on {}: {}", game, e);
        }
    });
}

/// Prints player-facing feedback for game events
fn spawn_event_printer(state: Arc<SharedState>) -> tokio::task::JoinHandle<()> {
    let mut rx = state.subscribe_events();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => print_event(&state, &event),
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {} game events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn print_event(state: &SharedState, event: &GameEvent) {
    match event {
        GameEvent::Presented { game, .. } => {
            let view = state.view(*game);
            let choices: Vec<String> = match game {
                GameName::NoteDistance => view
                    .choices
                    .iter()
                    .map(|choice| match choice.parse::<i64>() {
                        Ok(distance) => format!("{} ({})", choice, interval_name(distance)),
                        Err(_) => choice.clone(),
                    })
                    .collect(),
                _ => view.choices.clone(),
            };
            println!(
                "[{}] level {}/{} step {}/{}",
                game, view.level, view.level_count, view.step, view.step_count
            );
            println!("  choices: {}", choices.join("  "));
        }
        GameEvent::Guessing { guess, correct, .. } => {
            if *correct {
                println!("  {} is correct!", guess);
            } else {
                println!("  {} is not it, listen again", guess);
            }
        }
        GameEvent::ActiveGameChanged { game, .. } => println!("Next up: {}", game),
        _ => {}
    }
}

fn print_help() {
    println!("Type a choice to guess. Commands: replay (r), level <L> [S] (l), help (?), quit (q)");
}
