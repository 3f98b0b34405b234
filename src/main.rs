//! Neon Breakout headless runner
//!
//! Plays a session with the built-in autopilot and logs what happens.
//! Rendering and audio frontends hook in through `Observer`.
//!
//! Usage: neon-breakout [settings.json] [--ticks N] [--dump]

use std::path::PathBuf;

use neon_breakout::sim::{GameEvent, GamePhase, Snapshot, SoundCue, TickInput};
use neon_breakout::{Game, HighScoreStore, JsonFileStore, MemoryStore, Observer, Settings};

/// Default run length: five minutes of play
const DEFAULT_TICKS: u64 = 5 * 60 * 60;

/// Logs events and audio cues
struct EventLog;

impl Observer for EventLog {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PowerUp(kind) => log::info!("Power-up: {}", kind.as_str()),
            GameEvent::LifeLost => log::info!("Ball lost"),
            GameEvent::Hit | GameEvent::BrickBreak { .. } => log::debug!("{:?}", event),
            GameEvent::LevelComplete | GameEvent::GameOver => {}
        }
    }

    fn on_sound(&mut self, cue: SoundCue) {
        log::trace!("sound: {}", cue.as_str());
    }
}

/// Reports score/level/lives whenever they change
#[derive(Default)]
struct Hud {
    last: Option<(u64, u32, u8)>,
}

impl Observer for Hud {
    fn on_frame(&mut self, snapshot: &Snapshot<'_>) {
        let current = (snapshot.score, snapshot.level, snapshot.lives);
        if self.last != Some(current) {
            log::debug!(
                "score {} | level {} | lives {}",
                snapshot.score,
                snapshot.level,
                snapshot.lives
            );
            self.last = Some(current);
        }
    }
}

struct Args {
    settings: Option<PathBuf>,
    ticks: u64,
    dump: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        settings: None,
        ticks: DEFAULT_TICKS,
        dump: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--ticks" => {
                let value = iter.next().ok_or("--ticks needs a value")?;
                args.ticks = value
                    .parse()
                    .map_err(|e| format!("bad --ticks value '{value}': {e}"))?;
            }
            "--dump" => args.dump = true,
            _ if arg.starts_with("--") => return Err(format!("unknown option {arg}")),
            _ => args.settings = Some(PathBuf::from(arg)),
        }
    }
    Ok(args)
}

fn run<S: HighScoreStore>(mut game: Game<S>, ticks: u64, dump: bool) {
    game.add_observer(Box::new(EventLog));
    game.add_observer(Box::new(Hud::default()));
    game.start();
    log::info!("High score to beat: {}", game.high_score());

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    for _ in 0..ticks {
        game.frame(&input);
        if game.state().phase == GamePhase::GameOver {
            break;
        }
    }

    let state = game.state();
    println!(
        "Finished after {} ticks: score {}, level {}, lives {}, high score {}",
        state.time_ticks,
        state.score,
        state.level,
        state.lives,
        game.high_score()
    );

    if dump {
        match serde_json::to_string_pretty(&state.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("Could not serialize snapshot: {}", e),
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Neon Breakout (headless) starting...");

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("usage: neon-breakout [settings.json] [--ticks N] [--dump]");
            std::process::exit(2);
        }
    };

    let settings = args
        .settings
        .as_deref()
        .map(Settings::load)
        .unwrap_or_default();

    match settings.high_score_path.clone() {
        Some(path) => run(Game::new(settings, JsonFileStore::new(path)), args.ticks, args.dump),
        None => run(Game::new(settings, MemoryStore::default()), args.ticks, args.dump),
    }
}
