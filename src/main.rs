//! Interstellar Taxi headless host
//!
//! Runs the engine on its own thread and feeds it key events read from
//! stdin, one per line: `<key> down`, `<key> up`, or `quit`. Keys are
//! `left right up down` for player 1 and `a d w s` for player 2; `escape`
//! stops the game. On exit the score board and a JSON snapshot of the world
//! are logged.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;

use interstellar_taxi::audio::{AudioPlayer, LogBackend};
use interstellar_taxi::hud;
use interstellar_taxi::input::{InputController, Key};
use interstellar_taxi::render::DrawList;
use interstellar_taxi::{Engine, Settings};

const DEFAULT_SETTINGS: &str = "interstellar-taxi.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Interstellar Taxi starting...");

    let args: Vec<String> = std::env::args().collect();
    let settings_path = args
        .windows(2)
        .find(|pair| pair[0] == "--settings")
        .map(|pair| PathBuf::from(&pair[1]))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS));

    let mut settings = Settings::load_or_default(&settings_path);
    settings.apply_args(args.as_slice());
    log::info!("Fullscreen: {}", settings.fullscreen);

    let audio = AudioPlayer::new(LogBackend, &settings);
    let mut engine = Engine::new(settings.seed(), audio);
    let handle = engine.handle();
    engine.start();

    let worker = thread::spawn(move || {
        let mut canvas = DrawList::default();
        engine.run(&mut canvas);
        engine
    });

    read_keys(&handle.input(), || handle.is_running());
    handle.stop();

    let engine = match worker.join() {
        Ok(engine) => engine,
        Err(_) => {
            log::error!("Engine thread panicked");
            std::process::exit(1);
        }
    };

    let state = engine.state();
    for line in hud::status_bar(state) {
        log::info!("{line}");
    }
    for (rank, row) in hud::scoreboard(state).iter().enumerate() {
        log::info!("#{} {} score {} credits {}", rank + 1, row.name, row.score, row.credits);
    }
    match serde_json::to_string_pretty(&state.snapshot()) {
        Ok(json) => log::info!("Final world:\n{json}"),
        Err(err) => log::warn!("Could not serialize world: {err}"),
    }
}

/// Forward stdin key events until `quit`, end of input, or the engine stops
fn read_keys(input: &InputController, running: impl Fn() -> bool) {
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::warn!("stdin: {err}");
                break;
            }
        };

        let mut words = line.split_whitespace();
        let (Some(name), state) = (words.next(), words.next()) else {
            continue;
        };
        if name == "quit" {
            break;
        }

        let pressed = match state {
            Some("down") | None => true,
            Some("up") => false,
            Some(other) => {
                log::warn!("expected `down` or `up`, got `{other}`");
                continue;
            }
        };
        match name.parse::<Key>() {
            Ok(key) => {
                input.handle_key(key, pressed);
            }
            Err(err) => log::warn!("{err}"),
        }

        if !running() {
            break;
        }
    }
}
