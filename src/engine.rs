//! Fixed-rate game engine
//!
//! Owns the world and its collaborators. Each iteration reads the input
//! flags, ticks the simulation, forwards tick events to audio and paints the
//! result, all on the calling thread. Other threads talk to a running engine
//! through an [`EngineHandle`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::audio::{AudioSink, MusicTrack, SoundEffect};
use crate::consts::TICK_MILLIS;
use crate::input::{InputController, SharedIntents};
use crate::render::{Canvas, paint_world};
use crate::sim::{GameEvent, GameState, tick};

/// Cross-thread control of an engine
#[derive(Debug, Clone)]
pub struct EngineHandle {
    intents: Arc<SharedIntents>,
    running: Arc<AtomicBool>,
}

impl EngineHandle {
    /// Ask the loop to finish after the current iteration
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Key event entry point for the host
    pub fn input(&self) -> InputController {
        InputController::new(self.intents.clone(), self.running.clone())
    }
}

pub struct Engine<A: AudioSink> {
    state: GameState,
    audio: A,
    intents: Arc<SharedIntents>,
    running: Arc<AtomicBool>,
}

impl<A: AudioSink> Engine<A> {
    /// Standard world seeded with `seed`
    pub fn new(seed: u64, audio: A) -> Self {
        log::info!("World initialized with seed: {seed}");
        Self::with_state(GameState::new(seed), audio)
    }

    pub fn with_state(state: GameState, audio: A) -> Self {
        Self {
            state,
            audio,
            intents: Arc::new(SharedIntents::new()),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            intents: self.intents.clone(),
            running: self.running.clone(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn start(&mut self) {
        self.running.store(true, Ordering::Relaxed);
        log::info!("Engine started");
        self.audio.play_music(MusicTrack::Game.key());
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Run one simulation tick and play its sounds.
    ///
    /// A failed tick is logged and dropped; the world stays usable.
    pub fn step(&mut self) {
        let input = self.intents.snapshot();
        if let Err(err) = tick(&mut self.state, &input) {
            log::error!("Tick {} failed: {err}", self.state.time_ticks);
        }

        for event in &self.state.events {
            match *event {
                GameEvent::ShipsCollided { .. } | GameEvent::PlatformBounce { .. } => {
                    self.audio.play_effect(SoundEffect::ShieldBump.key(), false);
                }
                GameEvent::PassengerSpawned { cue, .. } => {
                    if let Some(effect) = SoundEffect::taxi(cue) {
                        self.audio.play_effect(effect.key(), false);
                    }
                }
                _ => {}
            }
        }
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        paint_world(&self.state, canvas);
    }

    /// Loop until stopped, one tick and one paint per iteration. Iterations
    /// faster than the tick budget sleep off the rest. Call [`Engine::start`]
    /// first; a stopped engine returns immediately.
    pub fn run(&mut self, canvas: &mut dyn Canvas) {
        let budget = Duration::from_millis(TICK_MILLIS);

        while self.is_running() {
            let started = Instant::now();
            self.step();
            self.render(canvas);

            if let Some(rest) = budget.checked_sub(started.elapsed()) {
                thread::sleep(rest);
            }
        }

        log::info!("Engine stopped after {} ticks", self.state.time_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::render::{DrawCommand, DrawList};
    use crate::sim::Vector2D;
    use glam::IVec2;

    #[derive(Debug, Default)]
    struct RecordingSink {
        effects: Vec<(String, bool)>,
        music: Vec<String>,
    }

    impl AudioSink for RecordingSink {
        fn play_effect(&mut self, key: &str, interruptible: bool) {
            self.effects.push((key.to_string(), interruptible));
        }

        fn play_music(&mut self, key: &str) {
            self.music.push(key.to_string());
        }
    }

    #[test]
    fn test_start_plays_game_music() {
        let mut engine = Engine::new(1, RecordingSink::default());
        assert!(!engine.is_running());
        engine.start();
        assert!(engine.is_running());
        assert_eq!(engine.audio().music, vec!["music_game1"]);
        engine.stop();
        assert!(!engine.handle().is_running());
    }

    #[test]
    fn test_collision_plays_shield_bump() {
        let mut state = GameState::new(1);
        state.players[0].ship.position = IVec2::new(300, 50);
        state.players[1].ship.position = IVec2::new(320, 50);
        state.players[0].ship.motion = Vector2D::new(1.0, 0.0);
        state.players[1].ship.motion = Vector2D::new(-1.0, 0.0);

        let mut engine = Engine::with_state(state, RecordingSink::default());
        engine.step();
        assert_eq!(
            engine.audio().effects,
            vec![("shieldBump".to_string(), false)]
        );
    }

    #[test]
    fn test_spawn_plays_taxi_cue() {
        let mut engine = Engine::new(5, RecordingSink::default());
        while engine.state().passengers.is_empty() {
            engine.step();
        }
        let taxi = engine
            .audio()
            .effects
            .iter()
            .filter(|(key, _)| key.starts_with("Taxi"))
            .count();
        assert_eq!(taxi, 1);
    }

    #[test]
    fn test_input_reaches_ships() {
        let mut engine = Engine::new(1, RecordingSink::default());
        let input = engine.handle().input();
        input.handle_key(Key::Left, true);
        engine.step();
        assert!(engine.state().players[0].ship.motion.x() < 0.0);
        assert_eq!(engine.state().players[1].ship.motion.x(), 0.0);
    }

    #[test]
    fn test_render_paints_world() {
        let engine = Engine::new(1, RecordingSink::default());
        let mut list = DrawList::default();
        engine.render(&mut list);
        let sprites = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
            .count();
        assert_eq!(sprites, 8);
    }

    #[test]
    fn test_run_until_stopped() {
        let mut engine = Engine::new(1, RecordingSink::default());
        let handle = engine.handle();
        engine.start();
        let worker = thread::spawn(move || {
            let mut list = DrawList::default();
            engine.run(&mut list);
            engine
        });

        thread::sleep(Duration::from_millis(100));
        handle.input().handle_key(Key::Escape, true);
        let engine = worker.join().unwrap();

        assert!(!handle.is_running());
        assert!(engine.state().time_ticks > 0);
    }

    #[test]
    fn test_run_without_start_returns() {
        let mut engine = Engine::new(1, RecordingSink::default());
        engine.run(&mut DrawList::default());
        assert_eq!(engine.state().time_ticks, 0);
    }
}
