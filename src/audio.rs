//! Audio collaborator
//!
//! The engine only knows named effect and music keys. `AudioPlayer` turns
//! those into clip operations on a `ClipBackend` and applies the playback
//! policy: non-interruptible effects are not restarted while still playing,
//! and the current music track is never restarted.

use crate::settings::Settings;

/// What the engine calls into
pub trait AudioSink {
    /// Play an effect. An interruptible effect always restarts; otherwise it
    /// only starts if it is not already playing.
    fn play_effect(&mut self, key: &str, interruptible: bool);

    /// Switch background music to `key`
    fn play_music(&mut self, key: &str);
}

/// Sound effect keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Shield flash after any collision
    ShieldBump,
    /// "Taxi!" voice cues played when a passenger appears
    Taxi1,
    Taxi2,
    Taxi3,
}

impl SoundEffect {
    pub fn key(&self) -> &'static str {
        match self {
            SoundEffect::ShieldBump => "shieldBump",
            SoundEffect::Taxi1 => "Taxi1",
            SoundEffect::Taxi2 => "Taxi2",
            SoundEffect::Taxi3 => "Taxi3",
        }
    }

    /// Voice cue by 1-based number
    pub fn taxi(cue: u8) -> Option<Self> {
        match cue {
            1 => Some(SoundEffect::Taxi1),
            2 => Some(SoundEffect::Taxi2),
            3 => Some(SoundEffect::Taxi3),
            _ => None,
        }
    }
}

/// Background music keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    Game,
    Menu,
}

impl MusicTrack {
    pub fn key(&self) -> &'static str {
        match self {
            MusicTrack::Game => "music_game1",
            MusicTrack::Menu => "music_menu",
        }
    }
}

/// Device-level clip playback
pub trait ClipBackend {
    fn is_playing(&self, key: &str) -> bool;

    /// Start `key` from the beginning, restarting it if already running
    fn play(&mut self, key: &str, volume: f32, looping: bool);

    fn stop(&mut self, key: &str);
}

/// Backend for headless runs: logs clip operations
#[derive(Debug, Default)]
pub struct LogBackend;

impl ClipBackend for LogBackend {
    fn is_playing(&self, _key: &str) -> bool {
        false
    }

    fn play(&mut self, key: &str, volume: f32, looping: bool) {
        log::debug!("play {key} (volume {volume:.2}, looping {looping})");
    }

    fn stop(&mut self, key: &str) {
        log::debug!("stop {key}");
    }
}

/// Audio manager for the game
pub struct AudioPlayer<B: ClipBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    current_music: Option<String>,
}

impl<B: ClipBackend> AudioPlayer<B> {
    pub fn new(backend: B, settings: &Settings) -> Self {
        Self {
            backend,
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            music_volume: settings.music_volume,
            muted: settings.muted,
            current_music: None,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn current_music(&self) -> Option<&str> {
        self.current_music.as_deref()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }
}

impl<B: ClipBackend> AudioSink for AudioPlayer<B> {
    fn play_effect(&mut self, key: &str, interruptible: bool) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        if !interruptible && self.backend.is_playing(key) {
            return;
        }
        self.backend.play(key, vol, false);
    }

    fn play_music(&mut self, key: &str) {
        if self.current_music.as_deref() == Some(key) {
            return;
        }
        if let Some(previous) = self.current_music.take() {
            self.backend.stop(&previous);
        }
        let vol = self.effective_volume(self.music_volume);
        self.backend.play(key, vol, true);
        self.current_music = Some(key.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct FakeBackend {
        playing: HashSet<String>,
        log: Vec<String>,
    }

    impl ClipBackend for FakeBackend {
        fn is_playing(&self, key: &str) -> bool {
            self.playing.contains(key)
        }

        fn play(&mut self, key: &str, _volume: f32, _looping: bool) {
            self.playing.insert(key.to_string());
            self.log.push(format!("play {key}"));
        }

        fn stop(&mut self, key: &str) {
            self.playing.remove(key);
            self.log.push(format!("stop {key}"));
        }
    }

    fn player() -> AudioPlayer<FakeBackend> {
        AudioPlayer::new(FakeBackend::default(), &Settings::default())
    }

    #[test]
    fn test_effect_keys() {
        assert_eq!(SoundEffect::ShieldBump.key(), "shieldBump");
        assert_eq!(SoundEffect::taxi(2).map(|e| e.key()), Some("Taxi2"));
        assert_eq!(SoundEffect::taxi(0), None);
        assert_eq!(MusicTrack::Game.key(), "music_game1");
        assert_eq!(MusicTrack::Menu.key(), "music_menu");
    }

    #[test]
    fn test_non_interruptible_effect_not_restarted() {
        let mut audio = player();
        audio.play_effect("shieldBump", false);
        audio.play_effect("shieldBump", false);
        assert_eq!(audio.backend().log, vec!["play shieldBump"]);
    }

    #[test]
    fn test_interruptible_effect_restarts() {
        let mut audio = player();
        audio.play_effect("Taxi1", true);
        audio.play_effect("Taxi1", true);
        assert_eq!(audio.backend().log.len(), 2);
    }

    #[test]
    fn test_music_not_restarted() {
        let mut audio = player();
        audio.play_music("music_menu");
        audio.play_music("music_game1");
        audio.play_music("music_game1");
        assert_eq!(
            audio.backend().log,
            vec!["play music_menu", "stop music_menu", "play music_game1"]
        );
        assert_eq!(audio.current_music(), Some("music_game1"));
    }

    #[test]
    fn test_muted_skips_effects() {
        let mut audio = player();
        audio.set_muted(true);
        audio.play_effect("shieldBump", true);
        assert!(audio.backend().log.is_empty());
    }
}
