//! Status bar and score board text

use crate::sim::{GameState, Player};

/// One status bar entry: `"name: score (energy)"`
pub fn status_line(player: &Player) -> String {
    format!("{}: {} ({})", player.name, player.score, player.ship.energy())
}

/// Status bar entries for every player, in seat order
pub fn status_bar(state: &GameState) -> Vec<String> {
    state.players.iter().map(status_line).collect()
}

/// Score board row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub name: String,
    pub score: i32,
    pub credits: i32,
}

/// Score board rows, best standing first
pub fn scoreboard(state: &GameState) -> Vec<ScoreRow> {
    state
        .rankings()
        .into_iter()
        .map(|p| ScoreRow {
            name: p.name.clone(),
            score: p.score,
            credits: p.credits,
        })
        .collect()
}
