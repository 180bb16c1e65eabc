//! Read-only projection of the simulation for a renderer or HUD
//!
//! Taken after a step completes; nothing here feeds back into the simulation.

use glam::Vec2;
use serde::Serialize;

use crate::sim::{PlayerId, SimState, TokenId, TokenType};

/// A token as drawn on screen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenView {
    pub id: TokenId,
    #[serde(rename = "type")]
    pub kind: TokenType,
    pub owner: PlayerId,
    pub position: Vec2,
    pub radius: f32,
    /// Heading of the token's force (radians)
    pub rotation: f32,
}

/// A player entry for the player list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub id: PlayerId,
    pub label: String,
}

/// Live token counts for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub player: PlayerId,
    pub label: String,
    pub total: usize,
    pub rock: usize,
    pub paper: usize,
    pub scissors: usize,
}

/// Token counts per player, in player order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Scoreboard {
    pub entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    pub fn from_state(state: &SimState) -> Self {
        let entries = state
            .players()
            .iter()
            .map(|player| {
                let mut entry = ScoreEntry {
                    player: player.id,
                    label: player.label.clone(),
                    total: 0,
                    rock: 0,
                    paper: 0,
                    scissors: 0,
                };
                for token in state.tokens().iter().filter(|t| t.owner == player.id) {
                    entry.total += 1;
                    match token.kind {
                        TokenType::Rock => entry.rock += 1,
                        TokenType::Paper => entry.paper += 1,
                        TokenType::Scissors => entry.scissors += 1,
                    }
                }
                entry
            })
            .collect();
        Self { entries }
    }

    /// Player holding the most tokens, if exactly one does
    pub fn leader(&self) -> Option<&ScoreEntry> {
        let best = self.entries.iter().map(|e| e.total).max()?;
        let mut leaders = self.entries.iter().filter(|e| e.total == best);
        let leader = leaders.next()?;
        if leaders.next().is_some() || best == 0 {
            return None;
        }
        Some(leader)
    }

    /// True once every live token belongs to one player
    pub fn is_decided(&self) -> bool {
        self.entries.iter().filter(|e| e.total > 0).count() == 1
    }
}

/// Everything a frame needs to draw
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub seed: u64,
    pub step: u64,
    pub active: bool,
    pub board_width: f32,
    pub board_height: f32,
    pub players: Vec<PlayerView>,
    pub tokens: Vec<TokenView>,
}

impl Snapshot {
    pub fn capture(state: &SimState) -> Self {
        let settings = state.settings();
        Self {
            seed: state.seed,
            step: state.step_count,
            active: state.is_active(),
            board_width: settings.board_width,
            board_height: settings.board_height,
            players: state
                .players()
                .iter()
                .map(|p| PlayerView {
                    id: p.id,
                    label: p.label.clone(),
                })
                .collect(),
            tokens: state
                .tokens()
                .iter()
                .map(|t| TokenView {
                    id: t.id,
                    kind: t.kind,
                    owner: t.owner,
                    position: t.position,
                    radius: t.radius(),
                    rotation: t.rotation(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{PlayerKind, Token};

    fn sample_state() -> SimState {
        let mut state = SimState::new(3);
        let p1 = state.add_player(PlayerKind::Random);
        let p2 = state.add_player(PlayerKind::Passive);
        state.add_token(Token::new(TokenType::Rock, p1, Vec2::new(10.0, 10.0))).unwrap();
        state.add_token(Token::new(TokenType::Paper, p1, Vec2::new(60.0, 10.0))).unwrap();
        state
            .add_token(Token::new(TokenType::Scissors, p2, Vec2::new(110.0, 10.0)).with_forces(Vec2::new(0.0, 1.0)))
            .unwrap();
        state
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let state = sample_state();
        let snap = Snapshot::capture(&state);
        assert_eq!(snap.players.len(), 2);
        assert_eq!(snap.players[0].label, "Player 1");
        assert_eq!(snap.tokens.len(), 3);
        assert!(!snap.active);
        assert_eq!(snap.seed, 3);
        assert_eq!(snap.tokens[2].kind, TokenType::Scissors);
        assert!((snap.tokens[2].rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_json_uses_type_field() {
        let snap = Snapshot::capture(&sample_state());
        let json = snap.to_json().unwrap();
        assert!(json.contains("\"type\":\"Rock\""));
        assert!(json.contains("\"active\":false"));
        assert!(json.contains("\"seed\":3"));
    }

    #[test]
    fn test_scoreboard_counts() {
        let state = sample_state();
        let board = Scoreboard::from_state(&state);
        assert_eq!(board.entries[0].total, 2);
        assert_eq!(board.entries[0].rock, 1);
        assert_eq!(board.entries[0].paper, 1);
        assert_eq!(board.entries[1].scissors, 1);
        assert_eq!(board.leader().map(|e| e.label.as_str()), Some("Player 1"));
        assert!(!board.is_decided());
    }

    #[test]
    fn test_scoreboard_tie_has_no_leader() {
        let mut state = SimState::new(3);
        let p1 = state.add_player(PlayerKind::Passive);
        let p2 = state.add_player(PlayerKind::Passive);
        state.add_token(Token::new(TokenType::Rock, p1, Vec2::ZERO)).unwrap();
        state.add_token(Token::new(TokenType::Rock, p2, Vec2::new(100.0, 0.0))).unwrap();
        assert!(Scoreboard::from_state(&state).leader().is_none());
        assert!(Scoreboard::default().leader().is_none());
    }
}
