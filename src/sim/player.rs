//! Players and their nudge strategies
//!
//! A player never touches the simulation directly: it reads an [`ActorView`]
//! and returns the nudges it wants applied.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::token::{Direction, Token, TokenId};
use crate::settings::SimSettings;

/// Opaque player identity. Compared for equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    pub(crate) fn new(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// Decision strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerKind {
    /// Never nudges anything
    #[default]
    Passive,
    /// Nudges random owned tokens in random directions
    Random,
}

/// A single nudge request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Nudge {
    pub token: TokenId,
    pub direction: Direction,
}

/// Read-only view handed to players during the actor phase
#[derive(Debug, Clone, Copy)]
pub struct ActorView<'a> {
    pub tokens: &'a [Token],
    pub settings: &'a SimSettings,
}

/// A participant in the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub label: String,
    pub kind: PlayerKind,
}

impl Player {
    pub fn new(id: PlayerId, label: impl Into<String>, kind: PlayerKind) -> Self {
        Self {
            id,
            label: label.into(),
            kind,
        }
    }

    /// Choose up to `num_actions` nudges for this step
    pub fn decide<R: Rng + ?Sized>(&self, num_actions: u32, view: &ActorView<'_>, rng: &mut R) -> Vec<Nudge> {
        match self.kind {
            PlayerKind::Passive => Vec::new(),
            PlayerKind::Random => self.decide_random(num_actions, view, rng),
        }
    }

    fn decide_random<R: Rng + ?Sized>(&self, num_actions: u32, view: &ActorView<'_>, rng: &mut R) -> Vec<Nudge> {
        let repeat = view.settings.repeat_nudges;
        let mut candidates: Vec<TokenId> = view
            .tokens
            .iter()
            .filter(|t| t.owner == self.id && (repeat || !t.acted_this_step))
            .map(|t| t.id)
            .collect();

        let mut nudges = Vec::new();
        for _ in 0..num_actions {
            if candidates.is_empty() {
                continue;
            }
            let index = rng.random_range(0..candidates.len());
            let direction = Direction::random(rng);
            nudges.push(Nudge {
                token: candidates[index],
                direction,
            });
            // A nudged token counts as acted for the rest of this phase
            if !repeat {
                candidates.remove(index);
            }
        }
        nudges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::board::seeded_rng;
    use crate::sim::token::TokenType;
    use glam::Vec2;

    fn owned_tokens(owner: PlayerId, count: u32, first_id: u32) -> Vec<Token> {
        (0..count)
            .map(|i| {
                let mut t = Token::new(TokenType::Rock, owner, Vec2::new(i as f32 * 30.0, 0.0));
                t.id = TokenId(first_id + i);
                t
            })
            .collect()
    }

    #[test]
    fn test_passive_player_never_nudges() {
        let player = Player::new(PlayerId::new(1), "P1", PlayerKind::Passive);
        let tokens = owned_tokens(player.id, 3, 10);
        let settings = SimSettings::default();
        let view = ActorView { tokens: &tokens, settings: &settings };
        assert!(player.decide(5, &view, &mut seeded_rng(1)).is_empty());
    }

    #[test]
    fn test_random_player_only_nudges_own_tokens() {
        let me = Player::new(PlayerId::new(1), "P1", PlayerKind::Random);
        let mut tokens = owned_tokens(me.id, 2, 10);
        tokens.extend(owned_tokens(PlayerId::new(2), 5, 20));
        let settings = SimSettings {
            repeat_nudges: true,
            ..Default::default()
        };
        let view = ActorView { tokens: &tokens, settings: &settings };

        let nudges = me.decide(50, &view, &mut seeded_rng(3));
        assert_eq!(nudges.len(), 50);
        assert!(nudges.iter().all(|n| n.token == TokenId(10) || n.token == TokenId(11)));
    }

    #[test]
    fn test_random_player_acts_once_per_token() {
        let me = Player::new(PlayerId::new(1), "P1", PlayerKind::Random);
        let tokens = owned_tokens(me.id, 3, 10);
        let settings = SimSettings::default();
        let view = ActorView { tokens: &tokens, settings: &settings };

        let nudges = me.decide(10, &view, &mut seeded_rng(9));
        assert_eq!(nudges.len(), 3);
        let mut ids: Vec<u32> = nudges.iter().map(|n| n.token.0).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![10, 11, 12]);
    }

    #[test]
    fn test_random_player_skips_already_acted() {
        let me = Player::new(PlayerId::new(1), "P1", PlayerKind::Random);
        let mut tokens = owned_tokens(me.id, 2, 10);
        tokens[0].acted_this_step = true;
        let settings = SimSettings::default();
        let view = ActorView { tokens: &tokens, settings: &settings };

        let nudges = me.decide(4, &view, &mut seeded_rng(5));
        assert_eq!(nudges.len(), 1);
        assert_eq!(nudges[0].token, TokenId(11));
    }

    #[test]
    fn test_random_player_without_tokens_is_noop() {
        let me = Player::new(PlayerId::new(1), "P1", PlayerKind::Random);
        let tokens = owned_tokens(PlayerId::new(2), 4, 10);
        let settings = SimSettings::default();
        let view = ActorView { tokens: &tokens, settings: &settings };
        assert!(me.decide(3, &view, &mut seeded_rng(5)).is_empty());
        assert!(me.decide(0, &view, &mut seeded_rng(5)).is_empty());
    }

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId::new(7).to_string(), "player-7");
    }
}
