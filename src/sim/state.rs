//! Simulation state and the inbound API used by a UI
//!
//! The state exclusively owns every player and token. Callers address tokens
//! by [`TokenId`]; a stale id is always a safe no-op.

use glam::Vec2;

use super::board::{Board, SimRng, seeded_rng};
use super::player::{Player, PlayerId, PlayerKind};
use super::token::{Direction, IntersectionProtocol, Token, TokenId, TokenType};
use crate::error::{SimError, SimResult};
use crate::settings::SimSettings;

/// Run state of the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimPhase {
    /// Ticks are no-ops
    #[default]
    Stopped,
    /// Ticks run the full step
    Running,
}

/// Complete simulation state (deterministic for a given seed and call sequence)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Current run state
    pub phase: SimPhase,
    /// Steps executed while running
    pub step_count: u64,
    pub(crate) settings: SimSettings,
    /// Players in insertion order (append-only)
    pub(crate) players: Vec<Player>,
    /// Live tokens in insertion order
    pub(crate) tokens: Vec<Token>,
    pub(crate) rng: SimRng,
    /// Next entity ID (shared by players and tokens)
    next_id: u32,
}

impl SimState {
    /// Create a stopped simulation with default settings
    pub fn new(seed: u64) -> Self {
        log::debug!("Simulation seeded with {}", seed);
        Self {
            seed,
            phase: SimPhase::Stopped,
            step_count: 0,
            settings: SimSettings::default(),
            players: Vec::new(),
            tokens: Vec::new(),
            rng: seeded_rng(seed),
            next_id: 1,
        }
    }

    /// Create a stopped simulation with validated settings
    pub fn with_settings(seed: u64, settings: SimSettings) -> SimResult<Self> {
        settings.validate()?;
        let mut state = Self::new(seed);
        state.settings = settings;
        Ok(state)
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn start(&mut self) {
        if self.phase != SimPhase::Running {
            self.phase = SimPhase::Running;
            log::info!("Simulation started (step {})", self.step_count);
        }
    }

    pub fn stop(&mut self) {
        if self.phase != SimPhase::Stopped {
            self.phase = SimPhase::Stopped;
            log::info!("Simulation stopped (step {})", self.step_count);
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == SimPhase::Running
    }

    pub fn settings(&self) -> &SimSettings {
        &self.settings
    }

    /// Replace every setting at once
    pub fn set_settings(&mut self, settings: SimSettings) -> SimResult<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    pub fn board(&self) -> Board {
        Board::from_settings(&self.settings)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    /// Register a new player; returns its id
    pub fn add_player(&mut self, kind: PlayerKind) -> PlayerId {
        let id = PlayerId::new(self.next_entity_id());
        let label = format!("Player {}", self.players.len() + 1);
        log::info!("Added {} ({:?}) as {}", label, kind, id);
        self.players.push(Player::new(id, label, kind));
        id
    }

    /// Insert a token, assigning it a fresh id
    pub fn add_token(&mut self, mut token: Token) -> SimResult<TokenId> {
        if !token.radius().is_finite() || token.radius() <= 0.0 {
            return Err(SimError::InvalidConfiguration("token radius must be positive"));
        }
        if !token.position.is_finite() || !token.forces.is_finite() {
            return Err(SimError::InvalidConfiguration("token position and forces must be finite"));
        }
        token.id = TokenId(self.next_entity_id());
        let id = token.id;
        self.tokens.push(token);
        Ok(id)
    }

    /// Token factory backed by the simulation RNG (random type when `kind` is `None`)
    pub fn spawn_token(
        &mut self,
        owner: PlayerId,
        position: Vec2,
        kind: Option<TokenType>,
        protocol: IntersectionProtocol,
    ) -> SimResult<TokenId> {
        let kind = match kind {
            Some(kind) => kind,
            None => TokenType::random(&mut self.rng),
        };
        self.add_token(Token::new(kind, owner, position).with_protocol(protocol))
    }

    /// Remove a token; `None` if it was already gone
    pub fn remove_token(&mut self, id: TokenId) -> Option<Token> {
        let index = self.tokens.iter().position(|t| t.id == id)?;
        Some(self.tokens.remove(index))
    }

    /// Nudge a token directly (manual control). False for a stale id.
    pub fn nudge(&mut self, id: TokenId, direction: Direction) -> bool {
        let nudge_force = self.settings.nudge_force;
        match self.tokens.iter_mut().find(|t| t.id == id) {
            Some(token) => {
                token.act(direction, nudge_force);
                true
            }
            None => false,
        }
    }

    /// Uniform integer point on the board
    pub fn random_position(&mut self) -> Vec2 {
        let board = self.board();
        board.random_position(&mut self.rng)
    }

    pub fn set_board_size(&mut self, width: f32, height: f32) -> SimResult<()> {
        self.settings.set_board_size(width, height)
    }

    pub fn set_friction(&mut self, friction: f32) -> SimResult<()> {
        self.settings.set_friction(friction)
    }

    pub fn set_nudge_force(&mut self, nudge_force: f32) -> SimResult<()> {
        self.settings.set_nudge_force(nudge_force)
    }

    pub fn set_collision_dampening(&mut self, dampening: f32) -> SimResult<()> {
        self.settings.set_collision_dampening(dampening)
    }

    pub fn set_actions_per_step(&mut self, actions: u32) {
        self.settings.set_actions_per_step(actions);
    }

    pub fn set_steps_per_second(&mut self, steps: f32) -> SimResult<()> {
        self.settings.set_steps_per_second(steps)
    }

    pub fn set_repeat_nudges(&mut self, repeat: bool) {
        self.settings.set_repeat_nudges(repeat);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = SimState::new(123);
        assert_eq!(state.phase, SimPhase::Stopped);
        assert!(!state.is_active());
        assert!(state.players().is_empty());
        assert!(state.tokens().is_empty());
        assert_eq!(state.settings(), &SimSettings::default());
    }

    #[test]
    fn test_start_stop_idempotent() {
        let mut state = SimState::new(1);
        state.start();
        state.start();
        assert!(state.is_active());
        state.stop();
        state.stop();
        assert!(!state.is_active());
        assert_eq!(state.step_count, 0);
    }

    #[test]
    fn test_with_settings_validates() {
        let bad = SimSettings {
            friction: 2.0,
            ..Default::default()
        };
        assert!(SimState::with_settings(1, bad).is_err());
        assert!(SimState::with_settings(1, SimSettings::default()).is_ok());
    }

    #[test]
    fn test_players_keep_insertion_order() {
        let mut state = SimState::new(1);
        let a = state.add_player(PlayerKind::Random);
        let b = state.add_player(PlayerKind::Passive);
        assert_ne!(a, b);
        assert_eq!(state.players()[0].id, a);
        assert_eq!(state.players()[1].id, b);
        assert_eq!(state.players()[0].label, "Player 1");
        assert_eq!(state.player(b).map(|p| p.kind), Some(PlayerKind::Passive));
    }

    #[test]
    fn test_add_and_remove_token() {
        let mut state = SimState::new(1);
        let owner = state.add_player(PlayerKind::Passive);
        let first = state.add_token(Token::new(TokenType::Rock, owner, Vec2::new(10.0, 10.0))).unwrap();
        let second = state.add_token(Token::new(TokenType::Paper, owner, Vec2::new(50.0, 10.0))).unwrap();
        assert_ne!(first, second);
        assert_eq!(state.tokens().len(), 2);

        let removed = state.remove_token(first).unwrap();
        assert_eq!(removed.kind, TokenType::Rock);
        assert!(state.remove_token(first).is_none());
        assert_eq!(state.tokens().len(), 1);
        assert_eq!(state.tokens()[0].id, second);
    }

    #[test]
    fn test_add_token_rejects_non_finite_position() {
        let mut state = SimState::new(1);
        let owner = state.add_player(PlayerKind::Passive);
        let token = Token::new(TokenType::Rock, owner, Vec2::new(f32::NAN, 0.0));
        assert!(state.add_token(token).is_err());
        assert!(state.tokens().is_empty());
    }

    #[test]
    fn test_nudge_stale_token_is_noop() {
        let mut state = SimState::new(1);
        let owner = state.add_player(PlayerKind::Passive);
        let id = state.add_token(Token::new(TokenType::Rock, owner, Vec2::new(10.0, 10.0))).unwrap();

        assert!(state.nudge(id, Direction::Right));
        assert_eq!(state.token(id).map(|t| t.forces), Some(Vec2::new(2.0, 0.0)));

        state.remove_token(id);
        assert!(!state.nudge(id, Direction::Right));
    }

    #[test]
    fn test_spawn_token_random_type_is_seeded() {
        let kinds = |seed| {
            let mut state = SimState::new(seed);
            let owner = state.add_player(PlayerKind::Passive);
            (0..10)
                .map(|_| {
                    let pos = state.random_position();
                    let id = state.spawn_token(owner, pos, None, IntersectionProtocol::Capture).unwrap();
                    state.token(id).map(|t| (t.kind, t.position))
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(kinds(77), kinds(77));
    }

    #[test]
    fn test_spawn_token_explicit_type_and_protocol() {
        let mut state = SimState::new(1);
        let owner = state.add_player(PlayerKind::Passive);
        let id = state
            .spawn_token(owner, Vec2::new(5.0, 5.0), Some(TokenType::Scissors), IntersectionProtocol::Destroy)
            .unwrap();
        let token = state.token(id).unwrap();
        assert_eq!(token.kind, TokenType::Scissors);
        assert_eq!(token.protocol, IntersectionProtocol::Destroy);
        assert_eq!(token.owner, owner);
    }

    #[test]
    fn test_setters_validate() {
        let mut state = SimState::new(1);
        assert!(state.set_friction(1.2).is_err());
        assert!(state.set_collision_dampening(-0.2).is_err());
        assert!(state.set_board_size(0.0, 10.0).is_err());
        assert!(state.set_steps_per_second(-1.0).is_err());
        assert!(state.set_nudge_force(0.0).is_err());
        assert_eq!(state.settings(), &SimSettings::default());

        state.set_friction(0.5).unwrap();
        state.set_actions_per_step(3);
        state.set_repeat_nudges(true);
        assert_eq!(state.settings().friction, 0.5);
        assert_eq!(state.settings().actions_per_step, 3);
        assert!(state.settings().repeat_nudges);
    }
}
