//! Tokens: the circular rock/paper/scissors pieces on the board
//!
//! A token owns its own locomotion, wall bounce and combat logic. Anything
//! that would remove a token goes through a [`Removals`] handle so the
//! resolution pass never invalidates the slice it is walking.

use std::collections::BTreeSet;
use std::str::FromStr;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::player::PlayerId;
use crate::consts::DEFAULT_TOKEN_RADIUS;
use crate::error::{SimError, SimResult};
use crate::rotation_from_forces;
use crate::settings::SimSettings;

/// Stable handle for a token, allocated by the simulation on insertion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId(pub u32);

/// Rock, paper or scissors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenType {
    Rock,
    Paper,
    Scissors,
}

impl TokenType {
    pub const ALL: [TokenType; 3] = [TokenType::Rock, TokenType::Paper, TokenType::Scissors];

    /// The type this one loses to
    pub fn conqueror(self) -> TokenType {
        match self {
            TokenType::Rock => TokenType::Paper,
            TokenType::Paper => TokenType::Scissors,
            TokenType::Scissors => TokenType::Rock,
        }
    }

    /// True if `other` beats `self`. Never true for equal types.
    pub fn is_conquered_by(self, other: TokenType) -> bool {
        self.conqueror() == other
    }

    /// Uniformly random type
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Rock => "rock",
            TokenType::Paper => "paper",
            TokenType::Scissors => "scissors",
        }
    }
}

impl FromStr for TokenType {
    type Err = SimError;

    fn from_str(s: &str) -> SimResult<Self> {
        match s.to_lowercase().as_str() {
            "rock" => Ok(TokenType::Rock),
            "paper" => Ok(TokenType::Paper),
            "scissors" => Ok(TokenType::Scissors),
            _ => Err(SimError::UnknownTokenType(s.to_string())),
        }
    }
}

/// What happens to a token when it loses a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntersectionProtocol {
    /// Loser switches to the winner's owner and type
    #[default]
    Capture,
    /// Winner grows by half the loser's radius, loser is removed
    Consume,
    /// Loser is removed
    Destroy,
}

/// Nudge direction in screen space (+y is down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Left, Direction::Right, Direction::Up, Direction::Down];

    /// Uniformly random direction
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Outcome of a lost contact during the resolution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// `token` now belongs to the winner's owner and has the winner's type
    Captured { token: TokenId, winner: TokenId },
    /// `token` was absorbed by `winner`
    Consumed { token: TokenId, winner: TokenId },
    /// `token` was removed
    Destroyed { token: TokenId, winner: TokenId },
}

impl Resolution {
    /// The losing token
    pub fn token(&self) -> TokenId {
        match *self {
            Resolution::Captured { token, .. }
            | Resolution::Consumed { token, .. }
            | Resolution::Destroyed { token, .. } => token,
        }
    }

    /// The conquering token
    pub fn winner(&self) -> TokenId {
        match *self {
            Resolution::Captured { winner, .. }
            | Resolution::Consumed { winner, .. }
            | Resolution::Destroyed { winner, .. } => winner,
        }
    }
}

/// Tokens marked for removal during the current phase
///
/// The live list is compacted once the phase is over.
#[derive(Debug, Clone, Default)]
pub struct Removals {
    ids: BTreeSet<TokenId>,
}

impl Removals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, id: TokenId) {
        self.ids.insert(id);
    }

    pub fn contains(&self, id: TokenId) -> bool {
        self.ids.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Drop every marked token from `tokens`, keeping the order of the rest
    pub fn compact(&mut self, tokens: &mut Vec<Token>) {
        if self.ids.is_empty() {
            return;
        }
        tokens.retain(|t| !self.ids.contains(&t.id));
        self.ids.clear();
    }
}

/// A circular piece on the board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: TokenId,
    #[serde(rename = "type")]
    pub kind: TokenType,
    pub owner: PlayerId,
    pub position: Vec2,
    pub forces: Vec2,
    pub acted_this_step: bool,
    pub protocol: IntersectionProtocol,
    radius: f32,
}

impl Token {
    /// New token with the default radius and the Capture protocol.
    ///
    /// The id is assigned when the token is added to a simulation.
    pub fn new(kind: TokenType, owner: PlayerId, position: Vec2) -> Self {
        Self {
            id: TokenId::default(),
            kind,
            owner,
            position,
            forces: Vec2::ZERO,
            acted_this_step: false,
            protocol: IntersectionProtocol::default(),
            radius: DEFAULT_TOKEN_RADIUS,
        }
    }

    pub fn with_protocol(mut self, protocol: IntersectionProtocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> SimResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(SimError::InvalidConfiguration("token radius must be positive"));
        }
        self.radius = radius;
        Ok(self)
    }

    pub fn with_forces(mut self, forces: Vec2) -> Self {
        self.forces = forces;
        self
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Heading of the current force, for rendering
    pub fn rotation(&self) -> f32 {
        rotation_from_forces(self.forces)
    }

    /// Add a single nudge to the force vector
    pub fn act(&mut self, direction: Direction, nudge_force: f32) {
        match direction {
            Direction::Left => self.forces.x -= nudge_force,
            Direction::Right => self.forces.x += nudge_force,
            Direction::Up => self.forces.y -= nudge_force,
            Direction::Down => self.forces.y += nudge_force,
        }
        self.acted_this_step = true;
    }

    /// Signed gap between the two circles (<= 0 if they touch or overlap)
    pub fn intersects(&self, other: &Token) -> f32 {
        self.position.distance(other.position) - (self.radius + other.radius)
    }

    /// Integrate one step: move, bounce off walls, apply friction
    pub fn update_location(&mut self, settings: &SimSettings) {
        self.position += self.forces;

        let board = Board::from_settings(settings);
        let delta = board.penetration(self.position);
        let rebound = -(1.0 - settings.collision_dampening);
        if delta.x != 0.0 {
            self.position.x -= delta.x;
            self.forces.x *= rebound;
        }
        if delta.y != 0.0 {
            self.position.y -= delta.y;
            self.forces.y *= rebound;
        }
        // Large overshoots can round past the edge after subtraction
        self.position = board.clamp(self.position);

        self.forces *= settings.friction;
        if let Some(zone) = settings.friction_dead_zone {
            if self.forces.x.abs() < zone {
                self.forces.x = 0.0;
            }
            if self.forces.y.abs() < zone {
                self.forces.y = 0.0;
            }
        }
    }

    /// Indices of other live tokens touching this one, paired with their gap
    pub fn overlapping(&self, tokens: &[Token], removals: &Removals) -> Vec<(usize, f32)> {
        tokens
            .iter()
            .enumerate()
            .filter(|(_, other)| other.id != self.id && !removals.contains(other.id))
            .map(|(i, other)| (i, self.intersects(other)))
            .filter(|&(_, gap)| gap <= 0.0)
            .collect()
    }

    /// First overlapping token (deepest overlap first) that beats this one
    pub fn conqueror(&self, tokens: &[Token], removals: &Removals) -> Option<usize> {
        let mut candidates = self.overlapping(tokens, removals);
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
        candidates
            .into_iter()
            .map(|(i, _)| i)
            .find(|&i| self.kind.is_conquered_by(tokens[i].kind))
    }

    /// Force this token picks up from everything it overlaps.
    ///
    /// Zero unless `repulsion` is positive.
    pub fn overlap_force(&self, tokens: &[Token], repulsion: f32) -> Vec2 {
        if repulsion <= 0.0 {
            return Vec2::ZERO;
        }
        self.overlapping(tokens, &Removals::default())
            .into_iter()
            .map(|(i, gap)| {
                let away = (self.position - tokens[i].position).normalize_or_zero();
                away * (-gap * repulsion)
            })
            .sum()
    }

    /// Grow by half of `other`'s radius and remove it
    pub fn grow_from_consuming(&mut self, other: &Token, removals: &mut Removals) {
        self.radius += other.radius / 2.0;
        other.destroy(removals);
    }

    pub fn destroy(&self, removals: &mut Removals) {
        removals.mark(self.id);
    }

    pub fn end_step(&mut self) {
        self.acted_this_step = false;
    }
}

/// Resolve at most one lost contact for `tokens[index]`.
///
/// The policy applied is the loser's own protocol. Destroyed tokens are only
/// marked in `removals`; they drop out of later checks in the same pass.
pub fn settle_intersections(tokens: &mut [Token], index: usize, removals: &mut Removals) -> Option<Resolution> {
    let loser = tokens[index].clone();
    if removals.contains(loser.id) {
        return None;
    }
    let winner_index = loser.conqueror(tokens, removals)?;
    let winner = tokens[winner_index].id;

    let resolution = match loser.protocol {
        IntersectionProtocol::Capture => {
            let (owner, kind) = (tokens[winner_index].owner, tokens[winner_index].kind);
            let token = &mut tokens[index];
            token.owner = owner;
            token.kind = kind;
            Resolution::Captured { token: loser.id, winner }
        }
        IntersectionProtocol::Consume => {
            tokens[winner_index].grow_from_consuming(&loser, removals);
            Resolution::Consumed { token: loser.id, winner }
        }
        IntersectionProtocol::Destroy => {
            loser.destroy(removals);
            Resolution::Destroyed { token: loser.id, winner }
        }
    };
    Some(resolution)
}
