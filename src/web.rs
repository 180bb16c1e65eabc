//! Browser bridge
//!
//! Thin `wasm-bindgen` wrapper so the page's settings panel and canvas code can
//! drive the simulation. Players and tokens are addressed by index/id numbers.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::error::SimError;
use crate::render::{Scoreboard, Snapshot};
use crate::settings::SimSettings;
use crate::sim::{Direction, Driver, IntersectionProtocol, PlayerKind, SimState, TokenId, TokenType};

fn js_err(e: SimError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_protocol(name: &str) -> Result<IntersectionProtocol, JsValue> {
    match name.to_lowercase().as_str() {
        "capture" => Ok(IntersectionProtocol::Capture),
        "consume" => Ok(IntersectionProtocol::Consume),
        "destroy" => Ok(IntersectionProtocol::Destroy),
        _ => Err(JsValue::from_str("unknown intersection protocol")),
    }
}

fn parse_direction(name: &str) -> Result<Direction, JsValue> {
    match name.to_lowercase().as_str() {
        "left" => Ok(Direction::Left),
        "right" => Ok(Direction::Right),
        "up" => Ok(Direction::Up),
        "down" => Ok(Direction::Down),
        _ => Err(JsValue::from_str("unknown direction")),
    }
}

/// Simulation handle exported to JavaScript
#[wasm_bindgen]
pub struct WebSimulation {
    state: SimState,
    driver: Driver,
}

#[wasm_bindgen]
impl WebSimulation {
    /// Create a stopped simulation using the settings saved in LocalStorage
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u32, board_width: f32, board_height: f32) -> Result<WebSimulation, JsValue> {
        let mut settings = SimSettings::load();
        settings.set_board_size(board_width, board_height).map_err(js_err)?;
        let state = SimState::with_settings(u64::from(seed), settings).map_err(js_err)?;
        log::info!("Simulation created with seed: {}", seed);
        Ok(Self {
            state,
            driver: Driver::new(),
        })
    }

    /// Add a player; returns its index in the player list
    pub fn add_player(&mut self, random: bool) -> usize {
        let kind = if random { PlayerKind::Random } else { PlayerKind::Passive };
        self.state.add_player(kind);
        self.state.players().len() - 1
    }

    /// Add a token for the player at `player_index`; `kind` may be empty for a random type
    pub fn add_token(
        &mut self,
        player_index: usize,
        x: f32,
        y: f32,
        kind: &str,
        protocol: &str,
    ) -> Result<u32, JsValue> {
        let owner = self
            .state
            .players()
            .get(player_index)
            .map(|p| p.id)
            .ok_or_else(|| JsValue::from_str("unknown player"))?;
        let kind = if kind.is_empty() {
            None
        } else {
            Some(kind.parse::<TokenType>().map_err(js_err)?)
        };
        let protocol = parse_protocol(protocol)?;
        let id = self
            .state
            .spawn_token(owner, Vec2::new(x, y), kind, protocol)
            .map_err(js_err)?;
        Ok(id.0)
    }

    pub fn remove_token(&mut self, id: u32) -> bool {
        self.state.remove_token(TokenId(id)).is_some()
    }

    pub fn nudge(&mut self, id: u32, direction: &str) -> Result<bool, JsValue> {
        Ok(self.state.nudge(TokenId(id), parse_direction(direction)?))
    }

    /// Random board position as `[x, y]`
    pub fn random_position(&mut self) -> Vec<f32> {
        let p = self.state.random_position();
        vec![p.x, p.y]
    }

    pub fn start(&mut self) {
        self.state.start();
    }

    pub fn stop(&mut self) {
        self.state.stop();
    }

    pub fn active(&self) -> bool {
        self.state.is_active()
    }

    /// Feed frame time in milliseconds; returns how many steps ran
    pub fn tick(&mut self, elapsed_ms: f64) -> usize {
        self.driver.advance(&mut self.state, (elapsed_ms / 1000.0) as f32).len()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        Snapshot::capture(&self.state)
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn scoreboard_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&Scoreboard::from_state(&self.state)).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Current settings, for the panel to read back after a LocalStorage load
    pub fn settings_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.state.settings()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Slider ranges with their current positions
    pub fn sliders_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.settings().sliders()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn friction_slider(&self) -> f32 {
        self.state.settings().friction_slider_value()
    }

    pub fn set_board_size(&mut self, width: f32, height: f32) -> Result<(), JsValue> {
        self.state.set_board_size(width, height).map_err(js_err)
    }

    pub fn set_friction_slider(&mut self, value: f32) -> Result<(), JsValue> {
        let mut settings = self.state.settings().clone();
        settings.set_friction_from_slider(value).map_err(js_err)?;
        self.apply(settings)
    }

    pub fn set_nudge_force(&mut self, value: f32) -> Result<(), JsValue> {
        self.state.set_nudge_force(value).map_err(js_err)?;
        self.state.settings().save();
        Ok(())
    }

    pub fn set_collision_dampening(&mut self, value: f32) -> Result<(), JsValue> {
        self.state.set_collision_dampening(value).map_err(js_err)?;
        self.state.settings().save();
        Ok(())
    }

    pub fn set_actions_per_step(&mut self, value: u32) {
        self.state.set_actions_per_step(value);
        self.state.settings().save();
    }

    pub fn set_steps_per_second(&mut self, value: f32) -> Result<(), JsValue> {
        self.state.set_steps_per_second(value).map_err(js_err)?;
        self.state.settings().save();
        Ok(())
    }

    pub fn set_repeat_nudges(&mut self, value: bool) {
        self.state.set_repeat_nudges(value);
        self.state.settings().save();
    }
}

impl WebSimulation {
    fn apply(&mut self, settings: SimSettings) -> Result<(), JsValue> {
        self.state.set_settings(settings).map_err(js_err)?;
        self.state.settings().save();
        Ok(())
    }
}
