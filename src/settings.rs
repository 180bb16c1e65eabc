//! Simulation settings
//!
//! Every tunable physics/actor parameter lives here. Values are validated at
//! the setter boundary and never clamped silently. Persisted separately from
//! the simulation in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SimError, SimResult};

/// Slider metadata for a settings panel
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamRange {
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    /// Whether a slider value falls inside this range
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Slider ranges used by the settings panel
pub mod ranges {
    use super::ParamRange;

    /// Friction slider (0 = no friction loss, 1 = strongest loss)
    pub const FRICTION: ParamRange = ParamRange { label: "Friction", min: 0.0, max: 1.0, step: 0.01 };
    pub const NUDGE_FORCE: ParamRange = ParamRange { label: "Nudge Force", min: 1.0, max: 20.0, step: 1.0 };
    pub const COLLISION_DAMPENING: ParamRange =
        ParamRange { label: "Bounce Dampening", min: 0.0, max: 1.0, step: 0.01 };
    pub const ACTIONS_PER_STEP: ParamRange =
        ParamRange { label: "Actions Per Step", min: 1.0, max: 20.0, step: 1.0 };
    pub const STEPS_PER_SECOND: ParamRange =
        ParamRange { label: "Steps Per Second", min: 1.0, max: 120.0, step: 1.0 };

    pub const ALL: [ParamRange; 5] = [FRICTION, NUDGE_FORCE, COLLISION_DAMPENING, ACTIONS_PER_STEP, STEPS_PER_SECOND];
}

/// A slider range paired with its current position
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slider {
    #[serde(flatten)]
    pub range: ParamRange,
    pub value: f32,
}

/// Largest per-step force loss reachable from the friction slider
const FRICTION_SLIDER_SCALE: f32 = 0.15;

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSettings {
    /// Board width in pixels
    pub board_width: f32,
    /// Board height in pixels
    pub board_height: f32,
    /// Per-step force multiplier (1.0 = no decay)
    pub friction: f32,
    /// Force added by a single nudge
    pub nudge_force: f32,
    /// Fraction of force lost on a wall bounce (0 = elastic, 1 = dead stop)
    pub collision_dampening: f32,
    /// Nudges each player may issue per step
    pub actions_per_step: u32,
    /// Fixed tick rate of the driver
    pub steps_per_second: f32,
    /// Allow a token to be nudged more than once per step
    pub repeat_nudges: bool,
    /// Soft repulsion between overlapping tokens (0 = inert)
    #[serde(default)]
    pub overlap_repulsion: f32,
    /// Snap force components below this magnitude to zero after friction
    #[serde(default)]
    pub friction_dead_zone: Option<f32>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            board_width: DEFAULT_BOARD_WIDTH,
            board_height: DEFAULT_BOARD_HEIGHT,
            friction: DEFAULT_FRICTION,
            nudge_force: DEFAULT_NUDGE_FORCE,
            collision_dampening: DEFAULT_COLLISION_DAMPENING,
            actions_per_step: DEFAULT_ACTIONS_PER_STEP,
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
            repeat_nudges: false,
            overlap_repulsion: 0.0,
            friction_dead_zone: None,
        }
    }
}

fn check_unit(value: f32, msg: &'static str) -> SimResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::InvalidConfiguration(msg))
    }
}

fn check_positive(value: f32, msg: &'static str) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfiguration(msg))
    }
}

impl SimSettings {
    /// Check every parameter invariant
    pub fn validate(&self) -> SimResult<()> {
        check_positive(self.board_width, "board_width must be positive")?;
        check_positive(self.board_height, "board_height must be positive")?;
        check_unit(self.friction, "friction must be within [0, 1]")?;
        check_positive(self.nudge_force, "nudge_force must be positive")?;
        check_unit(self.collision_dampening, "collision_dampening must be within [0, 1]")?;
        check_positive(self.steps_per_second, "steps_per_second must be positive")?;
        if !self.overlap_repulsion.is_finite() || self.overlap_repulsion < 0.0 {
            return Err(SimError::InvalidConfiguration("overlap_repulsion must be non-negative"));
        }
        if let Some(zone) = self.friction_dead_zone {
            if !zone.is_finite() || zone < 0.0 {
                return Err(SimError::InvalidConfiguration("friction_dead_zone must be non-negative"));
            }
        }
        Ok(())
    }

    pub fn set_board_size(&mut self, width: f32, height: f32) -> SimResult<()> {
        check_positive(width, "board_width must be positive")?;
        check_positive(height, "board_height must be positive")?;
        self.board_width = width;
        self.board_height = height;
        Ok(())
    }

    pub fn set_friction(&mut self, friction: f32) -> SimResult<()> {
        check_unit(friction, "friction must be within [0, 1]")?;
        self.friction = friction;
        Ok(())
    }

    pub fn set_nudge_force(&mut self, nudge_force: f32) -> SimResult<()> {
        check_positive(nudge_force, "nudge_force must be positive")?;
        self.nudge_force = nudge_force;
        Ok(())
    }

    pub fn set_collision_dampening(&mut self, dampening: f32) -> SimResult<()> {
        check_unit(dampening, "collision_dampening must be within [0, 1]")?;
        self.collision_dampening = dampening;
        Ok(())
    }

    pub fn set_actions_per_step(&mut self, actions: u32) {
        self.actions_per_step = actions;
    }

    pub fn set_steps_per_second(&mut self, steps: f32) -> SimResult<()> {
        check_positive(steps, "steps_per_second must be positive")?;
        self.steps_per_second = steps;
        Ok(())
    }

    pub fn set_repeat_nudges(&mut self, repeat: bool) {
        self.repeat_nudges = repeat;
    }

    pub fn set_overlap_repulsion(&mut self, repulsion: f32) -> SimResult<()> {
        if !repulsion.is_finite() || repulsion < 0.0 {
            return Err(SimError::InvalidConfiguration("overlap_repulsion must be non-negative"));
        }
        self.overlap_repulsion = repulsion;
        Ok(())
    }

    pub fn set_friction_dead_zone(&mut self, zone: Option<f32>) -> SimResult<()> {
        if let Some(z) = zone {
            if !z.is_finite() || z < 0.0 {
                return Err(SimError::InvalidConfiguration("friction_dead_zone must be non-negative"));
            }
        }
        self.friction_dead_zone = zone;
        Ok(())
    }

    /// Apply a friction slider position (0..=1, higher = more drag)
    pub fn set_friction_from_slider(&mut self, value: f32) -> SimResult<()> {
        if !value.is_finite() || !ranges::FRICTION.contains(value) {
            return Err(SimError::InvalidConfiguration("friction slider must be within [0, 1]"));
        }
        self.set_friction(1.0 - value * FRICTION_SLIDER_SCALE)
    }

    /// Slider position that reproduces the current friction
    pub fn friction_slider_value(&self) -> f32 {
        ((1.0 - self.friction) / FRICTION_SLIDER_SCALE).clamp(0.0, 1.0)
    }

    /// Current position of every panel slider, in `ranges::ALL` order
    pub fn sliders(&self) -> [Slider; 5] {
        let values = [
            self.friction_slider_value(),
            self.nudge_force,
            self.collision_dampening,
            self.actions_per_step as f32,
            self.steps_per_second,
        ];
        let mut sliders = ranges::ALL.map(|range| Slider { range, value: 0.0 });
        for (slider, value) in sliders.iter_mut().zip(values) {
            slider.value = value;
        }
        sliders
    }

    /// Seconds between driver ticks
    pub fn step_interval(&self) -> f32 {
        1.0 / self.steps_per_second
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "rps_arena_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<SimSettings>(&json) {
                    Ok(settings) if settings.validate().is_ok() => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Ok(_) => log::warn!("Stored settings failed validation, using defaults"),
                    Err(e) => log::warn!("Stored settings unreadable: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
