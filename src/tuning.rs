//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a level designer can
//! override it from JSON without touching code. Missing fields keep their
//! defaults, so partial override files are fine.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::ms_to_ticks;

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    pub player_width: i32,
    pub player_height: i32,
    pub player_speed: i32,
    pub mouth_forward_offset: i32,
    pub mouth_vertical_offset: i32,
    /// Ticks the eating pose lasts after firing
    pub eat_ticks: u32,
    /// Ticks between footstep sounds
    pub footstep_ticks: u32,

    // === Lasso ===
    pub lasso_speed: f32,
    pub capture_radius: f32,
    pub retract_done_radius: f32,

    // === Food ===
    pub food_size: i32,
    pub food_min_speed: i32,
    pub food_max_speed: i32,
    pub despawn_margin: i32,
    pub max_live_food: usize,
    pub spawn_chance: f64,
    /// Positive-pool share out of 10
    pub positive_weight: u32,

    // === Basket ===
    pub basket_width: i32,
    pub basket_height: i32,
    pub basket_step: f32,
    pub basket_arrival_radius: f32,

    // === Effects ===
    pub floating_score_lifespan: u32,
    pub floating_score_rise: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            mouth_forward_offset: MOUTH_FORWARD_OFFSET,
            mouth_vertical_offset: MOUTH_VERTICAL_OFFSET,
            eat_ticks: ms_to_ticks(EAT_DURATION_MS),
            footstep_ticks: ms_to_ticks(FOOTSTEP_DELAY_MS),

            lasso_speed: LASSO_SPEED,
            capture_radius: CAPTURE_RADIUS,
            retract_done_radius: RETRACT_DONE_RADIUS,

            food_size: FOOD_SIZE,
            food_min_speed: FOOD_MIN_SPEED,
            food_max_speed: FOOD_MAX_SPEED,
            despawn_margin: FOOD_DESPAWN_MARGIN,
            max_live_food: MAX_LIVE_FOOD,
            spawn_chance: SPAWN_CHANCE,
            positive_weight: POSITIVE_POOL_WEIGHT,

            basket_width: BASKET_WIDTH,
            basket_height: BASKET_HEIGHT,
            basket_step: BASKET_STEP,
            basket_arrival_radius: BASKET_ARRIVAL_RADIUS,

            floating_score_lifespan: FLOATING_SCORE_LIFESPAN,
            floating_score_rise: FLOATING_SCORE_RISE,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON, then bring them into a playable range
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp values that would stall or break the simulation
    pub fn sanitized(mut self) -> Self {
        self.player_width = self.player_width.max(1);
        self.player_height = self.player_height.max(1);
        self.player_speed = self.player_speed.max(1);
        self.lasso_speed = self.lasso_speed.max(1.0);
        self.capture_radius = self.capture_radius.max(0.0);
        self.retract_done_radius = self.retract_done_radius.max(1.0);
        self.food_size = self.food_size.max(1);
        self.food_min_speed = self.food_min_speed.max(1);
        self.food_max_speed = self.food_max_speed.max(self.food_min_speed);
        self.spawn_chance = self.spawn_chance.clamp(0.0, 1.0);
        self.positive_weight = self.positive_weight.min(10);
        self.basket_step = self.basket_step.max(1.0);
        self.basket_arrival_radius = self.basket_arrival_radius.max(1.0);
        self
    }

    pub fn half_player(&self) -> (i32, i32) {
        (self.player_width / 2, self.player_height / 2)
    }
}
