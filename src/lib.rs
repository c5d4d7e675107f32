//! Lasso Feast - a lasso-and-basket arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player, lasso, food, scoring)
//! - `session`: Session controller wiring the sim to audio and score storage
//! - `leaderboard`: Per-username score table and upsert policies
//! - `persistence`: Score store backends (memory, JSON file, LocalStorage)
//! - `audio`: Injected sound sink
//! - `settings`: Persisted player preferences
//! - `platform`: Fixed-step driver and browser bindings
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod leaderboard;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use leaderboard::{Leaderboard, ScorePolicy, ScoreRecord};
pub use session::{SaveStatus, Session};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::IVec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player sprite footprint
    pub const PLAYER_WIDTH: i32 = 100;
    pub const PLAYER_HEIGHT: i32 = 100;
    /// Walking speed (units per move command)
    pub const PLAYER_SPEED: i32 = 4;
    /// Lasso emission point relative to the player centre
    pub const MOUTH_FORWARD_OFFSET: i32 = 30;
    pub const MOUTH_VERTICAL_OFFSET: i32 = 35;
    /// How long the player stays in the eating pose after firing
    pub const EAT_DURATION_MS: u32 = 500;
    /// Minimum gap between footstep sounds
    pub const FOOTSTEP_DELAY_MS: u32 = 250;

    /// Lasso tip speed (units per tick)
    pub const LASSO_SPEED: f32 = 20.0;
    /// Tip-to-food distance that hooks a food item
    pub const CAPTURE_RADIUS: f32 = 25.0;
    /// Tip-to-mouth distance at which a retracting lasso is considered home
    pub const RETRACT_DONE_RADIUS: f32 = 20.0;

    /// Food sprite size (square)
    pub const FOOD_SIZE: i32 = 64;
    /// X where food entering from the left edge appears
    pub const FOOD_LEFT_ENTRY_X: i32 = -30;
    pub const FOOD_MIN_SPEED: i32 = 1;
    pub const FOOD_MAX_SPEED: i32 = 3;
    /// Free food is dropped once this far past either horizontal edge
    pub const FOOD_DESPAWN_MARGIN: i32 = 50;
    pub const MAX_LIVE_FOOD: usize = 15;
    /// Chance per tick of spawning a food item
    pub const SPAWN_CHANCE: f64 = 0.05;
    /// Out of 10 spawns, how many come from the positive pool
    pub const POSITIVE_POOL_WEIGHT: u32 = 7;

    /// Score basket, flush with the right edge and vertically centred
    pub const BASKET_WIDTH: i32 = 260;
    pub const BASKET_HEIGHT: i32 = 220;
    /// Distance food travels toward the basket each tick
    pub const BASKET_STEP: f32 = 15.0;
    pub const BASKET_ARRIVAL_RADIUS: f32 = 15.0;

    /// Floating score popups
    pub const FLOATING_SCORE_LIFESPAN: u32 = 70;
    pub const FLOATING_SCORE_RISE: f32 = 0.5;
}

/// Convert a wall-clock duration to whole simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    (ms * consts::TICK_HZ).div_ceil(1000)
}

/// Move `from` toward `to` by at most `speed` units.
///
/// The step is truncated toward zero on each axis. When the destination is
/// within `speed` (including zero distance) the result snaps onto it.
#[inline]
pub fn step_toward(from: IVec2, to: IVec2, speed: f32) -> IVec2 {
    let delta = (to - from).as_vec2();
    let distance = delta.length();
    if distance > speed {
        from + (delta * (speed / distance)).as_ivec2()
    } else {
        to
    }
}

/// True when `a` and `b` are strictly closer than `radius`
#[inline]
pub fn within_radius(a: IVec2, b: IVec2, radius: f32) -> bool {
    a.as_vec2().distance_squared(b.as_vec2()) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_toward_moves_by_speed() {
        let next = step_toward(IVec2::ZERO, IVec2::new(100, 0), 20.0);
        assert_eq!(next, IVec2::new(20, 0));
    }

    #[test]
    fn test_step_toward_truncates_diagonal() {
        // 3-4-5 triangle scaled: unit vector (0.6, 0.8) * 20 = (12, 16)
        let next = step_toward(IVec2::ZERO, IVec2::new(60, 80), 20.0);
        assert_eq!(next, IVec2::new(12, 16));

        // Non-integral step truncates toward zero on both axes
        let next = step_toward(IVec2::ZERO, IVec2::new(-100, 100), 20.0);
        assert_eq!(next, IVec2::new(-14, 14));
    }

    #[test]
    fn test_step_toward_snaps_when_close() {
        let next = step_toward(IVec2::new(5, 5), IVec2::new(15, 5), 20.0);
        assert_eq!(next, IVec2::new(15, 5));
    }

    #[test]
    fn test_step_toward_zero_distance() {
        let p = IVec2::new(42, -7);
        assert_eq!(step_toward(p, p, 20.0), p);
    }

    #[test]
    fn test_within_radius_is_strict() {
        assert!(within_radius(IVec2::ZERO, IVec2::new(24, 0), 25.0));
        assert!(!within_radius(IVec2::ZERO, IVec2::new(25, 0), 25.0));
    }

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(consts::EAT_DURATION_MS), 30);
        assert_eq!(ms_to_ticks(consts::FOOTSTEP_DELAY_MS), 15);
        assert_eq!(ms_to_ticks(1), 1);
        assert_eq!(ms_to_ticks(0), 0);
    }
}
