//! Food spawn policy
//!
//! Two weighted pools (positive 7/10, negative 3/10). Food enters in the top
//! third from the right edge moving left, or in the bottom third from the
//! left edge moving right.

use glam::IVec2;
use rand::Rng;

use super::state::{FoodKind, GameEvent, GameState, Viewport};
use crate::consts::FOOD_LEFT_ENTRY_X;
use crate::tuning::Tuning;

/// A pool entry: asset key and score value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodSpec {
    pub name: &'static str,
    pub value: i32,
}

const fn spec(name: &'static str, value: i32) -> FoodSpec {
    FoodSpec { name, value }
}

pub const POSITIVE_POOL: [FoodSpec; 7] = [
    spec("steak", 20),
    spec("hotdog", 20),
    spec("hamburger", 20),
    spec("cheesecake", 10),
    spec("chocolate", 10),
    spec("pudding", 10),
    spec("sushi", 10),
];

pub const NEGATIVE_POOL: [FoodSpec; 5] = [
    spec("carrot", -10),
    spec("green", -10),
    spec("corn", -10),
    spec("eggplant", -10),
    spec("cucumber", -10),
];

/// Draw a pool, then a uniform item from it
pub fn pick_food<R: Rng>(rng: &mut R, tuning: &Tuning) -> (FoodKind, FoodSpec) {
    if rng.random_range(0..10) < tuning.positive_weight {
        let i = rng.random_range(0..POSITIVE_POOL.len());
        (FoodKind::Positive, POSITIVE_POOL[i])
    } else {
        let i = rng.random_range(0..NEGATIVE_POOL.len());
        (FoodKind::Negative, NEGATIVE_POOL[i])
    }
}

/// Uniform in `lo..hi`, or `lo` when the range is empty
fn range_or_floor<R: Rng>(rng: &mut R, lo: i32, hi: i32) -> i32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Pick entry position and signed speed.
///
/// The sprite is centred on the position, so the lane is inset by half a
/// sprite to keep it clear of the top/bottom edge.
pub fn pick_lane<R: Rng>(rng: &mut R, viewport: Viewport, tuning: &Tuning) -> (IVec2, i32) {
    let half = tuning.food_size / 2;
    let top_zone_end = viewport.height / 3;
    let bottom_zone_start = viewport.height * 2 / 3;
    let speed = rng.random_range(tuning.food_min_speed..=tuning.food_max_speed);

    if rng.random_bool(0.5) {
        let y = range_or_floor(rng, half, top_zone_end - half);
        (IVec2::new(viewport.width, y), -speed)
    } else {
        let y = range_or_floor(rng, bottom_zone_start + half, viewport.height - half);
        (IVec2::new(FOOD_LEFT_ENTRY_X, y), speed)
    }
}

/// Unconditionally spawn one food item; returns its id
pub fn spawn_food(state: &mut GameState) -> u32 {
    let (_, food) = pick_food(&mut state.rng, &state.tuning);
    let (pos, speed) = pick_lane(&mut state.rng, state.viewport, &state.tuning);
    let id = state.add_food(food.name, food.value, pos, speed);
    log::debug!("Spawned {} ({:+}) at {:?} speed {}", food.name, food.value, pos, speed);
    state.events.push(GameEvent::FoodSpawned { id });
    id
}

/// Roll the per-tick spawn chance, respecting the live food cap
pub fn try_spawn(state: &mut GameState) -> Option<u32> {
    if state.foods.len() >= state.tuning.max_live_food {
        return None;
    }
    if !state.rng.random_bool(state.tuning.spawn_chance) {
        return None;
    }
    Some(spawn_food(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pool_split_is_roughly_seventy_thirty() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = Tuning::default();
        let trials = 20_000;
        let positives = (0..trials)
            .filter(|_| pick_food(&mut rng, &tuning).0 == FoodKind::Positive)
            .count();
        let share = positives as f64 / trials as f64;
        assert!((0.67..=0.73).contains(&share), "positive share {share}");
    }

    #[test]
    fn test_pool_values() {
        assert!(POSITIVE_POOL.iter().all(|f| f.value == 10 || f.value == 20));
        assert!(NEGATIVE_POOL.iter().all(|f| f.value == -10));
    }

    #[test]
    fn test_lane_direction_matches_side() {
        let mut rng = Pcg32::seed_from_u64(99);
        let tuning = Tuning::default();
        let vp = Viewport::new(1200, 900);
        for _ in 0..500 {
            let (pos, speed) = pick_lane(&mut rng, vp, &tuning);
            assert!((1..=3).contains(&speed.abs()));
            if pos.y < vp.height / 3 {
                assert_eq!(pos.x, vp.width);
                assert!(speed < 0);
                assert!(pos.y >= tuning.food_size / 2);
            } else {
                assert!(pos.y >= vp.height * 2 / 3);
                assert_eq!(pos.x, FOOD_LEFT_ENTRY_X);
                assert!(speed > 0);
                assert!(pos.y + tuning.food_size / 2 <= vp.height);
            }
        }
    }

    #[test]
    fn test_lane_survives_tiny_viewport() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = Tuning::default();
        for _ in 0..50 {
            let _ = pick_lane(&mut rng, Viewport::new(10, 10), &tuning);
        }
    }

    #[test]
    fn test_try_spawn_respects_cap() {
        let mut tuning = Tuning::default();
        tuning.spawn_chance = 1.0;
        tuning.max_live_food = 3;
        let mut state = GameState::new(5, Viewport::new(800, 600), tuning);
        for _ in 0..10 {
            try_spawn(&mut state);
        }
        assert_eq!(state.foods.len(), 3);
        assert_eq!(
            state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::FoodSpawned { .. }))
                .count(),
            3
        );
    }

    #[test]
    fn test_zero_chance_never_spawns() {
        let mut tuning = Tuning::default();
        tuning.spawn_chance = 0.0;
        let mut state = GameState::new(5, Viewport::new(800, 600), tuning);
        for _ in 0..1000 {
            assert!(try_spawn(&mut state).is_none());
        }
    }
}
