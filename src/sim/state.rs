//! Game state and core simulation types
//!
//! Plain entity data plus the per-entity movement rules. Orchestration
//! lives in `tick`.

use glam::{IVec2, Vec2};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::lasso::Lasso;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game running (menu / leaderboard)
    StartScreen,
    /// Active gameplay
    Playing,
    /// Game is paused, nothing advances
    Paused,
}

/// Playfield size in units, supplied by the renderer every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> IVec2 {
        IVec2::new(self.width / 2, self.height / 2)
    }

    /// Centre of the score basket, which sits flush with the right edge
    pub fn basket_anchor(&self, tuning: &Tuning) -> IVec2 {
        let basket_x = self.width - tuning.basket_width;
        let basket_y = (self.height - tuning.basket_height) / 2;
        IVec2::new(
            basket_x + tuning.basket_width / 2,
            basket_y + tuning.basket_height / 2,
        )
    }
}

/// Direction the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// What the player is doing (drives the sprite animation)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerActivity {
    Idle,
    Walking,
    /// Briefly set after firing the lasso
    Eating,
}

/// Movement command directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    pub fn delta(self, speed: i32) -> IVec2 {
        match self {
            MoveDirection::Up => IVec2::new(0, -speed),
            MoveDirection::Down => IVec2::new(0, speed),
            MoveDirection::Left => IVec2::new(-speed, 0),
            MoveDirection::Right => IVec2::new(speed, 0),
        }
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Sprite centre
    pub pos: IVec2,
    pub facing: Facing,
    pub activity: PlayerActivity,
    /// Ticks left in a timed action (eating); 0 when none is running
    pub action_ticks: u32,
}

impl Player {
    pub fn new(pos: IVec2) -> Self {
        Self {
            pos,
            facing: Facing::Right,
            activity: PlayerActivity::Idle,
            action_ticks: 0,
        }
    }

    /// Where the lasso leaves the player (mouth), offset away from centre
    /// on the facing side
    pub fn mouth(&self, tuning: &Tuning) -> IVec2 {
        let forward = match self.facing {
            Facing::Right => tuning.mouth_forward_offset,
            Facing::Left => -tuning.mouth_forward_offset,
        };
        self.pos + IVec2::new(forward, tuning.mouth_vertical_offset)
    }

    /// Keep the whole sprite footprint inside the viewport.
    ///
    /// A viewport narrower than the sprite pins the player to the half-size
    /// offset instead of panicking.
    pub fn clamp_to(&mut self, viewport: Viewport, tuning: &Tuning) {
        let (half_w, half_h) = tuning.half_player();
        self.pos.x = half_w.max(self.pos.x.min(viewport.width - half_w));
        self.pos.y = half_h.max(self.pos.y.min(viewport.height - half_h));
    }

    /// Enter a timed activity; calling again while it runs restarts the timer
    pub fn begin_action(&mut self, activity: PlayerActivity, ticks: u32) {
        self.activity = activity;
        self.action_ticks = ticks;
    }

    /// Count down a timed action, reverting eating to idle when it expires
    pub fn tick_action(&mut self) {
        if self.action_ticks == 0 {
            return;
        }
        self.action_ticks -= 1;
        if self.action_ticks == 0 && self.activity == PlayerActivity::Eating {
            self.activity = PlayerActivity::Idle;
        }
    }
}

/// Which pool a food item was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodKind {
    Positive,
    Negative,
}

/// Food capture state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodState {
    /// Drifting across the screen
    Default,
    /// Being dragged by the lasso; position written by the lasso only
    CapturedByLasso,
    /// Flying from the player to the basket
    AnimatingToBasket,
}

/// A food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: u32,
    /// Asset key
    pub name: String,
    /// Signed score value
    pub value: i32,
    pub kind: FoodKind,
    pub pos: IVec2,
    /// Horizontal speed, positive = rightward
    pub speed: i32,
    pub state: FoodState,
}

impl Food {
    pub fn new(id: u32, name: impl Into<String>, value: i32, pos: IVec2, speed: i32) -> Self {
        Self {
            id,
            name: name.into(),
            value,
            kind: if value < 0 {
                FoodKind::Negative
            } else {
                FoodKind::Positive
            },
            pos,
            speed,
            state: FoodState::Default,
        }
    }

    /// Horizontal drift; suppressed unless the food is free
    pub fn move_step(&mut self) {
        if self.state == FoodState::Default {
            self.pos.x += self.speed;
        }
    }

    /// Position setter used by the lasso while it drags this item
    pub fn set_position(&mut self, pos: IVec2) {
        self.pos = pos;
    }

    /// Free food that drifted past either horizontal edge by more than `margin`
    pub fn is_offscreen(&self, viewport: Viewport, margin: i32) -> bool {
        self.state == FoodState::Default
            && (self.pos.x > viewport.width + margin || self.pos.x < -margin)
    }
}

/// RGB colour for effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GAIN: Rgb = Rgb { r: 34, g: 139, b: 34 };
    pub const LOSS: Rgb = Rgb { r: 255, g: 0, b: 0 };
}

/// Score popup shown above the basket after a delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingScore {
    pub text: String,
    pub color: Rgb,
    pub pos: Vec2,
    /// Ticks left to live
    pub lifespan: u32,
    pub max_lifespan: u32,
    rise: f32,
}

impl FloatingScore {
    pub fn new(value: i32, at: IVec2, tuning: &Tuning) -> Self {
        let (text, color) = if value > 0 {
            (format!("+{}", value), Rgb::GAIN)
        } else {
            (value.to_string(), Rgb::LOSS)
        };
        Self {
            text,
            color,
            pos: at.as_vec2(),
            lifespan: tuning.floating_score_lifespan,
            max_lifespan: tuning.floating_score_lifespan,
            rise: tuning.floating_score_rise,
        }
    }

    /// Drift upward and age by one tick
    pub fn update(&mut self) {
        if self.is_alive() {
            self.pos.y -= self.rise;
            self.lifespan -= 1;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.lifespan > 0
    }

    /// Remaining life in 0..=1, for alpha fading
    pub fn fade(&self) -> f32 {
        if self.max_lifespan == 0 {
            0.0
        } else {
            self.lifespan as f32 / self.max_lifespan as f32
        }
    }
}

/// Things that happened during a command or tick, for audio and UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    LassoFired,
    Footstep,
    FoodSpawned { id: u32 },
    FoodCaptured { id: u32 },
    FoodDelivered { id: u32, value: i32 },
}

/// Complete state of one play-through
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Viewport of the most recent tick
    pub viewport: Viewport,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    pub lasso: Lasso,
    /// Live food (spawn order)
    pub foods: Vec<Food>,
    pub floating_scores: Vec<FloatingScore>,
    pub score: i32,
    pub count: u32,
    /// Ticks until another footstep sound may play
    pub footstep_cooldown: u32,
    /// Events since the last drain (not part of snapshots)
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    /// Create a new game with the player centred in the viewport
    pub fn new(seed: u64, viewport: Viewport, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let player = Player::new(viewport.center());
        let mouth = player.mouth(&tuning);
        let lasso = Lasso::new(mouth, tuning.lasso_speed, tuning.capture_radius);
        Self {
            seed,
            tuning,
            viewport,
            phase: GamePhase::Playing,
            time_ticks: 0,
            player,
            lasso,
            foods: Vec::new(),
            floating_scores: Vec::new(),
            score: 0,
            count: 0,
            footstep_cooldown: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert a free food item and return its id
    pub fn add_food(&mut self, name: &str, value: i32, pos: IVec2, speed: i32) -> u32 {
        let id = self.next_entity_id();
        self.foods.push(Food::new(id, name, value, pos, speed));
        id
    }

    pub fn food(&self, id: u32) -> Option<&Food> {
        self.foods.iter().find(|f| f.id == id)
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_moves_only_when_free() {
        let mut food = Food::new(1, "sushi", 10, IVec2::new(100, 50), 3);
        food.move_step();
        assert_eq!(food.pos, IVec2::new(103, 50));

        food.state = FoodState::CapturedByLasso;
        food.move_step();
        assert_eq!(food.pos, IVec2::new(103, 50));

        food.state = FoodState::AnimatingToBasket;
        food.move_step();
        assert_eq!(food.pos, IVec2::new(103, 50));
    }

    #[test]
    fn test_food_kind_follows_value_sign() {
        assert_eq!(Food::new(1, "corn", -10, IVec2::ZERO, 1).kind, FoodKind::Negative);
        assert_eq!(Food::new(2, "steak", 20, IVec2::ZERO, 1).kind, FoodKind::Positive);
    }

    #[test]
    fn test_offscreen_only_for_free_food() {
        let vp = Viewport::new(800, 600);
        let mut food = Food::new(1, "steak", 20, IVec2::new(851, 100), 1);
        assert!(food.is_offscreen(vp, 50));
        food.pos.x = 850;
        assert!(!food.is_offscreen(vp, 50));
        food.pos.x = -51;
        assert!(food.is_offscreen(vp, 50));
        food.state = FoodState::CapturedByLasso;
        assert!(!food.is_offscreen(vp, 50));
    }

    #[test]
    fn test_mouth_follows_facing() {
        let tuning = Tuning::default();
        let mut player = Player::new(IVec2::new(400, 300));
        assert_eq!(player.mouth(&tuning), IVec2::new(430, 335));
        player.facing = Facing::Left;
        assert_eq!(player.mouth(&tuning), IVec2::new(370, 335));
    }

    #[test]
    fn test_eating_timer_reverts_to_idle() {
        let mut player = Player::new(IVec2::ZERO);
        player.begin_action(PlayerActivity::Eating, 2);
        player.tick_action();
        assert_eq!(player.activity, PlayerActivity::Eating);
        player.tick_action();
        assert_eq!(player.activity, PlayerActivity::Idle);
    }

    #[test]
    fn test_expired_timer_does_not_stop_walking() {
        let mut player = Player::new(IVec2::ZERO);
        player.begin_action(PlayerActivity::Eating, 1);
        player.activity = PlayerActivity::Walking;
        player.tick_action();
        assert_eq!(player.activity, PlayerActivity::Walking);
    }

    #[test]
    fn test_floating_score_rises_and_expires() {
        let tuning = Tuning::default();
        let mut fs = FloatingScore::new(20, IVec2::new(10, 100), &tuning);
        assert_eq!(fs.text, "+20");
        assert_eq!(fs.color, Rgb::GAIN);
        fs.update();
        assert_eq!(fs.pos.y, 99.5);
        for _ in 0..tuning.floating_score_lifespan {
            fs.update();
        }
        assert!(!fs.is_alive());
        assert_eq!(fs.fade(), 0.0);

        let loss = FloatingScore::new(-10, IVec2::ZERO, &tuning);
        assert_eq!(loss.text, "-10");
        assert_eq!(loss.color, Rgb::LOSS);
    }

    #[test]
    fn test_basket_anchor() {
        let tuning = Tuning::default();
        let anchor = Viewport::new(1280, 720).basket_anchor(&tuning);
        assert_eq!(anchor, IVec2::new(1280 - 130, 250 + 110));
    }
}
