use std::f32::consts::TAU;
use std::time::{SystemTime, UNIX_EPOCH};

use engine::sim::factory;
use engine::sim::{
    entity_bounds, player_bounds, Arena, EntityId, Pursuit, PursuitMode, Rect,
    PLAYER_TOP_OFFSET,
};
use engine::{
    Color, InputState, Key, MouseButton, RecordingPolicy, RenderBackend, Scene, SceneCommand,
    SceneKey, SceneWorld, Vec2,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::tuning::{GameTuning, PursuitTuning};

const BACKGROUND_COLOR: Color = Color::rgb(0.1, 0.1, 0.2);
const HUD_TEXT_COLOR: Color = Color::WHITE;
const OVERLAY_COLOR: Color = Color::new(0.0, 0.0, 0.0, 0.7);
const GAME_OVER_COLOR: Color = Color::rgb(1.0, 0.2, 0.2);
const PROMPT_COLOR: Color = Color::rgb(0.8, 0.8, 0.8);
const HEALTH_BAR_BACK_COLOR: Color = Color::new(0.2, 0.0, 0.0, 0.7);
const HEALTH_BAR_FILL_COLOR: Color = Color::new(0.0, 0.9, 0.1, 0.9);
const HEALTH_BAR_WIDTH: f32 = 50.0;
const HEALTH_BAR_HEIGHT: f32 = 6.0;
const HEALTH_BAR_GAP: f32 = 8.0;
const SCORE_POSITION: Vec2 = Vec2::new(20.0, 30.0);
const TIMER_RIGHT_INSET: f32 = 200.0;
/// Shots aimed closer than this to the shooter are dropped.
const MIN_AIM_DISTANCE: f32 = 0.01;

const EXPLOSION_SPEED_MIN: f32 = 100.0;
const EXPLOSION_SPEED_MAX: f32 = 300.0;
const EXPLOSION_LIFE_MIN: f32 = 0.2;
const EXPLOSION_LIFE_MAX: f32 = 0.5;
const EXPLOSION_SIZE_MIN: f32 = 5.0;
const EXPLOSION_SIZE_MAX: f32 = 15.0;
const EXPLOSION_GREEN_MIN: f32 = 0.4;
const EXPLOSION_GREEN_MAX: f32 = 0.6;

include!("types.rs");
include!("systems.rs");
include!("scene_state.rs");
include!("scene_impl.rs");

pub(crate) fn build_game_scene(tuning: GameTuning) -> Box<dyn Scene> {
    Box::new(GameScene::new(tuning))
}
