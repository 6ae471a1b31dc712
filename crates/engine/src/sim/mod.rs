mod collision;
mod components;
mod entity;
pub mod factory;
mod physics;
mod world;

pub use collision::{
    circle_bounds, entity_bounds, player_bounds, shape_bounds, Rect, DEFAULT_SHAPE_SIZE,
    PLAYER_BOTTOM_OFFSET, PLAYER_HALF_WIDTH, PLAYER_TOP_OFFSET,
};
pub use components::{Components, Physics, Renderable, ShapeKind, Transform};
pub use entity::{
    Entity, EntityId, EntityKind, Pursuit, PursuitMode, UpdateContext, CIRCLE_SEGMENTS,
    ENEMY_ARRIVAL_EPSILON, ENEMY_SLOWDOWN_FACTOR,
};
pub use physics::{Arena, PhysicsSystem};
pub use world::{EntityIdAllocator, SceneWorld};
