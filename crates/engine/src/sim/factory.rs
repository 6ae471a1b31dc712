//! Constructors for the fixed set of arena entity kinds.
//!
//! Live constructors carry physics; `*_visual` variants are the passive
//! look-alikes that replay reconstructs.

use crate::math::{Color, Vec2};

use super::components::{Physics, Renderable, Transform};
use super::entity::{Entity, EntityKind, Pursuit};

pub const PLAYER_NAME: &str = "Player";
pub const AI_PLAYER_NAME: &str = "AIPlayer";
pub const ENEMY_NAME: &str = "Enemy";
pub const FIREBALL_NAME: &str = "Fireball";
pub const DECORATION_NAME: &str = "Decoration";

pub const PLAYER_MASS: f32 = 1.0;
pub const ENEMY_SIZE: f32 = 20.0;
pub const ENEMY_MASS: f32 = 0.5;
pub const ENEMY_FRICTION: f32 = 0.92;
pub const ENEMY_COLOR: Color = Color::rgb(1.0, 0.5, 0.0);
pub const FIREBALL_MASS: f32 = 1.0;
pub const FIREBALL_COLOR: Color = Color::rgb(1.0, 0.4, 0.0);
pub const DEFAULT_FIREBALL_RADIUS: f32 = 6.0;
pub const DECORATION_RADIUS: f32 = 5.0;
pub const DECORATION_COLOR: Color = Color::new(0.5, 0.5, 1.0, 0.8);

pub fn player(position: Vec2, friction: f32) -> Entity {
    player_visual()
        .with_transform(Transform::at(position))
        .with_physics(Physics::new(PLAYER_MASS).with_friction(friction))
}

pub fn enemy(position: Vec2, pursuit: Pursuit) -> Entity {
    Entity::new(ENEMY_NAME, EntityKind::Enemy(pursuit))
        .with_transform(Transform::at(position))
        .with_renderable(enemy_renderable())
        .with_physics(Physics::new(ENEMY_MASS).with_friction(ENEMY_FRICTION))
}

/// Frictionless projectile moving at `velocity`.
pub fn fireball(position: Vec2, velocity: Vec2, radius: f32) -> Entity {
    Entity::new(FIREBALL_NAME, EntityKind::Fireball { radius })
        .with_transform(Transform::at(position))
        .with_renderable(Renderable::circle(radius, FIREBALL_COLOR))
        .with_physics(
            Physics::new(FIREBALL_MASS)
                .with_friction(1.0)
                .with_velocity(velocity),
        )
}

pub fn decoration(position: Vec2) -> Entity {
    decoration_visual().with_transform(Transform::at(position))
}

pub fn player_visual() -> Entity {
    Entity::new(
        PLAYER_NAME,
        EntityKind::Player {
            cached_position: None,
        },
    )
}

pub fn enemy_visual() -> Entity {
    Entity::new(ENEMY_NAME, EntityKind::Visual).with_renderable(enemy_renderable())
}

pub fn fireball_visual(radius: f32) -> Entity {
    Entity::new(FIREBALL_NAME, EntityKind::Visual)
        .with_renderable(Renderable::circle(radius, FIREBALL_COLOR))
}

pub fn decoration_visual() -> Entity {
    Entity::new(DECORATION_NAME, EntityKind::Decoration)
        .with_renderable(Renderable::circle(DECORATION_RADIUS, DECORATION_COLOR))
}

pub fn ai_visual(size: Vec2, color: Color) -> Entity {
    Entity::new(AI_PLAYER_NAME, EntityKind::Visual)
        .with_renderable(Renderable::rectangle(size, color))
}

fn enemy_renderable() -> Renderable {
    Renderable::rectangle(Vec2::new(ENEMY_SIZE, ENEMY_SIZE), ENEMY_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PursuitMode;

    #[test]
    fn live_kinds_carry_expected_components() {
        let pursuit = Pursuit {
            chase_speed: 60.0,
            mode: PursuitMode::Velocity,
        };
        let enemy = enemy(Vec2::ZERO, pursuit);
        assert!(enemy.components.transform.is_some());
        assert!(enemy.components.physics.is_some());
        assert!(enemy.components.renderable.is_some());
        assert_eq!(enemy.physics().map(|p| p.friction()), Some(ENEMY_FRICTION));

        let player = player(Vec2::new(400.0, 300.0), 0.95);
        assert!(player.is_player());
        assert!(player.renderable().is_none());

        let fireball = fireball(Vec2::ZERO, Vec2::new(350.0, 0.0), 6.0);
        assert_eq!(fireball.physics().map(|p| p.friction()), Some(1.0));
        assert_eq!(
            fireball.physics().map(|p| p.velocity()),
            Some(Vec2::new(350.0, 0.0))
        );
    }

    #[test]
    fn visuals_have_no_physics() {
        for visual in [
            player_visual(),
            enemy_visual(),
            fireball_visual(6.0),
            decoration_visual(),
            ai_visual(Vec2::new(20.0, 20.0), Color::WHITE),
        ] {
            assert!(visual.physics().is_none(), "{} has physics", visual.name());
        }
    }
}
