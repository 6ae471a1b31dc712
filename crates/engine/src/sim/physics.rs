use crate::math::Vec2;

use super::entity::Entity;

/// Playable rectangle `[0, width] x [0, height]`, taken from the renderer viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Arena {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn from_viewport(width: u32, height: u32) -> Self {
        Self::new(width as f32, height as f32)
    }

    /// Clamps `position` into `[0, width - margin] x [0, height - margin]`.
    pub fn clamp_with_margin(&self, position: Vec2, margin: f32) -> Vec2 {
        let max_x = (self.width - margin).max(0.0);
        let max_y = (self.height - margin).max(0.0);
        Vec2::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
    }

    /// True once a circle touches or crosses any arena edge.
    pub fn circle_touches_edge(&self, center: Vec2, radius: f32) -> bool {
        center.x <= radius
            || center.x >= self.width - radius
            || center.y <= radius
            || center.y >= self.height - radius
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Integrates every active entity that owns a physics body.
///
/// Per step: `v += F/m * dt`, `p += v * dt`, `v *= friction`, `F = 0`.
/// Arena clamping is left to gameplay so each entity kind can pick its own margin.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsSystem {
    arena: Arena,
}

impl PhysicsSystem {
    pub fn new(arena: Arena) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn update(&self, dt: f32, entities: &mut [Entity]) {
        for entity in entities.iter_mut().filter(|entity| entity.is_active()) {
            let components = &mut entity.components;
            let Some(physics) = components.physics.as_mut() else {
                continue;
            };
            let position = components
                .transform
                .as_mut()
                .map(|transform| &mut transform.position);
            physics.integrate(position, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EntityKind, Physics, Transform};

    fn body(friction: f32) -> Entity {
        Entity::new("Body", EntityKind::Visual)
            .with_transform(Transform::at(Vec2::ZERO))
            .with_physics(Physics::new(1.0).with_friction(friction))
    }

    #[test]
    fn single_impulse_without_friction_keeps_constant_velocity() {
        let system = PhysicsSystem::new(Arena::default());
        let mut entities = vec![body(1.0)];
        entities[0]
            .physics_mut()
            .expect("physics")
            .apply_force(Vec2::new(10.0, 0.0));

        system.update(1.0, &mut entities);
        assert_eq!(entities[0].physics().map(Physics::velocity), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(entities[0].position(), Some(Vec2::new(10.0, 0.0)));

        system.update(1.0, &mut entities);
        system.update(1.0, &mut entities);
        assert_eq!(entities[0].physics().map(Physics::velocity), Some(Vec2::new(10.0, 0.0)));
        assert_eq!(entities[0].position(), Some(Vec2::new(30.0, 0.0)));
    }

    #[test]
    fn friction_decays_velocity_monotonically_without_reversing() {
        let system = PhysicsSystem::new(Arena::default());
        let mut entities = vec![body(0.9)];
        entities[0]
            .physics_mut()
            .expect("physics")
            .set_velocity(Vec2::new(50.0, -20.0));

        let mut previous = 50.0f32.hypot(20.0);
        for _ in 0..200 {
            system.update(0.016, &mut entities);
            let velocity = entities[0].physics().map(Physics::velocity).expect("velocity");
            let magnitude = velocity.magnitude();
            assert!(magnitude < previous);
            assert!(velocity.x >= 0.0);
            assert!(velocity.y <= 0.0);
            previous = magnitude;
        }
        assert!(previous < 0.01);
    }

    #[test]
    fn inactive_entities_are_not_integrated() {
        let system = PhysicsSystem::new(Arena::default());
        let mut entities = vec![body(1.0)];
        entities[0]
            .physics_mut()
            .expect("physics")
            .set_velocity(Vec2::new(1.0, 1.0));
        entities[0].set_active(false);

        system.update(1.0, &mut entities);
        assert_eq!(entities[0].position(), Some(Vec2::ZERO));
    }

    #[test]
    fn clamp_with_margin_keeps_player_inside() {
        let arena = Arena::new(800.0, 600.0);
        assert_eq!(
            arena.clamp_with_margin(Vec2::new(-5.0, 900.0), 20.0),
            Vec2::new(0.0, 580.0)
        );
    }
}
