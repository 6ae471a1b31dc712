use crate::app::RenderBackend;
use crate::math::{Color, Vec2};

use super::components::{Components, Physics, Renderable, ShapeKind, Transform};
use super::physics::Arena;

/// Below this distance an enemy stops chasing and decelerates instead.
pub const ENEMY_ARRIVAL_EPSILON: f32 = 1.0;
pub const ENEMY_SLOWDOWN_FACTOR: f32 = 0.8;
pub const CIRCLE_SEGMENTS: u32 = 16;

const PLAYER_BODY_COLOR: Color = Color::rgb(1.0, 0.0, 0.0);
const PLAYER_HEAD_COLOR: Color = Color::rgb(1.0, 0.5, 0.0);
const PLAYER_LEFT_ARM_COLOR: Color = Color::rgb(1.0, 0.8, 0.0);
const PLAYER_RIGHT_ARM_COLOR: Color = Color::rgb(0.0, 1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitMode {
    /// Overwrite velocity with the desired chase velocity every frame.
    Velocity,
    /// Steer with `(desired - current) * gain` as a one-frame force.
    Force { gain: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pursuit {
    pub chase_speed: f32,
    pub mode: PursuitMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Player { cached_position: Option<Vec2> },
    Enemy(Pursuit),
    Fireball { radius: f32 },
    Decoration,
    /// Passive shape with no behavior; used for AI and replay visuals.
    Visual,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateContext {
    pub player_position: Option<Vec2>,
    pub arena: Arena,
}

#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    active: bool,
    kind: EntityKind,
    pub components: Components,
}

impl Entity {
    pub fn new(name: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: EntityId(0),
            name: name.into(),
            active: true,
            kind,
            components: Components::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.components.transform = Some(transform);
        self
    }

    pub fn with_physics(mut self, physics: Physics) -> Self {
        self.components.physics = Some(physics);
        self
    }

    pub fn with_renderable(mut self, renderable: Renderable) -> Self {
        self.components.renderable = Some(renderable);
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: EntityId) {
        self.id = id;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player { .. })
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy(_))
    }

    pub fn is_fireball(&self) -> bool {
        matches!(self.kind, EntityKind::Fireball { .. })
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.components.transform.as_ref()
    }

    pub fn physics(&self) -> Option<&Physics> {
        self.components.physics.as_ref()
    }

    pub fn physics_mut(&mut self) -> Option<&mut Physics> {
        self.components.physics.as_mut()
    }

    pub fn renderable(&self) -> Option<&Renderable> {
        self.components.renderable.as_ref()
    }

    pub fn position(&self) -> Option<Vec2> {
        self.components.transform.map(|transform| transform.position)
    }

    /// Moves the entity, adding a transform when it has none.
    pub fn set_position(&mut self, position: Vec2) {
        match self.components.transform.as_mut() {
            Some(transform) => transform.position = position,
            None => self.components.transform = Some(Transform::at(position)),
        }
    }

    pub fn update(&mut self, _dt: f32, ctx: &UpdateContext) {
        let position = self.position();
        if let EntityKind::Enemy(pursuit) = self.kind {
            self.pursue(pursuit, ctx.player_position);
            return;
        }
        match &mut self.kind {
            EntityKind::Player { cached_position } => {
                if position.is_some() {
                    *cached_position = position;
                }
            }
            EntityKind::Fireball { radius } => {
                if let Some(position) = position {
                    if ctx.arena.circle_touches_edge(position, *radius) {
                        self.active = false;
                    }
                }
            }
            EntityKind::Enemy(_) | EntityKind::Decoration | EntityKind::Visual => {}
        }
    }

    pub fn render(&self, renderer: &mut dyn RenderBackend) {
        match &self.kind {
            EntityKind::Player { cached_position } => {
                if let Some(base) = cached_position.or_else(|| self.position()) {
                    draw_player_figure(renderer, base);
                }
            }
            _ => self.render_shape(renderer),
        }
    }

    fn render_shape(&self, renderer: &mut dyn RenderBackend) {
        let (Some(position), Some(renderable)) = (self.position(), self.renderable()) else {
            return;
        };
        match renderable.shape {
            ShapeKind::Rectangle => renderer.draw_rect(
                position.x,
                position.y,
                renderable.size.x,
                renderable.size.y,
                renderable.color,
            ),
            ShapeKind::Circle => renderer.draw_circle(
                position.x,
                position.y,
                renderable.size.x,
                CIRCLE_SEGMENTS,
                renderable.color,
            ),
        }
    }

    fn pursue(&mut self, pursuit: Pursuit, target: Option<Vec2>) {
        let Some(own_position) = self.position() else {
            self.slow_down();
            return;
        };
        let Some(target) = target else {
            self.slow_down();
            return;
        };

        let direction = target - own_position;
        if direction.magnitude() < ENEMY_ARRIVAL_EPSILON {
            self.slow_down();
            return;
        }

        let desired_velocity = direction.normalize() * pursuit.chase_speed;
        if let Some(physics) = self.components.physics.as_mut() {
            match pursuit.mode {
                PursuitMode::Velocity => physics.set_velocity(desired_velocity),
                PursuitMode::Force { gain } => {
                    physics.apply_force((desired_velocity - physics.velocity()) * gain)
                }
            }
        }
    }

    fn slow_down(&mut self) {
        if let Some(physics) = self.components.physics.as_mut() {
            physics.set_velocity(physics.velocity() * ENEMY_SLOWDOWN_FACTOR);
        }
    }
}

fn draw_player_figure(renderer: &mut dyn RenderBackend, base: Vec2) {
    renderer.draw_rect(base.x - 8.0, base.y - 10.0, 16.0, 20.0, PLAYER_BODY_COLOR);
    renderer.draw_rect(base.x - 6.0, base.y - 22.0, 12.0, 12.0, PLAYER_HEAD_COLOR);
    renderer.draw_rect(base.x - 13.0, base.y - 5.0, 6.0, 12.0, PLAYER_LEFT_ARM_COLOR);
    renderer.draw_rect(base.x + 7.0, base.y - 5.0, 6.0, 12.0, PLAYER_RIGHT_ARM_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{DrawCommand, HeadlessBackend};

    fn arena() -> Arena {
        Arena::new(800.0, 600.0)
    }

    fn enemy_at(position: Vec2, mode: PursuitMode) -> Entity {
        Entity::new(
            "Enemy",
            EntityKind::Enemy(Pursuit {
                chase_speed: 50.0,
                mode,
            }),
        )
        .with_transform(Transform::at(position))
        .with_physics(Physics::new(0.5).with_velocity(Vec2::new(10.0, 0.0)))
    }

    #[test]
    fn velocity_pursuit_points_at_player() {
        let mut enemy = enemy_at(Vec2::new(0.0, 0.0), PursuitMode::Velocity);
        let ctx = UpdateContext {
            player_position: Some(Vec2::new(0.0, 100.0)),
            arena: arena(),
        };
        enemy.update(0.016, &ctx);
        assert_eq!(
            enemy.physics().map(Physics::velocity),
            Some(Vec2::new(0.0, 50.0))
        );
    }

    #[test]
    fn force_pursuit_applies_steering_force() {
        let mut enemy = enemy_at(Vec2::new(0.0, 0.0), PursuitMode::Force { gain: 2.0 });
        let ctx = UpdateContext {
            player_position: Some(Vec2::new(100.0, 0.0)),
            arena: arena(),
        };
        enemy.update(0.016, &ctx);
        let physics = enemy.physics().expect("physics");
        assert_eq!(physics.accumulated_force(), Vec2::new(80.0, 0.0));
        assert_eq!(physics.velocity(), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn enemy_decelerates_without_player_or_at_target() {
        let mut enemy = enemy_at(Vec2::new(5.0, 5.0), PursuitMode::Velocity);
        let lost = UpdateContext {
            player_position: None,
            arena: arena(),
        };
        enemy.update(0.016, &lost);
        assert_eq!(
            enemy.physics().map(Physics::velocity),
            Some(Vec2::new(8.0, 0.0))
        );

        let arrived = UpdateContext {
            player_position: Some(Vec2::new(5.5, 5.0)),
            arena: arena(),
        };
        enemy.update(0.016, &arrived);
        let velocity = enemy.physics().map(Physics::velocity).expect("velocity");
        assert!((velocity.x - 6.4).abs() < 0.0001);
    }

    #[test]
    fn fireball_deactivates_when_leaving_arena() {
        let ctx = UpdateContext {
            player_position: None,
            arena: arena(),
        };
        let mut inside = Entity::new("Fireball", EntityKind::Fireball { radius: 6.0 })
            .with_transform(Transform::at(Vec2::new(400.0, 300.0)));
        inside.update(0.016, &ctx);
        assert!(inside.is_active());

        let mut edge = Entity::new("Fireball", EntityKind::Fireball { radius: 6.0 })
            .with_transform(Transform::at(Vec2::new(794.0, 300.0)));
        edge.update(0.016, &ctx);
        assert!(!edge.is_active());
    }

    #[test]
    fn player_renders_figure_from_cached_position() {
        let mut player = Entity::new(
            "Player",
            EntityKind::Player {
                cached_position: None,
            },
        )
        .with_transform(Transform::at(Vec2::new(100.0, 100.0)));
        let ctx = UpdateContext {
            player_position: None,
            arena: arena(),
        };
        player.update(0.016, &ctx);
        player.set_position(Vec2::new(200.0, 200.0));

        let mut backend = HeadlessBackend::new(800, 600);
        player.render(&mut backend);
        let rects = backend.commands();
        assert_eq!(rects.len(), 4);
        assert!(matches!(
            rects[0],
            DrawCommand::Rect { x, y, .. } if x == 92.0 && y == 90.0
        ));
    }

    #[test]
    fn circle_shape_renders_centered() {
        let decoration = Entity::new("Decoration", EntityKind::Decoration)
            .with_transform(Transform::at(Vec2::new(10.0, 20.0)))
            .with_renderable(Renderable::circle(5.0, Color::WHITE));
        let mut backend = HeadlessBackend::new(800, 600);
        decoration.render(&mut backend);
        assert!(matches!(
            backend.commands()[0],
            DrawCommand::Circle { x, y, radius, .. } if x == 10.0 && y == 20.0 && radius == 5.0
        ));
    }
}
