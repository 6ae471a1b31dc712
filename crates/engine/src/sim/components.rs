use crate::math::{Color, Vec2};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub position: Vec2,
}

impl Transform {
    pub fn at(position: Vec2) -> Self {
        Self { position }
    }
}

/// Point-mass body integrated by [`super::PhysicsSystem`].
///
/// `friction` is a per-frame multiplicative damping factor: the velocity is
/// scaled by it once per integration step, so `1.0` means no damping at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Physics {
    velocity: Vec2,
    accumulated_force: Vec2,
    mass: f32,
    friction: f32,
}

impl Physics {
    pub fn new(mass: f32) -> Self {
        debug_assert!(mass > 0.0, "physics mass must be positive, got {mass}");
        Self {
            velocity: Vec2::ZERO,
            accumulated_force: Vec2::ZERO,
            mass: if mass > 0.0 { mass } else { 1.0 },
            friction: 1.0,
        }
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.set_friction(friction);
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn accumulated_force(&self) -> Vec2 {
        self.accumulated_force
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn friction(&self) -> f32 {
        self.friction
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    /// Adds an impulse consumed by the next integration step.
    pub fn apply_force(&mut self, force: Vec2) {
        self.accumulated_force += force;
    }

    pub fn set_friction(&mut self, friction: f32) {
        debug_assert!(
            (0.0..=1.0).contains(&friction),
            "friction must be within [0, 1], got {friction}"
        );
        self.friction = friction.clamp(0.0, 1.0);
    }

    pub(crate) fn integrate(&mut self, position: Option<&mut Vec2>, dt: f32) {
        self.velocity += self.accumulated_force / self.mass * dt;
        if let Some(position) = position {
            *position += self.velocity * dt;
        }
        self.velocity *= self.friction;
        self.accumulated_force = Vec2::ZERO;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Circle,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "RECTANGLE",
            ShapeKind::Circle => "CIRCLE",
        }
    }

    /// Inverse of [`ShapeKind::as_str`]; the tag must match exactly.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "RECTANGLE" => Some(ShapeKind::Rectangle),
            "CIRCLE" => Some(ShapeKind::Circle),
            _ => None,
        }
    }
}

/// Visual description. Rectangles are anchored at their top-left corner;
/// circles are centered and use `size.x` as the radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderable {
    pub shape: ShapeKind,
    pub size: Vec2,
    pub color: Color,
}

impl Renderable {
    pub fn rectangle(size: Vec2, color: Color) -> Self {
        Self {
            shape: ShapeKind::Rectangle,
            size,
            color,
        }
    }

    pub fn circle(radius: f32, color: Color) -> Self {
        Self {
            shape: ShapeKind::Circle,
            size: Vec2::new(radius, radius),
            color,
        }
    }
}

/// One optional slot per component kind; the kind is the unique key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Components {
    pub transform: Option<Transform>,
    pub physics: Option<Physics>,
    pub renderable: Option<Renderable>,
}
