//! Axis-aligned bounds for the arena's shapes.
//!
//! Overlap is strict: rectangles that only share an edge do not collide.
//! Scoring and health depend on this, so keep the comparisons open.

use crate::math::Vec2;

use super::components::Renderable;
use super::entity::{Entity, EntityKind};

pub const PLAYER_HALF_WIDTH: f32 = 13.0;
pub const PLAYER_TOP_OFFSET: f32 = 22.0;
pub const PLAYER_BOTTOM_OFFSET: f32 = 10.0;
pub const DEFAULT_SHAPE_SIZE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Builds a rectangle, swapping edges so that `left <= right` and `top <= bottom`.
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Player silhouette around its anchor; the sprite reaches further up than down.
pub fn player_bounds(center: Vec2) -> Rect {
    Rect::new(
        center.x - PLAYER_HALF_WIDTH,
        center.y - PLAYER_TOP_OFFSET,
        center.x + PLAYER_HALF_WIDTH,
        center.y + PLAYER_BOTTOM_OFFSET,
    )
}

pub fn shape_bounds(position: Vec2, renderable: Option<&Renderable>) -> Rect {
    let size = renderable
        .map(|renderable| renderable.size)
        .unwrap_or(Vec2::new(DEFAULT_SHAPE_SIZE, DEFAULT_SHAPE_SIZE));
    Rect::new(
        position.x,
        position.y,
        position.x + size.x,
        position.y + size.y,
    )
}

pub fn circle_bounds(center: Vec2, radius: f32) -> Rect {
    Rect::new(
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
    )
}

pub fn entity_bounds(entity: &Entity) -> Option<Rect> {
    let position = entity.position()?;
    Some(match entity.kind() {
        EntityKind::Player { .. } => player_bounds(position),
        EntityKind::Fireball { radius } => circle_bounds(position, *radius),
        _ => shape_bounds(position, entity.renderable()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Color;

    #[test]
    fn shared_edge_is_not_a_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(!b.intersects(&a));

        let below = Rect::new(0.0, 10.0, 10.0, 20.0);
        assert!(!a.intersects(&below));
    }

    #[test]
    fn any_positive_overlap_collides() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(9.999, 0.0, 20.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn constructor_normalizes_edges() {
        let rect = Rect::new(10.0, 8.0, 2.0, -4.0);
        assert_eq!(rect, Rect::new(2.0, -4.0, 10.0, 8.0));
        assert_eq!(rect.width(), 8.0);
        assert_eq!(rect.height(), 12.0);
    }

    #[test]
    fn player_bounds_are_asymmetric() {
        let rect = player_bounds(Vec2::new(100.0, 100.0));
        assert_eq!(rect, Rect::new(87.0, 78.0, 113.0, 110.0));
    }

    #[test]
    fn shape_bounds_use_renderable_size_or_default() {
        let renderable = Renderable::rectangle(Vec2::new(30.0, 5.0), Color::WHITE);
        assert_eq!(
            shape_bounds(Vec2::new(1.0, 2.0), Some(&renderable)),
            Rect::new(1.0, 2.0, 31.0, 7.0)
        );
        assert_eq!(
            shape_bounds(Vec2::new(1.0, 2.0), None),
            Rect::new(1.0, 2.0, 21.0, 22.0)
        );
    }

    #[test]
    fn circle_bounds_extend_radius_on_both_axes() {
        assert_eq!(
            circle_bounds(Vec2::new(50.0, 60.0), 6.0),
            Rect::new(44.0, 54.0, 56.0, 66.0)
        );
    }
}
