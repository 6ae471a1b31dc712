use std::collections::{HashMap, HashSet};

use crate::math::Vec2;
use crate::sim::factory::{
    ai_visual, decoration_visual, enemy_visual, fireball_visual, player_visual, AI_PLAYER_NAME,
    DECORATION_NAME, DEFAULT_FIREBALL_RADIUS, ENEMY_NAME, FIREBALL_NAME, PLAYER_NAME,
};
use crate::sim::{Entity, EntityId, EntityKind, Renderable, SceneWorld, ShapeKind};

use super::keyframe::{EntityInfo, Keyframe};
use super::ReplayError;

const AI_PLAYER_DEFAULT_SIZE: f32 = 20.0;
const FALLBACK_SIZE: f32 = 10.0;
const MIN_SIZE: f32 = 1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub spawned: usize,
    pub updated: usize,
    pub evicted: usize,
}

/// Live replay entities keyed by recorded uid.
#[derive(Debug, Default)]
pub struct Reconstruction {
    live: HashMap<i64, EntityId>,
}

impl Reconstruction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn entity_for(&self, uid: i64) -> Option<EntityId> {
        self.live.get(&uid).copied()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }

    /// Places every entity of `a` at its blend towards `b`, building visuals
    /// on first sight, then deactivates and forgets uids that `a` no longer has.
    pub fn reconcile(
        &mut self,
        a: &Keyframe,
        b: &Keyframe,
        u: f32,
        world: &mut SceneWorld,
    ) -> Result<ReconcileStats, ReplayError> {
        let mut stats = ReconcileStats::default();
        let targets: HashMap<i64, Vec2> = b
            .entities
            .iter()
            .map(|info| (info.uid, info.position))
            .collect();
        let mut present = HashSet::with_capacity(a.entities.len());

        for info in &a.entities {
            present.insert(info.uid);
            let id = match self.live.get(&info.uid) {
                Some(id) => *id,
                None => {
                    let id = world.spawn(build_visual(info));
                    self.live.insert(info.uid, id);
                    stats.spawned += 1;
                    id
                }
            };
            let position = match targets.get(&info.uid) {
                Some(target) => info.position.lerp(*target, u),
                None => info.position,
            };
            let entity = world
                .find_entity_mut(id)
                .ok_or(ReplayError::MissingEntity { uid: info.uid })?;
            entity.set_position(position);
            entity.set_active(true);
            stats.updated += 1;
        }

        self.live.retain(|uid, id| {
            if present.contains(uid) {
                return true;
            }
            if let Some(entity) = world.find_entity_mut(*id) {
                entity.set_active(false);
            }
            stats.evicted += 1;
            false
        });
        Ok(stats)
    }
}

/// Passive entity that draws like the recorded one.
pub fn build_visual(info: &EntityInfo) -> Entity {
    let id = info.id.as_deref().unwrap_or_default();
    let mut entity = if id.eq_ignore_ascii_case(PLAYER_NAME) {
        player_visual()
    } else if id.eq_ignore_ascii_case(AI_PLAYER_NAME) {
        let size = Vec2::new(
            positive_or(info.size.x, AI_PLAYER_DEFAULT_SIZE),
            positive_or(info.size.y, AI_PLAYER_DEFAULT_SIZE),
        );
        ai_visual(size, info.color)
    } else if id.eq_ignore_ascii_case(ENEMY_NAME) {
        enemy_visual()
    } else if id.eq_ignore_ascii_case(FIREBALL_NAME) {
        fireball_visual(positive_or(info.size.x, DEFAULT_FIREBALL_RADIUS))
    } else if id.eq_ignore_ascii_case(DECORATION_NAME) {
        decoration_visual()
    } else {
        generic_visual(info)
    };
    entity.set_position(info.position);
    entity
}

fn generic_visual(info: &EntityInfo) -> Entity {
    let name = match &info.id {
        Some(id) => id.clone(),
        None => format!("Obj#{}", info.uid),
    };
    if info.render_kind.as_deref().and_then(ShapeKind::parse) == Some(ShapeKind::Circle) {
        let size = Vec2::new(info.size.x.max(MIN_SIZE), info.size.y.max(MIN_SIZE));
        let mut renderable = Renderable::circle(size.x, info.color);
        renderable.size = size;
        return Entity::new(name, EntityKind::Visual).with_renderable(renderable);
    }
    let size = Vec2::new(
        positive_or(info.size.x, FALLBACK_SIZE).max(MIN_SIZE),
        positive_or(info.size.y, FALLBACK_SIZE).max(MIN_SIZE),
    );
    let mut entity = ai_visual(size, info.color);
    entity.set_name(name);
    entity
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value > 0.0 {
        value
    } else {
        fallback
    }
}
