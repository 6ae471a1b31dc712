use crate::app::RenderBackend;
use crate::math::Vec2;

use super::entity::{Entity, EntityId, UpdateContext};
use super::physics::{Arena, PhysicsSystem};

#[derive(Debug, Default)]
pub struct EntityIdAllocator {
    next: u64,
}

impl EntityIdAllocator {
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Entity container of one scene.
///
/// Entities keep insertion order for the whole frame. Inactive entities are
/// skipped by both passes but stay addressable until a gameplay sweep
/// (`retain` / `remove_inactive`) or `clear` removes them.
#[derive(Debug, Default)]
pub struct SceneWorld {
    name: String,
    allocator: EntityIdAllocator,
    entities: Vec<Entity>,
    initialized: bool,
    arena: Arena,
    physics: Option<PhysicsSystem>,
}

impl SceneWorld {
    pub fn new(name: impl Into<String>, arena: Arena) -> Self {
        Self {
            name: name.into(),
            arena,
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arena(&self) -> Arena {
        self.arena
    }

    pub fn set_arena(&mut self, arena: Arena) {
        self.arena = arena;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub(crate) fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    pub fn bind_physics(&mut self, physics: PhysicsSystem) {
        self.physics = Some(physics);
    }

    pub fn unbind_physics(&mut self) -> Option<PhysicsSystem> {
        self.physics.take()
    }

    pub fn physics(&self) -> Option<&PhysicsSystem> {
        self.physics.as_ref()
    }

    /// Appends an entity and assigns it a session-unique id.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = self.allocator.allocate();
        entity.assign_id(id);
        self.entities.push(entity);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|entity| entity.id() == id)?;
        Some(self.entities.remove(index))
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn active_count(&self) -> usize {
        self.entities.iter().filter(|entity| entity.is_active()).count()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn find_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.id() == id)
    }

    pub fn find_entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|entity| entity.id() == id)
    }

    /// All active entities carrying `name`, in insertion order.
    pub fn find_by_name(&self, name: &str) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| entity.is_active() && entity.name() == name)
            .collect()
    }

    pub fn player_position(&self) -> Option<Vec2> {
        self.entities
            .iter()
            .find(|entity| entity.is_active() && entity.is_player())
            .and_then(Entity::position)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&Entity) -> bool) -> usize {
        let before = self.entities.len();
        self.entities.retain(|entity| keep(entity));
        before - self.entities.len()
    }

    pub fn remove_inactive(&mut self) -> usize {
        self.retain(Entity::is_active)
    }

    /// Destroys every entity and releases the physics binding.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.physics = None;
        self.initialized = false;
    }

    /// Entity pass followed by the bound physics pass.
    pub fn update(&mut self, dt: f32) {
        self.update_entities(dt);
        self.step_physics(dt);
    }

    pub fn update_entities(&mut self, dt: f32) {
        let ctx = UpdateContext {
            player_position: self.player_position(),
            arena: self.arena,
        };
        for entity in self.entities.iter_mut().filter(|entity| entity.is_active()) {
            entity.update(dt, &ctx);
        }
    }

    pub fn step_physics(&mut self, dt: f32) {
        if let Some(physics) = self.physics {
            physics.update(dt, &mut self.entities);
        }
    }

    pub fn render(&self, renderer: &mut dyn RenderBackend) {
        for entity in self.entities.iter().filter(|entity| entity.is_active()) {
            entity.render(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::HeadlessBackend;
    use crate::math::Color;
    use crate::sim::{factory, EntityKind, Physics, Renderable, Transform};

    fn world() -> SceneWorld {
        SceneWorld::new("Test", Arena::new(800.0, 600.0))
    }

    fn marker(name: &str, x: f32) -> Entity {
        Entity::new(name, EntityKind::Visual)
            .with_transform(Transform::at(Vec2::new(x, 0.0)))
            .with_renderable(Renderable::rectangle(Vec2::new(1.0, 1.0), Color::WHITE))
    }

    #[test]
    fn spawn_assigns_increasing_ids_in_insertion_order() {
        let mut world = world();
        let a = world.spawn(marker("A", 0.0));
        let b = world.spawn(marker("B", 1.0));
        assert!(a < b);
        let names: Vec<&str> = world.entities().iter().map(Entity::name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn find_by_name_returns_only_active_matches() {
        let mut world = world();
        world.spawn(marker("Enemy", 0.0));
        let hidden = world.spawn(marker("Enemy", 1.0));
        world.spawn(marker("Decoration", 2.0));
        world.find_entity_mut(hidden).expect("hidden").set_active(false);

        assert_eq!(world.find_by_name("Enemy").len(), 1);
        assert!(world.find_entity(hidden).is_some());
    }

    #[test]
    fn sweep_removes_inactive_only_when_asked() {
        let mut world = world();
        let id = world.spawn(marker("A", 0.0));
        world.spawn(marker("B", 0.0));
        world.find_entity_mut(id).expect("a").set_active(false);
        world.update(0.016);
        assert_eq!(world.entity_count(), 2);

        assert_eq!(world.remove_inactive(), 1);
        assert_eq!(world.entity_count(), 1);
        assert!(world.remove(id).is_none());
    }

    #[test]
    fn render_skips_inactive_and_keeps_order() {
        let mut world = world();
        world.spawn(marker("A", 1.0));
        let hidden = world.spawn(marker("B", 2.0));
        world.spawn(marker("C", 3.0));
        world.find_entity_mut(hidden).expect("b").set_active(false);

        let mut backend = HeadlessBackend::new(800, 600);
        world.render(&mut backend);
        let xs: Vec<f32> = backend
            .commands()
            .iter()
            .filter_map(|command| command.rect_origin().map(|(x, _)| x))
            .collect();
        assert_eq!(xs, vec![1.0, 3.0]);
    }

    #[test]
    fn update_runs_entities_then_bound_physics() {
        let mut world = world();
        world.bind_physics(PhysicsSystem::new(world.arena()));
        world.spawn(factory::player(Vec2::new(100.0, 100.0), 1.0));
        let mover = world.spawn(
            marker("Mover", 0.0).with_physics(Physics::new(1.0).with_velocity(Vec2::new(10.0, 0.0))),
        );

        world.update(1.0);
        assert_eq!(
            world.find_entity(mover).and_then(Entity::position),
            Some(Vec2::new(10.0, 0.0))
        );

        world.unbind_physics();
        world.update(1.0);
        assert_eq!(
            world.find_entity(mover).and_then(Entity::position),
            Some(Vec2::new(10.0, 0.0))
        );
    }

    #[test]
    fn clear_destroys_entities_and_detaches_physics() {
        let mut world = world();
        world.bind_physics(PhysicsSystem::new(world.arena()));
        world.spawn(marker("A", 0.0));
        world.mark_initialized();
        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert!(world.physics().is_none());
        assert!(!world.is_initialized());
    }
}
