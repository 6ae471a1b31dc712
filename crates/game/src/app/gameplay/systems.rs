fn movement_direction(input: &InputState) -> Vec2 {
    let mut direction = Vec2::ZERO;
    if input.is_key_pressed(Key::W) || input.is_key_pressed(Key::Up) {
        direction.y -= 1.0;
    }
    if input.is_key_pressed(Key::S) || input.is_key_pressed(Key::Down) {
        direction.y += 1.0;
    }
    if input.is_key_pressed(Key::A) || input.is_key_pressed(Key::Left) {
        direction.x -= 1.0;
    }
    if input.is_key_pressed(Key::D) || input.is_key_pressed(Key::Right) {
        direction.x += 1.0;
    }
    direction
}

/// Held movement keys overwrite the velocity; with no input friction takes over.
/// The position is clamped to the arena minus the player margin.
fn steer_player(world: &mut SceneWorld, player_id: EntityId, input: &InputState, tuning: &GameTuning) {
    let arena = world.arena();
    let Some(player) = world.find_entity_mut(player_id) else {
        return;
    };
    let direction = movement_direction(input);
    if direction.magnitude() > 0.0 {
        if let Some(physics) = player.physics_mut() {
            physics.set_velocity(direction.normalize() * tuning.player_speed);
        }
    }
    if let Some(position) = player.position() {
        let clamped = arena.clamp_with_margin(position, tuning.player_margin);
        if clamped != position {
            player.set_position(clamped);
        }
    }
}

/// Spawns a fireball from the player towards `aim`. Returns false when the aim
/// point sits on the shooter.
fn fire_fireball(world: &mut SceneWorld, player_id: EntityId, aim: Vec2, tuning: &GameTuning) -> bool {
    let Some(origin) = world.find_entity(player_id).and_then(|player| player.position()) else {
        return false;
    };
    let direction = aim - origin;
    if direction.magnitude() <= MIN_AIM_DISTANCE {
        return false;
    }
    world.spawn(factory::fireball(
        origin,
        direction.normalize() * tuning.fireball_speed,
        tuning.fireball_radius,
    ));
    true
}

fn active_enemy_bounds(world: &SceneWorld) -> Vec<(usize, Rect, Vec2)> {
    world
        .entities()
        .iter()
        .enumerate()
        .filter(|(_, entity)| entity.is_active() && entity.is_enemy())
        .filter_map(|(index, entity)| {
            let position = entity.position()?;
            Some((index, entity_bounds(entity)?, position))
        })
        .collect()
}

/// Each active fireball destroys at most one enemy; both deactivate.
/// Returns the positions of destroyed enemies.
fn resolve_fireball_hits(world: &mut SceneWorld) -> Vec<Vec2> {
    let enemies = active_enemy_bounds(world);
    if enemies.is_empty() {
        return Vec::new();
    }
    let fireballs: Vec<(usize, Rect)> = world
        .entities()
        .iter()
        .enumerate()
        .filter(|(_, entity)| entity.is_active() && entity.is_fireball())
        .filter_map(|(index, entity)| Some((index, entity_bounds(entity)?)))
        .collect();

    let mut destroyed = vec![false; enemies.len()];
    let mut hits = Vec::new();
    for (fireball_index, fireball_rect) in fireballs {
        let target = enemies
            .iter()
            .enumerate()
            .find(|(slot, (_, enemy_rect, _))| !destroyed[*slot] && fireball_rect.intersects(enemy_rect));
        if let Some((slot, (enemy_index, _, position))) = target {
            destroyed[slot] = true;
            hits.push((fireball_index, *enemy_index, *position));
        }
    }

    let entities = world.entities_mut();
    hits.into_iter()
        .map(|(fireball_index, enemy_index, position)| {
            entities[fireball_index].set_active(false);
            entities[enemy_index].set_active(false);
            position
        })
        .collect()
}

/// Deactivates every active enemy touching the player; returns their positions.
fn resolve_player_contacts(world: &mut SceneWorld, player_id: EntityId) -> Vec<Vec2> {
    let Some(player_rect) = world
        .find_entity(player_id)
        .filter(|player| player.is_active())
        .and_then(|player| player.position())
        .map(player_bounds)
    else {
        return Vec::new();
    };
    let touching: Vec<(usize, Vec2)> = active_enemy_bounds(world)
        .into_iter()
        .filter(|(_, enemy_rect, _)| player_rect.intersects(enemy_rect))
        .map(|(index, _, position)| (index, position))
        .collect();
    let entities = world.entities_mut();
    touching
        .into_iter()
        .map(|(index, position)| {
            entities[index].set_active(false);
            position
        })
        .collect()
}

fn random_arena_point(rng: &mut StdRng, arena: Arena) -> Vec2 {
    Vec2::new(
        rng.gen::<f32>() * arena.width,
        rng.gen::<f32>() * arena.height,
    )
}

fn random_pursuit(rng: &mut StdRng, tuning: &GameTuning) -> Pursuit {
    let chase_speed = if tuning.chase_speed_max > tuning.chase_speed_min {
        rng.gen_range(tuning.chase_speed_min..tuning.chase_speed_max)
    } else {
        tuning.chase_speed_min
    };
    let mode = match tuning.pursuit {
        PursuitTuning::Velocity => PursuitMode::Velocity,
        PursuitTuning::Force { gain } => PursuitMode::Force { gain },
    };
    Pursuit { chase_speed, mode }
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
