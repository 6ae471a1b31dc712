struct GameScene {
    tuning: GameTuning,
    rng: StdRng,
    seed: u64,
    phase: GamePhase,
    player_id: Option<EntityId>,
    elapsed: f32,
    spawn: SpawnSchedule,
    score: u32,
    health: u32,
    was_fire_pressed: bool,
    explosions: Vec<ExplosionBurst>,
}

impl GameScene {
    fn new(tuning: GameTuning) -> Self {
        let seed = tuning.seed.unwrap_or_else(seed_from_clock);
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            phase: GamePhase::Playing,
            player_id: None,
            elapsed: 0.0,
            spawn: SpawnSchedule::from_tuning(&tuning),
            score: 0,
            health: tuning.max_health,
            was_fire_pressed: false,
            explosions: Vec::new(),
            tuning,
        }
    }

    fn player_spawn(&self) -> Vec2 {
        Vec2::new(self.tuning.player_spawn.0, self.tuning.player_spawn.1)
    }

    fn player_alive(&self, world: &SceneWorld) -> bool {
        self.health > 0
            && self
                .player_id
                .and_then(|id| world.find_entity(id))
                .is_some_and(|player| player.is_active())
    }

    fn spawn_enemy(&mut self, world: &mut SceneWorld) {
        let position = random_arena_point(&mut self.rng, world.arena());
        let pursuit = random_pursuit(&mut self.rng, &self.tuning);
        world.spawn(factory::enemy(position, pursuit));
    }

    fn spawn_enemies(&mut self, world: &mut SceneWorld, count: u32) {
        for _ in 0..count {
            self.spawn_enemy(world);
        }
    }

    fn spawn_decorations(&mut self, world: &mut SceneWorld) {
        for _ in 0..self.tuning.decorations {
            let position = random_arena_point(&mut self.rng, world.arena());
            world.spawn(factory::decoration(position));
        }
    }

    fn explode(&mut self, position: Vec2) {
        let burst =
            ExplosionBurst::spawn(&mut self.rng, position, self.tuning.explosion_particles);
        self.explosions.push(burst);
    }

    fn handle_shooting(&mut self, input: &InputState, world: &mut SceneWorld) {
        let Some(player_id) = self.player_id else {
            return;
        };
        if !self.player_alive(world) {
            return;
        }
        let pressed = input.is_mouse_button_pressed(MouseButton::Left);
        if pressed && !self.was_fire_pressed {
            fire_fireball(world, player_id, input.mouse_position(), &self.tuning);
        }
        self.was_fire_pressed = pressed;
    }

    fn handle_player_contacts(&mut self, world: &mut SceneWorld) {
        let Some(player_id) = self.player_id else {
            return;
        };
        for position in resolve_player_contacts(world, player_id) {
            self.explode(position);
            if self.phase != GamePhase::Playing {
                continue;
            }
            self.score += 1;
            self.health = self.health.saturating_sub(1);
            if self.health == 0 {
                self.kill_player(world, player_id);
            }
        }
    }

    fn kill_player(&mut self, world: &mut SceneWorld, player_id: EntityId) {
        let mut last_position = None;
        if let Some(player) = world.find_entity_mut(player_id) {
            player.set_active(false);
            last_position = player.position();
        }
        if let Some(position) = last_position {
            self.explode(position);
        }
        self.phase = GamePhase::AwaitingConfirmation;
        info!(score = self.score, elapsed_s = self.elapsed, "player_died");
    }

    fn update_explosions(&mut self, dt: f32) {
        for burst in &mut self.explosions {
            burst.update(dt);
        }
        self.explosions.retain(|burst| !burst.is_finished());
    }

    /// Starts a fresh round in the same scene. Decorations survive; enemies and
    /// fireballs are swept and a few enemies respawned.
    fn restart(&mut self, world: &mut SceneWorld) {
        self.score = 0;
        self.elapsed = 0.0;
        self.spawn.reset();
        self.was_fire_pressed = false;
        self.health = self.tuning.max_health;
        self.phase = GamePhase::Playing;
        self.explosions.clear();

        let spawn = self.player_spawn();
        if let Some(player) = self.player_id.and_then(|id| world.find_entity_mut(id)) {
            player.set_active(true);
            player.set_position(spawn);
            if let Some(physics) = player.physics_mut() {
                physics.set_velocity(Vec2::ZERO);
            }
        }
        for entity in world.entities_mut() {
            if entity.is_enemy() || entity.is_fireball() {
                entity.set_active(false);
            }
        }
        world.remove_inactive();
        self.spawn_enemies(world, self.tuning.restart_enemies);
        info!(seed = self.seed, "game_restarted");
    }

    fn render_health_bar(&self, world: &SceneWorld, renderer: &mut dyn RenderBackend) {
        let Some(position) = self
            .player_id
            .and_then(|id| world.find_entity(id))
            .filter(|player| player.is_active())
            .and_then(|player| player.position())
        else {
            return;
        };
        let x = position.x - HEALTH_BAR_WIDTH / 2.0;
        let y = position.y - PLAYER_TOP_OFFSET - HEALTH_BAR_GAP;
        renderer.draw_rect(x, y, HEALTH_BAR_WIDTH, HEALTH_BAR_HEIGHT, HEALTH_BAR_BACK_COLOR);
        if self.health > 0 {
            let ratio = (self.health as f32 / self.tuning.max_health as f32).clamp(0.0, 1.0);
            renderer.draw_rect(
                x,
                y,
                HEALTH_BAR_WIDTH * ratio,
                HEALTH_BAR_HEIGHT,
                HEALTH_BAR_FILL_COLOR,
            );
        }
    }

    fn render_game_over(&self, renderer: &mut dyn RenderBackend) {
        let width = renderer.width() as f32;
        let height = renderer.height() as f32;
        let center = Vec2::new(width / 2.0, height / 2.0);
        renderer.draw_rect(0.0, 0.0, width, height, OVERLAY_COLOR);
        renderer.draw_text(center.x - 60.0, center.y - 50.0, "GAME OVER", GAME_OVER_COLOR);
        renderer.draw_text(
            center.x - 70.0,
            center.y,
            &format!("Final Score: {}", self.score),
            HUD_TEXT_COLOR,
        );
        renderer.draw_text(
            center.x - 100.0,
            center.y + 50.0,
            "Press ENTER to Restart",
            PROMPT_COLOR,
        );
    }
}
