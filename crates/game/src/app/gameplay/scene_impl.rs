impl Scene for GameScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.phase = GamePhase::Playing;
        self.elapsed = 0.0;
        self.spawn.reset();
        self.score = 0;
        self.health = self.tuning.max_health;
        self.was_fire_pressed = false;
        self.explosions.clear();

        let player = factory::player(self.player_spawn(), self.tuning.player_friction);
        self.player_id = Some(world.spawn(player));
        self.spawn_enemies(world, self.tuning.initial_enemies);
        self.spawn_decorations(world);
        info!(
            seed = self.seed,
            entity_count = world.entity_count(),
            max_health = self.tuning.max_health,
            "game_started"
        );
    }

    fn update(&mut self, dt: f32, input: &InputState, world: &mut SceneWorld) -> SceneCommand {
        if self.phase == GamePhase::AwaitingConfirmation {
            if input.is_key_just_pressed(Key::Enter) {
                self.restart(world);
                return SceneCommand::RestartRecording;
            }
            if input.is_key_just_pressed(Key::Escape) {
                return SceneCommand::SwitchTo {
                    key: SceneKey::MainMenu,
                    recording: RecordingPolicy::Stop,
                };
            }
            return SceneCommand::None;
        }
        if input.is_key_just_pressed(Key::Escape) {
            return SceneCommand::SwitchTo {
                key: SceneKey::MainMenu,
                recording: RecordingPolicy::Discard,
            };
        }

        self.handle_shooting(input, world);
        world.update_entities(dt);
        for position in resolve_fireball_hits(world) {
            self.score += 1;
            self.explode(position);
        }
        self.elapsed += dt;

        if let Some(player_id) = self.player_id {
            if self.player_alive(world) {
                steer_player(world, player_id, input, &self.tuning);
            }
        }
        self.handle_player_contacts(world);

        if self.phase == GamePhase::Playing && self.spawn.tick(dt, self.elapsed) {
            self.spawn_enemy(world);
        }
        self.update_explosions(dt);
        world.retain(|entity| entity.is_active() || entity.is_player());
        SceneCommand::None
    }

    fn render(&mut self, world: &SceneWorld, renderer: &mut dyn RenderBackend) {
        let width = renderer.width() as f32;
        let height = renderer.height() as f32;
        renderer.draw_rect(0.0, 0.0, width, height, BACKGROUND_COLOR);

        world.render(renderer);
        self.render_health_bar(world, renderer);
        for burst in &self.explosions {
            burst.render(renderer);
        }

        renderer.draw_text(
            SCORE_POSITION.x,
            SCORE_POSITION.y,
            &format!("Score: {}", self.score),
            HUD_TEXT_COLOR,
        );
        renderer.draw_text(
            width - TIMER_RIGHT_INSET,
            SCORE_POSITION.y,
            &format!("Time: {:.1} s", self.elapsed),
            HUD_TEXT_COLOR,
        );
        if self.phase == GamePhase::AwaitingConfirmation {
            self.render_game_over(renderer);
        }
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        self.player_id = None;
        self.explosions.clear();
    }
}
