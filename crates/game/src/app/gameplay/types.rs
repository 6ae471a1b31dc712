#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GamePhase {
    Playing,
    /// Player is dead; gameplay is frozen until Enter (restart) or Esc (menu).
    AwaitingConfirmation,
}

/// Enemy spawn cadence that tightens as the round goes on.
#[derive(Debug, Clone, Copy)]
struct SpawnSchedule {
    base_interval: f32,
    min_interval: f32,
    ramp_per_second: f32,
    timer: f32,
}

impl SpawnSchedule {
    fn from_tuning(tuning: &GameTuning) -> Self {
        Self {
            base_interval: tuning.spawn_base_interval,
            min_interval: tuning.spawn_min_interval,
            ramp_per_second: tuning.spawn_ramp_per_second,
            timer: 0.0,
        }
    }

    fn interval(&self, elapsed: f32) -> f32 {
        (self.base_interval - elapsed * self.ramp_per_second).max(self.min_interval)
    }

    /// Accumulates `dt`; true (and the timer resets) once it passes the interval.
    fn tick(&mut self, dt: f32, elapsed: f32) -> bool {
        self.timer += dt;
        if self.timer > self.interval(elapsed) {
            self.timer = 0.0;
            return true;
        }
        false
    }

    fn reset(&mut self) {
        self.timer = 0.0;
    }
}

#[derive(Debug, Clone, Copy)]
struct Particle {
    position: Vec2,
    velocity: Vec2,
    life: f32,
    initial_life: f32,
    size: f32,
    color: Color,
}

/// One explosion: a burst of particles flying out and fading.
#[derive(Debug, Clone, Default)]
struct ExplosionBurst {
    particles: Vec<Particle>,
}

impl ExplosionBurst {
    fn spawn(rng: &mut StdRng, origin: Vec2, count: u32) -> Self {
        let particles = (0..count)
            .map(|_| {
                let angle = rng.gen_range(0.0..TAU);
                let speed = rng.gen_range(EXPLOSION_SPEED_MIN..EXPLOSION_SPEED_MAX);
                let life = rng.gen_range(EXPLOSION_LIFE_MIN..EXPLOSION_LIFE_MAX);
                Particle {
                    position: origin,
                    velocity: Vec2::new(angle.cos(), angle.sin()) * speed,
                    life,
                    initial_life: life,
                    size: rng.gen_range(EXPLOSION_SIZE_MIN..EXPLOSION_SIZE_MAX),
                    color: Color::rgb(
                        1.0,
                        rng.gen_range(EXPLOSION_GREEN_MIN..EXPLOSION_GREEN_MAX),
                        0.0,
                    ),
                }
            })
            .collect();
        Self { particles }
    }

    fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.position += particle.velocity * dt;
            particle.life -= dt;
        }
        self.particles.retain(|particle| particle.life > 0.0);
    }

    fn is_finished(&self) -> bool {
        self.particles.is_empty()
    }

    fn render(&self, renderer: &mut dyn RenderBackend) {
        for particle in &self.particles {
            let fade = (particle.life / particle.initial_life).clamp(0.0, 1.0);
            let color = Color::new(
                particle.color.r,
                particle.color.g,
                particle.color.b,
                particle.color.a * fade,
            );
            let half = particle.size / 2.0;
            renderer.draw_rect(
                particle.position.x - half,
                particle.position.y - half,
                particle.size,
                particle.size,
                color,
            );
        }
    }
}
