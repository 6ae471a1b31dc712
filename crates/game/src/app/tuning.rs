use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

pub(crate) const TUNING_ENV_VAR: &str = "EMBER_TUNING";

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub(crate) enum PursuitTuning {
    Velocity,
    Force { gain: f32 },
}

/// Gameplay numbers; every field may be omitted from the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct GameTuning {
    pub(crate) player_speed: f32,
    pub(crate) player_friction: f32,
    pub(crate) player_margin: f32,
    pub(crate) player_spawn: (f32, f32),
    pub(crate) max_health: u32,
    pub(crate) initial_enemies: u32,
    pub(crate) restart_enemies: u32,
    pub(crate) decorations: u32,
    pub(crate) spawn_base_interval: f32,
    pub(crate) spawn_min_interval: f32,
    pub(crate) spawn_ramp_per_second: f32,
    pub(crate) chase_speed_min: f32,
    pub(crate) chase_speed_max: f32,
    pub(crate) pursuit: PursuitTuning,
    pub(crate) fireball_speed: f32,
    pub(crate) fireball_radius: f32,
    pub(crate) explosion_particles: u32,
    pub(crate) seed: Option<u64>,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            player_speed: 200.0,
            player_friction: 0.95,
            player_margin: 20.0,
            player_spawn: (400.0, 300.0),
            max_health: 15,
            initial_enemies: 10,
            restart_enemies: 3,
            decorations: 5,
            spawn_base_interval: 0.5,
            spawn_min_interval: 0.1,
            spawn_ramp_per_second: 0.05,
            chase_speed_min: 50.0,
            chase_speed_max: 75.0,
            pursuit: PursuitTuning::Velocity,
            fireball_speed: 350.0,
            fireball_radius: 6.0,
            explosion_particles: 20,
            seed: None,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse tuning file {path} at {at}: {source}")]
    Parse {
        path: PathBuf,
        at: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tuning value {field}: expected {expected}, got {actual}")]
    Invalid {
        field: &'static str,
        expected: &'static str,
        actual: String,
    },
}

pub(crate) fn load_tuning(path: &Path) -> Result<GameTuning, TuningError> {
    let raw = fs::read_to_string(path).map_err(|source| TuningError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let tuning = parse_tuning(path, &raw)?;
    validate_tuning(&tuning)?;
    Ok(tuning)
}

/// Tuning from the file named by `EMBER_TUNING`; defaults when unset or unusable.
pub(crate) fn load_tuning_from_env() -> GameTuning {
    let Some(path) = std::env::var_os(TUNING_ENV_VAR).map(PathBuf::from) else {
        return GameTuning::default();
    };
    match load_tuning(&path) {
        Ok(tuning) => {
            info!(path = %path.display(), "tuning_loaded");
            tuning
        }
        Err(error) => {
            warn!(error = %error, "tuning_rejected_using_defaults");
            GameTuning::default()
        }
    }
}

fn parse_tuning(path: &Path, raw: &str) -> Result<GameTuning, TuningError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, GameTuning>(&mut deserializer).map_err(|error| {
        let at = error.path().to_string();
        TuningError::Parse {
            path: path.to_path_buf(),
            at,
            source: error.into_inner(),
        }
    })
}

fn validate_tuning(tuning: &GameTuning) -> Result<(), TuningError> {
    if !(0.0..=1.0).contains(&tuning.player_friction) {
        return Err(invalid(
            "player_friction",
            "a value in [0, 1]",
            tuning.player_friction,
        ));
    }
    if tuning.max_health == 0 {
        return Err(invalid("max_health", "at least 1", tuning.max_health));
    }
    if !is_positive(tuning.spawn_min_interval) {
        return Err(invalid(
            "spawn_min_interval",
            "a positive number",
            tuning.spawn_min_interval,
        ));
    }
    if tuning.chase_speed_max < tuning.chase_speed_min {
        return Err(invalid(
            "chase_speed_max",
            "a value not below chase_speed_min",
            tuning.chase_speed_max,
        ));
    }
    if !is_positive(tuning.fireball_radius) {
        return Err(invalid(
            "fireball_radius",
            "a positive number",
            tuning.fireball_radius,
        ));
    }
    Ok(())
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(field: &'static str, expected: &'static str, actual: impl ToString) -> TuningError {
    TuningError::Invalid {
        field,
        expected,
        actual: actual.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn write(dir: &TempDir, raw: &str) -> PathBuf {
        let path = dir.path().join("tuning.json");
        fs::write(&path, raw).expect("write tuning");
        path
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(
            &dir,
            r#"{"max_health": 3, "pursuit": {"mode": "force", "gain": 4.0}, "seed": 9}"#,
        );
        let tuning = load_tuning(&path).expect("tuning");
        assert_eq!(tuning.max_health, 3);
        assert_eq!(tuning.pursuit, PursuitTuning::Force { gain: 4.0 });
        assert_eq!(tuning.seed, Some(9));
        assert_eq!(tuning.initial_enemies, 10);
        assert_eq!(tuning.player_spawn, (400.0, 300.0));
    }

    #[test]
    fn parse_error_names_the_json_path() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, r#"{"decorations": 2, "max_health": "lots"}"#);
        let error = load_tuning(&path).expect_err("bad health");
        match error {
            TuningError::Parse { at, .. } => assert_eq!(at, "max_health"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, r#"{"max_helth": 3}"#);
        assert!(matches!(
            load_tuning(&path),
            Err(TuningError::Parse { .. })
        ));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = write(&dir, r#"{"player_friction": 1.5}"#);
        assert!(matches!(
            load_tuning(&path),
            Err(TuningError::Invalid {
                field: "player_friction",
                ..
            })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = TempDir::new().expect("temp dir");
        assert!(matches!(
            load_tuning(&dir.path().join("absent.json")),
            Err(TuningError::Read { .. })
        ));
    }
}
