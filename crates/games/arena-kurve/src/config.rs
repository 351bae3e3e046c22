use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use arena_core::PlayerId;

use crate::arena::{self, SpawnPoint};
use crate::error::ConfigError;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "ARENA_KURVE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/kurve.toml";

/// Trail gap timing. Both ranges are inclusive, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// Ticks of recording between the end of one gap and the start of the next.
    pub interval_min: u32,
    pub interval_max: u32,
    /// Length of a gap.
    pub duration_min: u32,
    pub duration_max: u32,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            interval_min: 70,
            interval_max: 100,
            duration_min: 5,
            duration_max: 8,
        }
    }
}

/// How the winner is picked when several players survive to the tick limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawResolution {
    /// Survivor with the most recorded trail points; ties go to input order.
    #[default]
    LongestTrail,
    /// First survivor in input order.
    FirstInOrder,
    /// A draw has no winner.
    NoWinner,
}

/// Data-driven configuration for the Kurve game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KurveConfig {
    /// Identifier advertised to strategies in every snapshot.
    pub game_id: String,
    /// Board width. Valid x coordinates are `[0, width)`.
    pub width: f64,
    /// Board height. Valid y coordinates are `[0, height)`.
    pub height: f64,
    /// Distance travelled per tick.
    pub speed: f64,
    /// Heading change per turning tick, in degrees.
    pub turn_rate: f64,
    /// A head closer than this to any trail segment collides.
    pub collision_radius: f64,
    /// Spatial hash cell edge length.
    pub cell_size: f64,
    /// Maximum ticks per game.
    pub tick_limit: u32,
    /// Game seed. `None` draws a fresh seed per game.
    pub seed: Option<u64>,
    /// Per-decision time budget advertised to strategies.
    pub decision_timeout_ms: u64,
    /// Discard decisions that return after the budget.
    pub enforce_timeout: bool,
    /// Trail gaps. `None` records every tick.
    pub gaps: Option<GapConfig>,
    /// Absolute spawn points replacing the standard layout.
    pub spawn_points: Option<Vec<SpawnPoint>>,
    pub draw_resolution: DrawResolution,
}

impl Default for KurveConfig {
    fn default() -> Self {
        Self {
            game_id: "local-test".to_string(),
            width: 640.0,
            height: 480.0,
            speed: 3.0,
            turn_rate: 5.0,
            collision_radius: 1.5,
            cell_size: 10.0,
            tick_limit: 2000,
            seed: None,
            decision_timeout_ms: 50,
            enforce_timeout: true,
            gaps: Some(GapConfig::default()),
            spawn_points: None,
            draw_resolution: DrawResolution::default(),
        }
    }
}

impl KurveConfig {
    /// Load config from environment or TOML file, falling back to defaults.
    pub fn load() -> Self {
        let env_path = std::env::var(CONFIG_ENV).ok();
        Self::load_from(env_path.as_deref(), DEFAULT_CONFIG_PATH)
    }

    /// First of `env_path` and `default_path` that reads and parses wins.
    /// A file that exists but does not parse is skipped with a warning, as
    /// is an explicit `env_path` that cannot be read.
    pub fn load_from(env_path: Option<&str>, default_path: &str) -> Self {
        if let Some(path) = env_path {
            match std::fs::read_to_string(path) {
                Ok(contents) => {
                    if let Some(config) = Self::parse_file(path, &contents) {
                        return config;
                    }
                }
                Err(e) => tracing::warn!(path, error = %e, "Cannot read kurve config"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string(default_path)
            && let Some(config) = Self::parse_file(default_path, &contents)
        {
            return config;
        }
        Self::default()
    }

    fn parse_file(path: &str, contents: &str) -> Option<Self> {
        Self::from_toml_str(contents)
            .inspect_err(|e| tracing::warn!(path, error = %e, "Ignoring unreadable kurve config"))
            .ok()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Budget enforced on each decision call, if any.
    pub fn decision_budget(&self) -> Option<Duration> {
        (self.enforce_timeout && self.decision_timeout_ms > 0)
            .then(|| Duration::from_millis(self.decision_timeout_ms))
    }

    /// Spawn points players are assigned to, in order.
    pub fn spawns(&self) -> Vec<SpawnPoint> {
        match &self.spawn_points {
            Some(points) => points.clone(),
            None => arena::standard_spawns(self.width, self.height),
        }
    }

    /// Check the configuration against the players about to play.
    pub fn validate(&self, players: &[PlayerId]) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("speed", self.speed),
            ("collision_radius", self.collision_radius),
            ("cell_size", self.cell_size),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if !self.turn_rate.is_finite() || self.turn_rate < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "turn_rate",
                value: self.turn_rate,
            });
        }

        let required = self.speed.max(self.collision_radius);
        if self.cell_size < required {
            return Err(ConfigError::CellTooSmall {
                cell_size: self.cell_size,
                required,
            });
        }

        if self.tick_limit == 0 {
            return Err(ConfigError::ZeroTickLimit);
        }

        if let Some(gaps) = &self.gaps {
            if gaps.interval_min > gaps.interval_max {
                return Err(ConfigError::InvalidGapRange {
                    field: "interval",
                    min: gaps.interval_min,
                    max: gaps.interval_max,
                });
            }
            if gaps.duration_min == 0 || gaps.duration_min > gaps.duration_max {
                return Err(ConfigError::InvalidGapRange {
                    field: "duration",
                    min: gaps.duration_min,
                    max: gaps.duration_max,
                });
            }
        }

        if players.is_empty() {
            return Err(ConfigError::NoPlayers);
        }
        let mut seen = HashSet::with_capacity(players.len());
        for id in players {
            if !seen.insert(id) {
                return Err(ConfigError::DuplicatePlayer(id.clone()));
            }
        }

        let spawns = self.spawns();
        if players.len() > spawns.len() {
            return Err(ConfigError::TooManyPlayers {
                players: players.len(),
                slots: spawns.len(),
            });
        }
        for (index, spawn) in spawns.iter().enumerate().take(players.len()) {
            let inside = spawn.x >= 0.0
                && spawn.x < self.width
                && spawn.y >= 0.0
                && spawn.y < self.height
                && spawn.heading.is_finite();
            if !inside {
                return Err(ConfigError::SpawnOutOfBounds {
                    index,
                    x: spawn.x,
                    y: spawn.y,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::test_helpers::player_ids;

    #[test]
    fn defaults_match_standard_rules() {
        let config = KurveConfig::default();
        assert_eq!(config.width, 640.0);
        assert_eq!(config.height, 480.0);
        assert_eq!(config.speed, 3.0);
        assert_eq!(config.turn_rate, 5.0);
        assert_eq!(config.tick_limit, 2000);
        assert_eq!(config.gaps, Some(GapConfig::default()));
        assert!(config.validate(&player_ids(8)).is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = KurveConfig::from_toml_str(
            r#"
            tick_limit = 500
            seed = 42
            draw_resolution = "first_in_order"

            [gaps]
            interval_min = 10
            interval_max = 20
            "#,
        )
        .unwrap();
        assert_eq!(config.tick_limit, 500);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.draw_resolution, DrawResolution::FirstInOrder);
        let gaps = config.gaps.unwrap();
        assert_eq!((gaps.interval_min, gaps.interval_max), (10, 20));
        assert_eq!((gaps.duration_min, gaps.duration_max), (5, 8));
        assert_eq!(config.width, 640.0);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = KurveConfig::from_toml_str("tick_limit = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn too_many_players_rejected() {
        let err = KurveConfig::default()
            .validate(&player_ids(9))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::TooManyPlayers {
                players: 9,
                slots: 8
            }
        );
    }

    #[test]
    fn zero_tick_limit_rejected() {
        let config = KurveConfig {
            tick_limit: 0,
            ..KurveConfig::default()
        };
        assert_eq!(
            config.validate(&player_ids(2)),
            Err(ConfigError::ZeroTickLimit)
        );
    }

    #[test]
    fn duplicate_and_missing_players_rejected() {
        let config = KurveConfig::default();
        assert_eq!(config.validate(&[]), Err(ConfigError::NoPlayers));
        let ids = vec![PlayerId::from("a"), PlayerId::from("a")];
        assert_eq!(
            config.validate(&ids),
            Err(ConfigError::DuplicatePlayer("a".into()))
        );
    }

    #[test]
    fn cell_smaller_than_travel_rejected() {
        let config = KurveConfig {
            speed: 12.0,
            ..KurveConfig::default()
        };
        assert!(matches!(
            config.validate(&player_ids(2)),
            Err(ConfigError::CellTooSmall { .. })
        ));
    }

    #[test]
    fn non_positive_dimensions_rejected() {
        let config = KurveConfig {
            width: -1.0,
            ..KurveConfig::default()
        };
        assert!(matches!(
            config.validate(&player_ids(2)),
            Err(ConfigError::InvalidValue { field: "width", .. })
        ));
    }

    #[test]
    fn inverted_gap_range_rejected() {
        let config = KurveConfig {
            gaps: Some(GapConfig {
                duration_min: 9,
                duration_max: 3,
                ..GapConfig::default()
            }),
            ..KurveConfig::default()
        };
        assert!(matches!(
            config.validate(&player_ids(2)),
            Err(ConfigError::InvalidGapRange {
                field: "duration",
                ..
            })
        ));
    }

    #[test]
    fn custom_spawn_outside_board_rejected() {
        let config = KurveConfig {
            spawn_points: Some(vec![
                SpawnPoint::new(10.0, 10.0, 0.0),
                SpawnPoint::new(700.0, 10.0, 0.0),
            ]),
            ..KurveConfig::default()
        };
        assert!(matches!(
            config.validate(&player_ids(2)),
            Err(ConfigError::SpawnOutOfBounds { index: 1, .. })
        ));
        // Only the slots actually used are checked.
        assert!(config.validate(&player_ids(1)).is_ok());
    }

    fn temp_config(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir()
            .join(format!("arena-kurve-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn load_prefers_the_env_path() {
        let env = temp_config("env", "tick_limit = 77\n");
        let fallback = temp_config("fallback", "tick_limit = 88\n");
        let config = KurveConfig::load_from(env.to_str(), fallback.to_str().unwrap());
        assert_eq!(config.tick_limit, 77);
        std::fs::remove_file(env).unwrap();
        std::fs::remove_file(fallback).unwrap();
    }

    #[test]
    fn load_skips_files_that_do_not_parse() {
        let bad = temp_config("bad", "width = \"wide\"\n");
        let good = temp_config("good", "width = 800.0\n");
        let bad = bad.to_str().unwrap();

        assert_eq!(KurveConfig::load_from(Some(bad), good.to_str().unwrap()).width, 800.0);
        assert_eq!(KurveConfig::load_from(None, bad), KurveConfig::default());
        assert_eq!(KurveConfig::load_from(Some(bad), bad), KurveConfig::default());
        std::fs::remove_file(bad).unwrap();
        std::fs::remove_file(good).unwrap();
    }

    #[test]
    fn load_falls_back_past_a_missing_env_path() {
        let missing = std::env::temp_dir().join("arena-kurve-does-not-exist.toml");
        let good = temp_config("after-missing", "speed = 4.0\n");
        let config = KurveConfig::load_from(missing.to_str(), good.to_str().unwrap());
        assert_eq!(config.speed, 4.0);
        assert_eq!(
            KurveConfig::load_from(missing.to_str(), "no/such/kurve.toml"),
            KurveConfig::default()
        );
        std::fs::remove_file(good).unwrap();
    }

    #[test]
    fn budget_disabled_when_not_enforced() {
        let mut config = KurveConfig::default();
        assert_eq!(config.decision_budget(), Some(Duration::from_millis(50)));
        config.enforce_timeout = false;
        assert_eq!(config.decision_budget(), None);
    }
}
