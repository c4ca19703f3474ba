use anyhow::{anyhow, Result};
use log::Level;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use wasm_bindgen::JsValue;

// below this an enemy crosses the board faster than a frame
const MIN_STEP_SECONDS: f64 = 0.01;
const MAX_ENEMIES: usize = 64;

/// Tunable game parameters.
///
/// Every field has a default, so JavaScript may pass `undefined`, `{}` or
/// any subset, e.g. `{ enemyCount: 6, logLevel: "debug" }`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// enemies spawned per round
    pub enemy_count: usize,
    /// wall clock seconds between enemy steps
    pub enemy_step_seconds: f64,
    /// factor applied to the frame delta handed to the player
    pub player_time_scale: f64,
    /// whether the space bar restarts the round
    pub allow_reset: bool,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enemy_count: 4,
            enemy_step_seconds: 1.0,
            player_time_scale: 3.0,
            allow_reset: true,
            log_level: String::from("info"),
        }
    }
}

impl Settings {
    pub fn from_js(value: JsValue) -> Result<Self> {
        if value.is_undefined() || value.is_null() {
            return Ok(Settings::default());
        }
        let settings: Settings = serde_wasm_bindgen::from_value(value)
            .map_err(|err| anyhow!("Invalid settings : {}", err))?;
        settings.validate()
    }

    /// Reject values the round cannot run with.
    pub fn validate(self) -> Result<Self> {
        if !self.enemy_step_seconds.is_finite() || self.enemy_step_seconds < MIN_STEP_SECONDS {
            return Err(anyhow!(
                "Invalid settings : enemyStepSeconds must be at least {}, got {}",
                MIN_STEP_SECONDS,
                self.enemy_step_seconds
            ));
        }
        if self.enemy_count > MAX_ENEMIES {
            return Err(anyhow!(
                "Invalid settings : enemyCount must be at most {}, got {}",
                MAX_ENEMIES,
                self.enemy_count
            ));
        }
        if !self.player_time_scale.is_finite() || self.player_time_scale < 0.0 {
            return Err(anyhow!(
                "Invalid settings : playerTimeScale must be a finite non negative number, got {}",
                self.player_time_scale
            ));
        }
        Ok(self)
    }

    /// Unknown level names fall back to `info`.
    pub fn log_level(&self) -> Level {
        Level::from_str(&self.log_level).unwrap_or(Level::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn defaults_match_the_classic_game() {
        let settings = Settings::default();
        assert_eq!(settings.enemy_count, 4);
        assert_relative_eq!(settings.enemy_step_seconds, 1.0);
        assert_relative_eq!(settings.player_time_scale, 3.0);
        assert!(settings.allow_reset);
        assert_eq!(settings.log_level(), Level::Info);
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn step_interval_must_be_a_sane_positive_period() {
        for seconds in [1e-9, 0.0, -1.0, f64::NAN, f64::INFINITY] {
            let settings = Settings {
                enemy_step_seconds: seconds,
                ..Settings::default()
            };
            let err = settings.validate().expect_err("period should be rejected");
            assert!(err.to_string().contains("enemyStepSeconds"));
        }

        let settings = Settings {
            enemy_step_seconds: 0.25,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn enemy_count_is_bounded() {
        let settings = Settings {
            enemy_count: 10_000,
            ..Settings::default()
        };
        let err = settings.validate().expect_err("count should be rejected");
        assert!(err.to_string().contains("enemyCount"));

        let settings = Settings {
            enemy_count: 0,
            ..Settings::default()
        };
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn player_time_scale_must_be_finite() {
        let settings = Settings {
            player_time_scale: f64::NAN,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        let settings = Settings {
            log_level: String::from("DEBUG"),
            ..Settings::default()
        };
        assert_eq!(settings.log_level(), Level::Debug);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let settings = Settings {
            log_level: String::from("chatty"),
            ..Settings::default()
        };
        assert_eq!(settings.log_level(), Level::Info);
    }
}
