//! Engine configuration.
//!
//! The two window sizes and the deployment-specific numeric conventions are
//! injectable rather than hard-coded: fleets differ in sensor hardware
//! (digital darkness votes vs. an analog photoresistor) and in how power
//! anomalies are judged. Each deployment picks exactly one light profile
//! and one anomaly model; the stages downstream read their thresholds from
//! here so the conventions can never drift apart within a process.

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// How raw light samples are interpreted when smoothing and when deciding
/// day/night.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LightProfile {
    /// Samples are 0/1 "is dark" votes. The aggregate is the window sum
    /// (a vote count in `0..=N`), and the hysteresis thresholds sit either
    /// side of the exact midpoint `N/2`.
    BinaryVote,

    /// Samples are a continuous sensor reading (e.g. 0-1023 or 0-4095
    /// ADC). The aggregate is the window mean, compared against absolute
    /// thresholds.
    Analog {
        /// Mean above this value latches night.
        #[serde(default = "default_night_above")]
        night_above: f64,

        /// Mean below this value latches day. Must be below `night_above`;
        /// the gap between the two is the hysteresis dead band.
        #[serde(default = "default_day_below")]
        day_below: f64,
    },
}

fn default_night_above() -> f64 {
    800.0
}

fn default_day_below() -> f64 {
    600.0
}

impl LightProfile {
    /// Analog profile with the stock 800/600 thresholds.
    pub fn analog() -> Self {
        Self::Analog {
            night_above: default_night_above(),
            day_below: default_day_below(),
        }
    }
}

/// How reported power is compared against the brightness decision.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnomalyModel {
    /// Two independent band checks. A lamp commanded on should draw at
    /// least `lit_floor_watts`; a lamp commanded off should draw at most
    /// `dark_ceiling_watts`. The leak check is evaluated second and wins
    /// if both conditions hold, so exactly one code is ever reported.
    PowerBands {
        #[serde(default = "default_lit_floor")]
        lit_floor_watts: f64,

        #[serde(default = "default_dark_ceiling")]
        dark_ceiling_watts: f64,
    },

    /// Linear expected-power model: `expected = brightness/100 * rated`.
    /// Any deviation beyond `tolerance_watts` is flagged as a single
    /// anomaly class.
    ExpectedPower {
        #[serde(default = "default_rated")]
        rated_watts: f64,

        #[serde(default = "default_tolerance")]
        tolerance_watts: f64,
    },
}

fn default_lit_floor() -> f64 {
    0.1
}

fn default_dark_ceiling() -> f64 {
    1.0
}

fn default_rated() -> f64 {
    5.0
}

fn default_tolerance() -> f64 {
    1.0
}

impl AnomalyModel {
    /// Band model with the stock 0.1 W / 1.0 W limits.
    pub fn power_bands() -> Self {
        Self::PowerBands {
            lit_floor_watts: default_lit_floor(),
            dark_ceiling_watts: default_dark_ceiling(),
        }
    }

    /// Expected-power model with the stock 5 W lamp and 1 W tolerance.
    pub fn expected_power() -> Self {
        Self::ExpectedPower {
            rated_watts: default_rated(),
            tolerance_watts: default_tolerance(),
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Light smoothing window size (N).
    pub light_window: usize,

    /// Motion history window size (M).
    pub motion_window: usize,

    pub light_profile: LightProfile,

    pub anomaly_model: AnomalyModel,

    /// When set, the device store evicts the least-recently-seen device
    /// rather than growing past this many entries.
    pub max_devices: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            light_window: 10,
            motion_window: 60,
            light_profile: LightProfile::BinaryVote,
            anomaly_model: AnomalyModel::power_bands(),
            max_devices: None,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a TOML file and validate it.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency. [`Engine::new`](crate::Engine::new)
    /// calls this, so a running engine always holds a valid config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.light_window < 1 {
            return Err(ConfigError::WindowTooSmall {
                field: "light_window",
            });
        }
        if self.motion_window < 1 {
            return Err(ConfigError::WindowTooSmall {
                field: "motion_window",
            });
        }
        if let LightProfile::Analog {
            night_above,
            day_below,
        } = self.light_profile
        {
            if day_below >= night_above {
                return Err(ConfigError::ThresholdsInverted {
                    night_above,
                    day_below,
                });
            }
        }
        match self.anomaly_model {
            AnomalyModel::PowerBands {
                lit_floor_watts,
                dark_ceiling_watts,
            } => {
                for (field, value) in [
                    ("lit_floor_watts", lit_floor_watts),
                    ("dark_ceiling_watts", dark_ceiling_watts),
                ] {
                    if !value.is_finite() || value <= 0.0 {
                        return Err(ConfigError::NonPositiveWatts { field, value });
                    }
                }
            }
            AnomalyModel::ExpectedPower {
                rated_watts,
                tolerance_watts,
            } => {
                for (field, value) in [
                    ("rated_watts", rated_watts),
                    ("tolerance_watts", tolerance_watts),
                ] {
                    if !value.is_finite() || value <= 0.0 {
                        return Err(ConfigError::NonPositiveWatts { field, value });
                    }
                }
            }
        }
        if self.max_devices == Some(0) {
            return Err(ConfigError::DeviceCapTooSmall);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.light_window, 10);
        assert_eq!(config.motion_window, 60);
        assert_eq!(config.light_profile, LightProfile::BinaryVote);
        assert_eq!(config.anomaly_model, AnomalyModel::power_bands());
        assert_eq!(config.max_devices, None);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_analog_profile_with_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [light_profile]
            mode = "analog"
            "#,
        )
        .unwrap();
        assert_eq!(config.light_profile, LightProfile::analog());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_expected_power_model() {
        let config: EngineConfig = toml::from_str(
            r#"
            light_window = 5

            [anomaly_model]
            mode = "expected_power"
            rated_watts = 10.0
            "#,
        )
        .unwrap();
        assert_eq!(config.light_window, 5);
        assert_eq!(
            config.anomaly_model,
            AnomalyModel::ExpectedPower {
                rated_watts: 10.0,
                tolerance_watts: 1.0,
            }
        );
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lampd.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"
            light_window = 4
            motion_window = 8
            max_devices = 100

            [light_profile]
            mode = "analog"
            night_above = 2500.0
            day_below = 1500.0

            [anomaly_model]
            mode = "power_bands"
            "#
        )
        .unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.light_window, 4);
        assert_eq!(config.motion_window, 8);
        assert_eq!(config.max_devices, Some(100));
        assert_eq!(
            config.light_profile,
            LightProfile::Analog {
                night_above: 2500.0,
                day_below: 1500.0,
            }
        );
    }

    #[test]
    fn test_from_file_missing() {
        let result = EngineConfig::from_file("/nonexistent/lampd.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let config = EngineConfig {
            light_window: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowTooSmall {
                field: "light_window"
            })
        ));
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let config = EngineConfig {
            light_profile: LightProfile::Analog {
                night_above: 500.0,
                day_below: 700.0,
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdsInverted { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_device_cap() {
        let config = EngineConfig {
            max_devices: Some(0),
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DeviceCapTooSmall)
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_watts() {
        let config = EngineConfig {
            anomaly_model: AnomalyModel::ExpectedPower {
                rated_watts: 0.0,
                tolerance_watts: 1.0,
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveWatts {
                field: "rated_watts",
                ..
            })
        ));
    }
}
