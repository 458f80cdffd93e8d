//! TOML-backed runtime configuration.
//!
//! Loaded once at startup; every field has a default so a partial (or
//! empty) file is valid. The engine consumes resolved values only - see
//! [`FractureConfig::tracker_config`].

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use fracture_core::TrackerConfig;

use crate::events::ProjectileKind;

/// One world tick, the unit the sweep cadence is configured in.
pub const MILLIS_PER_TICK: u64 = 50;

/// Errors raised while loading configuration. The only fallible surface in
/// the system; everything downstream consumes validated values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value parsed but makes no sense.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Per-projectile-kind crack policy.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ProjectilePolicy {
    /// Whether impacts of this kind crack blocks at all.
    pub allowed: bool,
    /// Damage applied per impact.
    pub damage: u32,
}

impl Default for ProjectilePolicy {
    fn default() -> Self {
        Self {
            allowed: true,
            damage: 1,
        }
    }
}

/// Area-effect crack policy.
///
/// `allowed` (the crack overlay) and `destroy_blocks` (whether the host's
/// real destruction proceeds) are independent switches; neither implies
/// the other.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Whether explosions crack surrounding blocks.
    pub allowed: bool,
    /// Damage applied to each block inside the radius.
    pub damage: u32,
    /// Sphere radius in blocks. Membership is strict: a block is inside
    /// iff its squared distance from the origin is `< radius * radius`.
    pub radius: i32,
    /// Whether the explosion's own block destruction goes ahead.
    pub destroy_blocks: bool,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            allowed: true,
            damage: 5,
            radius: 3,
            destroy_blocks: true,
        }
    }
}

/// Regeneration timing.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct RegenConfig {
    /// Seconds an unresolved crack survives before it regenerates.
    pub seconds: u64,
    /// Sweep cadence in ticks.
    pub check_ticks: u64,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            seconds: 20,
            check_ticks: 30,
        }
    }
}

/// Complete runtime configuration.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct FractureConfig {
    /// Upper bound on simultaneously cracked blocks.
    pub max_cracked_blocks: usize,
    /// Whether damage past the maximum stage breaks the block.
    pub allow_damage_break: bool,
    /// Regeneration timing.
    pub regen: RegenConfig,
    /// Arrow impacts.
    pub arrow: ProjectilePolicy,
    /// Egg impacts.
    pub egg: ProjectilePolicy,
    /// Snowball impacts.
    pub snowball: ProjectilePolicy,
    /// Area effects.
    pub explosion: ExplosionConfig,
}

impl Default for FractureConfig {
    fn default() -> Self {
        Self {
            max_cracked_blocks: 100,
            allow_damage_break: false,
            regen: RegenConfig::default(),
            arrow: ProjectilePolicy {
                allowed: true,
                damage: 3,
            },
            egg: ProjectilePolicy::default(),
            snowball: ProjectilePolicy::default(),
            explosion: ExplosionConfig::default(),
        }
    }
}

impl FractureConfig {
    /// Parses configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&raw)?;
        info!(path = %path.as_ref().display(), "configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.explosion.radius < 0 {
            return Err(ConfigError::Invalid {
                field: "explosion.radius",
                reason: format!("must be non-negative, got {}", self.explosion.radius),
            });
        }
        if self.regen.check_ticks == 0 {
            return Err(ConfigError::Invalid {
                field: "regen.check_ticks",
                reason: "must be at least 1 tick".to_owned(),
            });
        }
        Ok(())
    }

    /// Crack policy for one projectile kind.
    #[must_use]
    pub const fn projectile(&self, kind: ProjectileKind) -> &ProjectilePolicy {
        match kind {
            ProjectileKind::Arrow => &self.arrow,
            ProjectileKind::Egg => &self.egg,
            ProjectileKind::Snowball => &self.snowball,
        }
    }

    /// Regen window in milliseconds.
    #[must_use]
    pub const fn regen_millis(&self) -> u64 {
        self.regen.seconds * 1000
    }

    /// Wall-clock interval between sweeps.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.regen.check_ticks * MILLIS_PER_TICK)
    }

    /// The subset of values the core tracker consumes.
    #[must_use]
    pub const fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            max_tracked: self.max_cracked_blocks,
            break_on_cap: self.allow_damage_break,
            regen_millis: self.regen_millis(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = FractureConfig::from_toml_str("").unwrap();
        assert_eq!(config.max_cracked_blocks, 100);
        assert!(!config.allow_damage_break);
        assert_eq!(config.arrow.damage, 3);
        assert_eq!(config.regen_millis(), 20_000);
        assert_eq!(config.sweep_interval(), Duration::from_millis(1500));
    }

    #[test]
    fn test_full_toml_round_trip() {
        let raw = r#"
            max_cracked_blocks = 8
            allow_damage_break = true

            [regen]
            seconds = 5
            check_ticks = 10

            [arrow]
            allowed = false
            damage = 9

            [explosion]
            allowed = true
            damage = 2
            radius = 4
            destroy_blocks = false
        "#;
        let config = FractureConfig::from_toml_str(raw).unwrap();
        assert_eq!(config.max_cracked_blocks, 8);
        assert!(config.allow_damage_break);
        assert_eq!(config.regen_millis(), 5000);
        assert!(!config.projectile(ProjectileKind::Arrow).allowed);
        assert_eq!(config.projectile(ProjectileKind::Arrow).damage, 9);
        // Untouched tables keep their defaults
        assert!(config.projectile(ProjectileKind::Egg).allowed);
        assert_eq!(config.explosion.radius, 4);
        assert!(!config.explosion.destroy_blocks);
    }

    #[test]
    fn test_negative_radius_rejected() {
        let raw = "[explosion]\nradius = -1\n";
        let err = FractureConfig::from_toml_str(raw).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "explosion.radius",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_check_ticks_rejected() {
        let raw = "[regen]\ncheck_ticks = 0\n";
        assert!(FractureConfig::from_toml_str(raw).is_err());
    }

    #[test]
    fn test_tracker_config_projection() {
        let raw = "max_cracked_blocks = 3\nallow_damage_break = true\n[regen]\nseconds = 1\n";
        let tracker = FractureConfig::from_toml_str(raw).unwrap().tracker_config();
        assert_eq!(tracker.max_tracked, 3);
        assert!(tracker.break_on_cap);
        assert_eq!(tracker.regen_millis, 1000);
    }
}
