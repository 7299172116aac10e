use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors raised while loading or validating settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Shape of the lattice. Fixed for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Edge length of one chunk (world units between lattice nodes).
    pub chunk_size: f32,
    /// Chunks populated in each direction around the viewer's chunk.
    pub render_distance: i32,
    /// Cross-section edge of a bar.
    pub bar_thickness: f32,
    /// Horizontal edge of a platform.
    pub platform_width: f32,
    /// Vertical thickness of a platform.
    pub platform_thickness: f32,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            chunk_size: 64.0,
            render_distance: 6,
            bar_thickness: 3.0,
            platform_width: 7.5,
            platform_thickness: 3.0,
        }
    }
}

impl LatticeConfig {
    /// Number of lattice nodes along one axis: `2R + 1`.
    pub fn span(&self) -> usize {
        (2 * self.render_distance + 1) as usize
    }

    /// Length of a bar along its own axis.
    pub fn bar_length(&self) -> f32 {
        self.chunk_size * self.render_distance as f32 * 2.0
    }

    /// Total pool slots: `(2R+1)^2 * 3` bars plus `(2R+1)^3` platforms.
    pub fn element_count(&self) -> usize {
        let n = self.span();
        n * n * 3 + n * n * n
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.chunk_size) {
            return Err(ConfigError::Invalid {
                field: "chunk_size",
                reason: "must be a positive finite number",
            });
        }
        if self.render_distance < 0 {
            return Err(ConfigError::Invalid {
                field: "render_distance",
                reason: "must not be negative",
            });
        }
        if !positive(self.bar_thickness) {
            return Err(ConfigError::Invalid {
                field: "bar_thickness",
                reason: "must be positive",
            });
        }
        if !positive(self.platform_width) || !positive(self.platform_thickness) {
            return Err(ConfigError::Invalid {
                field: "platform",
                reason: "platform extents must be positive",
            });
        }
        Ok(())
    }
}

/// Constants of the motion integrator and the ground probe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Horizontal speed in units per second.
    pub walk_speed: f32,
    /// Downward acceleration while airborne.
    pub gravity: f32,
    /// Lowest vertical velocity reachable by falling (negative).
    pub terminal_velocity: f32,
    /// Height above the viewer's feet where the ground ray starts.
    pub probe_lift: f32,
    /// Maximum travel of the ground ray.
    pub probe_distance: f32,
    /// Resting eye height above the viewer's feet.
    pub eye_height: f32,
    pub bob_frequency: f32,
    pub bob_amplitude: f32,
    /// Radians of yaw/pitch per pixel of pointer motion.
    pub look_sensitivity: f32,
    /// Upper bound on a single frame's delta. `None` leaves delta unclamped.
    pub max_frame_delta: Option<f32>,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            gravity: 9.81,
            terminal_velocity: -80.0,
            probe_lift: 1.0,
            probe_distance: 1.0,
            eye_height: 2.0,
            bob_frequency: 12.5,
            bob_amplitude: 0.07,
            look_sensitivity: 0.002 * 0.6,
            max_frame_delta: None,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive(self.walk_speed) {
            return Err(ConfigError::Invalid {
                field: "walk_speed",
                reason: "must be positive",
            });
        }
        for (field, value) in [
            ("gravity", self.gravity),
            ("probe_lift", self.probe_lift),
            ("eye_height", self.eye_height),
        ] {
            if !non_negative(value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must be finite and not negative",
                });
            }
        }
        if self.terminal_velocity > 0.0 {
            return Err(ConfigError::Invalid {
                field: "terminal_velocity",
                reason: "must be zero or negative",
            });
        }
        if !positive(self.probe_distance) {
            return Err(ConfigError::Invalid {
                field: "probe_distance",
                reason: "must be positive",
            });
        }
        if let Some(max) = self.max_frame_delta {
            if !positive(max) {
                return Err(ConfigError::Invalid {
                    field: "max_frame_delta",
                    reason: "must be positive when set",
                });
            }
        }
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn non_negative(v: f32) -> bool {
    v.is_finite() && v >= 0.0
}

/// Everything a host needs to build a world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lattice: LatticeConfig,
    pub physics: PhysicsConfig,
}

impl Settings {
    /// Read settings from a JSON file. Missing fields fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.lattice.validate()?;
        self.physics.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_defaults() {
        let c = LatticeConfig::default();
        assert_eq!(c.chunk_size, 64.0);
        assert_eq!(c.render_distance, 6);
        assert_eq!(c.span(), 13);
        assert_eq!(c.bar_length(), 768.0);
    }

    #[test]
    fn element_count_matches_formula() {
        let c = LatticeConfig::default();
        assert_eq!(c.element_count(), 13 * 13 * 3 + 13 * 13 * 13);

        let tiny = LatticeConfig {
            render_distance: 0,
            ..LatticeConfig::default()
        };
        assert_eq!(tiny.element_count(), 4);
    }

    #[test]
    fn physics_defaults() {
        let p = PhysicsConfig::default();
        assert_eq!(p.walk_speed, 4.0);
        assert_eq!(p.gravity, 9.81);
        assert_eq!(p.terminal_velocity, -80.0);
        assert!(p.max_frame_delta.is_none());
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let c = LatticeConfig {
            chunk_size: 0.0,
            ..LatticeConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Invalid { field: "chunk_size", .. })
        ));
    }

    #[test]
    fn rejects_negative_render_distance() {
        let c = LatticeConfig {
            render_distance: -1,
            ..LatticeConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{ "lattice": { "render_distance": 2 } }"#).unwrap();
        assert_eq!(s.lattice.render_distance, 2);
        assert_eq!(s.lattice.chunk_size, 64.0);
        assert_eq!(s.physics, PhysicsConfig::default());
    }

    #[test]
    fn invalid_json_values_rejected() {
        let err = Settings::from_json(r#"{ "physics": { "max_frame_delta": 0.0 } }"#);
        assert!(err.is_err());
    }

    #[test]
    fn rejects_stalled_walk_speed() {
        let p = PhysicsConfig {
            walk_speed: 0.0,
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            p.validate(),
            Err(ConfigError::Invalid { field: "walk_speed", .. })
        ));
    }

    #[test]
    fn rejects_upward_or_nan_gravity() {
        for gravity in [-9.81, f32::NAN] {
            let p = PhysicsConfig {
                gravity,
                ..PhysicsConfig::default()
            };
            assert!(matches!(
                p.validate(),
                Err(ConfigError::Invalid { field: "gravity", .. })
            ));
        }
    }

    #[test]
    fn rejects_negative_probe_lift_and_eye_height() {
        let lift = PhysicsConfig {
            probe_lift: -1.0,
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            lift.validate(),
            Err(ConfigError::Invalid { field: "probe_lift", .. })
        ));

        let eye = PhysicsConfig {
            eye_height: f32::INFINITY,
            ..PhysicsConfig::default()
        };
        assert!(matches!(
            eye.validate(),
            Err(ConfigError::Invalid { field: "eye_height", .. })
        ));
    }

    #[test]
    fn zero_gravity_is_allowed() {
        let p = PhysicsConfig {
            gravity: 0.0,
            ..PhysicsConfig::default()
        };
        assert!(p.validate().is_ok());
    }

    #[test]
    fn negative_gravity_in_json_rejected() {
        assert!(Settings::from_json(r#"{ "physics": { "gravity": -9.81 } }"#).is_err());
    }

    #[test]
    fn malformed_json_is_error() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }
}
