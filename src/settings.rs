//! Designer-tunable settings for the ring and cube actors
//!
//! Loaded from JSON; any missing field falls back to its default.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::LIGHT_SPEED;

/// How block anchors follow the parent each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReprojectMode {
    /// Reapply the current parent transform to the generation-time local values
    #[default]
    Absolute,
    /// Go world → local through last tick's transform, then back to world
    Incremental,
}

impl ReprojectMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReprojectMode::Absolute => "absolute",
            ReprojectMode::Incremental => "incremental",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "absolute" | "abs" => Some(ReprojectMode::Absolute),
            "incremental" | "inc" => Some(ReprojectMode::Incremental),
            _ => None,
        }
    }
}

/// Ring actor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingSettings {
    // === Geometry ===
    /// Radius of the torus ring
    pub major_radius: f32,
    /// Radius of the torus tube
    pub minor_radius: f32,
    /// Number of major-circle steps (instances = total_blocks * 6)
    pub total_blocks: usize,

    // === Lights ===
    /// Blocks within this many degrees of a marker are lit
    pub influence_range: f32,
    /// Marker sweep speed (degrees/sec)
    pub light_speed: f32,
    /// Upper bound of a lit block's random bounce target
    pub max_bounce_height: f32,
    /// Light height interpolation rate
    pub bounce_speed: f32,

    // === Pulse ===
    /// Upper bound of the timer pulse's random raise
    pub raise_height: f32,
    /// Seconds between "raise all" pulses
    pub pulse_interval: f32,
    /// Seconds a pulse keeps a block raised
    pub pulse_duration: f32,

    // === Simulation ===
    pub reprojection: ReprojectMode,
    /// Seed for the ring's RNG
    pub seed: u64,
}

impl Default for RingSettings {
    fn default() -> Self {
        Self {
            major_radius: 500.0,
            minor_radius: 50.0,
            total_blocks: 120,

            influence_range: 10.0,
            light_speed: LIGHT_SPEED,
            max_bounce_height: 50.0,
            bounce_speed: 300.0,

            raise_height: 50.0,
            pulse_interval: 2.0,
            pulse_duration: 1.0,

            reprojection: ReprojectMode::Absolute,
            seed: 0x5EED,
        }
    }
}

impl RingSettings {
    pub const MIN_MAJOR_RADIUS: f32 = 100.0;
    pub const MIN_MINOR_RADIUS: f32 = 10.0;
    pub const MIN_BOUNCE_SPEED: f32 = 0.1;
    /// Shortest allowed pulse interval, so a pulse can never re-arm every tick
    pub const MIN_PULSE_INTERVAL: f32 = 0.01;
    /// Largest ring accepted (600k instances); keeps block ids well inside u32
    pub const MAX_TOTAL_BLOCKS: usize = 100_000;

    /// Parse settings from JSON and clamp them into range
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded ring settings ({} blocks)", settings.total_blocks);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject non-finite values and clamp designer minimums
    pub fn validate(&mut self) -> Result<(), SettingsError> {
        let fields = [
            ("major_radius", self.major_radius),
            ("minor_radius", self.minor_radius),
            ("influence_range", self.influence_range),
            ("light_speed", self.light_speed),
            ("max_bounce_height", self.max_bounce_height),
            ("bounce_speed", self.bounce_speed),
            ("raise_height", self.raise_height),
            ("pulse_interval", self.pulse_interval),
            ("pulse_duration", self.pulse_duration),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SettingsError::Invalid {
                    field: name,
                    reason: "must be finite",
                });
            }
        }

        if self.total_blocks > Self::MAX_TOTAL_BLOCKS {
            return Err(SettingsError::Invalid {
                field: "total_blocks",
                reason: "exceeds MAX_TOTAL_BLOCKS",
            });
        }

        self.major_radius = self.major_radius.max(Self::MIN_MAJOR_RADIUS);
        self.minor_radius = self.minor_radius.max(Self::MIN_MINOR_RADIUS);
        self.bounce_speed = self.bounce_speed.max(Self::MIN_BOUNCE_SPEED);
        self.pulse_interval = self.pulse_interval.max(Self::MIN_PULSE_INTERVAL);
        self.pulse_duration = self.pulse_duration.max(0.0);
        self.max_bounce_height = self.max_bounce_height.max(0.0);
        self.raise_height = self.raise_height.max(0.0);
        self.light_speed = self.light_speed.abs();
        Ok(())
    }

    /// Instances the lattice will produce
    pub fn instance_count(&self) -> usize {
        self.total_blocks * crate::consts::MINOR_SEGMENTS
    }
}

/// Bouncing cube settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CubeSettings {
    /// Peak vertical offset
    pub amplitude: f32,
    /// Oscillations per second
    pub frequency: f32,
}

impl Default for CubeSettings {
    fn default() -> Self {
        Self {
            amplitude: 100.0,
            frequency: 1.0,
        }
    }
}

/// Errors from loading or validating settings
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {e}"),
            SettingsError::Invalid { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            SettingsError::Invalid { .. } => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(e: serde_json::Error) -> Self {
        SettingsError::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = RingSettings::default();
        assert_eq!(s.major_radius, 500.0);
        assert_eq!(s.minor_radius, 50.0);
        assert_eq!(s.total_blocks, 120);
        assert_eq!(s.influence_range, 10.0);
        assert_eq!(s.raise_height, 50.0);
        assert_eq!(s.max_bounce_height, 50.0);
        assert_eq!(s.bounce_speed, 300.0);
        assert_eq!(s.light_speed, 90.0);
        assert_eq!(s.pulse_interval, 2.0);
        assert_eq!(s.pulse_duration, 1.0);
        assert_eq!(s.instance_count(), 720);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = RingSettings::from_json(r#"{ "total_blocks": 12, "reprojection": "incremental" }"#)
            .unwrap();
        assert_eq!(s.total_blocks, 12);
        assert_eq!(s.reprojection, ReprojectMode::Incremental);
        assert_eq!(s.major_radius, 500.0);
    }

    #[test]
    fn test_validate_clamps_minimums() {
        let s = RingSettings::from_json(
            r#"{ "major_radius": 5.0, "minor_radius": 1.0, "bounce_speed": 0.0 }"#,
        )
        .unwrap();
        assert_eq!(s.major_radius, RingSettings::MIN_MAJOR_RADIUS);
        assert_eq!(s.minor_radius, RingSettings::MIN_MINOR_RADIUS);
        assert_eq!(s.bounce_speed, RingSettings::MIN_BOUNCE_SPEED);
    }

    #[test]
    fn test_huge_block_count_is_rejected() {
        let err = RingSettings::from_json(r#"{ "total_blocks": 4611686018427387904 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "total_blocks", .. }));

        let at_cap = format!(r#"{{ "total_blocks": {} }}"#, RingSettings::MAX_TOTAL_BLOCKS);
        assert!(RingSettings::from_json(&at_cap).is_ok());
    }

    #[test]
    fn test_validate_rejects_nan() {
        let mut s = RingSettings {
            bounce_speed: f32::NAN,
            ..RingSettings::default()
        };
        assert!(matches!(s.validate(), Err(SettingsError::Invalid { field: "bounce_speed", .. })));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = RingSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_json_roundtrip_preserves_mode() {
        let mut s = RingSettings::default();
        s.reprojection = ReprojectMode::Incremental;
        let back = RingSettings::from_json(&s.to_json().unwrap()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_reproject_mode_from_str() {
        assert_eq!(ReprojectMode::from_str("ABS"), Some(ReprojectMode::Absolute));
        assert_eq!(ReprojectMode::from_str("incremental"), Some(ReprojectMode::Incremental));
        assert_eq!(ReprojectMode::from_str("sideways"), None);
        assert_eq!(ReprojectMode::Incremental.as_str(), "incremental");
    }
}
