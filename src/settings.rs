//! Table settings
//!
//! Dimensions and physical coefficients for one table layout. Loaded from JSON
//! or built from a preset; the boundary geometry is derived from these once.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// Table size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TablePreset {
    /// 9ft pool table
    #[default]
    Pool,
    /// 12ft snooker table
    Snooker,
}

impl TablePreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            TablePreset::Pool => "Pool",
            TablePreset::Snooker => "Snooker",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pool" | "9ft" => Some(TablePreset::Pool),
            "snooker" => Some(TablePreset::Snooker),
            _ => None,
        }
    }
}

/// Table dimensions and physics coefficients (SI units, metres and seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
    pub preset: TablePreset,

    // === Ball ===
    /// Ball radius
    pub ball_radius: f32,

    // === Playing surface ===
    /// Half the distance between the short cushion noses
    pub half_length: f32,
    /// Half the distance between the long cushion noses
    pub half_width: f32,

    // === Pockets ===
    /// Distance from the table corner to where a rail ends at a corner pocket
    pub corner_mouth: f32,
    /// How far the corner pocket centre sits beyond the corner along each axis
    pub corner_pocket_offset: f32,
    /// Capture radius of a corner pocket
    pub corner_pocket_radius: f32,
    /// Half the gap in the long rail at a middle pocket
    pub middle_mouth: f32,
    /// How far the middle pocket centre sits beyond the long cushion nose
    pub middle_pocket_offset: f32,
    /// Capture radius of a middle pocket
    pub middle_pocket_radius: f32,
    /// Radius of the rounded rail ends at each pocket mouth
    pub knuckle_radius: f32,

    // === Restitution ===
    pub ball_restitution: f32,
    pub cushion_restitution: f32,
    pub knuckle_restitution: f32,

    // === Friction ===
    /// Sliding friction between ball and cloth
    pub mu_slide: f32,
    /// Rolling resistance
    pub mu_roll: f32,
    /// Spin (vertical axis) friction
    pub mu_spin: f32,
    pub gravity: f32,

    // === Cue ===
    /// Maximum cue ball speed from a strike
    pub max_power: f32,
    /// Maximum tip offset from ball centre, as a fraction of the ball radius
    pub max_offset: f32,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self::from_preset(TablePreset::Pool)
    }
}

impl TableSettings {
    /// Create settings for a preset table
    pub fn from_preset(preset: TablePreset) -> Self {
        match preset {
            TablePreset::Pool => Self {
                preset,
                ball_radius: 0.028575,
                half_length: 1.27,
                half_width: 0.635,
                corner_mouth: 0.09,
                corner_pocket_offset: 0.012,
                corner_pocket_radius: 0.08,
                middle_mouth: 0.057,
                middle_pocket_offset: 0.034,
                middle_pocket_radius: 0.068,
                knuckle_radius: 0.012,
                ball_restitution: 0.95,
                cushion_restitution: 0.75,
                knuckle_restitution: 0.75,
                mu_slide: 0.2,
                mu_roll: 0.01,
                mu_spin: 0.044,
                gravity: 9.8,
                max_power: 8.0,
                max_offset: 0.5,
            },
            TablePreset::Snooker => Self {
                preset,
                ball_radius: 0.02625,
                half_length: 1.7845,
                half_width: 0.889,
                corner_mouth: 0.08,
                corner_pocket_offset: 0.011,
                corner_pocket_radius: 0.07,
                middle_mouth: 0.05,
                middle_pocket_offset: 0.03,
                middle_pocket_radius: 0.06,
                knuckle_radius: 0.01,
                ball_restitution: 0.95,
                cushion_restitution: 0.7,
                knuckle_restitution: 0.7,
                mu_slide: 0.2,
                mu_roll: 0.012,
                mu_spin: 0.044,
                gravity: 9.8,
                max_power: 8.0,
                max_offset: 0.5,
            },
        }
    }

    /// Parse and validate settings from JSON. Missing fields take Pool defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded {} table settings", settings.preset.as_str());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every field is in range
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
            SettingsError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        let positive = [
            ("ball_radius", self.ball_radius),
            ("half_length", self.half_length),
            ("half_width", self.half_width),
            ("corner_pocket_radius", self.corner_pocket_radius),
            ("middle_pocket_radius", self.middle_pocket_radius),
            ("knuckle_radius", self.knuckle_radius),
            ("gravity", self.gravity),
            ("max_power", self.max_power),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        let unit = [
            ("ball_restitution", self.ball_restitution),
            ("cushion_restitution", self.cushion_restitution),
            ("knuckle_restitution", self.knuckle_restitution),
            ("max_offset", self.max_offset),
        ];
        for (field, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("must be within [0, 1], got {value}")));
            }
        }

        let non_negative = [
            ("mu_slide", self.mu_slide),
            ("mu_roll", self.mu_roll),
            ("mu_spin", self.mu_spin),
            ("corner_mouth", self.corner_mouth),
            ("corner_pocket_offset", self.corner_pocket_offset),
            ("middle_mouth", self.middle_mouth),
            ("middle_pocket_offset", self.middle_pocket_offset),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must be non-negative, got {value}")));
            }
        }

        if self.half_width <= 2.0 * self.ball_radius {
            return Err(invalid("half_width", "table narrower than a ball"));
        }
        if self.corner_mouth + self.middle_mouth >= self.half_length {
            return Err(invalid("corner_mouth", "pocket mouths overlap along the long rail"));
        }
        if self.corner_mouth >= self.half_width {
            return Err(invalid("corner_mouth", "corner mouths overlap along the short rail"));
        }

        Ok(())
    }

    /// Half-extent of the region ball centres can occupy along x
    pub fn table_x(&self) -> f32 {
        self.half_length - self.ball_radius
    }

    /// Half-extent of the region ball centres can occupy along y
    pub fn table_y(&self) -> f32 {
        self.half_width - self.ball_radius
    }
}
