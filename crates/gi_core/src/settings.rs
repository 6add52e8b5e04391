//! Render settings shared by scene files, the renderer and the viewer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tone-reproduction operator applied to the radiance buffer every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneOperator {
    /// Linear scale by 255.
    None,
    /// Ward's contrast-based scale factor.
    #[default]
    Ward,
    /// Reinhard's global photographic operator.
    Reinhard,
    /// Drago et al. adaptive logarithmic mapping.
    AdaptiveLogarithmic,
}

/// What a surface point looks like when the light is occluded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadowShading {
    /// Keep the ambient Phong term only.
    #[default]
    Ambient,
    /// Pure black.
    Black,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown tone operator '{0}' (expected none, ward, reinhard or adaptive_logarithmic)")]
pub struct UnknownToneOperator(pub String);

impl FromStr for ToneOperator {
    type Err = UnknownToneOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "ward" => Ok(Self::Ward),
            "reinhard" => Ok(Self::Reinhard),
            "adaptive_logarithmic" | "adaptive-logarithmic" | "drago" => {
                Ok(Self::AdaptiveLogarithmic)
            }
            _ => Err(UnknownToneOperator(s.to_string())),
        }
    }
}

impl fmt::Display for ToneOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Ward => "ward",
            Self::Reinhard => "reinhard",
            Self::AdaptiveLogarithmic => "adaptive_logarithmic",
        };
        f.write_str(name)
    }
}

/// Per-session render settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Recursion depth at which reflection and transmission stop
    pub max_depth: u32,
    /// Color returned by rays that hit nothing (linear RGB)
    pub background: [f32; 3],
    /// Tone operator applied after tracing
    pub tone_operator: ToneOperator,
    /// Shading used for points the light can't see
    pub shadow_shading: ShadowShading,
    /// Distance the camera moves per movement command
    pub movement_step: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_depth: 6,
            background: [0.0, 0.0, 0.0],
            tone_operator: ToneOperator::Ward,
            shadow_shading: ShadowShading::Ambient,
            movement_step: 0.01,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_operator_from_str() {
        assert_eq!("ward".parse::<ToneOperator>(), Ok(ToneOperator::Ward));
        assert_eq!("Reinhard".parse::<ToneOperator>(), Ok(ToneOperator::Reinhard));
        assert_eq!("drago".parse::<ToneOperator>(), Ok(ToneOperator::AdaptiveLogarithmic));
        assert_eq!("none".parse::<ToneOperator>(), Ok(ToneOperator::None));
        assert!("filmic".parse::<ToneOperator>().is_err());
    }

    #[test]
    fn test_tone_operator_display_round_trips() {
        for op in [
            ToneOperator::None,
            ToneOperator::Ward,
            ToneOperator::Reinhard,
            ToneOperator::AdaptiveLogarithmic,
        ] {
            assert_eq!(op.to_string().parse::<ToneOperator>(), Ok(op));
        }
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "tone_operator": "reinhard", "max_depth": 2 }"#).unwrap();

        assert_eq!(settings.tone_operator, ToneOperator::Reinhard);
        assert_eq!(settings.max_depth, 2);
        assert_eq!(settings.shadow_shading, ShadowShading::Ambient);
        assert_eq!(settings.movement_step, 0.01);
    }
}
