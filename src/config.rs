//! Composition configuration.
//!
//! One explicit snapshot of every knob, passed into each pipeline call. Nothing
//! in the pipeline reads ambient state mid-flight; a composition sees exactly the
//! values its caller handed it.

use crate::assets::store::validate_asset_name;
use crate::foundation::error::{VoxweaveError, VoxweaveResult};

/// Supported narration voices (closed catalog).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Voice {
    Marek,
    Zofia,
}

impl Voice {
    /// Identifier the speech service expects for this voice.
    pub fn service_id(self) -> &'static str {
        match self {
            Voice::Marek => "pl-PL-MarekNeural",
            Voice::Zofia => "pl-PL-ZofiaNeural",
        }
    }

    /// The full catalog, in display order.
    pub fn all() -> &'static [Voice] {
        &[Voice::Marek, Voice::Zofia]
    }
}

impl std::fmt::Display for Voice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Voice::Marek => f.write_str("Marek"),
            Voice::Zofia => f.write_str("Zofia"),
        }
    }
}

/// Convert a background volume percentage to its decibel delta.
///
/// 100% leaves the bed unchanged (0 dB); the mapping is symmetric around it
/// (50% ⇒ -50 dB, 150% ⇒ +50 dB).
pub fn volume_gain_db(volume_percent: u32) -> f64 {
    f64::from(volume_percent) - 100.0
}

/// Per-composition knob snapshot.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    pub voice: Voice,
    pub tempo_percent: i32, // -30..=30
    pub fade_in_ms: u64,
    pub fade_out_ms: u64,
    pub start_delay_ms: u64,
    pub end_delay_ms: u64,
    pub background_volume_percent: u32, // 0..=150, 100 = unchanged
    pub background: Option<String>,     // catalog stem; None = voice only
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            voice: Voice::Marek,
            tempo_percent: 0,
            fade_in_ms: 3000,
            fade_out_ms: 3000,
            start_delay_ms: 0,
            end_delay_ms: 0,
            background_volume_percent: 50,
            background: None,
        }
    }
}

impl CompositionConfig {
    pub fn validate(&self) -> VoxweaveResult<()> {
        if !(-30..=30).contains(&self.tempo_percent) {
            return Err(VoxweaveError::validation(
                "tempo_percent must be within -30..=30",
            ));
        }
        if self.background_volume_percent > 150 {
            return Err(VoxweaveError::validation(
                "background_volume_percent must be within 0..=150",
            ));
        }
        if let Some(name) = &self.background {
            validate_asset_name(name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_catalog_maps_to_service_ids() {
        assert_eq!(Voice::Marek.service_id(), "pl-PL-MarekNeural");
        assert_eq!(Voice::Zofia.service_id(), "pl-PL-ZofiaNeural");
        assert_eq!(Voice::all().len(), 2);
    }

    #[test]
    fn volume_conversion_is_monotonic_and_symmetric_around_100() {
        assert_eq!(volume_gain_db(100), 0.0);
        assert_eq!(volume_gain_db(0), -100.0);
        assert_eq!(volume_gain_db(50), -50.0);
        assert_eq!(volume_gain_db(150), 50.0);
        assert_eq!(volume_gain_db(50), -volume_gain_db(150));
        for v in 0..150 {
            assert!(volume_gain_db(v) < volume_gain_db(v + 1));
        }
    }

    #[test]
    fn defaults_match_the_studio_panel() {
        let cfg = CompositionConfig::default();
        assert_eq!(cfg.voice, Voice::Marek);
        assert_eq!(cfg.tempo_percent, 0);
        assert_eq!(cfg.fade_in_ms, 3000);
        assert_eq!(cfg.fade_out_ms, 3000);
        assert_eq!(cfg.start_delay_ms, 0);
        assert_eq!(cfg.end_delay_ms, 0);
        assert_eq!(cfg.background_volume_percent, 50);
        assert!(cfg.background.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_knobs() {
        let mut cfg = CompositionConfig::default();
        cfg.tempo_percent = 31;
        assert!(cfg.validate().is_err());

        let mut cfg = CompositionConfig::default();
        cfg.tempo_percent = -31;
        assert!(cfg.validate().is_err());

        let mut cfg = CompositionConfig::default();
        cfg.background_volume_percent = 151;
        assert!(cfg.validate().is_err());

        let mut cfg = CompositionConfig::default();
        cfg.background = Some("a/b".to_string());
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_plan_json_fills_defaults() {
        let cfg: CompositionConfig =
            serde_json::from_str(r#"{ "voice": "Zofia", "background": "rain" }"#).unwrap();
        assert_eq!(cfg.voice, Voice::Zofia);
        assert_eq!(cfg.background.as_deref(), Some("rain"));
        assert_eq!(cfg.fade_in_ms, 3000);
    }
}
