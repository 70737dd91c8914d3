use mt_mask::{ClassificationRule, LumaPolarity};
use mt_skeleton::{CycleSearchConfig, SkeletonGraphConfig};
use serde::{Deserialize, Serialize};

use crate::error::TrackError;
use crate::model::MIN_TRACK_POINTS;

/// How mask pixels are told apart from background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    /// Alpha above `threshold`.
    #[default]
    Alpha,
    /// Luma above `threshold`: light track on dark ground.
    Luminance,
    /// Luma below `threshold`: dark track on light ground.
    LuminanceDark,
    /// Every channel within `toleranceEpsilon` of `trackColor`.
    ExactColor,
}

/// Extraction settings. Every field has a default, so a JSON config only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TrackConfig {
    pub classification_rule: RuleKind,
    pub threshold: u8,
    pub track_color: [u8; 4],
    pub tolerance_epsilon: u8,
    /// Radius of the open-then-close pass run before thinning. `0` disables it.
    pub denoise_radius: usize,
    pub min_component_size: usize,
    pub max_cycle_search_steps: usize,
    pub resample_point_count: usize,
    pub checkpoint_count: usize,
    pub smoothing_window: usize,
    pub smoothing_passes: usize,
    /// Pixels.
    pub min_track_length: f32,
    /// Pixels.
    pub min_width: f32,
    pub uniform_width: bool,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            classification_rule: RuleKind::Alpha,
            threshold: 127,
            track_color: [255, 255, 255, 255],
            tolerance_epsilon: 0,
            denoise_radius: 0,
            min_component_size: 8,
            max_cycle_search_steps: 1_000_000,
            resample_point_count: 128,
            checkpoint_count: 8,
            smoothing_window: 5,
            smoothing_passes: 2,
            min_track_length: 20.0,
            min_width: 0.5,
            uniform_width: false,
        }
    }
}

impl TrackConfig {
    pub fn rule(&self) -> ClassificationRule {
        match self.classification_rule {
            RuleKind::Alpha => ClassificationRule::AlphaThreshold {
                threshold: self.threshold,
            },
            RuleKind::Luminance => ClassificationRule::LuminanceThreshold {
                threshold: self.threshold,
                polarity: LumaPolarity::Bright,
            },
            RuleKind::LuminanceDark => ClassificationRule::LuminanceThreshold {
                threshold: self.threshold,
                polarity: LumaPolarity::Dark,
            },
            RuleKind::ExactColor => ClassificationRule::ExactColor {
                color: self.track_color,
                tolerance: self.tolerance_epsilon,
            },
        }
    }

    pub fn skeleton_graph_config(&self) -> SkeletonGraphConfig {
        SkeletonGraphConfig {
            min_component_size: self.min_component_size,
        }
    }

    pub fn cycle_search_config(&self) -> CycleSearchConfig {
        CycleSearchConfig {
            max_steps: self.max_cycle_search_steps,
        }
    }

    pub fn validate(&self) -> Result<(), TrackError> {
        let fail = |msg: String| Err(TrackError::InvalidConfig(msg));

        if self.resample_point_count < MIN_TRACK_POINTS {
            return fail(format!(
                "resamplePointCount must be at least {MIN_TRACK_POINTS}, got {}",
                self.resample_point_count
            ));
        }
        if self.checkpoint_count == 0 || self.checkpoint_count > self.resample_point_count {
            return fail(format!(
                "checkpointCount must be in 1..={}, got {}",
                self.resample_point_count, self.checkpoint_count
            ));
        }
        if self.smoothing_window == 0 {
            return fail("smoothingWindow must be at least 1".to_owned());
        }
        if self.max_cycle_search_steps == 0 {
            return fail("maxCycleSearchSteps must be positive".to_owned());
        }
        if !(self.min_track_length.is_finite() && self.min_track_length >= 0.0) {
            return fail(format!(
                "minTrackLength must be finite and non-negative, got {}",
                self.min_track_length
            ));
        }
        if !(self.min_width.is_finite() && self.min_width >= 0.0) {
            return fail(format!(
                "minWidth must be finite and non-negative, got {}",
                self.min_width
            ));
        }

        Ok(())
    }
}
