//! Session configuration.
//!
//! Defaults reproduce the Stacy demo rig: neck/spine bones from a Mixamo skeleton,
//! a clickable mesh named `stacy`, an `idle` clip and 0.25 s cross-fades.

use serde::{Deserialize, Serialize};

use crate::clip::ClipTransforms;
use crate::error::{PuppetError, Result};

/// One pointer-tracked joint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JointConfig {
    /// Logical role, used in logs and outputs (e.g. "neck").
    pub role: String,
    /// Bone node name in the model hierarchy.
    pub bone: String,
    /// Maximum horizontal rotation in degrees at the viewport edge.
    pub limit_deg: f32,
}

impl JointConfig {
    pub fn new(role: impl Into<String>, bone: impl Into<String>, limit_deg: f32) -> Self {
        Self {
            role: role.into(),
            bone: bone.into(),
            limit_deg,
        }
    }
}

/// When a triggered trick stops blocking new clicks.
#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BusyRelease {
    /// Release as soon as the fade back to idle starts; a click may interrupt the fade.
    #[default]
    AtFadeOutStart,
    /// Release once the fade back to idle has finished.
    AfterFadeOut,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PuppetConfig {
    /// Joints updated on every pointer move, in application order.
    pub joints: Vec<JointConfig>,
    /// Hit-test name that triggers a trick when clicked.
    pub target_name: String,
    /// Clip looped while no trick is playing; every other clip is a trick.
    pub idle_clip: String,
    /// Cross-fade from idle into a trick, seconds.
    pub fade_in_s: f32,
    /// Cross-fade from a trick back to idle, seconds.
    pub fade_out_s: f32,
    /// Ramp time scales during cross-fades.
    pub warp: bool,
    pub busy_release: BusyRelease,
    pub clip_transforms: ClipTransforms,
    /// Seed for the trick picker. When unset, every session uses `DEFAULT_SEED` and plays
    /// the same trick sequence; hosts that want a different sequence per run pass one
    /// (the wasm adapter seeds from `Math.random()`).
    pub seed: Option<u64>,
}

impl Default for PuppetConfig {
    fn default() -> Self {
        Self {
            joints: vec![
                JointConfig::new("neck", "mixamorigNeck", 50.0),
                JointConfig::new("waist", "mixamorigSpine", 30.0),
            ],
            target_name: "stacy".to_string(),
            idle_clip: "idle".to_string(),
            fade_in_s: 0.25,
            fade_out_s: 0.25,
            warp: true,
            busy_release: BusyRelease::default(),
            clip_transforms: ClipTransforms::default(),
            seed: None,
        }
    }
}

impl PuppetConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PuppetError::InvalidConfig {
            reason: e.to_string(),
        })
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(PuppetError::InvalidConfig { reason });
        for (label, fade) in [("fade_in_s", self.fade_in_s), ("fade_out_s", self.fade_out_s)] {
            if !fade.is_finite() || fade < 0.0 {
                return invalid(format!("{label} must be finite and >= 0, got {fade}"));
            }
        }
        if self.target_name.is_empty() {
            return invalid("target_name must not be empty".into());
        }
        if self.idle_clip.is_empty() {
            return invalid("idle_clip must not be empty".into());
        }
        for joint in &self.joints {
            if joint.bone.is_empty() {
                return invalid(format!("joint '{}' has an empty bone name", joint.role));
            }
            if !joint.limit_deg.is_finite() || joint.limit_deg <= 0.0 {
                return invalid(format!(
                    "joint '{}' limit must be finite and > 0, got {}",
                    joint.role, joint.limit_deg
                ));
            }
        }
        Ok(())
    }
}
