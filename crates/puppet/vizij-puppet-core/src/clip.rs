//! Clip descriptions and per-clip track transforms.
//!
//! Some rigs ship clips whose keyframe tracks fight the pointer tracker (for example
//! neck and spine rotations baked into every clip). A [`ClipTransform`] removes those
//! tracks before the clip is handed to the playback host. Splices run in order and each
//! one indexes into the list left by the previous splice.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Loader-side description of one animation clip.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClipInfo {
    pub name: String,
    /// Clip length in seconds.
    #[serde(rename = "duration")]
    pub duration_s: f32,
    /// Keyframe track names in load order.
    #[serde(default)]
    pub tracks: Vec<String>,
}

/// Everything the session needs from a loaded model.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelAsset {
    #[serde(default)]
    pub clips: Vec<ClipInfo>,
}

impl ModelAsset {
    pub fn find_clip(&self, name: &str) -> Option<&ClipInfo> {
        self.clips.iter().find(|c| c.name == name)
    }
}

/// Remove `delete_count` entries starting at `start`.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackSplice {
    pub start: usize,
    pub delete_count: usize,
}

impl TrackSplice {
    pub const fn new(start: usize, delete_count: usize) -> Self {
        Self {
            start,
            delete_count,
        }
    }
}

/// Ordered list of splices applied to a clip's track list.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClipTransform {
    #[serde(default)]
    pub splices: Vec<TrackSplice>,
}

impl ClipTransform {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Drops the spine (3..6) and then neck (9..12 after the first splice) tracks of a
    /// Mixamo rig exported with position/quaternion/scale per bone.
    pub fn mixamo_neck_spine() -> Self {
        Self {
            splices: vec![TrackSplice::new(3, 3), TrackSplice::new(9, 3)],
        }
    }

    pub fn is_identity(&self) -> bool {
        self.splices.iter().all(|s| s.delete_count == 0)
    }

    /// Apply the splices in order. Out-of-range splices are truncated.
    pub fn apply<T>(&self, tracks: &mut Vec<T>) {
        for splice in &self.splices {
            let len = tracks.len();
            if splice.start >= len {
                continue;
            }
            let end = splice.start.saturating_add(splice.delete_count).min(len);
            tracks.drain(splice.start..end);
        }
    }

    /// Original indices that survive the transform, for hosts that own the track arrays.
    pub fn retained_indices(&self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        self.apply(&mut indices);
        indices
    }
}

/// Default transform plus per-clip overrides keyed by clip name.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClipTransforms {
    #[serde(default)]
    pub default: ClipTransform,
    #[serde(default)]
    pub overrides: HashMap<String, ClipTransform>,
}

impl Default for ClipTransforms {
    fn default() -> Self {
        Self {
            default: ClipTransform::mixamo_neck_spine(),
            overrides: HashMap::new(),
        }
    }
}

impl ClipTransforms {
    /// No track editing for any clip.
    pub fn none() -> Self {
        Self {
            default: ClipTransform::identity(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, clip: impl Into<String>, transform: ClipTransform) -> Self {
        self.overrides.insert(clip.into(), transform);
        self
    }

    pub fn for_clip(&self, name: &str) -> &ClipTransform {
        self.overrides.get(name).unwrap_or(&self.default)
    }

    /// Apply the matching transform to a clip's tracks in place.
    pub fn apply_to(&self, clip: &mut ClipInfo) {
        self.for_clip(&clip.name).apply(&mut clip.tracks);
    }
}
