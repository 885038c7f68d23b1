//! Pointer tracker: cursor position to bounded joint rotations.
//!
//! Horizontal rotation interpolates linearly from 0 at the viewport center to
//! `±limit` at the left/right edges. Looking up is limited to half the range of
//! looking down. Positions outside the viewport are not clamped and extrapolate
//! past the limit.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::config::JointConfig;
use crate::host::{JointHandle, SkeletonHost};
use crate::inputs::{PointerSample, Viewport};

/// Share of the limit available when looking up (cursor above center).
pub const UPWARD_LOOK_FACTOR: f32 = 0.5;

/// Rotation for one joint, in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointAngles {
    /// Rotation about Y; negative toward the left edge.
    pub yaw_deg: f32,
    /// Rotation about X; negative toward the top edge.
    pub pitch_deg: f32,
}

impl JointAngles {
    #[inline]
    pub fn yaw_rad(&self) -> f32 {
        self.yaw_deg.to_radians()
    }

    #[inline]
    pub fn pitch_rad(&self) -> f32 {
        self.pitch_deg.to_radians()
    }
}

/// Map a pointer position to joint angles for a viewport of `width` x `height` pixels.
pub fn compute_angles(x: f32, y: f32, width: f32, height: f32, degree_limit: f32) -> JointAngles {
    let half = width / 2.0;
    let yaw_deg = if x <= half {
        -degree_limit * (half - x) / half
    } else {
        degree_limit * (x - half) / half
    };

    let half_h = height / 2.0;
    let pitch_deg = if y <= half_h {
        -(degree_limit * UPWARD_LOOK_FACTOR) * (half_h - y) / half_h
    } else {
        degree_limit * (y - half_h) / half_h
    };

    JointAngles { yaw_deg, pitch_deg }
}

/// A configured joint and, once the model is loaded, its resolved handle.
#[derive(Clone, Debug, PartialEq)]
pub struct JointBinding {
    pub role: String,
    pub bone: String,
    pub limit_deg: f32,
    pub handle: Option<JointHandle>,
}

impl JointBinding {
    pub fn from_config(cfg: &JointConfig) -> Self {
        Self {
            role: cfg.role.clone(),
            bone: cfg.bone.clone(),
            limit_deg: cfg.limit_deg,
            handle: None,
        }
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    /// Look the bone up in the host; returns whether it was found.
    pub fn resolve(&mut self, host: &mut dyn SkeletonHost) -> bool {
        self.handle = host.find_bone(&self.bone);
        self.handle.is_some()
    }

    pub fn unbind(&mut self) {
        self.handle = None;
    }
}

/// One joint rotation applied by [`track_pointer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointWrite {
    pub role: String,
    pub joint: JointHandle,
    pub yaw_rad: f32,
    pub pitch_rad: f32,
}

/// Rotate every bound joint toward the pointer. Unbound joints are skipped, and an
/// empty viewport produces no writes.
pub fn track_pointer(
    sample: PointerSample,
    viewport: Viewport,
    joints: &[JointBinding],
    host: &mut dyn SkeletonHost,
) -> Vec<JointWrite> {
    if viewport.is_empty() {
        return Vec::new();
    }
    let mut writes = Vec::with_capacity(joints.len());
    for joint in joints {
        let Some(handle) = joint.handle.as_ref() else {
            continue;
        };
        let angles = compute_angles(
            sample.x,
            sample.y,
            viewport.width,
            viewport.height,
            joint.limit_deg,
        );
        let (yaw_rad, pitch_rad) = (angles.yaw_rad(), angles.pitch_rad());
        host.set_joint_rotation(handle, yaw_rad, pitch_rad);
        trace!(
            "joint {} yaw={:.2}deg pitch={:.2}deg",
            joint.role,
            angles.yaw_deg,
            angles.pitch_deg
        );
        writes.push(JointWrite {
            role: joint.role.clone(),
            joint: handle.clone(),
            yaw_rad,
            pitch_rad,
        });
    }
    writes
}
