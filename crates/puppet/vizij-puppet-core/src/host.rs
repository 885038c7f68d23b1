//! Host capability traits.
//!
//! The core never owns the scene graph, the clip data or the renderer. Adapters (web,
//! native engines, tests) implement these traits and pass themselves into the session.

use crate::clip::ClipInfo;
use crate::ids::ActionId;
use crate::inputs::Ndc;
use crate::mixer::LoopMode;

/// Opaque joint handle (small string key chosen by the host).
pub type JointHandle = String;

/// Bone lookup and joint rotation writes on the externally owned model hierarchy.
pub trait SkeletonHost {
    /// Resolve a bone node by name within the loaded model.
    fn find_bone(&mut self, name: &str) -> Option<JointHandle>;

    /// Write the joint's Y (yaw) and X (pitch) local rotation components, in radians.
    fn set_joint_rotation(&mut self, joint: &JointHandle, yaw_rad: f32, pitch_rad: f32);
}

/// Per-clip playback controls. Blending math lives in the host.
pub trait PlaybackHost {
    /// Create (or look up) the action for a clip. None if the host cannot play it.
    fn clip_action(&mut self, clip: &ClipInfo) -> Option<ActionId>;
    /// Length of the action's clip in seconds, if known.
    fn duration(&self, action: ActionId) -> Option<f32>;
    fn set_loop(&mut self, action: ActionId, mode: LoopMode);
    /// Rewind to the start, re-enable at full weight and drop any running fade or warp.
    fn reset(&mut self, action: ActionId);
    fn play(&mut self, action: ActionId);
    fn set_enabled(&mut self, action: ActionId, enabled: bool);
    /// Fade `from` out and `to` in over `duration_s`; `warp` also ramps their time scales.
    fn cross_fade(&mut self, from: ActionId, to: ActionId, duration_s: f32, warp: bool);
    /// Advance animation time by `dt` seconds.
    fn update(&mut self, dt: f32);
}

/// Front-most object under a viewport coordinate.
pub trait HitTestHost {
    fn pick(&mut self, ndc: Ndc) -> Option<String>;
}

/// Per-frame rendering hook, called after playback has advanced.
pub trait FrameHost {
    fn render(&mut self) {}
}

/// Everything a session needs from its host.
pub trait PuppetHost: SkeletonHost + PlaybackHost + HitTestHost + FrameHost {}

impl<T> PuppetHost for T where T: SkeletonHost + PlaybackHost + HitTestHost + FrameHost {}
