//! Vizij Puppet Core (engine-agnostic)
//!
//! Drives a rigged character from pointer input: the pointer tracker turns cursor
//! positions into bounded neck/waist rotations, and the director plays a random one-shot
//! "trick" clip when the character is clicked, cross-fading from and back to idle.
//! Rendering, asset parsing and hit testing stay with the host; adapters implement the
//! traits in [`host`] and feed events into a [`PuppetSession`].

pub mod clip;
pub mod config;
pub mod director;
pub mod error;
pub mod host;
pub mod ids;
pub mod inputs;
pub mod mixer;
pub mod outputs;
pub mod pointer;
pub mod scheduler;
pub mod session;

// Re-exports for consumers (adapters)
pub use clip::{ClipInfo, ClipTransform, ClipTransforms, ModelAsset, TrackSplice};
pub use config::{BusyRelease, JointConfig, PuppetConfig};
pub use director::{fade_back_delay_ms, Director, DirectorState, TrickClip, TriggerOutcome};
pub use error::{PuppetError, Result};
pub use host::{FrameHost, HitTestHost, JointHandle, PlaybackHost, PuppetHost, SkeletonHost};
pub use ids::{ActionId, TimerId};
pub use inputs::{Ndc, PointerSample, Viewport};
pub use mixer::{Action, LoopMode, Mixer};
pub use outputs::{Outputs, PuppetEvent};
pub use pointer::{compute_angles, track_pointer, JointAngles, JointBinding, JointWrite};
pub use scheduler::Scheduler;
pub use session::{PuppetSession, SessionStatus};
