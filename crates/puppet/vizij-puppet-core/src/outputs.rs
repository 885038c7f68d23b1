//! Output contracts from the session.
//!
//! Joint rotations and playback commands go straight to the host; outputs carry the
//! semantic events collected since the previous frame plus a snapshot of the director.

use serde::{Deserialize, Serialize};

use crate::director::DirectorState;

/// Discrete signals emitted by the session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[non_exhaustive]
pub enum PuppetEvent {
    ModelReady {
        tricks: usize,
        joints_bound: usize,
    },
    ModelFailed {
        reason: String,
    },
    TrickStarted {
        clip: String,
        index: usize,
        fade_back_in_ms: f64,
    },
    /// A click hit the target while a trick was still running.
    TrickIgnored,
    FadeBackStarted {
        clip: String,
    },
    /// New clicks are accepted again.
    Released,
}

/// Outputs returned by `PuppetSession::frame()`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Outputs {
    #[serde(default)]
    pub events: Vec<PuppetEvent>,
    #[serde(default)]
    pub busy: bool,
    #[serde(default)]
    pub state: Option<DirectorState>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.events.clear();
        self.busy = false;
        self.state = None;
    }

    #[inline]
    pub fn push_event(&mut self, event: PuppetEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
