//! Animation director: click-triggered one-shot tricks cross-faded from and back to idle.
//!
//! ```text
//! Idle --click--> TransitioningIn --fade_in--> PlayingOnce --timer--> TransitioningOut --fade_out--> Idle
//! ```
//!
//! A trigger is accepted only while the busy flag is clear. The fade-back timer is armed
//! at trigger time to land `fade_in + fade_out` before the clip's natural end, and its
//! handle is kept so `reset` can cancel it.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{BusyRelease, PuppetConfig};
use crate::error::{PuppetError, Result};
use crate::host::PlaybackHost;
use crate::ids::{ActionId, TimerId};
use crate::mixer::LoopMode;
use crate::outputs::{Outputs, PuppetEvent};
use crate::scheduler::Scheduler;

/// Seed used when the config does not provide one.
pub const DEFAULT_SEED: u64 = 0x5EED_0F_5AC7;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorState {
    /// Idle looping at full weight.
    #[default]
    Idle,
    /// Cross-fading from idle into the picked trick.
    TransitioningIn,
    PlayingOnce,
    /// Cross-fading from the trick back to idle. With [`BusyRelease::AtFadeOutStart`] the
    /// busy flag is already clear in this state, so a click can start a new trick before
    /// the fade reaches `Idle`.
    TransitioningOut,
}

/// A clip that can be played on click.
#[derive(Clone, Debug, PartialEq)]
pub struct TrickClip {
    pub name: String,
    pub action: ActionId,
    pub duration_s: f32,
}

/// Result of a click on (or near) the character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerOutcome {
    Started { index: usize },
    /// A trick is already running; the click was dropped.
    Busy,
    /// The click did not hit the target.
    Missed,
    /// No model is bound yet.
    NotReady,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum DirectorTimer {
    FadeBack { index: usize },
    Release,
}

/// Delay between trigger and fade-back, in milliseconds. Never negative.
pub fn fade_back_delay_ms(clip_duration_s: f32, fade_in_s: f32, fade_out_s: f32) -> f64 {
    let ms = (clip_duration_s as f64 - (fade_in_s as f64 + fade_out_s as f64)) * 1000.0;
    ms.max(0.0)
}

#[derive(Debug)]
pub struct Director {
    idle: ActionId,
    tricks: Vec<TrickClip>,
    fade_in_s: f32,
    fade_out_s: f32,
    warp: bool,
    busy_release: BusyRelease,

    busy: bool,
    state: DirectorState,
    phase_elapsed: f32,
    active: Option<usize>,
    pending: Option<TimerId>,
    timers: Scheduler<DirectorTimer>,
    rng: StdRng,
}

impl Director {
    /// Build a director over already-registered actions. An empty trick list is a setup
    /// error: there would be nothing to pick on click.
    pub fn new(idle: ActionId, tricks: Vec<TrickClip>, cfg: &PuppetConfig) -> Result<Self> {
        if tricks.is_empty() {
            return Err(PuppetError::NoTrickClips {
                idle: cfg.idle_clip.clone(),
            });
        }
        Ok(Self {
            idle,
            tricks,
            fade_in_s: cfg.fade_in_s,
            fade_out_s: cfg.fade_out_s,
            warp: cfg.warp,
            busy_release: cfg.busy_release,
            busy: false,
            state: DirectorState::Idle,
            phase_elapsed: 0.0,
            active: None,
            pending: None,
            timers: Scheduler::new(),
            rng: StdRng::seed_from_u64(cfg.seed.unwrap_or(DEFAULT_SEED)),
        })
    }

    #[inline]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    #[inline]
    pub fn state(&self) -> DirectorState {
        self.state
    }

    pub fn idle(&self) -> ActionId {
        self.idle
    }

    pub fn tricks(&self) -> &[TrickClip] {
        &self.tricks
    }

    /// The trick currently playing or fading, if any.
    pub fn active_trick(&self) -> Option<&TrickClip> {
        self.active.and_then(|i| self.tricks.get(i))
    }

    /// Milliseconds until the pending fade-back (or release) fires.
    pub fn pending_ms(&self) -> Option<f64> {
        self.pending.and_then(|id| self.timers.remaining_ms(id))
    }

    /// Start a random trick unless one is already running.
    pub fn trigger(&mut self, host: &mut dyn PlaybackHost, out: &mut Outputs) -> TriggerOutcome {
        if self.busy {
            debug!("trick trigger ignored: busy ({:?})", self.state);
            out.push_event(PuppetEvent::TrickIgnored);
            return TriggerOutcome::Busy;
        }
        let index = self.rng.random_range(0..self.tricks.len());
        self.start(index, host, out);
        TriggerOutcome::Started { index }
    }

    /// Start a specific trick by index, bypassing the random pick.
    pub fn trigger_index(
        &mut self,
        index: usize,
        host: &mut dyn PlaybackHost,
        out: &mut Outputs,
    ) -> TriggerOutcome {
        if self.busy {
            out.push_event(PuppetEvent::TrickIgnored);
            return TriggerOutcome::Busy;
        }
        if index >= self.tricks.len() {
            return TriggerOutcome::Missed;
        }
        self.start(index, host, out);
        TriggerOutcome::Started { index }
    }

    fn start(&mut self, index: usize, host: &mut dyn PlaybackHost, out: &mut Outputs) {
        self.busy = true;
        let trick = &self.tricks[index];

        host.set_loop(trick.action, LoopMode::Once);
        host.reset(trick.action);
        host.play(trick.action);
        host.cross_fade(self.idle, trick.action, self.fade_in_s, self.warp);

        let duration_s = host.duration(trick.action).unwrap_or(trick.duration_s);
        let delay_ms = fade_back_delay_ms(duration_s, self.fade_in_s, self.fade_out_s);
        info!(
            "trick '{}' started, fade back in {:.0} ms",
            trick.name, delay_ms
        );
        out.push_event(PuppetEvent::TrickStarted {
            clip: trick.name.clone(),
            index,
            fade_back_in_ms: delay_ms,
        });

        self.cancel_pending();
        self.pending = Some(self.timers.schedule(delay_ms, DirectorTimer::FadeBack { index }));
        self.active = Some(index);
        self.enter(DirectorState::TransitioningIn);
    }

    /// Advance phase timing and fire due timers. Call once per frame before the
    /// playback host advances.
    pub fn advance(&mut self, dt: f32, host: &mut dyn PlaybackHost, out: &mut Outputs) {
        if dt.is_finite() && dt > 0.0 {
            self.phase_elapsed += dt;
        }
        match self.state {
            DirectorState::TransitioningIn if self.phase_elapsed >= self.fade_in_s => {
                self.enter(DirectorState::PlayingOnce);
            }
            DirectorState::TransitioningOut if self.phase_elapsed >= self.fade_out_s => {
                self.active = None;
                self.enter(DirectorState::Idle);
            }
            _ => {}
        }

        for (id, timer) in self.timers.advance(dt) {
            if self.pending == Some(id) {
                self.pending = None;
            }
            match timer {
                DirectorTimer::FadeBack { index } => self.fade_back(index, host, out),
                DirectorTimer::Release => self.release(out),
            }
        }
    }

    fn fade_back(&mut self, index: usize, host: &mut dyn PlaybackHost, out: &mut Outputs) {
        let Some(trick) = self.tricks.get(index) else {
            return;
        };
        host.set_enabled(self.idle, true);
        host.cross_fade(trick.action, self.idle, self.fade_out_s, self.warp);
        debug!("fading '{}' back to idle", trick.name);
        out.push_event(PuppetEvent::FadeBackStarted {
            clip: trick.name.clone(),
        });
        self.enter(DirectorState::TransitioningOut);

        match self.busy_release {
            BusyRelease::AtFadeOutStart => self.release(out),
            BusyRelease::AfterFadeOut => {
                let ms = self.fade_out_s as f64 * 1000.0;
                self.pending = Some(self.timers.schedule(ms, DirectorTimer::Release));
            }
        }
    }

    fn release(&mut self, out: &mut Outputs) {
        if self.busy {
            self.busy = false;
            out.push_event(PuppetEvent::Released);
        }
    }

    fn enter(&mut self, state: DirectorState) {
        self.state = state;
        self.phase_elapsed = 0.0;
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.timers.cancel(id);
        }
    }

    /// Cancel pending timers and snap back to idle at full weight.
    pub fn reset(&mut self, host: &mut dyn PlaybackHost) {
        self.cancel_pending();
        self.timers.clear();
        if let Some(trick) = self.active_trick() {
            host.set_enabled(trick.action, false);
        }
        host.reset(self.idle);
        host.set_loop(self.idle, LoopMode::Loop);
        host.play(self.idle);
        self.busy = false;
        self.active = None;
        self.enter(DirectorState::Idle);
    }
}
