//! Mixer: reference playback host with per-action weight fades and time warps.
//!
//! Semantics follow the usual clip-action model of web 3D engines:
//! - an action only advances while enabled and playing;
//! - a weight fade that ends at 0 disables its action;
//! - a `LoopMode::Once` action that reaches its end is disabled;
//! - `reset` rewinds, re-enables, restores full weight and drops fades/warps.
//!
//! The mixer does not sample tracks; adapters that own real clip data use their own
//! playback host and the mixer stands in for it natively and in tests.

use serde::{Deserialize, Serialize};

use crate::clip::ClipInfo;
use crate::host::PlaybackHost;
use crate::ids::{ActionId, IdAllocator};

#[derive(Copy, Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    #[default]
    Loop,
}

/// Linear ramp between two values over a duration.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Ramp {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl Ramp {
    fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
        }
    }

    fn value(&self) -> f32 {
        if self.duration <= 0.0 {
            return self.to;
        }
        let u = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * u
    }

    /// Advance and report whether the ramp has finished.
    fn step(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.duration
    }
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Playback state of one clip.
#[derive(Debug)]
pub struct Action {
    pub id: ActionId,
    pub clip: String,
    pub duration: f32,
    pub time: f32,
    pub time_scale: f32,
    /// Base weight; the effective weight also applies the running fade.
    pub weight: f32,
    pub mode: LoopMode,
    pub enabled: bool,
    pub playing: bool,
    fade: Option<Ramp>,
    warp: Option<Ramp>,
}

impl Action {
    fn new(id: ActionId, clip: &ClipInfo) -> Self {
        Self {
            id,
            clip: clip.name.clone(),
            duration: clip.duration_s.max(0.0),
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            mode: LoopMode::Loop,
            enabled: true,
            playing: false,
            fade: None,
            warp: None,
        }
    }

    /// Weight this action contributes to the blend right now.
    pub fn effective_weight(&self) -> f32 {
        if !self.enabled || !self.playing {
            return 0.0;
        }
        self.weight * self.fade.map(|f| f.value()).unwrap_or(1.0)
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn is_warping(&self) -> bool {
        self.warp.is_some()
    }

    fn advance(&mut self, dt: f32) {
        if !self.enabled || !self.playing {
            return;
        }

        if let Some(warp) = self.warp.as_mut() {
            let done = warp.step(dt);
            self.time_scale = warp.value();
            if done {
                self.warp = None;
            }
        }

        self.time += dt * self.time_scale;
        match self.mode {
            LoopMode::Loop => {
                self.time = fmod(self.time, self.duration);
            }
            LoopMode::Once => {
                if self.time >= self.duration {
                    self.time = self.duration;
                    self.enabled = false;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.enabled = false;
                }
            }
        }

        if let Some(fade) = self.fade.as_mut() {
            if fade.step(dt) {
                let end = fade.to;
                self.fade = None;
                if end == 0.0 {
                    self.enabled = false;
                }
            }
        }
    }
}

/// Owns clip actions and advances them each frame.
#[derive(Debug, Default)]
pub struct Mixer {
    ids: IdAllocator,
    actions: Vec<Action>,
    time: f32,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total time advanced through `update`, in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    fn action_mut(&mut self, id: ActionId) -> Option<&mut Action> {
        self.actions.iter_mut().find(|a| a.id == id)
    }

    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter()
    }

    pub fn find_by_clip(&self, clip: &str) -> Option<ActionId> {
        self.actions.iter().find(|a| a.clip == clip).map(|a| a.id)
    }

    /// Weight the action contributes to the blend right now.
    pub fn weight(&self, id: ActionId) -> f32 {
        self.action(id).map(Action::effective_weight).unwrap_or(0.0)
    }

    pub fn is_enabled(&self, id: ActionId) -> bool {
        self.action(id).map(|a| a.enabled).unwrap_or(false)
    }

    pub fn loop_mode(&self, id: ActionId) -> Option<LoopMode> {
        self.action(id).map(|a| a.mode)
    }

    /// Actions currently contributing a non-zero weight.
    pub fn weighted_actions(&self) -> Vec<ActionId> {
        self.actions
            .iter()
            .filter(|a| a.effective_weight() > 0.0)
            .map(|a| a.id)
            .collect()
    }

    /// Stop playback and rewind.
    pub fn stop(&mut self, id: ActionId) {
        if let Some(a) = self.action_mut(id) {
            a.playing = false;
            a.time = 0.0;
            a.time_scale = 1.0;
            a.fade = None;
            a.warp = None;
        }
    }

    fn schedule_fade(&mut self, id: ActionId, from: f32, to: f32, duration: f32) {
        if let Some(a) = self.action_mut(id) {
            a.fade = Some(Ramp::new(from, to, duration));
        }
    }

    fn schedule_warp(&mut self, id: ActionId, from: f32, to: f32, duration: f32) {
        if let Some(a) = self.action_mut(id) {
            a.time_scale = from;
            a.warp = Some(Ramp::new(from, to, duration));
        }
    }
}

impl PlaybackHost for Mixer {
    fn clip_action(&mut self, clip: &ClipInfo) -> Option<ActionId> {
        if let Some(existing) = self.find_by_clip(&clip.name) {
            return Some(existing);
        }
        let id = self.ids.alloc_action();
        self.actions.push(Action::new(id, clip));
        Some(id)
    }

    fn duration(&self, action: ActionId) -> Option<f32> {
        self.action(action).map(|a| a.duration)
    }

    fn set_loop(&mut self, action: ActionId, mode: LoopMode) {
        if let Some(a) = self.action_mut(action) {
            a.mode = mode;
        }
    }

    fn reset(&mut self, action: ActionId) {
        if let Some(a) = self.action_mut(action) {
            a.enabled = true;
            a.weight = 1.0;
            a.time = 0.0;
            a.time_scale = 1.0;
            a.fade = None;
            a.warp = None;
        }
    }

    fn play(&mut self, action: ActionId) {
        if let Some(a) = self.action_mut(action) {
            a.playing = true;
        }
    }

    fn set_enabled(&mut self, action: ActionId, enabled: bool) {
        if let Some(a) = self.action_mut(action) {
            a.enabled = enabled;
        }
    }

    fn cross_fade(&mut self, from: ActionId, to: ActionId, duration_s: f32, warp: bool) {
        self.schedule_fade(from, 1.0, 0.0, duration_s);
        self.schedule_fade(to, 0.0, 1.0, duration_s);
        if warp {
            let from_dur = self.duration(from).unwrap_or(0.0);
            let to_dur = self.duration(to).unwrap_or(0.0);
            if from_dur > 0.0 && to_dur > 0.0 {
                self.schedule_warp(from, 1.0, from_dur / to_dur, duration_s);
                self.schedule_warp(to, to_dur / from_dur, 1.0, duration_s);
            }
        }
    }

    fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt < 0.0 {
            return;
        }
        self.time += dt;
        for a in &mut self.actions {
            a.advance(dt);
        }
    }
}
