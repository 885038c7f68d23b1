//! PuppetSession: the controller object adapters drive from their event loop.
//!
//! Methods:
//! - new, bind_model / model_failed (after the host's async load)
//! - pointer_move, click, touch_end, resize (input events)
//! - frame (once per display refresh: timers -> playback -> render)
//! - teardown

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::clip::ModelAsset;
use crate::config::PuppetConfig;
use crate::director::{Director, DirectorState, TrickClip, TriggerOutcome};
use crate::error::{PuppetError, Result};
use crate::host::{PlaybackHost, PuppetHost};
use crate::inputs::{PointerSample, Viewport};
use crate::mixer::LoopMode;
use crate::outputs::{Outputs, PuppetEvent};
use crate::pointer::{track_pointer, JointBinding, JointWrite};

/// Lifecycle of the session's model.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Waiting for the host to finish loading the model.
    #[default]
    Loading,
    /// Model bound; tracking and tricks are live.
    Ready,
    /// Load or bind failed; the scene stays static.
    Static,
}

#[derive(Debug)]
pub struct PuppetSession {
    cfg: PuppetConfig,
    status: SessionStatus,
    viewport: Viewport,
    joints: Vec<JointBinding>,
    director: Option<Director>,
    outputs: Outputs,
}

impl PuppetSession {
    pub fn new(cfg: PuppetConfig) -> Result<Self> {
        cfg.validate()?;
        let joints = cfg.joints.iter().map(JointBinding::from_config).collect();
        Ok(Self {
            cfg,
            status: SessionStatus::Loading,
            viewport: Viewport::default(),
            joints,
            director: None,
            outputs: Outputs::default(),
        })
    }

    pub fn config(&self) -> &PuppetConfig {
        &self.cfg
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn joints(&self) -> &[JointBinding] {
        &self.joints
    }

    pub fn director(&self) -> Option<&Director> {
        self.director.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.director.as_ref().map(Director::is_busy).unwrap_or(false)
    }

    pub fn director_state(&self) -> Option<DirectorState> {
        self.director.as_ref().map(Director::state)
    }

    /// Record the current viewport size (CSS pixels).
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Register the loaded model's clips and joints with the host and start idling.
    ///
    /// Every clip except the idle one becomes a trick, in load order. Configured clip
    /// transforms are applied before clips reach the host. A model that is already bound
    /// is reset to idle first, cancelling any running trick. On error the session goes
    /// static.
    pub fn bind_model<H: PuppetHost>(&mut self, mut asset: ModelAsset, host: &mut H) -> Result<()> {
        match self.try_bind(&mut asset, host) {
            Ok(()) => Ok(()),
            Err(e) => {
                error!("model bind failed: {e}");
                self.status = SessionStatus::Static;
                self.outputs.push_event(PuppetEvent::ModelFailed {
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    fn try_bind<H: PuppetHost>(&mut self, asset: &mut ModelAsset, host: &mut H) -> Result<()> {
        if let Some(mut previous) = self.director.take() {
            previous.reset(host);
        }
        let idle_name = self.cfg.idle_clip.clone();
        for clip in asset.clips.iter_mut() {
            self.cfg.clip_transforms.apply_to(clip);
        }

        let idle_clip = asset
            .find_clip(&idle_name)
            .cloned()
            .ok_or_else(|| PuppetError::MissingIdleClip {
                name: idle_name.clone(),
            })?;
        if asset.clips.iter().all(|c| c.name == idle_name) {
            return Err(PuppetError::NoTrickClips { idle: idle_name });
        }

        let mut tricks = Vec::new();
        for clip in asset.clips.iter().filter(|c| c.name != idle_name) {
            let action = host
                .clip_action(clip)
                .ok_or_else(|| PuppetError::ClipRejected {
                    name: clip.name.clone(),
                })?;
            tricks.push(TrickClip {
                name: clip.name.clone(),
                action,
                duration_s: clip.duration_s,
            });
        }

        let idle = host
            .clip_action(&idle_clip)
            .ok_or_else(|| PuppetError::ClipRejected {
                name: idle_clip.name.clone(),
            })?;
        let director = Director::new(idle, tricks, &self.cfg)?;
        PlaybackHost::reset(host, idle);
        PlaybackHost::set_loop(host, idle, LoopMode::Loop);
        PlaybackHost::play(host, idle);

        let mut bound = 0;
        for joint in self.joints.iter_mut() {
            if joint.resolve(host) {
                bound += 1;
            } else {
                warn!("bone '{}' for joint '{}' not found", joint.bone, joint.role);
            }
        }

        info!(
            "model ready: {} trick clips, {}/{} joints bound",
            director.tricks().len(),
            bound,
            self.joints.len()
        );
        self.outputs.push_event(PuppetEvent::ModelReady {
            tricks: director.tricks().len(),
            joints_bound: bound,
        });
        self.director = Some(director);
        self.status = SessionStatus::Ready;
        Ok(())
    }

    /// The host could not load the model. The scene stays static; this is not fatal.
    pub fn model_failed(&mut self, reason: &str) -> PuppetError {
        error!("model load failed: {reason}");
        self.status = SessionStatus::Static;
        self.outputs.push_event(PuppetEvent::ModelFailed {
            reason: reason.to_string(),
        });
        PuppetError::AssetLoad {
            reason: reason.to_string(),
        }
    }

    /// Rotate the tracked joints toward the pointer.
    pub fn pointer_move<H: PuppetHost>(
        &mut self,
        sample: PointerSample,
        host: &mut H,
    ) -> Vec<JointWrite> {
        if self.status != SessionStatus::Ready {
            return Vec::new();
        }
        track_pointer(sample, self.viewport, &self.joints, host)
    }

    /// Hit-test a click and start a trick if it lands on the target.
    pub fn click<H: PuppetHost>(&mut self, sample: PointerSample, host: &mut H) -> TriggerOutcome {
        let Some(director) = self.director.as_mut() else {
            return TriggerOutcome::NotReady;
        };
        if self.status != SessionStatus::Ready {
            return TriggerOutcome::NotReady;
        }
        let Some(ndc) = self.viewport.to_ndc(sample) else {
            return TriggerOutcome::Missed;
        };
        match host.pick(ndc) {
            Some(name) if name == self.cfg.target_name => director.trigger(host, &mut self.outputs),
            _ => TriggerOutcome::Missed,
        }
    }

    /// Start a specific trick without a hit test, for hosts with their own trigger UI.
    pub fn play_trick<H: PuppetHost>(&mut self, index: usize, host: &mut H) -> Result<TriggerOutcome> {
        let director = self.director.as_mut().ok_or(PuppetError::NotBound)?;
        Ok(director.trigger_index(index, host, &mut self.outputs))
    }

    /// Touch release: the first changed touch acts as a click.
    pub fn touch_end<H: PuppetHost>(
        &mut self,
        changed_touches: &[PointerSample],
        host: &mut H,
    ) -> TriggerOutcome {
        match changed_touches.first() {
            Some(touch) => self.click(*touch, host),
            None => TriggerOutcome::Missed,
        }
    }

    /// One display refresh: fire due timers, advance playback, render.
    /// Returns the events collected since the previous frame.
    pub fn frame<H: PuppetHost>(&mut self, dt: f32, host: &mut H) -> Outputs {
        if let Some(director) = self.director.as_mut() {
            director.advance(dt, host, &mut self.outputs);
            host.update(dt);
        }
        host.render();

        let mut out = std::mem::take(&mut self.outputs);
        out.busy = self.is_busy();
        out.state = self.director_state();
        out
    }

    /// Cancel pending timers and return to idle. Joints stay bound.
    pub fn reset<H: PuppetHost>(&mut self, host: &mut H) {
        if let Some(director) = self.director.as_mut() {
            director.reset(host);
        }
    }

    /// Cancel pending timers, return to idle and release the model.
    pub fn teardown<H: PuppetHost>(&mut self, host: &mut H) {
        self.reset(host);
        self.director = None;
        for joint in self.joints.iter_mut() {
            joint.unbind();
        }
        self.status = SessionStatus::Loading;
    }
}
