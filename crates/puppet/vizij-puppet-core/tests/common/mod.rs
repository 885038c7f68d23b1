#![allow(dead_code)]
use std::collections::HashMap;

use vizij_puppet_core::{
    ActionId, ClipInfo, FrameHost, HitTestHost, JointHandle, LoopMode, Mixer, ModelAsset, Ndc,
    PlaybackHost, SkeletonHost,
};

pub fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

pub fn clip(name: &str, duration_s: f32) -> ClipInfo {
    ClipInfo {
        name: name.to_string(),
        duration_s,
        tracks: Vec::new(),
    }
}

pub fn stacy() -> ModelAsset {
    vizij_test_fixtures::models::load("stacy").expect("stacy fixture")
}

/// Host backed by the reference mixer that records what the session asked of it.
#[derive(Default)]
pub struct TestHost {
    pub mixer: Mixer,
    /// bone name -> handle
    pub bones: HashMap<String, JointHandle>,
    /// handle -> (yaw_rad, pitch_rad)
    pub rotations: HashMap<JointHandle, (f32, f32)>,
    pub hit: Option<String>,
    pub picks: Vec<Ndc>,
    pub clips_seen: Vec<ClipInfo>,
    pub renders: usize,
    pub reject_clips: bool,
}

impl TestHost {
    /// Host with the Stacy rig's neck and spine bones.
    pub fn stacy() -> Self {
        let mut host = Self::default();
        host.add_bone("mixamorigNeck", "neck#1");
        host.add_bone("mixamorigSpine", "spine#1");
        host
    }

    pub fn add_bone(&mut self, name: &str, handle: &str) {
        self.bones.insert(name.to_string(), handle.to_string());
    }

    pub fn hitting(mut self, name: &str) -> Self {
        self.hit = Some(name.to_string());
        self
    }

    pub fn action(&self, clip: &str) -> ActionId {
        self.mixer
            .find_by_clip(clip)
            .unwrap_or_else(|| panic!("no action for clip {clip}"))
    }

    pub fn weight(&self, clip: &str) -> f32 {
        self.mixer.weight(self.action(clip))
    }

    pub fn weighted_clips(&self) -> Vec<String> {
        self.mixer
            .weighted_actions()
            .into_iter()
            .filter_map(|id| self.mixer.action(id).map(|a| a.clip.clone()))
            .collect()
    }
}

impl SkeletonHost for TestHost {
    fn find_bone(&mut self, name: &str) -> Option<JointHandle> {
        self.bones.get(name).cloned()
    }

    fn set_joint_rotation(&mut self, joint: &JointHandle, yaw_rad: f32, pitch_rad: f32) {
        self.rotations.insert(joint.clone(), (yaw_rad, pitch_rad));
    }
}

impl PlaybackHost for TestHost {
    fn clip_action(&mut self, clip: &ClipInfo) -> Option<ActionId> {
        if self.reject_clips {
            return None;
        }
        self.clips_seen.push(clip.clone());
        self.mixer.clip_action(clip)
    }

    fn duration(&self, action: ActionId) -> Option<f32> {
        self.mixer.duration(action)
    }

    fn set_loop(&mut self, action: ActionId, mode: LoopMode) {
        self.mixer.set_loop(action, mode);
    }

    fn reset(&mut self, action: ActionId) {
        self.mixer.reset(action);
    }

    fn play(&mut self, action: ActionId) {
        self.mixer.play(action);
    }

    fn set_enabled(&mut self, action: ActionId, enabled: bool) {
        self.mixer.set_enabled(action, enabled);
    }

    fn cross_fade(&mut self, from: ActionId, to: ActionId, duration_s: f32, warp: bool) {
        self.mixer.cross_fade(from, to, duration_s, warp);
    }

    fn update(&mut self, dt: f32) {
        self.mixer.update(dt);
    }
}

impl HitTestHost for TestHost {
    fn pick(&mut self, ndc: Ndc) -> Option<String> {
        self.picks.push(ndc);
        self.hit.clone()
    }
}

impl FrameHost for TestHost {
    fn render(&mut self) {
        self.renders += 1;
    }
}
