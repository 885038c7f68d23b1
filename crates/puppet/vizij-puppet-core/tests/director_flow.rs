mod common;

use common::clip;
use vizij_puppet_core::{
    fade_back_delay_ms, ActionId, BusyRelease, Director, DirectorState, LoopMode, Mixer, Outputs,
    PlaybackHost, PuppetConfig, PuppetError, PuppetEvent, TrickClip, TriggerOutcome,
};

const FRAME: f32 = 1.0 / 60.0;

struct Rig {
    mixer: Mixer,
    idle: ActionId,
    director: Director,
    out: Outputs,
}

impl Rig {
    fn new(tricks: &[(&str, f32)], cfg: PuppetConfig) -> Self {
        let mut mixer = Mixer::new();
        let mut list = Vec::new();
        for (name, dur) in tricks {
            let action = mixer.clip_action(&clip(name, *dur)).unwrap();
            list.push(TrickClip {
                name: name.to_string(),
                action,
                duration_s: *dur,
            });
        }
        let idle = mixer.clip_action(&clip("idle", 7.3)).unwrap();
        mixer.set_loop(idle, LoopMode::Loop);
        mixer.play(idle);
        let director = Director::new(idle, list, &cfg).unwrap();
        Self {
            mixer,
            idle,
            director,
            out: Outputs::default(),
        }
    }

    fn step(&mut self, dt: f32) {
        self.director.advance(dt, &mut self.mixer, &mut self.out);
        self.mixer.update(dt);
    }

    fn run(&mut self, seconds: f32) {
        let frames = (seconds / FRAME).ceil() as usize;
        for _ in 0..frames {
            self.step(FRAME);
        }
    }

    fn trick_action(&self, index: usize) -> ActionId {
        self.director.tricks()[index].action
    }
}

fn seeded(seed: u64) -> PuppetConfig {
    PuppetConfig {
        seed: Some(seed),
        ..PuppetConfig::default()
    }
}

/// it should refuse to build without trick clips
#[test]
fn empty_trick_set_is_a_setup_error() {
    let mut mixer = Mixer::new();
    let idle = mixer.clip_action(&clip("idle", 1.0)).unwrap();
    let err = Director::new(idle, Vec::new(), &PuppetConfig::default()).unwrap_err();
    assert_eq!(
        err,
        PuppetError::NoTrickClips {
            idle: "idle".into()
        }
    );
}

/// it should set the busy flag immediately and start the picked clip once
#[test]
fn trigger_sets_busy_and_starts_one_shot() {
    let mut rig = Rig::new(&[("golf", 2.0), ("jump", 1.4)], seeded(1));
    assert!(!rig.director.is_busy());

    let outcome = rig.director.trigger(&mut rig.mixer, &mut rig.out);
    let TriggerOutcome::Started { index } = outcome else {
        panic!("expected Started, got {outcome:?}");
    };
    assert!(rig.director.is_busy());
    assert_eq!(rig.director.state(), DirectorState::TransitioningIn);

    let action = rig.mixer.action(rig.trick_action(index)).unwrap();
    assert!(action.playing);
    assert_eq!(action.mode, LoopMode::Once);
    assert!(action.is_fading());
    assert!(rig.mixer.action(rig.idle).unwrap().is_fading());
    assert!(matches!(
        rig.out.events.as_slice(),
        [PuppetEvent::TrickStarted { .. }]
    ));
}

/// it should ignore triggers while busy without touching playback
#[test]
fn trigger_while_busy_is_ignored() {
    let mut rig = Rig::new(&[("golf", 2.0), ("jump", 1.4), ("pockets", 3.5)], seeded(2));
    let TriggerOutcome::Started { index } = rig.director.trigger(&mut rig.mixer, &mut rig.out)
    else {
        panic!("first trigger should start");
    };
    rig.run(0.5);

    let time_before = rig.mixer.action(rig.trick_action(index)).unwrap().time;
    for _ in 0..10 {
        assert_eq!(
            rig.director.trigger(&mut rig.mixer, &mut rig.out),
            TriggerOutcome::Busy
        );
    }
    assert!(rig.director.is_busy());
    assert_eq!(rig.director.active_trick().unwrap().name, rig.director.tricks()[index].name);
    assert_eq!(
        rig.mixer.action(rig.trick_action(index)).unwrap().time,
        time_before
    );
    for other in (0..3).filter(|i| *i != index) {
        assert!(!rig.mixer.action(rig.trick_action(other)).unwrap().playing);
    }
    assert_eq!(
        rig.out
            .events
            .iter()
            .filter(|e| **e == PuppetEvent::TrickIgnored)
            .count(),
        10
    );
}

/// it should arm the fade-back (duration - fade_in - fade_out) after the trigger
#[test]
fn fade_back_fires_at_1500ms_for_a_two_second_clip() {
    assert_eq!(fade_back_delay_ms(2.0, 0.25, 0.25), 1500.0);

    let mut rig = Rig::new(&[("golf", 2.0)], seeded(3));
    rig.director.trigger(&mut rig.mixer, &mut rig.out);
    let pending = rig.director.pending_ms().unwrap();
    assert!((pending - 1500.0).abs() < 1e-9, "pending={pending}");

    rig.step(1.49);
    assert_eq!(rig.director.state(), DirectorState::PlayingOnce);
    assert!(rig.director.is_busy());
    assert!(!rig
        .out
        .events
        .iter()
        .any(|e| matches!(e, PuppetEvent::FadeBackStarted { .. })));

    rig.step(0.02);
    assert_eq!(rig.director.state(), DirectorState::TransitioningOut);
    assert!(rig.out.events.contains(&PuppetEvent::FadeBackStarted {
        clip: "golf".into()
    }));
}

/// it should clamp the fade-back delay at zero for clips shorter than both fades
#[test]
fn short_clip_fades_back_on_next_frame() {
    assert_eq!(fade_back_delay_ms(0.3, 0.25, 0.25), 0.0);
    let mut rig = Rig::new(&[("blink", 0.3)], seeded(4));
    rig.director.trigger(&mut rig.mixer, &mut rig.out);
    rig.step(FRAME);
    assert_eq!(rig.director.state(), DirectorState::TransitioningOut);
    assert!(!rig.director.is_busy());
}

/// it should release the busy flag when the fade back starts (default)
#[test]
fn busy_clears_at_fade_back_start_and_accepts_interrupting_click() {
    let mut rig = Rig::new(&[("golf", 2.0)], seeded(5));
    rig.director.trigger(&mut rig.mixer, &mut rig.out);
    rig.step(1.51);
    assert_eq!(rig.director.state(), DirectorState::TransitioningOut);
    assert!(!rig.director.is_busy());
    assert!(rig.out.events.contains(&PuppetEvent::Released));

    let again = rig.director.trigger(&mut rig.mixer, &mut rig.out);
    assert_eq!(again, TriggerOutcome::Started { index: 0 });
    assert_eq!(rig.director.state(), DirectorState::TransitioningIn);
}

/// it should stay non-busy through the fade back and settle in idle once it ends
#[test]
fn fade_back_is_non_busy_then_settles_idle() {
    let mut rig = Rig::new(&[("golf", 2.0)], seeded(5));
    rig.director.trigger(&mut rig.mixer, &mut rig.out);
    rig.step(1.51);
    assert_eq!(rig.director.state(), DirectorState::TransitioningOut);
    assert!(!rig.director.is_busy());

    rig.step(0.1);
    assert_eq!(rig.director.state(), DirectorState::TransitioningOut);
    rig.step(0.16);
    assert_eq!(rig.director.state(), DirectorState::Idle);
    assert!(rig.director.active_trick().is_none());
    assert!(!rig.director.is_busy());
}

/// it should keep the busy flag until the fade back completes when configured
#[test]
fn busy_held_until_fade_back_completes() {
    let cfg = PuppetConfig {
        busy_release: BusyRelease::AfterFadeOut,
        ..seeded(6)
    };
    let mut rig = Rig::new(&[("golf", 2.0)], cfg);
    rig.director.trigger(&mut rig.mixer, &mut rig.out);
    rig.step(1.51);
    assert_eq!(rig.director.state(), DirectorState::TransitioningOut);
    assert!(rig.director.is_busy());
    assert_eq!(
        rig.director.trigger(&mut rig.mixer, &mut rig.out),
        TriggerOutcome::Busy
    );

    rig.step(0.26);
    assert!(!rig.director.is_busy());
    assert_eq!(rig.director.state(), DirectorState::Idle);
    assert!(rig.out.events.contains(&PuppetEvent::Released));
}

/// it should leave idle as the only weighted, looping action after a full round trip
#[test]
fn round_trip_returns_to_idle_only() {
    let mut rig = Rig::new(&[("golf", 2.0)], seeded(7));
    rig.director.trigger(&mut rig.mixer, &mut rig.out);

    rig.run(0.5);
    assert_eq!(rig.mixer.weighted_actions(), vec![rig.trick_action(0)]);

    rig.run(2.5);
    assert_eq!(rig.director.state(), DirectorState::Idle);
    assert!(!rig.director.is_busy());
    assert_eq!(rig.mixer.weighted_actions(), vec![rig.idle]);
    assert_eq!(rig.mixer.loop_mode(rig.idle), Some(LoopMode::Loop));
    assert!((rig.mixer.weight(rig.idle) - 1.0).abs() < 1e-6);
    assert!(!rig.mixer.is_enabled(rig.trick_action(0)));
}

/// it should cancel the pending fade-back on reset
#[test]
fn reset_cancels_pending_timer() {
    let mut rig = Rig::new(&[("golf", 2.0)], seeded(8));
    rig.director.trigger(&mut rig.mixer, &mut rig.out);
    rig.run(0.3);
    rig.director.reset(&mut rig.mixer);

    assert!(rig.director.pending_ms().is_none());
    assert!(!rig.director.is_busy());
    assert_eq!(rig.director.state(), DirectorState::Idle);
    assert_eq!(rig.mixer.weighted_actions(), vec![rig.idle]);

    rig.out.clear();
    rig.run(3.0);
    assert!(rig.out.events.is_empty(), "events: {:?}", rig.out.events);
}

/// it should pick trick indices uniformly (chi-square, 3 degrees of freedom)
#[test]
fn trick_pick_is_uniform() {
    let names = [("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)];
    let mut rig = Rig::new(&names, seeded(12345));
    let trials = 4000usize;
    let mut counts = [0usize; 4];
    for _ in 0..trials {
        match rig.director.trigger(&mut rig.mixer, &mut rig.out) {
            TriggerOutcome::Started { index } => counts[index] += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
        rig.director.reset(&mut rig.mixer);
    }
    let expected = trials as f64 / counts.len() as f64;
    let chi2: f64 = counts
        .iter()
        .map(|&c| {
            let d = c as f64 - expected;
            d * d / expected
        })
        .sum();
    // p = 0.001 critical value for 3 degrees of freedom
    assert!(chi2 < 16.27, "chi2={chi2} counts={counts:?}");
}

/// it should reject out-of-range explicit picks
#[test]
fn trigger_index_out_of_range_is_missed() {
    let mut rig = Rig::new(&[("golf", 2.0)], seeded(9));
    assert_eq!(
        rig.director.trigger_index(3, &mut rig.mixer, &mut rig.out),
        TriggerOutcome::Missed
    );
    assert!(!rig.director.is_busy());
}

fn picks(cfg: PuppetConfig, n: usize) -> Vec<usize> {
    let names = [("a", 1.0), ("b", 1.0), ("c", 1.0), ("d", 1.0)];
    let mut rig = Rig::new(&names, cfg);
    (0..n)
        .map(|_| {
            let outcome = rig.director.trigger(&mut rig.mixer, &mut rig.out);
            rig.director.reset(&mut rig.mixer);
            match outcome {
                TriggerOutcome::Started { index } => index,
                other => panic!("unexpected outcome {other:?}"),
            }
        })
        .collect()
}

/// it should repeat the default-seed sequence when no seed is configured
#[test]
fn unseeded_directors_share_the_default_sequence() {
    let unseeded = picks(PuppetConfig::default(), 32);
    assert_eq!(unseeded, picks(PuppetConfig::default(), 32));
    assert_eq!(unseeded, picks(seeded(vizij_puppet_core::director::DEFAULT_SEED), 32));
    assert_ne!(unseeded, picks(seeded(1), 32));
}
