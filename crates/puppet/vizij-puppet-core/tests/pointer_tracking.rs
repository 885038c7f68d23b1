mod common;

use common::{approx, TestHost};
use vizij_puppet_core::{
    compute_angles, track_pointer, JointBinding, JointConfig, PointerSample, Viewport,
};

/// it should give yaw whose sign matches the side and whose magnitude grows linearly
#[test]
fn yaw_sign_and_magnitude_across_width() {
    let (w, h, limit) = (1000.0f32, 800.0f32, 50.0f32);
    let half = w / 2.0;
    for step in 0..=100 {
        let x = w * step as f32 / 100.0;
        let a = compute_angles(x, h / 2.0, w, h, limit);
        approx(a.yaw_deg.abs(), limit * (x - half).abs() / half, 1e-4);
        if x < half {
            assert!(a.yaw_deg < 0.0, "x={x} yaw={}", a.yaw_deg);
        } else if x > half {
            assert!(a.yaw_deg > 0.0, "x={x} yaw={}", a.yaw_deg);
        } else {
            assert_eq!(a.yaw_deg, 0.0);
        }
    }
}

/// it should limit looking up to half of the looking-down range
#[test]
fn pitch_range_is_asymmetric() {
    let top = compute_angles(500.0, 0.0, 1000.0, 800.0, 50.0);
    let bottom = compute_angles(500.0, 800.0, 1000.0, 800.0, 50.0);
    approx(top.pitch_deg, -25.0, 1e-5);
    approx(bottom.pitch_deg, 50.0, 1e-5);

    let above = compute_angles(500.0, 300.0, 1000.0, 800.0, 30.0);
    let below = compute_angles(500.0, 500.0, 1000.0, 800.0, 30.0);
    assert!(above.pitch_deg < 0.0);
    assert!(below.pitch_deg > 0.0);
}

/// it should match the worked example for a 1000x800 viewport
#[test]
fn worked_example_upper_left() {
    let a = compute_angles(250.0, 200.0, 1000.0, 800.0, 50.0);
    approx(a.yaw_deg, -25.0, 1e-6);
    approx(a.pitch_deg, -12.5, 1e-6);
}

/// it should extrapolate past the limit for positions outside the viewport
#[test]
fn off_viewport_positions_are_not_clamped() {
    let right = compute_angles(1500.0, 400.0, 1000.0, 800.0, 50.0);
    approx(right.yaw_deg, 100.0, 1e-4);
    let above = compute_angles(500.0, -400.0, 1000.0, 800.0, 50.0);
    approx(above.pitch_deg, -50.0, 1e-4);
}

/// it should write radians to bound joints with each joint's own limit and skip unbound ones
#[test]
fn track_pointer_writes_bound_joints_only() {
    let mut host = TestHost::default();
    host.add_bone("Neck", "neck");

    let mut neck = JointBinding::from_config(&JointConfig::new("neck", "Neck", 50.0));
    let mut waist = JointBinding::from_config(&JointConfig::new("waist", "Spine", 30.0));
    assert!(neck.resolve(&mut host));
    assert!(!waist.resolve(&mut host));

    let vp = Viewport::new(1000.0, 800.0);
    let writes = track_pointer(
        PointerSample::new(1000.0, 800.0),
        vp,
        &[neck, waist],
        &mut host,
    );
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].role, "neck");

    let (yaw, pitch) = host.rotations["neck"];
    approx(yaw, 50f32.to_radians(), 1e-6);
    approx(pitch, 50f32.to_radians(), 1e-6);
}

/// it should do nothing for an empty viewport
#[test]
fn empty_viewport_produces_no_writes() {
    let mut host = TestHost::default();
    host.add_bone("Neck", "neck");
    let mut neck = JointBinding::from_config(&JointConfig::new("neck", "Neck", 50.0));
    neck.resolve(&mut host);

    let writes = track_pointer(
        PointerSample::new(10.0, 10.0),
        Viewport::default(),
        &[neck],
        &mut host,
    );
    assert!(writes.is_empty());
    assert!(host.rotations.is_empty());
}
