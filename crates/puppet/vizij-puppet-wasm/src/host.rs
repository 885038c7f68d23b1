//! JavaScript-backed host: forwards core host calls to methods on a JS object.
//!
//! Expected shape (all methods optional; a missing method is a no-op / None):
//! ```text
//! {
//!   findBone(name) -> string | number | null,
//!   setJointRotation(handle, yawRad, pitchRad),
//!   clipAction(clip: { name, duration, tracks }) -> number | null,
//!   duration(action) -> number | null,
//!   setLoop(action, "once" | "loop"),
//!   reset(action), play(action), setEnabled(action, bool),
//!   crossFade(from, to, durationS, warp),
//!   update(dt),
//!   pick(ndcX, ndcY) -> string | null,
//!   render(),
//! }
//! ```

use js_sys::{Array, Function, Object, Reflect};
use log::warn;
use serde_wasm_bindgen as swb;
use wasm_bindgen::{JsCast, JsValue};

use vizij_puppet_core::{
    ActionId, ClipInfo, FrameHost, HitTestHost, JointHandle, LoopMode, Ndc, PlaybackHost,
    SkeletonHost,
};

pub(crate) struct JsHost {
    obj: Object,
}

impl JsHost {
    pub(crate) fn new(obj: Object) -> Self {
        Self { obj }
    }

    fn method(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.obj, &JsValue::from_str(name))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }

    fn call(&self, name: &str, args: &Array) -> Option<JsValue> {
        let f = self.method(name)?;
        match f.apply(&self.obj, args) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("host.{name} threw: {e:?}");
                None
            }
        }
    }
}

/// Accept string keys; allow number fallback -> string.
fn js_to_key(val: JsValue) -> Option<String> {
    if val.is_undefined() || val.is_null() {
        return None;
    }
    if let Some(s) = val.as_string() {
        return Some(s);
    }
    if let Some(n) = val.as_f64() {
        return Some(if n.fract() == 0.0 {
            format!("{}", n as i64)
        } else {
            format!("{}", n)
        });
    }
    None
}

fn action_arg(action: ActionId) -> JsValue {
    JsValue::from(action.0)
}

impl SkeletonHost for JsHost {
    fn find_bone(&mut self, name: &str) -> Option<JointHandle> {
        self.call("findBone", &Array::of1(&JsValue::from_str(name)))
            .and_then(js_to_key)
    }

    fn set_joint_rotation(&mut self, joint: &JointHandle, yaw_rad: f32, pitch_rad: f32) {
        self.call(
            "setJointRotation",
            &Array::of3(
                &JsValue::from_str(joint),
                &JsValue::from(yaw_rad),
                &JsValue::from(pitch_rad),
            ),
        );
    }
}

impl PlaybackHost for JsHost {
    fn clip_action(&mut self, clip: &ClipInfo) -> Option<ActionId> {
        let arg = swb::to_value(clip).ok()?;
        let id = self.call("clipAction", &Array::of1(&arg))?.as_f64()?;
        if id < 0.0 || id.fract() != 0.0 || id > u32::MAX as f64 {
            return None;
        }
        Some(ActionId(id as u32))
    }

    fn duration(&self, action: ActionId) -> Option<f32> {
        let secs = self.call("duration", &Array::of1(&action_arg(action)))?.as_f64()?;
        (secs.is_finite() && secs >= 0.0).then_some(secs as f32)
    }

    fn set_loop(&mut self, action: ActionId, mode: LoopMode) {
        let mode = match mode {
            LoopMode::Once => "once",
            LoopMode::Loop => "loop",
        };
        self.call(
            "setLoop",
            &Array::of2(&action_arg(action), &JsValue::from_str(mode)),
        );
    }

    fn reset(&mut self, action: ActionId) {
        self.call("reset", &Array::of1(&action_arg(action)));
    }

    fn play(&mut self, action: ActionId) {
        self.call("play", &Array::of1(&action_arg(action)));
    }

    fn set_enabled(&mut self, action: ActionId, enabled: bool) {
        self.call(
            "setEnabled",
            &Array::of2(&action_arg(action), &JsValue::from_bool(enabled)),
        );
    }

    fn cross_fade(&mut self, from: ActionId, to: ActionId, duration_s: f32, warp: bool) {
        self.call(
            "crossFade",
            &Array::of4(
                &action_arg(from),
                &action_arg(to),
                &JsValue::from(duration_s),
                &JsValue::from_bool(warp),
            ),
        );
    }

    fn update(&mut self, dt: f32) {
        self.call("update", &Array::of1(&JsValue::from(dt)));
    }
}

impl HitTestHost for JsHost {
    fn pick(&mut self, ndc: Ndc) -> Option<String> {
        self.call(
            "pick",
            &Array::of2(&JsValue::from(ndc.x), &JsValue::from(ndc.y)),
        )?
        .as_string()
    }
}

impl FrameHost for JsHost {
    fn render(&mut self) {
        self.call("render", &Array::new());
    }
}
