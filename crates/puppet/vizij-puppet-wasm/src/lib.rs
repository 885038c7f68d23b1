use js_sys::Object;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use vizij_puppet_core::{
    ModelAsset, PointerSample, PuppetConfig, PuppetError, PuppetSession, Viewport,
};

mod host;
mod logging;

pub use logging::init_logging;

use host::JsHost;

#[wasm_bindgen]
pub struct VizijPuppet {
    session: PuppetSession,
    host: JsHost,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

fn js_err(e: PuppetError) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
impl VizijPuppet {
    /// Create a session bound to a JS host object. `config` may be a config object, a JSON
    /// string, or undefined/null for the defaults.
    /// The viewport starts at 0x0: call `resize` before forwarding pointer events, or
    /// `pointer_move` writes nothing and `click` reports "missed".
    /// Example:
    ///   new VizijPuppet({ fade_in_s: 0.3, busy_release: "after_fade_out" }, host)
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, host: Object) -> Result<VizijPuppet, JsError> {
        console_error_panic_hook::set_once();

        let mut cfg: PuppetConfig = if jsvalue_is_undefined_or_null(&config) {
            PuppetConfig::default()
        } else if let Some(json) = config.as_string() {
            PuppetConfig::from_json(&json).map_err(js_err)?
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        if cfg.seed.is_none() {
            cfg.seed = Some((js_sys::Math::random() * u32::MAX as f64) as u64);
        }

        Ok(VizijPuppet {
            session: PuppetSession::new(cfg).map_err(js_err)?,
            host: JsHost::new(host),
        })
    }

    /// Register a loaded model: `{ clips: [{ name, duration, tracks }] }`.
    /// Starts the idle clip and resolves the tracked bones through the host.
    #[wasm_bindgen(js_name = bind_model)]
    pub fn bind_model(&mut self, asset: JsValue) -> Result<(), JsError> {
        let asset: ModelAsset = swb::from_value(asset)
            .map_err(|e| JsError::new(&format!("bind_model parse error: {e}")))?;
        self.session
            .bind_model(asset, &mut self.host)
            .map_err(js_err)
    }

    /// Report a failed model load; the scene stays static.
    #[wasm_bindgen(js_name = model_failed)]
    pub fn model_failed(&mut self, reason: String) {
        self.session.model_failed(&reason);
    }

    /// Update the viewport size in CSS pixels.
    #[wasm_bindgen]
    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(Viewport::new(width, height));
    }

    /// Whether the canvas backing store no longer matches the viewport.
    #[wasm_bindgen(js_name = needs_resize)]
    pub fn needs_resize(&self, canvas_width: f32, canvas_height: f32, device_pixel_ratio: f32) -> bool {
        self.session
            .viewport()
            .needs_resize(canvas_width, canvas_height, device_pixel_ratio)
    }

    /// Pointer moved to (x, y) in CSS pixels. Returns the joint writes applied.
    #[wasm_bindgen(js_name = pointer_move)]
    pub fn pointer_move(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        let writes = self
            .session
            .pointer_move(PointerSample::new(x, y), &mut self.host);
        swb::to_value(&writes).map_err(|e| JsError::new(&format!("pointer_move error: {e}")))
    }

    /// Click at (x, y). Returns `{ kind: "started" | "busy" | "missed" | "not_ready", index? }`.
    #[wasm_bindgen]
    pub fn click(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        let outcome = self.session.click(PointerSample::new(x, y), &mut self.host);
        swb::to_value(&outcome).map_err(|e| JsError::new(&format!("click error: {e}")))
    }

    /// Touch end at the first changed touch (x, y).
    #[wasm_bindgen(js_name = touch_end)]
    pub fn touch_end(&mut self, x: f32, y: f32) -> Result<JsValue, JsError> {
        let outcome = self
            .session
            .touch_end(&[PointerSample::new(x, y)], &mut self.host);
        swb::to_value(&outcome).map_err(|e| JsError::new(&format!("touch_end error: {e}")))
    }

    /// Start trick `index` directly, skipping the hit test.
    #[wasm_bindgen(js_name = play_trick)]
    pub fn play_trick(&mut self, index: u32) -> Result<JsValue, JsError> {
        let outcome = self
            .session
            .play_trick(index as usize, &mut self.host)
            .map_err(js_err)?;
        swb::to_value(&outcome).map_err(|e| JsError::new(&format!("play_trick error: {e}")))
    }

    /// Advance by dt seconds: fire timers, update playback, render. Returns Outputs JSON.
    #[wasm_bindgen]
    pub fn frame(&mut self, dt: f32) -> Result<JsValue, JsError> {
        let out = self.session.frame(dt, &mut self.host);
        swb::to_value(&out).map_err(|e| JsError::new(&format!("outputs error: {e}")))
    }

    /// Original track indices kept for `clip` by the configured clip transforms.
    #[wasm_bindgen(js_name = retained_track_indices)]
    pub fn retained_track_indices(&self, clip: String, track_count: u32) -> Vec<u32> {
        self.session
            .config()
            .clip_transforms
            .for_clip(&clip)
            .retained_indices(track_count as usize)
            .into_iter()
            .map(|i| i as u32)
            .collect()
    }

    #[wasm_bindgen(js_name = is_busy)]
    pub fn is_busy(&self) -> bool {
        self.session.is_busy()
    }

    /// Director state name, or undefined before a model is bound.
    #[wasm_bindgen]
    pub fn state(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.session.director_state())
            .map_err(|e| JsError::new(&format!("state error: {e}")))
    }

    /// Effective configuration as a JSON string.
    #[wasm_bindgen(js_name = config_json)]
    pub fn config_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.session.config())
            .map_err(|e| JsError::new(&format!("config error: {e}")))
    }

    /// Cancel pending timers and snap back to idle.
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.session.reset(&mut self.host);
    }

    /// Cancel pending timers and release the model.
    #[wasm_bindgen]
    pub fn teardown(&mut self) {
        self.session.teardown(&mut self.host);
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
