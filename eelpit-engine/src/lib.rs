use wasm_bindgen::prelude::*;

// ============================================================================
// EEL PIT - Ribbon eels, breadcrumbs, and a ritual that goes too far
// ============================================================================

pub mod audio;
pub mod config;
pub mod error;
pub mod event;
pub mod math;
pub mod render;
pub mod ritual;
pub mod sim;
pub mod world;

pub use config::{PitConfig, Smoothing};
pub use error::PitError;
pub use event::{Effect, PitEvent};
pub use sim::{Motion, PitWorld};

#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Decode page options; `undefined`/`null` mean defaults. Without a seed the
/// pit is seeded from `Math.random()`.
fn decode_options(options: JsValue) -> Result<PitConfig, PitError> {
    let mut config: PitConfig = if options.is_undefined() || options.is_null() {
        PitConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options)?
    };
    if config.seed.is_none() {
        config.seed = Some((js_sys::Math::random() * u32::MAX as f64) as u64);
    }
    Ok(config)
}

#[wasm_bindgen]
pub struct EelPit {
    world: PitWorld,
}

#[wasm_bindgen]
impl EelPit {
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<EelPit, JsValue> {
        let config = decode_options(options).map_err(js_error)?;
        let world = PitWorld::new(config).map_err(js_error)?;
        Ok(Self { world })
    }

    /// requestAnimationFrame callback; `ts` in milliseconds.
    pub fn frame(&mut self, ts: f64) {
        self.world.frame(ts);
    }

    #[wasm_bindgen(js_name = openGate)]
    pub fn open_gate(&mut self) {
        self.world.send(PitEvent::OpenGate);
    }

    pub fn feed(&mut self) {
        self.world.send(PitEvent::Feed);
    }

    #[wasm_bindgen(js_name = toggleExtreme)]
    pub fn toggle_extreme(&mut self) {
        self.world.send(PitEvent::ToggleExtreme);
    }

    #[wasm_bindgen(js_name = toggleQuiet)]
    pub fn toggle_quiet(&mut self) {
        self.world.send(PitEvent::ToggleQuiet);
    }

    #[wasm_bindgen(js_name = syncEyes)]
    pub fn sync_eyes(&mut self) {
        self.world.send(PitEvent::SyncEyes);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.world.send(PitEvent::PointerMove { x, y });
    }

    pub fn click(&mut self, x: f32, y: f32) {
        self.world.send(PitEvent::Click { x, y });
    }

    /// Post any event as a plain object, e.g. `{ type: "spawnSnake", y: 200 }`.
    pub fn send(&mut self, event: JsValue) -> Result<(), JsValue> {
        let event: PitEvent = serde_wasm_bindgen::from_value(event).map_err(js_error)?;
        self.world.send(event);
        Ok(())
    }

    #[wasm_bindgen(js_name = setVisible)]
    pub fn set_visible(&mut self, visible: bool) {
        self.world.set_visible(visible);
    }

    pub fn resize(&mut self, w: f32, h: f32) -> bool {
        self.world.resize(w, h)
    }

    #[wasm_bindgen(js_name = drainEffects)]
    pub fn drain_effects(&mut self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.world.drain_effects()).map_err(js_error)
    }

    pub fn stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.world.stats()).map_err(js_error)
    }

    // Accessors for WASM
    #[wasm_bindgen(js_name = ritualLevel)]
    pub fn ritual_level(&self) -> u32 { self.world.ritual_level() }
    pub fn maelstrom(&self) -> bool { self.world.is_maelstrom() }
    pub fn extreme(&self) -> bool { self.world.flags().extreme }
    pub fn quiet(&self) -> bool { self.world.flags().quiet }
    #[wasm_bindgen(js_name = pitOpen)]
    pub fn pit_open(&self) -> bool { self.world.flags().pit_open }
    pub fn fps(&self) -> f32 { self.world.fps() }
    #[wasm_bindgen(js_name = snakeCount)]
    pub fn snake_count(&self) -> usize { self.world.snakes().len() }
    #[wasm_bindgen(js_name = crumbCount)]
    pub fn crumb_count(&self) -> usize { self.world.crumbs().len() }
    #[wasm_bindgen(js_name = eyeCount)]
    pub fn eye_count(&self) -> usize { self.world.eyes().len() }

    #[wasm_bindgen(js_name = segmentsPtr)]
    pub fn segments_ptr(&self) -> *const f32 { self.world.encoder().segments().as_ptr() }
    #[wasm_bindgen(js_name = segmentsLen)]
    pub fn segments_len(&self) -> usize { self.world.encoder().segments().len() }
    #[wasm_bindgen(js_name = crumbsPtr)]
    pub fn crumbs_ptr(&self) -> *const f32 { self.world.encoder().crumbs().as_ptr() }
    #[wasm_bindgen(js_name = crumbsLen)]
    pub fn crumbs_len(&self) -> usize { self.world.encoder().crumbs().len() }
    #[wasm_bindgen(js_name = eyesPtr)]
    pub fn eyes_ptr(&self) -> *const f32 { self.world.encoder().eyes().as_ptr() }
    #[wasm_bindgen(js_name = eyesLen)]
    pub fn eyes_len(&self) -> usize { self.world.encoder().eyes().len() }
    #[wasm_bindgen(js_name = splatsPtr)]
    pub fn splats_ptr(&self) -> *const f32 { self.world.encoder().splats().as_ptr() }
    #[wasm_bindgen(js_name = splatsLen)]
    pub fn splats_len(&self) -> usize { self.world.encoder().splats().len() }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn handle_accepts_missing_options() {
        let pit = EelPit::new(JsValue::UNDEFINED).expect("pit");
        assert_eq!(pit.ritual_level(), 0);
        assert!(!pit.pit_open());
    }

    #[wasm_bindgen_test]
    fn handle_rejects_bad_viewport() {
        let options = serde_wasm_bindgen::to_value(&PitConfig {
            width: -1.0,
            ..PitConfig::default()
        })
        .expect("options");
        assert!(EelPit::new(options).is_err());
    }

    #[wasm_bindgen_test]
    fn feeding_through_the_handle() {
        let options = serde_wasm_bindgen::to_value(&PitConfig {
            seed: Some(9),
            ..PitConfig::default()
        })
        .expect("options");
        let mut pit = EelPit::new(options).expect("pit");

        pit.feed();
        pit.frame(0.0);
        pit.frame(16.0);
        assert!(pit.pit_open());
        assert_eq!(pit.ritual_level(), 1);

        let effects = pit.drain_effects().expect("effects");
        assert!(js_sys::Array::is_array(&effects));
        assert!(js_sys::Array::from(&effects).length() > 0);
        assert_eq!(pit.crumbs_len(), pit.crumb_count() * render::CRUMB_STRIDE);
    }

    #[wasm_bindgen_test]
    fn generic_events_decode() {
        let mut pit = EelPit::new(JsValue::UNDEFINED).expect("pit");
        let event = serde_wasm_bindgen::to_value(&PitEvent::Click { x: 3.0, y: 4.0 }).expect("event");
        pit.send(event).expect("send");
        pit.frame(0.0);
        assert_eq!(pit.splats_len(), render::SPLAT_STRIDE);
    }
}
