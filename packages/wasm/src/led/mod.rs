//! WS2812B LED controller: colors, serial protocol, patterns and session

mod color;
mod pattern;
mod protocol;
mod session;

pub use color::{hsl_to_rgb, Rgb};
pub use pattern::{patterns_for, Arrangement, FramePattern, PatternKind, DEFAULT_FRAME_INTERVAL_MS};
pub use protocol::{device_lines, Command, ProtocolError, LINE_ENDING};
pub use session::{CommandSink, ConnectionState, LedSession, SessionConfig, SessionError};

use wasm_bindgen::prelude::*;

/// Browser-side controller. Commands queue up until JS drains them to the
/// serial port writer.
#[wasm_bindgen]
pub struct LedController {
    session: LedSession<Vec<String>>,
}

fn js_err(e: SessionError) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
impl LedController {
    #[wasm_bindgen(constructor)]
    pub fn new() -> LedController {
        LedController {
            session: LedSession::new(SessionConfig::default()),
        }
    }

    #[wasm_bindgen(js_name = baudRate)]
    pub fn baud_rate(&self) -> u32 {
        self.session.config().baud_rate
    }

    #[wasm_bindgen(js_name = isConnected)]
    pub fn is_connected(&self) -> bool {
        self.session.state() == ConnectionState::Connected
    }

    #[wasm_bindgen(js_name = beginConnect)]
    pub fn begin_connect(&mut self) -> Result<(), JsError> {
        self.session.begin_connect().map_err(js_err)
    }

    #[wasm_bindgen(js_name = finishConnect)]
    pub fn finish_connect(&mut self) -> Result<(), JsError> {
        self.session.finish_connect(Vec::new()).map_err(js_err)
    }

    #[wasm_bindgen(js_name = connectFailed)]
    pub fn connect_failed(&mut self) -> Result<(), JsError> {
        self.session.connect_failed().map_err(js_err)
    }

    /// Returns the commands not yet drained.
    pub fn disconnect(&mut self) -> Result<Vec<String>, JsError> {
        let sink = self.session.disconnect().map_err(js_err)?;
        Ok(sink.unwrap_or_default())
    }

    /// Lines waiting to be written to the port, terminators included.
    #[wasm_bindgen(js_name = drainCommands)]
    pub fn drain_commands(&mut self) -> Vec<String> {
        self.session
            .sink_mut()
            .map(std::mem::take)
            .unwrap_or_default()
    }

    #[wasm_bindgen(js_name = setLayout)]
    pub fn set_layout(&mut self, led_count: usize, arrangement: &str) -> Result<(), JsError> {
        let arrangement: Arrangement = arrangement.parse().map_err(|e: String| JsError::new(&e))?;
        self.session.set_layout(led_count, arrangement).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setLed)]
    pub fn set_led(&mut self, index: usize, hex: &str) -> Result<(), JsError> {
        self.session.set_led(index, Rgb::from_hex(hex)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = fillAll)]
    pub fn fill_all(&mut self, hex: &str) -> Result<(), JsError> {
        self.session.fill(Rgb::from_hex(hex)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = clearAll)]
    pub fn clear_all(&mut self) -> Result<(), JsError> {
        self.session.clear().map_err(js_err)
    }

    #[wasm_bindgen(js_name = randomColors)]
    pub fn random_colors(&mut self) -> Result<(), JsError> {
        self.session
            .randomize(|| (js_sys::Math::random() * 256.0) as u8)
            .map_err(js_err)
    }

    #[wasm_bindgen(js_name = setBrightness)]
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), JsError> {
        self.session.set_brightness(brightness).map_err(js_err)
    }

    /// Names of the patterns available for the current layout.
    #[wasm_bindgen(js_name = patternNames)]
    pub fn pattern_names(&self) -> Vec<String> {
        self.session
            .patterns()
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Start pattern `index` of `patternNames()`.
    #[wasm_bindgen(js_name = runPattern)]
    pub fn run_pattern(&mut self, index: usize, now_ms: f64) -> Result<(), JsError> {
        let kind = *self
            .session
            .patterns()
            .get(index)
            .ok_or_else(|| JsError::new(&format!("unknown pattern index: {}", index)))?;
        self.session.run_pattern(kind, now_ms as u64);
        Ok(())
    }

    #[wasm_bindgen(js_name = stopPattern)]
    pub fn stop_pattern(&mut self) {
        self.session.stop_pattern();
    }

    /// Call from `requestAnimationFrame` or a timer; returns whether a frame was rendered.
    pub fn tick(&mut self, now_ms: f64) -> Result<bool, JsError> {
        self.session.tick(now_ms as u64).map_err(js_err)
    }

    /// Current colors as `[r, g, b, r, g, b, ...]`, before brightness.
    pub fn colors(&self) -> Vec<u8> {
        self.session
            .leds()
            .iter()
            .flat_map(|c| [c.r, c.g, c.b])
            .collect()
    }

    /// Device output lines for the status bar.
    #[wasm_bindgen(js_name = deviceLines)]
    pub fn parse_device_lines(chunk: &str) -> Vec<String> {
        device_lines(chunk).map(str::to_string).collect()
    }
}

impl Default for LedController {
    fn default() -> Self {
        Self::new()
    }
}
