//! otb-wasm: Nokia OTB picture conversion and WS2812B LED control, compiled to WebAssembly
//!
//! The OTB to BMP codec is written from scratch; the LED session drives a
//! serial-attached strip through a line-based text protocol.

use wasm_bindgen::prelude::*;

pub mod bmp;
pub mod convert;
pub mod led;
pub mod otb;
pub mod utils;

pub use convert::{bmp_file_name, convert_batch, otb_to_bmp, FileInfo};
pub use otb::{parse_otb, OtbError, OtbImage};

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    log::debug!("otb-wasm {} initialized", env!("CARGO_PKG_VERSION"));
}

/// Get WASM module version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check if parallel batch conversion is available
#[wasm_bindgen(js_name = hasThreads)]
pub fn has_threads() -> bool {
    cfg!(feature = "threads")
}
