//! Nokia OTB (Over The air Bitmap) reader

mod error;
mod parser;

pub use error::OtbError;
pub(crate) use parser::bit_at;
pub use parser::{parse_otb, OtbImage, HEADER_SIZE};

use wasm_bindgen::prelude::*;

/// Parse an OTB header and validate its body
///
/// Returns: [width, height, color_depth]
#[wasm_bindgen(js_name = parseOtb)]
pub fn parse_otb_js(data: &[u8]) -> Result<Vec<u32>, JsError> {
    let image = parse_otb(data).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(vec![
        image.width as u32,
        image.height as u32,
        image.color_depth as u32,
    ])
}

/// Decode OTB to RGBA for canvas rendering
#[wasm_bindgen(js_name = otbToRgba)]
pub fn otb_to_rgba_js(data: &[u8]) -> Result<Vec<u8>, JsError> {
    parse_otb(data)
        .map(|image| image.to_rgba())
        .map_err(|e| JsError::new(&e.to_string()))
}
