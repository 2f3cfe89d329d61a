//! Monochrome BMP codec in pure Rust

mod decoder;
mod encoder;

pub use decoder::{decode_mono_bmp, BmpError, MonoBmp};
pub use encoder::{
    encode_mono_bmp, encode_otb_image, encoded_size, padded_row_bytes, PALETTE,
    PIXEL_DATA_OFFSET,
};

use wasm_bindgen::prelude::*;

/// Encode a packed 1-bit bitstream to BMP
#[wasm_bindgen(js_name = encodeMonoBmp)]
pub fn encode_mono_bmp_js(width: u32, height: u32, data: &[u8]) -> Result<Vec<u8>, JsError> {
    if !(1..=255).contains(&width) || !(1..=255).contains(&height) {
        return Err(JsError::new(&format!(
            "Invalid dimensions: {}x{}",
            width, height
        )));
    }
    Ok(encode_mono_bmp(width, height, data))
}

/// Get image dimensions from a 1-bit BMP header
#[wasm_bindgen(js_name = getBmpDimensions)]
pub fn get_bmp_dimensions(data: &[u8]) -> Result<Vec<u32>, JsError> {
    let bmp = decode_mono_bmp(data).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(vec![bmp.width, bmp.height])
}
