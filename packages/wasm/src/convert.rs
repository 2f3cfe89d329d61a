//! OTB to BMP conversion

use log::debug;
#[cfg(feature = "threads")]
use rayon::prelude::*;
use wasm_bindgen::prelude::*;

use crate::bmp::encode_otb_image;
use crate::otb::{parse_otb, OtbError};

/// Summary of an accepted input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub file_name: String,
    pub size: usize,
    pub width: u8,
    pub height: u8,
}

impl FileInfo {
    pub fn from_otb(file_name: &str, data: &[u8]) -> Result<Self, OtbError> {
        let image = parse_otb(data)?;
        Ok(Self {
            file_name: file_name.to_string(),
            size: data.len(),
            width: image.width,
            height: image.height,
        })
    }
}

/// Validate an OTB buffer and re-encode it as a BMP file
pub fn otb_to_bmp(data: &[u8]) -> Result<Vec<u8>, OtbError> {
    let image = parse_otb(data)?;
    let bmp = encode_otb_image(&image);
    debug!(
        "encoded {}x{} OTB as {} byte BMP",
        image.width,
        image.height,
        bmp.len()
    );
    Ok(bmp)
}

/// Suggested download name: the last extension is replaced by `.bmp`
///
/// `1.otb` -> `1.bmp`, `logo` -> `logo.bmp`, `dir.v2/pic` -> `dir.v2/pic.bmp`
pub fn bmp_file_name(original: &str) -> String {
    let base = match original.rfind('.') {
        Some(dot) if dot + 1 < original.len() && !original[dot + 1..].contains('/') => {
            &original[..dot]
        }
        _ => original,
    };
    format!("{}.bmp", base)
}

/// Convert independent inputs; result `i` matches `otb_to_bmp(inputs[i])`
pub fn convert_batch(inputs: &[&[u8]]) -> Vec<Result<Vec<u8>, OtbError>> {
    #[cfg(feature = "threads")]
    {
        inputs.par_iter().map(|data| otb_to_bmp(data)).collect()
    }
    #[cfg(not(feature = "threads"))]
    {
        inputs.iter().map(|data| otb_to_bmp(data)).collect()
    }
}

/// Convert OTB to BMP
#[wasm_bindgen(js_name = otbToBmp)]
pub fn otb_to_bmp_js(data: &[u8]) -> Result<Vec<u8>, JsError> {
    otb_to_bmp(data).map_err(|e| JsError::new(&e.to_string()))
}

/// Convert OTB to BMP as a `Uint8Array`, ready for `new Blob([...], { type: 'image/bmp' })`
#[wasm_bindgen(js_name = otbToBmpBlob)]
pub fn otb_to_bmp_blob(data: &[u8]) -> Result<js_sys::Uint8Array, JsError> {
    let bmp = otb_to_bmp(data).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(js_sys::Uint8Array::from(bmp.as_slice()))
}

/// Download name for a converted file
#[wasm_bindgen(js_name = bmpFileName)]
pub fn bmp_file_name_js(original: &str) -> String {
    bmp_file_name(original)
}
