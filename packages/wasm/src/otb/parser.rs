//! OTB parser - pure Rust implementation
//!
//! Layout: `[unused, width, height, color_depth, packed bits...]`. The body is
//! one continuous MSB-first bitstream of `width * height` bits; rows are not
//! padded.

use log::{debug, warn};

use super::error::OtbError;

pub const HEADER_SIZE: usize = 4;

/// A validated monochrome OTB image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtbImage {
    pub width: u8,
    pub height: u8,
    pub color_depth: u8,
    /// Everything after the header. May be longer than `packed_byte_count()`.
    pub data: Vec<u8>,
}

impl OtbImage {
    #[inline]
    pub fn row_bits(&self) -> usize {
        self.width as usize
    }

    #[inline]
    pub fn total_bits(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn packed_byte_count(&self) -> usize {
        self.total_bits().div_ceil(8)
    }

    /// Source bit at `(x, y)`: `true` is ink, `false` is background.
    ///
    /// `None` outside the image or past the end of the packed data.
    pub fn pixel(&self, x: usize, y: usize) -> Option<bool> {
        if x >= self.width as usize || y >= self.height as usize {
            return None;
        }
        bit_at(&self.data, y * self.row_bits() + x)
    }

    /// RGBA preview: ink is opaque black, background and missing bits are opaque white.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut output = Vec::with_capacity(self.total_bits() * 4);
        for y in 0..self.height as usize {
            for x in 0..self.width as usize {
                let v = if self.pixel(x, y).unwrap_or(false) { 0 } else { 255 };
                output.extend_from_slice(&[v, v, v, 255]);
            }
        }
        output
    }
}

/// Bit `index` of an MSB-first packed bitstream, `None` past the end.
#[inline]
pub(crate) fn bit_at(packed: &[u8], index: usize) -> Option<bool> {
    packed
        .get(index / 8)
        .map(|byte| (byte >> (7 - (index % 8))) & 1 == 1)
}

/// Parse and validate an OTB buffer.
pub fn parse_otb(data: &[u8]) -> Result<OtbImage, OtbError> {
    let image = validate(data);
    match &image {
        Ok(img) => debug!(
            "accepted OTB {}x{} ({} bytes)",
            img.width,
            img.height,
            data.len()
        ),
        Err(e) => warn!("rejected OTB input ({} bytes): {}", data.len(), e),
    }
    image
}

fn validate(data: &[u8]) -> Result<OtbImage, OtbError> {
    if data.len() <= HEADER_SIZE {
        return Err(OtbError::TooSmall);
    }

    let width = data[1];
    let height = data[2];
    let color_depth = data[3];
    let body = &data[HEADER_SIZE..];

    if width == 0 || height == 0 {
        return Err(OtbError::InvalidDimensions);
    }

    let expected = (width as usize * height as usize).div_ceil(8);
    if body.len() < expected {
        return Err(OtbError::InsufficientBitmapData {
            expected,
            actual: body.len(),
        });
    }

    if color_depth != 1 {
        return Err(OtbError::UnsupportedColorDepth(color_depth));
    }

    Ok(OtbImage {
        width,
        height,
        color_depth,
        data: body.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_byte_row() {
        let img = parse_otb(&[0x00, 0x08, 0x01, 0x01, 0xff]).unwrap();
        assert_eq!(img.width, 8);
        assert_eq!(img.height, 1);
        assert_eq!(img.color_depth, 1);
        assert_eq!(img.data, vec![0xff]);
        assert_eq!(img.packed_byte_count(), 1);
    }

    #[test]
    fn test_header_only_is_too_small() {
        assert_eq!(parse_otb(&[]), Err(OtbError::TooSmall));
        assert_eq!(parse_otb(&[0x00, 0x01, 0x01, 0x01]), Err(OtbError::TooSmall));
    }

    #[test]
    fn test_zero_dimension() {
        let mut data = vec![0x00, 0x00, 0x05, 0x01];
        data.extend_from_slice(&[0xff; 64]);
        assert_eq!(parse_otb(&data), Err(OtbError::InvalidDimensions));
        assert_eq!(
            parse_otb(&[0x00, 0x05, 0x00, 0x07, 0x00]),
            Err(OtbError::InvalidDimensions)
        );
    }

    #[test]
    fn test_insufficient_data_reports_counts() {
        // 16x2 needs 4 bytes
        let err = parse_otb(&[0x00, 0x10, 0x02, 0x01, 0xaa, 0xbb]).unwrap_err();
        assert_eq!(
            err,
            OtbError::InsufficientBitmapData {
                expected: 4,
                actual: 2
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid OTB file: Expected 4 bytes for bitmap data, got 2"
        );
    }

    #[test]
    fn test_length_checked_before_depth() {
        let err = parse_otb(&[0x00, 0x10, 0x02, 0x02, 0xaa]).unwrap_err();
        assert!(matches!(err, OtbError::InsufficientBitmapData { .. }));
    }

    #[test]
    fn test_unsupported_depth() {
        assert_eq!(
            parse_otb(&[0x00, 0x08, 0x01, 0x02, 0xff]),
            Err(OtbError::UnsupportedColorDepth(2))
        );
    }

    #[test]
    fn test_pixel_is_continuous_bitstream() {
        // 3x3: bits 101 010 101 -> 0b1010_1010, 0b1000_0000
        let img = parse_otb(&[0x00, 0x03, 0x03, 0x01, 0xaa, 0x80]).unwrap();
        assert_eq!(img.pixel(0, 0), Some(true));
        assert_eq!(img.pixel(1, 0), Some(false));
        assert_eq!(img.pixel(0, 1), Some(false));
        assert_eq!(img.pixel(1, 1), Some(true));
        assert_eq!(img.pixel(2, 2), Some(true));
        assert_eq!(img.pixel(3, 0), None);
    }

    #[test]
    fn test_to_rgba() {
        let img = parse_otb(&[0x00, 0x02, 0x01, 0x01, 0x80]).unwrap();
        assert_eq!(img.to_rgba(), vec![0, 0, 0, 255, 255, 255, 255, 255]);
    }
}
