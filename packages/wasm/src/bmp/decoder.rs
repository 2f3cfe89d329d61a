//! Monochrome BMP reader - pure Rust implementation

use thiserror::Error;

use crate::utils::{read_i32_le, read_u16_le, read_u32_le};

const BI_RGB: u32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BmpError {
    #[error("BMP data too small")]
    TooSmall,
    #[error("Invalid BMP signature")]
    InvalidSignature,
    #[error("Unsupported DIB header size: {0}")]
    UnsupportedHeaderSize(u32),
    #[error("Unsupported bits per pixel: {0}")]
    UnsupportedBitDepth(u16),
    #[error("Unsupported compression: {0}")]
    UnsupportedCompression(u32),
    #[error("Pixel data offset {0} overlaps the headers")]
    InvalidDataOffset(usize),
    #[error("Invalid dimensions")]
    InvalidDimensions,
    #[error("BMP data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// A 1-bit indexed BMP, rows kept in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonoBmp {
    pub width: u32,
    pub height: u32,
    pub top_down: bool,
    pub palette: [[u8; 4]; 2],
    pub row_stride: usize,
    pub rows: Vec<u8>,
}

impl MonoBmp {
    /// Palette index at `(x, y)`, where `y = 0` is the top row.
    pub fn index(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let src_y = if self.top_down { y } else { self.height - 1 - y };
        let byte = self.rows[src_y as usize * self.row_stride + x as usize / 8];
        Some((byte >> (7 - (x % 8))) & 1)
    }
}

/// Read back a 1-bit uncompressed BMP.
pub fn decode_mono_bmp(data: &[u8]) -> Result<MonoBmp, BmpError> {
    if data.len() < 54 {
        return Err(BmpError::TooSmall);
    }

    if data[0] != 0x42 || data[1] != 0x4D {
        return Err(BmpError::InvalidSignature);
    }

    let data_offset = read_u32_le(data, 10) as usize;

    let dib_size = read_u32_le(data, 14);
    if dib_size < 40 {
        return Err(BmpError::UnsupportedHeaderSize(dib_size));
    }

    let width = read_i32_le(data, 18);
    let height = read_i32_le(data, 22);
    let bits_per_pixel = read_u16_le(data, 28);
    let compression = read_u32_le(data, 30);

    if bits_per_pixel != 1 {
        return Err(BmpError::UnsupportedBitDepth(bits_per_pixel));
    }
    if compression != BI_RGB {
        return Err(BmpError::UnsupportedCompression(compression));
    }

    let top_down = height < 0;
    let abs_width = width.unsigned_abs();
    let abs_height = height.unsigned_abs();
    if abs_width == 0 || abs_height == 0 {
        return Err(BmpError::InvalidDimensions);
    }

    // Header fields are untrusted; on 32-bit targets these sums can wrap
    let truncated = |expected: Option<usize>| BmpError::Truncated {
        expected: expected.unwrap_or(usize::MAX),
        actual: data.len(),
    };
    let color_table_offset = 14usize.checked_add(dib_size as usize);
    let color_table_end = color_table_offset.and_then(|offset| offset.checked_add(8));
    let (Some(color_table_offset), Some(color_table_end)) = (color_table_offset, color_table_end)
    else {
        return Err(truncated(None));
    };
    if data.len() < color_table_end {
        return Err(truncated(Some(color_table_end)));
    }
    let table = &data[color_table_offset..color_table_end];
    let palette = [
        [table[0], table[1], table[2], table[3]],
        [table[4], table[5], table[6], table[7]],
    ];

    if data_offset < color_table_end {
        return Err(BmpError::InvalidDataOffset(data_offset));
    }

    let row_stride = (abs_width as usize).div_ceil(32) * 4;
    let pixel_end = row_stride
        .checked_mul(abs_height as usize)
        .and_then(|size| size.checked_add(data_offset));
    let pixel_end = match pixel_end {
        Some(end) if end <= data.len() => end,
        other => return Err(truncated(other)),
    };

    Ok(MonoBmp {
        width: abs_width,
        height: abs_height,
        top_down,
        palette,
        row_stride,
        rows: data[data_offset..pixel_end].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bmp::encoder::encode_mono_bmp;

    #[test]
    fn test_roundtrip() {
        // 5x2: 10110 01001
        let encoded = encode_mono_bmp(5, 2, &[0b1011_0010, 0b0100_0000]);
        let decoded = decode_mono_bmp(&encoded).unwrap();

        assert_eq!(decoded.width, 5);
        assert_eq!(decoded.height, 2);
        assert!(decoded.top_down);
        assert_eq!(decoded.palette, [[0, 0, 0, 0], [255, 255, 255, 0]]);

        let ink = [[1, 0, 1, 1, 0], [0, 1, 0, 0, 1]];
        for (y, row) in ink.iter().enumerate() {
            for (x, &bit) in row.iter().enumerate() {
                assert_eq!(decoded.index(x as u32, y as u32), Some(1 - bit));
            }
        }
        assert_eq!(decoded.index(5, 0), None);
    }

    #[test]
    fn test_bottom_up_rows() {
        let mut encoded = encode_mono_bmp(1, 2, &[0b1000_0000]);
        // Flip the header to bottom-up and swap the two rows
        encoded[22..26].copy_from_slice(&2i32.to_le_bytes());
        encoded[62..].swap(0, 4);
        let decoded = decode_mono_bmp(&encoded).unwrap();
        assert!(!decoded.top_down);
        assert_eq!(decoded.index(0, 0), Some(0));
        assert_eq!(decoded.index(0, 1), Some(1));
    }

    #[test]
    fn test_rejects_foreign_bmps() {
        assert_eq!(decode_mono_bmp(&[0u8; 10]), Err(BmpError::TooSmall));

        let mut encoded = encode_mono_bmp(8, 1, &[0xff]);
        encoded[0] = b'X';
        assert_eq!(decode_mono_bmp(&encoded), Err(BmpError::InvalidSignature));

        let mut encoded = encode_mono_bmp(8, 1, &[0xff]);
        encoded[28] = 24;
        assert_eq!(decode_mono_bmp(&encoded), Err(BmpError::UnsupportedBitDepth(24)));

        let mut encoded = encode_mono_bmp(8, 1, &[0xff]);
        encoded[30] = 2;
        assert_eq!(decode_mono_bmp(&encoded), Err(BmpError::UnsupportedCompression(2)));

        let mut encoded = encode_mono_bmp(8, 1, &[0xff]);
        encoded[14] = 12;
        assert_eq!(decode_mono_bmp(&encoded), Err(BmpError::UnsupportedHeaderSize(12)));

        let encoded = encode_mono_bmp(8, 4, &[0xff; 4]);
        assert_eq!(
            decode_mono_bmp(&encoded[..70]),
            Err(BmpError::Truncated {
                expected: 78,
                actual: 70
            })
        );
    }

    #[test]
    fn test_hostile_header_fields() {
        // Offset at the end of the address space with a huge height
        let mut encoded = encode_mono_bmp(32, 1, &[0; 4]);
        encoded[10..14].copy_from_slice(&u32::MAX.to_le_bytes());
        encoded[22..26].copy_from_slice(&(-0x4000_0000i32).to_le_bytes());
        encoded.resize(300, 0);
        assert!(matches!(
            decode_mono_bmp(&encoded),
            Err(BmpError::Truncated { actual: 300, .. })
        ));

        // Offset pointing into the headers
        let mut encoded = encode_mono_bmp(8, 1, &[0xff]);
        encoded[10..14].copy_from_slice(&20u32.to_le_bytes());
        assert_eq!(decode_mono_bmp(&encoded), Err(BmpError::InvalidDataOffset(20)));

        // DIB size large enough to push the color table past any buffer
        let mut encoded = encode_mono_bmp(8, 1, &[0xff]);
        encoded[14..18].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode_mono_bmp(&encoded),
            Err(BmpError::Truncated { actual: 66, .. })
        ));
    }
}
