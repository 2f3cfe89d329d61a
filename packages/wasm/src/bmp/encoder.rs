//! Monochrome BMP encoder - pure Rust implementation

use crate::otb::{bit_at, OtbImage};
use crate::utils::{write_i32_le, write_u16_le, write_u32_le};

pub const FILE_HEADER_SIZE: u32 = 14;
pub const INFO_HEADER_SIZE: u32 = 40;
pub const COLOR_TABLE_SIZE: u32 = 8;
pub const PIXEL_DATA_OFFSET: u32 = FILE_HEADER_SIZE + INFO_HEADER_SIZE + COLOR_TABLE_SIZE;

/// ~72 DPI
const PIXELS_PER_METER: i32 = 2835;

/// Palette as stored on disk. Index 0 receives inverted ink bits.
pub const PALETTE: [[u8; 4]; 2] = [[0, 0, 0, 0], [255, 255, 255, 0]];

/// Bytes per row after 4-byte alignment.
#[inline]
pub fn padded_row_bytes(width: u32) -> u32 {
    width.div_ceil(8).div_ceil(4) * 4
}

/// Total size of the encoded file.
#[inline]
pub fn encoded_size(width: u32, height: u32) -> u32 {
    PIXEL_DATA_OFFSET + padded_row_bytes(width) * height
}

/// Encode a packed 1-bit bitstream (MSB-first, rows unpadded, 1 = ink)
/// into a top-down 1-bit BMP.
///
/// Bits missing from `packed` are emitted as background.
pub fn encode_mono_bmp(width: u32, height: u32, packed: &[u8]) -> Vec<u8> {
    let row_stride = padded_row_bytes(width);
    let pixel_data_size = row_stride * height;
    let file_size = PIXEL_DATA_OFFSET + pixel_data_size;
    let mut output = vec![0u8; file_size as usize];

    // File header (14 bytes)
    output[0] = 0x42; // 'B'
    output[1] = 0x4D; // 'M'
    write_u32_le(&mut output, 2, file_size);
    write_u32_le(&mut output, 6, 0); // Reserved
    write_u32_le(&mut output, 10, PIXEL_DATA_OFFSET);

    // BITMAPINFOHEADER (40 bytes)
    write_u32_le(&mut output, 14, INFO_HEADER_SIZE);
    write_i32_le(&mut output, 18, width as i32);
    write_i32_le(&mut output, 22, -(height as i32)); // Negative = top-down
    write_u16_le(&mut output, 26, 1); // Planes
    write_u16_le(&mut output, 28, 1); // Bits per pixel
    write_u32_le(&mut output, 30, 0); // BI_RGB
    write_u32_le(&mut output, 34, pixel_data_size);
    write_i32_le(&mut output, 38, PIXELS_PER_METER);
    write_i32_le(&mut output, 42, PIXELS_PER_METER);
    write_u32_le(&mut output, 46, 2); // Colors used
    write_u32_le(&mut output, 50, 2); // Important colors

    // Color table
    output[54..58].copy_from_slice(&PALETTE[0]);
    output[58..62].copy_from_slice(&PALETTE[1]);

    let data_start = PIXEL_DATA_OFFSET as usize;
    let width = width as usize;
    for y in 0..height as usize {
        let dst_row_offset = data_start + y * row_stride as usize;

        for x in 0..width {
            // Ink (1) becomes index 0; missing data stays background (1)
            let bit = match bit_at(packed, y * width + x) {
                Some(ink) => u8::from(!ink),
                None => 1,
            };
            output[dst_row_offset + x / 8] |= bit << (7 - (x % 8));
        }
    }

    output
}

/// Encode a validated OTB image.
pub fn encode_otb_image(image: &OtbImage) -> Vec<u8> {
    encode_mono_bmp(image.width as u32, image.height as u32, &image.data)
}
