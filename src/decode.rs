//! CPU based decoding, primarily used to measure encoder quality.

pub(crate) mod block;

pub use block::decode_block_bgra8;

use crate::blocks_byte_size;

/// Decompresses ETC1 blocks into a BGRA8 image (alpha is always 255).
///
/// # Panics
/// * If `width` or `height` is not a multiple of 4
/// * If the input or output slice does not match the expected size
pub fn decompress_blocks_bgra8(
    width: u32,
    height: u32,
    input_bitstream: &[u8],
    output_bitstream: &mut [u8],
) {
    assert_eq!(height % 4, 0);
    assert_eq!(width % 4, 0);

    let expected_input_size = blocks_byte_size(width, height);
    if input_bitstream.len() != expected_input_size {
        panic!("the input bitstream slice has not the expected size");
    }

    let expected_output_size = width as usize * height as usize * 4;
    if output_bitstream.len() != expected_output_size {
        panic!("the output slice has not the expected size");
    }

    let blocks_x = (width as usize + 3) / 4;
    let blocks_y = (height as usize + 3) / 4;
    let row_pitch = width as usize * 4;

    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let block_offset = (by * blocks_x + bx) * 8;
            let output_offset = by * 4 * row_pitch + bx * 16;

            decode_block_bgra8(
                &input_bitstream[block_offset..block_offset + 8],
                &mut output_bitstream[output_offset..],
                row_pitch,
            );
        }
    }
}
