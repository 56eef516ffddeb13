//! CPU based encoding.

mod etc1;
#[cfg(target_arch = "x86_64")]
mod etc1_avx2;
#[cfg(target_arch = "x86_64")]
mod etc1_sse41;
pub(crate) mod tables;

use crate::{blocks_byte_size, encode::etc1::BlockCompressorEtc1, Etc1Settings, SelectorPrecision};

/// Selector-search implementation, resolved once per call from the settings
/// and the CPU features, then held fixed so every block of a run goes
/// through the same numeric path.
#[derive(Copy, Clone, Debug)]
pub(crate) enum SelectorKernel {
    Exact,
    Fast,
    #[cfg(target_arch = "x86_64")]
    ExactSse41,
    #[cfg(target_arch = "x86_64")]
    FastSse41,
    #[cfg(target_arch = "x86_64")]
    FastAvx2,
}

impl SelectorKernel {
    pub(crate) fn detect(precision: SelectorPrecision) -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            // The SSE4.1 exact kernel is bit-identical to the scalar one, so
            // upgrading is safe; the fast kernels are likewise identical to
            // each other.
            return match precision {
                SelectorPrecision::Exact if is_x86_feature_detected!("sse4.1") => Self::ExactSse41,
                SelectorPrecision::Exact => Self::Exact,
                SelectorPrecision::Fast if is_x86_feature_detected!("avx2") => Self::FastAvx2,
                SelectorPrecision::Fast if is_x86_feature_detected!("sse4.1") => Self::FastSse41,
                SelectorPrecision::Fast => Self::Fast,
            };
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            match precision {
                SelectorPrecision::Exact => Self::Exact,
                SelectorPrecision::Fast => Self::Fast,
            }
        }
    }
}

/// Compresses raw BGRA8 data into the ETC1 block compressed format.
///
/// # Data Layout Requirements
/// The input data must be BGRA8 (blue first, 32 bits per pixel; the fourth
/// byte is ignored) in row-major order, with optional stride for padding
/// between rows.
///
/// # Buffer Requirements
/// The destination buffer must have sufficient capacity to store the
/// compressed blocks. The required size can be calculated with
/// [`crate::blocks_byte_size`].
///
/// # Arguments
/// * `bgra_data` - Source BGRA8 pixel data
/// * `blocks_buffer` - Destination buffer for the compressed blocks
/// * `width` - Width of the image in pixels
/// * `height` - Height of the image in pixels
/// * `stride` - Number of bytes per row in the source data.
///              Must be `width * 4` for tightly packed BGRA data.
/// * `settings` - Encoding settings
///
/// # Panics
/// * If `width` or `height` is not a multiple of 4
/// * If the destination `blocks_buffer` is too small to hold the compressed
///   data
pub fn compress_bgra8(
    bgra_data: &[u8],
    blocks_buffer: &mut [u8],
    width: u32,
    height: u32,
    stride: u32,
    settings: Etc1Settings,
) {
    assert_eq!(height % 4, 0);
    assert_eq!(width % 4, 0);

    let required_size = blocks_byte_size(width, height);

    assert!(
        blocks_buffer.len() >= required_size,
        "blocks_buffer size ({}) is too small to hold compressed blocks. Required size: {}",
        blocks_buffer.len(),
        required_size
    );

    let kernel = SelectorKernel::detect(settings.precision);

    let stride = stride as usize;
    let block_width = (width as usize + 3) / 4;

    #[cfg(feature = "rayon")]
    {
        use rayon::prelude::*;
        use strength_reduce::StrengthReducedUsize;

        let blocks_per_row = StrengthReducedUsize::new(block_width);

        blocks_buffer[..required_size]
            .par_chunks_exact_mut(8)
            .enumerate()
            .for_each(|(index, out)| {
                let yy = index / blocks_per_row;
                let xx = index % blocks_per_row;

                let mut block_compressor = BlockCompressorEtc1::default();
                block_compressor.load_block_interleaved_bgra(bgra_data, xx, yy, stride);
                let word = block_compressor.compress_block_etc1_core(kernel);
                out.copy_from_slice(&word.to_le_bytes());
            });
    }

    #[cfg(not(feature = "rayon"))]
    {
        let block_height = (height as usize + 3) / 4;

        for yy in 0..block_height {
            for xx in 0..block_width {
                let mut block_compressor = BlockCompressorEtc1::default();

                block_compressor.load_block_interleaved_bgra(bgra_data, xx, yy, stride);
                let word = block_compressor.compress_block_etc1_core(kernel);
                block_compressor.store_data(blocks_buffer, block_width, xx, yy, word);
            }
        }
    }
}

/// Compresses a single row-major 4×4 BGRA8 block into one 8-byte ETC1 block.
pub fn compress_block_bgra8(block: &[u8; 64], settings: Etc1Settings) -> [u8; 8] {
    let pixels: &[[u8; 4]; 16] = bytemuck::cast_ref(block);

    let mut block_compressor = BlockCompressorEtc1::default();
    block_compressor.load_block_rows(pixels);

    let kernel = SelectorKernel::detect(settings.precision);
    block_compressor
        .compress_block_etc1_core(kernel)
        .to_le_bytes()
}
