//! # etc1_compression
//!
//! ETC1 texture block compression on the CPU.
//!
//! Each 4×4 block of BGRA8 pixels is encoded into one 64-bit ETC1 word. The
//! encoder searches two geometric partitions crossed with two base-color
//! encodings, then fits one of eight intensity modifier tables and a 2-bit
//! selector per pixel to each sub-block.
//!
//! Two selector-search precisions are available:
//!
//!  * [`SelectorPrecision::Exact`] evaluates the selector error at full
//!    integer precision and is bit-reproducible across machines.
//!  * [`SelectorPrecision::Fast`] halves the luma weights so the search fits
//!    16-bit SIMD lanes; selector choices can differ slightly from the exact
//!    search in exchange for a large speedup.
//!
//! On x86-64 the search is accelerated with SSE4.1 or AVX2 kernels when the
//! CPU supports them; the kernel is picked once per call and the output for a
//! given precision is identical regardless of which kernel ran.
pub mod decode;
pub mod encode;
mod settings;

pub use settings::{Etc1Settings, SelectorPrecision};

/// Byte size of one compressed ETC1 block.
pub const BLOCK_BYTE_SIZE: u32 = 8;

/// Returns the compressed bytes per row of blocks for the given width.
///
/// The width is used to calculate how many blocks are needed per row, which
/// is then multiplied by the block size. Width is rounded up to the nearest
/// multiple of 4.
pub const fn bytes_per_row(width: u32) -> u32 {
    let blocks_per_row = (width + 3) / 4;
    blocks_per_row * BLOCK_BYTE_SIZE
}

/// Returns the byte size required for storing the compressed blocks of an
/// image with the given dimensions.
///
/// Width and height are rounded up to the nearest multiple of 4.
pub const fn blocks_byte_size(width: u32, height: u32) -> usize {
    let block_width = (width as usize + 3) / 4;
    let block_height = (height as usize + 3) / 4;
    block_width * block_height * BLOCK_BYTE_SIZE as usize
}
