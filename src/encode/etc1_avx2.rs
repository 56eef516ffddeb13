//! AVX2 selector-search kernel.
//!
//! Same numeric contract as the SSE4.1 fast kernel, processing two pixels
//! per iteration, one per 128-bit lane. Consecutive pixels in scan order
//! always share a sub-block under every partition, so one assignment lookup
//! covers both.

use core::arch::x86_64::*;

use crate::encode::tables::INTENSITY_X128_HALF;

/// Reduced-precision search for two pixels at a time.
///
/// # Safety
///
/// The caller must have verified that the CPU supports AVX2.
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn fit_selectors_fast(
    block: &[[u8; 4]; 16],
    avg: &[[i32; 3]; 8],
    id: &[u8; 16],
    terr: &mut [[u32; 8]; 2],
    tsel: &mut [[u16; 8]; 16],
) {
    let small = _mm256_broadcastsi128_si256(_mm_loadu_si128(
        INTENSITY_X128_HALF[0].as_ptr() as *const __m128i
    ));
    let large = _mm256_broadcastsi128_si256(_mm_loadu_si128(
        INTENSITY_X128_HALF[1].as_ptr() as *const __m128i
    ));

    for i in (0..16).step_by(2) {
        let sub = id[i] as usize;
        let ter = terr[sub % 2].as_mut_ptr();

        let px0 = block[i];
        let px1 = block[i + 1];

        let dr0 = avg[sub][0] - px0[2] as i32;
        let dg0 = avg[sub][1] - px0[1] as i32;
        let db0 = avg[sub][2] - px0[0] as i32;

        let dr1 = avg[sub][0] - px1[2] as i32;
        let dg1 = avg[sub][1] - px1[1] as i32;
        let db1 = avg[sub][2] - px1[0] as i32;

        let pixel0 = dr0 * 38 + dg0 * 76 + db0 * 14;
        let pixel1 = dr1 * 38 + dg1 * 76 + db1 * 14;

        let pixel = _mm256_inserti128_si256::<1>(
            _mm256_set1_epi16(pixel0 as i16),
            _mm_set1_epi16(pixel1 as i16),
        );
        let pix = _mm256_abs_epi16(pixel);

        let error0 = _mm256_abs_epi16(_mm256_sub_epi16(pix, small));
        let error1 = _mm256_abs_epi16(_mm256_sub_epi16(pix, large));

        let index = _mm256_and_si256(_mm256_cmpgt_epi16(error0, error1), _mm256_set1_epi16(1));
        let min_error = _mm256_min_epi16(error0, error1);

        let min_index = _mm256_or_si256(
            index,
            _mm256_and_si256(
                _mm256_set1_epi16(2),
                _mm256_cmpgt_epi16(pixel, _mm256_setzero_si256()),
            ),
        );

        // Interleave the two pixels' errors per table so one madd yields the
        // eight per-table accumulator increments.
        let error_low = _mm256_permute4x64_epi64::<0b01_01_00_00>(min_error);
        let error_high = _mm256_permute4x64_epi64::<0b11_11_10_10>(min_error);
        let interleaved = _mm256_unpacklo_epi16(error_low, error_high);
        let square_sum = _mm256_madd_epi16(interleaved, interleaved);

        let acc = ter as *mut __m256i;
        _mm256_storeu_si256(acc, _mm256_add_epi32(square_sum, _mm256_loadu_si256(acc)));

        let sel = tsel.as_mut_ptr().add(i) as *mut __m256i;
        _mm256_storeu_si256(sel, min_index);
    }
}

#[cfg(test)]
mod tests {
    use crate::encode::{etc1::BlockCompressorEtc1, SelectorKernel};

    fn lcg_block(seed: &mut u32) -> [[u8; 4]; 16] {
        let mut block = [[0u8; 4]; 16];
        for px in block.iter_mut() {
            for c in px.iter_mut() {
                *seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
                *c = (*seed >> 24) as u8;
            }
        }
        block
    }

    #[test]
    fn fast_kernel_matches_scalar() {
        if !is_x86_feature_detected!("avx2") {
            return;
        }

        let mut seed = 0xFEED_BEEF;
        for _ in 0..256 {
            let pixels = lcg_block(&mut seed);
            let mut bc = BlockCompressorEtc1::default();
            bc.load_block_rows(&pixels);

            assert_eq!(
                bc.compress_block_etc1_core(SelectorKernel::Fast),
                bc.compress_block_etc1_core(SelectorKernel::FastAvx2),
            );
        }
    }
}
