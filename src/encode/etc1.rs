use crate::encode::{
    tables::{DEQUANT_4BIT, INTENSITY_X128_HALF, INTENSITY_X256, SUBBLOCK_INDEX},
    SelectorKernel,
};

/// Per-block ETC1 encoder state.
///
/// Pixels are kept in the format's column-major scan order (index
/// `x * 4 + y`), each as blue/green/red/ignored bytes. The partition maps,
/// the flip-bit semantics and the selector plane layout are all defined in
/// that order, so the reordering happens once at load time.
pub(crate) struct BlockCompressorEtc1 {
    block: [[u8; 4]; 16],
}

impl Default for BlockCompressorEtc1 {
    fn default() -> Self {
        Self {
            block: [[0; 4]; 16],
        }
    }
}

#[inline(always)]
const fn sq(x: i64) -> i64 {
    x * x
}

/// Rounds `v * max / 255` without a division.
#[inline(always)]
const fn rescale(v: i32, max: i32) -> i32 {
    let t = v * max + 128;
    (t + (t >> 8)) >> 8
}

fn least_error_index<T: PartialOrd>(err: &[T]) -> usize {
    let mut idx = 0;
    for i in 1..err.len() {
        if err[i] < err[idx] {
            idx = i;
        }
    }
    idx
}

impl BlockCompressorEtc1 {
    pub(crate) fn load_block_interleaved_bgra(
        &mut self,
        bgra_data: &[u8],
        xx: usize,
        yy: usize,
        stride: usize,
    ) {
        for y in 0..4 {
            for x in 0..4 {
                let pixel_x = xx * 4 + x;
                let pixel_y = yy * 4 + y;

                let offset = pixel_y * stride + pixel_x * 4;

                self.block[x * 4 + y] = [
                    bgra_data[offset],
                    bgra_data[offset + 1],
                    bgra_data[offset + 2],
                    bgra_data[offset + 3],
                ];
            }
        }
    }

    /// Loads a single row-major 4×4 block.
    pub(crate) fn load_block_rows(&mut self, pixels: &[[u8; 4]; 16]) {
        for y in 0..4 {
            for x in 0..4 {
                self.block[x * 4 + y] = pixels[y * 4 + x];
            }
        }
    }

    pub(crate) fn store_data(
        &self,
        blocks_buffer: &mut [u8],
        block_width: usize,
        xx: usize,
        yy: usize,
        word: u64,
    ) {
        let offset = (yy * block_width + xx) * 8;
        blocks_buffer[offset..offset + 8].copy_from_slice(&word.to_le_bytes());
    }

    /// Compresses the loaded block into an ETC1 word whose little-endian
    /// byte view is the storage order.
    pub(crate) fn compress_block_etc1_core(&self, kernel: SelectorKernel) -> u64 {
        if let Some(word) = self.try_encode_solid() {
            return word;
        }

        let mut stats = [[0u32; 4]; 4];
        let mut avg = [[0i32; 3]; 8];
        self.compute_subblock_stats(&mut stats, &mut avg);
        quantize_averages(&mut avg);

        let mut err = [0u32; 4];
        for i in 0..4 {
            err[i / 2] += quantization_error(&stats[i], &avg[i]);
            err[2 + i / 2] += quantization_error(&stats[i], &avg[i + 4]);
        }
        let idx = least_error_index(&err);

        let mut d = 0u64;
        pack_base_colors(&mut d, &avg, idx);

        let id = &SUBBLOCK_INDEX[idx];
        let mut tsel = [[0u16; 8]; 16];

        let word = match kernel {
            SelectorKernel::Exact => {
                let mut terr = [[0u64; 8]; 2];
                self.fit_selectors_exact(&mut terr, &mut tsel, &avg, id);
                pack_selectors(d, &terr, &tsel, id)
            }
            SelectorKernel::Fast => {
                let mut terr = [[0u32; 8]; 2];
                self.fit_selectors_fast(&mut terr, &mut tsel, &avg, id);
                pack_selectors(d, &terr, &tsel, id)
            }
            #[cfg(target_arch = "x86_64")]
            SelectorKernel::ExactSse41 => {
                let mut terr = [[0u64; 8]; 2];
                unsafe {
                    super::etc1_sse41::fit_selectors_exact(
                        &self.block,
                        &avg,
                        id,
                        &mut terr,
                        &mut tsel,
                    );
                }
                pack_selectors(d, &terr, &tsel, id)
            }
            #[cfg(target_arch = "x86_64")]
            SelectorKernel::FastSse41 => {
                let mut terr = [[0u32; 8]; 2];
                unsafe {
                    super::etc1_sse41::fit_selectors_fast(
                        &self.block,
                        &avg,
                        id,
                        &mut terr,
                        &mut tsel,
                    );
                }
                pack_selectors(d, &terr, &tsel, id)
            }
            #[cfg(target_arch = "x86_64")]
            SelectorKernel::FastAvx2 => {
                let mut terr = [[0u32; 8]; 2];
                unsafe {
                    super::etc1_avx2::fit_selectors_fast(
                        &self.block,
                        &avg,
                        id,
                        &mut terr,
                        &mut tsel,
                    );
                }
                pack_selectors(d, &terr, &tsel, id)
            }
        };

        to_storage_order(word)
    }

    /// Emits a finished word for a block whose 16 pixels are byte-identical.
    ///
    /// The word is assembled directly in storage order: differential mode,
    /// flip clear, base color from the top 5 bits of each channel, all
    /// selectors zero. It must not go through [`to_storage_order`].
    fn try_encode_solid(&self) -> Option<u64> {
        let first = self.block[0];
        if self.block[1..].iter().any(|px| *px != first) {
            return None;
        }

        Some(
            0x0200_0000
                | ((first[0] as u64 & 0xF8) << 16)
                | ((first[1] as u64 & 0xF8) << 8)
                | (first[2] as u64 & 0xF8),
        )
    }

    /// Channel sums and sums-of-squares for the four half-block pixel sets,
    /// plus the rounded half-block average colors.
    ///
    /// `stats[half]` holds blue/green/red sums and the combined sum of
    /// squares; halves 0..4 are right, left, bottom, top. Averages are
    /// stored red/green/blue.
    fn compute_subblock_stats(&self, stats: &mut [[u32; 4]; 4], avg: &mut [[i32; 3]; 8]) {
        let mut quad = [[0u32; 4]; 4];

        for (i, px) in self.block.iter().enumerate() {
            let q = &mut quad[((i >> 2) & 2) + ((i & 3) >> 1)];
            for c in 0..3 {
                let v = px[c] as u32;
                q[c] += v;
                q[3] += v * v;
            }
        }

        for c in 0..4 {
            stats[0][c] = quad[2][c] + quad[3][c];
            stats[1][c] = quad[0][c] + quad[1][c];
            stats[2][c] = quad[1][c] + quad[3][c];
            stats[3][c] = quad[0][c] + quad[2][c];
        }

        for i in 0..4 {
            avg[i] = [
                ((stats[i][2] + 4) / 8) as i32,
                ((stats[i][1] + 4) / 8) as i32,
                ((stats[i][0] + 4) / 8) as i32,
            ];
        }
    }

    /// Exact selector search: for every pixel and every intensity table,
    /// picks the index minimizing the squared luma-projected deviation and
    /// accumulates it per sub-block.
    fn fit_selectors_exact(
        &self,
        terr: &mut [[u64; 8]; 2],
        tsel: &mut [[u16; 8]; 16],
        avg: &[[i32; 3]; 8],
        id: &[u8; 16],
    ) {
        for (i, px) in self.block.iter().enumerate() {
            let sub = id[i] as usize;
            let ter = &mut terr[sub % 2];

            let dr = avg[sub][0] - px[2] as i32;
            let dg = avg[sub][1] - px[1] as i32;
            let db = avg[sub][2] - px[0] as i32;

            let pix = (dr * 77 + dg * 151 + db * 28) as i64;

            for (t, table) in INTENSITY_X256.iter().enumerate() {
                let mut idx = 0;
                let mut err = sq(table[0] as i64 + pix);
                for (j, &mag) in table.iter().enumerate().skip(1) {
                    let local = sq(mag as i64 + pix);
                    if local < err {
                        err = local;
                        idx = j;
                    }
                }
                tsel[i][t] = idx as u16;
                ter[t] += err as u64;
            }
        }
    }

    /// Reduced-precision selector search, the portable twin of the 16-bit
    /// SIMD kernels: halved luma weights, only the positive table half is
    /// searched and the sign bit comes from the projection's sign.
    /// Accumulators wrap like the packed vector adds do.
    fn fit_selectors_fast(
        &self,
        terr: &mut [[u32; 8]; 2],
        tsel: &mut [[u16; 8]; 16],
        avg: &[[i32; 3]; 8],
        id: &[u8; 16],
    ) {
        for (i, px) in self.block.iter().enumerate() {
            let sub = id[i] as usize;
            let ter = &mut terr[sub % 2];

            let dr = avg[sub][0] - px[2] as i32;
            let dg = avg[sub][1] - px[1] as i32;
            let db = avg[sub][2] - px[0] as i32;

            let pixel = dr * 38 + dg * 76 + db * 14;
            let pix = pixel.abs();
            let sign = if pixel > 0 { 2 } else { 0 };

            for t in 0..8 {
                let err0 = (pix - INTENSITY_X128_HALF[0][t] as i32).abs();
                let err1 = (pix - INTENSITY_X128_HALF[1][t] as i32).abs();

                let (idx, min_err) = if err1 < err0 { (1, err1) } else { (0, err0) };

                tsel[i][t] = (idx | sign) as u16;
                ter[t] = ter[t].wrapping_add((min_err as u32).wrapping_mul(min_err as u32));
            }
        }
    }
}

/// Quantizes the four half-block averages in place: `avg[4..8]` become the
/// differential-mode reconstructions (5-bit base, delta clamped to [-4, 3]),
/// then `avg[0..4]` are replaced by their individual-mode 4-bit
/// reconstructions.
fn quantize_averages(avg: &mut [[i32; 3]; 8]) {
    for i in 0..2 {
        for c in 0..3 {
            let c1 = rescale(avg[i * 2 + 1][c], 31);
            let c2 = rescale(avg[i * 2][c], 31);

            let diff = (c2 - c1).clamp(-4, 3);
            let co = c1 + diff;

            avg[5 + i * 2][c] = (c1 << 3) | (c1 >> 2);
            avg[4 + i * 2][c] = (co << 3) | (co >> 2);
        }
    }

    for entry in avg[..4].iter_mut() {
        for c in entry.iter_mut() {
            *c = DEQUANT_4BIT[rescale(*c, 15) as usize];
        }
    }
}

/// Sum of squared deviations of 8 pixels from a single average color,
/// computed in closed form from the half-block statistics.
fn quantization_error(stats: &[u32; 4], avg: &[i32; 3]) -> u32 {
    let mut err = stats[3] as i64;
    err -= stats[0] as i64 * 2 * avg[2] as i64;
    err -= stats[1] as i64 * 2 * avg[1] as i64;
    err -= stats[2] as i64 * 2 * avg[0] as i64;
    err += 8 * (sq(avg[0] as i64) + sq(avg[1] as i64) + sq(avg[2] as i64));
    err as u32
}

/// Writes the partition bits and the two base colors into the word skeleton.
/// Individual mode packs two 4-bit codes per channel byte; differential mode
/// packs a 5-bit base and the 3-bit two's-complement delta.
fn pack_base_colors(d: &mut u64, avg: &[[i32; 3]; 8], idx: usize) {
    *d |= (idx as u64) << 24;
    let base = idx << 1;

    if idx & 0x2 == 0 {
        for c in 0..3 {
            *d |= ((avg[base][c] as u64) >> 4) << (c * 8);
            *d |= ((avg[base + 1][c] as u64) >> 4) << (c * 8 + 4);
        }
    } else {
        for c in 0..3 {
            *d |= ((avg[base + 1][c] as u64) & 0xF8) << (c * 8);
            let delta = ((avg[base][c] & 0xF8) - (avg[base + 1][c] & 0xF8)) >> 3;
            *d |= ((delta & 0x7) as u64) << (c * 8);
        }
    }
}

/// Picks the minimum-error intensity table per sub-block and distributes the
/// recorded selector bits over the two 16-bit planes (magnitude low, sign
/// high), one bit per pixel in scan order.
fn pack_selectors<E: Copy + PartialOrd>(
    mut d: u64,
    terr: &[[E; 8]; 2],
    tsel: &[[u16; 8]; 16],
    id: &[u8; 16],
) -> u64 {
    let tidx = [least_error_index(&terr[0]), least_error_index(&terr[1])];

    d |= (tidx[0] as u64) << 26;
    d |= (tidx[1] as u64) << 29;

    for (i, sel) in tsel.iter().enumerate() {
        let t = sel[tidx[id[i] as usize % 2]] as u64;
        d |= (t & 0x1) << (i + 32);
        d |= (t & 0x2) << (i + 47);
    }

    d
}

/// Reverses the four selector bytes into storage order. The color and flag
/// bytes are already in place; the solid-block path never goes through this.
fn to_storage_order(d: u64) -> u64 {
    (d & 0x0000_0000_FFFF_FFFF)
        | ((d & 0xFF00_0000_0000_0000) >> 24)
        | ((d & 0x00FF_0000_0000_0000) >> 8)
        | ((d & 0x0000_FF00_0000_0000) << 8)
        | ((d & 0x0000_00FF_0000_0000) << 24)
}
