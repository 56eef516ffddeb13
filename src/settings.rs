/// Numeric strategy used by the selector search.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum SelectorPrecision {
    /// Full integer precision. Output is bit-reproducible across machines
    /// and across the scalar and SIMD kernels.
    Exact,
    /// Halved luma weights so the search fits 16-bit SIMD lanes. Selector
    /// and table choices can differ slightly from the exact search.
    Fast,
}

/// Encoding settings for ETC1.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Etc1Settings {
    pub(crate) precision: SelectorPrecision,
}

impl Etc1Settings {
    /// Bit-reproducible selector search at full integer precision.
    pub const fn exact() -> Self {
        Self {
            precision: SelectorPrecision::Exact,
        }
    }

    /// Reduced-precision selector search. Markedly faster, with a small
    /// quality cost that is a deliberate trade-off, not an approximation of
    /// the exact output.
    pub const fn fast() -> Self {
        Self {
            precision: SelectorPrecision::Fast,
        }
    }
}

impl Default for Etc1Settings {
    fn default() -> Self {
        Self::exact()
    }
}
