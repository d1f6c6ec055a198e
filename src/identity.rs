//! Chip identification by masked trim-id matching.

/// Length of the trim identity block.
pub const ID_LEN: usize = 6;

/// One row of a trim table.
///
/// Positions whose `mask` entry is `false` are don't-care; every other
/// position of a sample must equal `pattern`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityTemplate<V> {
    pub pattern: [u8; ID_LEN],
    pub mask: [bool; ID_LEN],
    pub variant: V,
}

impl<V> IdentityTemplate<V> {
    pub const fn new(pattern: [u8; ID_LEN], mask: [bool; ID_LEN], variant: V) -> Self {
        Self {
            pattern,
            mask,
            variant,
        }
    }

    /// Returns `true` if every masked byte of `sample` equals the pattern.
    pub fn matches(&self, sample: &[u8; ID_LEN]) -> bool {
        self.pattern
            .iter()
            .zip(&self.mask)
            .zip(sample)
            .all(|((expected, &care), actual)| !care || expected == actual)
    }
}

/// Resolves `sample` against `table`.
///
/// Table order is priority order: the first matching template wins even if
/// a later one matches too, so exact rows must precede permissive ones.
pub fn resolve<V: Copy>(table: &[IdentityTemplate<V>], sample: &[u8; ID_LEN]) -> Option<V> {
    table
        .iter()
        .find(|template| template.matches(sample))
        .map(|template| template.variant)
}
