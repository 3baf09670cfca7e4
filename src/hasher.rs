use crate::sequence::OperName;

/// Positional hash that orders operator strings first by length, then
/// lexicographically.
///
/// Digits are `op + 1` in bijective base `radix`, so every string of at most
/// [`longest_hashable_string`](Self::longest_hashable_string) operators has a
/// distinct hash. The empty string hashes to `offset`; zero is reserved for
/// the algebraic zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortlexHasher {
    radix: u64,
    offset: u64,
    longest: usize,
}

impl ShortlexHasher {
    pub const DEFAULT_OFFSET: u64 = 1;

    /// Hasher for an alphabet of `radix` operators.
    pub fn new(radix: usize) -> Self {
        Self::with_offset(radix, Self::DEFAULT_OFFSET)
    }

    pub fn with_offset(radix: usize, offset: u64) -> Self {
        debug_assert!(radix > 0, "radix must be positive");
        debug_assert!(offset > 0, "offset 0 is reserved for the zero sequence");
        let radix = radix as u64;
        Self {
            radix,
            offset,
            longest: longest_string_for(radix, offset),
        }
    }

    #[inline]
    pub fn radix(&self) -> u64 {
        self.radix
    }

    /// Hash of the identity (empty string).
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Maximum string length that is guaranteed to hash without overflow.
    #[inline]
    pub fn longest_hashable_string(&self) -> usize {
        self.longest
    }

    /// Digit contributed by an operator.
    #[inline]
    pub(crate) fn digit(op: OperName) -> u64 {
        debug_assert!(op >= 0, "operator names must be non-negative");
        op as u64 + 1
    }

    pub fn hash(&self, ops: &[OperName]) -> u64 {
        debug_assert!(
            ops.len() <= self.longest,
            "string of length {} cannot be hashed with radix {}",
            ops.len(),
            self.radix
        );
        let mut hash = self.offset;
        let mut multiplier = 1u64;
        for &op in ops.iter().rev() {
            hash += Self::digit(op) * multiplier;
            multiplier = multiplier.wrapping_mul(self.radix);
        }
        hash
    }
}

/// Largest `L` such that a string of `L` maximal digits fits in a `u64`.
fn longest_string_for(radix: u64, offset: u64) -> usize {
    if radix == 1 {
        return usize::try_from(u64::MAX - offset).unwrap_or(usize::MAX);
    }
    let mut total = offset;
    let mut multiplier = 1u64;
    let mut length = 0usize;
    loop {
        let Some(term) = radix.checked_mul(multiplier) else {
            break;
        };
        let Some(next) = total.checked_add(term) else {
            break;
        };
        total = next;
        length += 1;
        match multiplier.checked_mul(radix) {
            Some(m) => multiplier = m,
            None => break,
        }
    }
    length
}
