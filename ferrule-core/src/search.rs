//! Substring search over byte slices
//!
//! Rabin-Karp with a rolling multiplicative hash. Text-protocol drivers
//! (AT-command modems, tiny HTTP servers) use it to find delimiters such
//! as `"\r\n"` in receive buffers without allocating.

/// Hash base; a prime that spreads byte values well over `u32`
pub const PRIME_RK: u32 = 16_777_619;

/// Hash of `needle` and `PRIME_RK^len` (both wrapping)
fn hash_needle(needle: &[u8]) -> (u32, u32) {
    let hash = needle
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(PRIME_RK).wrapping_add(b as u32));

    // Square-and-multiply for the factor that drops the outgoing byte
    let mut pow = 1u32;
    let mut sq = PRIME_RK;
    let mut i = needle.len();
    while i > 0 {
        if i & 1 != 0 {
            pow = pow.wrapping_mul(sq);
        }
        sq = sq.wrapping_mul(sq);
        i >>= 1;
    }
    (hash, pow)
}

/// Index of the first occurrence of `needle` in `haystack`
///
/// An empty needle matches at 0, including in an empty haystack.
/// Returns `None` when there is no match.
pub fn index(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    let n = needle.len();
    if n == 0 {
        return Some(0);
    }
    if n > haystack.len() {
        return None;
    }

    let (hash_sep, pow) = hash_needle(needle);
    let mut h = haystack[..n]
        .iter()
        .fold(0u32, |h, &b| h.wrapping_mul(PRIME_RK).wrapping_add(b as u32));
    if h == hash_sep && &haystack[..n] == needle {
        return Some(0);
    }

    let mut i = n;
    while i < haystack.len() {
        h = h.wrapping_mul(PRIME_RK).wrapping_add(haystack[i] as u32);
        h = h.wrapping_sub(pow.wrapping_mul(haystack[i - n] as u32));
        i += 1;
        if h == hash_sep && &haystack[i - n..i] == needle {
            return Some(i - n);
        }
    }
    None
}
