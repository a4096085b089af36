//! Fixed-point decimal formatting without floating point
//!
//! Drivers report quantities as scaled integers (milli-°C, milli-lux).
//! These helpers turn such a value into text for a display or a log line
//! with a fixed layout:
//!
//! ```text
//! write_decimal(buf, 25062, 3, 3)  -> "025.062"
//! write_decimal(buf, -55000, 3, 3) -> "-55.000"
//! write_decimal(buf, 1234, 2, 0)   -> "34"
//! ```
//!
//! The value is zero padded to `int_digits` integer digits. Integer digits
//! that do not fit are dropped. A negative value has its leading position
//! replaced by `-`, so callers reserve one integer digit for the sign.

use heapless::String;

/// Errors from decimal formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// Output buffer shorter than the requested layout
    BufferTooSmall,
    /// Layout has no integer position
    InvalidWidth,
}

/// Number of characters produced for a layout
pub const fn width(int_digits: usize, frac_digits: usize) -> usize {
    if frac_digits == 0 {
        int_digits
    } else {
        int_digits + 1 + frac_digits
    }
}

/// Format `val` (scaled by `10^frac_digits`) into `buf`
///
/// Returns the written prefix of `buf` as a string slice.
pub fn write_decimal(
    buf: &mut [u8],
    val: i32,
    int_digits: usize,
    frac_digits: usize,
) -> Result<&str, FormatError> {
    if int_digits == 0 {
        return Err(FormatError::InvalidWidth);
    }
    let len = width(int_digits, frac_digits);
    if buf.len() < len {
        return Err(FormatError::BufferTooSmall);
    }

    let out = &mut buf[..len];
    let mut magnitude = val.unsigned_abs();
    for pos in (0..len).rev() {
        if frac_digits > 0 && pos == int_digits {
            out[pos] = b'.';
        } else {
            out[pos] = b'0' + (magnitude % 10) as u8;
            magnitude /= 10;
        }
    }
    if val < 0 {
        out[0] = b'-';
    }

    // ASCII only
    core::str::from_utf8(out).map_err(|_| FormatError::InvalidWidth)
}

/// Format `val` into a fresh `heapless::String`
pub fn fmt_decimal<const N: usize>(
    val: i32,
    int_digits: usize,
    frac_digits: usize,
) -> Result<String<N>, FormatError> {
    let mut buf = [0u8; N];
    let text = write_decimal(&mut buf, val, int_digits, frac_digits)?;
    let mut s = String::new();
    s.push_str(text).map_err(|_| FormatError::BufferTooSmall)?;
    Ok(s)
}
