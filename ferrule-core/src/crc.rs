//! Dallas/Maxim 1-Wire CRC-8
//!
//! Polynomial x^8 + x^5 + x^4 + 1, processed LSB first (reflected form
//! 0x8C), initial value 0, no final XOR. Used for 1-Wire ROM ids and
//! DS18B20 scratchpads.
//!
//! Length convention: [`crc8`] hashes every byte it is given. To verify a
//! buffer whose last byte is the checksum, hash `&buf[..len]` and compare
//! with `buf[len]`, or call [`check`] on the whole buffer.

/// Reflected generator polynomial
pub const POLYNOMIAL: u8 = 0x8C;

/// Byte-at-a-time lookup table, built at compile time
static TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = i as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x01 != 0 {
                (crc >> 1) ^ POLYNOMIAL
            } else {
                crc >> 1
            };
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
}

/// Compute the CRC-8 of `data`
pub fn crc8(data: &[u8]) -> u8 {
    data.iter()
        .fold(0u8, |crc, &byte| TABLE[(crc ^ byte) as usize])
}

/// Check a buffer that ends with its own CRC byte
///
/// Running the CRC over data followed by its checksum yields zero.
/// An empty buffer is trivially valid.
pub fn check(data_with_crc: &[u8]) -> bool {
    crc8(data_with_crc) == 0
}
