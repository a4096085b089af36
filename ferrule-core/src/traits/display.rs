//! Pixel display contract
//!
//! Panel drivers (SPI TFTs, I2C OLEDs, e-paper) implement the three
//! required methods; bitmap drawing comes for free on top of
//! [`Displayer::set_pixel`] and drivers with a faster path (a windowed
//! burst write) override it.

use crate::error::Error;

/// Trait for pixel displays
pub trait Displayer {
    /// Pixel color as the panel stores it (bool for mono, RGB565, ...)
    type Color: Copy;

    /// Panel size in pixels as `(width, height)`
    fn size(&self) -> (i16, i16);

    /// Set one pixel
    ///
    /// Coordinates outside the panel are ignored. Buffered drivers only
    /// touch their framebuffer here.
    fn set_pixel(&mut self, x: i16, y: i16, color: Self::Color);

    /// Push buffered content to the panel
    fn display(&mut self) -> Result<(), Error>;

    /// Draw a row-major bitmap with its top-left corner at `(x, y)`
    ///
    /// `data.len()` must be a multiple of `width`; the height follows
    /// from it. Pixels falling outside the panel are clipped.
    fn draw_bitmap(&mut self, x: i16, y: i16, width: i16, data: &[Self::Color]) -> Result<(), Error> {
        if width <= 0 || data.len() % width as usize != 0 {
            return Err(Error::InvalidConfig);
        }
        let (panel_w, panel_h) = self.size();
        for (i, &color) in data.iter().enumerate() {
            let px = x as i32 + (i % width as usize) as i32;
            let py = y as i32 + (i / width as usize) as i32;
            if px < 0 || py < 0 || px >= panel_w as i32 || py >= panel_h as i32 {
                continue;
            }
            self.set_pixel(px as i16, py as i16, color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x3 monochrome framebuffer
    struct Framebuffer {
        pixels: [[bool; 4]; 3],
        writes: u32,
        flushed: bool,
    }

    impl Framebuffer {
        fn new() -> Self {
            Self {
                pixels: [[false; 4]; 3],
                writes: 0,
                flushed: false,
            }
        }
    }

    impl Displayer for Framebuffer {
        type Color = bool;

        fn size(&self) -> (i16, i16) {
            (4, 3)
        }

        fn set_pixel(&mut self, x: i16, y: i16, color: bool) {
            if (0..4).contains(&x) && (0..3).contains(&y) {
                self.pixels[y as usize][x as usize] = color;
                self.writes += 1;
            }
        }

        fn display(&mut self) -> Result<(), Error> {
            self.flushed = true;
            Ok(())
        }
    }

    #[test]
    fn test_bitmap_lands_row_major() {
        let mut fb = Framebuffer::new();
        let glyph = [true, false, false, true];

        fb.draw_bitmap(1, 1, 2, &glyph).unwrap();
        fb.display().unwrap();

        assert!(fb.pixels[1][1]);
        assert!(!fb.pixels[1][2]);
        assert!(!fb.pixels[2][1]);
        assert!(fb.pixels[2][2]);
        assert!(fb.flushed);
    }

    #[test]
    fn test_bitmap_is_clipped() {
        let mut fb = Framebuffer::new();
        let block = [true; 9];

        fb.draw_bitmap(2, -1, 3, &block).unwrap();

        // Only columns 2..4 of rows 0..2 are on the panel
        assert_eq!(fb.writes, 4);
        assert!(fb.pixels[0][3]);
        assert!(fb.pixels[1][2]);
    }

    #[test]
    fn test_ragged_bitmap_rejected() {
        let mut fb = Framebuffer::new();
        assert_eq!(fb.draw_bitmap(0, 0, 2, &[true; 3]), Err(Error::InvalidConfig));
        assert_eq!(fb.draw_bitmap(0, 0, 0, &[]), Err(Error::InvalidConfig));
        assert_eq!(fb.writes, 0);
    }
}
