//! embedded-graphics support.
//!
//! The lifecycle core treats framebuffer contents as opaque; this adapter
//! gives hosts whose buffers expose raw bytes an RGB565 draw target over
//! one buffer of the pair.

use core::convert::Infallible;

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{Rgb565, RgbColor},
};

/// Mutable RGB565 view over one framebuffer.
///
/// Pixels are stored row-major, two little-endian bytes each, with no
/// stride padding, matching what the DPI engine scans out.
pub struct FrameView<'a> {
    bytes: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> FrameView<'a> {
    /// Wraps `bytes` as a `width` x `height` RGB565 surface.
    ///
    /// Returns `None` when the slice is too short for the surface.
    pub fn new(bytes: &'a mut [u8], width: u32, height: u32) -> Option<Self> {
        if bytes.len() < width as usize * height as usize * 2 {
            return None;
        }
        Some(Self {
            bytes,
            width,
            height,
        })
    }
}

impl OriginDimensions for FrameView<'_> {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameView<'_> {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= self.width || y >= self.height {
                continue;
            }

            let raw =
                ((color.r() as u16) << 11) | ((color.g() as u16) << 5) | (color.b() as u16);
            let offset = (y * self.width + x) as usize * 2;
            self.bytes[offset..offset + 2].copy_from_slice(&raw.to_le_bytes());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics_core::geometry::Point;

    #[test]
    fn rejects_undersized_buffers() {
        let mut bytes = [0u8; 7];
        assert!(FrameView::new(&mut bytes, 2, 2).is_none());
    }

    #[test]
    fn writes_little_endian_rgb565() {
        let mut bytes = [0u8; 4 * 4 * 2];
        let mut view = FrameView::new(&mut bytes, 4, 4).unwrap();

        view.draw_iter([Pixel(Point::new(1, 2), Rgb565::RED)]).unwrap();

        let offset = (2 * 4 + 1) * 2;
        assert_eq!(&bytes[offset..offset + 2], 0xF800u16.to_le_bytes());
    }

    #[test]
    fn out_of_bounds_pixels_are_ignored() {
        let mut bytes = [0u8; 2 * 2 * 2];
        let mut view = FrameView::new(&mut bytes, 2, 2).unwrap();

        view.draw_iter([
            Pixel(Point::new(-1, 0), Rgb565::WHITE),
            Pixel(Point::new(2, 0), Rgb565::WHITE),
        ])
        .unwrap();

        assert_eq!(bytes, [0u8; 8]);
    }
}
