//! Pixel storage and 8-bit conversion.

use prism_math::Color;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a color in [0, 1] to 8-bit RGB, optionally gamma corrected.
pub fn color_to_rgb(color: Color, gamma: bool) -> [u8; 3] {
    let encode = |c: f64| {
        let c = if gamma { linear_to_gamma(c) } else { c };
        (255.0 * c.clamp(0.0, 1.0)).round() as u8
    };
    [encode(color.x), encode(color.y), encode(color.z)]
}

/// Width x height RGB image, row-major, channels in [0, 1].
///
/// Unwritten pixels are black.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Create a new buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Overwrite a horizontal run of pixels starting at (x, y).
    pub fn set_row(&mut self, x: u32, y: u32, colors: &[Color]) {
        let start = self.index(x, y);
        self.pixels[start..start + colors.len()].copy_from_slice(colors);
    }

    /// Convert to packed RGB bytes (for display or saving).
    pub fn to_rgb8(&self, gamma: bool) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color, gamma));
        }
        bytes
    }

    /// Mean absolute per-channel difference to another buffer of the same
    /// size.
    pub fn mean_abs_diff(&self, other: &PixelBuffer) -> f64 {
        let total: f64 = self
            .pixels
            .iter()
            .zip(&other.pixels)
            .map(|(a, b)| (*a - *b).abs().element_sum())
            .sum();
        total / (3 * self.pixels.len().max(1)) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::new(0.0, 0.5, 1.0), false), [0, 128, 255]);
        assert_eq!(color_to_rgb(Color::new(-1.0, 0.25, 2.0), true), [0, 128, 255]);
    }

    #[test]
    fn test_buffer_rows() {
        let mut buffer = PixelBuffer::new(4, 3);
        buffer.set_row(1, 2, &[Color::ONE, Color::X]);
        assert_eq!(buffer.get(1, 2), Color::ONE);
        assert_eq!(buffer.get(2, 2), Color::X);
        assert_eq!(buffer.get(3, 2), Color::ZERO);

        buffer.set(0, 0, Color::Y);
        let bytes = buffer.to_rgb8(false);
        assert_eq!(bytes.len(), 4 * 3 * 3);
        assert_eq!(&bytes[..3], &[0, 255, 0]);
    }

    #[test]
    fn test_mean_abs_diff() {
        let a = PixelBuffer::new(2, 2);
        let mut b = PixelBuffer::new(2, 2);
        b.set(0, 0, Color::splat(0.4));
        assert!((a.mean_abs_diff(&b) - 0.1).abs() < 1e-12);
        assert_eq!(a.mean_abs_diff(&a), 0.0);
    }
}
