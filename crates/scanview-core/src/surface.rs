//! Drawable RGBA pixel surfaces.
//!
//! A surface is the raster a decoded page is drawn into before export.
//! It is sized exactly to the directory's declared dimensions, and
//! acquisition is where oversized or degenerate images are refused.

use image::RgbaImage;
use thiserror::Error;

use crate::decode::DecodedImage;

/// Errors raised while acquiring, drawing into or exporting a surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Surface would exceed the configured pixel budget
    #[error("Surface {width}x{height} exceeds the limit of {max_pixels} pixels")]
    TooLarge {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    /// Raster does not fit the surface exactly
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 4), got {actual}")]
    BufferMismatch { expected: usize, actual: usize },

    /// PNG export failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),

    /// The environment refused to provide a surface or object reference
    #[error("Rendering surface unavailable: {0}")]
    Unavailable(String),
}

/// An RGBA8 pixel surface.
#[derive(Debug, Clone)]
pub struct Surface {
    buffer: RgbaImage,
}

impl Surface {
    /// Acquire a transparent surface of exactly `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// - `SurfaceError::InvalidDimensions` - width or height is zero
    /// - `SurfaceError::TooLarge` - pixel count above `max_pixels`, or the
    ///   byte size does not fit in memory addressing
    pub fn acquire(width: u32, height: u32, max_pixels: u64) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }

        let too_large = SurfaceError::TooLarge {
            width,
            height,
            max_pixels,
        };

        let pixel_count = width as u64 * height as u64;
        if pixel_count > max_pixels {
            return Err(too_large);
        }
        if usize::try_from(pixel_count)
            .ok()
            .and_then(|n| n.checked_mul(4))
            .is_none()
        {
            return Err(too_large);
        }

        Ok(Self {
            buffer: RgbaImage::new(width, height),
        })
    }

    /// Draw a decoded raster covering the whole surface.
    pub fn draw(&mut self, image: &DecodedImage) -> Result<(), SurfaceError> {
        let expected = self.byte_len();
        if (image.width, image.height) != self.dimensions() || image.pixels.len() != expected {
            return Err(SurfaceError::BufferMismatch {
                expected,
                actual: image.pixels.len(),
            });
        }

        self.buffer.copy_from_slice(&image.pixels);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Raw RGBA bytes, row-major, top row first.
    pub fn pixels(&self) -> &[u8] {
        self.buffer.as_raw()
    }

    fn byte_len(&self) -> usize {
        self.width() as usize * self.height() as usize * 4
    }
}
