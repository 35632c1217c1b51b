//! PNG encoding and data URL export.
//!
//! This module provides PNG encoding using the `image` crate's PNG encoder.
//! The data URL form is what the viewer drops straight into an `<img src>`.

use base64::{engine::general_purpose, Engine as _};
use image::codecs::png::PngEncoder;
use image::ExtendedColorType;
use image::ImageEncoder;

use crate::surface::{Surface, SurfaceError};

/// Prefix of every data URL produced by [`png_data_url`].
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode a surface to PNG bytes.
///
/// # Errors
///
/// Returns `SurfaceError::EncodingFailed` if the PNG encoder fails.
pub fn encode_png(surface: &Surface) -> Result<Vec<u8>, SurfaceError> {
    let mut buffer = Vec::new();

    PngEncoder::new(&mut buffer)
        .write_image(
            surface.pixels(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgba8,
        )
        .map_err(|e| SurfaceError::EncodingFailed(e.to_string()))?;

    Ok(buffer)
}

/// Encode a surface as a `data:image/png;base64,...` URL.
pub fn png_data_url(surface: &Surface) -> Result<String, SurfaceError> {
    let png = encode_png(surface)?;
    let b64 = general_purpose::STANDARD.encode(png);
    Ok(format!("{}{}", PNG_DATA_URL_PREFIX, b64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::DecodedImage;

    const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn filled_surface(width: u32, height: u32, rgba: [u8; 4]) -> Surface {
        let mut surface = Surface::acquire(width, height, u64::MAX).unwrap();
        let pixels = rgba.repeat((width * height) as usize);
        surface
            .draw(&DecodedImage::new(width, height, pixels))
            .unwrap();
        surface
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode_png(&filled_surface(4, 4, [10, 20, 30, 255])).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_encode_png_decodes_back() {
        let png = encode_png(&filled_surface(5, 3, [200, 100, 50, 128])).unwrap();
        let img = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
            .unwrap()
            .into_rgba8();

        assert_eq!(img.dimensions(), (5, 3));
        assert_eq!(img.get_pixel(4, 2).0, [200, 100, 50, 128]);
    }

    #[test]
    fn test_data_url_prefix_and_payload() {
        let url = png_data_url(&filled_surface(2, 2, [0, 0, 0, 255])).unwrap();
        assert!(url.starts_with(PNG_DATA_URL_PREFIX));

        let payload = &url[PNG_DATA_URL_PREFIX.len()..];
        let png = general_purpose::STANDARD.decode(payload).unwrap();
        assert_eq!(&png[0..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_data_url_is_deterministic() {
        let surface = filled_surface(3, 3, [1, 2, 3, 4]);
        assert_eq!(
            png_data_url(&surface).unwrap(),
            png_data_url(&surface).unwrap()
        );
    }
}
