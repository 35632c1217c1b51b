use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, Rgb, RgbImage};
use proptest::prelude::*;
use scanview_core::decode::DecodeError;
use scanview_core::encode::PNG_DATA_URL_PREFIX;
use scanview_core::{
    get_preview_resource, DiskFile, MemoryFile, ObjectUrlRegistry, PreviewError, PreviewOptions,
    PreviewResource, ReferenceTable,
};
use tempfile::TempDir;

fn tiff_bytes(img: DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Tiff).unwrap();
    buf.into_inner()
}

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 10) as u8, (y * 20) as u8, ((x + y) * 3) as u8])
    })
}

fn decode_data_url(resource: &PreviewResource) -> image::RgbaImage {
    let url = match resource {
        PreviewResource::DataUrl(url) => url,
        other => panic!("expected a data URL, got {:?}", other),
    };
    let payload = url.strip_prefix(PNG_DATA_URL_PREFIX).unwrap();
    let png = general_purpose::STANDARD.decode(payload).unwrap();
    image::load_from_memory_with_format(&png, ImageFormat::Png)
        .unwrap()
        .into_rgba8()
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> DiskFile {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    DiskFile::new(path)
}

#[test]
fn rgb_tiff_on_disk_becomes_png_data_url() {
    let dir = TempDir::new().unwrap();
    let file = write(
        dir.path(),
        "OCT_macula.TIF",
        &tiff_bytes(DynamicImage::ImageRgb8(gradient(13, 7))),
    );
    let registry = ObjectUrlRegistry::new();

    let resource = get_preview_resource(&file, &registry, &PreviewOptions::default()).unwrap();
    let img = decode_data_url(&resource);

    assert_eq!(img.dimensions(), (13, 7));
    assert_eq!(img.get_pixel(12, 6).0, [120, 120, 54, 255]);
    assert!(registry.is_empty());
}

#[test]
fn sixteen_bit_gray_tiff_is_scaled_to_eight_bits() {
    let gray: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(4, 2, Luma([65535]));
    let bytes = tiff_bytes(DynamicImage::ImageLuma16(gray));
    let file = MemoryFile::new("bscan_16bit.tiff", &bytes);

    let resource =
        get_preview_resource(&file, &ObjectUrlRegistry::new(), &PreviewOptions::default()).unwrap();
    let img = decode_data_url(&resource);

    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 255]);
}

#[test]
fn png_on_disk_is_registered_not_decoded() {
    let dir = TempDir::new().unwrap();
    let mut png = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(gradient(3, 3))
        .write_to(&mut png, ImageFormat::Png)
        .unwrap();
    let png = png.into_inner();
    let file = write(dir.path(), "fundus.png", &png);
    let registry = ObjectUrlRegistry::new();

    let resource = get_preview_resource(&file, &registry, &PreviewOptions::default()).unwrap();

    assert!(resource.is_revocable());
    let obj = registry.get(resource.as_str()).unwrap();
    assert_eq!(obj.mime, "image/png");
    assert_eq!(&*obj.bytes, png.as_slice());

    assert!(registry.release(resource.as_str()));
    assert!(registry.is_empty());
}

#[test]
fn empty_tiff_file_is_decode_error() {
    let dir = TempDir::new().unwrap();
    let file = write(dir.path(), "empty.tif", &[]);

    let err = get_preview_resource(&file, &ObjectUrlRegistry::new(), &PreviewOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        PreviewError::Decode(DecodeError::NoImageDirectories)
    ));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let file = DiskFile::new(dir.path().join("gone.tif"));

    let err = get_preview_resource(&file, &ObjectUrlRegistry::new(), &PreviewOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("gone.tif"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: a W x H TIFF always previews as a W x H PNG.
    #[test]
    fn prop_preview_keeps_declared_size(width in 1u32..=40, height in 1u32..=40) {
        let bytes = tiff_bytes(DynamicImage::ImageRgb8(gradient(width, height)));
        let file = MemoryFile::new("scan.tif", &bytes);

        let resource = get_preview_resource(&file, &ObjectUrlRegistry::new(), &PreviewOptions::default()).unwrap();
        let img = decode_data_url(&resource);
        prop_assert_eq!(img.dimensions(), (width, height));
    }
}
