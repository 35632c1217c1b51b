//! Preview WASM bindings.
//!
//! This module exposes the scanview-core preview pipeline to JavaScript.
//! Reading the `File` is left to the caller (`await file.arrayBuffer()`);
//! everything after that is synchronous.
//!
//! # Functions
//!
//! - [`get_preview_resource`] - `data:image/png;base64,...` for TIFF, a `blob:` URL otherwise
//! - [`release_preview_resource`] - revoke a `blob:` URL once it is off screen
//! - [`is_tiff_name`] - whether a file name takes the TIFF path
//!
//! # Example
//!
//! ```typescript
//! import { get_preview_resource, release_preview_resource } from '@scanview/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! try {
//!   img.src = get_preview_resource(file.name, bytes);
//! } catch (e) {
//!   showPreviewError(e);
//! }
//! ```

use js_sys::{Array, Uint8Array};
use scanview_core::preview::{self, MemoryFile, PreviewKind, PreviewOptions, ReferenceTable};
use scanview_core::SurfaceError;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, Url};

/// Reference table backed by the browser's `URL.createObjectURL`.
pub(crate) struct BrowserObjectUrls;

impl ReferenceTable for BrowserObjectUrls {
    fn create(&self, bytes: &[u8], mime: &str) -> Result<String, SurfaceError> {
        let parts = Array::of1(&Uint8Array::from(bytes));
        let options = BlobPropertyBag::new();
        options.set_type(mime);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| SurfaceError::Unavailable(js_error_message(e)))?;
        Url::create_object_url_with_blob(&blob)
            .map_err(|e| SurfaceError::Unavailable(js_error_message(e)))
    }

    fn release(&self, reference: &str) -> bool {
        Url::revoke_object_url(reference).is_ok()
    }
}

fn js_error_message(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{:?}", err))
}

/// Produce a displayable `src` for a scan file.
///
/// # Arguments
///
/// * `name` - The file name; `.tif`/`.tiff` (any case) selects the TIFF path
/// * `bytes` - The complete file content as a `Uint8Array`
///
/// # Returns
///
/// A `data:image/png;base64,...` string for TIFF files (page 0 only), or a
/// `blob:` URL for everything else. Blob URLs must be passed to
/// [`release_preview_resource`] when no longer displayed.
///
/// # Errors
///
/// Returns an error if:
/// - The TIFF is empty, malformed, or has no image directories
/// - No surface could be allocated for the page
#[wasm_bindgen]
pub fn get_preview_resource(name: &str, bytes: &[u8]) -> Result<String, JsValue> {
    let file = MemoryFile::new(name, bytes);
    preview::get_preview_resource(&file, &BrowserObjectUrls, &PreviewOptions::default())
        .map(|resource| resource.into_string())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Revoke a `blob:` URL returned by [`get_preview_resource`].
///
/// Data URLs own nothing and return `false`.
#[wasm_bindgen]
pub fn release_preview_resource(reference: &str) -> bool {
    if !reference.starts_with("blob:") {
        return false;
    }
    BrowserObjectUrls.release(reference)
}

/// Check whether a file name will be decoded as TIFF.
#[wasm_bindgen]
pub fn is_tiff_name(name: &str) -> bool {
    preview::classify(name) == PreviewKind::Tiff
}

/// 1x1 little-endian 8-bit grayscale TIFF, pixel value 0x80.
#[cfg(test)]
pub(crate) const TINY_TIFF: &[u8] = &[
    0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, // header, IFD0 at 8
    0x09, 0x00, // 9 entries
    0x00, 0x01, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // width 1
    0x01, 0x01, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // height 1
    0x02, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, // 8 bits
    0x03, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // uncompressed
    0x06, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // BlackIsZero
    0x11, 0x01, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x7A, 0x00, 0x00, 0x00, // strip at 122
    0x15, 0x01, 0x03, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // 1 sample
    0x16, 0x01, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // 1 row/strip
    0x17, 0x01, 0x04, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, // 1 byte
    0x00, 0x00, 0x00, 0x00, // no next IFD
    0x80, // pixel
];
