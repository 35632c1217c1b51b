//! ScanView WASM - WebAssembly bindings for ScanView
//!
//! This crate exposes the scanview-core helpers to the viewer's
//! JavaScript/TypeScript code.
//!
//! # Module Structure
//!
//! - `preview` - preview resources for scan files (TIFF data URLs, blob URLs)
//! - `strip` - type-annotation stripping
//!
//! # Usage
//!
//! ```typescript
//! import init, { get_preview_resource, release_preview_resource } from '@scanview/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const src = get_preview_resource(file.name, bytes);
//! img.src = src;
//! // later, once the image is gone
//! release_preview_resource(src);
//! ```

use wasm_bindgen::prelude::*;

mod preview;
mod strip;

// Re-export public functions
pub use preview::{get_preview_resource, is_tiff_name, release_preview_resource};
pub use strip::{strip_type_annotations, strip_type_annotations_report};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
