//! Type-annotation stripping WASM bindings.
//!
//! # Functions
//!
//! - [`strip_type_annotations`] - typed source in, plain source out
//! - [`strip_type_annotations_report`] - same, plus per-rule rewrite counts
//!
//! # Example
//!
//! ```typescript
//! import { strip_type_annotations_report } from '@scanview/wasm';
//!
//! const { output, report } = strip_type_annotations_report(source);
//! console.log(report.rules.filter(r => r.count > 0));
//! ```

use scanview_core::strip::{self, StripReport};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct StripOutput {
    output: String,
    report: StripReport,
}

/// Strip type-only syntax from `source`. Never throws.
#[wasm_bindgen]
pub fn strip_type_annotations(source: &str) -> String {
    strip::strip_type_annotations(source)
}

/// Strip `source` and return `{ output, report }`.
///
/// `report.rules` lists every rule in application order with its rewrite count.
#[wasm_bindgen]
pub fn strip_type_annotations_report(source: &str) -> Result<JsValue, JsValue> {
    let (output, report) = strip::strip_with_report(source);
    serde_wasm_bindgen::to_value(&StripOutput { output, report })
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
