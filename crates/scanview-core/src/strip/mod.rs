//! Type-annotation stripping for `.ts`/`.tsx` sources.
//!
//! Turns typed source into plain `.js`/`.jsx` by deleting type-only syntax
//! with a fixed, ordered list of regex rewrites ([`RULES`]). There is no
//! parser: every rule sees raw text, so a string literal or comment that
//! happens to look like an annotation is rewritten too.
//!
//! # Example
//!
//! ```ignore
//! use scanview_core::strip::strip_type_annotations;
//!
//! let js = strip_type_annotations("const x: number = 5;\n");
//! assert_eq!(js, "const x = 5;\n");
//! ```

mod rules;

use serde::Serialize;

pub use rules::{Rule, RULES};

/// Rewrites performed by one rule during a strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleCount {
    pub rule: &'static str,
    pub count: usize,
}

/// Per-rule rewrite counts, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StripReport {
    pub rules: Vec<RuleCount>,
}

impl StripReport {
    /// Total rewrites across all rules.
    pub fn total(&self) -> usize {
        self.rules.iter().map(|r| r.count).sum()
    }

    /// Rewrites performed by the named rule.
    pub fn get(&self, rule: &str) -> Option<usize> {
        self.rules.iter().find(|r| r.rule == rule).map(|r| r.count)
    }

    /// Whether the input came back unchanged.
    pub fn is_noop(&self) -> bool {
        self.total() == 0
    }
}

/// Strip type-only syntax from `source`.
///
/// Never fails. Text no rule matches is returned byte-for-byte.
pub fn strip_type_annotations(source: &str) -> String {
    strip_with_report(source).0
}

/// Like [`strip_type_annotations`], also reporting what each rule did.
pub fn strip_with_report(source: &str) -> (String, StripReport) {
    let mut text = source.to_string();
    let mut report = StripReport::default();

    for rule in RULES.iter() {
        let (next, count) = rule.apply(text);
        if count > 0 {
            log::debug!("{}: {} rewrite(s)", rule.name(), count);
        }
        report.rules.push(RuleCount {
            rule: rule.name(),
            count,
        });
        text = next;
    }

    (text, report)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
