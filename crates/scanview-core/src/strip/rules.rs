//! The ordered rewrite rules.
//!
//! Each rule is one pattern and one replacement applied to the whole text.
//! Later rules rely on earlier ones having run: the empty-import sweep only
//! makes sense after type bindings were pulled out of import lists, and the
//! blank-line collapse cleans up after the declaration removals.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Identifier, including `$`.
const IDENT: &str = r"[A-Za-z_$][\w$]*";

/// Type argument list, up to three levels of nesting.
const ARGS: &str = r"<(?:[^<>]|<(?:[^<>]|<[^<>]*>)*>)*>";

/// A type expression: dotted name, optional type arguments, `[]` suffixes,
/// joined by `|` or `&`.
static TYPE: Lazy<String> = Lazy::new(|| {
    let atom = format!(r"(?:{IDENT}(?:\.{IDENT})*(?:{ARGS})?(?:\[\])*)");
    format!(r"{atom}(?:\s*[|&]\s*{atom})*")
});

/// A parenthesised list, up to two levels of nested parentheses inside.
const PARAMETER_LIST: &str = r"\(((?:[^()]|\((?:[^()]|\([^()]*\))*\))*)\)";

static PARAMETER_LIST_RE: Lazy<Regex> = Lazy::new(|| compile("parameter-list", PARAMETER_LIST));

/// One whole annotated parameter: name or destructuring pattern, optional
/// `?`, `: Type`, optional default value.
static ANNOTATED_PARAMETER: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"^(\s*(?:\.\.\.)?(?:{IDENT}|\{{[^{{}}]*\}}|\[[^\[\]]*\]))\??\s*:\s*{ty}(\s*(?:=[\s\S]*)?)$",
        ty = TYPE.as_str()
    );
    compile("annotated-parameter", &pattern)
});

/// `<A, B extends C, D = E>` followed by `(`. Attached to a name
/// (`useState<T>(`), or standing alone in front of an arrow (`= <T,>(x) =>`).
static GENERIC_LIST: Lazy<String> = Lazy::new(|| {
    let ty = TYPE.as_str();
    let entry = format!(r"{ty}(?:\s+extends\s+{ty})?(?:\s*=\s*{ty})?");
    let list = format!(r"<\s*{entry}(?:\s*,\s*{entry})*\s*,?\s*>");
    format!(
        r"(?m)([\w$]){list}\s*(\()|([=(,:]\s*|^[ \t]*){list}\s*(\((?:[^()]|\([^()]*\))*\)\s*=>)"
    )
});

fn compile(name: &str, pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("rule {name}: {e}"))
}

/// How a match is rewritten.
pub(crate) enum Replacement {
    /// `regex` replacement template (`${1}` style references).
    Template(&'static str),
    /// Computed from the captures.
    With(fn(&Captures<'_>) -> String),
}

/// One textual rewrite.
pub struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: Replacement,
    /// Reapply until the text stops changing.
    until_stable: bool,
}

impl Rule {
    fn new(name: &'static str, pattern: &str, replacement: Replacement) -> Self {
        Self {
            name,
            pattern: compile(name, pattern),
            replacement,
            until_stable: false,
        }
    }

    fn until_stable(mut self) -> Self {
        self.until_stable = true;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the rule, returning the new text and the number of rewrites.
    pub(crate) fn apply(&self, text: String) -> (String, usize) {
        let mut text = text;
        let mut total = 0;

        loop {
            let (next, count) = self.apply_once(&text);
            if count == 0 {
                return (text, total);
            }
            total += count;
            let changed = next != text;
            text = next;
            if !self.until_stable || !changed {
                return (text, total);
            }
        }
    }

    fn apply_once(&self, text: &str) -> (String, usize) {
        let mut count = 0;
        let out = self.pattern.replace_all(text, |caps: &Captures<'_>| {
            let replaced = match &self.replacement {
                Replacement::Template(template) => {
                    let mut dst = String::new();
                    caps.expand(template, &mut dst);
                    dst
                }
                Replacement::With(f) => f(caps),
            };
            if replaced != caps[0] {
                count += 1;
            }
            replaced
        });
        (out.into_owned(), count)
    }
}

/// Keep the value bindings of an import list, dropping `type X` entries.
fn filter_import_list(caps: &Captures<'_>) -> String {
    let head = &caps[1];
    let body = &caps[2];
    let tail = &caps[3];

    let entries: Vec<&str> = body
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect();
    let kept: Vec<&str> = entries
        .iter()
        .copied()
        .filter(|e| !is_type_binding(e))
        .collect();

    if kept.len() == entries.len() {
        return caps[0].to_string();
    }
    if kept.is_empty() {
        return format!("{head}{tail}");
    }

    if let Some(newline) = body.find('\n') {
        let indent: String = body[newline + 1..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        let trailing_comma = body.trim_end().ends_with(',');
        let lines: Vec<String> = kept.iter().map(|e| format!("{indent}{e}")).collect();
        format!(
            "{head}\n{}{}\n{tail}",
            lines.join(",\n"),
            if trailing_comma { "," } else { "" }
        )
    } else {
        format!("{head} {} {tail}", kept.join(", "))
    }
}

fn is_type_binding(entry: &str) -> bool {
    entry
        .strip_prefix("type")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

/// Strip annotations from every top-level entry of a parenthesised list.
/// Entries that are not annotated parameters are searched for nested lists.
fn strip_parameter_list(caps: &Captures<'_>) -> String {
    let entries: Vec<String> = split_top_level(&caps[1])
        .into_iter()
        .map(|entry| match ANNOTATED_PARAMETER.captures(entry) {
            Some(param) => format!("{}{}", &param[1], &param[2]),
            None => PARAMETER_LIST_RE
                .replace_all(entry, strip_parameter_list)
                .into_owned(),
        })
        .collect();
    format!("({})", entries.join(","))
}

/// Split on commas outside any bracket pair. `=>` does not close a `<`.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut prev = '\0';

    for (i, c) in list.char_indices() {
        match c {
            '(' | '[' | '{' | '<' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            '>' if prev != '=' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
        prev = c;
    }
    parts.push(&list[start..]);
    parts
}

/// Keep whatever surrounded the generic list, drop the list itself.
fn drop_generic_list(caps: &Captures<'_>) -> String {
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .collect()
}

/// Keep protected import/export lines verbatim; drop the cast otherwise.
fn drop_cast(caps: &Captures<'_>) -> String {
    caps.get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Every rule, in application order.
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let ty = TYPE.as_str();
    vec![
        Rule::new(
            "type-only-import",
            &format!(
                r#"(?m)^[ \t]*import\s+type\s+(?:\{{[^}}]*\}}|\*\s+as\s+{IDENT}|{IDENT})\s+from\s+['"][^'"\n]*['"][ \t]*;?[ \t]*\r?\n?"#
            ),
            Replacement::Template(""),
        ),
        Rule::new(
            "inline-type-binding",
            &format!(r"(?m)^([ \t]*import\s+(?:{IDENT}\s*,\s*)?\{{)([^}}]*)(\}}\s*from\b)"),
            Replacement::With(filter_import_list),
        ),
        Rule::new(
            "interface",
            &format!(
                r"(?m)^[ \t]*(?:export\s+)?(?:declare\s+)?interface\s+{IDENT}(?:\s*{ARGS})?(?:\s+extends\s+[^{{]+)?\s*\{{(?:[^{{}}\n]*\}}|[\s\S]*?\n\}})[ \t]*;?[ \t]*\r?\n?"
            ),
            Replacement::Template(""),
        ),
        Rule::new(
            "type-alias",
            &format!(
                r"(?m)^[ \t]*(?:export\s+)?(?:declare\s+)?type\s+{IDENT}(?:\s*{ARGS})?\s*=\s*(?:\{{[^{{}}]*\}}[^;{{}}\n]*|(?:[^;{{}}\n]|\n[ \t]*\|)*);?[ \t]*\r?\n?"
            ),
            Replacement::Template(""),
        ),
        Rule::new(
            "parameter-annotation",
            PARAMETER_LIST,
            Replacement::With(strip_parameter_list),
        )
        .until_stable(),
        Rule::new(
            "return-annotation",
            &format!(r"\)\s*:\s*{ty}(\s*(?:=>|\{{))"),
            Replacement::Template(")${1}"),
        ),
        Rule::new(
            "variable-annotation",
            &format!(r"\b(const|let|var)(\s+{IDENT})\s*:\s*{ty}(\s*=)"),
            Replacement::Template("${1}${2}${3}"),
        ),
        Rule::new(
            "generic-parameters",
            GENERIC_LIST.as_str(),
            Replacement::With(drop_generic_list),
        ),
        Rule::new(
            "component-annotation",
            &format!(r":\s*{IDENT}\.(?:FC|FunctionComponent)(?:{ARGS})?"),
            Replacement::Template(""),
        ),
        Rule::new(
            "as-cast",
            &format!(
                r"(?m)(^[ \t]*(?:import\b(?:[^\n{{]*\{{[^}}]*\}})?|export\s*(?:\*|\{{[^}}]*\}}))[^\n]*)|\s+as\s+{ty}"
            ),
            Replacement::With(drop_cast),
        ),
        Rule::new(
            "non-null-assertion",
            r"([\w$)\]])!([.\[)\];,])",
            Replacement::Template("${1}${2}"),
        ),
        Rule::new(
            "blank-lines",
            r"\n(?:[ \t]*\n){2,}",
            Replacement::Template("\n\n"),
        ),
        Rule::new(
            "empty-import",
            r#"(?m)^[ \t]*import\s*\{\s*\}\s*from\s*['"][^'"\n]*['"][ \t]*;?[ \t]*\r?\n?(?:[ \t]*\r?\n)?"#,
            Replacement::Template(""),
        ),
    ]
});
