//! Conversions between the HTML fragments stored in note content and plain
//! text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(amp|lt|gt|quot|#39|nbsp);").expect("valid entity regex"));

/// Removes every markup tag and decodes the basic character entities.
///
/// Entities are decoded in a single pass, so `&amp;lt;` becomes `&lt;` and
/// not `<`.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let text = TAG_RE.replace_all(html, "");
    ENTITY_RE
        .replace_all(&text, |caps: &Captures<'_>| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            "#39" => "'",
            _ => "\u{a0}",
        })
        .into_owned()
}

/// Escapes plain text and wraps it in a paragraph, the shape the rich-text
/// editor produces for a single block of text.
#[must_use]
pub fn wrap_as_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 7);
    out.push_str("<p>");
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out.push_str("</p>");
    out
}

/// True when the fragment has no visible text, e.g. the editor's empty
/// `<p><br></p>`.
#[must_use]
pub fn is_blank_html(html: &str) -> bool {
    strip_html(html).trim().is_empty()
}
