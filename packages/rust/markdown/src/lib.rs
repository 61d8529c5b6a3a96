//! HTML-to-markup conversion for problem statements.
//!
//! Two modes are offered:
//! - [`html_to_markup`]: a fixed, ordered set of tag substitutions. Best-effort,
//!   deterministic, and not an HTML parser; malformed or nested markup is
//!   silently mishandled.
//! - [`convert_rich`]: a real HTML→Markdown conversion via `htmd`, followed by
//!   a small cleanup pipeline.
//!
//! [`convert`] picks one according to [`ConversionMode`] and never fails.

mod cleanup;
mod substitution;

use tracing::{debug, instrument, warn};

use leettutor_shared::{ConversionMode, LeetTutorError, Result};

/// Convert problem HTML with the ordered substitution table.
pub fn html_to_markup(html: &str) -> String {
    substitution::apply(html)
}

/// Convert problem HTML with `htmd`, then clean up the result.
#[instrument(skip(html), fields(html_len = html.len()))]
pub fn convert_rich(html: &str) -> Result<String> {
    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "iframe", "noscript", "svg"])
        .build();

    let raw_markdown = converter
        .convert(html)
        .map_err(|e| LeetTutorError::Conversion(format!("htmd conversion failed: {e}")))?;

    debug!(raw_len = raw_markdown.len(), "htmd conversion complete");

    Ok(cleanup::run_pipeline(&raw_markdown))
}

/// Convert problem HTML using `mode`.
///
/// A failed rich conversion falls back to the substitution table.
pub fn convert(html: &str, mode: ConversionMode) -> String {
    match mode {
        ConversionMode::Substitution => html_to_markup(html),
        ConversionMode::Rich => convert_rich(html).unwrap_or_else(|e| {
            warn!(error = %e, "rich conversion failed, using substitution table");
            html_to_markup(html)
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture_path(name: &str) -> std::path::PathBuf {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(name)
    }

    fn load_fixture(name: &str) -> String {
        fs::read_to_string(fixture_path(name))
            .unwrap_or_else(|e| panic!("failed to read fixture {name}: {e}"))
    }

    #[test]
    fn recognized_tags_leave_no_angle_brackets() {
        let inputs = [
            "<p>plain</p>",
            "<p>Given <code>nums</code>, return <em>indices</em>.</p>",
            r#"<p><strong class="example">Example 1:</strong></p><pre><strong>Input:</strong> x = 1</pre>"#,
            "<ul>\n\t<li><code>n</code></li>\n\t<li>only one</li>\n</ul>",
            "<div><span>nested</span><sup>2</sup><br/></div><ol><li>x</li></ol>",
        ];

        for html in inputs {
            let out = html_to_markup(html);
            assert!(!out.contains('<'), "tag characters left in {out:?}");
            assert!(!out.contains('>'), "tag characters left in {out:?}");
        }
    }

    #[test]
    fn tag_only_inputs_have_no_brackets_at_all() {
        let html = "<p>a</p><strong>b</strong><em>c</em><code>d</code><pre>e</pre>\
                    <ul><li>f</li></ul><span>g</span>";
        let out = html_to_markup(html);
        assert!(!out.contains('<'));
        assert!(!out.contains('>'));
    }

    #[test]
    fn fixture_converts_to_readable_markup() {
        let html = load_fixture("html/problem-valid-parentheses.html");
        let out = html_to_markup(&html);

        assert!(out.starts_with("Given a string `s`"));
        assert!(out.contains("**Example 1:**"));
        assert!(out.contains("**Constraints:**"));
        assert!(out.contains("- `1 <= s.length <= 104`"));
        assert!(!out.contains("<div"));
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn substitution_mode_matches_html_to_markup() {
        let html = "<p>Return <strong>true</strong>.</p>";
        assert_eq!(
            convert(html, ConversionMode::Substitution),
            html_to_markup(html)
        );
    }

    #[test]
    fn rich_mode_converts_with_htmd() {
        let html = "<p>Return <strong>true</strong> if valid.</p><ul><li>one</li><li>two</li></ul>";
        let out = convert(html, ConversionMode::Rich);
        assert!(out.contains("**true**"));
        assert!(out.contains("one"));
        assert!(out.contains("two"));
        assert!(!out.contains("<p>"));
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(html_to_markup(""), "");
        assert_eq!(html_to_markup("   \n  "), "");
    }
}
