//! Ordered tag-substitution table for problem statements.
//!
//! Each rule is a regex and its replacement, applied in table order. Later
//! rules assume earlier ones already consumed the tags they would otherwise
//! clash with (the catch-all tag stripper must run after every specific tag
//! rule, and `&amp;` must be decoded last so `&amp;lt;` stays `&lt;`).

use std::sync::LazyLock;

use regex::Regex;

/// A single `pattern → replacement` rule.
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

/// Rules in application order.
const RULES: &[(&str, &str)] = &[
    (r"<p>", "\n"),
    (r"</p>", "\n"),
    (r"<strong[^>]*>", "**"),
    (r"</strong>", "**"),
    (r"<em[^>]*>", "*"),
    (r"</em>", "*"),
    (r"<code[^>]*>", "`"),
    (r"</code>", "`"),
    (r"<pre[^>]*>", "\n```\n"),
    (r"</pre>", "\n```\n"),
    (r"<ul[^>]*>", "\n"),
    (r"</ul>", "\n"),
    (r"<li[^>]*>", "- "),
    (r"</li>", "\n"),
    // Everything the rules above did not claim.
    (r"<[^>]*>", ""),
    (r"&nbsp;", " "),
    (r"&lt;", "<"),
    (r"&gt;", ">"),
    (r"&amp;", "&"),
    (r"\n\s*\n\s*\n", "\n\n"),
];

static TABLE: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    RULES
        .iter()
        .map(|&(pattern, replacement)| Rule {
            pattern: Regex::new(pattern).expect("valid regex"),
            replacement,
        })
        .collect()
});

/// Apply every rule in order, then trim surrounding whitespace.
pub(crate) fn apply(html: &str) -> String {
    let mut result = html.to_string();
    for rule in TABLE.iter() {
        // `NoExpand` so `$` in replacements is never treated as a group ref.
        result = rule
            .pattern
            .replace_all(&result, regex::NoExpand(rule.replacement))
            .into_owned();
    }
    result.trim().to_string()
}
