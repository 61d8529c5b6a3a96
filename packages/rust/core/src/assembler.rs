//! Cell assembler.
//!
//! Turns a fetched problem and the transformer outputs into the ordered
//! [`ContentBlock`]s appended to a notebook.

use chrono::NaiveDate;
use tracing::{debug, instrument};

use leettutor_shared::{
    ContentBlock, ConversionMode, DependencyFinding, ProblemRecord, ProblemStats,
    SimilarQuestion, parse_embedded, recover,
};

use crate::deps::{self, PLACEHOLDER_STARTER};
use crate::harness::TEST_RUNNER;

/// Text used when a problem has neither HTML content nor a description.
pub const MISSING_DESCRIPTION: &str = "Problem description not available";

/// Banner cell of a freshly created notebook.
pub const NOTEBOOK_BANNER: &str = "**LeetTutor**";

/// Blank analysis template closing every problem layout.
pub const ANALYSIS_TEMPLATE: &str =
    r#"<font size="3">**Analysis:** Time O() | Space O() | Approach: | Notes:</font>"#;

/// Maximum number of similar problems linked from the stats cell.
const MAX_SIMILAR: usize = 3;

// ---------------------------------------------------------------------------
// Record helpers
// ---------------------------------------------------------------------------

/// Problem statement as markup: converted HTML content, else the plain
/// description, else [`MISSING_DESCRIPTION`].
pub fn description_markup(record: &ProblemRecord, mode: ConversionMode) -> String {
    if let Some(html) = record.content_html.as_deref().filter(|h| !h.is_empty()) {
        return leettutor_markdown::convert(html, mode);
    }
    record
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| MISSING_DESCRIPTION.to_string())
}

/// Parsed `stats`, or `None` when missing or malformed.
pub fn parse_stats(record: &ProblemRecord) -> Option<ProblemStats> {
    let raw = record.stats.as_deref()?;
    recover(parse_embedded("stats", raw))
}

/// Parsed `similarQuestions`; empty when missing or malformed.
pub fn parse_similar(record: &ProblemRecord) -> Vec<SimilarQuestion> {
    record
        .similar_questions
        .as_deref()
        .and_then(|raw| recover(parse_embedded("similarQuestions", raw)))
        .unwrap_or_default()
}

fn tags_or_na(record: &ProblemRecord) -> String {
    let tags = record.tags();
    if tags.is_empty() {
        "N/A".to_string()
    } else {
        tags.join(", ")
    }
}

// ---------------------------------------------------------------------------
// Problem layout
// ---------------------------------------------------------------------------

/// Everything the problem layout is built from.
#[derive(Debug, Clone)]
pub struct ProblemLayout<'a> {
    pub record: &'a ProblemRecord,
    /// Problem statement, already converted to markup.
    pub description: String,
    pub stats: Option<ProblemStats>,
    pub similar: Vec<SimilarQuestion>,
    /// Base URL for similar-problem links, without a trailing slash.
    pub link_base: &'a str,
    pub findings: &'a [DependencyFinding],
    /// Starter code with its preamble already prepended.
    pub code: String,
    pub harness: String,
}

fn title_block(record: &ProblemRecord) -> ContentBlock {
    ContentBlock::Markup(format!(
        "<font size=\"5\"># {}\n**Difficulty:** {} | **Tags:** {}</font>",
        record.title,
        record.difficulty,
        tags_or_na(record)
    ))
}

fn stats_block(
    stats: Option<&ProblemStats>,
    similar: &[SimilarQuestion],
    link_base: &str,
) -> ContentBlock {
    let rate = stats.map_or_else(|| "N/A".to_string(), |s| format!("{} acceptance", s.ac_rate));

    let links = if similar.is_empty() {
        String::new()
    } else {
        let joined = similar
            .iter()
            .take(MAX_SIMILAR)
            .map(|q| format!("[{}]({link_base}/{}/)", q.title, q.title_slug))
            .collect::<Vec<_>>()
            .join(" | ");
        format!("\n\n**Similar:** {joined}\n\n")
    };

    ContentBlock::Markup(format!("<font size=\"3\">**Stats:** {rate}{links}</font>"))
}

fn dependency_block(findings: &[DependencyFinding]) -> Option<ContentBlock> {
    if findings.is_empty() {
        return None;
    }
    Some(ContentBlock::Markup(format!(
        "<font size=\"3\">**Dependencies:** {} (auto-added)</font>",
        deps::summary(findings)
    )))
}

/// Cells for a problem, in order: title, stats, statement, dependency summary
/// (only with findings), starter code, harness, test runner, analysis.
#[instrument(skip_all, fields(title = %layout.record.title, findings = layout.findings.len()))]
pub fn problem_blocks(layout: &ProblemLayout<'_>) -> Vec<ContentBlock> {
    let mut blocks = vec![
        title_block(layout.record),
        stats_block(layout.stats.as_ref(), &layout.similar, layout.link_base),
        ContentBlock::Markup(format!(
            "<font size=\"3\">**Problem:** {}</font>",
            layout.description
        )),
    ];
    blocks.extend(dependency_block(layout.findings));
    blocks.extend([
        ContentBlock::Executable(layout.code.clone()),
        ContentBlock::Executable(layout.harness.clone()),
        ContentBlock::Executable(TEST_RUNNER.to_string()),
        ContentBlock::Markup(ANALYSIS_TEMPLATE.to_string()),
    ]);

    debug!(blocks = blocks.len(), "problem layout assembled");
    blocks
}

// ---------------------------------------------------------------------------
// Daily and new-notebook layouts
// ---------------------------------------------------------------------------

/// Header and starter code for the daily challenge.
pub fn daily_blocks(
    record: &ProblemRecord,
    languages: &[String],
    date: NaiveDate,
) -> Vec<ContentBlock> {
    let description = record
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(MISSING_DESCRIPTION);

    let header = format!(
        "# Daily Challenge - {}\n\n## {}\n\n**Difficulty:** {}\n\n**Problem Statement:**\n\n{}\n\n**Tags:** {}",
        date.format("%a %b %d %Y"),
        record.title,
        record.difficulty,
        description,
        tags_or_na(record)
    );
    let code = record.starter_code(languages).unwrap_or(PLACEHOLDER_STARTER);

    vec![
        ContentBlock::Markup(header),
        ContentBlock::Executable(code.to_string()),
    ]
}

/// Initial content of a new notebook.
pub fn new_notebook_blocks() -> Vec<ContentBlock> {
    vec![ContentBlock::Markup(NOTEBOOK_BANNER.to_string())]
}
