//! End-to-end commands: problem → cells → active notebook.
//!
//! Each command resolves the active document first, so a missing notebook
//! fails before any network traffic. Any failure before the final edit leaves
//! the document untouched.

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use leettutor_fetcher::{DatasetClient, FallbackQuery, ProblemClient};
use leettutor_notebook::Notebook;
use leettutor_shared::{AppConfig, DocumentHandle, FetchConfig, LeetTutorError, Result};

use crate::assembler::{self, ProblemLayout};
use crate::port::{self, DocumentEditPort};
use crate::{applier, deps, harness};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once the edit has been applied.
    fn done(&self, message: &str);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _message: &str) {}
}

/// What a command runs against.
#[derive(Clone, Copy)]
pub struct PopulateContext<'a> {
    pub config: &'a AppConfig,
    pub port: &'a dyn DocumentEditPort,
    pub progress: &'a dyn ProgressReporter,
}

/// Where the starter code came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    ExternalApi,
    Dataset,
    Missing,
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExternalApi => "External API",
            Self::Dataset => "Hugging Face Dataset",
            Self::Missing => "No starter code available",
        })
    }
}

/// Result of [`populate_from_api`].
#[derive(Debug, Clone)]
pub struct PopulateSummary {
    pub title: String,
    pub document: DocumentHandle,
    /// Index of the first inserted cell.
    pub position: usize,
    pub cells_added: usize,
    /// Whether a dataset row was matched.
    pub used_dataset: bool,
    pub template_source: TemplateSource,
    /// Descriptions of the dependencies added to the starter code.
    pub dependencies: Vec<&'static str>,
    pub elapsed: Duration,
}

impl PopulateSummary {
    pub fn status_message(&self) -> String {
        let sources = if self.used_dataset {
            "External API + HF Dataset"
        } else {
            "External API only"
        };
        format!(
            "Successfully populated notebook with problem: {} ({sources})",
            self.title
        )
    }
}

/// Result of [`populate_daily`].
#[derive(Debug, Clone)]
pub struct DailySummary {
    pub title: String,
    pub document: DocumentHandle,
    pub position: usize,
    pub cells_added: usize,
}

impl DailySummary {
    pub fn status_message(&self) -> String {
        format!("Daily challenge loaded: {}", self.title)
    }
}

async fn active_document(port: &dyn DocumentEditPort) -> Result<DocumentHandle> {
    port.current_document()
        .await?
        .ok_or(LeetTutorError::NoActiveDocument)
}

// ---------------------------------------------------------------------------
// populate
// ---------------------------------------------------------------------------

/// Fetch a problem by id or slug and append its cells to the active notebook.
///
/// 1. Resolve the active notebook
/// 2. Fetch the problem from the primary API
/// 3. Look up the dataset when the API has no starter code
/// 4. Sniff dependencies and synthesize the test harness
/// 5. Assemble and append the cells
#[instrument(skip_all, fields(identifier = %identifier))]
pub async fn populate_from_api(
    ctx: PopulateContext<'_>,
    identifier: &str,
) -> Result<PopulateSummary> {
    let start = Instant::now();
    let document = active_document(ctx.port).await?;
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(LeetTutorError::validation("problem identifier is empty"));
    }

    let fetch = FetchConfig::from(ctx.config);
    let notebook_config = &ctx.config.notebook;

    // --- Phase 1: Primary API ---
    ctx.progress.phase("Fetching problem data...");
    let record = ProblemClient::new(&fetch)?.fetch_problem(identifier).await?;

    // --- Phase 2: Starter code, with dataset fallback ---
    let api_code = record.starter_code(&notebook_config.languages);
    let fallback = match (api_code, &fetch.dataset) {
        (None, Some(dataset)) => {
            ctx.progress.phase("Fetching from Hugging Face dataset...");
            let query = FallbackQuery::new(identifier, &record);
            DatasetClient::new(dataset, fetch.timeout_secs)?
                .fetch_fallback(&query)
                .await
        }
        _ => None,
    };
    let dataset_code = fallback.as_ref().and_then(|f| f.starter_code.as_deref());
    let starter = api_code
        .or(dataset_code)
        .unwrap_or(deps::PLACEHOLDER_STARTER);

    let template_source = if record.code_snippets.is_some() {
        TemplateSource::ExternalApi
    } else if dataset_code.is_some() {
        TemplateSource::Dataset
    } else {
        TemplateSource::Missing
    };

    // --- Phase 3: Transform ---
    ctx.progress.phase("Preparing notebook cells");
    let findings = if starter == deps::PLACEHOLDER_STARTER {
        Vec::new()
    } else {
        deps::sniff(starter)
    };
    let entry = harness::entry_point(
        fallback.as_ref().and_then(|f| f.entry_point.as_deref()),
        starter,
    );
    let test_harness = harness::synthesize(
        fallback.as_ref().and_then(|f| f.test_spec.as_ref()),
        record.example_testcases.as_deref(),
        &entry,
    );
    debug!(findings = findings.len(), %entry, "starter code analysed");

    let layout = ProblemLayout {
        record: &record,
        description: assembler::description_markup(&record, notebook_config.conversion),
        stats: assembler::parse_stats(&record),
        similar: assembler::parse_similar(&record),
        link_base: notebook_config.problem_link_base.trim_end_matches('/'),
        findings: &findings,
        code: deps::complete_code(starter, &findings),
        harness: test_harness,
    };
    let blocks = assembler::problem_blocks(&layout);

    // --- Phase 4: Apply ---
    ctx.progress.phase("Updating notebook");
    let position = applier::apply(ctx.port, &document, &blocks).await?;

    let summary = PopulateSummary {
        title: record.title.clone(),
        document,
        position,
        cells_added: blocks.len(),
        used_dataset: fallback.is_some(),
        template_source,
        dependencies: findings.iter().map(|f| f.description).collect(),
        elapsed: start.elapsed(),
    };

    info!(
        title = %summary.title,
        cells = summary.cells_added,
        template = %summary.template_source,
        dataset = summary.used_dataset,
        "notebook populated"
    );
    ctx.progress.done(&summary.status_message());
    Ok(summary)
}

// ---------------------------------------------------------------------------
// daily
// ---------------------------------------------------------------------------

/// Append today's daily challenge to the active notebook.
#[instrument(skip_all)]
pub async fn populate_daily(ctx: PopulateContext<'_>) -> Result<DailySummary> {
    let document = active_document(ctx.port).await?;
    let fetch = FetchConfig::from(ctx.config);

    ctx.progress.phase("Fetching today's LeetCode challenge...");
    let record = ProblemClient::new(&fetch)?.fetch_daily().await?;

    let today = chrono::Local::now().date_naive();
    let blocks = assembler::daily_blocks(&record, &ctx.config.notebook.languages, today);

    ctx.progress.phase("Updating notebook");
    let position = applier::apply(ctx.port, &document, &blocks).await?;

    let summary = DailySummary {
        title: record.title.clone(),
        document,
        position,
        cells_added: blocks.len(),
    };
    info!(title = %summary.title, "daily challenge appended");
    ctx.progress.done(&summary.status_message());
    Ok(summary)
}

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

/// Write a new notebook with the LeetTutor banner and a Python 3 kernel.
///
/// Refuses to replace an existing file unless `force` is set.
#[instrument(skip_all, fields(path = %path.display(), force = force))]
pub fn create_notebook(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(LeetTutorError::validation(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| LeetTutorError::io(parent, e))?;
    }

    let mut notebook = Notebook::python("leettutor");
    notebook.append(assembler::new_notebook_blocks().iter().map(port::to_cell));
    notebook.save(path)?;

    info!("notebook created");
    Ok(())
}
