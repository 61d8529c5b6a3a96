//! Core domain types for LeetTutor problems and notebook content.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// ProblemRecord
// ---------------------------------------------------------------------------

/// A problem as returned by the primary problem API (`/problem/{id}` or `/daily`).
///
/// Field names follow the API's camelCase JSON. Every field other than the title
/// may be missing; `stats` and `similarQuestions` are JSON documents embedded
/// as strings and are parsed lazily.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    /// Display title, e.g. `Two Sum`.
    #[serde(default)]
    pub title: String,
    /// URL slug, e.g. `two-sum`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_slug: Option<String>,
    /// `Easy`, `Medium` or `Hard`.
    #[serde(default)]
    pub difficulty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic_tags: Vec<TopicTag>,
    /// Plain-text description, used when no HTML content is available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Raw HTML problem statement.
    #[serde(default, rename = "content", skip_serializing_if = "Option::is_none")]
    pub content_html: Option<String>,
    /// Embedded JSON string with acceptance statistics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<String>,
    /// Embedded JSON string with a list of similar questions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_questions: Option<String>,
    /// Starter code per language, in API order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippets: Option<Vec<CodeSnippet>>,
    /// Newline-delimited example inputs and outputs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example_testcases: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub question_frontend_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub question_id: Option<String>,
}

impl ProblemRecord {
    /// Tag names in API order.
    pub fn tags(&self) -> Vec<&str> {
        self.topic_tags.iter().map(|t| t.name.as_str()).collect()
    }

    /// The user-facing problem number, falling back to the internal id.
    pub fn frontend_id(&self) -> Option<&str> {
        fn non_empty(id: &Option<String>) -> Option<&str> {
            id.as_deref().filter(|id| !id.is_empty())
        }
        non_empty(&self.question_frontend_id).or_else(|| non_empty(&self.question_id))
    }

    /// First starter-code snippet whose language label is one of `languages`.
    ///
    /// Snippets are scanned in API order; the first snippet matching any of the
    /// labels wins.
    pub fn starter_code(&self, languages: &[String]) -> Option<&str> {
        self.code_snippets
            .as_deref()?
            .iter()
            .find(|s| languages.iter().any(|l| l == &s.lang))
            .map(|s| s.code.as_str())
    }
}

/// A topic tag attached to a problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTag {
    pub name: String,
}

/// One language variant of the starter code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    /// Language label, e.g. `Python3`.
    pub lang: String,
    pub code: String,
}

/// Acceptance statistics embedded in the `stats` field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStats {
    /// Acceptance rate as rendered by the API, e.g. `49.1%`.
    #[serde(default)]
    pub ac_rate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_accepted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_submission: Option<String>,
}

/// An entry of the `similarQuestions` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarQuestion {
    pub title: String,
    pub title_slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

// ---------------------------------------------------------------------------
// Dataset fallback
// ---------------------------------------------------------------------------

/// One example test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleCase {
    pub input: String,
    pub output: String,
}

/// Test material supplied by the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestSpec {
    /// Ready-to-run test code, used verbatim.
    Code(String),
    /// Structured input/output pairs.
    Cases(Vec<ExampleCase>),
}

/// A dataset row matched for a problem whose primary record lacks starter code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetFallbackRecord {
    /// Dataset task id (the problem slug).
    pub task_id: String,
    pub question_id: Option<String>,
    pub starter_code: Option<String>,
    pub test_spec: Option<TestSpec>,
    /// Declared entry point, e.g. `Solution().twoSum`.
    pub entry_point: Option<String>,
}

// ---------------------------------------------------------------------------
// Transformer / assembler output
// ---------------------------------------------------------------------------

/// A recognized symbol pattern in starter code and what it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyFinding {
    /// Human-readable label, e.g. `List type annotation`.
    pub description: &'static str,
    /// Import statement or class definition that satisfies the pattern.
    pub emission: &'static str,
}

impl DependencyFinding {
    /// Whether the emission is an import statement (vs. a class definition).
    pub fn is_import(&self) -> bool {
        self.emission.starts_with("from") || self.emission.starts_with("import")
    }
}

/// One ordered unit of an assembled notebook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    /// Narrative markdown.
    Markup(String),
    /// Executable code.
    Executable(String),
}

impl ContentBlock {
    /// The block's text regardless of kind.
    pub fn text(&self) -> &str {
        match self {
            Self::Markup(text) | Self::Executable(text) => text,
        }
    }

    pub fn is_markup(&self) -> bool {
        matches!(self, Self::Markup(_))
    }
}

// ---------------------------------------------------------------------------
// DocumentHandle
// ---------------------------------------------------------------------------

/// Reference to an open target document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentHandle(PathBuf);

impl DocumentHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for DocumentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

/// Accept a JSON string or number (or null) as an optional string.
pub fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Treat an explicit JSON `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(name: &str) -> String {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures/json")
            .join(name);
        std::fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    #[test]
    fn problem_fixture_deserializes() {
        let record: ProblemRecord =
            serde_json::from_str(&fixture("problem-two-sum.json")).expect("deserialize");
        assert_eq!(record.title, "Two Sum");
        assert_eq!(record.difficulty, "Easy");
        assert_eq!(record.tags(), vec!["Array", "Hash Table"]);
        assert_eq!(record.frontend_id(), Some("1"));
        assert!(record.content_html.as_deref().unwrap().contains("<p>"));
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let record: ProblemRecord = serde_json::from_str(
            r#"{"title":"X","questionFrontendId":42,"questionId":"57","topicTags":null}"#,
        )
        .expect("deserialize");
        assert_eq!(record.question_frontend_id.as_deref(), Some("42"));
        assert_eq!(record.question_id.as_deref(), Some("57"));
        assert!(record.topic_tags.is_empty());
    }

    #[test]
    fn frontend_id_falls_back_to_question_id() {
        let record = ProblemRecord {
            question_id: Some("7".into()),
            ..Default::default()
        };
        assert_eq!(record.frontend_id(), Some("7"));
    }

    #[test]
    fn empty_frontend_id_falls_back_to_question_id() {
        let record = ProblemRecord {
            question_frontend_id: Some(String::new()),
            question_id: Some("7".into()),
            ..Default::default()
        };
        assert_eq!(record.frontend_id(), Some("7"));

        let record = ProblemRecord {
            question_frontend_id: Some(String::new()),
            question_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(record.frontend_id(), None);
    }

    #[test]
    fn starter_code_respects_snippet_order() {
        let record = ProblemRecord {
            code_snippets: Some(vec![
                CodeSnippet {
                    lang: "C++".into(),
                    code: "class Solution {};".into(),
                },
                CodeSnippet {
                    lang: "Python".into(),
                    code: "class Solution(object):".into(),
                },
                CodeSnippet {
                    lang: "Python3".into(),
                    code: "class Solution:".into(),
                },
            ]),
            ..Default::default()
        };
        let langs = vec!["Python3".to_string(), "Python".to_string()];
        assert_eq!(record.starter_code(&langs), Some("class Solution(object):"));
        assert_eq!(record.starter_code(&["Rust".to_string()]), None);
    }

    #[test]
    fn dependency_finding_kind() {
        let import = DependencyFinding {
            description: "Deque import",
            emission: "from collections import deque",
        };
        let class = DependencyFinding {
            description: "Linked list node definition",
            emission: "class ListNode:",
        };
        assert!(import.is_import());
        assert!(!class.is_import());
    }
}
