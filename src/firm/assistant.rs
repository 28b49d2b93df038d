//! Stubbed assistant endpoints' logic.
//!
//! No model integration: summaries are truncations and the memo/sentiment
//! responses are fixed scaffolds the lawyer edits by hand.

use serde::Serialize;
use uuid::Uuid;

use crate::db::DocumentStore;
use crate::error::DatabaseError;

const SUMMARY_MAX_CHARS: usize = 300;

/// Truncating "summary" of free text.
pub fn summarize_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SUMMARY_MAX_CHARS {
        return trimmed.to_string();
    }
    let mut summary: String = trimmed.chars().take(SUMMARY_MAX_CHARS).collect();
    summary.push_str("...");
    summary
}

/// Summarize a stored document's extracted text. Missing documents or
/// documents without text yield an empty summary rather than an error.
pub async fn summarize_document(
    db: &dyn DocumentStore,
    document_id: Uuid,
) -> Result<String, DatabaseError> {
    let text = db
        .get_document(document_id)
        .await?
        .and_then(|doc| doc.text_content);
    Ok(text.as_deref().map(summarize_text).unwrap_or_default())
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoSection {
    pub title: &'static str,
    pub body: String,
}

/// Fixed three-section defense memo scaffold seeded with the case summary.
pub fn case_memo_sections(case_summary: &str) -> Vec<MemoSection> {
    vec![
        MemoSection {
            title: "Statement of Facts",
            body: case_summary.to_string(),
        },
        MemoSection {
            title: "Proposed Defense",
            body: "Draft defense outline based on the case summary; counsel should revise \
                   as needed."
                .to_string(),
        },
        MemoSection {
            title: "Requested Relief",
            body: "Set out the closing requests according to the case type and the client's \
                   objective."
                .to_string(),
        },
    ]
}

#[derive(Debug, Clone, Serialize)]
pub struct SentimentAnalysis {
    pub score: f64,
    pub label: &'static str,
    pub notes: &'static str,
}

/// Placeholder sentiment result until a real model is wired in.
pub fn client_sentiment_stub() -> SentimentAnalysis {
    SentimentAnalysis {
        score: 0.5,
        label: "NEUTRAL",
        notes: "Approximate stub result; connect a real model to score client interactions.",
    }
}

#[cfg(test)]
mod tests {
    use super::{SUMMARY_MAX_CHARS, case_memo_sections, summarize_text};

    #[test]
    fn short_text_passes_through_trimmed() {
        assert_eq!(summarize_text("  brief note  "), "brief note");
        assert_eq!(summarize_text(""), "");
    }

    #[test]
    fn long_text_truncates_with_ellipsis() {
        let long = "a".repeat(SUMMARY_MAX_CHARS + 50);
        let summary = summarize_text(&long);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let long = "ق".repeat(SUMMARY_MAX_CHARS + 10);
        let summary = summarize_text(&long);
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + 3);
    }

    #[test]
    fn memo_has_three_sections_seeded_with_summary() {
        let sections = case_memo_sections("contract dispute over delivery terms");
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].body, "contract dispute over delivery terms");
    }
}
