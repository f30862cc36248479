//! Research report payloads and export file naming.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use synthdoc_core::{parse, Document};

/// A finished deep-research run as the backend serializes it.
///
/// Only `query` is required. `synthesis` is the markdown report; when it is
/// missing or null the report renders as an empty document.
#[derive(Debug, Clone, Deserialize)]
pub struct ResearchReport {
    pub query: String,
    #[serde(default)]
    pub subagents: u32,
    #[serde(default)]
    pub total_sources: u32,
    #[serde(default)]
    pub synthesis: Option<String>,
    #[serde(default)]
    pub complexity_analysis: Option<ComplexityAnalysis>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub subagent_results: Option<Vec<SubagentResult>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComplexityAnalysis {
    pub complexity_score: f64,
    pub num_subagents: u32,
    pub explanation: String,
    pub estimated_sources: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubagentResult {
    /// One-based subtask number assigned by the lead agent.
    pub subtask: u32,
    #[serde(default)]
    pub search_focus: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
}

impl ResearchReport {
    /// Decode a report from its JSON form.
    pub fn from_json(input: &str) -> Result<Self> {
        serde_json::from_str(input).context("invalid research report payload")
    }

    /// The synthesis text, empty when absent.
    pub fn synthesis_text(&self) -> &str {
        self.synthesis.as_deref().unwrap_or_default()
    }

    /// Parse the synthesis. The query is the title, not part of the body.
    pub fn document(&self) -> Document<'_> {
        parse(self.synthesis_text())
    }

    /// Sources gathered by all subagents.
    pub fn sources(&self) -> impl Iterator<Item = &Source> {
        self.subagent_results
            .iter()
            .flatten()
            .flat_map(|r| r.sources.iter())
    }

    pub fn file_name(&self, format: ExportFormat) -> String {
        export_file_name(&self.query, format)
    }
}

/// Target format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

/// `deep_research_<slug>.<ext>`.
///
/// The slug is the query with each run of characters outside `[A-Za-z0-9]`
/// replaced by one `_`, then lowercased. Leading and trailing underscores
/// are kept.
pub fn export_file_name(query: &str, format: ExportFormat) -> String {
    format!("deep_research_{}.{}", slug(query), format.extension())
}

fn slug(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    for c in query.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_slugs_query() {
        assert_eq!(
            export_file_name("What is AI?", ExportFormat::Pdf),
            "deep_research_what_is_ai_.pdf"
        );
        assert_eq!(
            export_file_name("  Solid-state   batteries, 2025 ", ExportFormat::Docx),
            "deep_research__solid_state_batteries_2025_.docx"
        );
    }

    #[test]
    fn slug_collapses_underscores_and_non_ascii() {
        assert_eq!(slug("a__b"), "a_b");
        assert_eq!(slug("café crème"), "caf_cr_me");
        assert_eq!(slug("ÄÖÜ"), "_");
        assert_eq!(slug(""), "");
    }

    #[test]
    fn missing_synthesis_is_empty_document() {
        let report = ResearchReport::from_json(r#"{"query": "q"}"#).unwrap();
        assert!(report.document().is_empty());

        let report = ResearchReport::from_json(r#"{"query": "q", "synthesis": null}"#).unwrap();
        assert!(report.document().is_empty());
    }

    #[test]
    fn decodes_full_payload() {
        let json = r##"{
            "query": "Grid storage",
            "subagents": 2,
            "total_sources": 3,
            "synthesis": "# Grid storage\n\n- **Pumped hydro** dominates",
            "complexity_analysis": {
                "complexity_score": 0.7,
                "num_subagents": 2,
                "explanation": "broad topic",
                "estimated_sources": 6
            },
            "model": "research-large",
            "subagent_results": [
                {
                    "subtask": 1,
                    "search_focus": "timeline",
                    "sources": [
                        {"title": "A", "content": "a", "url": "https://a.example"},
                        {"title": "B", "content": "b"}
                    ]
                },
                {"subtask": 2, "sources": [{"title": "C"}]}
            ]
        }"##;

        let report = ResearchReport::from_json(json).unwrap();
        assert_eq!(report.subagents, 2);
        assert_eq!(report.document().len(), 2);
        assert_eq!(report.sources().count(), 3);
        assert_eq!(report.sources().filter(|s| s.url.is_some()).count(), 1);
        let subtasks: Vec<u32> = report
            .subagent_results
            .iter()
            .flatten()
            .map(|r| r.subtask)
            .collect();
        assert_eq!(subtasks, vec![1, 2]);
        assert_eq!(
            report.complexity_analysis.as_ref().map(|c| c.estimated_sources),
            Some(6)
        );
        assert_eq!(report.file_name(ExportFormat::Pdf), "deep_research_grid_storage.pdf");
    }

    #[test]
    fn decodes_backend_response_shape() {
        // Integer subtasks and scores, plus keys the CLI does not model.
        let json = r##"{
            "query": "Best Agentic AI Framework",
            "subagents": 4,
            "total_sources": 12,
            "synthesis": "Executive Summary: ...",
            "session_id": "3f2a",
            "subagent_results": [
                {
                    "subtask": 1,
                    "search_focus": "f",
                    "sources": [{"title": "A", "content": "a", "url": null}]
                }
            ],
            "complexity_analysis": {
                "complexity_score": 3,
                "num_subagents": 4,
                "explanation": "Multiple frameworks comparison required",
                "estimated_sources": 16
            },
            "model": "gpt-oss-120b"
        }"##;

        let report = ResearchReport::from_json(json).unwrap();
        assert_eq!(report.subagent_results.as_ref().map(Vec::len), Some(1));
        assert_eq!(report.sources().count(), 1);
        assert_eq!(
            report.complexity_analysis.as_ref().map(|c| c.complexity_score),
            Some(3.0)
        );
        assert_eq!(report.document().len(), 1);
        assert_eq!(
            report.file_name(ExportFormat::Docx),
            "deep_research_best_agentic_ai_framework.docx"
        );
    }

    #[test]
    fn empty_subagent_results_decode() {
        let report =
            ResearchReport::from_json(r#"{"query": "q", "subagent_results": []}"#).unwrap();
        assert_eq!(report.sources().count(), 0);
    }

    #[test]
    fn rejects_payload_without_query() {
        let err = ResearchReport::from_json(r#"{"synthesis": "text"}"#).unwrap_err();
        assert!(format!("{err:#}").contains("invalid research report payload"));
    }
}
