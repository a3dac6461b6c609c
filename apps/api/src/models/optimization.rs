use serde::{Deserialize, Serialize};

/// A single change the model made to the resume, with the reason and the
/// exact phrase in the rewritten markdown it corresponds to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisItem {
    pub change: String,
    pub reason: String,
    /// Verbatim substring of the tailored markdown, used for highlight linking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationAnalysis {
    pub summary: String,
    pub changes: Vec<AnalysisItem>,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_email: Option<String>,
}

impl OptimizationAnalysis {
    /// Drops repeated keywords, keeping the first occurrence of each.
    pub fn dedup_keywords(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.keywords.retain(|k| seen.insert(k.clone()));
    }
}

/// Tailored resume body plus its analysis. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub markdown: String,
    pub analysis: OptimizationAnalysis,
}

impl OptimizationResult {
    /// Changes whose quote cannot be found verbatim in the markdown,
    /// and so cannot be highlighted in the preview.
    pub fn unmatched_quotes(&self) -> Vec<&AnalysisItem> {
        self.analysis
            .changes
            .iter()
            .filter(|item| match item.quote.as_deref().map(str::trim) {
                Some(quote) if !quote.is_empty() => !self.markdown.contains(quote),
                _ => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(markdown: &str, changes: Vec<AnalysisItem>) -> OptimizationResult {
        OptimizationResult {
            markdown: markdown.to_string(),
            analysis: OptimizationAnalysis {
                summary: "ok".to_string(),
                changes,
                keywords: vec![],
                job_url: None,
                cover_letter: None,
                cover_email: None,
            },
        }
    }

    #[test]
    fn test_analysis_deserializes_camel_case_optionals() {
        let json = r#"{
            "summary": "Targeted backend role",
            "changes": [
                {"change": "Reworded lead bullet", "reason": "Matches JD", "quote": "Built Go services"},
                {"change": "Reordered skills", "reason": "Priority"}
            ],
            "keywords": ["Go", "Kubernetes"],
            "jobUrl": "https://example.com/jobs/42",
            "coverLetter": "Dear Hiring Manager"
        }"#;

        let analysis: OptimizationAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.changes.len(), 2);
        assert_eq!(analysis.changes[0].quote.as_deref(), Some("Built Go services"));
        assert!(analysis.changes[1].quote.is_none());
        assert_eq!(analysis.job_url.as_deref(), Some("https://example.com/jobs/42"));
        assert_eq!(analysis.cover_letter.as_deref(), Some("Dear Hiring Manager"));
        assert!(analysis.cover_email.is_none());
    }

    #[test]
    fn test_analysis_missing_required_field_is_rejected() {
        let json = r#"{"summary": "ok", "keywords": []}"#;
        assert!(serde_json::from_str::<OptimizationAnalysis>(json).is_err());
    }

    #[test]
    fn test_dedup_keywords_keeps_first_occurrence() {
        let mut analysis = sample("", vec![]).analysis;
        analysis.keywords = vec!["Go".into(), "Rust".into(), "Go".into(), "SQL".into()];
        analysis.dedup_keywords();
        assert_eq!(analysis.keywords, vec!["Go", "Rust", "SQL"]);
    }

    #[test]
    fn test_unmatched_quotes_reports_only_missing_phrases() {
        let result = sample(
            "### Engineer, Acme | 2020 - 2024\n- Built Go services handling 10k rps",
            vec![
                AnalysisItem {
                    change: "a".into(),
                    reason: "r".into(),
                    quote: Some("Built Go services".into()),
                },
                AnalysisItem {
                    change: "b".into(),
                    reason: "r".into(),
                    quote: Some("Led a team of 40".into()),
                },
                AnalysisItem {
                    change: "c".into(),
                    reason: "r".into(),
                    quote: None,
                },
            ],
        );

        let unmatched = result.unmatched_quotes();
        assert_eq!(unmatched.len(), 1);
        assert_eq!(unmatched[0].change, "b");
    }
}
