//! Export boundary — describes a paginated document for the client-side PDF renderer.

use serde::{Deserialize, Serialize};

use crate::models::optimization::OptimizationResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportDocument {
    Resume,
    CoverLetter,
}

impl ExportDocument {
    /// Human-readable name for messages.
    pub fn label(self) -> &'static str {
        match self {
            ExportDocument::Resume => "resume",
            ExportDocument::CoverLetter => "cover letter",
        }
    }
}

/// Page setup plus content, handed to the renderer as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSpec {
    pub filename: &'static str,
    pub format: &'static str,
    pub orientation: &'static str,
    pub unit: &'static str,
    /// top, right, bottom, left
    pub margin: [u32; 4],
    pub content: String,
}

/// Builds the export for `document`, or `None` when the result has no such content.
pub fn export_spec(result: &OptimizationResult, document: ExportDocument) -> Option<ExportSpec> {
    let (filename, margin, content) = match document {
        ExportDocument::Resume => ("Tailored_Resume.pdf", 10, result.markdown.clone()),
        ExportDocument::CoverLetter => (
            "Cover_Letter.pdf",
            20,
            result
                .analysis
                .cover_letter
                .clone()
                .filter(|c| !c.trim().is_empty())?,
        ),
    };

    Some(ExportSpec {
        filename,
        format: "a4",
        orientation: "portrait",
        unit: "mm",
        margin: [margin; 4],
        content,
    })
}
