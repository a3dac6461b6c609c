use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::optimization::OptimizationAnalysis;

/// Raw structured output expected from the model.
/// Any deviation from this shape is a parse failure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResponse {
    pub analysis: OptimizationAnalysis,
    pub optimized_resume_markdown: String,
}

/// Response schema for schema-constrained generation, mirroring `OptimizationResponse`.
pub fn optimization_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "analysis": {
                "type": "OBJECT",
                "properties": {
                    "summary": { "type": "STRING" },
                    "changes": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "change": { "type": "STRING" },
                                "reason": { "type": "STRING" },
                                "quote": {
                                    "type": "STRING",
                                    "description": "The exact text phrase from the new resume that corresponds to this change."
                                }
                            },
                            "required": ["change", "reason"]
                        }
                    },
                    "keywords": {
                        "type": "ARRAY",
                        "items": { "type": "STRING" }
                    },
                    "jobUrl": { "type": "STRING" },
                    "coverLetter": {
                        "type": "STRING",
                        "description": "Full formal cover letter text."
                    },
                    "coverEmail": {
                        "type": "STRING",
                        "description": "Short, professional email body text for sending the application."
                    }
                },
                "required": ["summary", "changes", "keywords"]
            },
            "optimizedResumeMarkdown": {
                "type": "STRING",
                "description": "The complete rewritten resume in Markdown. NO SUMMARY section."
            }
        },
        "required": ["analysis", "optimizedResumeMarkdown"]
    })
}
