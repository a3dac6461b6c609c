//! Optimization Client — one schema-constrained generation call per job.
//!
//! `AppState` carries an `Arc<dyn Optimizer>`; the orchestrator only sees the trait,
//! so tests drive it with scripted implementations.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::llm_client::prompts::{job_prompt, RESUME_TAILOR_SYSTEM};
use crate::llm_client::schema::{optimization_response_schema, OptimizationResponse};
use crate::llm_client::{ClientError, LlmClient, Part, StructuredPrompt};
use crate::models::optimization::OptimizationResult;

/// Failure of a single optimization call.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error(
        "API key is missing.\n\
         - LOCAL: set GEMINI_API_KEY in the environment or the .env file, then restart the server.\n\
         - DEPLOYED: add GEMINI_API_KEY to the service's environment variables and redeploy."
    )]
    Configuration,

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Upstream failures are scoped to the job that hit them.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("Failed to optimize resume. The file format might not be supported or the content is too large.")]
    Rejected { status: u16, detail: String },

    #[error("Failed to optimize resume. The request timed out after {0}s.")]
    Timeout(u64),

    #[error("Failed to optimize resume. The response was not in the expected format: {0}")]
    Malformed(String),

    #[error("Failed to optimize resume. {0}")]
    Service(String),
}

impl OptimizeError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, OptimizeError::Configuration)
    }
}

impl From<ClientError> for OptimizeError {
    fn from(error: ClientError) -> Self {
        let upstream = match error {
            ClientError::MissingApiKey => return OptimizeError::Configuration,
            ClientError::Timeout(secs) => UpstreamError::Timeout(secs),
            ClientError::Api {
                status: status @ (400 | 413),
                message,
            } => UpstreamError::Rejected {
                status,
                detail: message,
            },
            ClientError::Api { status, message } => {
                UpstreamError::Service(format!("Upstream returned {status}: {message}"))
            }
            ClientError::Parse(e) => UpstreamError::Malformed(e.to_string()),
            ClientError::EmptyContent => UpstreamError::Malformed("No content generated.".to_string()),
            ClientError::Http(e) => UpstreamError::Service(e.to_string()),
        };
        OptimizeError::Upstream(upstream)
    }
}

/// The Optimization Client contract. Implement this to swap the generation
/// backend without touching the orchestrator.
#[async_trait]
pub trait Optimizer: Send + Sync {
    /// `resume_data` is the base64-encoded document; the caller guarantees
    /// `job_description` is non-empty.
    async fn optimize(
        &self,
        resume_data: &str,
        resume_mime_type: &str,
        job_description: &str,
    ) -> Result<OptimizationResult, OptimizeError>;
}

/// Gemini-backed optimizer.
pub struct GeminiOptimizer {
    llm: LlmClient,
    response_schema: Value,
}

impl GeminiOptimizer {
    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            response_schema: optimization_response_schema(),
        }
    }
}

#[async_trait]
impl Optimizer for GeminiOptimizer {
    async fn optimize(
        &self,
        resume_data: &str,
        resume_mime_type: &str,
        job_description: &str,
    ) -> Result<OptimizationResult, OptimizeError> {
        let text = job_prompt(job_description);
        let prompt = StructuredPrompt {
            system: RESUME_TAILOR_SYSTEM,
            parts: vec![
                Part::inline(resume_mime_type, resume_data),
                Part::text(&text),
            ],
            response_schema: &self.response_schema,
        };

        let response: OptimizationResponse = self.llm.generate_json(prompt).await?;

        let mut analysis = response.analysis;
        analysis.dedup_keywords();

        Ok(OptimizationResult {
            markdown: response.optimized_resume_markdown,
            analysis,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_maps_to_configuration() {
        let err = OptimizeError::from(ClientError::MissingApiKey);
        assert!(err.is_configuration());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_bad_request_maps_to_size_or_format_message() {
        let err = OptimizeError::from(ClientError::Api {
            status: 400,
            message: "Request payload size exceeds the limit".to_string(),
        });
        assert!(matches!(
            err,
            OptimizeError::Upstream(UpstreamError::Rejected { status: 400, .. })
        ));
        assert!(err.to_string().contains("content is too large"));
    }

    #[test]
    fn test_server_error_keeps_upstream_detail() {
        let err = OptimizeError::from(ClientError::Api {
            status: 500,
            message: "internal".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Failed to optimize resume. Upstream returned 500: internal"
        );
    }

    #[test]
    fn test_empty_content_is_malformed() {
        let err = OptimizeError::from(ClientError::EmptyContent);
        assert!(matches!(err, OptimizeError::Upstream(UpstreamError::Malformed(_))));
        assert!(err.to_string().contains("No content generated."));
    }

    #[test]
    fn test_timeout_is_upstream() {
        let err = OptimizeError::from(ClientError::Timeout(120));
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("timed out after 120s"));
    }

    #[tokio::test]
    async fn test_gemini_optimizer_without_key_is_configuration_error() {
        let optimizer = GeminiOptimizer::new(LlmClient::new(None, 5).unwrap());
        let err = optimizer
            .optimize("JVBERi0=", "application/pdf", "Backend Engineer")
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
