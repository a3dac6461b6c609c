use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::optimization::OptimizationResult;

/// One job description the user is composing. `id` is stable across edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInput {
    pub id: String,
    pub text: String,
}

impl JobInput {
    /// A job is eligible for a batch when its trimmed text is non-empty.
    pub fn is_eligible(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Loading,
    Success,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Loading)
    }
}

/// Per-job status inside a batch.
///
/// Built only through `loading`, `succeeded` and `failed`, so `result` is
/// populated exactly when the status is `Success` and `error` exactly when
/// it is `Error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub job_id: String,
    pub status: JobStatus,
    pub result: Option<OptimizationResult>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobResult {
    pub fn loading(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: JobStatus::Loading,
            result: None,
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Moves a loading entry to `Success`. Terminal entries are left untouched.
    pub fn succeed(&mut self, result: OptimizationResult) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Success;
        self.result = Some(result);
        self.error = None;
        self.finished_at = Some(Utc::now());
        true
    }

    /// Moves a loading entry to `Error`. Terminal entries are left untouched.
    pub fn fail(&mut self, message: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Error;
        self.result = None;
        self.error = Some(message.into());
        self.finished_at = Some(Utc::now());
        true
    }
}

/// Job results of the current batch keyed by job id, in dispatch order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultMap {
    entries: Vec<JobResult>,
}

impl ResultMap {
    /// Fresh map with every job in `Loading`.
    pub fn all_loading<'a>(job_ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            entries: job_ids.into_iter().map(JobResult::loading).collect(),
        }
    }

    pub fn get(&self, job_id: &str) -> Option<&JobResult> {
        self.entries.iter().find(|r| r.job_id == job_id)
    }

    /// Applies `update` to the entry keyed by `job_id` only. Returns `None`
    /// when no such entry exists.
    pub fn apply<R>(&mut self, job_id: &str, update: impl FnOnce(&mut JobResult) -> R) -> Option<R> {
        self.entries
            .iter_mut()
            .find(|r| r.job_id == job_id)
            .map(update)
    }

    pub fn job_ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|r| r.job_id.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &JobResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn all_terminal(&self) -> bool {
        self.entries.iter().all(|r| r.status.is_terminal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::optimization::OptimizationAnalysis;

    fn result() -> OptimizationResult {
        OptimizationResult {
            markdown: "# Resume".to_string(),
            analysis: OptimizationAnalysis {
                summary: "ok".to_string(),
                changes: vec![],
                keywords: vec!["Go".to_string()],
                job_url: None,
                cover_letter: None,
                cover_email: None,
            },
        }
    }

    #[test]
    fn test_whitespace_only_job_is_not_eligible() {
        let job = JobInput {
            id: "1".into(),
            text: "  \n\t ".into(),
        };
        assert!(!job.is_eligible());
    }

    #[test]
    fn test_success_populates_result_only() {
        let mut entry = JobResult::loading("1");
        assert!(entry.succeed(result()));
        assert_eq!(entry.status, JobStatus::Success);
        assert!(entry.result.is_some());
        assert!(entry.error.is_none());
        assert!(entry.finished_at.is_some());
    }

    #[test]
    fn test_failure_populates_error_only() {
        let mut entry = JobResult::loading("1");
        assert!(entry.fail("upstream 500"));
        assert_eq!(entry.status, JobStatus::Error);
        assert!(entry.result.is_none());
        assert_eq!(entry.error.as_deref(), Some("upstream 500"));
    }

    #[test]
    fn test_terminal_entry_does_not_transition_again() {
        let mut entry = JobResult::loading("1");
        entry.fail("first");
        assert!(!entry.succeed(result()));
        assert_eq!(entry.status, JobStatus::Error);
        assert_eq!(entry.error.as_deref(), Some("first"));
    }

    #[test]
    fn test_apply_touches_only_the_keyed_entry() {
        let mut map = ResultMap::all_loading(["a", "b", "c"]);
        let before_a = map.get("a").cloned();
        let before_c = map.get("c").cloned();

        map.apply("b", |r| r.fail("boom"));

        assert_eq!(map.get("b").map(|r| r.status), Some(JobStatus::Error));
        assert_eq!(map.get("a").cloned(), before_a);
        assert_eq!(map.get("c").cloned(), before_c);
        assert!(map.apply("missing", |r| r.fail("x")).is_none());
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_value(JobResult::loading("7")).unwrap();
        assert_eq!(json["status"], "LOADING");
        assert_eq!(json["jobId"], "7");
        assert!(json["result"].is_null());
    }
}
