use serde::Serialize;
use uuid::Uuid;

use crate::models::job::JobInput;

/// Ordered job inputs being composed. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JobRegistry {
    jobs: Vec<JobInput>,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self {
            jobs: vec![blank_job()],
        }
    }
}

fn blank_job() -> JobInput {
    JobInput {
        id: Uuid::new_v4().to_string(),
        text: String::new(),
    }
}

impl JobRegistry {
    /// Builds a registry from existing inputs, falling back to one blank row.
    pub fn from_inputs(jobs: Vec<JobInput>) -> Self {
        if jobs.is_empty() {
            Self::default()
        } else {
            Self { jobs }
        }
    }

    /// Appends a blank job with a fresh id.
    pub fn add(&mut self) -> &JobInput {
        self.jobs.push(blank_job());
        &self.jobs[self.jobs.len() - 1]
    }

    /// Removes the job with `id`. No-op for unknown ids or the last remaining job.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.jobs.len() <= 1 {
            return false;
        }
        let before = self.jobs.len();
        self.jobs.retain(|j| j.id != id);
        self.jobs.len() != before
    }

    /// Replaces the text of the job with `id` as-is (no trimming).
    pub fn update_text(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.jobs.iter_mut().find(|j| j.id == id) {
            Some(job) => {
                job.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&JobInput> {
        self.jobs.iter().find(|j| j.id == id)
    }

    pub fn jobs(&self) -> &[JobInput] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn eligible_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_eligible()).count()
    }
}
