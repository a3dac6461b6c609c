//! Batch Orchestrator — fans out one optimization per eligible job and merges
//! each completion into the session's result map as it settles.
//!
//! Flow: begin (validate → init all Loading → focus first job) →
//!       run (dispatch all jobs at once → keyed merge per completion → all-settled join
//!       → clear in-progress).
//!
//! `begin` is synchronous, so the all-Loading snapshot is published before any
//! call is dispatched. Failures are converted to per-job `Error` entries and never
//! reach the join.

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::job::{JobInput, JobResult, ResultMap};
use crate::models::resume::UploadedFile;
use crate::optimization::Optimizer;
use crate::session::store::SessionStore;

/// Why a batch did not start. None of these change session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchDecline {
    MissingResume,
    NoEligibleJobs,
    AlreadyRunning,
}

/// A batch that has been initialized in the store but not yet dispatched.
#[derive(Debug)]
pub struct BatchTicket {
    pub batch_id: Uuid,
    resume: UploadedFile,
    jobs: Vec<JobInput>,
}

impl BatchTicket {
    pub fn job_ids(&self) -> Vec<String> {
        self.jobs.iter().map(|j| j.id.clone()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobOutcome {
    Succeeded,
    Failed,
    /// Settled after its batch was reset or replaced.
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub batch_id: Uuid,
    pub succeeded: usize,
    pub failed: usize,
    pub discarded: usize,
}

#[derive(Clone)]
pub struct BatchOrchestrator {
    store: SessionStore,
    optimizer: Arc<dyn Optimizer>,
}

impl BatchOrchestrator {
    pub fn new(store: SessionStore, optimizer: Arc<dyn Optimizer>) -> Self {
        Self { store, optimizer }
    }

    /// Runs a full batch and returns once every job has settled.
    pub async fn run_batch(
        &self,
        resume: Option<&UploadedFile>,
        jobs: &[JobInput],
    ) -> Result<BatchSummary, BatchDecline> {
        let ticket = self.begin(resume, jobs)?;
        Ok(self.run(ticket).await)
    }

    /// Runs a batch over the store's current resume and job inputs.
    pub async fn run_current_batch(&self) -> Result<BatchSummary, BatchDecline> {
        let snapshot = self.store.snapshot();
        self.run_batch(snapshot.resume.as_ref(), snapshot.jobs.jobs())
            .await
    }

    /// Validates preconditions and publishes the all-Loading result map in one update.
    pub fn begin(
        &self,
        resume: Option<&UploadedFile>,
        jobs: &[JobInput],
    ) -> Result<BatchTicket, BatchDecline> {
        let resume = resume.ok_or(BatchDecline::MissingResume)?;

        let eligible: Vec<JobInput> = jobs.iter().filter(|j| j.is_eligible()).cloned().collect();
        let Some(first) = eligible.first() else {
            return Err(BatchDecline::NoEligibleJobs);
        };

        let batch_id = Uuid::new_v4();
        let first_id = first.id.clone();

        self.store.apply(|state| {
            if state.in_progress {
                return Err(BatchDecline::AlreadyRunning);
            }
            state.results = ResultMap::all_loading(eligible.iter().map(|j| j.id.as_str()));
            state.selected_job_id = Some(first_id);
            state.in_progress = true;
            state.batch_id = Some(batch_id);
            Ok(())
        })?;

        info!(
            "Batch {} started: {} eligible job(s), {} blank job(s) skipped",
            batch_id,
            eligible.len(),
            jobs.len() - eligible.len()
        );

        Ok(BatchTicket {
            batch_id,
            resume: resume.clone(),
            jobs: eligible,
        })
    }

    /// Dispatches every job of `ticket` concurrently and waits for all of them to settle.
    pub async fn run(&self, ticket: BatchTicket) -> BatchSummary {
        let BatchTicket {
            batch_id,
            resume,
            jobs,
        } = ticket;

        let outcomes = join_all(jobs.iter().map(|job| self.run_job(batch_id, &resume, job))).await;

        let count = |wanted: JobOutcome| outcomes.iter().filter(|o| **o == wanted).count();
        let summary = BatchSummary {
            batch_id,
            succeeded: count(JobOutcome::Succeeded),
            failed: count(JobOutcome::Failed),
            discarded: count(JobOutcome::Discarded),
        };

        self.store.apply(|state| {
            if state.batch_id == Some(batch_id) {
                state.in_progress = false;
            }
        });

        info!(
            "Batch {} settled: {} succeeded, {} failed, {} discarded",
            batch_id, summary.succeeded, summary.failed, summary.discarded
        );

        summary
    }

    async fn run_job(&self, batch_id: Uuid, resume: &UploadedFile, job: &JobInput) -> JobOutcome {
        debug!("Dispatching job {} of batch {}", job.id, batch_id);

        let outcome = self
            .optimizer
            .optimize(&resume.data, &resume.mime_type, &job.text)
            .await;

        match outcome {
            Ok(result) => {
                let unmatched = result.unmatched_quotes().len();
                if unmatched > 0 {
                    warn!(
                        "Job {}: {} change quote(s) not found verbatim in the tailored resume",
                        job.id, unmatched
                    );
                }
                if self.settle(batch_id, &job.id, |entry| entry.succeed(result)) {
                    info!("Job {} succeeded", job.id);
                    JobOutcome::Succeeded
                } else {
                    JobOutcome::Discarded
                }
            }
            Err(e) => {
                warn!("Job {} failed: {}", job.id, e);
                let message = e.to_string();
                if self.settle(batch_id, &job.id, |entry| entry.fail(message)) {
                    JobOutcome::Failed
                } else {
                    JobOutcome::Discarded
                }
            }
        }
    }

    /// Merges one job's terminal state into the latest result map, keyed by job id.
    fn settle(
        &self,
        batch_id: Uuid,
        job_id: &str,
        transition: impl FnOnce(&mut JobResult) -> bool,
    ) -> bool {
        let applied = self.store.apply(|state| {
            if state.batch_id != Some(batch_id) {
                return false;
            }
            state.results.apply(job_id, transition).unwrap_or(false)
        });
        if !applied {
            debug!("Dropped completion of job {} from stale batch {}", job_id, batch_id);
        }
        applied
    }

    /// Clears results, the in-progress flag and the focused job. Idempotent.
    pub fn reset_batch(&self) {
        self.store.apply(|state| {
            state.results.clear();
            state.in_progress = false;
            state.selected_job_id = None;
            state.batch_id = None;
        });
    }

    /// Focuses a job for display. Any id is accepted.
    pub fn select_job(&self, job_id: impl Into<String>) {
        let job_id = job_id.into();
        self.store.apply(|state| state.selected_job_id = Some(job_id));
    }
}
