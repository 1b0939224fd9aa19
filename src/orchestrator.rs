use chrono::NaiveDate;
use serde::Serialize;
use tracing::Instrument;

use crate::error::RunnerError;
use crate::gdocs::Publisher;
use crate::notion::TaskQueue;
use crate::openai::ContentGenerator;
use crate::prompt::build_prompt;
use crate::state_machine::{Job, JobStatus, StateMachine, StatusUpdate, decide};

const START_NOTE: &str = "Agent started.";

/// What happened to one job during a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub job_id: String,
    pub name: String,
    pub status: JobStatus,
    pub confidence: f64,
    pub gate: f64,
    pub proof_url: String,
}

/// Outcome of a whole pass over the queue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub reports: Vec<JobReport>,
}

impl RunSummary {
    pub fn count(&self, status: JobStatus) -> usize {
        self.reports.iter().filter(|r| r.status == status).count()
    }
}

/// Drives due jobs through Queued → Running → {Done | NeedsReview}.
pub struct JobOrchestrator<Q, M, P> {
    queue: Q,
    generator: M,
    publisher: P,
    default_gate: f64,
}

fn terminal_note(gate: f64, confidence: f64) -> String {
    format!("Output posted. Gate={gate:.2}, Conf={confidence:.2}")
}

impl<Q, M, P> JobOrchestrator<Q, M, P>
where
    Q: TaskQueue,
    M: ContentGenerator,
    P: Publisher,
{
    pub fn new(queue: Q, generator: M, publisher: P, default_gate: f64) -> Self {
        Self {
            queue,
            generator,
            publisher,
            default_gate,
        }
    }

    /// Process every due job once, in listing order.
    ///
    /// Only queue failures abort the run; a job already marked `Running`
    /// when that happens stays `Running`.
    pub async fn run(&self, today: NaiveDate) -> Result<RunSummary, RunnerError> {
        let jobs = self.queue.list_due(today).await?;
        tracing::info!(count = jobs.len(), %today, "found queued jobs");

        let mut summary = RunSummary::default();
        for job in jobs {
            let report = self.run_job(job).await?;
            summary.reports.push(report);
        }
        Ok(summary)
    }

    /// Run one job through its full lifecycle.
    pub async fn run_job(&self, job: Job) -> Result<JobReport, RunnerError> {
        let span = tracing::info_span!("job", job_id = %job.id, name = %job.name);
        self.process(job).instrument(span).await
    }

    async fn process(&self, mut job: Job) -> Result<JobReport, RunnerError> {
        // RUNNING: must be recorded before any side effect.
        StateMachine::advance(&mut job, JobStatus::Running)?;
        tracing::info!(agent = job.agent_type.as_deref().unwrap_or("General"), "running");
        self.queue
            .update_status(&job.id, &StatusUpdate::new(JobStatus::Running).with_note(START_NOTE))
            .await?;

        // GENERATE
        let prompt = build_prompt(&job);
        let result = self.generator.generate(&prompt).await;
        tracing::debug!(title = ?result.title, chars = result.text.len(), "model returned");
        let text = result.text.trim();
        let confidence = result.confidence;

        // PUBLISH
        let body = if text.is_empty() {
            format!("(empty output for {})", job.name)
        } else {
            text.to_string()
        };
        let proof = self.publisher.publish(&job.name, &body).await;
        if proof.is_placeholder() {
            tracing::debug!(proof_url = %proof.url, "proof is a placeholder link");
        }

        // RESOLVE
        let gate = job.gate_or(self.default_gate);
        let status = decide(job.publish_mode, confidence, gate);
        StateMachine::advance(&mut job, status)?;
        let update = StatusUpdate::new(status)
            .with_proof(&proof)
            .with_confidence(confidence)
            .with_note(&terminal_note(gate, confidence));
        self.queue.update_status(&job.id, &update).await?;

        tracing::info!(%status, confidence, proof_url = %proof.url, "completed");
        Ok(JobReport {
            job_id: job.id,
            name: job.name,
            status,
            confidence,
            gate,
            proof_url: proof.url,
        })
    }
}
