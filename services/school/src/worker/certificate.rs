use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::domain::repository::{
    CertificateJobRepository, CertificateRenderer, EnrollmentRepository, Mailer,
};
use crate::domain::types::{CertificateData, CertificateJob, CertificatePayload, CertificateRow};
use crate::error::SchoolServiceError;
use crate::usecase::certificate::certificate_path;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const CLAIM_BATCH: u64 = 10;
const MAX_ATTEMPTS: i32 = 5;

/// A failure while processing one job. Permanent failures park the job
/// immediately; transient ones are retried with backoff until `MAX_ATTEMPTS`.
enum JobError {
    Permanent(String),
    Transient(String),
}

fn transient(err: SchoolServiceError) -> JobError {
    JobError::Transient(err.to_string())
}

/// Delay before the next attempt, doubling per failure from a 30s base.
fn backoff(attempts: i32) -> chrono::Duration {
    chrono::Duration::seconds(30 * 2_i64.pow(attempts.clamp(0, 10) as u32))
}

/// Polls the certificate job queue, renders the PDF and mails it. Delivery is
/// at-least-once: a crash between send and `mark_processed` re-sends on the
/// next claim, which is harmless because rendering overwrites in place.
pub struct CertificateWorker<J, E, R, M>
where
    J: CertificateJobRepository,
    E: EnrollmentRepository,
    R: CertificateRenderer,
    M: Mailer,
{
    pub jobs: J,
    pub enrollments: E,
    pub renderer: R,
    pub mailer: M,
    pub certificates_dir: PathBuf,
}

impl<J, E, R, M> CertificateWorker<J, E, R, M>
where
    J: CertificateJobRepository,
    E: EnrollmentRepository,
    R: CertificateRenderer,
    M: Mailer,
{
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        loop {
            ticker.tick().await;
            if let Err(err) = self.tick().await {
                error!("certificate worker tick failed: {err}");
            }
        }
    }

    /// One poll cycle: claim due jobs and settle each one.
    pub async fn tick(&self) -> Result<(), SchoolServiceError> {
        let due = self.jobs.claim_due(Utc::now(), CLAIM_BATCH).await?;
        for job in due {
            self.settle(&job).await?;
        }
        Ok(())
    }

    async fn settle(&self, job: &CertificateJob) -> Result<(), SchoolServiceError> {
        match self.process(job).await {
            Ok(()) => {
                info!(job_id = %job.id, "certificate delivered");
                self.jobs.mark_processed(job.id, Utc::now()).await
            }
            Err(JobError::Permanent(reason)) => {
                warn!(job_id = %job.id, %reason, "certificate job failed permanently");
                self.jobs.mark_failed(job.id, &reason, Utc::now()).await
            }
            Err(JobError::Transient(reason)) => {
                let attempts = job.attempts + 1;
                if attempts >= MAX_ATTEMPTS {
                    warn!(job_id = %job.id, %reason, "certificate job out of attempts");
                    self.jobs.mark_failed(job.id, &reason, Utc::now()).await
                } else {
                    warn!(job_id = %job.id, %reason, attempts, "certificate job will retry");
                    let next = Utc::now() + backoff(attempts);
                    self.jobs.record_retry(job.id, attempts, &reason, next).await
                }
            }
        }
    }

    /// Render and send one certificate. Marks are re-checked here because a
    /// teacher may have enrolled the student in something new between request
    /// and processing.
    async fn process(&self, job: &CertificateJob) -> Result<(), JobError> {
        let payload: CertificatePayload = serde_json::from_value(job.payload.clone())
            .map_err(|err| JobError::Permanent(format!("malformed payload: {err}")))?;

        let marks = self
            .enrollments
            .list_student_marks(payload.student_id)
            .await
            .map_err(transient)?;
        if marks.is_empty() {
            return Err(JobError::Permanent("student has no enrollments".into()));
        }
        let mut rows = Vec::with_capacity(marks.len());
        for mark in marks {
            match mark.mark {
                Some(value) => rows.push(CertificateRow {
                    subject_code: mark.subject_code,
                    subject_name: mark.subject_name,
                    mark: value,
                }),
                None => return Err(JobError::Permanent("marks incomplete".into())),
            }
        }

        let certificate = CertificateData {
            username: payload.username.clone(),
            issued_on: Utc::now().date_naive(),
            rows,
        };
        let path = certificate_path(&self.certificates_dir, &payload.username);
        self.renderer
            .render(&certificate, &path)
            .await
            .map_err(transient)?;
        self.mailer
            .send_certificate(&payload.email, &payload.username, &payload.base_url, &path)
            .await
            .map_err(transient)?;
        Ok(())
    }
}
