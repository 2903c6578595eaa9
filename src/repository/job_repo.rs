// ==========================================
// GPL Cart - import job repository
// ==========================================

use crate::domain::{Job, JobStatus};
use crate::repository::database::{to_record, Database};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::query::{Conditions, QueryOptions};

const TABLE: &str = "job";

#[derive(Clone)]
pub struct JobRepository {
    db: Database,
}

impl JobRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn insert(&self, job: &Job) -> RepositoryResult<()> {
        self.db.insert(TABLE, &to_record(job)?)?;
        Ok(())
    }

    /// Persist every column of the job (checkpoint)
    pub fn save(&self, job: &Job) -> RepositoryResult<()> {
        let affected = self.db.update(
            TABLE,
            &to_record(job)?,
            &Conditions::new().eq("job_id", job.job_id.as_str()),
        )?;
        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "Job".to_string(),
                id: job.job_id.clone(),
            });
        }
        Ok(())
    }

    /// Checkpoint a job only while the stored row is still pending or running
    ///
    /// # Returns
    /// - false: the stored job was finished, failed or cancelled meanwhile
    pub fn save_active(&self, job: &Job) -> RepositoryResult<bool> {
        let affected = self.db.update(
            TABLE,
            &to_record(job)?,
            &Conditions::new()
                .eq("job_id", job.job_id.as_str())
                .in_list("status", [JobStatus::Pending, JobStatus::Running].map(|s| s.to_string())),
        )?;
        Ok(affected > 0)
    }

    pub fn find(&self, job_id: &str) -> RepositoryResult<Option<Job>> {
        self.db
            .with(|ex| ex.fetch_as(TABLE, &Conditions::new().eq("job_id", job_id)))
    }

    pub fn list_by_status(&self, status: JobStatus) -> RepositoryResult<Vec<Job>> {
        self.db.with(|ex| {
            ex.fetch_all_as(
                TABLE,
                &Conditions::new().eq("status", status.to_string()),
                &QueryOptions::new().order_by("created"),
            )
        })
    }
}
