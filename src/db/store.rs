use async_trait::async_trait;

use crate::db::models::{ApplicationRow, JobFilter, JobRow, NewJob, SavedJobRow, UserRow};

/// Persistence errors surfaced to the service layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("duplicate record: {0}")]
    UniqueViolation(String),

    /// A foreign key pointed at a row that does not exist
    #[error("missing referenced record: {0}")]
    MissingReference(String),

    /// Any other database failure
    #[error("{0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(
                    db_err.constraint().unwrap_or("unique constraint").to_string(),
                )
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::MissingReference(
                    db_err.constraint().unwrap_or("foreign key").to_string(),
                )
            }
            _ => StoreError::Database(err),
        }
    }
}

/// Storage operations over users, jobs, applications and saved jobs.
///
/// Every method touches a single record type. Associations are expanded by
/// callers through additional lookups.
#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by readiness probes
    async fn ping(&self) -> Result<(), StoreError>;

    /// Release pooled resources on shutdown
    async fn close(&self) {}

    async fn find_user(&self, id: i32) -> Result<Option<UserRow>, StoreError>;

    async fn create_job(&self, company_id: i32, job: &NewJob) -> Result<JobRow, StoreError>;
    async fn find_job(&self, id: i32) -> Result<Option<JobRow>, StoreError>;
    async fn list_open_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRow>, StoreError>;
    async fn jobs_by_company(&self, company_id: i32) -> Result<Vec<JobRow>, StoreError>;
    /// Persist every mutable column of `job` and return the stored row
    async fn update_job(&self, job: &JobRow) -> Result<Option<JobRow>, StoreError>;
    async fn delete_job(&self, id: i32) -> Result<bool, StoreError>;

    async fn create_application(
        &self,
        job_id: i32,
        applicant_id: i32,
        resume: Option<&str>,
        status: &str,
    ) -> Result<ApplicationRow, StoreError>;
    async fn find_application(&self, id: i32) -> Result<Option<ApplicationRow>, StoreError>;
    async fn find_application_for(
        &self,
        job_id: i32,
        applicant_id: i32,
    ) -> Result<Option<ApplicationRow>, StoreError>;
    /// Newest first
    async fn applications_by_applicant(
        &self,
        applicant_id: i32,
    ) -> Result<Vec<ApplicationRow>, StoreError>;
    async fn applications_for_job(&self, job_id: i32) -> Result<Vec<ApplicationRow>, StoreError>;
    async fn count_applications_for_job(&self, job_id: i32) -> Result<i64, StoreError>;
    async fn update_application_status(
        &self,
        id: i32,
        status: &str,
    ) -> Result<Option<ApplicationRow>, StoreError>;
    async fn delete_application(&self, id: i32) -> Result<bool, StoreError>;

    async fn create_saved_job(
        &self,
        job_id: i32,
        jobseeker_id: i32,
    ) -> Result<SavedJobRow, StoreError>;
    async fn find_saved_job(
        &self,
        job_id: i32,
        jobseeker_id: i32,
    ) -> Result<Option<SavedJobRow>, StoreError>;
    /// Newest first
    async fn saved_jobs_by_jobseeker(
        &self,
        jobseeker_id: i32,
    ) -> Result<Vec<SavedJobRow>, StoreError>;
    async fn delete_saved_job(&self, id: i32) -> Result<bool, StoreError>;
}
