use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};

use crate::db::models::{ApplicationRow, JobFilter, JobRow, NewJob, SavedJobRow, UserRow};
use crate::db::store::{Store, StoreError};

#[derive(Default)]
struct Tables {
    users: Vec<UserRow>,
    jobs: Vec<JobRow>,
    applications: Vec<ApplicationRow>,
    saved_jobs: Vec<SavedJobRow>,
    next_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process store used by tests.
///
/// Uniqueness checks and inserts run under a single lock, mirroring the
/// constraints declared in the SQL migrations.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user profile. Users are otherwise provisioned outside this service.
    pub fn insert_user(&self, user: UserRow) {
        let mut tables = self.lock();
        tables.next_id = tables.next_id.max(user.id);
        tables.users.retain(|existing| existing.id != user.id);
        tables.users.push(user);
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Newest first, ids break ties between rows created within the same tick
fn newest_first<T: Clone>(rows: impl Iterator<Item = T>, key: impl Fn(&T) -> (NaiveDateTime, i32)) -> Vec<T> {
    let mut rows: Vec<T> = rows.collect();
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
    rows
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user(&self, id: i32) -> Result<Option<UserRow>, StoreError> {
        Ok(self.lock().users.iter().find(|user| user.id == id).cloned())
    }

    async fn create_job(&self, company_id: i32, job: &NewJob) -> Result<JobRow, StoreError> {
        let mut tables = self.lock();
        let timestamp = now();
        let row = JobRow {
            id: tables.next_id(),
            company_id,
            title: job.title.clone(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            location: job.location.clone(),
            category: job.category.clone(),
            job_type: job.job_type.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            is_closed: false,
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.jobs.push(row.clone());
        Ok(row)
    }

    async fn find_job(&self, id: i32) -> Result<Option<JobRow>, StoreError> {
        Ok(self.lock().jobs.iter().find(|job| job.id == id).cloned())
    }

    async fn list_open_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRow>, StoreError> {
        let tables = self.lock();
        Ok(newest_first(
            tables.jobs.iter().filter(|job| filter.matches(job)).cloned(),
            |job| (job.created_at, job.id),
        ))
    }

    async fn jobs_by_company(&self, company_id: i32) -> Result<Vec<JobRow>, StoreError> {
        let tables = self.lock();
        Ok(newest_first(
            tables
                .jobs
                .iter()
                .filter(|job| job.company_id == company_id)
                .cloned(),
            |job| (job.created_at, job.id),
        ))
    }

    async fn update_job(&self, job: &JobRow) -> Result<Option<JobRow>, StoreError> {
        let mut tables = self.lock();
        let Some(stored) = tables.jobs.iter_mut().find(|stored| stored.id == job.id) else {
            return Ok(None);
        };
        *stored = JobRow {
            company_id: stored.company_id,
            created_at: stored.created_at,
            updated_at: now(),
            ..job.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_job(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let before = tables.jobs.len();
        tables.jobs.retain(|job| job.id != id);
        Ok(tables.jobs.len() < before)
    }

    async fn create_application(
        &self,
        job_id: i32,
        applicant_id: i32,
        resume: Option<&str>,
        status: &str,
    ) -> Result<ApplicationRow, StoreError> {
        let mut tables = self.lock();
        if tables
            .applications
            .iter()
            .any(|app| app.job_id == job_id && app.applicant_id == applicant_id)
        {
            return Err(StoreError::UniqueViolation(
                "applications_job_applicant_key".to_string(),
            ));
        }
        let timestamp = now();
        let row = ApplicationRow {
            id: tables.next_id(),
            job_id,
            applicant_id,
            resume: resume.map(str::to_string),
            status: status.to_string(),
            created_at: timestamp,
            updated_at: timestamp,
        };
        tables.applications.push(row.clone());
        Ok(row)
    }

    async fn find_application(&self, id: i32) -> Result<Option<ApplicationRow>, StoreError> {
        Ok(self.lock().applications.iter().find(|app| app.id == id).cloned())
    }

    async fn find_application_for(
        &self,
        job_id: i32,
        applicant_id: i32,
    ) -> Result<Option<ApplicationRow>, StoreError> {
        Ok(self
            .lock()
            .applications
            .iter()
            .find(|app| app.job_id == job_id && app.applicant_id == applicant_id)
            .cloned())
    }

    async fn applications_by_applicant(
        &self,
        applicant_id: i32,
    ) -> Result<Vec<ApplicationRow>, StoreError> {
        let tables = self.lock();
        Ok(newest_first(
            tables
                .applications
                .iter()
                .filter(|app| app.applicant_id == applicant_id)
                .cloned(),
            |app| (app.created_at, app.id),
        ))
    }

    async fn applications_for_job(&self, job_id: i32) -> Result<Vec<ApplicationRow>, StoreError> {
        Ok(self
            .lock()
            .applications
            .iter()
            .filter(|app| app.job_id == job_id)
            .cloned()
            .collect())
    }

    async fn count_applications_for_job(&self, job_id: i32) -> Result<i64, StoreError> {
        let count = self
            .lock()
            .applications
            .iter()
            .filter(|app| app.job_id == job_id)
            .count();
        Ok(count as i64)
    }

    async fn update_application_status(
        &self,
        id: i32,
        status: &str,
    ) -> Result<Option<ApplicationRow>, StoreError> {
        let mut tables = self.lock();
        let Some(app) = tables.applications.iter_mut().find(|app| app.id == id) else {
            return Ok(None);
        };
        app.status = status.to_string();
        app.updated_at = now();
        Ok(Some(app.clone()))
    }

    async fn delete_application(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let before = tables.applications.len();
        tables.applications.retain(|app| app.id != id);
        Ok(tables.applications.len() < before)
    }

    async fn create_saved_job(
        &self,
        job_id: i32,
        jobseeker_id: i32,
    ) -> Result<SavedJobRow, StoreError> {
        let mut tables = self.lock();
        if tables
            .saved_jobs
            .iter()
            .any(|saved| saved.job_id == job_id && saved.jobseeker_id == jobseeker_id)
        {
            return Err(StoreError::UniqueViolation(
                "saved_jobs_job_jobseeker_key".to_string(),
            ));
        }
        let row = SavedJobRow {
            id: tables.next_id(),
            job_id,
            jobseeker_id,
            created_at: now(),
        };
        tables.saved_jobs.push(row.clone());
        Ok(row)
    }

    async fn find_saved_job(
        &self,
        job_id: i32,
        jobseeker_id: i32,
    ) -> Result<Option<SavedJobRow>, StoreError> {
        Ok(self
            .lock()
            .saved_jobs
            .iter()
            .find(|saved| saved.job_id == job_id && saved.jobseeker_id == jobseeker_id)
            .cloned())
    }

    async fn saved_jobs_by_jobseeker(
        &self,
        jobseeker_id: i32,
    ) -> Result<Vec<SavedJobRow>, StoreError> {
        let tables = self.lock();
        Ok(newest_first(
            tables
                .saved_jobs
                .iter()
                .filter(|saved| saved.jobseeker_id == jobseeker_id)
                .cloned(),
            |saved| (saved.created_at, saved.id),
        ))
    }

    async fn delete_saved_job(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.lock();
        let before = tables.saved_jobs.len();
        tables.saved_jobs.retain(|saved| saved.id != id);
        Ok(tables.saved_jobs.len() < before)
    }
}

/// Store whose duplicate lookups never see existing rows, as when a
/// concurrent request inserts between the check and the write.
#[cfg(test)]
pub(crate) struct LaggingLookups(pub std::sync::Arc<MemoryStore>);

#[cfg(test)]
#[async_trait]
impl Store for LaggingLookups {
    async fn ping(&self) -> Result<(), StoreError> {
        self.0.ping().await
    }

    async fn find_user(&self, id: i32) -> Result<Option<UserRow>, StoreError> {
        self.0.find_user(id).await
    }

    async fn create_job(&self, company_id: i32, job: &NewJob) -> Result<JobRow, StoreError> {
        self.0.create_job(company_id, job).await
    }

    async fn find_job(&self, id: i32) -> Result<Option<JobRow>, StoreError> {
        self.0.find_job(id).await
    }

    async fn list_open_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRow>, StoreError> {
        self.0.list_open_jobs(filter).await
    }

    async fn jobs_by_company(&self, company_id: i32) -> Result<Vec<JobRow>, StoreError> {
        self.0.jobs_by_company(company_id).await
    }

    async fn update_job(&self, job: &JobRow) -> Result<Option<JobRow>, StoreError> {
        self.0.update_job(job).await
    }

    async fn delete_job(&self, id: i32) -> Result<bool, StoreError> {
        self.0.delete_job(id).await
    }

    async fn create_application(
        &self,
        job_id: i32,
        applicant_id: i32,
        resume: Option<&str>,
        status: &str,
    ) -> Result<ApplicationRow, StoreError> {
        self.0.create_application(job_id, applicant_id, resume, status).await
    }

    async fn find_application(&self, id: i32) -> Result<Option<ApplicationRow>, StoreError> {
        self.0.find_application(id).await
    }

    async fn find_application_for(
        &self,
        _job_id: i32,
        _applicant_id: i32,
    ) -> Result<Option<ApplicationRow>, StoreError> {
        Ok(None)
    }

    async fn applications_by_applicant(
        &self,
        applicant_id: i32,
    ) -> Result<Vec<ApplicationRow>, StoreError> {
        self.0.applications_by_applicant(applicant_id).await
    }

    async fn applications_for_job(&self, job_id: i32) -> Result<Vec<ApplicationRow>, StoreError> {
        self.0.applications_for_job(job_id).await
    }

    async fn count_applications_for_job(&self, job_id: i32) -> Result<i64, StoreError> {
        self.0.count_applications_for_job(job_id).await
    }

    async fn update_application_status(
        &self,
        id: i32,
        status: &str,
    ) -> Result<Option<ApplicationRow>, StoreError> {
        self.0.update_application_status(id, status).await
    }

    async fn delete_application(&self, id: i32) -> Result<bool, StoreError> {
        self.0.delete_application(id).await
    }

    async fn create_saved_job(
        &self,
        job_id: i32,
        jobseeker_id: i32,
    ) -> Result<SavedJobRow, StoreError> {
        self.0.create_saved_job(job_id, jobseeker_id).await
    }

    async fn find_saved_job(
        &self,
        _job_id: i32,
        _jobseeker_id: i32,
    ) -> Result<Option<SavedJobRow>, StoreError> {
        Ok(None)
    }

    async fn saved_jobs_by_jobseeker(
        &self,
        jobseeker_id: i32,
    ) -> Result<Vec<SavedJobRow>, StoreError> {
        self.0.saved_jobs_by_jobseeker(jobseeker_id).await
    }

    async fn delete_saved_job(&self, id: i32) -> Result<bool, StoreError> {
        self.0.delete_saved_job(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(title: &str, location: &str, salary: (Option<i32>, Option<i32>)) -> NewJob {
        NewJob {
            title: title.to_string(),
            location: location.to_string(),
            category: "Engineering".to_string(),
            job_type: "Full-Time".to_string(),
            salary_min: salary.0,
            salary_max: salary.1,
            ..NewJob::default()
        }
    }

    #[tokio::test]
    async fn duplicate_application_violates_uniqueness() {
        let store = MemoryStore::new();
        store.create_application(1, 2, None, "Applied").await.unwrap();

        let err = store
            .create_application(1, 2, None, "Applied")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::UniqueViolation(_)));

        // a different job for the same applicant is fine
        store.create_application(3, 2, None, "Applied").await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_saved_job_violates_uniqueness() {
        let store = MemoryStore::new();
        store.create_saved_job(1, 2).await.unwrap();
        assert!(matches!(
            store.create_saved_job(1, 2).await,
            Err(StoreError::UniqueViolation(_))
        ));
    }

    #[tokio::test]
    async fn list_open_jobs_applies_filter_and_skips_closed() {
        let store = MemoryStore::new();
        let rust = store
            .create_job(1, &job("Senior Rust Engineer", "Berlin", (Some(70_000), Some(90_000))))
            .await
            .unwrap();
        let closed = store
            .create_job(1, &job("Rust Intern", "Berlin", (Some(20_000), Some(30_000))))
            .await
            .unwrap();
        store
            .create_job(1, &job("Designer", "Remote", (None, None)))
            .await
            .unwrap();
        store
            .update_job(&JobRow { is_closed: true, ..closed })
            .await
            .unwrap();

        let filter = JobFilter {
            keyword: Some("rust".to_string()),
            ..JobFilter::default()
        };
        let jobs = store.list_open_jobs(&filter).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, rust.id);

        let filter = JobFilter {
            min_salary: Some(80_000),
            max_salary: Some(75_000),
            ..JobFilter::default()
        };
        let jobs = store.list_open_jobs(&filter).await.unwrap();
        assert_eq!(jobs.iter().map(|job| job.id).collect::<Vec<_>>(), vec![rust.id]);

        let all = store.list_open_jobs(&JobFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn update_job_keeps_owner_and_creation_time() {
        let store = MemoryStore::new();
        let created = store.create_job(7, &job("Ops", "Oslo", (None, None))).await.unwrap();

        let updated = store
            .update_job(&JobRow {
                company_id: 99,
                title: "Platform Ops".to_string(),
                ..created.clone()
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.title, "Platform Ops");
        assert_eq!(updated.company_id, 7);
        assert_eq!(updated.created_at, created.created_at);
    }
}
