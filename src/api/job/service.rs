use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::info;

use crate::api::dto::MessageResponse;
use crate::api::error::ServiceError;
use crate::auth::{Identity, Role};
use crate::db::models::{JobFilter, JobRow};
use crate::db::Store;
use super::dto::{CompanySummary, EmployerJob, JobDetail, JobListing};
use super::models::{CreateJobInput, UpdateJobInput};

/// Job service containing business logic
pub struct JobService {
    store: Arc<dyn Store>,
}

impl JobService {
    /// Create a new JobService instance
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Post a job on behalf of an employer
    ///
    /// # Business Logic
    /// - Only employers may post
    /// - The requester becomes the job's owner
    /// - Salary range must not be inverted
    pub async fn create_job(
        &self,
        identity: &Identity,
        input: CreateJobInput,
    ) -> Result<JobRow, ServiceError> {
        identity.require(Role::Employer, "Only employers can post jobs")?;
        info!("Service: Creating job title={} for employer={}", input.title, identity.user_id);

        let job = self
            .store
            .create_job(identity.user_id, &input.into_new_job()?)
            .await?;

        info!("Service: Job created successfully with id={}", job.id);
        Ok(job)
    }

    /// Open jobs matching `filter`, annotated with `user_id`'s saved and
    /// application state when given
    pub async fn list_jobs(
        &self,
        filter: JobFilter,
        user_id: Option<i32>,
    ) -> Result<Vec<JobListing>, ServiceError> {
        let jobs = self.store.list_open_jobs(&filter).await?;

        let mut saved_job_ids = HashSet::new();
        let mut status_by_job = HashMap::new();
        if let Some(user_id) = user_id {
            for saved in self.store.saved_jobs_by_jobseeker(user_id).await? {
                saved_job_ids.insert(saved.job_id);
            }
            for application in self.store.applications_by_applicant(user_id).await? {
                status_by_job.insert(application.job_id, application.status);
            }
        }

        let companies = self.companies_for(&jobs).await?;
        Ok(jobs
            .into_iter()
            .map(|job| JobListing {
                company: companies.get(&job.company_id).cloned(),
                is_saved: saved_job_ids.contains(&job.id),
                application_status: status_by_job.remove(&job.id),
                job,
            })
            .collect())
    }

    /// The requesting employer's jobs with their application counts
    pub async fn employer_jobs(&self, identity: &Identity) -> Result<Vec<EmployerJob>, ServiceError> {
        identity.require(Role::Employer, "Access denied")?;

        let jobs = self.store.jobs_by_company(identity.user_id).await?;
        let companies = self.companies_for(&jobs).await?;

        let mut result = Vec::with_capacity(jobs.len());
        for job in jobs {
            let application_count = self.store.count_applications_for_job(job.id).await?;
            result.push(EmployerJob {
                company: companies.get(&job.company_id).cloned(),
                application_count,
                job,
            });
        }
        Ok(result)
    }

    /// Single job with its employer and `user_id`'s application status
    pub async fn get_job(&self, id: i32, user_id: Option<i32>) -> Result<JobDetail, ServiceError> {
        let job = self.find_job(id).await?;

        let application_status = match user_id {
            Some(user_id) => self
                .store
                .find_application_for(job.id, user_id)
                .await?
                .map(|application| application.status),
            None => None,
        };
        let company = self.store.find_user(job.company_id).await?.map(CompanySummary::from);

        Ok(JobDetail {
            job,
            company,
            application_status,
        })
    }

    /// Apply a partial update to a job owned by the requester
    pub async fn update_job(
        &self,
        identity: &Identity,
        id: i32,
        input: UpdateJobInput,
    ) -> Result<JobRow, ServiceError> {
        let job = self.owned_job(identity, id).await?;
        let job = input.apply_to(job)?;

        let updated = self
            .store
            .update_job(&job)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Job not found".to_string()))?;
        info!("Service: Job {} updated", id);
        Ok(updated)
    }

    /// Delete a job owned by the requester. Applications and saved entries
    /// that reference it are left in place.
    pub async fn delete_job(&self, identity: &Identity, id: i32) -> Result<MessageResponse, ServiceError> {
        self.owned_job(identity, id).await?;
        self.store.delete_job(id).await?;

        info!("Service: Job {} deleted", id);
        Ok(MessageResponse::new("Job deleted successfully"))
    }

    /// Flip the open/closed flag of a job owned by the requester
    pub async fn toggle_close(
        &self,
        identity: &Identity,
        id: i32,
    ) -> Result<MessageResponse, ServiceError> {
        let mut job = self.owned_job(identity, id).await?;
        job.is_closed = !job.is_closed;

        let job = self
            .store
            .update_job(&job)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Job not found".to_string()))?;

        let state = if job.is_closed { "closed" } else { "reopened" };
        info!("Service: Job {} {}", id, state);
        Ok(MessageResponse::new(format!("Job {}", state)))
    }

    async fn find_job(&self, id: i32) -> Result<JobRow, ServiceError> {
        self.store
            .find_job(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Job not found".to_string()))
    }

    async fn owned_job(&self, identity: &Identity, id: i32) -> Result<JobRow, ServiceError> {
        let job = self.find_job(id).await?;
        if !identity.owns(job.company_id) {
            return Err(ServiceError::Forbidden("Not authorized".to_string()));
        }
        Ok(job)
    }

    async fn companies_for(
        &self,
        jobs: &[JobRow],
    ) -> Result<HashMap<i32, CompanySummary>, ServiceError> {
        let mut companies = HashMap::new();
        for company_id in jobs.iter().map(|job| job.company_id) {
            if companies.contains_key(&company_id) {
                continue;
            }
            if let Some(user) = self.store.find_user(company_id).await? {
                companies.insert(company_id, CompanySummary::from(user));
            }
        }
        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::UserRow;
    use crate::db::MemoryStore;

    const EMPLOYER: Identity = Identity { user_id: 1, role: Role::Employer };
    const OTHER_EMPLOYER: Identity = Identity { user_id: 2, role: Role::Employer };
    const SEEKER: Identity = Identity { user_id: 3, role: Role::Jobseeker };

    fn setup() -> (Arc<MemoryStore>, JobService) {
        let store = Arc::new(MemoryStore::new());
        store.insert_user(UserRow {
            id: 1,
            name: "Erin".to_string(),
            email: "erin@acme.test".to_string(),
            role: "employer".to_string(),
            avatar: None,
            resume: None,
            company_name: Some("Acme".to_string()),
            company_logo: None,
        });
        let service = JobService::new(store.clone());
        (store, service)
    }

    fn input(title: &str) -> CreateJobInput {
        CreateJobInput {
            title: title.to_string(),
            description: "Build things".to_string(),
            requirements: String::new(),
            location: "Remote".to_string(),
            category: "Engineering".to_string(),
            job_type: "Full-Time".to_string(),
            salary_min: Some(60_000),
            salary_max: Some(80_000),
        }
    }

    #[tokio::test]
    async fn only_employers_post_jobs() {
        let (_, service) = setup();
        let err = service.create_job(&SEEKER, input("Engineer")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let job = service.create_job(&EMPLOYER, input("Engineer")).await.unwrap();
        assert_eq!(job.company_id, EMPLOYER.user_id);
        assert!(!job.is_closed);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_from_mutations() {
        let (store, service) = setup();
        let job = service.create_job(&EMPLOYER, input("Engineer")).await.unwrap();

        let update = service
            .update_job(&OTHER_EMPLOYER, job.id, UpdateJobInput::default())
            .await;
        assert!(matches!(update, Err(ServiceError::Forbidden(_))));
        assert!(matches!(
            service.delete_job(&OTHER_EMPLOYER, job.id).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(matches!(
            service.toggle_close(&OTHER_EMPLOYER, job.id).await,
            Err(ServiceError::Forbidden(_))
        ));

        assert_eq!(store.find_job(job.id).await.unwrap(), Some(job));
    }

    #[tokio::test]
    async fn missing_job_is_not_found() {
        let (_, service) = setup();
        assert!(matches!(
            service.delete_job(&EMPLOYER, 404).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(service.get_job(404, None).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn toggle_close_hides_job_from_listing() {
        let (_, service) = setup();
        let job = service.create_job(&EMPLOYER, input("Engineer")).await.unwrap();

        let closed = service.toggle_close(&EMPLOYER, job.id).await.unwrap();
        assert_eq!(closed.message, "Job closed");
        assert!(service.list_jobs(JobFilter::default(), None).await.unwrap().is_empty());

        let reopened = service.toggle_close(&EMPLOYER, job.id).await.unwrap();
        assert_eq!(reopened.message, "Job reopened");
        assert_eq!(service.list_jobs(JobFilter::default(), None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listing_marks_saved_and_applied_jobs() {
        let (store, service) = setup();
        let saved = service.create_job(&EMPLOYER, input("Saved")).await.unwrap();
        let applied = service.create_job(&EMPLOYER, input("Applied")).await.unwrap();
        service.create_job(&EMPLOYER, input("Untouched")).await.unwrap();

        store.create_saved_job(saved.id, SEEKER.user_id).await.unwrap();
        store
            .create_application(applied.id, SEEKER.user_id, None, "In Review")
            .await
            .unwrap();

        let listings = service
            .list_jobs(JobFilter::default(), Some(SEEKER.user_id))
            .await
            .unwrap();
        assert_eq!(listings.len(), 3);
        for listing in &listings {
            assert_eq!(listing.is_saved, listing.job.id == saved.id);
            let expected = (listing.job.id == applied.id).then(|| "In Review".to_string());
            assert_eq!(listing.application_status, expected);
            assert_eq!(
                listing.company.as_ref().and_then(|c| c.company_name.as_deref()),
                Some("Acme")
            );
        }
    }

    #[tokio::test]
    async fn employer_jobs_include_application_counts() {
        let (store, service) = setup();
        let job = service.create_job(&EMPLOYER, input("Engineer")).await.unwrap();
        service.create_job(&OTHER_EMPLOYER, input("Elsewhere")).await.unwrap();
        store.create_application(job.id, 10, None, "Applied").await.unwrap();
        store.create_application(job.id, 11, None, "Applied").await.unwrap();

        let jobs = service.employer_jobs(&EMPLOYER).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].application_count, 2);

        assert!(matches!(service.employer_jobs(&SEEKER).await, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn get_job_reports_application_status() {
        let (store, service) = setup();
        let job = service.create_job(&EMPLOYER, input("Engineer")).await.unwrap();
        store.create_application(job.id, SEEKER.user_id, None, "Accepted").await.unwrap();

        let detail = service.get_job(job.id, Some(SEEKER.user_id)).await.unwrap();
        assert_eq!(detail.application_status.as_deref(), Some("Accepted"));

        let anonymous = service.get_job(job.id, None).await.unwrap();
        assert_eq!(anonymous.application_status, None);
    }
}
