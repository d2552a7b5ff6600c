use std::sync::Arc;

use tracing::info;

use crate::api::application::dto::JobSummary;
use crate::api::dto::MessageResponse;
use crate::api::error::ServiceError;
use crate::auth::{Identity, Role};
use crate::db::models::SavedJobRow;
use crate::db::{Store, StoreError};
use super::dto::SavedJobView;

const ALREADY_SAVED: &str = "Job already saved";

/// Job seekers' bookmarks
pub struct SavedJobService {
    store: Arc<dyn Store>,
}

impl SavedJobService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Bookmark an existing job; one entry per (job, job seeker)
    pub async fn save(&self, identity: &Identity, job_id: i32) -> Result<SavedJobRow, ServiceError> {
        identity.require(Role::Jobseeker, "Only job seekers can save jobs")?;

        let job = self
            .store
            .find_job(job_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Job not found".to_string()))?;

        if self.store.find_saved_job(job.id, identity.user_id).await?.is_some() {
            return Err(ServiceError::Conflict(ALREADY_SAVED.to_string()));
        }

        let saved = self
            .store
            .create_saved_job(job.id, identity.user_id)
            .await
            .map_err(|err| match err {
                StoreError::UniqueViolation(_) => ServiceError::Conflict(ALREADY_SAVED.to_string()),
                other => ServiceError::from(other),
            })?;

        info!("Service: Job {} saved by {}", job.id, identity.user_id);
        Ok(saved)
    }

    pub async fn unsave(&self, identity: &Identity, job_id: i32) -> Result<MessageResponse, ServiceError> {
        let saved = self
            .store
            .find_saved_job(job_id, identity.user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Job not found in saved list".to_string()))?;

        self.store.delete_saved_job(saved.id).await?;
        info!("Service: Job {} unsaved by {}", job_id, identity.user_id);
        Ok(MessageResponse::new("Job removed from saved list"))
    }

    /// The requester's saved jobs, newest first
    pub async fn my_saved_jobs(&self, identity: &Identity) -> Result<Vec<SavedJobView>, ServiceError> {
        let saved_jobs = self.store.saved_jobs_by_jobseeker(identity.user_id).await?;

        let mut views = Vec::with_capacity(saved_jobs.len());
        for saved in saved_jobs {
            let job = self.store.find_job(saved.job_id).await?.map(JobSummary::from);
            views.push(SavedJobView { saved, job });
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::NewJob;
    use crate::db::memory::LaggingLookups;
    use crate::db::MemoryStore;

    const SEEKER: Identity = Identity { user_id: 3, role: Role::Jobseeker };
    const EMPLOYER: Identity = Identity { user_id: 1, role: Role::Employer };

    async fn setup() -> (Arc<MemoryStore>, SavedJobService, i32) {
        let store = Arc::new(MemoryStore::new());
        let job = store
            .create_job(
                EMPLOYER.user_id,
                &NewJob {
                    title: "Data Engineer".to_string(),
                    ..NewJob::default()
                },
            )
            .await
            .unwrap();
        (store.clone(), SavedJobService::new(store), job.id)
    }

    #[tokio::test]
    async fn saving_twice_is_a_conflict() {
        let (_, service, job_id) = setup().await;
        service.save(&SEEKER, job_id).await.unwrap();

        let err = service.save(&SEEKER, job_id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn concurrent_duplicate_save_is_a_conflict() {
        let (store, _, job_id) = setup().await;
        let service = SavedJobService::new(Arc::new(LaggingLookups(store.clone())));
        service.save(&SEEKER, job_id).await.unwrap();

        let err = service.save(&SEEKER, job_id).await.unwrap_err();
        assert!(
            matches!(&err, ServiceError::Conflict(msg) if msg == ALREADY_SAVED),
            "{err:?}"
        );
        assert_eq!(store.saved_jobs_by_jobseeker(SEEKER.user_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn employers_cannot_save_and_missing_jobs_are_not_found() {
        let (_, service, job_id) = setup().await;
        assert!(matches!(service.save(&EMPLOYER, job_id).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(service.save(&SEEKER, 9999).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn unsave_removes_entry_once() {
        let (store, service, job_id) = setup().await;
        service.save(&SEEKER, job_id).await.unwrap();

        let listed = service.my_saved_jobs(&SEEKER).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].job.as_ref().map(|job| job.title.as_str()), Some("Data Engineer"));

        service.unsave(&SEEKER, job_id).await.unwrap();
        assert!(store.find_saved_job(job_id, SEEKER.user_id).await.unwrap().is_none());
        assert!(matches!(service.unsave(&SEEKER, job_id).await, Err(ServiceError::NotFound(_))));
    }
}
