use std::sync::Arc;

use tracing::{error, info, warn};

use crate::api::dto::MessageResponse;
use crate::api::error::ServiceError;
use crate::auth::{Identity, Role};
use crate::db::models::{ApplicationRow, JobRow, UserRow};
use crate::db::{Store, StoreError};
use crate::mail::{templates, Mailer, OutgoingMail};
use super::dto::{ApplicantProfile, ApplicationView, JobSummary, StatusUpdateResponse};
use super::models::INITIAL_STATUS;

const ALREADY_APPLIED: &str = "Already applied to this job";

/// Applications and the status notification workflow
pub struct ApplicationService {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    mail_from: String,
}

impl ApplicationService {
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>, mail_from: impl Into<String>) -> Self {
        Self {
            store,
            mailer,
            mail_from: mail_from.into(),
        }
    }

    /// Submit an application for `job_id`
    ///
    /// # Business Logic
    /// - Only job seekers may apply
    /// - The job must exist
    /// - One application per (job, applicant); the storage constraint catches
    ///   concurrent duplicates that pass the pre-check
    /// - The applicant's current resume is copied onto the application
    pub async fn apply(&self, identity: &Identity, job_id: i32) -> Result<ApplicationRow, ServiceError> {
        identity.require(Role::Jobseeker, "Only job seekers can apply")?;
        let job = self.find_job(job_id).await?;

        if self
            .store
            .find_application_for(job.id, identity.user_id)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(ALREADY_APPLIED.to_string()));
        }

        let resume = self
            .store
            .find_user(identity.user_id)
            .await?
            .and_then(|user| user.resume);

        let application = self
            .store
            .create_application(job.id, identity.user_id, resume.as_deref(), INITIAL_STATUS)
            .await
            .map_err(|err| match err {
                StoreError::UniqueViolation(_) => ServiceError::Conflict(ALREADY_APPLIED.to_string()),
                other => ServiceError::from(other),
            })?;

        info!(
            "Service: Application {} created for job={} applicant={}",
            application.id, job.id, identity.user_id
        );
        Ok(application)
    }

    /// The requester's applications, newest first
    pub async fn my_applications(&self, identity: &Identity) -> Result<Vec<ApplicationView>, ServiceError> {
        let applications = self.store.applications_by_applicant(identity.user_id).await?;

        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let job = self.store.find_job(application.job_id).await?.map(JobSummary::from);
            views.push(ApplicationView {
                application,
                job,
                applicant: None,
            });
        }
        Ok(views)
    }

    /// Every application for a job, visible to the job's owner only
    pub async fn applicants_for_job(
        &self,
        identity: &Identity,
        job_id: i32,
    ) -> Result<Vec<ApplicationView>, ServiceError> {
        let job = self.find_job(job_id).await?;
        if !identity.owns(job.company_id) {
            return Err(ServiceError::Forbidden("Not authorized to view applicants".to_string()));
        }

        let applications = self.store.applications_for_job(job.id).await?;
        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let applicant = self
                .store
                .find_user(application.applicant_id)
                .await?
                .map(ApplicantProfile::from);
            views.push(ApplicationView {
                application,
                job: Some(JobSummary::from(job.clone())),
                applicant,
            });
        }
        Ok(views)
    }

    /// One application, visible to its applicant and to the job's owner
    pub async fn get_application(&self, identity: &Identity, id: i32) -> Result<ApplicationView, ServiceError> {
        let application = self.find_application(id).await?;
        let job = self.store.find_job(application.job_id).await?;

        let is_applicant = identity.owns(application.applicant_id);
        let is_employer = job.as_ref().is_some_and(|job| identity.owns(job.company_id));
        if !is_applicant && !is_employer {
            return Err(ServiceError::Forbidden(
                "Not authorized to view this application".to_string(),
            ));
        }

        let applicant = self
            .store
            .find_user(application.applicant_id)
            .await?
            .map(ApplicantProfile::from);
        Ok(ApplicationView {
            application,
            job: job.map(JobSummary::from),
            applicant,
        })
    }

    /// Set an application's status and notify the applicant
    ///
    /// # Business Logic
    /// - Only the owner of the application's job may change its status
    /// - The new status is stored whatever its label; any status may follow any other
    /// - Recognized labels send a templated email to the applicant
    /// - Mail failures are logged and never change the response
    pub async fn update_status(
        &self,
        identity: &Identity,
        id: i32,
        status: String,
    ) -> Result<StatusUpdateResponse, ServiceError> {
        let application = self.find_application(id).await?;
        let job = self.find_job(application.job_id).await?;

        if !identity.owns(job.company_id) {
            return Err(ServiceError::Forbidden(
                "Not authorized to update this application".to_string(),
            ));
        }

        self.store
            .update_application_status(application.id, &status)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Application not found".to_string()))?;
        info!("Service: Application {} status set to {:?}", application.id, status);

        match self.store.find_user(application.applicant_id).await? {
            Some(applicant) => self.notify(&applicant, &job, &status).await,
            None => warn!(
                "Applicant {} of application {} not found, skipping notification",
                application.applicant_id, application.id
            ),
        }

        Ok(StatusUpdateResponse {
            message: "Application status updated and email sent (if possible)".to_string(),
            status,
        })
    }

    /// Withdraw an application owned by the requester
    pub async fn withdraw(&self, identity: &Identity, id: i32) -> Result<MessageResponse, ServiceError> {
        let application = self.find_application(id).await?;
        if !identity.owns(application.applicant_id) {
            return Err(ServiceError::Forbidden(
                "Not authorized to withdraw this application".to_string(),
            ));
        }

        self.store.delete_application(application.id).await?;
        info!("Service: Application {} withdrawn", application.id);
        Ok(MessageResponse::new("Application withdrawn"))
    }

    /// Best-effort status email
    async fn notify(&self, applicant: &UserRow, job: &JobRow, status: &str) {
        if applicant.email.trim().is_empty() {
            return;
        }
        let Some(email) = templates::resolve(&applicant.name, &job.title, status) else {
            info!("No notification template for status {:?}", status);
            return;
        };

        let mail = OutgoingMail {
            from: self.mail_from.clone(),
            to: applicant.email.clone(),
            html: email.html(),
            subject: email.subject,
            text: email.text,
        };
        match self.mailer.send_message(mail).await {
            Ok(delivery_id) => info!("Email sent: {}", delivery_id),
            Err(e) => error!("Failed to send email to {}: {}", applicant.email, e),
        }
    }

    async fn find_application(&self, id: i32) -> Result<ApplicationRow, ServiceError> {
        self.store
            .find_application(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Application not found".to_string()))
    }

    async fn find_job(&self, id: i32) -> Result<JobRow, ServiceError> {
        self.store
            .find_job(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Job not found".to_string()))
    }
}
