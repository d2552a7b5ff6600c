use serde::Serialize;

use crate::db::models::{ApplicationRow, JobRow, UserRow};

/// Job fields shown alongside an application
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub company_id: i32,
    pub location: String,
    pub category: String,
    #[serde(rename = "type")]
    pub job_type: String,
}

impl From<JobRow> for JobSummary {
    fn from(job: JobRow) -> Self {
        Self {
            id: job.id,
            title: job.title,
            company_id: job.company_id,
            location: job.location,
            category: job.category,
            job_type: job.job_type,
        }
    }
}

/// Applicant fields shown to the employer
#[derive(Debug, Clone, Serialize)]
pub struct ApplicantProfile {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub resume: Option<String>,
}

impl From<UserRow> for ApplicantProfile {
    fn from(user: UserRow) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar: user.avatar,
            resume: user.resume,
        }
    }
}

/// Application with its job and, where visible, its applicant expanded.
/// A `job` of `None` means the job has since been deleted.
#[derive(Debug, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: ApplicationRow,
    pub job: Option<JobSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantProfile>,
}

/// Response of a status change
#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    pub message: String,
    pub status: String,
}
