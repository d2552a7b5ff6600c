use serde::Serialize;

use crate::db::models::{JobRow, UserRow};

/// Public profile of the employer that posted a job
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: i32,
    pub name: String,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
}

impl From<UserRow> for CompanySummary {
    fn from(user: UserRow) -> Self {
        Self {
            id: user.id,
            name: user.name,
            company_name: user.company_name,
            company_logo: user.company_logo,
        }
    }
}

/// Entry of the public job listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    #[serde(flatten)]
    pub job: JobRow,
    pub company: Option<CompanySummary>,
    pub is_saved: bool,
    pub application_status: Option<String>,
}

/// Single job lookup
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobRow,
    pub company: Option<CompanySummary>,
    pub application_status: Option<String>,
}

/// Employer dashboard entry
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployerJob {
    #[serde(flatten)]
    pub job: JobRow,
    pub company: Option<CompanySummary>,
    pub application_count: i64,
}
