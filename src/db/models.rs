use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

/// Read-only user profile managed by the authentication service
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: Option<String>,
    pub resume: Option<String>,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
}

/// Database representation of a job posting
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i32,
    pub company_id: i32,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub category: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub is_closed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database representation of a job application
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: i32,
    pub job_id: i32,
    pub applicant_id: i32,
    pub resume: Option<String>,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database representation of a job bookmarked by a job seeker
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedJobRow {
    pub id: i32,
    pub job_id: i32,
    pub jobseeker_id: i32,
    pub created_at: NaiveDateTime,
}

/// Fields of a job posting supplied at creation time
#[derive(Debug, Clone, Default)]
pub struct NewJob {
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: String,
    pub category: String,
    pub job_type: String,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
}

/// Predicates applied when listing open jobs.
///
/// `keyword` and `location` are case-insensitive substring matches, `category`
/// and `job_type` are exact. `min_salary` keeps jobs whose upper bound reaches
/// it, `max_salary` keeps jobs whose lower bound stays under it.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<i32>,
    pub max_salary: Option<i32>,
}

impl JobFilter {
    pub fn matches(&self, job: &JobRow) -> bool {
        if job.is_closed {
            return false;
        }
        if let Some(keyword) = &self.keyword {
            if !contains_ignore_case(&job.title, keyword) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_ignore_case(&job.location, location) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if &job.category != category {
                return false;
            }
        }
        if let Some(job_type) = &self.job_type {
            if &job.job_type != job_type {
                return false;
            }
        }
        if let Some(min) = self.min_salary {
            if !job.salary_max.is_some_and(|max| max >= min) {
                return false;
            }
        }
        if let Some(max) = self.max_salary {
            if !job.salary_min.is_some_and(|min| min <= max) {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
