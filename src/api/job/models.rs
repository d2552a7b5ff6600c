use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use validator::Validate;

use crate::api::error::ServiceError;
use crate::db::models::{JobFilter, JobRow, NewJob};

fn check_salary_range(min: Option<i32>, max: Option<i32>) -> Result<(), ServiceError> {
    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(ServiceError::Validation(
            "salaryMin must not exceed salaryMax".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_non_negative(salary: Option<i32>) -> Result<(), ServiceError> {
    match salary {
        Some(value) if value < 0 => Err(ServiceError::Validation(
            "Salary must not be negative".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Tells an explicit `null` (`Some(None)`) apart from an absent field (`None`)
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Query values sent blank by filter forms count as absent
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Payload for posting a job
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobInput {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, rename = "type")]
    pub job_type: String,
    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary_min: Option<i32>,
    #[validate(range(min = 0, message = "Salary must not be negative"))]
    pub salary_max: Option<i32>,
}

impl CreateJobInput {
    pub fn into_new_job(self) -> Result<NewJob, ServiceError> {
        check_salary_range(self.salary_min, self.salary_max)?;
        Ok(NewJob {
            title: self.title,
            description: self.description,
            requirements: self.requirements,
            location: self.location,
            category: self.category,
            job_type: self.job_type,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
        })
    }
}

/// Partial update of a job; absent fields keep their stored value and an
/// explicit `null` clears a salary bound
#[derive(Deserialize, Debug, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobInput {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    #[validate(length(max = 200, message = "Location must be at most 200 characters"))]
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub salary_min: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present")]
    pub salary_max: Option<Option<i32>>,
    pub is_closed: Option<bool>,
}

impl UpdateJobInput {
    /// Merge into `job`, rejecting a merged salary range that is inverted
    pub fn apply_to(self, mut job: JobRow) -> Result<JobRow, ServiceError> {
        if let Some(title) = self.title {
            job.title = title;
        }
        if let Some(description) = self.description {
            job.description = description;
        }
        if let Some(requirements) = self.requirements {
            job.requirements = requirements;
        }
        if let Some(location) = self.location {
            job.location = location;
        }
        if let Some(category) = self.category {
            job.category = category;
        }
        if let Some(job_type) = self.job_type {
            job.job_type = job_type;
        }
        if let Some(salary_min) = self.salary_min {
            check_non_negative(salary_min)?;
            job.salary_min = salary_min;
        }
        if let Some(salary_max) = self.salary_max {
            check_non_negative(salary_max)?;
            job.salary_max = salary_max;
        }
        if let Some(is_closed) = self.is_closed {
            job.is_closed = is_closed;
        }
        check_salary_range(job.salary_min, job.salary_max)?;
        Ok(job)
    }
}

/// Query string of the public job listing
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobQuery {
    pub keyword: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_salary: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_salary: Option<i32>,
    /// Annotate results with this job seeker's saved and applied state
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<i32>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl JobQuery {
    pub fn into_parts(self) -> (JobFilter, Option<i32>) {
        let filter = JobFilter {
            keyword: non_empty(self.keyword),
            location: non_empty(self.location),
            category: non_empty(self.category),
            job_type: non_empty(self.job_type),
            min_salary: self.min_salary,
            max_salary: self.max_salary,
        };
        (filter, self.user_id)
    }
}

/// Query string of the single-job lookup
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobLookupQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub user_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stored_job() -> JobRow {
        let now = Utc::now().naive_utc();
        JobRow {
            id: 1,
            company_id: 2,
            title: "Backend Engineer".to_string(),
            description: String::new(),
            requirements: String::new(),
            location: "Lisbon".to_string(),
            category: "Engineering".to_string(),
            job_type: "Full-Time".to_string(),
            salary_min: Some(50),
            salary_max: Some(80),
            is_closed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn create_rejects_inverted_salary_range() {
        let input = CreateJobInput {
            title: "Engineer".to_string(),
            description: String::new(),
            requirements: String::new(),
            location: String::new(),
            category: String::new(),
            job_type: String::new(),
            salary_min: Some(100),
            salary_max: Some(10),
        };
        assert!(matches!(input.into_new_job(), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn create_requires_title() {
        let input: CreateJobInput = serde_json::from_value(serde_json::json!({
            "title": "",
            "type": "Remote"
        }))
        .unwrap();
        assert_eq!(input.job_type, "Remote");
        assert!(input.validate().is_err());
    }

    #[test]
    fn update_merges_only_present_fields() {
        let update = UpdateJobInput {
            title: Some("Staff Engineer".to_string()),
            salary_max: Some(Some(120)),
            ..UpdateJobInput::default()
        };
        let job = update.apply_to(stored_job()).unwrap();

        assert_eq!(job.title, "Staff Engineer");
        assert_eq!(job.location, "Lisbon");
        assert_eq!(job.salary_min, Some(50));
        assert_eq!(job.salary_max, Some(120));
    }

    #[test]
    fn update_checks_merged_salary_range() {
        let update = UpdateJobInput {
            salary_min: Some(Some(90)),
            ..UpdateJobInput::default()
        };
        assert!(matches!(update.apply_to(stored_job()), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn update_null_clears_salary_bound() {
        let update: UpdateJobInput =
            serde_json::from_value(serde_json::json!({ "salaryMin": null })).unwrap();
        assert_eq!(update.salary_min, Some(None));
        assert_eq!(update.salary_max, None);

        let job = update.apply_to(stored_job()).unwrap();
        assert_eq!(job.salary_min, None);
        assert_eq!(job.salary_max, Some(80));
    }

    #[test]
    fn update_rejects_negative_salary() {
        let update: UpdateJobInput =
            serde_json::from_value(serde_json::json!({ "salaryMax": -1 })).unwrap();
        assert!(matches!(update.apply_to(stored_job()), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn query_drops_blank_filters() {
        let query = JobQuery {
            keyword: Some("  ".to_string()),
            location: Some(" Porto ".to_string()),
            user_id: Some(3),
            ..JobQuery::default()
        };
        let (filter, user_id) = query.into_parts();
        assert_eq!(filter.keyword, None);
        assert_eq!(filter.location.as_deref(), Some("Porto"));
        assert_eq!(user_id, Some(3));
    }

    #[test]
    fn blank_numeric_query_values_are_ignored() {
        let query = actix_web::web::Query::<JobQuery>::from_query(
            "keyword=&minSalary=&maxSalary=%20&userId=",
        )
        .unwrap()
        .into_inner();
        let (filter, user_id) = query.into_parts();
        assert_eq!(filter.keyword, None);
        assert_eq!(filter.min_salary, None);
        assert_eq!(filter.max_salary, None);
        assert_eq!(user_id, None);

        let lookup = actix_web::web::Query::<JobLookupQuery>::from_query("userId=").unwrap();
        assert_eq!(lookup.user_id, None);
    }

    #[test]
    fn numeric_query_values_still_parse() {
        let query = actix_web::web::Query::<JobQuery>::from_query("minSalary=5000&userId=4")
            .unwrap()
            .into_inner();
        assert_eq!(query.min_salary, Some(5000));
        assert_eq!(query.user_id, Some(4));
        assert!(actix_web::web::Query::<JobQuery>::from_query("minSalary=abc").is_err());
    }
}
