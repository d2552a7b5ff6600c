use async_trait::async_trait;
use sqlx::{Pool, Postgres, QueryBuilder};
use tracing::debug;

use crate::db::models::{ApplicationRow, JobFilter, JobRow, NewJob, SavedJobRow, UserRow};
use crate::db::store::{Store, StoreError};

const USER_COLUMNS: &str =
    "id, name, email, role, avatar, resume, company_name, company_logo";
const JOB_COLUMNS: &str = "id, company_id, title, description, requirements, location, \
     category, job_type, salary_min, salary_max, is_closed, created_at, updated_at";
const APPLICATION_COLUMNS: &str =
    "id, job_id, applicant_id, resume, status, created_at, updated_at";
const SAVED_JOB_COLUMNS: &str = "id, job_id, jobseeker_id, created_at";

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: Pool<Postgres>,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Escape LIKE metacharacters so user input is matched literally
fn like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len() + 2);
    escaped.push('%');
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }

    async fn find_user(&self, id: i32) -> Result<Option<UserRow>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn create_job(&self, company_id: i32, job: &NewJob) -> Result<JobRow, StoreError> {
        debug!("Creating job: title={}, company_id={}", job.title, company_id);

        let query = format!(
            r#"
            INSERT INTO jobs (company_id, title, description, requirements, location,
                              category, job_type, salary_min, salary_max)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {JOB_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(company_id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.location)
            .bind(&job.category)
            .bind(&job.job_type)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .fetch_one(&self.pool)
            .await?;

        debug!("Job created with id={}", row.id);
        Ok(row)
    }

    async fn find_job(&self, id: i32) -> Result<Option<JobRow>, StoreError> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_open_jobs(&self, filter: &JobFilter) -> Result<Vec<JobRow>, StoreError> {
        let mut query = QueryBuilder::<Postgres>::new(format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE is_closed = FALSE"
        ));

        if let Some(keyword) = &filter.keyword {
            query.push(" AND title ILIKE ").push_bind(like_pattern(keyword));
        }
        if let Some(location) = &filter.location {
            query.push(" AND location ILIKE ").push_bind(like_pattern(location));
        }
        if let Some(category) = &filter.category {
            query.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(job_type) = &filter.job_type {
            query.push(" AND job_type = ").push_bind(job_type.clone());
        }
        if let Some(min_salary) = filter.min_salary {
            query.push(" AND salary_max >= ").push_bind(min_salary);
        }
        if let Some(max_salary) = filter.max_salary {
            query.push(" AND salary_min <= ").push_bind(max_salary);
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        let rows = query
            .build_query_as::<JobRow>()
            .fetch_all(&self.pool)
            .await?;
        debug!("Listed {} open jobs", rows.len());
        Ok(rows)
    }

    async fn jobs_by_company(&self, company_id: i32) -> Result<Vec<JobRow>, StoreError> {
        let query = format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE company_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, JobRow>(&query)
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn update_job(&self, job: &JobRow) -> Result<Option<JobRow>, StoreError> {
        let query = format!(
            r#"
            UPDATE jobs
            SET title = $2, description = $3, requirements = $4, location = $5,
                category = $6, job_type = $7, salary_min = $8, salary_max = $9,
                is_closed = $10, updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, JobRow>(&query)
            .bind(job.id)
            .bind(&job.title)
            .bind(&job.description)
            .bind(&job.requirements)
            .bind(&job.location)
            .bind(&job.category)
            .bind(&job.job_type)
            .bind(job.salary_min)
            .bind(job.salary_max)
            .bind(job.is_closed)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_job(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_application(
        &self,
        job_id: i32,
        applicant_id: i32,
        resume: Option<&str>,
        status: &str,
    ) -> Result<ApplicationRow, StoreError> {
        debug!("Creating application: job_id={}, applicant_id={}", job_id, applicant_id);

        let query = format!(
            r#"
            INSERT INTO applications (job_id, applicant_id, resume, status)
            VALUES ($1, $2, $3, $4)
            RETURNING {APPLICATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(job_id)
            .bind(applicant_id)
            .bind(resume)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_application(&self, id: i32) -> Result<Option<ApplicationRow>, StoreError> {
        let query = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1");
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_application_for(
        &self,
        job_id: i32,
        applicant_id: i32,
    ) -> Result<Option<ApplicationRow>, StoreError> {
        let query = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE job_id = $1 AND applicant_id = $2"
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(job_id)
            .bind(applicant_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn applications_by_applicant(
        &self,
        applicant_id: i32,
    ) -> Result<Vec<ApplicationRow>, StoreError> {
        let query = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE applicant_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(applicant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn applications_for_job(&self, job_id: i32) -> Result<Vec<ApplicationRow>, StoreError> {
        let query = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE job_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count_applications_for_job(&self, job_id: i32) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn update_application_status(
        &self,
        id: i32,
        status: &str,
    ) -> Result<Option<ApplicationRow>, StoreError> {
        let query = format!(
            r#"
            UPDATE applications
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {APPLICATION_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, ApplicationRow>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_application(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_saved_job(
        &self,
        job_id: i32,
        jobseeker_id: i32,
    ) -> Result<SavedJobRow, StoreError> {
        let query = format!(
            "INSERT INTO saved_jobs (job_id, jobseeker_id) VALUES ($1, $2) RETURNING {SAVED_JOB_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SavedJobRow>(&query)
            .bind(job_id)
            .bind(jobseeker_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_saved_job(
        &self,
        job_id: i32,
        jobseeker_id: i32,
    ) -> Result<Option<SavedJobRow>, StoreError> {
        let query = format!(
            "SELECT {SAVED_JOB_COLUMNS} FROM saved_jobs WHERE job_id = $1 AND jobseeker_id = $2"
        );
        let row = sqlx::query_as::<_, SavedJobRow>(&query)
            .bind(job_id)
            .bind(jobseeker_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn saved_jobs_by_jobseeker(
        &self,
        jobseeker_id: i32,
    ) -> Result<Vec<SavedJobRow>, StoreError> {
        let query = format!(
            "SELECT {SAVED_JOB_COLUMNS} FROM saved_jobs WHERE jobseeker_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, SavedJobRow>(&query)
            .bind(jobseeker_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete_saved_job(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM saved_jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
