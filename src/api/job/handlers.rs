use actix_web::{
    HttpResponse, delete, get, post, put,
    web::{Data, Path, Query, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::auth::Identity;
use super::models::{CreateJobInput, JobLookupQuery, JobQuery, UpdateJobInput};
use super::service::JobService;

#[post("")]
async fn create_job(
    service: Data<JobService>,
    identity: Identity,
    input: Json<CreateJobInput>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.create_job(&identity, input.into_inner()).await?;
    Ok(HttpResponse::Created().json(job))
}

#[get("")]
async fn list_jobs(
    service: Data<JobService>,
    query: Query<JobQuery>,
) -> Result<HttpResponse, ServiceError> {
    let (filter, user_id) = query.into_inner().into_parts();
    let jobs = service.list_jobs(filter, user_id).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/get-jobs-employer")]
async fn employer_jobs(
    service: Data<JobService>,
    identity: Identity,
) -> Result<HttpResponse, ServiceError> {
    let jobs = service.employer_jobs(&identity).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

#[get("/{id}")]
async fn get_job(
    service: Data<JobService>,
    path: Path<i32>,
    query: Query<JobLookupQuery>,
) -> Result<HttpResponse, ServiceError> {
    let job = service.get_job(path.into_inner(), query.user_id).await?;
    Ok(HttpResponse::Ok().json(job))
}

#[put("/{id}")]
async fn update_job(
    service: Data<JobService>,
    identity: Identity,
    path: Path<i32>,
    input: Json<UpdateJobInput>,
) -> Result<HttpResponse, ServiceError> {
    let job = service
        .update_job(&identity, path.into_inner(), input.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(job))
}

#[delete("/{id}")]
async fn delete_job(
    service: Data<JobService>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.delete_job(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[put("/{id}/toggle-close")]
async fn toggle_close(
    service: Data<JobService>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.toggle_close(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/jobs")
            .service(create_job)
            .service(list_jobs)
            .service(employer_jobs)
            .service(get_job)
            .service(update_job)
            .service(delete_job)
            .service(toggle_close),
    );
}
