use actix_web::{
    HttpResponse, delete, get, post,
    web::{Data, Path, ServiceConfig, scope},
};

use crate::api::error::ServiceError;
use crate::auth::Identity;
use super::service::SavedJobService;

#[post("/{job_id}")]
async fn save_job(
    service: Data<SavedJobService>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let saved = service.save(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Created().json(saved))
}

#[delete("/{job_id}")]
async fn unsave_job(
    service: Data<SavedJobService>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.unsave(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/my")]
async fn my_saved_jobs(
    service: Data<SavedJobService>,
    identity: Identity,
) -> Result<HttpResponse, ServiceError> {
    let saved = service.my_saved_jobs(&identity).await?;
    Ok(HttpResponse::Ok().json(saved))
}

pub fn saved_job_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/save-jobs")
            .service(my_saved_jobs)
            .service(save_job)
            .service(unsave_job),
    );
}
