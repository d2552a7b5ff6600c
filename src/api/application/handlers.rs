use actix_web::{
    HttpResponse, delete, get, post, put,
    web::{Data, Path, ServiceConfig, scope},
};
use actix_web_validator::Json;

use crate::api::error::ServiceError;
use crate::auth::Identity;
use super::models::UpdateStatusInput;
use super::service::ApplicationService;

#[post("/{job_id}")]
async fn apply(
    service: Data<ApplicationService>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let application = service.apply(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Created().json(application))
}

#[get("/my")]
async fn my_applications(
    service: Data<ApplicationService>,
    identity: Identity,
) -> Result<HttpResponse, ServiceError> {
    let applications = service.my_applications(&identity).await?;
    Ok(HttpResponse::Ok().json(applications))
}

#[get("/job/{job_id}")]
async fn applicants_for_job(
    service: Data<ApplicationService>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let applications = service.applicants_for_job(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(applications))
}

#[get("/{id}")]
async fn get_application(
    service: Data<ApplicationService>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let application = service.get_application(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(application))
}

#[put("/{id}/status")]
async fn update_status(
    service: Data<ApplicationService>,
    identity: Identity,
    path: Path<i32>,
    input: Json<UpdateStatusInput>,
) -> Result<HttpResponse, ServiceError> {
    let response = service
        .update_status(&identity, path.into_inner(), input.into_inner().status)
        .await?;
    Ok(HttpResponse::Ok().json(response))
}

#[delete("/{id}")]
async fn withdraw(
    service: Data<ApplicationService>,
    identity: Identity,
    path: Path<i32>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.withdraw(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn application_config(config: &mut ServiceConfig) {
    config.service(
        scope("/api/applications")
            .service(my_applications)
            .service(applicants_for_job)
            .service(apply)
            .service(get_application)
            .service(update_status)
            .service(withdraw),
    );
}
