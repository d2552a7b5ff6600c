use actix_web::web;

pub mod application;
pub mod dto;
pub mod error;
pub mod health;
pub mod job;
pub mod saved_job;
pub mod state;
pub mod validation;

use application::{handlers::application_config, ApplicationService};
use health::health_config;
use job::{handlers::job_config, JobService};
use saved_job::{handlers::saved_job_config, SavedJobService};
use state::AppState;

/// Register shared data and every route of the service
pub fn configure(state: &AppState, cfg: &mut web::ServiceConfig) {
    let job_service = JobService::new(state.store.clone());
    let application_service = ApplicationService::new(
        state.store.clone(),
        state.mailer.clone(),
        state.mail_from.clone(),
    );
    let saved_job_service = SavedJobService::new(state.store.clone());

    cfg.app_data(web::Data::new(state.store.clone()))
        .app_data(web::Data::new(state.jwt.clone()))
        .app_data(web::Data::new(job_service))
        .app_data(web::Data::new(application_service))
        .app_data(web::Data::new(saved_job_service))
        .app_data(web::PayloadConfig::default().limit(state.max_payload_size))
        .app_data(validation::json_config().limit(state.max_payload_size))
        .app_data(validation::query_config())
        .app_data(validation::path_config())
        .configure(health_config)
        .configure(job_config)
        .configure(application_config)
        .configure(saved_job_config);
}
