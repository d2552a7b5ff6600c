pub mod models;
pub mod dto;
pub mod handlers;
pub mod service;

pub use models::UpdateStatusInput;
pub use service::ApplicationService;
