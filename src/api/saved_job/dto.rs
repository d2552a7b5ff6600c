use serde::Serialize;

use crate::api::application::dto::JobSummary;
use crate::db::models::SavedJobRow;

/// Saved entry with its job expanded; `None` once the job is deleted
#[derive(Debug, Serialize)]
pub struct SavedJobView {
    #[serde(flatten)]
    pub saved: SavedJobRow,
    pub job: Option<JobSummary>,
}
