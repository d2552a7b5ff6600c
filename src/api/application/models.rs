use serde::Deserialize;
use validator::Validate;

/// Status assigned to an application when it is submitted
pub const INITIAL_STATUS: &str = "Applied";

/// Payload of a status change.
///
/// Any non-empty label is stored; only "In Review", "Accepted" and "Rejected"
/// notify the applicant.
#[derive(Deserialize, Debug, Validate)]
pub struct UpdateStatusInput {
    #[validate(length(min = 1, max = 50, message = "Status must be between 1 and 50 characters"))]
    pub status: String,
}
