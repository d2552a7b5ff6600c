use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::db::Store;
use crate::mail::Mailer;

/// Process-wide collaborators, built once at start-up and cloned into every
/// HTTP worker
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub mailer: Arc<dyn Mailer>,
    pub jwt: JwtKeys,
    pub mail_from: String,
    pub max_payload_size: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        mailer: Arc<dyn Mailer>,
        jwt: JwtKeys,
        mail_from: impl Into<String>,
    ) -> Self {
        AppState {
            store,
            mailer,
            jwt,
            mail_from: mail_from.into(),
            max_payload_size: 10 * 1024 * 1024,
        }
    }

    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }
}
