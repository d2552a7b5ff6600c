//! Mailer double for tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{MailError, Mailer, OutgoingMail};

/// Records every message and optionally fails delivery
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<OutgoingMail>>>,
    fail: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose deliveries always fail after being recorded
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingMail> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_message(&self, mail: OutgoingMail) -> Result<String, MailError> {
        let id = {
            let mut sent = self
                .sent
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            sent.push(mail);
            sent.len()
        };

        if self.fail {
            // an address lettre refuses to parse stands in for a transport failure
            let err = "not an address".parse::<lettre::Address>().unwrap_err();
            return Err(MailError::Address(err));
        }
        Ok(format!("<recorded-{id}@localhost>"))
    }
}
