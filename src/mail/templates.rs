//! Notification texts for application status changes.

/// Status labels that trigger an applicant notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifiedStatus {
    InReview,
    Accepted,
    Rejected,
}

impl NotifiedStatus {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "In Review" => Some(Self::InReview),
            "Accepted" => Some(Self::Accepted),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

/// Subject and plain-text body of a status notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEmail {
    pub subject: String,
    pub text: String,
}

impl StatusEmail {
    /// HTML alternative: the text body with line breaks preserved
    pub fn html(&self) -> String {
        self.text.replace('\n', "<br>")
    }
}

/// Build the notification for `status`, or `None` when the label is not one
/// applicants are notified about.
pub fn resolve(applicant_name: &str, job_title: &str, status: &str) -> Option<StatusEmail> {
    let status = NotifiedStatus::from_label(status)?;

    let (subject, message) = match status {
        NotifiedStatus::InReview => (
            format!("Your application for {job_title} is in review"),
            format!(
                "Your application for the position \"{job_title}\" is currently under review. \
                 We will get back to you soon."
            ),
        ),
        NotifiedStatus::Accepted => (
            format!("Congratulations! Application accepted for {job_title}"),
            format!(
                "Good news! Your application for \"{job_title}\" has been accepted. \
                 You will be contacted for the next steps or interview."
            ),
        ),
        NotifiedStatus::Rejected => (
            format!("Update on your application for {job_title}"),
            format!(
                "We regret to inform you that your application for \"{job_title}\" has been \
                 rejected. Thank you for your interest, and we wish you the best for your \
                 future endeavors."
            ),
        ),
    };

    Some(StatusEmail {
        subject: format!("{applicant_name}, {subject}"),
        text: format!("Hello {applicant_name},\n\n{message}\n\nBest regards,\nCompany Team"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_statuses_mention_applicant_and_job() {
        for status in ["In Review", "Accepted", "Rejected"] {
            let email = resolve("Ada Lovelace", "Compiler Engineer", status)
                .unwrap_or_else(|| panic!("no template for {status}"));

            assert!(email.subject.contains("Compiler Engineer"), "{status}");
            assert!(email.subject.contains("Ada Lovelace"), "{status}");
            assert!(email.text.contains("Compiler Engineer"), "{status}");
            assert!(email.text.starts_with("Hello Ada Lovelace,"), "{status}");
        }
    }

    #[test]
    fn subjects_differ_per_status() {
        let accepted = resolve("Sam", "Tester", "Accepted").unwrap();
        let rejected = resolve("Sam", "Tester", "Rejected").unwrap();

        assert!(accepted.subject.contains("Congratulations!"));
        assert!(rejected.text.contains("has been rejected"));
        assert_ne!(accepted.subject, rejected.subject);
    }

    #[test]
    fn unknown_status_yields_none() {
        assert_eq!(resolve("Sam", "Tester", "Applied"), None);
        assert_eq!(resolve("Sam", "Tester", "accepted"), None);
        assert_eq!(resolve("Sam", "Tester", ""), None);
    }

    #[test]
    fn html_keeps_line_breaks() {
        let email = resolve("Sam", "Tester", "In Review").unwrap();
        assert!(email.html().starts_with("Hello Sam,<br><br>"));
        assert!(!email.html().contains('\n'));
    }
}
