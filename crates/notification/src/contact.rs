use tokio::task::JoinHandle;

use crate::{DeliveryError, EmailService};

pub const INQUIRY_SUBJECT: &str = "New Inquiry from Adamus Capital";
pub const DISCLAIMER: &str = "This is an automated message. Please do not reply to this email.";

/// Contact form values from one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub organization: String,
    pub inquiry_type: String,
    pub message: String,
}

impl Submission {
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        organization: impl AsRef<str>,
        inquiry_type: impl AsRef<str>,
        message: impl AsRef<str>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_owned(),
            email: email.as_ref().trim().to_owned(),
            organization: organization.as_ref().trim().to_owned(),
            inquiry_type: inquiry_type.as_ref().trim().to_owned(),
            message: message.as_ref().trim().to_owned(),
        }
    }

    pub fn body(&self) -> String {
        format!(
            "New contact form submission:

Name: {}
Email: {}
Organization: {}
Inquiry Type: {}
Message:
{}

---
{DISCLAIMER}
",
            self.name, self.email, self.organization, self.inquiry_type, self.message
        )
    }
}

impl EmailService {
    /// Relay a submission in the background
    ///
    /// The outcome is logged from inside the task. Dropping the returned
    /// handle detaches the task without cancelling it.
    pub fn dispatch(&self, submission: Submission) -> JoinHandle<Result<(), DeliveryError>> {
        let service = self.clone();

        tokio::task::spawn_blocking(move || {
            let result = service.send_plain(INQUIRY_SUBJECT, submission.body());

            match &result {
                Ok(()) => tracing::info!(
                    to = %service.destination(),
                    inquiry_type = %submission.inquiry_type,
                    "Inquiry email sent"
                ),
                Err(err) => tracing::error!(
                    kind = err.kind(),
                    error = %err,
                    to = %service.destination(),
                    "Failed to send inquiry email"
                ),
            }

            result
        })
    }
}
