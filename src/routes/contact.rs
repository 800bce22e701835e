use std::collections::HashSet;

use adamus_notification::Submission;
use axum::{
    extract::{Form, State, rejection::FormRejection},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{error::AppError, routes::AppState};

/// Contact form fields; anything absent is an empty string
#[derive(Debug, Default)]
pub struct SendInput {
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub organization: String,
    pub inquiry_type: String,
    pub message: String,
}

impl SendInput {
    /// `fullName` wins when present, otherwise "first last"
    pub fn resolve_name(&self) -> String {
        let full_name = self.full_name.trim();
        if !full_name.is_empty() {
            return full_name.to_owned();
        }

        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_owned()
    }

    pub fn into_submission(self) -> Submission {
        Submission::new(
            self.resolve_name(),
            self.email,
            self.organization,
            self.inquiry_type,
            self.message,
        )
    }
}

/// Unknown keys are ignored and the first value of a repeated key wins
impl FromIterator<(String, String)> for SendInput {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut input = SendInput::default();
        let mut seen = HashSet::new();

        for (key, value) in pairs {
            let field = match key.as_str() {
                "fullName" => &mut input.full_name,
                "firstName" => &mut input.first_name,
                "lastName" => &mut input.last_name,
                "email" => &mut input.email,
                "organization" => &mut input.organization,
                "inquiryType" => &mut input.inquiry_type,
                "message" => &mut input.message,
                _ => continue,
            };
            if seen.insert(key) {
                *field = value;
            }
        }

        input
    }
}

pub async fn action(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    input: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> Result<Response, AppError> {
    let pairs = match input {
        Ok(Form(pairs)) => pairs,
        // A bare POST carries no form at all
        Err(FormRejection::InvalidFormContentType(_))
            if !headers.contains_key(header::CONTENT_TYPE) =>
        {
            Vec::new()
        }
        Err(rejection) => return Err(rejection.into()),
    };
    let submission = pairs.into_iter().collect::<SendInput>().into_submission();

    tracing::info!(
        inquiry_type = %submission.inquiry_type,
        "Contact form received"
    );

    // Detach: the redirect never waits on the relay
    drop(app_state.mailer.dispatch(submission));

    Ok((StatusCode::FOUND, [(header::LOCATION, "/")]).into_response())
}
