use crate::csrf::RejectRequest;
use crate::views;
use axum::http::header::InvalidHeaderValue;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use profiles_lib::ProfileError;
use tracing::{event, Level};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Profile not found")]
    NotFound,
    #[error("Form submission rejected: {0}")]
    Csrf(#[from] RejectRequest),
    #[error(transparent)]
    Service(#[from] ProfileError),
    #[error("Error rendering template")]
    Template(#[from] tera::Error),
    #[error("Error building response header")]
    Header(#[from] InvalidHeaderValue),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::Service(ProfileError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Csrf(_) => StatusCode::FORBIDDEN,
            AppError::Service(ProfileError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self.status() {
            StatusCode::NOT_FOUND => "Profile not found.".to_string(),
            StatusCode::FORBIDDEN => "Page expired, please go back and submit the form again."
                .to_string(),
            StatusCode::UNPROCESSABLE_ENTITY => self.to_string(),
            _ => "Something went wrong.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            event!(Level::ERROR, error = ?self, "Request failed");
        } else {
            event!(Level::WARN, error = %self, status = status.as_u16(), "Request rejected");
        }

        match views::error_page(status, &self.public_message()) {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                event!(Level::ERROR, error = ?e, "Error page failed to render");
                (status, self.public_message()).into_response()
            }
        }
    }
}
