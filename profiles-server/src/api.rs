use crate::cookies;
use crate::csrf::{self, CsrfSecret};
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::webserver::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use profiles_lib::{ProfileError, ProfileForm, ProfileInput};
use serde::Deserialize;
use tracing::{event, instrument, Level};

pub const PROFILES_PATH: &str = "/profiles";

/// Body of the create and edit forms. Only these fields are read.
#[derive(Deserialize, Debug, Default)]
pub struct ProfileSubmission {
    #[serde(rename = "_token", default)]
    pub token: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl ProfileSubmission {
    fn input(&self) -> ProfileInput {
        ProfileInput::new(&self.name, &self.email)
    }
}

/// Ids that do not parse can never exist.
fn parse_id(id: &str) -> Option<u64> {
    id.parse().ok()
}

fn form_response(
    state: &AppState,
    csrf: &CsrfSecret,
    status: StatusCode,
    form: &ProfileForm,
) -> Result<Response, AppError> {
    let (secret, issued) = csrf.secret_or_new();
    let token = csrf::mask_token(&secret);
    let body = match form.id {
        Some(id) => state.views.edit(id, form, &token)?,
        None => state.views.create(form, &token)?,
    };

    let mut response = (status, Html(body)).into_response();
    if issued {
        cookies::append_cookie(&mut response, &csrf::cookie(secret, state.secure_cookies))?;
    }
    Ok(response)
}

pub async fn root() -> Redirect {
    Redirect::to(PROFILES_PATH)
}

#[instrument(skip_all)]
pub async fn list(State(state): State<AppState>, flash: Flash) -> Result<Response, AppError> {
    let profiles = state.service.list().await?;
    let body = state.views.list(&profiles, flash.notice())?;

    let mut response = Html(body).into_response();
    flash.consume(&mut response)?;
    Ok(response)
}

#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    csrf: CsrfSecret,
) -> Result<Response, AppError> {
    let form = state.service.create_form();
    form_response(&state, &csrf, StatusCode::OK, &form)
}

#[instrument(skip_all)]
pub async fn store(
    State(state): State<AppState>,
    csrf: CsrfSecret,
    Form(submission): Form<ProfileSubmission>,
) -> Result<Response, AppError> {
    csrf.verify(&submission.token)?;

    let input = submission.input();
    match state.service.create(input.clone()).await {
        Ok((_, notice)) => flash::redirect_with(PROFILES_PATH, notice, state.secure_cookies),
        Err(ProfileError::Validation(errors)) => {
            event!(Level::DEBUG, %errors, "Create rejected");
            let form = ProfileForm::rejected(None, input, errors);
            form_response(&state, &csrf, StatusCode::UNPROCESSABLE_ENTITY, &form)
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state, csrf))]
pub async fn edit(
    State(state): State<AppState>,
    csrf: CsrfSecret,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_id(&id).ok_or(AppError::NotFound)?;
    let profile = state.service.edit_form(id).await?;
    form_response(&state, &csrf, StatusCode::OK, &ProfileForm::from(&profile))
}

#[instrument(skip(state, csrf, submission))]
pub async fn update(
    State(state): State<AppState>,
    csrf: CsrfSecret,
    Path(id): Path<String>,
    Form(submission): Form<ProfileSubmission>,
) -> Result<Response, AppError> {
    csrf.verify(&submission.token)?;
    let id = parse_id(&id).ok_or(AppError::NotFound)?;

    let input = submission.input();
    match state.service.update(id, input.clone()).await {
        Ok((_, notice)) => flash::redirect_with(PROFILES_PATH, notice, state.secure_cookies),
        Err(ProfileError::Validation(errors)) => {
            event!(Level::DEBUG, %errors, "Update rejected");
            let form = ProfileForm::rejected(Some(id), input, errors);
            form_response(&state, &csrf, StatusCode::UNPROCESSABLE_ENTITY, &form)
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let notice = match parse_id(&id) {
        Some(id) => state.service.delete(id).await?,
        // Nothing can be stored under it, so there is nothing to remove
        None => profiles_lib::Notice::Deleted,
    };
    flash::redirect_with(PROFILES_PATH, notice, state.secure_cookies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_numeric_ids_parse() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-1"), None);
    }

    #[test]
    fn submission_ignores_surrounding_whitespace() {
        let submission = ProfileSubmission {
            token: String::new(),
            name: " Jane ".to_string(),
            email: "jane@example.com ".to_string(),
        };
        let input = submission.input();
        assert_eq!(input.name(), "Jane");
        assert_eq!(input.email(), "jane@example.com");
    }
}
