use crate::cookies;
use crate::error::AppError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use profiles_lib::Notice;
use std::convert::Infallible;

pub const FLASH_COOKIE: &str = "flash";

/// Notice left by the previous request. The cookie only carries the notice tag.
#[derive(Debug, Clone, Default)]
pub struct Flash {
    present: bool,
    notice: Option<Notice>,
}

impl Flash {
    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Clears the cookie on `response`, so the notice is shown exactly once.
    pub fn consume(&self, response: &mut Response) -> Result<(), AppError> {
        if self.present {
            cookies::append_cookie(response, &cookies::removal_cookie(FLASH_COOKIE))?;
        }
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Flash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let value = cookies::read_cookie(&parts.headers, FLASH_COOKIE);
        Ok(Flash {
            present: value.is_some(),
            notice: value.and_then(|v| v.parse().ok()),
        })
    }
}

/// Redirects to `to`, leaving `notice` for the page rendered next.
pub fn redirect_with(to: &str, notice: Notice, secure: bool) -> Result<Response, AppError> {
    let mut response = Redirect::to(to).into_response();
    let cookie = cookies::build_cookie(FLASH_COOKIE, notice.as_str().to_string(), secure);
    cookies::append_cookie(&mut response, &cookie)?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, Request, StatusCode};

    async fn extract(cookie: Option<&str>) -> Flash {
        let mut builder = Request::builder().uri("/profiles");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Flash::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn reads_known_notice() {
        let flash = extract(Some("flash=updated")).await;
        assert_eq!(flash.notice(), Some(Notice::Updated));
    }

    #[tokio::test]
    async fn unknown_value_is_dropped_but_still_cleared() {
        let flash = extract(Some("flash=whatever")).await;
        assert_eq!(flash.notice(), None);

        let mut response = StatusCode::OK.into_response();
        flash.consume(&mut response).unwrap();
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn nothing_to_clear_without_cookie() {
        let flash = extract(None).await;
        let mut response = StatusCode::OK.into_response();
        flash.consume(&mut response).unwrap();
        assert!(!response.headers().contains_key(header::SET_COOKIE));
    }

    #[test]
    fn redirect_sets_notice_tag() {
        let response = redirect_with("/profiles", Notice::Added, false).unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/profiles");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("flash=added"));
    }
}
