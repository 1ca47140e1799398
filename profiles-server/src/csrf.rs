//! Anti-forgery tokens for form posts.
//!
//! A random secret is kept in the `csrftoken` cookie. Every rendered form
//! carries a masked copy of it, so the token in the page changes on each
//! render while always unmasking to the same secret.

use crate::cookies;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cookie::Cookie;
use rand::Rng;
use std::convert::Infallible;
use subtle::ConstantTimeEq;

pub const CSRF_SECRET_LENGTH: usize = 32;
pub const CSRF_TOKEN_LENGTH: usize = 2 * CSRF_SECRET_LENGTH;
pub const CSRF_ALLOWED_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const CSRF_COOKIE: &str = "csrftoken";
/// Name of the hidden form field holding the masked token.
pub const CSRF_FIELD: &str = "_token";

pub const REASON_NO_CSRF_COOKIE: &str = "CSRF cookie not set.";
pub const REASON_CSRF_TOKEN_MISSING: &str = "CSRF token missing.";
pub const REASON_INCORRECT_LENGTH: &str = "CSRF token has incorrect length.";
pub const REASON_INVALID_CHARACTERS: &str = "CSRF token has invalid characters.";
pub const REASON_MISMATCH: &str = "CSRF token mismatch.";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct RejectRequest {
    pub reason: &'static str,
}

impl RejectRequest {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

fn random_chars(len: usize) -> Vec<u8> {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CSRF_ALLOWED_CHARS[rng.gen_range(0..CSRF_ALLOWED_CHARS.len())])
        .collect()
}

fn char_index(c: u8) -> Option<usize> {
    CSRF_ALLOWED_CHARS.iter().position(|&a| a == c)
}

fn is_well_formed(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|c| char_index(c).is_some())
}

pub fn new_secret() -> String {
    String::from_utf8_lossy(&random_chars(CSRF_SECRET_LENGTH)).into_owned()
}

/// Masks `secret` with a fresh random pad. The pad is the first half of the token.
pub fn mask_token(secret: &str) -> String {
    let mask = random_chars(CSRF_SECRET_LENGTH);
    let n = CSRF_ALLOWED_CHARS.len();

    let masked: Vec<u8> = secret
        .bytes()
        .zip(mask.iter())
        .map(|(s, &m)| {
            let s_idx = char_index(s).unwrap_or(0);
            let m_idx = char_index(m).unwrap_or(0);
            CSRF_ALLOWED_CHARS[(s_idx + m_idx) % n]
        })
        .collect();

    let mut token = mask;
    token.extend(masked);
    String::from_utf8_lossy(&token).into_owned()
}

/// Recovers the secret from a token. Expects a token that passed `check_token_format`.
pub fn unmask_token(token: &str) -> Option<String> {
    if token.len() != CSRF_TOKEN_LENGTH {
        return None;
    }
    let n = CSRF_ALLOWED_CHARS.len();
    let (mask, masked) = token.as_bytes().split_at(CSRF_SECRET_LENGTH);

    let secret = mask
        .iter()
        .zip(masked.iter())
        .map(|(&m, &c)| {
            let m_idx = char_index(m)?;
            let c_idx = char_index(c)?;
            Some(CSRF_ALLOWED_CHARS[(c_idx + n - m_idx) % n])
        })
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(secret).ok()
}

pub fn check_token_format(token: &str) -> Result<(), RejectRequest> {
    if token.is_empty() {
        return Err(RejectRequest::new(REASON_CSRF_TOKEN_MISSING));
    }
    if token.len() != CSRF_TOKEN_LENGTH {
        return Err(RejectRequest::new(REASON_INCORRECT_LENGTH));
    }
    if !is_well_formed(token, CSRF_TOKEN_LENGTH) {
        return Err(RejectRequest::new(REASON_INVALID_CHARACTERS));
    }
    Ok(())
}

pub fn check_token(request_token: &str, secret: &str) -> Result<(), RejectRequest> {
    check_token_format(request_token)?;
    let request_secret =
        unmask_token(request_token).ok_or(RejectRequest::new(REASON_INVALID_CHARACTERS))?;

    if !bool::from(request_secret.as_bytes().ct_eq(secret.as_bytes())) {
        return Err(RejectRequest::new(REASON_MISMATCH));
    }
    Ok(())
}

pub fn cookie(secret: String, secure: bool) -> Cookie<'static> {
    cookies::build_cookie(CSRF_COOKIE, secret, secure)
}

/// The secret from the request's `csrftoken` cookie, if it has one that is well formed.
#[derive(Debug, Clone, Default)]
pub struct CsrfSecret(Option<String>);

impl CsrfSecret {
    /// The existing secret, or a new one together with `true` when it still has to be set.
    pub fn secret_or_new(&self) -> (String, bool) {
        match &self.0 {
            Some(secret) => (secret.clone(), false),
            None => (new_secret(), true),
        }
    }

    pub fn verify(&self, request_token: &str) -> Result<(), RejectRequest> {
        let secret = self
            .0
            .as_deref()
            .ok_or(RejectRequest::new(REASON_NO_CSRF_COOKIE))?;
        check_token(request_token, secret)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CsrfSecret
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let secret = cookies::read_cookie(&parts.headers, CSRF_COOKIE)
            .filter(|s| is_well_formed(s, CSRF_SECRET_LENGTH));
        Ok(CsrfSecret(secret))
    }
}
