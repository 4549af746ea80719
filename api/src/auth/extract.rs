use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use chrono::Utc;

use crate::{error::AppError, models::user::UserId, AppState};

/// The caller's identity, proven by a valid bearer token. Handlers pass the
/// inner [`UserId`] on to the services explicitly.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub UserId);

/// Pulls `<token>` out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // No usable header: denied before any token work happens.
        let Some(token) = bearer_token(&parts.headers) else {
            tracing::debug!("missing or malformed authorization header");
            return Err(AppError::AccessDenied);
        };
        let user_id = state.auth.authenticate(token, Utc::now())?;
        Ok(AuthUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use rstest::rstest;

    fn headers(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[rstest]
    #[case("Bearer abc.def.ghi", Some("abc.def.ghi"))]
    #[case("bearer abc.def.ghi", Some("abc.def.ghi"))]
    #[case("  Bearer   abc  ", Some("abc"))]
    #[case("Bearer ", None)]
    #[case("Basic dXNlcjpwYXNz", None)]
    #[case("abc.def.ghi", None)]
    fn parses_bearer_header(#[case] value: &str, #[case] expected: Option<&str>) {
        assert_eq!(bearer_token(&headers(value)), expected);
    }

    #[test]
    fn absent_header_yields_nothing() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
