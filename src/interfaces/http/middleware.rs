//! Request authentication
//!
//! Resolves the session token to an [`Actor`] and injects it into handlers
//! as an extractor. The token is looked for in the `Authorization: Bearer`
//! header, then the `token` cookie, then the `token` query parameter, in
//! that order. Resolution re-fetches the user row on every request, so a
//! deleted or deactivated account stops authenticating immediately even
//! while its token is unexpired.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;

use super::common::ApiError;
use crate::application::IdentityService;
use crate::domain::policy::Actor;
use crate::infrastructure::database::repositories::UserRepository;
use crate::shared::DomainError;

/// State required to authenticate requests.
#[derive(Clone)]
pub struct AuthState {
    pub identity: Arc<IdentityService<UserRepository>>,
}

impl<S> FromRequestParts<S> for Actor
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthState::from_ref(state);

        let token = extract_token(&parts.headers, parts.uri.query()).ok_or_else(|| {
            ApiError::from(DomainError::Unauthorized(
                "Missing authentication token".into(),
            ))
        })?;

        let actor = auth.identity.resolve_token(&token).await?;
        Ok(actor)
    }
}

/// Find the session token: bearer header, cookie, query parameter.
pub fn extract_token(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    if let Some(token) = bearer_token(headers) {
        return Some(token);
    }
    if let Some(token) = cookie_token(headers) {
        return Some(token);
    }
    query_token(query)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(COOKIE)?.to_str().ok()?;
    value
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn query_token(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::header::HeaderName::from_bytes(name.as_bytes()).unwrap(),
                value.parse().unwrap(),
            );
        }
        map
    }

    #[test]
    fn bearer_header_wins_over_cookie_and_query() {
        let headers = headers(&[
            ("authorization", "Bearer header-token"),
            ("cookie", "token=cookie-token"),
        ]);
        let token = extract_token(&headers, Some("token=query-token"));
        assert_eq!(token.as_deref(), Some("header-token"));
    }

    #[test]
    fn cookie_wins_over_query() {
        let headers = headers(&[("cookie", "session=x; token=cookie-token")]);
        let token = extract_token(&headers, Some("token=query-token"));
        assert_eq!(token.as_deref(), Some("cookie-token"));
    }

    #[test]
    fn query_parameter_is_the_last_resort() {
        let headers = HeaderMap::new();
        let token = extract_token(&headers, Some("format=csv&token=query-token"));
        assert_eq!(token.as_deref(), Some("query-token"));
    }

    #[test]
    fn missing_everywhere_is_none() {
        assert!(extract_token(&HeaderMap::new(), None).is_none());
        assert!(extract_token(&HeaderMap::new(), Some("format=csv")).is_none());
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let headers = headers(&[("authorization", "Basic abc123")]);
        assert!(extract_token(&headers, None).is_none());
    }
}
