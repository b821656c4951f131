use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap, HeaderValue},
};

use crate::{error::ApiError, main_lib::AppState};
use issuer_console_core::constants::{SESSION_MAX_AGE_SECS, USER_COOKIE_NAME};
use issuer_console_core::identity::Identity;

/// Returns the value of cookie `name` from the request's `Cookie` headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value that expires the session cookie.
pub fn expired_session_cookie() -> HeaderValue {
    HeaderValue::from_static("ferion_user_id=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value that starts a session for `user_id`.
pub fn session_cookie(user_id: &str) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        USER_COOKIE_NAME, user_id, SESSION_MAX_AGE_SECS
    ))
    .map_err(|e| ApiError::Internal(format!("Invalid session cookie: {}", e)))
}

/// The caller's identity, resolved from the session cookie.
pub struct CurrentIdentity(pub Identity);

impl FromRequestParts<Arc<AppState>> for CurrentIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session_user_id = cookie_value(&parts.headers, USER_COOKIE_NAME);
        let identity = state.identity_provider.resolve(session_user_id).await?;
        Ok(CurrentIdentity(identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(values: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for v in values {
            map.append(COOKIE, HeaderValue::from_str(v).unwrap());
        }
        map
    }

    #[test]
    fn test_cookie_value_finds_named_cookie() {
        let map = headers(&["theme=dark; ferion_user_id=u-42; other=1"]);
        assert_eq!(cookie_value(&map, USER_COOKIE_NAME), Some("u-42"));
    }

    #[test]
    fn test_cookie_value_across_headers_and_missing() {
        let map = headers(&["theme=dark", "ferion_user_id=\"u-7\""]);
        assert_eq!(cookie_value(&map, USER_COOKIE_NAME), Some("u-7"));
        assert_eq!(cookie_value(&headers(&["theme=dark"]), USER_COOKIE_NAME), None);
        assert_eq!(cookie_value(&headers(&["ferion_user_id="]), USER_COOKIE_NAME), None);
    }

    #[test]
    fn test_session_cookie_round_trips_through_cookie_header() {
        let value = session_cookie("u-42").unwrap();
        let value = value.to_str().unwrap();
        assert!(value.contains("Max-Age=604800"));
        assert!(value.contains("HttpOnly"));

        let pair = value.split(';').next().unwrap();
        let map = headers(&[pair]);
        assert_eq!(cookie_value(&map, USER_COOKIE_NAME), Some("u-42"));
    }

    #[test]
    fn test_expired_cookie_targets_session_cookie() {
        let value = expired_session_cookie();
        let value = value.to_str().unwrap();
        assert!(value.starts_with(&format!("{}=;", USER_COOKIE_NAME)));
        assert!(value.contains("Max-Age=0"));
    }
}
