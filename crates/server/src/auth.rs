//! Caller identity from upstream-authenticated headers.
use std::convert::Infallible;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use catalog::Caller;

use crate::errors::JsonApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Required identity for mutating endpoints.
/// Missing headers reject with 401, a non-numeric user id with 400.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Caller);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim);

        let (Some(raw_id), Some(role)) = (header(USER_ID_HEADER), header(USER_ROLE_HEADER)) else {
            return Err(JsonApiError::unauthorized("missing X-User-ID or X-User-Role header"));
        };
        let user_id = raw_id
            .parse::<i64>()
            .map_err(|_| JsonApiError::bad_request(format!("invalid X-User-ID: {raw_id:?}")))?;
        Ok(AuthUser(Caller::new(user_id, role)))
    }
}

/// Optional caller id on public reads, used only for price personalisation.
/// Anything that is not a positive integer is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaybeUserId(pub Option<i64>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUserId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|id| *id > 0);
        Ok(MaybeUserId(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut b = Request::builder().uri("/");
        for (k, v) in headers {
            b = b.header(*k, *v);
        }
        b.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn extracts_caller() {
        let mut p = parts(&[("X-User-ID", "42"), ("X-User-Role", "superuser")]);
        let AuthUser(caller) = AuthUser::from_request_parts(&mut p, &()).await.unwrap();
        assert_eq!(caller.user_id, 42);
        assert!(caller.is_superuser());
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let mut p = parts(&[("X-User-ID", "42")]);
        let err = AuthUser::from_request_parts(&mut p, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_numeric_id_is_bad_request() {
        let mut p = parts(&[("X-User-ID", "abc"), ("X-User-Role", "manager")]);
        let err = AuthUser::from_request_parts(&mut p, &()).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn optional_user_id_ignores_garbage() {
        for (raw, expected) in [("7", Some(7)), ("0", None), ("-3", None), ("x", None)] {
            let mut p = parts(&[("X-User-ID", raw)]);
            let MaybeUserId(id) = MaybeUserId::from_request_parts(&mut p, &()).await.unwrap();
            assert_eq!(id, expected, "{raw}");
        }
        let mut p = parts(&[]);
        assert_eq!(MaybeUserId::from_request_parts(&mut p, &()).await.unwrap().0, None);
    }
}
