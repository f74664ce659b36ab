use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState};

/// Extracts and validates the Bearer token, yielding the user ID.
#[derive(Debug)]
pub struct AuthUser(pub Uuid);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization header".into()))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token = bearer_token(parts)?;
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            AppError::Unauthorized("Invalid or expired token".into())
        })?;
        Ok(AuthUser(claims.sub))
    }
}

/// Gate for the catalog and user routes. The original deployment never wired
/// token checks to these routes; enforcement is a deployment decision via
/// AUTH_REQUIRED rather than something added silently.
#[derive(Debug)]
pub struct AuthGate;

#[async_trait]
impl FromRequestParts<AppState> for AuthGate {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if !state.config.auth_required {
            return Ok(AuthGate);
        }
        AuthUser::from_request_parts(parts, state).await?;
        Ok(AuthGate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{Request, StatusCode},
        response::IntoResponse,
    };

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/users");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        let (parts, _) = builder.body(()).expect("request").into_parts();
        parts
    }

    #[tokio::test]
    async fn gate_is_open_when_auth_not_required() {
        let state = AppState::fake();
        let mut parts = parts_with_header(None);
        assert!(AuthGate::from_request_parts(&mut parts, &state).await.is_ok());
    }

    #[tokio::test]
    async fn gate_rejects_missing_token_when_required() {
        let mut state = AppState::fake();
        let mut config = (*state.config).clone();
        config.auth_required = true;
        state.config = std::sync::Arc::new(config);

        let mut parts = parts_with_header(None);
        let err = AuthGate::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejected");
        assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn gate_rejection_has_json_error_shape() {
        let mut state = AppState::fake();
        let mut config = (*state.config).clone();
        config.auth_required = true;
        state.config = std::sync::Arc::new(config);

        let mut parts = parts_with_header(Some("Bearer not.a.jwt"));
        let err = AuthGate::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejected");

        let res = err.into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(body["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn auth_user_accepts_valid_bearer_token() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "A", "a@x.com").expect("sign");

        let mut parts = parts_with_header(Some(&format!("Bearer {}", token)));
        let AuthUser(got) = AuthUser::from_request_parts(&mut parts, &state)
            .await
            .expect("accepted");
        assert_eq!(got, user_id);
    }

    #[tokio::test]
    async fn auth_user_rejects_garbage_token() {
        let state = AppState::fake();
        let mut parts = parts_with_header(Some("Bearer not.a.jwt"));
        assert!(AuthUser::from_request_parts(&mut parts, &state).await.is_err());
    }
}
