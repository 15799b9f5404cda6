use crate::auth::models::CallerIdentity;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tubely_core::AppError;

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let missing = || AppError::Unauthorized("Couldn't find JWT".to_string());
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(missing)?;
    let (scheme, token) = value.trim().split_once(' ').ok_or_else(missing)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(missing());
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(missing());
    }
    Ok(token)
}

pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let caller = match bearer_token(request.headers()) {
        Ok(token) => state.authenticator.authenticate(token).await,
        Err(err) => Err(err),
    };

    match caller {
        Ok(caller) => {
            tracing::debug!(user_id = %caller.user_id, "Authenticated request");
            request.extensions_mut().insert::<CallerIdentity>(caller);
            next.run(request).await
        }
        Err(err) => HttpAppError(err).into_response(),
    }
}
