use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::auth::{Claims, Role};
use crate::error::AppError;
use std::sync::Arc;
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::{debug, Span};

/// Caller identity taken from a verified `Authorization: Bearer` token.
pub struct AuthUser {
    pub user_id: String,
    pub role: Role,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts.headers.get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let decoding_key = DecodingKey::from_secret(app_state.config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&app_state.config.auth_issuer]);
        validation.set_audience(&[&app_state.config.auth_audience]);

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                AppError::Unauthorized
            })?;

        let claims = token_data.claims;
        Span::current().record("user_id", claims.sub.as_str());
        Span::current().record("role", claims.role.as_str());

        Ok(AuthUser { user_id: claims.sub, role: claims.role })
    }
}
