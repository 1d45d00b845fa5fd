use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::api::extractors::auth::AuthUser;
use crate::domain::models::auth::Actor;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;

/// Authenticated caller resolved to the coach or parent profile they act as.
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let actor = app_state.identity.resolve(&user.user_id, user.role).await?;
        Ok(CurrentActor(actor))
    }
}
