use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated::ValidJson;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::RegisterProfileRequest;
use crate::domain::services::identity::RegisterProfile;
use crate::error::AppError;
use std::sync::Arc;

/// Works before a profile exists, so it only needs a valid token.
pub async fn register_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ValidJson(payload): ValidJson<RegisterProfileRequest>,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.identity.register(&user.user_id, user.role, RegisterProfile {
        display_name: payload.display_name,
        email: payload.email,
        phone: payload.phone,
    }).await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn my_profile(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let profile = state.identity.current_profile(&user.user_id, user.role).await?;
    Ok(Json(profile))
}
