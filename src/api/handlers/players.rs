use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated::{ValidJson, ValidQuery};
use crate::api::extractors::actor::CurrentActor;
use crate::api::dtos::requests::{AssignParentRequest, CreatePlayerRequest, PlayerQuery};
use crate::domain::models::auth::Role;
use crate::domain::services::players::NewPlayer;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidJson(payload): ValidJson<CreatePlayerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.player_service.create(actor.coach_id()?, NewPlayer {
        first_name: payload.first_name,
        last_name: payload.last_name,
        date_of_birth: payload.date_of_birth,
        position: payload.position,
        preferred_foot: payload.preferred_foot,
        height_cm: payload.height_cm,
        weight_kg: payload.weight_kg,
        notes: payload.notes,
        parent_id: payload.parent_id,
    }).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_players(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidQuery(query): ValidQuery<PlayerQuery>,
) -> Result<impl IntoResponse, AppError> {
    let players = match actor.role {
        Role::Coach => {
            state.player_service
                .list_for_coach(actor.coach_id()?, query.include_inactive.unwrap_or(false))
                .await?
        }
        Role::Parent => state.player_service.list_for_parent(actor.parent_id()?).await?,
        Role::Admin => return Err(AppError::Forbidden("Coach or parent access required".into())),
    };
    Ok(Json(players))
}

pub async fn assign_parent(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<AssignParentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.player_service.assign_parent(&id, actor.coach_id()?, payload.parent_id).await?;
    Ok(Json(updated))
}

pub async fn deactivate_player(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.player_service.deactivate(&id, actor.coach_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
