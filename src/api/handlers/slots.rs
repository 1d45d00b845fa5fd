use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated::ValidJson;
use crate::api::extractors::actor::CurrentActor;
use crate::api::dtos::requests::{CreateSlotRequest, UpdateSlotRequest};
use crate::domain::services::availability::{NewTemplate, TemplatePatch};
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_slots(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, AppError> {
    let slots = state.template_service.list(actor.coach_id()?).await?;
    Ok(Json(slots))
}

pub async fn create_slot(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidJson(payload): ValidJson<CreateSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.template_service.create(actor.coach_id()?, NewTemplate {
        day_of_week: payload.day_of_week,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        is_recurring: payload.is_recurring,
        specific_date: payload.specific_date,
        max_capacity: payload.max_players,
    }).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_slot(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateSlotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.template_service.update(&id, actor.coach_id()?, TemplatePatch {
        day_of_week: payload.day_of_week,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        is_recurring: payload.is_recurring,
        specific_date: payload.specific_date,
        max_capacity: payload.max_players,
    }).await?;

    Ok(Json(updated))
}

pub async fn delete_slot(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.template_service.soft_delete(&id, actor.coach_id()?).await?;
    Ok(StatusCode::NO_CONTENT)
}
