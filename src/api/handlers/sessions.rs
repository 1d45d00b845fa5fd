use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated::{ValidJson, ValidQuery};
use crate::api::extractors::actor::CurrentActor;
use crate::api::dtos::requests::{
    CreateSessionRequest, GenerateSessionsRequest, LimitQuery, SessionQuery, UpdateSessionRequest,
    UpdateSessionStatusRequest,
};
use crate::api::dtos::responses::SessionListing;
use crate::domain::models::{auth::Role, session::{AvailabilityFilter, SessionFilter}};
use crate::domain::services::sessions::{NewSession, SessionPatch};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;

pub async fn generate_sessions(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    payload: Option<ValidJson<GenerateSessionsRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let weeks_ahead = payload
        .and_then(|ValidJson(body)| body.weeks_ahead)
        .unwrap_or(state.config.default_weeks_ahead);
    let today = Utc::now().date_naive();

    let result = state.generator.generate(actor.coach_id()?, weeks_ahead, today).await?;
    Ok(Json(result))
}

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidQuery(query): ValidQuery<SessionQuery>,
) -> Result<impl IntoResponse, AppError> {
    if actor.role == Role::Coach {
        let sessions = state.session_service.list_for_coach(actor.coach_id()?, SessionFilter {
            status: query.status,
            from: query.from,
            to: query.to,
            limit: query.limit,
        }).await?;
        return Ok(Json(SessionListing::Own(sessions)));
    }

    let today = Utc::now().date_naive();
    let available = state.session_service.available(AvailabilityFilter {
        from: query.from.map_or(today, |from| from.max(today)),
        to: query.to,
        location: query.location,
    }).await?;
    Ok(Json(SessionListing::Available(available)))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidJson(payload): ValidJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.session_service.create(actor.coach_id()?, NewSession {
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        session_type: payload.session_type,
        max_capacity: payload.max_capacity,
        notes: payload.notes,
    }).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn upcoming_sessions(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidQuery(query): ValidQuery<LimitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let today = Utc::now().date_naive();
    let sessions = state.session_service.upcoming(actor.coach_id()?, query.limit, today).await?;
    Ok(Json(sessions))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = state.session_service.detail(&id, &actor).await?;
    Ok(Json(detail))
}

pub async fn update_session(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateSessionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.session_service.update(&id, actor.coach_id()?, SessionPatch {
        date: payload.date,
        start_time: payload.start_time,
        end_time: payload.end_time,
        location: payload.location,
        session_type: payload.session_type,
        max_capacity: payload.max_capacity,
        notes: payload.notes,
    }).await?;

    Ok(Json(updated))
}

pub async fn update_session_status(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateSessionStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.session_service.set_status(&id, actor.coach_id()?, payload.status).await?;
    Ok(Json(updated))
}

pub async fn cancel_session(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.session_service.cancel(&id, actor.coach_id()?).await?;
    Ok(Json(cancelled))
}
