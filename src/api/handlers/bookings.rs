use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated::{ValidJson, ValidQuery};
use crate::api::extractors::actor::CurrentActor;
use crate::api::dtos::requests::{BookingQuery, CreateBookingRequest};
use crate::domain::models::auth::Role;
use crate::domain::services::bookings::BookingRequest;
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidJson(payload): ValidJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.booking_service.create(actor.parent_id()?, BookingRequest {
        session_id: payload.session_id,
        player_id: payload.player_id,
        notes: payload.notes,
    }).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// Coaches get their pending requests, parents their own bookings.
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidQuery(query): ValidQuery<BookingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = match actor.role {
        Role::Coach => state.booking_service.pending_for_coach(actor.coach_id()?).await?,
        Role::Parent => {
            let today = Utc::now().date_naive();
            state.booking_service
                .for_parent(actor.parent_id()?, query.status, query.upcoming.unwrap_or(false), today)
                .await?
        }
        Role::Admin => return Err(AppError::Forbidden("Coach or parent access required".into())),
    };
    Ok(Json(bookings))
}

pub async fn pending_bookings(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_service.pending_for_coach(actor.coach_id()?).await?;
    Ok(Json(bookings))
}

pub async fn session_bookings(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_service.for_session(&session_id, &actor).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.get(&id, &actor).await?;
    Ok(Json(booking))
}

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let confirmed = state.booking_service.confirm(&id, actor.coach_id()?).await?;
    Ok(Json(confirmed))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let cancelled = state.booking_service.cancel(&id, &actor).await?;
    Ok(Json(cancelled))
}

pub async fn mark_no_show(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.booking_service.mark_no_show(&id, actor.coach_id()?).await?;
    Ok(Json(updated))
}
