use axum::{extract::{State, Path}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::validated::{ValidJson, ValidQuery};
use crate::api::extractors::actor::CurrentActor;
use crate::api::dtos::requests::{CreateReportRequest, LimitQuery, UpdateReportRequest};
use crate::domain::models::report::ReportPatch;
use crate::domain::services::reports::NewReport;
use crate::error::AppError;
use std::sync::Arc;

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    ValidJson(payload): ValidJson<CreateReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let created = state.report_service.create(actor.coach_id()?, NewReport {
        session_id: payload.session_id,
        player_id: payload.player_id,
        effort_rating: payload.effort_rating,
        focus_rating: payload.focus_rating,
        technical_rating: payload.technical_rating,
        highlights: payload.highlights,
        improvements: payload.improvements,
        coach_notes: payload.coach_notes,
        player_feedback: payload.player_feedback,
        drills_completed: payload.drills_completed,
        focus_areas: payload.focus_areas,
        attendance: payload.attendance,
    }).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_report(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateReportRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.report_service.update(&id, actor.coach_id()?, ReportPatch {
        effort_rating: payload.effort_rating,
        focus_rating: payload.focus_rating,
        technical_rating: payload.technical_rating,
        highlights: payload.highlights,
        improvements: payload.improvements,
        coach_notes: payload.coach_notes,
        player_feedback: payload.player_feedback,
        drills_completed: payload.drills_completed,
        focus_areas: payload.focus_areas,
        attendance: payload.attendance,
    }).await?;

    Ok(Json(updated))
}

pub async fn session_reports(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let reports = state.report_service.for_session(&session_id, &actor).await?;
    Ok(Json(reports))
}

pub async fn player_reports(
    State(state): State<Arc<AppState>>,
    CurrentActor(actor): CurrentActor,
    Path(player_id): Path<String>,
    ValidQuery(query): ValidQuery<LimitQuery>,
) -> Result<impl IntoResponse, AppError> {
    let reports = state.report_service.for_player(&player_id, &actor, query.limit).await?;
    Ok(Json(reports))
}
