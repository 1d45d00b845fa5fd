use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{bookings, health, players, profiles, reports, sessions, slots};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Profiles
        .route("/api/v1/profiles", post(profiles::register_profile))
        .route("/api/v1/profiles/me", get(profiles::my_profile))

        // Availability slots
        .route("/api/v1/sessions/slots", get(slots::list_slots).post(slots::create_slot))
        .route("/api/v1/sessions/slots/{id}", put(slots::update_slot).delete(slots::delete_slot))

        // Sessions
        .route("/api/v1/sessions/generate", post(sessions::generate_sessions))
        .route("/api/v1/sessions", get(sessions::list_sessions).post(sessions::create_session))
        .route("/api/v1/sessions/upcoming", get(sessions::upcoming_sessions))
        .route("/api/v1/sessions/{id}", get(sessions::get_session).put(sessions::update_session))
        .route("/api/v1/sessions/{id}/status", put(sessions::update_session_status))
        .route("/api/v1/sessions/{id}/cancel", post(sessions::cancel_session))

        // Bookings
        .route("/api/v1/bookings", post(bookings::create_booking).get(bookings::list_bookings))
        .route("/api/v1/bookings/pending", get(bookings::pending_bookings))
        .route("/api/v1/bookings/session/{session_id}", get(bookings::session_bookings))
        .route("/api/v1/bookings/{id}", get(bookings::get_booking))
        .route("/api/v1/bookings/{id}/confirm", post(bookings::confirm_booking))
        .route("/api/v1/bookings/{id}/cancel", post(bookings::cancel_booking))
        .route("/api/v1/bookings/{id}/no-show", post(bookings::mark_no_show))

        // Players
        .route("/api/v1/players", post(players::create_player).get(players::list_players))
        .route("/api/v1/players/{id}", delete(players::deactivate_player))
        .route("/api/v1/players/{id}/parent", put(players::assign_parent))

        // Session reports
        .route("/api/v1/reports", post(reports::create_report))
        .route("/api/v1/reports/{id}", put(reports::update_report))
        .route("/api/v1/reports/session/{session_id}", get(reports::session_reports))
        .route("/api/v1/reports/player/{player_id}", get(reports::player_reports))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        user_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
