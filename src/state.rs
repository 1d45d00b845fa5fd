use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    BookingRepository, Notifier, PlayerRepository, ProfileRepository, ReportRepository,
    SessionRepository, TemplateRepository,
};
use crate::domain::services::{
    availability::TemplateService, bookings::BookingService, generator::SessionGenerator,
    identity::IdentityResolver, notification::NotificationDispatcher, players::PlayerService,
    reports::ReportService, sessions::SessionService,
};

/// One adapter per port, all sharing the same pool.
#[derive(Clone)]
pub struct Repositories {
    pub profiles: Arc<dyn ProfileRepository>,
    pub players: Arc<dyn PlayerRepository>,
    pub templates: Arc<dyn TemplateRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub reports: Arc<dyn ReportRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub identity: Arc<IdentityResolver>,
    pub template_service: Arc<TemplateService>,
    pub generator: Arc<SessionGenerator>,
    pub session_service: Arc<SessionService>,
    pub booking_service: Arc<BookingService>,
    pub player_service: Arc<PlayerService>,
    pub report_service: Arc<ReportService>,
}

impl AppState {
    pub fn new(config: Config, repos: Repositories, notifier: Arc<dyn Notifier>) -> Self {
        let notifications = NotificationDispatcher::new(repos.bookings.clone(), notifier);

        Self {
            config,
            identity: Arc::new(IdentityResolver::new(repos.profiles.clone())),
            template_service: Arc::new(TemplateService::new(repos.templates.clone())),
            generator: Arc::new(SessionGenerator::new(repos.templates.clone(), repos.sessions.clone())),
            session_service: Arc::new(SessionService::new(
                repos.sessions.clone(),
                repos.bookings.clone(),
                repos.reports.clone(),
                notifications.clone(),
            )),
            booking_service: Arc::new(BookingService::new(
                repos.bookings.clone(),
                repos.sessions.clone(),
                repos.players.clone(),
                notifications,
            )),
            report_service: Arc::new(ReportService::new(
                repos.reports,
                repos.sessions.clone(),
                repos.players.clone(),
            )),
            player_service: Arc::new(PlayerService::new(repos.players, repos.profiles)),
        }
    }
}
