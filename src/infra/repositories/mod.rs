pub mod sqlite_booking_repo;
pub mod sqlite_player_repo;
pub mod sqlite_profile_repo;
pub mod sqlite_report_repo;
pub mod sqlite_session_repo;
pub mod sqlite_template_repo;

pub mod postgres_booking_repo;
pub mod postgres_player_repo;
pub mod postgres_profile_repo;
pub mod postgres_report_repo;
pub mod postgres_session_repo;
pub mod postgres_template_repo;
