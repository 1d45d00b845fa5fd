pub mod auth;
pub mod availability;
pub mod booking;
pub mod notice;
pub mod player;
pub mod profile;
pub mod report;
pub mod session;
