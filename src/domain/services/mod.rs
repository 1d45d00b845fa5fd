pub mod availability;
pub mod bookings;
pub mod generator;
pub mod identity;
pub mod notification;
pub mod players;
pub mod reports;
pub mod sessions;
