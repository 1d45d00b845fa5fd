pub mod bookings;
pub mod health;
pub mod players;
pub mod profiles;
pub mod reports;
pub mod sessions;
pub mod slots;
