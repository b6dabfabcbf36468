pub mod events;
pub mod flight;
pub mod user;
