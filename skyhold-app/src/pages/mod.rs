pub mod admin;
pub mod booking;
pub mod home;

pub use admin::AdminPage;
pub use booking::BookingPage;
pub use home::HomePage;
