pub mod models;
pub mod pii;

pub use models::events::{Notification, NotificationKind};
pub use models::flight::{Flight, FlightDraft, FlightId, Leg};
pub use models::user::{Role, User};
pub use pii::Masked;
