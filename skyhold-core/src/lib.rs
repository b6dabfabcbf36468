pub mod clock;
pub mod payment;
pub mod ports;
pub mod search;

pub use clock::{Clock, ManualClock, SystemClock};
pub use payment::{AcceptAllAuthorizer, PaymentAuthorizer, PaymentDetails, PaymentReceipt, PaymentStatus};
pub use ports::{CatalogProvider, Navigator, NotificationSink, Route, SessionProvider};
pub use search::{FlightFilter, PriceRange, SearchQuery};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Session error: {0}")]
    SessionError(String),
    #[error("Payment declined: {0}")]
    PaymentDeclined(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
