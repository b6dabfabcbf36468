pub mod countdown;
pub mod models;
pub mod rules;
pub mod summary;
pub mod wizard;

pub use countdown::{format_remaining, Countdown};
pub use models::{BookingStep, Confirmation, PassengerDetails, PassengerField, Reservation};
pub use rules::{BookingRules, ExpiryPolicy};
pub use summary::{BookingSummary, CountdownView};
pub use wizard::{BookingWizard, ExpiredHold, TickOutcome};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0} is required")]
    Validation(PassengerField),

    #[error("Invalid booking step transition from {from} to {to}")]
    InvalidTransition {
        from: BookingStep,
        to: BookingStep,
    },

    #[error("Seat reservation has expired")]
    Expired,
}

pub type BookingResult<T> = Result<T, BookingError>;
