use skyhold_booking::BookingError;
use skyhold_catalog::CatalogError;
use skyhold_core::CoreError;
use skyhold_shared::FlightId;
use skyhold_store::StoreError;

/// Everything a page operation can fail with. Apart from `Io`, none end the
/// program; the shell reports them and stays on a known-good screen.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please sign in to continue")]
    Unauthenticated,

    #[error("Admin access required")]
    Forbidden,

    #[error("Flight not found: {0}")]
    FlightNotFound(FlightId),

    #[error("No booking in progress")]
    NoActiveBooking,

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Hold timer needs a Tokio runtime: {0}")]
    TimerUnavailable(#[from] tokio::runtime::TryCurrentError),

    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
