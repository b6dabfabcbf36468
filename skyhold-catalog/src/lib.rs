pub mod admin;
pub mod catalog;
pub mod inventory;
pub mod seed;

pub use admin::CatalogEditor;
pub use catalog::FlightCatalog;
pub use inventory::{HoldStatus, SeatHold};

use skyhold_shared::FlightId;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Flight not found: {0}")]
    NotFound(FlightId),

    #[error("No seats left on flight {0}")]
    SoldOut(FlightId),

    #[error("Seat hold not found: {0}")]
    HoldNotFound(Uuid),

    #[error("Attempt {attempt_id} already holds a seat on flight {held}")]
    HoldConflict { attempt_id: Uuid, held: FlightId },

    #[error("Catalog administration requires the admin role")]
    Forbidden,

    #[error("Invalid flight: {0}")]
    InvalidDraft(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
