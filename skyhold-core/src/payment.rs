use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyhold_shared::Masked;
use uuid::Uuid;

use crate::CoreResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Succeeded,
    Declined,
}

/// Card fields as typed on the payment step. They are presentation-only:
/// nothing here checks card-number or expiry formats.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaymentDetails {
    pub card_number: Masked<String>,
    pub expiry: Masked<String>,
    pub cvv: Masked<String>,
    pub cardholder_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub reference: String,
    pub attempt_id: Uuid,
    pub amount: i32,
    pub status: PaymentStatus,
    pub processed_at: DateTime<Utc>,
}

/// Runs between "Confirm Booking" and the terminal `Confirmed` state.
#[async_trait]
pub trait PaymentAuthorizer: Send + Sync {
    /// Authorize `amount` for the given booking attempt. Implementations must
    /// be idempotent per `attempt_id`.
    async fn authorize(
        &self,
        attempt_id: Uuid,
        amount: i32,
        details: &PaymentDetails,
    ) -> CoreResult<PaymentReceipt>;
}

/// Approves every payment without looking at the card fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllAuthorizer;

#[async_trait]
impl PaymentAuthorizer for AcceptAllAuthorizer {
    async fn authorize(
        &self,
        attempt_id: Uuid,
        amount: i32,
        details: &PaymentDetails,
    ) -> CoreResult<PaymentReceipt> {
        tracing::info!(%attempt_id, amount, card = ?details.card_number, "Authorizing mock payment");

        Ok(PaymentReceipt {
            reference: format!("mock-{}", attempt_id),
            attempt_id,
            amount,
            status: PaymentStatus::Succeeded,
            processed_at: Utc::now(),
        })
    }
}
