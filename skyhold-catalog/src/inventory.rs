use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyhold_shared::FlightId;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{CatalogError, CatalogResult, FlightCatalog};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldStatus {
    Held,
    Committed,
}

/// One seat taken out of availability on behalf of a booking attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatHold {
    pub attempt_id: Uuid,
    pub flight_id: FlightId,
    pub held_until: DateTime<Utc>,
    pub status: HoldStatus,
}

/// Seat hold ledger. Every operation is keyed by the booking attempt id so a
/// retried call never moves availability twice.
impl FlightCatalog {
    /// Take one seat out of availability until `held_until`.
    pub fn hold_seat(
        &mut self,
        flight_id: &FlightId,
        attempt_id: Uuid,
        held_until: DateTime<Utc>,
    ) -> CatalogResult<()> {
        if let Some(existing) = self.holds.get_mut(&attempt_id) {
            if &existing.flight_id != flight_id {
                return Err(CatalogError::HoldConflict {
                    attempt_id,
                    held: existing.flight_id.clone(),
                });
            }
            if existing.status == HoldStatus::Held {
                existing.held_until = held_until;
            }
            debug!(%attempt_id, %flight_id, "Seat hold already recorded");
            return Ok(());
        }

        let flight = self
            .get_mut(flight_id)
            .ok_or_else(|| CatalogError::NotFound(flight_id.clone()))?;

        if flight.available_seats == 0 {
            return Err(CatalogError::SoldOut(flight_id.clone()));
        }
        flight.available_seats -= 1;

        self.holds.insert(
            attempt_id,
            SeatHold {
                attempt_id,
                flight_id: flight_id.clone(),
                held_until,
                status: HoldStatus::Held,
            },
        );
        info!(%attempt_id, %flight_id, %held_until, "Seat held");
        Ok(())
    }

    /// Return a held seat to availability. Returns `false` when there was
    /// nothing to release (unknown attempt or already committed).
    pub fn release_seat(&mut self, attempt_id: &Uuid) -> bool {
        match self.holds.get(attempt_id) {
            Some(hold) if hold.status == HoldStatus::Held => {}
            _ => return false,
        }
        let Some(hold) = self.holds.remove(attempt_id) else {
            return false;
        };

        // The flight may have been deleted while the hold was active.
        if let Some(flight) = self.get_mut(&hold.flight_id) {
            flight.available_seats = (flight.available_seats + 1).min(flight.total_seats);
        }
        info!(attempt_id = %hold.attempt_id, flight_id = %hold.flight_id, "Seat released");
        true
    }

    /// Convert a hold into a sold seat. The committed entry stays in the ledger
    /// so a retried commit or hold for the same attempt is a no-op; the ledger
    /// lives only as long as the process.
    pub fn commit_seat(&mut self, attempt_id: &Uuid) -> CatalogResult<()> {
        let hold = self
            .holds
            .get_mut(attempt_id)
            .ok_or(CatalogError::HoldNotFound(*attempt_id))?;

        if hold.status == HoldStatus::Held {
            hold.status = HoldStatus::Committed;
            info!(%attempt_id, flight_id = %hold.flight_id, "Seat committed");
        }
        Ok(())
    }

    /// Release every hold whose deadline passed without a commit.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>) -> usize {
        let lapsed: Vec<Uuid> = self
            .holds
            .values()
            .filter(|h| h.status == HoldStatus::Held && h.held_until <= now)
            .map(|h| h.attempt_id)
            .collect();

        lapsed.iter().filter(|id| self.release_seat(id)).count()
    }

    pub fn hold(&self, attempt_id: &Uuid) -> Option<&SeatHold> {
        self.holds.get(attempt_id)
    }

    pub fn active_holds(&self, flight_id: &FlightId) -> usize {
        self.holds
            .values()
            .filter(|h| &h.flight_id == flight_id && h.status == HoldStatus::Held)
            .count()
    }
}
