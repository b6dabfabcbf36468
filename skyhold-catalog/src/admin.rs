use skyhold_shared::{Flight, FlightDraft, FlightId, User};
use tracing::info;

use crate::{CatalogError, CatalogResult, FlightCatalog};

/// Create/update/delete access to the catalog. Only obtainable by an admin.
pub struct CatalogEditor<'a> {
    catalog: &'a mut FlightCatalog,
    actor: &'a User,
}

impl<'a> CatalogEditor<'a> {
    pub fn new(catalog: &'a mut FlightCatalog, actor: Option<&'a User>) -> CatalogResult<Self> {
        match actor {
            Some(user) if user.is_admin() => Ok(Self {
                catalog,
                actor: user,
            }),
            _ => Err(CatalogError::Forbidden),
        }
    }

    /// Append a new flight with a fresh id and every seat available.
    pub fn create(&mut self, draft: FlightDraft) -> CatalogResult<Flight> {
        validate_draft(&draft)?;

        let flight = Flight::from_draft(FlightId::generate(), draft);
        info!(admin = %self.actor.id, flight_id = %flight.id, name = %flight.name, "Flight added");
        self.catalog.flights.push(flight.clone());
        Ok(flight)
    }

    /// Replace the mutable fields of `id`. Returns `Ok(false)` and leaves the
    /// catalog untouched when no such flight exists.
    pub fn update(&mut self, id: &FlightId, draft: FlightDraft) -> CatalogResult<bool> {
        validate_draft(&draft)?;

        match self.catalog.get_mut(id) {
            Some(flight) => {
                flight.apply_draft(draft);
                info!(admin = %self.actor.id, flight_id = %id, "Flight updated");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &FlightId) -> bool {
        let before = self.catalog.flights.len();
        self.catalog.flights.retain(|f| &f.id != id);
        let removed = self.catalog.flights.len() != before;
        if removed {
            info!(admin = %self.actor.id, flight_id = %id, "Flight deleted");
        }
        removed
    }
}

fn validate_draft(draft: &FlightDraft) -> CatalogResult<()> {
    if draft.name.trim().is_empty() {
        return Err(CatalogError::InvalidDraft("flight number is required".to_string()));
    }
    if draft.airline.trim().is_empty() {
        return Err(CatalogError::InvalidDraft("airline is required".to_string()));
    }
    if draft.price < 0 {
        return Err(CatalogError::InvalidDraft("price must not be negative".to_string()));
    }
    if draft.total_seats == 0 {
        return Err(CatalogError::InvalidDraft("total seats must be positive".to_string()));
    }
    Ok(())
}
