use skyhold_core::{CatalogProvider, SearchQuery};
use skyhold_shared::{Flight, FlightId};
use std::collections::HashMap;
use uuid::Uuid;

use crate::inventory::SeatHold;
use crate::seed;

/// In-memory flight list. Insertion order is the listing order.
#[derive(Debug, Clone, Default)]
pub struct FlightCatalog {
    pub(crate) flights: Vec<Flight>,
    pub(crate) holds: HashMap<Uuid, SeatHold>,
}

impl FlightCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flights(flights: Vec<Flight>) -> Self {
        Self {
            flights,
            holds: HashMap::new(),
        }
    }

    /// Catalog preloaded with the demo flights.
    pub fn with_seed_data() -> Self {
        Self::from_flights(seed::seed_flights())
    }

    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    pub fn get(&self, id: &FlightId) -> Option<&Flight> {
        self.flights.iter().find(|f| &f.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &FlightId) -> Option<&mut Flight> {
        self.flights.iter_mut().find(|f| &f.id == id)
    }

    pub fn filter<'a>(&'a self, query: &'a SearchQuery) -> impl Iterator<Item = &'a Flight> + 'a {
        self.flights.iter().filter(move |f| query.matches(f))
    }
}

impl CatalogProvider for FlightCatalog {
    fn find_by_id(&self, id: &FlightId) -> Option<Flight> {
        self.get(id).cloned()
    }

    fn list(&self, query: &SearchQuery) -> Vec<Flight> {
        self.filter(query).cloned().collect()
    }
}
