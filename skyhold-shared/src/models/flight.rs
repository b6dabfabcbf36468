use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Catalog identifier of a flight. Seed data uses short ids ("1", "2"),
/// records created through the admin editor get a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(pub String);

impl FlightId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FlightId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// One end of a flight: where and when.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Leg {
    pub airport: String,
    pub city: String,
    pub time: NaiveTime,
    pub date: NaiveDate,
}

impl Leg {
    /// "New York (JFK)"
    pub fn place_label(&self) -> String {
        format!("{} ({})", self.city, self.airport)
    }

    /// "2024-02-15 at 08:30"
    pub fn schedule_label(&self) -> String {
        format!("{} at {}", self.date.format("%Y-%m-%d"), self.time.format("%H:%M"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Flight {
    pub id: FlightId,
    /// Flight number, e.g. "AA101".
    pub name: String,
    pub airline: String,
    pub departure: Leg,
    pub arrival: Leg,
    /// Display string, e.g. "6h 15m".
    pub duration: String,
    pub price: i32,
    pub available_seats: u32,
    pub total_seats: u32,
    pub aircraft: String,
}

impl Flight {
    /// Builds a fresh record from a draft; every seat starts available.
    pub fn from_draft(id: FlightId, draft: FlightDraft) -> Self {
        Self {
            id,
            name: draft.name,
            airline: draft.airline,
            departure: draft.departure,
            arrival: draft.arrival,
            duration: draft.duration,
            price: draft.price,
            available_seats: draft.total_seats,
            total_seats: draft.total_seats,
            aircraft: draft.aircraft,
        }
    }

    /// Replaces every mutable field. Availability is kept but clamped so it
    /// never exceeds the new capacity.
    pub fn apply_draft(&mut self, draft: FlightDraft) {
        self.name = draft.name;
        self.airline = draft.airline;
        self.departure = draft.departure;
        self.arrival = draft.arrival;
        self.duration = draft.duration;
        self.price = draft.price;
        self.total_seats = draft.total_seats;
        self.available_seats = self.available_seats.min(draft.total_seats);
        self.aircraft = draft.aircraft;
    }

    /// "JFK → LAX"
    pub fn route_label(&self) -> String {
        format!("{} → {}", self.departure.airport, self.arrival.airport)
    }

    pub fn to_draft(&self) -> FlightDraft {
        FlightDraft {
            name: self.name.clone(),
            airline: self.airline.clone(),
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
            duration: self.duration.clone(),
            price: self.price,
            total_seats: self.total_seats,
            aircraft: self.aircraft.clone(),
        }
    }
}

/// Editable fields of a flight, as entered in the admin form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlightDraft {
    pub name: String,
    pub airline: String,
    pub departure: Leg,
    pub arrival: Leg,
    pub duration: String,
    pub price: i32,
    pub total_seats: u32,
    pub aircraft: String,
}
