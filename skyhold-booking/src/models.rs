use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skyhold_shared::{FlightId, Masked};
use std::fmt;
use uuid::Uuid;

use crate::{BookingError, BookingResult};

/// Wizard step, as rendered by the presentation layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStep {
    Reserve,
    PassengerDetails,
    Payment,
    Confirmed,
}

impl fmt::Display for BookingStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingStep::Reserve => "RESERVE",
            BookingStep::PassengerDetails => "PASSENGER_DETAILS",
            BookingStep::Payment => "PAYMENT",
            BookingStep::Confirmed => "CONFIRMED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassengerField {
    FirstName,
    LastName,
    Email,
    Phone,
    DateOfBirth,
}

impl fmt::Display for PassengerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PassengerField::FirstName => "First Name",
            PassengerField::LastName => "Last Name",
            PassengerField::Email => "Email",
            PassengerField::Phone => "Phone Number",
            PassengerField::DateOfBirth => "Date of Birth",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PassengerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: Masked<String>,
    pub phone: Masked<String>,
    pub date_of_birth: Masked<String>,
}

impl PassengerDetails {
    /// Required-field check only: every field must be non-blank.
    pub fn validate(&self) -> BookingResult<()> {
        let fields = [
            (PassengerField::FirstName, self.first_name.as_str()),
            (PassengerField::LastName, self.last_name.as_str()),
            (PassengerField::Email, self.email.expose().as_str()),
            (PassengerField::Phone, self.phone.expose().as_str()),
            (PassengerField::DateOfBirth, self.date_of_birth.expose().as_str()),
        ];
        match fields.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(BookingError::Validation(*field)),
            None => Ok(()),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An active seat hold owned by one booking attempt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reservation {
    pub attempt_id: Uuid,
    pub flight_id: FlightId,
    pub reserved_at: DateTime<Utc>,
    pub reserved_until: DateTime<Utc>,
}

impl Reservation {
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.reserved_until <= now
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confirmation {
    pub booking_id: Uuid,
    pub attempt_id: Uuid,
    pub flight_id: FlightId,
    pub passenger: PassengerDetails,
    pub amount: i32,
    pub confirmed_at: DateTime<Utc>,
}
