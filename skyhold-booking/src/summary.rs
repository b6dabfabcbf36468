use serde::Serialize;
use skyhold_shared::Flight;

use crate::models::BookingStep;
use crate::wizard::BookingWizard;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountdownView {
    /// "1:45"
    pub label: String,
    pub progress_percent: f64,
}

/// Everything the booking page shows next to the wizard form.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingSummary {
    pub flight_name: String,
    pub airline: String,
    pub aircraft: String,
    pub route: String,
    pub departure_place: String,
    pub departure_schedule: String,
    pub arrival_place: String,
    pub arrival_schedule: String,
    pub duration: String,
    pub step: BookingStep,
    pub seats_left: String,
    pub low_availability: bool,
    pub passenger_name: Option<String>,
    pub price: i32,
    pub total: i32,
    /// Present only while a hold is active.
    pub countdown: Option<CountdownView>,
}

impl BookingSummary {
    pub fn new(flight: &Flight, wizard: &BookingWizard) -> Self {
        let countdown = wizard.is_reserved().then(|| CountdownView {
            label: wizard.countdown().label(),
            progress_percent: wizard.countdown().progress_percent(),
        });

        Self {
            flight_name: flight.name.clone(),
            airline: flight.airline.clone(),
            aircraft: flight.aircraft.clone(),
            route: flight.route_label(),
            departure_place: flight.departure.place_label(),
            departure_schedule: flight.departure.schedule_label(),
            arrival_place: flight.arrival.place_label(),
            arrival_schedule: flight.arrival.schedule_label(),
            duration: flight.duration.clone(),
            step: wizard.step(),
            seats_left: format!("{} seats left", flight.available_seats),
            low_availability: flight.available_seats <= wizard.rules().low_seat_threshold,
            passenger_name: wizard.passenger().map(|p| p.full_name()),
            price: flight.price,
            // No taxes or fees on top of the fare.
            total: flight.price,
            countdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PassengerDetails;
    use crate::rules::BookingRules;
    use chrono::{Duration, NaiveDate, NaiveTime, Utc};
    use skyhold_shared::{FlightId, Leg, Masked};

    fn flight(available_seats: u32) -> Flight {
        let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        Flight {
            id: FlightId::from("1"),
            name: "AA101".to_string(),
            airline: "American Airlines".to_string(),
            departure: Leg {
                airport: "JFK".to_string(),
                city: "New York".to_string(),
                time: NaiveTime::from_hms_opt(8, 30, 0).unwrap(),
                date,
            },
            arrival: Leg {
                airport: "LAX".to_string(),
                city: "Los Angeles".to_string(),
                time: NaiveTime::from_hms_opt(11, 45, 0).unwrap(),
                date,
            },
            duration: "6h 15m".to_string(),
            price: 299,
            available_seats,
            total_seats: 180,
            aircraft: "Boeing 737".to_string(),
        }
    }

    #[test]
    fn test_summary_before_reservation() {
        let wizard = BookingWizard::new(FlightId::from("1"), BookingRules::default());
        let summary = BookingSummary::new(&flight(45), &wizard);

        assert_eq!(summary.route, "JFK → LAX");
        assert_eq!(summary.departure_place, "New York (JFK)");
        assert_eq!(summary.arrival_schedule, "2024-02-15 at 11:45");
        assert_eq!(summary.seats_left, "45 seats left");
        assert!(!summary.low_availability);
        assert_eq!(summary.step, BookingStep::Reserve);
        assert_eq!(summary.total, 299);
        assert!(summary.countdown.is_none());
        assert!(summary.passenger_name.is_none());
    }

    #[test]
    fn test_summary_while_reserved() {
        let now = Utc::now();
        let mut wizard = BookingWizard::new(FlightId::from("1"), BookingRules::default());
        wizard.reserve_seat(now).unwrap();
        wizard.tick(now + Duration::seconds(60));
        wizard
            .submit_passenger_details(PassengerDetails {
                first_name: "Jane".to_string(),
                last_name: "Roe".to_string(),
                email: Masked::from("jane@example.com"),
                phone: Masked::from("555-0100"),
                date_of_birth: Masked::from("1990-04-01"),
            })
            .unwrap();

        let summary = BookingSummary::new(&flight(20), &wizard);
        assert!(summary.low_availability);
        assert_eq!(summary.step, BookingStep::Payment);
        assert_eq!(summary.passenger_name.as_deref(), Some("Jane Roe"));

        let countdown = summary.countdown.unwrap();
        assert_eq!(countdown.label, "1:00");
        assert!((countdown.progress_percent - 50.0).abs() < f64::EPSILON);
    }
}
