use chrono::{NaiveDate, NaiveTime};
use skyhold_shared::{Flight, FlightId, Leg};

fn leg(airport: &str, city: &str, time: (u32, u32), date: (i32, u32, u32)) -> Option<Leg> {
    Some(Leg {
        airport: airport.to_string(),
        city: city.to_string(),
        time: NaiveTime::from_hms_opt(time.0, time.1, 0)?,
        date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)?,
    })
}

#[allow(clippy::too_many_arguments)]
fn flight(
    id: &str,
    name: &str,
    airline: &str,
    departure: Option<Leg>,
    arrival: Option<Leg>,
    duration: &str,
    price: i32,
    seats: (u32, u32),
    aircraft: &str,
) -> Option<Flight> {
    Some(Flight {
        id: FlightId::from(id),
        name: name.to_string(),
        airline: airline.to_string(),
        departure: departure?,
        arrival: arrival?,
        duration: duration.to_string(),
        price,
        available_seats: seats.0,
        total_seats: seats.1,
        aircraft: aircraft.to_string(),
    })
}

/// Demo flights the catalog starts with.
pub fn seed_flights() -> Vec<Flight> {
    [
        flight(
            "1",
            "AA101",
            "American Airlines",
            leg("JFK", "New York", (8, 30), (2024, 2, 15)),
            leg("LAX", "Los Angeles", (11, 45), (2024, 2, 15)),
            "6h 15m",
            299,
            (45, 180),
            "Boeing 737",
        ),
        flight(
            "2",
            "DL205",
            "Delta Airlines",
            leg("ORD", "Chicago", (14, 20), (2024, 2, 15)),
            leg("MIA", "Miami", (18, 10), (2024, 2, 15)),
            "3h 50m",
            189,
            (23, 160),
            "Airbus A320",
        ),
        flight(
            "3",
            "UA890",
            "United Airlines",
            leg("SFO", "San Francisco", (22, 15), (2024, 2, 15)),
            leg("SEA", "Seattle", (0, 45), (2024, 2, 16)),
            "2h 30m",
            149,
            (67, 140),
            "Boeing 757",
        ),
    ]
    .into_iter()
    .flatten()
    .collect()
}
