use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use skyhold_shared::Flight;
use std::str::FromStr;

use crate::CoreError;

/// Price bracket of the list filter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    /// Under 200.
    Low,
    /// 200 up to (not including) 400.
    Medium,
    /// 400 and above.
    High,
}

impl PriceRange {
    pub fn contains(&self, price: i32) -> bool {
        match self {
            PriceRange::Low => price < 200,
            PriceRange::Medium => (200..400).contains(&price),
            PriceRange::High => price >= 400,
        }
    }
}

impl FromStr for PriceRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PriceRange::Low),
            "medium" => Ok(PriceRange::Medium),
            "high" => Ok(PriceRange::High),
            other => Err(CoreError::ValidationError(format!("unknown price range '{}'", other))),
        }
    }
}

/// Structured filter; `None` (or an empty string) disables a predicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlightFilter {
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub date: Option<NaiveDate>,
    pub price_range: Option<PriceRange>,
}

impl FlightFilter {
    pub fn matches(&self, flight: &Flight) -> bool {
        contains_ci(&flight.departure.city, self.departure.as_deref())
            && contains_ci(&flight.arrival.city, self.arrival.as_deref())
            && self.date.map_or(true, |date| flight.departure.date == date)
            && self.price_range.map_or(true, |range| range.contains(flight.price))
    }

    pub fn is_empty(&self) -> bool {
        self.departure.as_deref().map_or(true, str::is_empty)
            && self.arrival.as_deref().map_or(true, str::is_empty)
            && self.date.is_none()
            && self.price_range.is_none()
    }
}

/// Free-text search term plus the structured filter. All predicates are ANDed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchQuery {
    pub term: String,
    pub filter: FlightFilter,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>, filter: FlightFilter) -> Self {
        Self {
            term: term.into(),
            filter,
        }
    }

    pub fn matches(&self, flight: &Flight) -> bool {
        self.matches_term(flight) && self.filter.matches(flight)
    }

    fn matches_term(&self, flight: &Flight) -> bool {
        let term = Some(self.term.as_str());
        contains_ci(&flight.name, term)
            || contains_ci(&flight.airline, term)
            || contains_ci(&flight.departure.city, term)
            || contains_ci(&flight.arrival.city, term)
    }
}

/// Case-insensitive substring match; a missing or empty needle matches.
fn contains_ci(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(n) if n.is_empty() => true,
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
    }
}
