use skyhold_core::{CatalogProvider, FlightFilter, SearchQuery, SessionProvider};
use skyhold_shared::Flight;
use tracing::debug;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};

/// Flight list with the search box and filter panel.
#[derive(Debug, Clone, Default)]
pub struct HomePage {
    query: SearchQuery,
}

impl HomePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.query.term = term.into();
    }

    pub fn filter_mut(&mut self) -> &mut FlightFilter {
        &mut self.query.filter
    }

    /// Drop the search term and every filter.
    pub fn clear(&mut self) {
        self.query = SearchQuery::default();
    }

    /// Flights matching the current query. Holds that lapsed while nobody was
    /// watching are returned to availability first.
    pub fn results(&self, ctx: &mut AppContext) -> AppResult<Vec<Flight>> {
        if ctx.session.current_user().is_none() {
            return Err(AppError::Unauthenticated);
        }

        let released = ctx.catalog.sweep_expired(ctx.clock.now());
        if released > 0 {
            debug!(released, "Released lapsed seat holds");
        }
        Ok(ctx.catalog.list(&self.query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::HistoryNavigator;
    use crate::notify::RecordingNotifier;
    use chrono::Utc;
    use skyhold_core::{Clock, ManualClock, PriceRange};
    use skyhold_shared::FlightId;
    use skyhold_store::Config;
    use std::sync::Arc;
    use uuid::Uuid;

    fn context() -> AppContext {
        AppContext::new(
            &Config::default(),
            Arc::new(RecordingNotifier::new()),
            Arc::new(HistoryNavigator::new()),
        )
        .unwrap()
    }

    fn names(flights: &[Flight]) -> Vec<&str> {
        flights.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_requires_sign_in() {
        let mut ctx = context();
        let page = HomePage::new();
        assert!(matches!(page.results(&mut ctx), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_search_and_filter() {
        let mut ctx = context();
        ctx.session.login("jane@example.com", "pw").unwrap();
        let mut page = HomePage::new();

        assert_eq!(page.results(&mut ctx).unwrap().len(), 3);

        page.set_term("delta");
        assert_eq!(names(&page.results(&mut ctx).unwrap()), vec!["DL205"]);

        page.clear();
        page.filter_mut().price_range = Some(PriceRange::Low);
        assert_eq!(names(&page.results(&mut ctx).unwrap()), vec!["DL205", "UA890"]);

        page.filter_mut().arrival = Some("sea".to_string());
        assert_eq!(names(&page.results(&mut ctx).unwrap()), vec!["UA890"]);
    }

    #[test]
    fn test_listing_releases_lapsed_holds() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let mut ctx = context().with_clock(clock.clone());
        ctx.session.login("jane@example.com", "pw").unwrap();

        let id = FlightId::from("1");
        ctx.catalog
            .hold_seat(&id, Uuid::new_v4(), clock.now() + chrono::Duration::seconds(120))
            .unwrap();
        assert_eq!(ctx.catalog.get(&id).unwrap().available_seats, 44);

        clock.advance(chrono::Duration::seconds(121));
        let flights = HomePage::new().results(&mut ctx).unwrap();
        assert_eq!(flights[0].available_seats, 45);
    }
}
