use skyhold_booking::BookingRules;
use skyhold_catalog::FlightCatalog;
use skyhold_core::{AcceptAllAuthorizer, Clock, Navigator, NotificationSink, PaymentAuthorizer};
use skyhold_store::{Config, SessionStore};
use std::sync::Arc;

use crate::error::AppResult;
use crate::timer::TokioClock;

/// Everything the pages share, owned by the application shell and handed to
/// each page operation by reference.
pub struct AppContext {
    pub catalog: FlightCatalog,
    pub session: SessionStore,
    pub notifier: Arc<dyn NotificationSink>,
    pub navigator: Arc<dyn Navigator>,
    pub clock: Arc<dyn Clock>,
    pub payments: Arc<dyn PaymentAuthorizer>,
    pub rules: BookingRules,
}

impl AppContext {
    /// Seeded catalog, session restored from the configured backend, tokio
    /// clock and the accept-all payment authorizer.
    pub fn new(
        config: &Config,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> AppResult<Self> {
        Ok(Self {
            catalog: FlightCatalog::with_seed_data(),
            session: SessionStore::from_config(config)?,
            notifier,
            navigator,
            clock: Arc::new(TokioClock::new()),
            payments: Arc::new(AcceptAllAuthorizer),
            rules: config.booking.clone(),
        })
    }

    pub fn with_catalog(mut self, catalog: FlightCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_payments(mut self, payments: Arc<dyn PaymentAuthorizer>) -> Self {
        self.payments = payments;
        self
    }
}
