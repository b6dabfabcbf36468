//! Collaborators the booking core depends on, injected by the application
//! shell instead of being reached through ambient global state.

use crate::{search::SearchQuery, CoreResult};
use skyhold_shared::{Flight, FlightId, NotificationKind, User};
use std::fmt;

/// Read access to the current identity.
pub trait SessionProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;

    fn login(&mut self, email: &str, password: &str) -> CoreResult<User>;

    fn logout(&mut self) -> CoreResult<()>;
}

pub trait CatalogProvider: Send + Sync {
    fn find_by_id(&self, id: &FlightId) -> Option<Flight>;

    /// Flights matching the query, in catalog order.
    fn list(&self, query: &SearchQuery) -> Vec<Flight>;
}

/// Toast-style user notifications.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, kind: NotificationKind, title: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Admin,
    Booking(FlightId),
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => f.write_str("/"),
            Route::Login => f.write_str("/login"),
            Route::Admin => f.write_str("/admin"),
            Route::Booking(id) => write!(f, "/booking/{}", id),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn go_to(&self, route: Route);
}
