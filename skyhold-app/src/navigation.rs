use skyhold_core::{Navigator, Route};
use std::sync::Mutex;
use tracing::debug;

/// Oldest routes are dropped beyond this many entries.
pub const HISTORY_LIMIT: usize = 32;

/// Navigator that remembers where the app is and the most recent places it
/// has been.
#[derive(Debug)]
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self {
            history: Mutex::new(vec![Route::Home]),
        }
    }

    pub fn current(&self) -> Route {
        self.history
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .last()
            .cloned()
            .unwrap_or(Route::Home)
    }

    pub fn history(&self) -> Vec<Route> {
        self.history.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

impl Default for HistoryNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator for HistoryNavigator {
    fn go_to(&self, route: Route) {
        debug!(%route, "Navigating");
        let mut history = self.history.lock().unwrap_or_else(|p| p.into_inner());
        history.push(route);
        if history.len() > HISTORY_LIMIT {
            let excess = history.len() - HISTORY_LIMIT;
            history.drain(..excess);
        }
    }
}
