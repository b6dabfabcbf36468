use skyhold_catalog::{CatalogEditor, CatalogError};
use skyhold_core::{CatalogProvider, Route, SearchQuery, SessionProvider};
use skyhold_shared::{Flight, FlightDraft, FlightId, NotificationKind};

use crate::context::AppContext;
use crate::error::{AppError, AppResult};

/// Flight management screen. Only reachable with the admin role.
#[derive(Debug, Clone, Copy)]
pub struct AdminPage {
    _guard: (),
}

impl AdminPage {
    /// Non-admins are sent back home.
    pub fn open(ctx: &AppContext) -> AppResult<Self> {
        match ctx.session.current_user() {
            Some(user) if user.is_admin() => Ok(Self { _guard: () }),
            Some(_) => {
                ctx.navigator.go_to(Route::Home);
                Err(AppError::Forbidden)
            }
            None => {
                ctx.navigator.go_to(Route::Login);
                Err(AppError::Unauthenticated)
            }
        }
    }

    pub fn flights(&self, ctx: &AppContext) -> Vec<Flight> {
        ctx.catalog.list(&SearchQuery::default())
    }

    pub fn create(&self, ctx: &mut AppContext, draft: FlightDraft) -> AppResult<Flight> {
        let user = ctx.session.current_user();
        let flight = CatalogEditor::new(&mut ctx.catalog, user.as_ref())?.create(draft)?;
        ctx.notifier.notify(
            NotificationKind::Info,
            "Flight added",
            "New flight has been successfully added.",
        );
        Ok(flight)
    }

    pub fn update(&self, ctx: &mut AppContext, id: &FlightId, draft: FlightDraft) -> AppResult<Flight> {
        let user = ctx.session.current_user();
        let updated = CatalogEditor::new(&mut ctx.catalog, user.as_ref())?.update(id, draft)?;
        if !updated {
            return Err(CatalogError::NotFound(id.clone()).into());
        }
        ctx.notifier.notify(
            NotificationKind::Info,
            "Flight updated",
            "Flight information has been successfully updated.",
        );
        ctx.catalog
            .find_by_id(id)
            .ok_or_else(|| AppError::FlightNotFound(id.clone()))
    }

    pub fn delete(&self, ctx: &mut AppContext, id: &FlightId) -> AppResult<()> {
        let user = ctx.session.current_user();
        if !CatalogEditor::new(&mut ctx.catalog, user.as_ref())?.delete(id) {
            return Err(CatalogError::NotFound(id.clone()).into());
        }
        ctx.notifier.notify(
            NotificationKind::Info,
            "Flight deleted",
            "Flight has been successfully removed.",
        );
        Ok(())
    }
}
