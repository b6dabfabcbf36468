use skyhold_booking::{
    BookingError, BookingStep, BookingSummary, BookingWizard, Confirmation, ExpiredHold, PassengerDetails,
    Reservation, TickOutcome,
};
use skyhold_core::{CatalogProvider, CoreError, PaymentDetails, PaymentStatus, Route, SessionProvider};
use skyhold_shared::{Flight, FlightId, NotificationKind};
use tokio::runtime::TryCurrentError;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::timer::{HoldTimer, Tick};

/// The booking screen for one flight. Owns the wizard and at most one hold
/// timer; the timer lives exactly as long as the wizard holds a seat.
pub struct BookingPage {
    flight_id: FlightId,
    flight: Option<Flight>,
    wizard: BookingWizard,
    timer: Option<HoldTimer>,
    generation: u64,
    ticks: UnboundedSender<Tick>,
}

impl BookingPage {
    /// Unauthenticated users are sent to the login screen. An unknown flight
    /// still opens the page, in its not-found state.
    pub fn open(ctx: &AppContext, flight_id: FlightId, ticks: UnboundedSender<Tick>) -> AppResult<Self> {
        if ctx.session.current_user().is_none() {
            ctx.navigator.go_to(Route::Login);
            return Err(AppError::Unauthenticated);
        }

        let flight = ctx.catalog.find_by_id(&flight_id);
        if flight.is_none() {
            warn!(%flight_id, "Booking page opened for unknown flight");
        }

        Ok(Self {
            wizard: BookingWizard::new(flight_id.clone(), ctx.rules.clone()),
            flight_id,
            flight,
            timer: None,
            generation: 0,
            ticks,
        })
    }

    pub fn flight_id(&self) -> &FlightId {
        &self.flight_id
    }

    pub fn flight(&self) -> Option<&Flight> {
        self.flight.as_ref()
    }

    pub fn wizard(&self) -> &BookingWizard {
        &self.wizard
    }

    pub fn step(&self) -> BookingStep {
        self.wizard.step()
    }

    pub fn has_active_timer(&self) -> bool {
        self.timer.is_some()
    }

    /// `None` renders the "flight not found" fallback.
    pub fn summary(&self) -> Option<BookingSummary> {
        self.flight.as_ref().map(|f| BookingSummary::new(f, &self.wizard))
    }

    pub fn reserve_seat(&mut self, ctx: &mut AppContext) -> AppResult<Reservation> {
        if self.flight.is_none() {
            return Err(AppError::FlightNotFound(self.flight_id.clone()));
        }

        let reservation = self.wizard.reserve_seat(ctx.clock.now())?;
        if let Err(e) = ctx
            .catalog
            .hold_seat(&self.flight_id, reservation.attempt_id, reservation.reserved_until)
        {
            self.wizard.abandon();
            return Err(e.into());
        }
        if let Err(e) = self.start_timer(ctx) {
            ctx.catalog.release_seat(&reservation.attempt_id);
            self.wizard.abandon();
            warn!(attempt_id = %reservation.attempt_id, error = %e, "Hold timer could not start");
            return Err(e.into());
        }

        self.refresh_flight(ctx);
        ctx.notifier.notify(
            NotificationKind::Info,
            "Seat reserved!",
            &format!(
                "You have {} to complete your booking.",
                describe_hold(ctx.rules.hold_seconds)
            ),
        );
        Ok(reservation)
    }

    /// Feed one timer tick. Ticks from a timer that was already stopped are
    /// dropped without touching the wizard.
    pub fn handle_tick(&mut self, ctx: &mut AppContext, tick: Tick) -> TickOutcome {
        match &self.timer {
            Some(timer) if timer.generation() == tick.generation => {}
            _ => {
                debug!(generation = tick.generation, "Ignoring stale tick");
                return TickOutcome::Idle;
            }
        }

        let outcome = self.wizard.tick(ctx.clock.now());
        if let TickOutcome::Expired(expired) = &outcome {
            self.on_expired(ctx, expired);
        }
        outcome
    }

    pub fn submit_passenger_details(&mut self, details: PassengerDetails) -> AppResult<()> {
        self.wizard.submit_passenger_details(details)?;
        Ok(())
    }

    /// Authorize payment, then finalize. On success the seat is sold, the
    /// timer stops and the user is sent home.
    pub async fn confirm_booking(
        &mut self,
        ctx: &mut AppContext,
        payment: PaymentDetails,
    ) -> AppResult<Confirmation> {
        let Some(reservation) = self.wizard.reservation().cloned() else {
            return Err(BookingError::InvalidTransition {
                from: self.wizard.step(),
                to: BookingStep::Confirmed,
            }
            .into());
        };
        if self.wizard.step() != BookingStep::Payment {
            return Err(BookingError::InvalidTransition {
                from: self.wizard.step(),
                to: BookingStep::Confirmed,
            }
            .into());
        }
        let Some(amount) = self.flight.as_ref().map(|f| f.price) else {
            return Err(AppError::FlightNotFound(self.flight_id.clone()));
        };
        if reservation.is_lapsed(ctx.clock.now()) {
            self.expire_now(ctx);
            return Err(BookingError::Expired.into());
        }

        let payments = ctx.payments.clone();
        let receipt = payments.authorize(reservation.attempt_id, amount, &payment).await?;
        if receipt.status != PaymentStatus::Succeeded {
            ctx.notifier.notify(
                NotificationKind::Error,
                "Payment declined",
                "Your payment could not be authorized. Please try again.",
            );
            return Err(CoreError::PaymentDeclined(receipt.reference).into());
        }

        let confirmation = match self.wizard.confirm_booking(ctx.clock.now(), amount) {
            Ok(confirmation) => confirmation,
            Err(BookingError::Expired) => {
                self.expire_now(ctx);
                return Err(BookingError::Expired.into());
            }
            Err(e) => return Err(e.into()),
        };

        self.stop_timer();
        ctx.catalog.commit_seat(&confirmation.attempt_id)?;
        self.refresh_flight(ctx);

        let flight_name = self.flight.as_ref().map(|f| f.name.as_str()).unwrap_or_default();
        ctx.notifier.notify(
            NotificationKind::Info,
            "Booking confirmed!",
            &format!("Your booking for flight {} has been confirmed.", flight_name),
        );
        ctx.navigator.go_to(Route::Home);
        Ok(confirmation)
    }

    /// Leave the page: the timer is stopped and any held seat goes back.
    pub fn close(mut self, ctx: &mut AppContext) {
        self.stop_timer();
        if let Some(reservation) = self.wizard.abandon() {
            ctx.catalog.release_seat(&reservation.attempt_id);
        }
        info!(flight_id = %self.flight_id, "Booking page closed");
    }

    fn start_timer(&mut self, ctx: &AppContext) -> Result<(), TryCurrentError> {
        self.generation += 1;
        // Replacing the option drops (and aborts) any previous timer.
        self.timer = Some(HoldTimer::start(
            self.generation,
            ctx.rules.tick_period(),
            self.ticks.clone(),
        )?);
        Ok(())
    }

    fn stop_timer(&mut self) {
        self.timer = None;
    }

    fn expire_now(&mut self, ctx: &mut AppContext) {
        if let TickOutcome::Expired(expired) = self.wizard.tick(ctx.clock.now()) {
            self.on_expired(ctx, &expired);
        }
    }

    fn on_expired(&mut self, ctx: &mut AppContext, expired: &ExpiredHold) {
        self.stop_timer();
        ctx.catalog.release_seat(&expired.reservation.attempt_id);
        self.refresh_flight(ctx);
        ctx.notifier.notify(
            NotificationKind::Error,
            "Reservation expired",
            "Your seat reservation has expired. Please try again.",
        );
    }

    fn refresh_flight(&mut self, ctx: &AppContext) {
        if let Some(flight) = ctx.catalog.find_by_id(&self.flight_id) {
            self.flight = Some(flight);
        }
    }
}

/// "2 minutes", "1 minute", "90 seconds"
fn describe_hold(seconds: u32) -> String {
    match (seconds / 60, seconds % 60) {
        (1, 0) => "1 minute".to_string(),
        (minutes, 0) if minutes > 0 => format!("{} minutes", minutes),
        _ => format!("{} seconds", seconds),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_hold() {
        assert_eq!(describe_hold(120), "2 minutes");
        assert_eq!(describe_hold(60), "1 minute");
        assert_eq!(describe_hold(90), "90 seconds");
        assert_eq!(describe_hold(0), "0 seconds");
    }
}
