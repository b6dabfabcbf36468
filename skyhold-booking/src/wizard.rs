use chrono::{DateTime, Utc};
use skyhold_shared::FlightId;
use tracing::{info, warn};
use uuid::Uuid;

use crate::countdown::Countdown;
use crate::models::{BookingStep, Confirmation, PassengerDetails, Reservation};
use crate::rules::{BookingRules, ExpiryPolicy};
use crate::{BookingError, BookingResult};

/// Wizard state. A reservation exists exactly while the wizard is past the
/// `Reserve` step and not yet confirmed.
#[derive(Debug, Clone)]
enum WizardState {
    Reserve,
    PassengerDetails {
        reservation: Reservation,
    },
    Payment {
        reservation: Reservation,
        passenger: PassengerDetails,
    },
    Confirmed {
        confirmation: Confirmation,
    },
}

/// What a clock tick did to the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No active hold; nothing changed.
    Idle,
    /// Hold still running.
    Counting { remaining_seconds: u32 },
    /// The hold lapsed on this tick and the wizard is back at `Reserve`.
    Expired(ExpiredHold),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredHold {
    pub reservation: Reservation,
    /// Passenger details that were submitted before the hold lapsed.
    pub passenger: Option<PassengerDetails>,
    /// Whether `passenger` was kept for the next attempt.
    pub draft_retained: bool,
}

/// Seat-reservation countdown and step progression for one flight.
///
/// The wizard is pure: it never sleeps, notifies or navigates. Callers pass
/// the current time in and act on the returned values.
#[derive(Debug, Clone)]
pub struct BookingWizard {
    flight_id: FlightId,
    rules: BookingRules,
    state: WizardState,
    countdown: Countdown,
    retained_draft: Option<PassengerDetails>,
    prefill: Option<PassengerDetails>,
}

impl BookingWizard {
    pub fn new(flight_id: FlightId, rules: BookingRules) -> Self {
        let countdown = Countdown::new(rules.hold_seconds);
        Self {
            flight_id,
            rules,
            state: WizardState::Reserve,
            countdown,
            retained_draft: None,
            prefill: None,
        }
    }

    pub fn flight_id(&self) -> &FlightId {
        &self.flight_id
    }

    pub fn step(&self) -> BookingStep {
        match self.state {
            WizardState::Reserve => BookingStep::Reserve,
            WizardState::PassengerDetails { .. } => BookingStep::PassengerDetails,
            WizardState::Payment { .. } => BookingStep::Payment,
            WizardState::Confirmed { .. } => BookingStep::Confirmed,
        }
    }

    pub fn is_reserved(&self) -> bool {
        self.reservation().is_some()
    }

    pub fn reservation(&self) -> Option<&Reservation> {
        match &self.state {
            WizardState::PassengerDetails { reservation } => Some(reservation),
            WizardState::Payment { reservation, .. } => Some(reservation),
            _ => None,
        }
    }

    pub fn passenger(&self) -> Option<&PassengerDetails> {
        match &self.state {
            WizardState::Payment { passenger, .. } => Some(passenger),
            WizardState::Confirmed { confirmation } => Some(&confirmation.passenger),
            _ => None,
        }
    }

    /// Details carried over from an expired attempt, to pre-fill the form.
    pub fn prefill(&self) -> Option<&PassengerDetails> {
        self.prefill.as_ref()
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        match &self.state {
            WizardState::Confirmed { confirmation } => Some(confirmation),
            _ => None,
        }
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// Reserve → PassengerDetails. Starts a fresh hold of the full duration.
    pub fn reserve_seat(&mut self, now: DateTime<Utc>) -> BookingResult<Reservation> {
        if !matches!(self.state, WizardState::Reserve) {
            return Err(self.invalid(BookingStep::PassengerDetails));
        }

        let reservation = Reservation {
            attempt_id: Uuid::new_v4(),
            flight_id: self.flight_id.clone(),
            reserved_at: now,
            reserved_until: now + self.rules.hold_duration(),
        };
        self.countdown.reset();
        self.prefill = self.retained_draft.take();
        self.state = WizardState::PassengerDetails {
            reservation: reservation.clone(),
        };

        info!(
            attempt_id = %reservation.attempt_id,
            flight_id = %self.flight_id,
            until = %reservation.reserved_until,
            "Seat reserved"
        );
        Ok(reservation)
    }

    /// Advance the countdown. Expiry fires on the first tick at or past the
    /// deadline and never again for the same hold.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        let Some(deadline) = self.reservation().map(|r| r.reserved_until) else {
            return TickOutcome::Idle;
        };

        match self.countdown.sync(deadline, now) {
            0 => self.expire().map_or(TickOutcome::Idle, TickOutcome::Expired),
            remaining_seconds => TickOutcome::Counting { remaining_seconds },
        }
    }

    /// PassengerDetails → Payment. Blank fields keep the wizard where it is.
    pub fn submit_passenger_details(&mut self, details: PassengerDetails) -> BookingResult<()> {
        let WizardState::PassengerDetails { reservation } = &self.state else {
            return Err(self.invalid(BookingStep::Payment));
        };
        details.validate()?;

        let reservation = reservation.clone();
        info!(attempt_id = %reservation.attempt_id, passenger = ?details, "Passenger details accepted");
        self.prefill = None;
        self.state = WizardState::Payment {
            reservation,
            passenger: details,
        };
        Ok(())
    }

    /// Payment → Confirmed. A lapsed hold is reported as `Expired` and left
    /// for the next `tick` to reset.
    pub fn confirm_booking(&mut self, now: DateTime<Utc>, amount: i32) -> BookingResult<Confirmation> {
        let WizardState::Payment { reservation, passenger } = &self.state else {
            return Err(self.invalid(BookingStep::Confirmed));
        };
        if reservation.is_lapsed(now) {
            return Err(BookingError::Expired);
        }

        let confirmation = Confirmation {
            booking_id: Uuid::new_v4(),
            attempt_id: reservation.attempt_id,
            flight_id: self.flight_id.clone(),
            passenger: passenger.clone(),
            amount,
            confirmed_at: now,
        };
        info!(
            booking_id = %confirmation.booking_id,
            attempt_id = %confirmation.attempt_id,
            amount,
            "Booking confirmed"
        );
        self.countdown.reset();
        self.state = WizardState::Confirmed {
            confirmation: confirmation.clone(),
        };
        Ok(confirmation)
    }

    /// Tear down an in-flight attempt (the user navigated away, or the seat
    /// could not be held). Returns the hold that must be released, if any.
    /// A prefill that was never submitted goes back to the retained draft.
    pub fn abandon(&mut self) -> Option<Reservation> {
        let reservation = self.reservation().cloned()?;
        self.state = WizardState::Reserve;
        self.countdown.reset();
        if let Some(draft) = self.prefill.take() {
            self.retained_draft = Some(draft);
        }
        info!(attempt_id = %reservation.attempt_id, "Booking attempt abandoned");
        Some(reservation)
    }

    fn expire(&mut self) -> Option<ExpiredHold> {
        let (reservation, passenger) = match std::mem::replace(&mut self.state, WizardState::Reserve) {
            WizardState::PassengerDetails { reservation } => (reservation, None),
            WizardState::Payment { reservation, passenger } => (reservation, Some(passenger)),
            other => {
                self.state = other;
                return None;
            }
        };

        self.countdown.reset();
        self.prefill = None;
        let draft_retained = self.rules.expiry_policy == ExpiryPolicy::KeepDraftForRetry && passenger.is_some();
        if draft_retained {
            self.retained_draft = passenger.clone();
        }

        warn!(
            attempt_id = %reservation.attempt_id,
            flight_id = %reservation.flight_id,
            draft_retained,
            "Seat reservation expired"
        );
        Some(ExpiredHold {
            reservation,
            passenger,
            draft_retained,
        })
    }

    fn invalid(&self, to: BookingStep) -> BookingError {
        BookingError::InvalidTransition {
            from: self.step(),
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use skyhold_core::{Clock, ManualClock};
    use skyhold_shared::Masked;

    fn clock() -> ManualClock {
        ManualClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        )
    }

    fn wizard() -> BookingWizard {
        BookingWizard::new(FlightId::from("1"), BookingRules::default())
    }

    fn passenger() -> PassengerDetails {
        PassengerDetails {
            first_name: "Jane".to_string(),
            last_name: "Roe".to_string(),
            email: Masked::from("jane@example.com"),
            phone: Masked::from("555-0100"),
            date_of_birth: Masked::from("1990-04-01"),
        }
    }

    fn tick_seconds(wizard: &mut BookingWizard, clock: &ManualClock, n: u32) -> Vec<TickOutcome> {
        (0..n)
            .map(|_| {
                clock.advance(Duration::seconds(1));
                wizard.tick(clock.now())
            })
            .collect()
    }

    #[test]
    fn test_reserve_starts_full_hold() {
        let clock = clock();
        let mut wizard = wizard();
        assert_eq!(wizard.step(), BookingStep::Reserve);
        assert!(!wizard.is_reserved());

        let reservation = wizard.reserve_seat(clock.now()).unwrap();
        assert!(wizard.is_reserved());
        assert_eq!(wizard.step(), BookingStep::PassengerDetails);
        assert_eq!(reservation.reserved_until - clock.now(), Duration::seconds(120));
        assert_eq!(wizard.countdown().label(), "2:00");
    }

    #[test]
    fn test_reserve_only_from_reserve_step() {
        let clock = clock();
        let mut wizard = wizard();
        wizard.reserve_seat(clock.now()).unwrap();

        let err = wizard.reserve_seat(clock.now()).unwrap_err();
        assert!(matches!(
            err,
            BookingError::InvalidTransition {
                from: BookingStep::PassengerDetails,
                to: BookingStep::PassengerDetails
            }
        ));
    }

    #[test]
    fn test_countdown_decrements_each_tick() {
        let clock = clock();
        let mut wizard = wizard();
        wizard.reserve_seat(clock.now()).unwrap();

        let outcomes = tick_seconds(&mut wizard, &clock, 5);
        assert_eq!(outcomes[0], TickOutcome::Counting { remaining_seconds: 119 });
        assert_eq!(outcomes[4], TickOutcome::Counting { remaining_seconds: 115 });
        assert_eq!(wizard.countdown().label(), "1:55");
    }

    #[test]
    fn test_expires_exactly_once_after_hold_duration() {
        let clock = clock();
        let mut wizard = wizard();
        wizard.reserve_seat(clock.now()).unwrap();

        let outcomes = tick_seconds(&mut wizard, &clock, 119);
        assert!(outcomes.iter().all(|o| matches!(o, TickOutcome::Counting { .. })));
        assert!(wizard.is_reserved());

        let outcome = wizard.tick({
            clock.advance(Duration::seconds(1));
            clock.now()
        });
        assert!(matches!(outcome, TickOutcome::Expired(_)));
        assert!(!wizard.is_reserved());
        assert_eq!(wizard.step(), BookingStep::Reserve);
        assert_eq!(wizard.countdown().remaining_seconds(), 120);

        let later = tick_seconds(&mut wizard, &clock, 10);
        assert!(later.iter().all(|o| *o == TickOutcome::Idle));
    }

    #[test]
    fn test_late_tick_expires_immediately() {
        let clock = clock();
        let mut wizard = wizard();
        wizard.reserve_seat(clock.now()).unwrap();

        clock.advance(Duration::seconds(300));
        assert!(matches!(wizard.tick(clock.now()), TickOutcome::Expired(_)));
        assert_eq!(wizard.tick(clock.now()), TickOutcome::Idle);
    }

    #[test]
    fn test_tick_without_hold_is_noop() {
        let clock = clock();
        let mut wizard = wizard();
        assert_eq!(wizard.tick(clock.now()), TickOutcome::Idle);
        assert_eq!(wizard.step(), BookingStep::Reserve);
    }

    #[test]
    fn test_passenger_details_validation_blocks_transition() {
        let clock = clock();
        let mut wizard = wizard();
        wizard.reserve_seat(clock.now()).unwrap();

        let mut missing = passenger();
        missing.phone = Masked::default();
        assert!(matches!(
            wizard.submit_passenger_details(missing),
            Err(BookingError::Validation(_))
        ));
        assert_eq!(wizard.step(), BookingStep::PassengerDetails);

        wizard.submit_passenger_details(passenger()).unwrap();
        assert_eq!(wizard.step(), BookingStep::Payment);
        assert!(wizard.is_reserved());
    }

    #[test]
    fn test_details_do_not_touch_countdown() {
        let clock = clock();
        let mut wizard = wizard();
        let reservation = wizard.reserve_seat(clock.now()).unwrap();
        tick_seconds(&mut wizard, &clock, 30);

        wizard.submit_passenger_details(passenger()).unwrap();
        assert_eq!(wizard.countdown().remaining_seconds(), 90);
        assert_eq!(wizard.reservation().unwrap(), &reservation);
    }

    #[test]
    fn test_confirm_only_from_payment() {
        let clock = clock();
        let mut wizard = wizard();

        assert!(matches!(
            wizard.confirm_booking(clock.now(), 299),
            Err(BookingError::InvalidTransition { from: BookingStep::Reserve, .. })
        ));

        wizard.reserve_seat(clock.now()).unwrap();
        assert!(matches!(
            wizard.confirm_booking(clock.now(), 299),
            Err(BookingError::InvalidTransition { from: BookingStep::PassengerDetails, .. })
        ));

        wizard.submit_passenger_details(passenger()).unwrap();
        let confirmation = wizard.confirm_booking(clock.now(), 299).unwrap();
        assert_eq!(wizard.step(), BookingStep::Confirmed);
        assert!(!wizard.is_reserved());
        assert_eq!(confirmation.amount, 299);
        assert_eq!(confirmation.passenger.first_name, "Jane");

        // Terminal: ticks and further transitions are inert
        assert_eq!(wizard.tick(clock.now()), TickOutcome::Idle);
        assert!(wizard.reserve_seat(clock.now()).is_err());
    }

    #[test]
    fn test_confirm_after_deadline_reports_expired() {
        let clock = clock();
        let mut wizard = wizard();
        wizard.reserve_seat(clock.now()).unwrap();
        wizard.submit_passenger_details(passenger()).unwrap();

        clock.advance(Duration::seconds(120));
        assert!(matches!(wizard.confirm_booking(clock.now(), 299), Err(BookingError::Expired)));
        assert_eq!(wizard.step(), BookingStep::Payment);

        assert!(matches!(wizard.tick(clock.now()), TickOutcome::Expired(_)));
        assert_eq!(wizard.step(), BookingStep::Reserve);
    }

    #[test]
    fn test_expiry_discards_passenger_data_by_default() {
        let clock = clock();
        let mut wizard = wizard();
        wizard.reserve_seat(clock.now()).unwrap();
        wizard.submit_passenger_details(passenger()).unwrap();

        clock.advance(Duration::seconds(120));
        let TickOutcome::Expired(expired) = wizard.tick(clock.now()) else {
            panic!("expected expiry");
        };
        assert!(!expired.draft_retained);
        assert!(wizard.passenger().is_none());

        wizard.reserve_seat(clock.now()).unwrap();
        assert!(wizard.prefill().is_none());
    }

    #[test]
    fn test_keep_draft_policy_prefills_one_retry() {
        let clock = clock();
        let rules = BookingRules {
            expiry_policy: ExpiryPolicy::KeepDraftForRetry,
            ..Default::default()
        };
        let mut wizard = BookingWizard::new(FlightId::from("1"), rules);
        wizard.reserve_seat(clock.now()).unwrap();
        wizard.submit_passenger_details(passenger()).unwrap();

        clock.advance(Duration::seconds(120));
        let TickOutcome::Expired(expired) = wizard.tick(clock.now()) else {
            panic!("expected expiry");
        };
        assert!(expired.draft_retained);

        wizard.reserve_seat(clock.now()).unwrap();
        assert_eq!(wizard.prefill(), Some(&passenger()));

        // Lapsing again without resubmitting drops the carried-over draft
        clock.advance(Duration::seconds(120));
        wizard.tick(clock.now());
        wizard.reserve_seat(clock.now()).unwrap();
        assert!(wizard.prefill().is_none());
    }

    #[test]
    fn test_new_reservation_restarts_full_countdown() {
        let clock = clock();
        let mut wizard = wizard();
        let first = wizard.reserve_seat(clock.now()).unwrap();
        clock.advance(Duration::seconds(120));
        wizard.tick(clock.now());

        let second = wizard.reserve_seat(clock.now()).unwrap();
        assert_ne!(first.attempt_id, second.attempt_id);
        assert_eq!(second.reserved_until - clock.now(), Duration::seconds(120));
        assert_eq!(wizard.countdown().remaining_seconds(), 120);
    }

    #[test]
    fn test_abandon_returns_hold_for_release() {
        let clock = clock();
        let mut wizard = wizard();
        assert!(wizard.abandon().is_none());

        let reservation = wizard.reserve_seat(clock.now()).unwrap();
        assert_eq!(wizard.abandon(), Some(reservation));
        assert_eq!(wizard.step(), BookingStep::Reserve);
        assert_eq!(wizard.tick(clock.now()), TickOutcome::Idle);
    }

    #[test]
    fn test_abandoned_retry_keeps_draft_for_next_attempt() {
        let clock = clock();
        let rules = BookingRules {
            expiry_policy: ExpiryPolicy::KeepDraftForRetry,
            ..Default::default()
        };
        let mut wizard = BookingWizard::new(FlightId::from("1"), rules);
        wizard.reserve_seat(clock.now()).unwrap();
        wizard.submit_passenger_details(passenger()).unwrap();
        clock.advance(Duration::seconds(120));
        wizard.tick(clock.now());

        wizard.reserve_seat(clock.now()).unwrap();
        assert_eq!(wizard.prefill(), Some(&passenger()));
        wizard.abandon().unwrap();
        assert!(wizard.prefill().is_none());

        wizard.reserve_seat(clock.now()).unwrap();
        assert_eq!(wizard.prefill(), Some(&passenger()));

        // Once submitted, the draft is consumed
        wizard.submit_passenger_details(passenger()).unwrap();
        wizard.abandon().unwrap();
        wizard.reserve_seat(clock.now()).unwrap();
        assert!(wizard.prefill().is_none());
    }
}
