use skyhold_booking::{format_remaining, BookingSummary, TickOutcome};
use skyhold_core::{Route, SessionProvider};
use skyhold_shared::{Flight, Notification, NotificationKind};
use std::io::Write;
use std::ops::ControlFlow;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use crate::commands::{AdminCommand, Command, FilterCommand, HELP};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::pages::{AdminPage, BookingPage, HomePage};
use crate::timer::Tick;

/// Line-oriented front end. Reads commands, feeds hold-timer ticks to the
/// open booking page and renders results as plain text.
pub struct Shell {
    ctx: AppContext,
    home: HomePage,
    booking: Option<BookingPage>,
    ticks_tx: UnboundedSender<Tick>,
    ticks_rx: Option<UnboundedReceiver<Tick>>,
    notices: Option<UnboundedReceiver<Notification>>,
}

impl Shell {
    pub fn new(ctx: AppContext) -> Self {
        let (ticks_tx, ticks_rx) = mpsc::unbounded_channel();
        Self {
            ctx,
            home: HomePage::new(),
            booking: None,
            ticks_tx,
            ticks_rx: Some(ticks_rx),
            notices: None,
        }
    }

    /// Print notifications from this channel after each command and tick.
    pub fn with_notifications(mut self, notices: UnboundedReceiver<Notification>) -> Self {
        self.notices = Some(notices);
        self
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn booking(&self) -> Option<&BookingPage> {
        self.booking.as_ref()
    }

    /// Run until `quit` or end of input. Any open booking is torn down on the
    /// way out so its held seat is released.
    pub async fn run<R, W>(&mut self, input: R, mut out: W) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let Some(mut ticks) = self.ticks_rx.take() else {
            return Ok(());
        };
        let mut lines = input.lines();

        writeln!(out, "SkyHold flight booking. Type 'help' for a list of commands.")?;
        if let Some(user) = self.ctx.session.current_user() {
            writeln!(out, "Signed in as {} <{}>", user.name, user.email)?;
        }

        let result = loop {
            tokio::select! {
                line = lines.next_line() => {
                    let line = match line {
                        Ok(Some(line)) => line,
                        Ok(None) => break Ok(()),
                        Err(e) => break Err(AppError::from(e)),
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    let command = match line.parse::<Command>() {
                        Ok(command) => command,
                        Err(e) => {
                            writeln!(out, "Error: {}", e)?;
                            continue;
                        }
                    };
                    match self.execute(command, &mut out).await {
                        Ok(ControlFlow::Continue(())) => {}
                        Ok(ControlFlow::Break(())) => break Ok(()),
                        Err(e) => break Err(e),
                    }
                }
                Some(tick) = ticks.recv() => {
                    if let Err(e) = self.on_tick(tick, &mut out) {
                        break Err(e);
                    }
                }
            }
        };

        self.ticks_rx = Some(ticks);
        self.close_booking();
        info!("Shell exited");
        result
    }

    /// Run one command. Page errors are reported to the user; only terminal
    /// I/O failures are returned.
    pub async fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> AppResult<ControlFlow<()>> {
        if command == Command::Quit {
            return Ok(ControlFlow::Break(()));
        }
        match self.dispatch(command, out).await {
            Ok(()) => {}
            Err(AppError::Io(e)) => return Err(AppError::Io(e)),
            Err(e) => writeln!(out, "Error: {}", e)?,
        }
        self.flush_notices(out)?;
        Ok(ControlFlow::Continue(()))
    }

    /// Deliver a hold-timer tick to the open booking page.
    pub fn on_tick<W: Write>(&mut self, tick: Tick, out: &mut W) -> AppResult<()> {
        let Some(page) = self.booking.as_mut() else {
            debug!(generation = tick.generation, "Tick with no booking page open");
            return Ok(());
        };

        match page.handle_tick(&mut self.ctx, tick) {
            TickOutcome::Idle => {}
            TickOutcome::Counting { remaining_seconds } => {
                if remaining_seconds % 30 == 0 || remaining_seconds <= 10 {
                    writeln!(out, "  {} left to complete your booking", format_remaining(remaining_seconds))?;
                }
            }
            TickOutcome::Expired(expired) => {
                writeln!(out, "Your seat on flight {} was released.", expired.reservation.flight_id)?;
                if expired.draft_retained {
                    writeln!(out, "Passenger details were kept for your next attempt.")?;
                }
                writeln!(out, "Type 'reserve' to hold a seat again.")?;
            }
        }
        self.flush_notices(out)
    }

    fn flush_notices<W: Write>(&mut self, out: &mut W) -> AppResult<()> {
        let Some(notices) = self.notices.as_mut() else {
            return Ok(());
        };
        while let Ok(notice) = notices.try_recv() {
            let marker = match notice.kind {
                NotificationKind::Info => "*",
                NotificationKind::Error => "!",
            };
            writeln!(out, "[{}] {}: {}", marker, notice.title, notice.message)?;
        }
        Ok(())
    }

    async fn dispatch<W: Write>(&mut self, command: Command, out: &mut W) -> AppResult<()> {
        match command {
            Command::Login { email, password } => {
                let user = self.ctx.session.login(&email, password.expose())?;
                self.ctx.navigator.go_to(Route::Home);
                writeln!(out, "Signed in as {} ({:?})", user.name, user.role)?;
            }
            Command::Register { name, email, password } => {
                let user = self.ctx.session.register(&name, &email, password.expose())?;
                self.ctx.navigator.go_to(Route::Home);
                writeln!(out, "Welcome, {}!", user.name)?;
            }
            Command::Logout => {
                self.close_booking();
                self.ctx.session.logout()?;
                self.ctx.navigator.go_to(Route::Login);
                writeln!(out, "Signed out")?;
            }
            Command::List => self.list(out)?,
            Command::Search(term) => {
                self.home.set_term(term);
                self.list(out)?;
            }
            Command::Filter(filter) => {
                let current = self.home.filter_mut();
                match filter {
                    FilterCommand::From(city) => current.departure = city,
                    FilterCommand::To(city) => current.arrival = city,
                    FilterCommand::Date(date) => current.date = date,
                    FilterCommand::Price(range) => current.price_range = range,
                    FilterCommand::Clear => self.home.clear(),
                }
                self.list(out)?;
            }
            Command::Book(flight_id) => {
                self.close_booking();
                self.ctx.navigator.go_to(Route::Booking(flight_id.clone()));
                let page = BookingPage::open(&self.ctx, flight_id, self.ticks_tx.clone())?;
                match page.summary() {
                    Some(summary) => render_summary(out, &summary)?,
                    None => writeln!(out, "Flight not found. Type 'back' to return to the flight list.")?,
                }
                self.booking = Some(page);
            }
            Command::Reserve => {
                let page = self.booking.as_mut().ok_or(AppError::NoActiveBooking)?;
                let reservation = page.reserve_seat(&mut self.ctx)?;
                writeln!(out, "Seat held until {}", reservation.reserved_until.format("%H:%M:%S"))?;
                if let Some(prefill) = page.wizard().prefill() {
                    writeln!(out, "Previous passenger: {}", prefill.full_name())?;
                }
            }
            Command::Details(details) => {
                let page = self.booking.as_mut().ok_or(AppError::NoActiveBooking)?;
                page.submit_passenger_details(details)?;
                if let Some(summary) = page.summary() {
                    render_summary(out, &summary)?;
                }
            }
            Command::Pay(payment) => {
                let page = self.booking.as_mut().ok_or(AppError::NoActiveBooking)?;
                let confirmation = page.confirm_booking(&mut self.ctx, payment).await?;
                writeln!(
                    out,
                    "Booking {} confirmed for {} (${})",
                    confirmation.booking_id,
                    confirmation.passenger.full_name(),
                    confirmation.amount
                )?;
                // Confirmation navigates home; the page has nothing left to hold.
                self.booking = None;
                self.list(out)?;
            }
            Command::Status => match &self.booking {
                Some(page) => match page.summary() {
                    Some(summary) => render_summary(out, &summary)?,
                    None => writeln!(out, "Flight not found.")?,
                },
                None => return Err(AppError::NoActiveBooking),
            },
            Command::Back => {
                self.close_booking();
                self.ctx.navigator.go_to(Route::Home);
                self.list(out)?;
            }
            Command::Admin(action) => self.admin(action, out)?,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => {}
        }
        Ok(())
    }

    fn admin<W: Write>(&mut self, action: AdminCommand, out: &mut W) -> AppResult<()> {
        self.ctx.navigator.go_to(Route::Admin);
        let page = AdminPage::open(&self.ctx)?;
        match action {
            AdminCommand::List => render_flights(out, &page.flights(&self.ctx))?,
            AdminCommand::Add(draft) => {
                let flight = page.create(&mut self.ctx, draft)?;
                writeln!(out, "Added flight {} with id {}", flight.name, flight.id)?;
            }
            AdminCommand::Update(id, draft) => {
                let flight = page.update(&mut self.ctx, &id, draft)?;
                writeln!(out, "Updated flight {} ({})", flight.name, flight.id)?;
            }
            AdminCommand::Delete(id) => {
                page.delete(&mut self.ctx, &id)?;
                writeln!(out, "Deleted flight {}", id)?;
            }
        }
        Ok(())
    }

    fn list<W: Write>(&mut self, out: &mut W) -> AppResult<()> {
        let flights = self.home.results(&mut self.ctx)?;
        render_flights(out, &flights)
    }

    fn close_booking(&mut self) {
        if let Some(page) = self.booking.take() {
            page.close(&mut self.ctx);
        }
    }
}

fn render_flights<W: Write>(out: &mut W, flights: &[Flight]) -> AppResult<()> {
    if flights.is_empty() {
        writeln!(out, "No flights found")?;
        return Ok(());
    }
    for flight in flights {
        writeln!(
            out,
            "[{}] {} {:<18} {}  {} {}  {:>4}  ${:<5} {} seats left",
            flight.id,
            flight.name,
            flight.airline,
            flight.route_label(),
            flight.departure.date.format("%Y-%m-%d"),
            flight.departure.time.format("%H:%M"),
            flight.duration,
            flight.price,
            flight.available_seats
        )?;
    }
    Ok(())
}

fn render_summary<W: Write>(out: &mut W, summary: &BookingSummary) -> AppResult<()> {
    writeln!(out, "{} · {} · {}", summary.flight_name, summary.airline, summary.aircraft)?;
    writeln!(out, "  From {}, {}", summary.departure_place, summary.departure_schedule)?;
    writeln!(out, "  To   {}, {}", summary.arrival_place, summary.arrival_schedule)?;
    writeln!(out, "  Duration {}", summary.duration)?;
    let warning = if summary.low_availability { " (almost full)" } else { "" };
    writeln!(out, "  {}{}", summary.seats_left, warning)?;
    if let Some(name) = &summary.passenger_name {
        writeln!(out, "  Passenger {}", name)?;
    }
    writeln!(out, "  Price ${}  Total ${}", summary.price, summary.total)?;
    if let Some(countdown) = &summary.countdown {
        writeln!(out, "  Time remaining {} ({:.0}%)", countdown.label, countdown.progress_percent)?;
    }
    writeln!(out, "  Step: {}", summary.step)?;
    Ok(())
}
