use anyhow::Context;
use skyhold_app::{AppContext, HistoryNavigator, Shell, TracingNotifier};
use skyhold_store::app_config::Config;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("Failed to load config")?;

    // Logs go to stderr so they never interleave with the shell's output.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        hold_seconds = config.booking.hold_seconds,
        expiry_policy = ?config.booking.expiry_policy,
        session_backend = ?config.session.backend,
        "Starting SkyHold"
    );

    let (notices_tx, notices_rx) = mpsc::unbounded_channel();
    let ctx = AppContext::new(
        &config,
        Arc::new(TracingNotifier::forwarding(notices_tx)),
        Arc::new(HistoryNavigator::new()),
    )
    .context("Failed to initialise application state")?;

    let mut shell = Shell::new(ctx).with_notifications(notices_rx);
    shell
        .run(BufReader::new(tokio::io::stdin()), std::io::stdout())
        .await
        .context("Shell terminated with an error")?;

    Ok(())
}
