// In app/src/main.rs

use anyhow::Result;
use app_config::Settings;
use clap::{Parser, Subcommand};
use dashboard::SignalTable;
use futures_util::StreamExt;
use notify::{DesktopNotifier, Relay};
use push::{Enroller, PushPlatform, PushReceiver};
use std::sync::Arc;
use stream_client::{BackoffPolicy, ConnectionStatus, StreamConnector};
use tokio::sync::watch;
use tracing_subscriber::prelude::*;

// --- Command-Line Interface Definition ---

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = "A terminal dashboard for a trading-signals server.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Streams live signals from the server into the table view.
    Run {
        /// Also enroll for push notifications and run the local receiver.
        #[arg(long)]
        with_push: bool,
    },

    /// Runs the one-shot push enrollment flow, then keeps receiving
    /// deliveries until terminated.
    Enroll,
}

// --- Main Application Entry Point ---

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from a .env file, if it exists.
    dotenvy::dotenv().ok();

    let settings = app_config::load_settings()?;

    let level: tracing::Level = settings
        .app
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_filter(tracing_subscriber::filter::Targets::new().with_default(level));
    tracing_subscriber::registry().with(fmt_layer).init();

    let cli = Cli::parse();

    tracing::info!(environment = %settings.app.environment, "Starting signals dashboard");

    match cli.command {
        Commands::Run { with_push } => {
            run_dashboard(settings, with_push).await?;
        }
        Commands::Enroll => {
            run_enrollment(settings).await?;
        }
    }

    Ok(())
}

// --- "Run" Subcommand Logic ---

/// The primary logic for the `run` command.
/// Holds the one event-stream connection for the life of the process and
/// re-renders the table on every applied message or status change.
async fn run_dashboard(settings: Settings, with_push: bool) -> Result<()> {
    let (status_tx, mut status_rx) = watch::channel(ConnectionStatus::Connecting);

    let policy = BackoffPolicy::from_settings(&settings.stream);
    let connector = StreamConnector::new(&settings.server.base_url, policy);
    let mut messages = Box::pin(connector.subscribe(status_tx));

    // Push is strictly opt-in per run; without the flag nothing push-related
    // is even constructed.
    if with_push {
        let relay = build_relay(&settings);
        let receiver = Arc::new(PushReceiver::bind(&settings.receiver, relay).await?);

        let server = receiver.clone();
        tokio::spawn(async move {
            if let Err(e) = server.serve().await {
                tracing::error!(error = %e, "Push receiver terminated.");
            }
        });

        let base_url = settings.server.base_url.clone();
        tokio::spawn(async move {
            enroll_and_report(&base_url, receiver.as_ref()).await;
        });
    }

    let mut table = SignalTable::new();
    let mut current_status = *status_rx.borrow();
    print!("{}", table.render(&current_status.to_string()));

    loop {
        tokio::select! {
            message = messages.next() => {
                let Some(message) = message else { break };
                if table.apply(&message) > 0 {
                    print!("{}", table.render(&current_status.to_string()));
                }
            }
            status = next_status(&mut status_rx) => {
                let Some(status) = status else { break };
                current_status = status;
                print!("{}", table.render(&current_status.to_string()));
            }
        }
    }

    Ok(())
}

/// Waits for the next connection-status change. `None` means the stream
/// side hung up, which only happens on shutdown.
async fn next_status(
    rx: &mut watch::Receiver<ConnectionStatus>,
) -> Option<ConnectionStatus> {
    rx.changed().await.ok()?;
    Some(*rx.borrow_and_update())
}

// --- "Enroll" Subcommand Logic ---

/// Handles the `enroll` subcommand: the one-shot enrollment sequence,
/// followed by serving the receiver so the issued subscription stays
/// reachable.
async fn run_enrollment(settings: Settings) -> Result<()> {
    let relay = build_relay(&settings);
    let receiver = Arc::new(PushReceiver::bind(&settings.receiver, relay).await?);

    if !enroll_and_report(&settings.server.base_url, receiver.as_ref()).await {
        return Ok(());
    }

    receiver.serve().await?;
    Ok(())
}

/// Wires the desktop relay that receiver deliveries are handed to. Clicks
/// open the server's dashboard root.
fn build_relay(settings: &Settings) -> Arc<Relay> {
    let notifier = DesktopNotifier::new(settings.server.base_url.clone());
    Arc::new(Relay::new(
        Box::new(notifier),
        settings.notify.icon.clone(),
        settings.notify.badge.clone(),
    ))
}

/// Runs the enrollment sequence once, reporting the outcome to the user.
/// The user gets one line either way; the failing cause goes to the log.
async fn enroll_and_report(base_url: &str, platform: &dyn PushPlatform) -> bool {
    let mut enroller = Enroller::new(base_url);
    match enroller.enroll(platform).await {
        Ok(subscription) => {
            tracing::info!(endpoint = %subscription.endpoint, "Enrolled for push.");
            println!("Push notifications enabled.");
            true
        }
        Err(push::Error::Unsupported) => {
            println!("Push notifications are not supported on this platform.");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "Push enrollment failed.");
            println!("Could not enable push notifications.");
            false
        }
    }
}
