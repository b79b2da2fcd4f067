use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use deskshare::ParticipantId;
use deskshare::model::{IceServerConfig, InputEvent, InputKind, ReceivedInput};
use deskshare::peer::{PeerEvent, PeerSession, RtcTransportFactory, SessionConfig, SessionHandle};
use deskshare::relay::{Relay, RelayConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEMO_CLICK_ATTEMPTS: u32 = 50;
const DEMO_CLICK_RETRY_MS: u64 = 100;

#[derive(Parser)]
#[command(name = "deskshare", version, about = "Room relay and peer for remote desktop sharing")]
struct Cli {
    /// Log filter, e.g. `debug` or `deskshare_peer=trace`. Falls back to RUST_LOG, then `info`.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling relay.
    Relay {
        #[arg(long, env = "DESKSHARE_BIND", default_value = "0.0.0.0:3000")]
        bind: SocketAddr,

        #[arg(long, env = "TURN_URL")]
        turn_url: Option<String>,

        #[arg(long, env = "TURN_USERNAME", requires = "turn_url")]
        turn_username: Option<String>,

        #[arg(long, env = "TURN_CREDENTIAL", requires = "turn_url")]
        turn_credential: Option<String>,
    },

    /// Join a room and log what arrives.
    Join {
        room: String,

        #[arg(long, env = "DESKSHARE_RELAY", default_value = "ws://127.0.0.1:3000/ws")]
        relay: String,

        /// As host, send a click at the centre to every participant that connects.
        #[arg(long)]
        demo_click: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Relay {
            bind,
            turn_url,
            turn_username,
            turn_credential,
        } => {
            let mut ice_servers = IceServerConfig::default_stun();
            if let Some(url) = turn_url {
                ice_servers.push(IceServerConfig {
                    urls: vec![url],
                    username: turn_username,
                    credential: turn_credential,
                });
            }

            println!("{}", "📡 Starting deskshare relay...".green().bold());
            println!("   🔌 Listening: ws://{}/ws", bind);
            println!("   🧊 ICE servers: {}", ice_servers.len());

            Relay::bind_and_serve(RelayConfig { bind, ice_servers }).await
        }
        Commands::Join {
            room,
            relay,
            demo_click,
        } => run_join(room, relay, demo_click).await,
    }
}

fn init_logging(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).context("Invalid --log-level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

async fn run_join(room: String, relay: String, demo_click: bool) -> Result<()> {
    let factory = Arc::new(RtcTransportFactory::new().context("Failed to set up WebRTC")?);
    let (handle, mut events) = PeerSession::connect(SessionConfig::new(relay, room), factory)
        .await
        .context("Failed to join room")?;

    println!(
        "{} room {} as {} ({})",
        "✨ Joined".green().bold(),
        handle.room().to_string().cyan(),
        handle.role().to_string().yellow(),
        handle.local_id()
    );

    handle
        .set_input_callback(|input: ReceivedInput| {
            info!(
                "Input {} from {}: {:?}",
                input.event.name(),
                input.sender_id,
                input.event.kind
            );
        })
        .await?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Leaving room...".cyan());
                break;
            }
            event = events.recv() => match event {
                Some(PeerEvent::ParticipantConnected(id)) => {
                    println!("{} {}", "➕ Connected:".green(), id);
                    if demo_click && handle.role().is_host() {
                        tokio::spawn(send_demo_click(handle.clone(), id));
                    }
                }
                Some(PeerEvent::ParticipantDisconnected(id)) => {
                    println!("{} {}", "➖ Disconnected:".yellow(), id);
                }
                Some(PeerEvent::RemoteTrack { participant, track }) => {
                    info!("Receiving {} track from {}", track.kind(), participant);
                }
                None => {
                    warn!("Session ended");
                    break;
                }
            }
        }
    }

    // Already closed when the relay went away.
    let _ = handle.shutdown().await;
    Ok(())
}

/// The input channel opens shortly after negotiation completes, so retry for a while.
async fn send_demo_click(handle: SessionHandle, target: ParticipantId) {
    let click = InputEvent::new(InputKind::Click {
        x: 50.0,
        y: 50.0,
        button: 0,
    });

    for _ in 0..DEMO_CLICK_ATTEMPTS {
        match handle.send_input_event(click.clone(), Some(target)).await {
            Ok(0) => tokio::time::sleep(Duration::from_millis(DEMO_CLICK_RETRY_MS)).await,
            Ok(_) => {
                info!("Demo click sent to {}", target);
                return;
            }
            Err(e) => {
                warn!("Demo click to {} failed: {}", target, e);
                return;
            }
        }
    }
    warn!("Input channel to {} never opened", target);
}
