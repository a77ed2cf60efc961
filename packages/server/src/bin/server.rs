//! WebRTC signaling relay server.
//!
//! Peers join rooms over WebSocket and exchange SDP / ICE messages through this server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsunagi-server
//! cargo run --bin tsunagi-server -- --host 0.0.0.0 --port 5000 --duplicate-join reject
//! ```

use clap::{Parser, ValueEnum};
use tsunagi_server::{
    config::ServerConfig,
    domain::DuplicateJoinPolicy,
    ui::{AppState, Server},
};
use tsunagi_shared::logger::setup_logger;

/// Handling of a join whose `(room, userId)` is already present
#[derive(Debug, Clone, Copy, ValueEnum)]
enum DuplicateJoin {
    /// The newest connection takes over the identity
    Migrate,
    /// The join is refused and the first connection keeps the identity
    Reject,
}

impl From<DuplicateJoin> for DuplicateJoinPolicy {
    fn from(value: DuplicateJoin) -> Self {
        match value {
            DuplicateJoin::Migrate => Self::Migrate,
            DuplicateJoin::Reject => Self::Reject,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "tsunagi-server")]
#[command(about = "WebRTC signaling relay with rooms and screen-share coordination", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// What to do when a user id already present in the room joins again
    #[arg(long, value_enum, default_value = "migrate")]
    duplicate_join: DuplicateJoin,

    /// Send screen-share-stopped for the previous sharer when a new one starts
    #[arg(long)]
    announce_replaced_sharer: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            log_level: args.log_level,
            duplicate_join_policy: args.duplicate_join.into(),
            announce_replaced_sharer: args.announce_replaced_sharer,
        }
    }
}

#[tokio::main]
async fn main() {
    let config = ServerConfig::from(Args::parse());

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);
    tracing::debug!("Starting with {:?}", config);

    let server = Server::new(AppState::in_memory(&config));
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
