//! Tic-tac-toe game server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin sanmoku-server
//! cargo run --bin sanmoku-server -- --host 0.0.0.0 --port 3000 --reconnect-grace-ms 3000
//! ```

use std::time::Duration;

use clap::Parser;
use sanmoku_server::{
    config::{DEFAULT_MAX_ROOMS, DEFAULT_ROOM_CODE_LENGTH, ServerConfig},
    domain::value_object::ROOM_ID_MAX_CHARS,
    ui::Server,
};
use sanmoku_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "sanmoku-server")]
#[command(about = "Authoritative tic-tac-toe game server over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "debug")]
    log_level: String,

    /// How long a disconnected player keeps their seat online before the opponent is told
    #[arg(long, default_value = "0")]
    reconnect_grace_ms: u64,

    /// Number of characters in generated room codes
    #[arg(long, default_value_t = DEFAULT_ROOM_CODE_LENGTH)]
    room_code_length: usize,

    /// Maximum number of rooms alive at once
    #[arg(long, default_value_t = DEFAULT_MAX_ROOMS)]
    max_rooms: usize,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            reconnect_grace: Duration::from_millis(args.reconnect_grace_ms),
            room_code_length: args.room_code_length,
            max_rooms: args.max_rooms,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if !(1..=ROOM_ID_MAX_CHARS).contains(&args.room_code_length) {
        tracing::error!(
            "--room-code-length must be between 1 and {}, got {}",
            ROOM_ID_MAX_CHARS,
            args.room_code_length
        );
        std::process::exit(2);
    }

    let config = ServerConfig::from(args);
    let server = Server::new(config.build_state());
    if let Err(e) = server.run(config.host, config.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
