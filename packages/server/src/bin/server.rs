//! Hiroba chat room coordinator.
//!
//! Clients connect over WebSocket, join a room with a display name and
//! exchange messages with every member of that room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-server
//! cargo run --bin hiroba-server -- --host 0.0.0.0 --port 3000 --max-rooms 16
//! ```

use std::sync::Arc;

use clap::Parser;
use hiroba_server::{config::ServerConfig, ui::Server};
use hiroba_shared::{
    logger::{LogFormat, setup_logger},
    time::SystemClock,
};

#[derive(Parser, Debug)]
#[command(name = "hiroba-server")]
#[command(about = "Real-time chat room coordinator over WebSocket", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "HIROBA_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "HIROBA_PORT", default_value = "8080")]
    port: u16,

    /// Room used when a client connects without `?room=`
    #[arg(long, env = "HIROBA_DEFAULT_ROOM", default_value = "anonymous-chat")]
    default_room: String,

    /// Maximum number of concurrently open rooms
    #[arg(long, env = "HIROBA_MAX_ROOMS", default_value = "64")]
    max_rooms: usize,

    /// Maximum number of members per room
    #[arg(long, env = "HIROBA_MAX_MEMBERS", default_value = "256")]
    max_members: usize,

    /// Frames buffered per connection before new frames are dropped
    #[arg(long, env = "HIROBA_OUTBOUND_BUFFER", default_value = "128")]
    outbound_buffer: usize,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "debug")]
    log_level: String,

    /// Log output format: pretty or json
    #[arg(long, env = "HIROBA_LOG_FORMAT", value_enum, ignore_case = true, default_value = "pretty")]
    log_format: LogFormat,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            host: args.host.clone(),
            port: args.port,
            default_room: args.default_room.clone(),
            max_rooms: args.max_rooms,
            max_members_per_room: args.max_members,
            outbound_buffer: args.outbound_buffer,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level, args.log_format);

    let config = ServerConfig::from(&args);
    tracing::debug!("Starting with {:?}", config);

    let server = match Server::new(config, Arc::new(SystemClock)) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
