//! Terminal chat client for Hiroba.
//!
//! Joins a room, sends stdin lines as chat messages and shows the live
//! member list. Reconnects on disconnection (max 5 attempts with 5 second
//! interval) and joins again under the same username.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin hiroba-client -- --username Ann
//! cargo run --bin hiroba-client                       # random name such as SilentGuest42
//! cargo run --bin hiroba-client -- -n Bob -r lobby -u ws://127.0.0.1:3000
//! ```

use clap::Parser;

use hiroba_client::domain::{generate_username, room_url, validate_username};
use hiroba_shared::logger::{LogFormat, setup_logger};

#[derive(Parser, Debug)]
#[command(name = "hiroba-client")]
#[command(about = "Terminal client for the Hiroba chat server", long_about = None)]
struct Args {
    /// Display name shown to other members (1-20 characters, random when omitted)
    #[arg(short = 'n', long, env = "HIROBA_USERNAME")]
    username: Option<String>,

    /// Room to join
    #[arg(short = 'r', long, env = "HIROBA_ROOM", default_value = "anonymous-chat")]
    room: String,

    /// WebSocket server URL
    #[arg(short = 'u', long, env = "HIROBA_URL", default_value = "ws://127.0.0.1:8080")]
    url: String,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "HIROBA_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level, LogFormat::Pretty);

    let requested = match args.username {
        Some(username) => username,
        None => {
            let generated = generate_username(&mut rand::rng());
            tracing::info!("No username given, joining as '{}'", generated);
            generated
        }
    };
    let username = match validate_username(&requested) {
        Ok(username) => username,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    // Run the client
    let url = room_url(&args.url, &args.room);
    if let Err(e) = hiroba_client::run_client(url, username).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
