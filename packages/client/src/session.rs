//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use hiroba_server::infrastructure::dto::websocket::{ClientFrame, MessagePayload};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use super::{
    domain::{is_sendable, rejected_status},
    error::ClientError,
    event::{ChatView, ServerEvent},
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

fn encode(frame: &ClientFrame) -> Result<Message, ClientError> {
    frame
        .encode()
        .map(|json| Message::Text(json.into()))
        .map_err(|e| ClientError::ConnectionError(e.to_string()))
}

/// Run one WebSocket client session: connect, join, then chat until either
/// side stops.
///
/// Returns `Ok(())` when the user quits and an error when the connection is
/// lost or refused.
pub async fn run_client_session(
    url: &str,
    username: &str,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let ws_stream = match connect_async(url).await {
        Ok((ws_stream, _response)) => ws_stream,
        Err(e) => {
            if let Some(status) = rejected_status(&e) {
                return Err(ClientError::UpgradeRejected(status));
            }
            return Err(ClientError::ConnectionError(e.to_string()));
        }
    };

    tracing::info!("Connected to chat server!");

    let (mut write, mut read) = ws_stream.split();

    // Join (or re-join after a reconnect) under the same username
    let join = encode(&ClientFrame::Join {
        username: username.to_string(),
    })?;
    write
        .send(join)
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    println!(
        "\nYou are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.\n",
        username
    );

    let username_for_read = username.to_string();

    // Spawn a task to handle incoming frames in arrival order
    let mut read_task = tokio::spawn(async move {
        let mut view = ChatView::new(username_for_read);

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if let Some(output) = view.apply(ServerEvent::decode(text.as_str())) {
                        print!("{}", output);
                        redisplay_prompt(view.username());
                    }
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(view.username());
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    return ClientError::ConnectionError(e.to_string());
                }
                _ => {}
            }
        }

        ClientError::ConnectionError("Connection lost".to_string())
    });

    // Send stdin lines as chat messages until the user quits or the read side ends
    loop {
        tokio::select! {
            read_result = &mut read_task => {
                return Err(match read_result {
                    Ok(error) => error,
                    Err(e) => ClientError::ConnectionError(e.to_string()),
                });
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    read_task.abort();
                    let _ = write.close().await;
                    return Ok(());
                };

                if !is_sendable(&line) {
                    println!("Message must be 1 to 500 characters; not sent.");
                    redisplay_prompt(username);
                    continue;
                }

                // id / username / timestamp are assigned by the server
                let message = encode(&ClientFrame::Message {
                    message: MessagePayload {
                        text: line,
                        id: None,
                        username: None,
                        timestamp: None,
                    },
                })?;

                if let Err(e) = write.send(message).await {
                    tracing::warn!("Failed to send message: {}", e);
                    read_task.abort();
                    return Err(ClientError::ConnectionError(e.to_string()));
                }
            }
        }
    }
}
