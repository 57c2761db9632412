//! Per-room serialization point.
//!
//! Every join, message and leave of a room is executed by a single worker
//! task owned by that room. Commands are processed one at a time in arrival
//! order, and fan-out is a non-blocking enqueue done by the worker itself, so
//! two messages accepted in order A, B reach every member in order A, B.
//!
//! When a leave empties a room that is not pinned, the worker closes the room
//! and retires. The next command for that room starts a fresh worker.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{mpsc, oneshot};

use crate::domain::{ChatError, ChatMessage, ConnectionId, Member, RoomId};

use super::{join_room::JoinRoomUseCase, leave_room::LeaveRoomUseCase, send_message::SendMessageUseCase};

enum RoomCommand {
    Join {
        connection_id: ConnectionId,
        username: String,
        reply: oneshot::Sender<Result<Member, ChatError>>,
    },
    Message {
        connection_id: ConnectionId,
        text: String,
        reply: oneshot::Sender<Result<ChatMessage, ChatError>>,
    },
    Leave {
        connection_id: ConnectionId,
        reply: oneshot::Sender<Option<Member>>,
    },
}

type WorkerMap = Mutex<HashMap<RoomId, mpsc::UnboundedSender<RoomCommand>>>;

#[derive(Clone)]
struct RoomHandlers {
    join: Arc<JoinRoomUseCase>,
    send_message: Arc<SendMessageUseCase>,
    leave: Arc<LeaveRoomUseCase>,
}

/// Dispatches room commands to per-room worker tasks
pub struct RoomCoordinator {
    handlers: RoomHandlers,
    workers: Arc<WorkerMap>,
    pinned: Option<RoomId>,
}

impl RoomCoordinator {
    pub fn new(
        join: Arc<JoinRoomUseCase>,
        send_message: Arc<SendMessageUseCase>,
        leave: Arc<LeaveRoomUseCase>,
    ) -> Self {
        Self {
            handlers: RoomHandlers {
                join,
                send_message,
                leave,
            },
            workers: Arc::new(Mutex::new(HashMap::new())),
            pinned: None,
        }
    }

    /// Keep the given room open even when its last member leaves
    pub fn with_pinned_room(mut self, room_id: RoomId) -> Self {
        self.pinned = Some(room_id);
        self
    }

    /// Admit a connection into the room under the given display name
    pub async fn join(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        username: String,
    ) -> Result<Member, ChatError> {
        let (reply, response) = oneshot::channel();
        self.dispatch(
            room_id,
            RoomCommand::Join {
                connection_id,
                username,
                reply,
            },
        )?;
        response.await.map_err(|_| worker_stopped(room_id))?
    }

    /// Accept a chat message and fan it out to the room
    pub async fn send_message(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
        text: String,
    ) -> Result<ChatMessage, ChatError> {
        let (reply, response) = oneshot::channel();
        self.dispatch(
            room_id,
            RoomCommand::Message {
                connection_id,
                text,
                reply,
            },
        )?;
        response.await.map_err(|_| worker_stopped(room_id))?
    }

    /// Remove a connection from the room (no-op when it never joined)
    pub async fn leave(
        &self,
        room_id: &RoomId,
        connection_id: ConnectionId,
    ) -> Result<Option<Member>, ChatError> {
        let (reply, response) = oneshot::channel();
        self.dispatch(
            room_id,
            RoomCommand::Leave {
                connection_id,
                reply,
            },
        )?;
        response.await.map_err(|_| worker_stopped(room_id))
    }

    /// Number of rooms that currently have a worker
    pub fn active_workers(&self) -> usize {
        self.workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn dispatch(&self, room_id: &RoomId, command: RoomCommand) -> Result<(), ChatError> {
        let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);

        let sender = workers
            .entry(room_id.clone())
            .or_insert_with(|| self.spawn_worker(room_id));

        if let Err(mpsc::error::SendError(command)) = sender.send(command) {
            // The previous worker is gone (it panicked); start a new one.
            tracing::error!("Room worker for '{}' stopped, restarting", room_id);
            let fresh = self.spawn_worker(room_id);
            fresh
                .send(command)
                .map_err(|_| worker_stopped(room_id))?;
            workers.insert(room_id.clone(), fresh);
        }

        Ok(())
    }

    fn spawn_worker(&self, room_id: &RoomId) -> mpsc::UnboundedSender<RoomCommand> {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = RoomWorker {
            room_id: room_id.clone(),
            handlers: self.handlers.clone(),
            workers: self.workers.clone(),
            reclaimable: self.pinned.as_ref() != Some(room_id),
        };
        tokio::spawn(worker.run(rx));
        tx
    }
}

fn worker_stopped(room_id: &RoomId) -> ChatError {
    ChatError::RoomUnavailable(format!("worker of room '{}' stopped", room_id))
}

struct RoomWorker {
    room_id: RoomId,
    handlers: RoomHandlers,
    workers: Arc<WorkerMap>,
    reclaimable: bool,
}

impl RoomWorker {
    async fn run(self, mut commands: mpsc::UnboundedReceiver<RoomCommand>) {
        let room_id = &self.room_id;
        tracing::debug!("Room worker for '{}' started", room_id);

        let mut pending = None;
        loop {
            let command = match pending.take() {
                Some(command) => command,
                None => match commands.recv().await {
                    Some(command) => command,
                    None => break,
                },
            };

            // A dropped reply receiver only means the requester went away; the
            // command has still been applied.
            match command {
                RoomCommand::Join {
                    connection_id,
                    username,
                    reply,
                } => {
                    let result = self
                        .handlers
                        .join
                        .execute(room_id, connection_id, username)
                        .await;
                    let _ = reply.send(result);
                }
                RoomCommand::Message {
                    connection_id,
                    text,
                    reply,
                } => {
                    let result = self
                        .handlers
                        .send_message
                        .execute(room_id, &connection_id, text)
                        .await;
                    let _ = reply.send(result);
                }
                RoomCommand::Leave {
                    connection_id,
                    reply,
                } => {
                    let result = self.handlers.leave.execute(room_id, &connection_id).await;

                    let mut retired = false;
                    if self.reclaimable && self.handlers.leave.reclaim(room_id).await {
                        pending = self.retire(&mut commands);
                        retired = pending.is_none();
                    }

                    let _ = reply.send(result);
                    if retired {
                        break;
                    }
                }
            }
        }

        tracing::debug!("Room worker for '{}' stopped", room_id);
    }

    /// Unregister this worker unless more commands are already queued.
    ///
    /// `dispatch` sends while holding the map lock, so once the entry is gone
    /// no further command can reach this channel.
    fn retire(&self, commands: &mut mpsc::UnboundedReceiver<RoomCommand>) -> Option<RoomCommand> {
        let mut workers = self.workers.lock().unwrap_or_else(PoisonError::into_inner);
        match commands.try_recv() {
            Ok(command) => Some(command),
            Err(_) => {
                workers.remove(&self.room_id);
                None
            }
        }
    }
}
