//! # Echo channel
//!
//! Realtime endpoint for the client bundle. Connections are tracked while open
//! and nothing is ever sent on them, inbound frames are dropped.
//!
//! Only raw WebSocket clients are supported. Every path under `/ws` expects an
//! upgrade, so the SockJS handshake (`GET /ws/info`) and its polling
//! transports are rejected with a client error.
use std::{
    collections::HashSet,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use tracing::debug;

use crate::state::AppState;

pub type ConnectionId = u64;

#[derive(Default)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    open: Mutex<HashSet<ConnectionId>>,
}

impl ConnectionRegistry {
    pub fn add(&self) -> ConnectionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.open().insert(id);
        id
    }

    pub fn remove(&self, id: ConnectionId) -> bool {
        self.open().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.open().len()
    }

    pub fn is_empty(&self) -> bool {
        self.open().is_empty()
    }

    fn open(&self) -> MutexGuard<'_, HashSet<ConnectionId>> {
        // the set stays consistent even if a holder panicked
        self.open.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub async fn echo_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| track(socket, state))
}

async fn track(mut socket: WebSocket, state: Arc<AppState>) {
    let id = state.connections.add();
    debug!("Connection {id} opened, {} open", state.connections.len());

    while let Some(message) = socket.recv().await {
        match message {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    state.connections.remove(id);
    debug!("Connection {id} closed, {} open", state.connections.len());
}
