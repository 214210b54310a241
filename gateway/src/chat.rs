//
// Copyright 2025-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Chat room relay
//!
//! A minimal application collaborator for the telnet gateway: every line a
//! user submits is printed on every other user's terminal above their
//! partially typed input.

use crate::telnet::Connection;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use uuid::Uuid;

/// Line that disconnects the sender.
pub const QUIT_COMMAND: &str = "/quit";

/// Shared room of connected users
#[derive(Clone, Default)]
pub struct ChatRoom {
    /// Message senders keyed by connection ID
    members: Arc<RwLock<HashMap<Uuid, mpsc::Sender<String>>>>,
}

impl ChatRoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users currently in the room
    pub async fn member_count(&self) -> usize {
        self.members.read().await.len()
    }

    /// Serve every connection published by the listener.
    pub async fn run(self, mut connections: mpsc::Receiver<Connection>) {
        while let Some(connection) = connections.recv().await {
            let room = self.clone();
            tokio::spawn(async move { room.handle(connection).await });
        }
    }

    async fn handle(&self, mut connection: Connection) {
        let id = connection.id();
        let name = connection.peer_addr().to_string();

        self.members.write().await.insert(id, connection.writer());
        if connection
            .write(format!("Welcome! Type {} to leave.", QUIT_COMMAND))
            .await
            .is_err()
        {
            self.members.write().await.remove(&id);
            return;
        }
        self.broadcast(id, format!("{} has joined", name)).await;

        while let Some(line) = connection.read_line().await {
            if line.trim() == QUIT_COMMAND {
                let _ = connection.write("Goodbye.").await;
                break;
            }
            tracing::debug!("Chat message from {}: {}", name, line);
            self.broadcast(id, format!("{}: {}", name, line)).await;
            if connection.prompt().await.is_err() {
                break;
            }
        }

        self.members.write().await.remove(&id);
        self.broadcast(id, format!("{} has left", name)).await;
        connection.close();
    }

    async fn broadcast(&self, from: Uuid, message: String) {
        // Collect first so no lock is held while a member's queue is full.
        let recipients: Vec<mpsc::Sender<String>> = self
            .members
            .read()
            .await
            .iter()
            .filter(|(id, _)| **id != from)
            .map(|(_, sender)| sender.clone())
            .collect();

        for recipient in recipients {
            let _ = recipient.send(message.clone()).await;
        }
    }
}
