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

//! Telnet connection handle

use crate::error::{GatewayError, GatewayResult};
use crate::telnet::TelnetSettings;
use crate::telnet::discipline::LineDiscipline;
use crate::telnet::pump;
use bytes::Bytes;
use std::net::SocketAddr;
use std::sync::Arc;
use telline_common::INITIAL_NEGOTIATION;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Application-facing side of an accepted telnet connection.
///
/// Dropping the handle closes the message, trigger, and raw queues; the
/// writer pumps drain what is already queued and then shut the socket down.
pub struct Connection {
    /// Connection ID
    id: Uuid,

    /// Remote peer address
    peer_addr: SocketAddr,

    /// Completed lines from the reader pump
    lines: mpsc::Receiver<String>,

    /// Messages to print before redrawing the prompt
    write: mpsc::Sender<String>,

    /// Bare prompt redraw triggers
    prompt: mpsc::Sender<()>,

    /// Bytes written to the socket verbatim
    raw: mpsc::Sender<Bytes>,

    /// Reader pump, kept so `close` can stop it
    reader: JoinHandle<()>,
}

impl Connection {
    /// Wire up the four pumps for `stream` and queue the initial negotiation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn detach<S>(stream: S, peer_addr: SocketAddr, settings: &TelnetSettings) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let id = Uuid::new_v4();
        let (read_half, write_half) = tokio::io::split(stream);
        let state = Arc::new(Mutex::new(LineDiscipline::new()));

        let (lines_tx, lines_rx) = mpsc::channel(settings.queue_depth);
        let (write_tx, write_rx) = mpsc::channel(settings.queue_depth);
        let (prompt_tx, prompt_rx) = mpsc::channel(settings.queue_depth);
        let (raw_tx, raw_rx) = mpsc::channel(settings.raw_queue_depth());

        // Queued into the empty channel before any pump runs, so it is first on the wire.
        let _ = raw_tx.try_send(Bytes::from_static(&INITIAL_NEGOTIATION));

        let reader = tokio::spawn(pump::read_lines(
            id,
            state.clone(),
            read_half,
            lines_tx,
            raw_tx.clone(),
            settings.read_buffer_size,
        ));
        tokio::spawn(pump::write_raw(id, raw_rx, write_half));
        tokio::spawn(pump::write_and_prompt(state, write_rx, raw_tx.clone()));
        tokio::spawn(pump::trigger_prompts(prompt_rx, write_tx.clone()));

        Self {
            id,
            peer_addr,
            lines: lines_rx,
            write: write_tx,
            prompt: prompt_tx,
            raw: raw_tx,
            reader,
        }
    }

    /// Get connection ID
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the remote peer address
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Wait for the next completed line.
    ///
    /// Returns `None` once the client has disconnected.
    pub async fn read_line(&mut self) -> Option<String> {
        self.lines.recv().await
    }

    /// Print a message, then redraw the user's partial input.
    pub async fn write(&self, message: impl Into<String>) -> GatewayResult<()> {
        self.write
            .send(message.into())
            .await
            .map_err(|_| GatewayError::ConnectionClosed)
    }

    /// Redraw the prompt without printing anything.
    pub async fn prompt(&self) -> GatewayResult<()> {
        self.prompt
            .send(())
            .await
            .map_err(|_| GatewayError::ConnectionClosed)
    }

    /// Queue bytes for the socket without any framing.
    pub async fn write_raw(&self, bytes: impl Into<Bytes>) -> GatewayResult<()> {
        self.raw
            .send(bytes.into())
            .await
            .map_err(|_| GatewayError::ConnectionClosed)
    }

    /// A sender for messages, for use by tasks that do not own the connection.
    pub fn writer(&self) -> mpsc::Sender<String> {
        self.write.clone()
    }

    /// A sender for prompt triggers.
    pub fn prompter(&self) -> mpsc::Sender<()> {
        self.prompt.clone()
    }

    /// Stop reading and let the writers flush and close the socket.
    pub fn close(self) {
        tracing::info!("Closed connection {} to {}", self.id, self.peer_addr);
        self.reader.abort();
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};
    use tokio::time::{Duration, timeout};

    fn peer() -> SocketAddr {
        SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 40000)
    }

    async fn read_exact(client: &mut DuplexStream, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        client.read_exact(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn test_detach_sends_negotiation() {
        let (server, mut client) = tokio::io::duplex(1024);
        let _conn = Connection::detach(server, peer(), &TelnetSettings::default());

        assert_eq!(read_exact(&mut client, 6).await, INITIAL_NEGOTIATION);
    }

    #[tokio::test]
    async fn test_echo_and_line_delivery() {
        let (server, mut client) = tokio::io::duplex(1024);
        let mut conn = Connection::detach(server, peer(), &TelnetSettings::default());
        read_exact(&mut client, 6).await;

        client.write_all(&[0xFF, 0xFD, 0x01]).await.unwrap();
        client.write_all(b"go\r\n").await.unwrap();

        assert_eq!(conn.read_line().await.as_deref(), Some("go"));
        assert_eq!(read_exact(&mut client, 4).await, b"go\r\n");
    }

    #[tokio::test]
    async fn test_write_redraws_partial_input() {
        let (server, mut client) = tokio::io::duplex(1024);
        let conn = Connection::detach(server, peer(), &TelnetSettings::default());
        read_exact(&mut client, 6).await;

        client.write_all(&[0xFF, 0xFD, 0x01]).await.unwrap();
        client.write_all(b"foo").await.unwrap();
        assert_eq!(read_exact(&mut client, 3).await, b"foo");

        conn.write("hello").await.unwrap();
        let expected = b"\r\0hello\r\n\r\0> foo";
        assert_eq!(read_exact(&mut client, expected.len()).await, expected);
    }

    #[tokio::test]
    async fn test_write_raw_is_ordered_with_echo_and_redraw() {
        let (server, mut client) = tokio::io::duplex(1024);
        let conn = Connection::detach(server, peer(), &TelnetSettings::default());
        read_exact(&mut client, 6).await;

        client.write_all(&[0xFF, 0xFD, 0x01]).await.unwrap();
        client.write_all(b"ab").await.unwrap();
        assert_eq!(read_exact(&mut client, 2).await, b"ab");

        conn.write_raw(Bytes::from_static(b"\x07")).await.unwrap();
        conn.write("hi").await.unwrap();

        let expected = b"\x07\r\0hi\r\n\r\0> ab";
        assert_eq!(read_exact(&mut client, expected.len()).await, expected);
    }

    #[tokio::test]
    async fn test_echo_flood_stalls_when_client_stops_reading() {
        let (server, mut client) = tokio::io::duplex(64);
        let _conn = Connection::detach(server, peer(), &TelnetSettings::default());
        read_exact(&mut client, 6).await;

        client.write_all(&[0xFF, 0xFD, 0x01]).await.unwrap();
        let flood = vec![b'a'; 4 * 1024 * 1024];
        let result = timeout(Duration::from_millis(500), client.write_all(&flood)).await;

        assert!(result.is_err(), "server kept accepting input it could not echo");
    }

    #[tokio::test]
    async fn test_messages_stall_when_client_stops_reading() {
        let (server, mut client) = tokio::io::duplex(64);
        let conn = Connection::detach(server, peer(), &TelnetSettings::default());
        read_exact(&mut client, 6).await;

        let mut stalled = false;
        for _ in 0..1000 {
            if timeout(Duration::from_millis(100), conn.write("news"))
                .await
                .is_err()
            {
                stalled = true;
                break;
            }
        }

        assert!(stalled, "server kept accepting messages it could not send");
    }

    #[tokio::test]
    async fn test_prompt_trigger() {
        let (server, mut client) = tokio::io::duplex(1024);
        let conn = Connection::detach(server, peer(), &TelnetSettings::default());
        read_exact(&mut client, 6).await;

        conn.prompt().await.unwrap();
        assert_eq!(read_exact(&mut client, 4).await, b"\r\0> ");
    }

    #[tokio::test]
    async fn test_disconnect_closes_lines() {
        let (server, client) = tokio::io::duplex(1024);
        let mut conn = Connection::detach(server, peer(), &TelnetSettings::default());

        drop(client);
        assert_eq!(conn.read_line().await, None);
    }

    #[tokio::test]
    async fn test_close_shuts_socket() {
        let (server, mut client) = tokio::io::duplex(1024);
        let conn = Connection::detach(server, peer(), &TelnetSettings::default());
        read_exact(&mut client, 6).await;

        conn.close();

        let mut rest = Vec::new();
        client.read_to_end(&mut rest).await.unwrap();
        assert!(rest.is_empty());
    }
}
