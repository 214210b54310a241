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

//! Per-connection pumps
//!
//! Each connection runs four tasks connected by queues:
//! - [`read_lines`] feeds socket bytes through the [`LineDiscipline`]
//! - [`write_raw`] is the only task that writes to the socket
//! - [`write_and_prompt`] prints messages followed by a prompt redraw
//! - [`trigger_prompts`] turns bare redraw requests into empty messages
//!
//! Every queue is bounded, so a socket that stops draining stalls the reader
//! and the prompt writer in turn. Both reserve raw queue slots before taking
//! the discipline lock and fill them while holding it; the lock is never held
//! across an await on a queue.

use crate::telnet::discipline::LineDiscipline;
use bytes::Bytes;
use std::sync::Arc;
use telline_common::compose_redraw;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

/// Most raw chunks a single redraw produces: the message, then the prompt.
pub const REDRAW_CHUNKS: usize = 2;

/// Read socket bytes until EOF or error, delivering completed lines.
///
/// Dropping `lines` on return is what tells the application the connection
/// is gone.
pub async fn read_lines<R>(
    connection_id: Uuid,
    state: Arc<Mutex<LineDiscipline>>,
    mut reader: R,
    lines: mpsc::Sender<String>,
    raw: mpsc::Sender<Bytes>,
    read_buffer_size: usize,
) where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; read_buffer_size];

    loop {
        let count = match reader.read(&mut chunk).await {
            Ok(0) => {
                tracing::debug!("Connection {} reached end of stream", connection_id);
                break;
            }
            Ok(count) => count,
            Err(e) => {
                tracing::debug!("Read failed on connection {}: {}", connection_id, e);
                break;
            }
        };

        // Held even when nothing gets echoed, so a full raw queue stops reading.
        let Ok(permit) = raw.reserve().await else {
            tracing::debug!("Raw writer for connection {} stopped", connection_id);
            break;
        };

        let completed = {
            let mut discipline = state.lock().await;
            let feed = discipline.feed(&chunk[..count]);
            if !feed.echo.is_empty() {
                permit.send(Bytes::from(feed.echo));
            }
            feed.lines
        };

        for line in completed {
            tracing::trace!("Connection {} completed line: {:?}", connection_id, line);
            if lines.send(line).await.is_err() {
                tracing::debug!("Line receiver for connection {} dropped", connection_id);
                return;
            }
        }
    }
}

/// Write raw chunks to the socket in the order they were queued.
///
/// Write failures are logged and the queue keeps draining so producers never
/// stall behind a dead socket.
pub async fn write_raw<W>(connection_id: Uuid, mut chunks: mpsc::Receiver<Bytes>, mut writer: W)
where
    W: AsyncWrite + Unpin,
{
    while let Some(chunk) = chunks.recv().await {
        if let Err(e) = writer.write_all(&chunk).await {
            tracing::warn!("Failed to write to connection {}: {}", connection_id, e);
        }
    }

    if let Err(e) = writer.shutdown().await {
        tracing::debug!("Failed to shut down connection {}: {}", connection_id, e);
    }
}

/// Print each requested message and redraw the prompt behind it.
///
/// Both chunks are queued while the lock is held, so the redraw always
/// reflects the last chunk the reader finished processing. `raw` must have
/// room for at least [`REDRAW_CHUNKS`] chunks.
pub async fn write_and_prompt(
    state: Arc<Mutex<LineDiscipline>>,
    mut requests: mpsc::Receiver<String>,
    raw: mpsc::Sender<Bytes>,
) {
    while let Some(message) = requests.recv().await {
        let Ok(mut permits) = raw.reserve_many(REDRAW_CHUNKS).await else {
            return;
        };

        let discipline = state.lock().await;
        for chunk in compose_redraw(&message, discipline.echo(), discipline.buffer()) {
            if let Some(permit) = permits.next() {
                permit.send(chunk);
            }
        }
    }
}

/// Forward each bare trigger as an empty message.
pub async fn trigger_prompts(mut triggers: mpsc::Receiver<()>, requests: mpsc::Sender<String>) {
    while triggers.recv().await.is_some() {
        if requests.send(String::new()).await.is_err() {
            break;
        }
    }
}
