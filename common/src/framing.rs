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

//! Output framing
//!
//! Text lines end in CR LF. After any message the user's unsubmitted input is
//! redrawn behind the private marker [`PROMPT_MARKER`], which compatible
//! clients use to repaint their input line.

use bytes::{BufMut, Bytes, BytesMut};

/// Line terminator for everything the server prints.
pub const NEWLINE: &[u8] = b"\r\n";

/// Prefix for a redrawn prompt, followed by the raw input buffer.
pub const PROMPT_MARKER: &[u8] = b"\r\0> ";

/// Moves the cursor back to column zero when the server is echoing.
pub const ECHO_PREFIX: &[u8] = b"\r\0";

/// Erases one character on the client's screen.
pub const ERASE: &[u8] = b"\x08 \x08";

/// Compose the chunks that print `message` and redraw the prompt.
///
/// When echo is off the client is still echoing locally, so a plain newline
/// is used to step past whatever it has drawn. An empty message yields only
/// the redraw chunk.
pub fn compose_redraw(message: &str, echo: bool, buffer: &[u8]) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(2);

    if !message.is_empty() {
        let prefix = if echo { ECHO_PREFIX } else { NEWLINE };
        let mut chunk = BytesMut::with_capacity(prefix.len() + message.len() + NEWLINE.len());
        chunk.put_slice(prefix);
        chunk.put_slice(message.as_bytes());
        chunk.put_slice(NEWLINE);
        chunks.push(chunk.freeze());
    }

    let mut prompt = BytesMut::with_capacity(PROMPT_MARKER.len() + buffer.len());
    prompt.put_slice(PROMPT_MARKER);
    prompt.put_slice(buffer);
    chunks.push(prompt.freeze());

    chunks
}
