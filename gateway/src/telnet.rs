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

//! Telnet line handling for the Telline Gateway
//!
//! This module provides:
//! - A line discipline with server-side echo and backspace editing
//! - Per-connection pumps that multiplex echo, messages, and prompt redraws
//!   onto a single socket writer
//! - A listener that publishes each accepted connection to the application

pub mod connection;
pub mod discipline;
pub mod pump;
pub mod server;

pub use connection::Connection;
pub use discipline::{Feed, LineDiscipline};
pub use server::{TelnetServer, serve};

/// Runtime settings applied to every accepted connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelnetSettings {
    /// Largest chunk read from the socket at once
    pub read_buffer_size: usize,

    /// Capacity of the line, message, and trigger queues
    pub queue_depth: usize,
}

impl TelnetSettings {
    /// Capacity of the raw byte queue, which must hold a whole redraw.
    pub fn raw_queue_depth(&self) -> usize {
        self.queue_depth.max(pump::REDRAW_CHUNKS)
    }
}

impl Default for TelnetSettings {
    fn default() -> Self {
        Self {
            read_buffer_size: 512,
            queue_depth: 1,
        }
    }
}
