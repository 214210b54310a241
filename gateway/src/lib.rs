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

//! Telline Gateway Library
//!
//! This library provides a telnet line discipline and the per-connection
//! pumps that let an application read completed lines and print messages
//! without clobbering the user's partially typed input.

pub mod chat;
pub mod config;
pub mod error;
pub mod telnet;

// Re-export commonly used types
pub use error::{GatewayError, GatewayResult};
pub use telnet::{Connection, TelnetServer, TelnetSettings, serve};
