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

//! Gateway error types

use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can occur while configuring or running the gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The telnet listener could not be bound.
    #[error("Failed to bind telnet listener on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be opened.
    #[error("Failed to open config file: {0}")]
    ConfigOpen(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The connection's pumps have already shut down.
    #[error("Connection closed")]
    ConnectionClosed,
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
