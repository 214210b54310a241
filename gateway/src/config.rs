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

use crate::error::{GatewayError, GatewayResult};
use crate::telnet::TelnetSettings;
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_env_field::EnvField;
use std::num::ParseIntError;
use std::str::FromStr;

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Arguments {
    #[arg(
        short = 'c',
        long = "config",
        help = "Path to configuration file",
        default_value = "gateway/config.yaml"
    )]
    pub config_file: String,

    #[arg(
        short = 'e',
        long = "env",
        help = "Path to environment file, defaults to .env in the working directory"
    )]
    pub env_file: Option<String>,

    #[arg(
        short = 'p',
        long = "port",
        help = "Telnet port, overrides the configuration file"
    )]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Configuration {
    #[serde(default)]
    pub telnet: TelnetConfig,
}

impl Configuration {
    pub fn load(path: &str) -> GatewayResult<Self> {
        tracing::debug!("Loading configuration from file: {}", path);
        let file = std::fs::File::open(path)?;
        let conf = serde_yaml::from_reader(file)?;
        Ok(conf)
    }

    /// Validate the loaded values and convert them into runtime settings.
    pub fn settings(&self) -> GatewayResult<TelnetSettings> {
        let read_buffer_size = self.telnet.read_buffer_size.to_usize();
        let queue_depth = self.telnet.queue_depth.to_usize();

        if read_buffer_size == 0 {
            return Err(GatewayError::InvalidConfig(
                "telnet.read_buffer_size must be greater than zero".to_string(),
            ));
        }
        if queue_depth == 0 {
            return Err(GatewayError::InvalidConfig(
                "telnet.queue_depth must be greater than zero".to_string(),
            ));
        }

        Ok(TelnetSettings {
            read_buffer_size,
            queue_depth,
        })
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct TelnetConfig {
    #[serde(default)]
    pub port: EnvField<TelnetPort>,

    /// Largest chunk handed to the line discipline per socket read
    #[serde(default)]
    pub read_buffer_size: EnvField<ReadBufferSize>,

    /// Capacity of the application-facing queues
    #[serde(default)]
    pub queue_depth: EnvField<QueueDepth>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TelnetPort(u16);

impl TelnetPort {
    pub fn to_port(&self) -> u16 {
        self.0
    }
}

impl FromStr for TelnetPort {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(u16::from_str(s.trim())?))
    }
}

impl Default for TelnetPort {
    fn default() -> Self {
        Self(4000)
    }
}

impl std::fmt::Display for TelnetPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReadBufferSize(usize);

impl ReadBufferSize {
    pub fn to_usize(&self) -> usize {
        self.0
    }
}

impl FromStr for ReadBufferSize {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(usize::from_str(s.trim())?))
    }
}

impl Default for ReadBufferSize {
    fn default() -> Self {
        Self(512)
    }
}

impl std::fmt::Display for ReadBufferSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QueueDepth(usize);

impl QueueDepth {
    pub fn to_usize(&self) -> usize {
        self.0
    }
}

impl FromStr for QueueDepth {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(usize::from_str(s.trim())?))
    }
}

impl Default for QueueDepth {
    fn default() -> Self {
        Self(1)
    }
}

impl std::fmt::Display for QueueDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
