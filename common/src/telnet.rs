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

//! Telnet protocol constants
//!
//! Only the subset needed for echo negotiation is modelled here. Every other
//! command byte a client sends is absorbed by the line discipline without
//! interpretation.

/// Telnet command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TelnetCommand {
    /// Interpret As Command
    IAC = 255,
    /// Don't do option
    DONT = 254,
    /// Do option
    DO = 253,
    /// Won't do option
    WONT = 252,
    /// Will do option
    WILL = 251,
}

impl TelnetCommand {
    /// Convert command to byte
    pub const fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Telnet option codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TelnetOption {
    /// Echo
    Echo = 1,
    /// Suppress go ahead
    SuppressGoAhead = 3,
}

impl TelnetOption {
    /// Convert option to byte
    pub const fn to_byte(self) -> u8 {
        self as u8
    }
}

/// Sent to every client on connect: `IAC WILL SUPPRESS-GO-AHEAD`, `IAC WILL ECHO`.
///
/// The server keeps treating the client as locally echoing until it sees
/// `IAC DO ECHO` come back.
pub const INITIAL_NEGOTIATION: [u8; 6] = [
    TelnetCommand::IAC.to_byte(),
    TelnetCommand::WILL.to_byte(),
    TelnetOption::SuppressGoAhead.to_byte(),
    TelnetCommand::IAC.to_byte(),
    TelnetCommand::WILL.to_byte(),
    TelnetOption::Echo.to_byte(),
];

/// Build a telnet negotiation sequence
pub const fn build_negotiation(command: TelnetCommand, option: TelnetOption) -> [u8; 3] {
    [TelnetCommand::IAC.to_byte(), command.to_byte(), option.to_byte()]
}
