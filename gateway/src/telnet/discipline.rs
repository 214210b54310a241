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

//! Line discipline
//!
//! Turns raw telnet input into completed lines, tracking the echo negotiation
//! and producing the bytes the server must echo back while the client has
//! local echo disabled.

use telline_common::framing::{ERASE, NEWLINE};
use telline_common::{TelnetCommand, TelnetOption};

/// Delete, as sent by most clients for the backspace key.
const DELETE: u8 = 0x7F;

/// Result of feeding one read chunk through the discipline.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Feed {
    /// Bytes to echo back to the client, in order.
    pub echo: Vec<u8>,
    /// Lines completed by this chunk, in arrival order.
    pub lines: Vec<String>,
}

/// Per-connection edit buffer and echo state.
///
/// This is the state shared between the reader and prompt-writer pumps and
/// must only be touched under the connection lock.
#[derive(Debug, Default)]
pub struct LineDiscipline {
    buffer: Vec<u8>,
    echo: bool,
}

impl LineDiscipline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the client has agreed to let the server echo.
    pub fn echo(&self) -> bool {
        self.echo
    }

    /// The unsubmitted input line.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Process one read chunk.
    ///
    /// A pending `IAC DO` does not carry over into the next chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> Feed {
        let mut feed = Feed::default();
        let mut option_expected = false;

        for &byte in chunk {
            if byte & 0x80 != 0 {
                // Only DO is interpreted, every other command byte is dropped.
                if byte == TelnetCommand::DO.to_byte() {
                    option_expected = true;
                }
            } else if option_expected {
                if byte == TelnetOption::Echo.to_byte() {
                    self.echo = true;
                }
                option_expected = false;
            } else if is_printable(byte) {
                if self.echo {
                    feed.echo.push(byte);
                }
                self.buffer.push(byte);
            } else if byte == DELETE && self.echo {
                if self.buffer.pop().is_some() {
                    feed.echo.extend_from_slice(ERASE);
                }
            } else if !self.buffer.is_empty() {
                feed.lines
                    .push(String::from_utf8_lossy(&self.buffer).into_owned());
                if self.echo {
                    feed.echo.extend_from_slice(NEWLINE);
                }
                self.buffer.clear();
            }
        }

        feed
    }
}

fn is_printable(byte: u8) -> bool {
    byte == b' ' || byte.is_ascii_graphic()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DO_ECHO: [u8; 3] = [0xFF, 0xFD, 0x01];

    fn echoing() -> LineDiscipline {
        let mut discipline = LineDiscipline::new();
        discipline.feed(&DO_ECHO);
        discipline
    }

    #[test]
    fn test_new_discipline_is_empty() {
        let discipline = LineDiscipline::new();
        assert!(!discipline.echo());
        assert!(discipline.buffer().is_empty());
    }

    #[test]
    fn test_line_without_echo() {
        let mut discipline = LineDiscipline::new();
        let feed = discipline.feed(b"look north\r\n");
        assert!(feed.echo.is_empty());
        assert_eq!(feed.lines, vec!["look north".to_string()]);
        assert!(discipline.buffer().is_empty());
    }

    #[test]
    fn test_delete_terminates_line_without_echo() {
        let mut discipline = LineDiscipline::new();
        let feed = discipline.feed(b"ab\x7f");
        assert!(feed.echo.is_empty());
        assert_eq!(feed.lines, vec!["ab".to_string()]);
    }

    #[test]
    fn test_do_echo_enables_echo() {
        let mut discipline = LineDiscipline::new();
        let feed = discipline.feed(&DO_ECHO);
        assert!(discipline.echo());
        assert_eq!(feed, Feed::default());
    }

    #[test]
    fn test_do_echo_applies_within_same_chunk() {
        let mut discipline = LineDiscipline::new();
        let feed = discipline.feed(&[0xFF, 0xFD, 0x01, b'x']);
        assert_eq!(feed.echo, b"x");
        assert_eq!(discipline.buffer(), b"x");
    }

    #[test]
    fn test_other_options_are_ignored() {
        let mut discipline = LineDiscipline::new();
        // DO SUPPRESS-GO-AHEAD, WILL ECHO
        discipline.feed(&[0xFF, 0xFD, 0x03, 0xFF, 0xFB, 0x01]);
        assert!(!discipline.echo());
        assert!(discipline.buffer().is_empty());
    }

    #[test]
    fn test_command_byte_preempts_armed_option() {
        let mut discipline = LineDiscipline::new();
        let feed = discipline.feed(&[0xFF, 0xFD, 0xFF, 0x01]);
        assert!(!discipline.echo());
        assert!(discipline.buffer().is_empty());
        assert_eq!(feed, Feed::default());
    }

    #[test]
    fn test_control_byte_terminates_line() {
        let mut discipline = LineDiscipline::new();
        let feed = discipline.feed(b"ab\tcd\r");
        assert_eq!(feed.lines, vec!["ab".to_string(), "cd".to_string()]);
        assert!(discipline.buffer().is_empty());
    }

    #[test]
    fn test_option_byte_does_not_span_chunks() {
        let mut discipline = LineDiscipline::new();
        discipline.feed(&[0xFF, 0xFD]);
        let feed = discipline.feed(&[0x01]);
        assert!(!discipline.echo());
        assert!(feed.lines.is_empty());
        assert!(discipline.buffer().is_empty());
    }

    #[test]
    fn test_echo_and_backspace() {
        let mut discipline = echoing();
        let feed = discipline.feed(b"hi\x7fi\r\n");
        assert_eq!(feed.echo, b"hi\x08 \x08i\r\n");
        assert_eq!(feed.lines, vec!["hi".to_string()]);
    }

    #[test]
    fn test_backspace_on_empty_buffer() {
        let mut discipline = echoing();
        let feed = discipline.feed(b"\x7f");
        assert!(feed.echo.is_empty());
        assert!(discipline.buffer().is_empty());
    }

    #[test]
    fn test_empty_line_is_not_delivered() {
        let mut discipline = echoing();
        let feed = discipline.feed(b"\r\n\r\n");
        assert!(feed.lines.is_empty());
        assert!(feed.echo.is_empty());
    }

    #[test]
    fn test_partial_line_survives_chunks() {
        let mut discipline = echoing();
        discipline.feed(b"say hel");
        assert_eq!(discipline.buffer(), b"say hel");
        let feed = discipline.feed(b"lo\r");
        assert_eq!(feed.lines, vec!["say hello".to_string()]);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut discipline = LineDiscipline::new();
        let feed = discipline.feed(b"one\r\ntwo\nthree");
        assert_eq!(feed.lines, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(discipline.buffer(), b"three");
    }

    #[test]
    fn test_echo_count_matches_printable_input() {
        let mut discipline = echoing();
        let typed = b"The quick brown fox!";
        let mut input = typed.to_vec();
        input.extend_from_slice(b"\r\n");

        let feed = discipline.feed(&input);
        assert_eq!(feed.echo.len(), typed.len() + NEWLINE.len());
        assert_eq!(feed.lines, vec!["The quick brown fox!".to_string()]);
    }
}
