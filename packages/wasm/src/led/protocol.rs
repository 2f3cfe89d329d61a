//! Line-based serial command protocol
//!
//! Every command is one ASCII line terminated by `\r\n`:
//!
//! - `led_count:<n>`
//! - `brightness:<0-255>`
//! - `<i>:<r>,<g>,<b>;<i>:<r>,<g>,<b>;...` covering every LED once

use std::fmt;

use thiserror::Error;

use super::color::Rgb;

pub const LINE_ENDING: &str = "\r\n";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty command")]
    Empty,
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("malformed LED entry `{0}`")]
    MalformedEntry(String),
    #[error("LED entries out of order: expected index {expected}, got {actual}")]
    IndexOutOfOrder { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LedCount(usize),
    Brightness(u8),
    Frame(Vec<Rgb>),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::LedCount(n) => write!(f, "led_count:{}", n),
            Command::Brightness(b) => write!(f, "brightness:{}", b),
            Command::Frame(colors) => {
                for (i, c) in colors.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{}:{},{},{}", i, c.r, c.g, c.b)?;
                }
                Ok(())
            }
        }
    }
}

impl Command {
    /// Wire form, including the line terminator.
    pub fn encode(&self) -> String {
        format!("{}{}", self, LINE_ENDING)
    }

    /// Parse one line; a trailing `\r\n` or `\n` is ignored.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ProtocolError::Empty);
        }
        if let Some(n) = line.strip_prefix("led_count:") {
            return Ok(Command::LedCount(parse_number(n)?));
        }
        if let Some(b) = line.strip_prefix("brightness:") {
            return Ok(Command::Brightness(parse_number(b)?));
        }

        let mut colors = Vec::new();
        for entry in line.split(';') {
            let (index, rgb) = entry
                .split_once(':')
                .ok_or_else(|| ProtocolError::MalformedEntry(entry.to_string()))?;
            let index: usize = parse_number(index)?;
            if index != colors.len() {
                return Err(ProtocolError::IndexOutOfOrder {
                    expected: colors.len(),
                    actual: index,
                });
            }
            let mut channels = rgb.split(',');
            let (Some(r), Some(g), Some(b), None) =
                (channels.next(), channels.next(), channels.next(), channels.next())
            else {
                return Err(ProtocolError::MalformedEntry(entry.to_string()));
            };
            colors.push(Rgb::new(parse_number(r)?, parse_number(g)?, parse_number(b)?));
        }
        Ok(Command::Frame(colors))
    }
}

/// Non-empty trimmed lines from a chunk of device output.
pub fn device_lines(chunk: &str) -> impl Iterator<Item = &str> {
    chunk.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, ProtocolError> {
    s.trim()
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber(s.to_string()))
}
