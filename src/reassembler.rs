// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::bus::Transaction;
use crate::display::DisplayConfigUpdate;
use crate::error::{BusError, CommandError};

pub const DEFAULT_FRAGMENT_SIZE: usize = 128;
pub const DEFAULT_MAX_FETCHES: usize = 100;
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(2);

const RECONFIGURE: &str = "reconfigure";

/// A decoded controller write.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedCommand {
    /// Rebuild the display with a new layout.
    Reconfigure(DisplayConfigUpdate),
    /// Per-strand commands keyed by strand index, in the order they were written.
    Channels(Vec<(String, Value)>),
}

/// Collects the fragments of a controller write and decodes them.
#[derive(Debug, Clone)]
pub struct Reassembler {
    fragment_size: usize,
    max_fetches: usize,
    fetch_delay: Duration,
}

impl Default for Reassembler {
    fn default() -> Self {
        Reassembler::new(
            DEFAULT_FRAGMENT_SIZE,
            DEFAULT_MAX_FETCHES,
            DEFAULT_FETCH_DELAY,
        )
    }
}

impl Reassembler {
    pub fn new(fragment_size: usize, max_fetches: usize, fetch_delay: Duration) -> Reassembler {
        Reassembler {
            fragment_size,
            max_fetches,
            fetch_delay,
        }
    }

    pub fn fragment_size(&self) -> usize {
        self.fragment_size
    }

    pub fn max_fetches(&self) -> usize {
        self.max_fetches
    }

    pub fn fetch_delay(&self) -> Duration {
        self.fetch_delay
    }

    /// The most bytes a single message can carry. Anything past this is dropped.
    pub fn max_message_len(&self) -> usize {
        self.fragment_size * self.max_fetches
    }

    /// Reads the fragments of a controller write.
    ///
    /// Always makes exactly `max_fetches` reads with `fetch_delay` before each, so
    /// the time spent here is bounded no matter what the controller sends.
    pub fn collect(&self, transaction: &mut dyn Transaction) -> Result<Vec<u8>, BusError> {
        let mut message = Vec::with_capacity(self.fragment_size);
        for _ in 0..self.max_fetches {
            spin_sleep::sleep(self.fetch_delay);
            message.extend(transaction.read(self.fragment_size)?);
        }
        message.truncate(self.max_message_len());

        debug!(bytes = message.len(), "Collected message");
        Ok(message)
    }

    /// Decodes a reassembled message. Padding nulls are removed wherever they are.
    pub fn decode(&self, message: &[u8]) -> Result<DecodedCommand, CommandError> {
        let cleaned: Vec<u8> = message.iter().copied().filter(|byte| *byte != 0).collect();

        let text = String::from_utf8(cleaned).map_err(|e| CommandError::MalformedCommand {
            reason: e.to_string(),
            raw: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })?;

        if text.trim().is_empty() {
            return Ok(DecodedCommand::Channels(Vec::new()));
        }

        let malformed = |reason: String| CommandError::MalformedCommand {
            reason,
            raw: text.clone(),
        };

        let object = match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(object)) => object,
            Ok(other) => {
                return Err(malformed(format!(
                    "expected an object, got {}",
                    json_type(&other)
                )))
            }
            Err(e) => return Err(malformed(e.to_string())),
        };

        if let Some(update) = object.get(RECONFIGURE) {
            let update = DisplayConfigUpdate::deserialize(update)
                .map_err(|e| CommandError::InvalidDisplayConfig(e.to_string()))?;
            return Ok(DecodedCommand::Reconfigure(update));
        }

        Ok(DecodedCommand::Channels(object.into_iter().collect()))
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
