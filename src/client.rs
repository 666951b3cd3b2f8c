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
//! The controller side of the wire format: how commands are encoded, split into
//! fragments and how status replies are read back.

use serde_json::{json, Value};

/// The reply to a read when the last command applied cleanly.
pub const STATUS_SUCCESS: &str = "success";

/// Serializes a command as compact JSON.
pub fn encode(message: &Value) -> Vec<u8> {
    message.to_string().into_bytes()
}

/// Splits an encoded message into chunks of exactly `size` bytes. The last chunk
/// is padded with nulls.
pub fn fragment(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    let size = size.max(1);
    bytes
        .chunks(size)
        .map(|chunk| {
            let mut fragment = chunk.to_vec();
            fragment.resize(size, 0);
            fragment
        })
        .collect()
}

/// Builds a `reconfigure` command.
pub fn reconfigure_message(num_strands: usize, strand_length: usize, brightness: f64) -> Value {
    json!({
        "reconfigure": {
            "num_strands": num_strands,
            "strand_length": strand_length,
            "brightness": brightness,
        }
    })
}

/// Reads a status reply, dropping trailing padding.
pub fn decode_status(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|byte| *byte != 0)
        .map_or(0, |last| last + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
