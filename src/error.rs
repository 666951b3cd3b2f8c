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

use crate::effects::EffectName;

/// Errors raised while decoding or applying a command written by the controller.
///
/// None of these are fatal. The transaction loop logs them and hands the display
/// text back to the controller on its next read.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid json received: {reason}: {raw}")]
    MalformedCommand { reason: String, raw: String },

    #[error("invalid color name {0}")]
    UnknownColorName(String),

    #[error("invalid color format: {0}")]
    InvalidColorFormat(String),

    #[error("invalid arg: {0}")]
    UnrecognizedCommandKey(String),

    #[error("invalid animation name: {0}")]
    UnknownEffectName(String),

    #[error("invalid animation name: strand {0} has no animation to update")]
    NoAnimationToUpdate(usize),

    #[error("animation {effect} requires {parameter}")]
    MissingEffectParameter {
        effect: EffectName,
        parameter: &'static str,
    },

    #[error("invalid value for {key}: {reason}")]
    InvalidParameter { key: String, reason: String },

    #[error("pixel {index} out of bound for strand length {length}")]
    PixelIndexOutOfRange { index: usize, length: usize },

    #[error("index {index} out of bound for configured number of strands ({num_channels})")]
    ChannelIndexOutOfRange { index: usize, num_channels: usize },

    #[error("invalid strand index {0}")]
    InvalidChannelKey(String),

    #[error("display has not been configured")]
    DisplayNotConfigured,

    #[error("invalid display configuration: {0}")]
    InvalidDisplayConfig(String),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

impl CommandError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        CommandError::InvalidParameter {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors reported by an LED driver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error("pixel driver is already acquired, release it first")]
    AlreadyAcquired,

    #[error("pixel driver has not been acquired")]
    NotAcquired,

    #[error("pixel driver cannot hold {requested} pixels (capacity {capacity})")]
    Exhausted { requested: usize, capacity: usize },

    #[error("frame of {actual} pixels does not match driver layout of {expected}")]
    FrameSize { expected: usize, actual: usize },
}

/// Errors reported by the bus transaction primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    #[error("bus i/o error: {0}")]
    Io(String),

    #[error("transaction already released")]
    Released,
}
