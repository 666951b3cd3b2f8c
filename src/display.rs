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
use std::time::Instant;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::channel::ChannelState;
use crate::color::{Color, BLACK};
use crate::driver::Driver;
use crate::error::{CommandError, DriverError};

/// The layout of the strands attached to the driver.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub num_channels: usize,
    pub channel_length: usize,
    pub brightness: f64,
}

impl DisplayConfig {
    /// Total number of pixels across all strands.
    pub fn pixel_count(&self) -> usize {
        self.num_channels * self.channel_length
    }

    fn validate(&self) -> Result<(), CommandError> {
        if self.num_channels == 0 {
            return Err(CommandError::InvalidDisplayConfig(
                "number of strands must be greater than zero".to_string(),
            ));
        }
        if self.channel_length == 0 {
            return Err(CommandError::InvalidDisplayConfig(
                "strand length must be greater than zero".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(CommandError::InvalidDisplayConfig(format!(
                "brightness {} must be between 0 and 1",
                self.brightness
            )));
        }
        Ok(())
    }
}

/// Nothing attached and the strands dark until a reconfigure names a brightness.
impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            num_channels: 0,
            channel_length: 0,
            brightness: 0.0,
        }
    }
}

/// The body of a `reconfigure` command. Absent or zero fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DisplayConfigUpdate {
    #[serde(rename = "num_strands")]
    pub num_channels: Option<usize>,
    #[serde(rename = "strand_length")]
    pub channel_length: Option<usize>,
    pub brightness: Option<f64>,
}

impl DisplayConfigUpdate {
    pub fn new(num_channels: usize, channel_length: usize, brightness: f64) -> Self {
        Self {
            num_channels: Some(num_channels),
            channel_length: Some(channel_length),
            brightness: Some(brightness),
        }
    }

    /// Applies the update on top of an existing configuration.
    pub fn merge(&self, current: &DisplayConfig) -> DisplayConfig {
        DisplayConfig {
            num_channels: self
                .num_channels
                .filter(|value| *value != 0)
                .unwrap_or(current.num_channels),
            channel_length: self
                .channel_length
                .filter(|value| *value != 0)
                .unwrap_or(current.channel_length),
            brightness: self
                .brightness
                .filter(|value| *value != 0.0)
                .unwrap_or(current.brightness),
        }
    }
}

/// Owns the strands, the frame that holds all of their pixels and the driver
/// the frame is pushed to.
pub struct DisplayManager {
    driver: Box<dyn Driver>,
    config: DisplayConfig,
    configured: bool,
    channels: Vec<ChannelState>,
    pixels: Vec<Color>,
    animating: bool,
}

impl DisplayManager {
    /// Creates an unconfigured display. Commands are refused until the first
    /// reconfigure.
    pub fn new(driver: Box<dyn Driver>) -> DisplayManager {
        DisplayManager {
            driver,
            config: DisplayConfig::default(),
            configured: false,
            channels: Vec::new(),
            pixels: Vec::new(),
            animating: false,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }

    pub fn channels(&self) -> &[ChannelState] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelState> {
        self.channels.get(index)
    }

    /// The whole frame, before brightness is applied.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// The pixels of a single strand.
    pub fn channel_pixels(&self, index: usize) -> Option<&[Color]> {
        self.channels
            .get(index)
            .map(|channel| &self.pixels[channel.range()])
    }

    /// Whether any strand is drawn on render.
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Rebuilds the display with a new layout. Every strand starts over with
    /// default parameters and the default animation.
    ///
    /// The driver is released before it is acquired again. If acquiring fails the
    /// display is left without strands until the next successful reconfigure.
    pub fn reconfigure(&mut self, update: &DisplayConfigUpdate) -> Result<(), CommandError> {
        let config = update.merge(&self.config);
        config.validate()?;

        self.driver.release();
        self.channels.clear();
        self.pixels.clear();
        self.animating = false;
        self.configured = false;

        self.driver.acquire(&config)?;

        self.pixels = vec![BLACK; config.pixel_count()];
        self.channels = (0..config.num_channels)
            .map(|index| ChannelState::new(index, config.channel_length))
            .collect();
        self.animating = true;
        self.configured = true;

        info!(
            strands = config.num_channels,
            length = config.channel_length,
            brightness = config.brightness,
            "Display reconfigured"
        );
        self.config = config;
        Ok(())
    }

    /// Applies a command object to one strand.
    ///
    /// If the command touched the strand's pixels, the frame is pushed right away,
    /// even when a later entry of the command failed.
    pub fn dispatch(&mut self, index: usize, command: &Value) -> Result<(), CommandError> {
        if !self.configured {
            return Err(CommandError::DisplayNotConfigured);
        }

        let num_channels = self.channels.len();
        let channel = self
            .channels
            .get_mut(index)
            .ok_or(CommandError::ChannelIndexOutOfRange {
                index,
                num_channels,
            })?;

        let Value::Object(command) = command else {
            return Err(CommandError::invalid(
                &index.to_string(),
                format!("expected a command object, got {}", command),
            ));
        };

        let range = channel.range();
        let result = channel.apply(command, &mut self.pixels[range]);
        let dirty = channel.take_dirty();

        self.animating = self.channels.iter().any(ChannelState::is_animating);
        if dirty {
            self.driver.show(&self.pixels)?;
        }

        debug!(strand = index, ok = result.is_ok(), "Dispatched command");
        result
    }

    /// Draws every animated strand and pushes the frame if anything was drawn.
    /// Returns whether a frame was pushed.
    pub fn render(&mut self, now: Instant) -> Result<bool, DriverError> {
        if !self.animating {
            return Ok(false);
        }

        let mut rendered = false;
        for channel in self.channels.iter_mut() {
            let range = channel.range();
            rendered |= channel.render(now, &mut self.pixels[range]);
        }

        if rendered {
            self.driver.show(&self.pixels)?;
        }
        Ok(rendered)
    }
}
