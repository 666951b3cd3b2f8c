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

use crate::color::{Color, RED};

pub const DEFAULT_SPEED: f64 = 0.1;
pub const DEFAULT_TAIL_LENGTH: usize = 10;
pub const DEFAULT_SIZE: usize = 1;
pub const DEFAULT_SPACING: usize = 1;
pub const DEFAULT_PERIOD: u32 = 1;
pub const DEFAULT_NUM_SPARKLES: usize = 1;
pub const DEFAULT_STEP: usize = 1;

/// Animation parameters for a single strand. Values persist between commands,
/// so a command only needs to carry the fields it wants to change.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelParameters {
    /// Seconds between animation frames.
    pub speed: f64,
    pub colors: Vec<Color>,
    pub tail_length: usize,
    pub bounce: bool,
    pub size: usize,
    pub spacing: usize,
    /// Seconds per pulse or rainbow cycle.
    pub period: u32,
    pub num_sparkles: usize,
    pub step: usize,
}

impl Default for ChannelParameters {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            colors: vec![RED],
            tail_length: DEFAULT_TAIL_LENGTH,
            bounce: false,
            size: DEFAULT_SIZE,
            spacing: DEFAULT_SPACING,
            period: DEFAULT_PERIOD,
            num_sparkles: DEFAULT_NUM_SPARKLES,
            step: DEFAULT_STEP,
        }
    }
}

impl ChannelParameters {
    /// The primary color, if any color is set.
    pub fn color(&self) -> Option<Color> {
        self.colors.first().copied()
    }
}
