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
use std::{fmt, str::FromStr};

use crate::color::Color;
use crate::error::CommandError;

use super::params::ChannelParameters;
use super::pattern::Pattern;

/// The closed set of animations a strand can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectName {
    Blink,
    ColorCycle,
    Comet,
    Chase,
    Pulse,
    Sparkle,
    Solid,
    Rainbow,
    SparklePulse,
    RainbowComet,
    RainbowChase,
    RainbowSparkle,
    CustomColorChase,
}

impl EffectName {
    pub const ALL: [EffectName; 13] = [
        EffectName::Blink,
        EffectName::ColorCycle,
        EffectName::Comet,
        EffectName::Chase,
        EffectName::Pulse,
        EffectName::Sparkle,
        EffectName::Solid,
        EffectName::Rainbow,
        EffectName::SparklePulse,
        EffectName::RainbowComet,
        EffectName::RainbowChase,
        EffectName::RainbowSparkle,
        EffectName::CustomColorChase,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            EffectName::Blink => "blink",
            EffectName::ColorCycle => "colorcycle",
            EffectName::Comet => "comet",
            EffectName::Chase => "chase",
            EffectName::Pulse => "pulse",
            EffectName::Sparkle => "sparkle",
            EffectName::Solid => "solid",
            EffectName::Rainbow => "rainbow",
            EffectName::SparklePulse => "sparkle_pulse",
            EffectName::RainbowComet => "rainbow_comet",
            EffectName::RainbowChase => "rainbow_chase",
            EffectName::RainbowSparkle => "rainbow_sparkle",
            EffectName::CustomColorChase => "custom_color_chase",
        }
    }

    /// Whether the animation draws with the strand's colors.
    pub const fn needs_color(self) -> bool {
        !matches!(
            self,
            EffectName::Rainbow
                | EffectName::RainbowComet
                | EffectName::RainbowChase
                | EffectName::RainbowSparkle
        )
    }

    /// Builds the pattern for this animation from a parameter snapshot.
    ///
    /// Every animation that draws with a color fails with
    /// `MissingEffectParameter` when the color list is empty rather than
    /// falling back to a default.
    pub fn instantiate(self, params: &ChannelParameters) -> Result<Pattern, CommandError> {
        let speed = params.speed;

        Ok(match self {
            EffectName::Blink => Pattern::Blink {
                speed,
                color: self.first_color(params)?,
            },
            EffectName::ColorCycle => Pattern::ColorCycle {
                speed,
                colors: self.all_colors(params)?,
            },
            EffectName::Comet => Pattern::Comet {
                speed,
                color: self.first_color(params)?,
                tail_length: params.tail_length,
                bounce: params.bounce,
            },
            EffectName::Chase => Pattern::Chase {
                speed,
                size: params.size,
                spacing: params.spacing,
                color: self.first_color(params)?,
            },
            EffectName::Pulse => Pattern::Pulse {
                speed,
                period: params.period,
                color: self.first_color(params)?,
            },
            EffectName::Sparkle => Pattern::Sparkle {
                speed,
                color: self.first_color(params)?,
                num_sparkles: params.num_sparkles,
            },
            EffectName::Solid => Pattern::Solid {
                color: self.first_color(params)?,
            },
            EffectName::Rainbow => Pattern::Rainbow {
                speed,
                period: params.period,
            },
            EffectName::SparklePulse => Pattern::SparklePulse {
                speed,
                period: params.period,
                color: self.first_color(params)?,
            },
            EffectName::RainbowComet => Pattern::RainbowComet {
                speed,
                tail_length: params.tail_length,
                bounce: params.bounce,
            },
            EffectName::RainbowChase => Pattern::RainbowChase {
                speed,
                size: params.size,
                spacing: params.spacing,
                step: params.step,
            },
            EffectName::RainbowSparkle => Pattern::RainbowSparkle {
                speed,
                num_sparkles: params.num_sparkles,
            },
            EffectName::CustomColorChase => Pattern::CustomColorChase {
                speed,
                size: params.size,
                spacing: params.spacing,
                colors: self.all_colors(params)?,
            },
        })
    }

    fn first_color(self, params: &ChannelParameters) -> Result<Color, CommandError> {
        params
            .color()
            .ok_or(CommandError::MissingEffectParameter {
                effect: self,
                parameter: "color",
            })
    }

    fn all_colors(self, params: &ChannelParameters) -> Result<Vec<Color>, CommandError> {
        if params.colors.is_empty() {
            return Err(CommandError::MissingEffectParameter {
                effect: self,
                parameter: "colors",
            });
        }
        Ok(params.colors.clone())
    }
}

impl FromStr for EffectName {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EffectName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| CommandError::UnknownEffectName(s.to_string()))
    }
}

impl fmt::Display for EffectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
