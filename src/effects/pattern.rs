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

use crate::color::{Color, BLACK};

use super::name::EffectName;
use super::render;

/// An animation with the parameters it was started with. Each variant only
/// carries the fields its renderer reads.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Blink {
        speed: f64,
        color: Color,
    },
    ColorCycle {
        speed: f64,
        colors: Vec<Color>,
    },
    Comet {
        speed: f64,
        color: Color,
        tail_length: usize,
        bounce: bool,
    },
    Chase {
        speed: f64,
        size: usize,
        spacing: usize,
        color: Color,
    },
    Pulse {
        speed: f64,
        period: u32,
        color: Color,
    },
    Sparkle {
        speed: f64,
        color: Color,
        num_sparkles: usize,
    },
    Solid {
        color: Color,
    },
    Rainbow {
        speed: f64,
        period: u32,
    },
    SparklePulse {
        speed: f64,
        period: u32,
        color: Color,
    },
    RainbowComet {
        speed: f64,
        tail_length: usize,
        bounce: bool,
    },
    RainbowChase {
        speed: f64,
        size: usize,
        spacing: usize,
        step: usize,
    },
    RainbowSparkle {
        speed: f64,
        num_sparkles: usize,
    },
    CustomColorChase {
        speed: f64,
        size: usize,
        spacing: usize,
        colors: Vec<Color>,
    },
}

impl Pattern {
    pub fn name(&self) -> EffectName {
        match self {
            Pattern::Blink { .. } => EffectName::Blink,
            Pattern::ColorCycle { .. } => EffectName::ColorCycle,
            Pattern::Comet { .. } => EffectName::Comet,
            Pattern::Chase { .. } => EffectName::Chase,
            Pattern::Pulse { .. } => EffectName::Pulse,
            Pattern::Sparkle { .. } => EffectName::Sparkle,
            Pattern::Solid { .. } => EffectName::Solid,
            Pattern::Rainbow { .. } => EffectName::Rainbow,
            Pattern::SparklePulse { .. } => EffectName::SparklePulse,
            Pattern::RainbowComet { .. } => EffectName::RainbowComet,
            Pattern::RainbowChase { .. } => EffectName::RainbowChase,
            Pattern::RainbowSparkle { .. } => EffectName::RainbowSparkle,
            Pattern::CustomColorChase { .. } => EffectName::CustomColorChase,
        }
    }

    /// Draws the pattern as it looks `elapsed` after it started. The output only
    /// depends on the arguments, so rendering the same instant twice gives the
    /// same pixels.
    pub fn render(&self, elapsed: Duration, pixels: &mut [Color]) {
        if pixels.is_empty() {
            return;
        }

        match self {
            Pattern::Blink { speed, color } => {
                render::blink(pixels, render::frame_index(elapsed, *speed), *color)
            }
            Pattern::ColorCycle { speed, colors } => {
                render::color_cycle(pixels, render::frame_index(elapsed, *speed), colors)
            }
            Pattern::Comet {
                speed,
                color,
                tail_length,
                bounce,
            } => render::comet(
                pixels,
                render::frame_index(elapsed, *speed),
                *tail_length,
                *bounce,
                |_| *color,
            ),
            Pattern::Chase {
                speed,
                size,
                spacing,
                color,
            } => render::chase(
                pixels,
                render::frame_index(elapsed, *speed),
                *size,
                *spacing,
                |_| *color,
            ),
            Pattern::Pulse {
                speed,
                period,
                color,
            } => {
                let level = render::pulse_level(elapsed, *speed, *period);
                pixels.fill(color.scale(level));
            }
            Pattern::Sparkle {
                speed,
                color,
                num_sparkles,
            } => {
                pixels.fill(color.scale(render::SPARKLE_BACKGROUND));
                render::sparkle(
                    pixels,
                    render::frame_index(elapsed, *speed),
                    *num_sparkles,
                    |_| *color,
                )
            }
            Pattern::Solid { color } => pixels.fill(*color),
            Pattern::Rainbow { speed, period } => {
                render::rainbow(pixels, render::rainbow_offset(elapsed, *speed, *period))
            }
            Pattern::SparklePulse {
                speed,
                period,
                color,
            } => render::sparkle_pulse(
                pixels,
                render::frame_index(elapsed, *speed),
                render::pulse_level(elapsed, *speed, *period),
                *color,
            ),
            Pattern::RainbowComet {
                speed,
                tail_length,
                bounce,
            } => {
                let tail = (*tail_length).max(1) as u128;
                render::comet(
                    pixels,
                    render::frame_index(elapsed, *speed),
                    *tail_length,
                    *bounce,
                    |k| Color::wheel((k as u128 * 256 / tail) as u8),
                )
            }
            Pattern::RainbowChase {
                speed,
                size,
                spacing,
                step,
            } => {
                let frame = render::frame_index(elapsed, *speed);
                let groups = render::group_count(pixels.len(), *size, *spacing) as i64;
                // Hues wrap every 256, so only the low byte of each factor matters.
                let turn = (frame % 256) as i64 * (*step % 256) as i64;
                render::chase(pixels, frame, *size, *spacing, |group| {
                    let hue = turn + group * 256 / groups;
                    Color::wheel(hue.rem_euclid(256) as u8)
                })
            }
            Pattern::RainbowSparkle {
                speed,
                num_sparkles,
            } => {
                let frame = render::frame_index(elapsed, *speed);
                let len = pixels.len();
                let hue_at = |index: usize| {
                    Color::wheel(((index * 256 / len) as u64).wrapping_add(frame) as u8)
                };
                for (index, pixel) in pixels.iter_mut().enumerate() {
                    *pixel = hue_at(index).scale(render::SPARKLE_BACKGROUND);
                }
                render::sparkle(pixels, frame, *num_sparkles, hue_at)
            }
            Pattern::CustomColorChase {
                speed,
                size,
                spacing,
                colors,
            } => render::chase(
                pixels,
                render::frame_index(elapsed, *speed),
                *size,
                *spacing,
                |group| {
                    let count = colors.len().max(1) as i64;
                    colors
                        .get(group.rem_euclid(count) as usize)
                        .copied()
                        .unwrap_or(BLACK)
                },
            ),
        }
    }
}
