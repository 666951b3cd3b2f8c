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
use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::color::{self, Color, BLACK};
use crate::effects::{ChannelParameters, Effect, EffectName, Sequence};
use crate::error::CommandError;

use super::{Behavior, ChannelState};

const SET_ANIMATION: &str = "set_animation";
const SET_PIXEL_COLORS: &str = "set_pixel_colors";
const SEQUENCE: &str = "sequence";
const ANIMATION_NAME: &str = "animation_name";

impl ChannelState {
    /// Applies one command object to the strand. Entries are handled in the order
    /// they appear; when one fails, the entries before it stay applied.
    ///
    /// Unless the command set pixels by hand or started a sequence, the staged
    /// animation (or the last one, if none was named) is rebuilt from the updated
    /// parameters and restarted.
    pub fn apply(
        &mut self,
        command: &Map<String, Value>,
        pixels: &mut [Color],
    ) -> Result<(), CommandError> {
        let mut staged = None;
        let mut auto_apply = true;

        for (key, value) in command {
            match key.as_str() {
                SET_ANIMATION => {
                    staged = Some(parse_effect_name(value)?);
                    pixels.fill(BLACK);
                    self.dirty = true;
                }
                SET_PIXEL_COLORS => {
                    self.set_pixel_colors(value, pixels)?;
                    auto_apply = false;
                }
                SEQUENCE => {
                    self.start_sequence(value, pixels)?;
                    auto_apply = false;
                }
                _ => apply_parameter(&mut self.params, key, value)?,
            }
        }

        if !auto_apply {
            return Ok(());
        }

        // Manual and sequence strands keep the parameters but have nothing to rebuild.
        let Some(name) = staged.or(self.last_effect) else {
            return Err(CommandError::NoAnimationToUpdate(self.index));
        };

        let pattern = name.instantiate(&self.params)?;
        debug!(strand = self.index, animation = %name, "Starting animation");
        self.behavior = Behavior::Effect(Effect::new(pattern));
        self.last_effect = Some(name);
        Ok(())
    }

    fn set_pixel_colors(&mut self, value: &Value, pixels: &mut [Color]) -> Result<(), CommandError> {
        let Value::Object(entries) = value else {
            return Err(CommandError::invalid(
                SET_PIXEL_COLORS,
                "expected a map of pixel index to color",
            ));
        };

        // Everything is validated before the strand is touched.
        let mut updates = Vec::with_capacity(entries.len());
        for (index, color) in entries {
            let index = index.trim().parse::<usize>().map_err(|_| {
                CommandError::invalid(SET_PIXEL_COLORS, format!("invalid pixel index {}", index))
            })?;
            if index >= self.length {
                return Err(CommandError::PixelIndexOutOfRange {
                    index,
                    length: self.length,
                });
            }
            updates.push((index, color::resolve_triple(color)?));
        }

        if !matches!(self.behavior, Behavior::Manual(_)) {
            pixels.fill(BLACK);
            self.behavior = Behavior::Manual(BTreeMap::new());
        }

        if let Behavior::Manual(manual) = &mut self.behavior {
            for (index, color) in updates {
                manual.insert(index, color);
                pixels[index] = color;
            }
        }

        self.last_effect = None;
        self.dirty = true;
        Ok(())
    }

    fn start_sequence(&mut self, value: &Value, pixels: &mut [Color]) -> Result<(), CommandError> {
        let Value::Object(sequence) = value else {
            return Err(CommandError::invalid(SEQUENCE, "expected an object"));
        };

        let steps = match sequence.get("animations") {
            Some(Value::Array(steps)) if !steps.is_empty() => steps,
            _ => {
                return Err(CommandError::invalid(
                    SEQUENCE,
                    "expected a non-empty list of animations",
                ))
            }
        };

        let hold_ticks = match sequence.get("duration") {
            Some(duration) => to_u32("duration", integer("duration", duration)?)?,
            None => 0,
        };

        let effects = steps
            .iter()
            .map(|step| self.sequence_step(step))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            strand = self.index,
            steps = effects.len(),
            hold_ticks,
            "Starting sequence"
        );
        pixels.fill(BLACK);
        self.behavior = Behavior::Sequence(Sequence::new(effects, hold_ticks));
        self.last_effect = None;
        self.dirty = true;
        Ok(())
    }

    /// Builds one step of a sequence. Steps start from the strand's parameters and
    /// inherit its colors unless they name their own.
    fn sequence_step(&self, step: &Value) -> Result<Effect, CommandError> {
        let Value::Object(step) = step else {
            return Err(CommandError::invalid(SEQUENCE, "animations must be objects"));
        };

        let mut params = self.params.clone();
        let mut name = None;
        for (key, value) in step {
            match key.as_str() {
                ANIMATION_NAME => name = Some(parse_effect_name(value)?),
                "colors" => match value {
                    Value::Array(colors) if colors.is_empty() => {}
                    _ => params.colors = color::resolve_list(value)?,
                },
                _ => apply_parameter(&mut params, key, value)?,
            }
        }

        let name = name.ok_or_else(|| {
            CommandError::invalid(SEQUENCE, format!("animation is missing {}", ANIMATION_NAME))
        })?;
        Ok(Effect::new(name.instantiate(&params)?))
    }
}

fn parse_effect_name(value: &Value) -> Result<EffectName, CommandError> {
    match value {
        Value::String(name) => name.parse(),
        other => Err(CommandError::UnknownEffectName(other.to_string())),
    }
}

/// Stores a single animation parameter.
fn apply_parameter(
    params: &mut ChannelParameters,
    key: &str,
    value: &Value,
) -> Result<(), CommandError> {
    match key {
        "speed" => params.speed = speed(key, value)?,
        "color" => params.colors = vec![color::resolve(value)?],
        "colors" => params.colors = color::resolve_list(value)?,
        "tail_length" => params.tail_length = integer(key, value)?,
        "bounce" => params.bounce = flag(key, value)?,
        "size" => params.size = at_least_one(key, integer(key, value)?)?,
        "spacing" => params.spacing = integer(key, value)?,
        "period" => params.period = to_u32(key, integer(key, value)?)?,
        "num_sparkles" => params.num_sparkles = integer(key, value)?,
        "step" => params.step = at_least_one(key, integer(key, value)?)?,
        _ => return Err(CommandError::UnrecognizedCommandKey(key.to_string())),
    }
    Ok(())
}

fn speed(key: &str, value: &Value) -> Result<f64, CommandError> {
    let speed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| CommandError::invalid(key, format!("expected a number, got {}", value)))?;

    if !speed.is_finite() || speed <= 0.0 {
        return Err(CommandError::invalid(key, "must be greater than zero"));
    }
    Ok(speed)
}

/// Non-negative integers. Numbers are truncated, strings must hold an integer.
fn integer(key: &str, value: &Value) -> Result<usize, CommandError> {
    let parsed = match value {
        Value::Number(number) => match number.as_u64() {
            Some(whole) => usize::try_from(whole).ok(),
            None => number
                .as_f64()
                .filter(|float| float.is_finite() && *float >= 0.0)
                .map(|float| float as usize),
        },
        Value::String(text) => text.trim().parse::<usize>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| {
        CommandError::invalid(key, format!("expected a non-negative integer, got {}", value))
    })
}

fn at_least_one(key: &str, value: usize) -> Result<usize, CommandError> {
    if value == 0 {
        return Err(CommandError::invalid(key, "must be at least 1"));
    }
    Ok(value)
}

fn to_u32(key: &str, value: usize) -> Result<u32, CommandError> {
    u32::try_from(value).map_err(|_| CommandError::invalid(key, format!("{} is too large", value)))
}

/// Booleans, or numbers where anything but zero is true.
fn flag(key: &str, value: &Value) -> Result<bool, CommandError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => number
            .as_f64()
            .map(|number| number != 0.0)
            .ok_or_else(|| CommandError::invalid(key, "expected a boolean")),
        Value::String(text) => text
            .trim()
            .parse::<i64>()
            .map(|number| number != 0)
            .map_err(|_| CommandError::invalid(key, format!("expected a boolean, got {}", text))),
        other => Err(CommandError::invalid(
            key,
            format!("expected a boolean, got {}", other),
        )),
    }
}
