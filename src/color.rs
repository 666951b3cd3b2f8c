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
use std::fmt;

use serde_json::Value;

use crate::error::CommandError;

/// An RGB pixel color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Color = Color::new(0, 0, 0);
pub const RED: Color = Color::new(255, 0, 0);

/// Named colors understood by `resolve`.
const NAMED_COLORS: [(&str, Color); 16] = [
    ("amber", Color::new(255, 100, 0)),
    ("aqua", Color::new(50, 255, 255)),
    ("black", BLACK),
    ("blue", Color::new(0, 0, 255)),
    ("green", Color::new(0, 255, 0)),
    ("orange", Color::new(255, 40, 0)),
    ("pink", Color::new(242, 90, 255)),
    ("purple", Color::new(180, 0, 255)),
    ("red", RED),
    ("white", Color::new(255, 255, 255)),
    ("yellow", Color::new(255, 150, 0)),
    ("gold", Color::new(255, 222, 30)),
    ("jade", Color::new(0, 255, 40)),
    ("magenta", Color::new(255, 0, 20)),
    ("old_lace", Color::new(253, 245, 230)),
    ("teal", Color::new(0, 255, 120)),
];

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Looks up a color by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, color)| *color)
    }

    /// Scales every component by `factor`, clamped to 0.0..=1.0.
    pub fn scale(&self, factor: f64) -> Self {
        let factor = factor.clamp(0.0, 1.0);
        let scale_u8 = |c: u8| -> u8 { (c as f64 * factor) as u8 };

        Self {
            r: scale_u8(self.r),
            g: scale_u8(self.g),
            b: scale_u8(self.b),
        }
    }

    /// Position on a 256 step color wheel: red -> green -> blue -> red.
    pub fn wheel(position: u8) -> Self {
        let position = position as u16;
        if position < 85 {
            Self::new((255 - position * 3) as u8, (position * 3) as u8, 0)
        } else if position < 170 {
            let position = position - 85;
            Self::new(0, (255 - position * 3) as u8, (position * 3) as u8)
        } else {
            let position = position - 170;
            Self::new((position * 3) as u8, 0, (255 - position * 3) as u8)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Resolves a command value into a color. Strings are treated as color names,
/// arrays of three numbers as raw components.
pub fn resolve(value: &Value) -> Result<Color, CommandError> {
    match value {
        Value::String(name) => {
            Color::from_name(name).ok_or_else(|| CommandError::UnknownColorName(name.clone()))
        }
        _ => resolve_triple(value),
    }
}

/// Resolves a `[r, g, b]` array. Components are truncated and clamped to 0..=255.
pub fn resolve_triple(value: &Value) -> Result<Color, CommandError> {
    let components = match value {
        Value::Array(components) if components.len() == 3 => components,
        _ => return Err(CommandError::InvalidColorFormat(value.to_string())),
    };

    let mut rgb = [0u8; 3];
    for (slot, component) in rgb.iter_mut().zip(components) {
        // `as` saturates at the u8 bounds and maps NaN to 0.
        *slot = component
            .as_f64()
            .ok_or_else(|| CommandError::InvalidColorFormat(value.to_string()))?
            as u8;
    }

    Ok(Color::new(rgb[0], rgb[1], rgb[2]))
}

/// Resolves an array of colors, each one a name or a triple.
pub fn resolve_list(value: &Value) -> Result<Vec<Color>, CommandError> {
    match value {
        Value::Array(values) => values.iter().map(resolve).collect(),
        _ => Err(CommandError::InvalidColorFormat(value.to_string())),
    }
}
