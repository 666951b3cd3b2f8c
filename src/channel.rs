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
use std::ops::Range;
use std::time::Instant;

use crate::color::Color;
use crate::effects::{ChannelParameters, Effect, EffectName, Pattern, Sequence};

mod dispatch;

/// The effect every strand starts with after a reconfigure.
pub const DEFAULT_EFFECT: EffectName = EffectName::RainbowComet;

/// What a strand is currently doing.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// A single animation.
    Effect(Effect),
    /// Pixels set one by one. Nothing is rendered until the next animation.
    Manual(BTreeMap<usize, Color>),
    /// Several animations played one after another.
    Sequence(Sequence),
}

/// A single strand: its slice of the frame, its parameters and its behavior.
#[derive(Debug, Clone)]
pub struct ChannelState {
    index: usize,
    length: usize,
    params: ChannelParameters,
    behavior: Behavior,
    last_effect: Option<EffectName>,
    dirty: bool,
}

impl ChannelState {
    /// Creates a strand with default parameters running the default effect.
    pub fn new(index: usize, length: usize) -> ChannelState {
        let params = ChannelParameters::default();
        let pattern = Pattern::RainbowComet {
            speed: params.speed,
            tail_length: params.tail_length,
            bounce: params.bounce,
        };

        ChannelState {
            index,
            length,
            params,
            behavior: Behavior::Effect(Effect::new(pattern)),
            last_effect: Some(DEFAULT_EFFECT),
            dirty: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The strand's pixels within the whole frame.
    pub fn range(&self) -> Range<usize> {
        self.index * self.length..(self.index + 1) * self.length
    }

    pub fn params(&self) -> &ChannelParameters {
        &self.params
    }

    pub fn behavior(&self) -> &Behavior {
        &self.behavior
    }

    /// The animation re-created when a command only changes parameters.
    pub fn last_effect(&self) -> Option<EffectName> {
        self.last_effect
    }

    /// Whether the strand is drawn on every render.
    pub fn is_animating(&self) -> bool {
        !matches!(self.behavior, Behavior::Manual(_))
    }

    /// Returns whether a command touched the strand's pixels since the last call.
    pub(crate) fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Draws the current animation into `pixels`. Returns false for manual strands,
    /// which are left untouched.
    pub fn render(&mut self, now: Instant, pixels: &mut [Color]) -> bool {
        match &mut self.behavior {
            Behavior::Effect(effect) => {
                effect.render(now, pixels);
                true
            }
            Behavior::Sequence(sequence) => {
                sequence.render(now, pixels);
                true
            }
            Behavior::Manual(_) => false,
        }
    }
}
