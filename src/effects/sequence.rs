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

use crate::color::{Color, BLACK};

use super::instance::Effect;

/// Plays a list of effects in order, each for a fixed number of render ticks,
/// and wraps around after the last one.
#[derive(Debug, Clone)]
pub struct Sequence {
    effects: Vec<Effect>,
    hold_ticks: u32,
    current: usize,
    ticks: u32,
    advance: bool,
}

impl Sequence {
    /// Creates a sequence. A `hold_ticks` of zero moves to the next effect on
    /// every render.
    pub fn new(effects: Vec<Effect>, hold_ticks: u32) -> Self {
        Self {
            effects,
            hold_ticks,
            current: 0,
            ticks: 0,
            advance: false,
        }
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn hold_ticks(&self) -> u32 {
        self.hold_ticks
    }

    /// The effect shown by the next render.
    pub fn current(&self) -> Option<&Effect> {
        let index = if self.advance {
            (self.current + 1) % self.effects.len().max(1)
        } else {
            self.current
        };
        self.effects.get(index)
    }

    /// Renders the current effect. The strand is cleared when switching effects
    /// so nothing of the previous one is left behind.
    pub fn render(&mut self, now: Instant, pixels: &mut [Color]) {
        if self.effects.is_empty() {
            return;
        }

        if self.advance {
            self.advance = false;
            self.current = (self.current + 1) % self.effects.len();
            self.effects[self.current].reset();
            pixels.fill(BLACK);
        }

        self.effects[self.current].render(now, pixels);

        self.ticks += 1;
        if self.ticks >= self.hold_ticks.max(1) {
            self.ticks = 0;
            self.advance = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::effects::Pattern;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    fn solid(color: Color) -> Effect {
        Effect::new(Pattern::Solid { color })
    }

    fn shown(sequence: &mut Sequence, renders: usize) -> Vec<Color> {
        let start = Instant::now();
        let mut pixels = [BLACK; 3];
        (0..renders)
            .map(|tick| {
                sequence.render(start + Duration::from_millis(tick as u64 * 10), &mut pixels);
                pixels[0]
            })
            .collect()
    }

    #[test]
    fn test_holds_each_effect() {
        let mut sequence = Sequence::new(vec![solid(RED), solid(BLUE)], 2);
        assert_eq!(shown(&mut sequence, 5), vec![RED, RED, BLUE, BLUE, RED]);
    }

    #[test]
    fn test_zero_hold_advances_every_render() {
        let mut sequence = Sequence::new(vec![solid(RED), solid(BLUE)], 0);
        assert_eq!(shown(&mut sequence, 3), vec![RED, BLUE, RED]);
    }

    #[test]
    fn test_clears_between_effects() {
        let comet = Effect::new(Pattern::Comet {
            speed: 1.0,
            color: BLUE,
            tail_length: 1,
            bounce: false,
        });
        let mut sequence = Sequence::new(vec![solid(RED), comet], 1);
        let start = Instant::now();
        let mut pixels = [BLACK; 3];

        sequence.render(start, &mut pixels);
        assert_eq!(pixels, [RED; 3]);

        sequence.render(start + Duration::from_millis(10), &mut pixels);
        assert_eq!(pixels, [BLUE, BLACK, BLACK]);
    }

    #[test]
    fn test_current_tracks_pending_advance() {
        let mut sequence = Sequence::new(vec![solid(RED), solid(BLUE)], 1);
        assert_eq!(sequence.current().map(Effect::name), Some(crate::effects::EffectName::Solid));

        let mut pixels = [BLACK; 1];
        sequence.render(Instant::now(), &mut pixels);
        assert_eq!(
            sequence.current().map(|effect| effect.pattern().clone()),
            Some(Pattern::Solid { color: BLUE })
        );
    }

    #[test]
    fn test_empty_sequence_draws_nothing() {
        let mut sequence = Sequence::new(vec![], 0);
        let mut pixels = [RED; 2];
        sequence.render(Instant::now(), &mut pixels);
        assert_eq!(pixels, [RED; 2]);
        assert!(sequence.current().is_none());
    }
}
