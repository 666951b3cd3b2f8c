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

use std::time::{Duration, Instant};

use crate::color::Color;

use super::name::EffectName;
use super::pattern::Pattern;

/// A running pattern. The clock starts on the first render, not on creation, so
/// an effect created by a command starts from its first frame no matter how
/// long the command took to arrive.
#[derive(Debug, Clone)]
pub struct Effect {
    pattern: Pattern,
    start_time: Option<Instant>,
}

impl Effect {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            start_time: None,
        }
    }

    pub fn name(&self) -> EffectName {
        self.pattern.name()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Time since the first render, zero if it has not rendered yet.
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.start_time
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or(Duration::ZERO)
    }

    /// Restarts the effect from its first frame on the next render.
    pub fn reset(&mut self) {
        self.start_time = None;
    }

    /// Draws the effect into the strand as of `now`.
    pub fn render(&mut self, now: Instant, pixels: &mut [Color]) {
        let start = *self.start_time.get_or_insert(now);
        self.pattern
            .render(now.saturating_duration_since(start), pixels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BLACK;

    #[test]
    fn test_clock_starts_on_first_render() {
        let red = Color::new(255, 0, 0);
        let mut effect = Effect::new(Pattern::Blink { speed: 1.0, color: red });
        let created = Instant::now();
        let first_render = created + Duration::from_secs(5);

        // Blink is off on odd frames. Had the clock started at creation, five
        // seconds in would be frame five.
        let mut pixels = [BLACK; 2];
        effect.render(first_render, &mut pixels);
        assert_eq!(pixels, [red; 2]);

        effect.render(first_render + Duration::from_millis(1500), &mut pixels);
        assert_eq!(pixels, [BLACK; 2]);
        assert_eq!(
            effect.elapsed(first_render + Duration::from_millis(1500)),
            Duration::from_millis(1500)
        );
    }

    #[test]
    fn test_reset_restarts_clock() {
        let red = Color::new(255, 0, 0);
        let mut effect = Effect::new(Pattern::Blink { speed: 1.0, color: red });
        let start = Instant::now();
        let mut pixels = [BLACK; 1];

        effect.render(start, &mut pixels);
        effect.reset();
        assert_eq!(effect.elapsed(start + Duration::from_secs(3)), Duration::ZERO);

        effect.render(start + Duration::from_secs(3), &mut pixels);
        assert_eq!(pixels, [red]);
    }
}
