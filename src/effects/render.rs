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

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::color::{Color, BLACK};

/// Brightness of the unlit pixels behind a sparkle.
pub(super) const SPARKLE_BACKGROUND: f64 = 0.1;

/// Number of whole frames since the effect started, one frame every `speed` seconds.
#[inline]
pub(super) fn frame_index(elapsed: Duration, speed: f64) -> u64 {
    if speed <= 0.0 {
        return 0;
    }
    (elapsed.as_secs_f64() / speed).floor() as u64
}

/// Start of the current frame in seconds. Time-based effects are quantized to
/// frames so they only change as often as the frame-based ones.
#[inline]
fn frame_seconds(elapsed: Duration, speed: f64) -> f64 {
    frame_index(elapsed, speed) as f64 * speed.max(0.0)
}

/// Pulse brightness (0.0 to 1.0). Dark at the start of each period, full at the middle.
pub(super) fn pulse_level(elapsed: Duration, speed: f64, period: u32) -> f64 {
    if period == 0 {
        return 1.0;
    }
    let period = period as f64;
    let progress = (frame_seconds(elapsed, speed) % period) / period;
    0.5 - 0.5 * (progress * 2.0 * std::f64::consts::PI).cos()
}

/// Color wheel offset for rainbows, one full turn per period.
pub(super) fn rainbow_offset(elapsed: Duration, speed: f64, period: u32) -> u8 {
    if period == 0 {
        return 0;
    }
    let period = period as f64;
    let progress = (frame_seconds(elapsed, speed) % period) / period;
    (progress * 256.0) as u8
}

/// Number of chase groups that can appear on a strand of `len` pixels.
pub(super) fn group_count(len: usize, size: usize, spacing: usize) -> usize {
    len.div_ceil(size.max(1).saturating_add(spacing)).max(1)
}

pub(super) fn blink(pixels: &mut [Color], frame: u64, color: Color) {
    pixels.fill(if frame % 2 == 0 { color } else { BLACK });
}

pub(super) fn color_cycle(pixels: &mut [Color], frame: u64, colors: &[Color]) {
    if colors.is_empty() {
        pixels.fill(BLACK);
        return;
    }
    pixels.fill(colors[(frame % colors.len() as u64) as usize]);
}

/// Draws a comet whose head advances one pixel per frame and whose tail fades
/// out behind it. The comet runs until its tail has left the strand, then starts
/// over. With `bounce` it runs back the other way instead of starting over.
///
/// `color_at` receives the distance from the head (0 is the head).
pub(super) fn comet<F>(pixels: &mut [Color], frame: u64, tail_length: usize, bounce: bool, color_at: F)
where
    F: Fn(usize) -> Color,
{
    pixels.fill(BLACK);
    let len = pixels.len();
    if len == 0 {
        return;
    }

    let tail = tail_length.max(1) as u64;
    let travel = (len as u64).saturating_add(tail);

    let (head, reverse) = if bounce {
        let position = frame % travel.saturating_mul(2);
        if position < travel {
            (position, false)
        } else {
            (position - travel, true)
        }
    } else {
        (frame % travel, false)
    };

    // Only the part of the tail that is on the strand gets drawn.
    let nearest = head.saturating_sub(len as u64 - 1);
    let farthest = head.min(tail - 1);
    for distance in nearest..=farthest {
        let index = (head - distance) as usize;
        let fade = (tail - distance) as f64 / tail as f64;
        pixels[index] = color_at(distance as usize).scale(fade);
    }

    if reverse {
        pixels.reverse();
    }
}

/// Lights runs of `size` pixels separated by `spacing` dark pixels, shifting one
/// pixel per frame. `color_for` receives the group number of each lit run.
pub(super) fn chase<F>(pixels: &mut [Color], frame: u64, size: usize, spacing: usize, color_for: F)
where
    F: Fn(i64) -> Color,
{
    let size = size.max(1) as i128;
    let period = size + spacing as i128;
    let offset = frame as i128 % period;

    for (index, pixel) in pixels.iter_mut().enumerate() {
        let shifted = index as i128 - offset;
        *pixel = if shifted.rem_euclid(period) < size {
            // Bounded by the strand length.
            color_for(shifted.div_euclid(period) as i64)
        } else {
            BLACK
        };
    }
}

/// Lights up to `num_sparkles` pixels chosen from the frame number, so every frame
/// has a stable set of sparkles.
pub(super) fn sparkle<F>(pixels: &mut [Color], frame: u64, num_sparkles: usize, color_at: F)
where
    F: Fn(usize) -> Color,
{
    let len = pixels.len();
    let mut rng = StdRng::seed_from_u64(frame);
    for _ in 0..num_sparkles.min(len) {
        let index = rng.gen_range(0..len);
        pixels[index] = color_at(index);
    }
}

pub(super) fn sparkle_pulse(pixels: &mut [Color], frame: u64, level: f64, color: Color) {
    let mut rng = StdRng::seed_from_u64(frame);
    for pixel in pixels.iter_mut() {
        *pixel = color.scale(level * rng.gen_range(0.25..=1.0));
    }
}

pub(super) fn rainbow(pixels: &mut [Color], offset: u8) {
    let len = pixels.len();
    for (index, pixel) in pixels.iter_mut().enumerate() {
        *pixel = Color::wheel(offset.wrapping_add((index * 256 / len) as u8));
    }
}
