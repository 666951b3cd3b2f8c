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
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::color::Color;
use crate::display::DisplayConfig;
use crate::error::DriverError;

use super::Driver;

#[derive(Debug, Default)]
struct State {
    layout: Option<DisplayConfig>,
    last_frame: Option<Vec<Color>>,
    frames_shown: usize,
    acquire_count: usize,
    release_count: usize,
}

/// A driver that keeps its pixels in memory. Clones share state, so a test can
/// hold on to one handle while the display owns another.
#[derive(Debug, Clone)]
pub struct MemoryDriver {
    capacity: usize,
    state: Arc<Mutex<State>>,
}

impl MemoryDriver {
    /// Creates a driver able to hold up to `capacity` pixels.
    pub fn new(capacity: usize) -> MemoryDriver {
        MemoryDriver {
            capacity,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The layout the driver is currently acquired with.
    pub fn layout(&self) -> Option<DisplayConfig> {
        self.state.lock().layout.clone()
    }

    pub fn is_acquired(&self) -> bool {
        self.state.lock().layout.is_some()
    }

    /// The last frame shown, after brightness scaling.
    pub fn last_frame(&self) -> Option<Vec<Color>> {
        self.state.lock().last_frame.clone()
    }

    pub fn frames_shown(&self) -> usize {
        self.state.lock().frames_shown
    }

    pub fn acquire_count(&self) -> usize {
        self.state.lock().acquire_count
    }

    pub fn release_count(&self) -> usize {
        self.state.lock().release_count
    }
}

impl Driver for MemoryDriver {
    fn acquire(&mut self, config: &DisplayConfig) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        if state.layout.is_some() {
            return Err(DriverError::AlreadyAcquired);
        }

        let requested = config.pixel_count();
        if requested > self.capacity {
            return Err(DriverError::Exhausted {
                requested,
                capacity: self.capacity,
            });
        }

        debug!(
            strands = config.num_channels,
            length = config.channel_length,
            brightness = config.brightness,
            "Acquired pixel driver"
        );
        state.layout = Some(config.clone());
        state.last_frame = None;
        state.acquire_count += 1;
        Ok(())
    }

    fn release(&mut self) {
        let mut state = self.state.lock();
        if state.layout.take().is_some() {
            state.release_count += 1;
        }
    }

    fn show(&mut self, frame: &[Color]) -> Result<(), DriverError> {
        let mut state = self.state.lock();
        let Some(layout) = state.layout.as_ref() else {
            return Err(DriverError::NotAcquired);
        };

        let expected = layout.pixel_count();
        if frame.len() != expected {
            return Err(DriverError::FrameSize {
                expected,
                actual: frame.len(),
            });
        }

        let brightness = layout.brightness;
        state.last_frame = Some(frame.iter().map(|c| c.scale(brightness)).collect());
        state.frames_shown += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(num_channels: usize, channel_length: usize) -> DisplayConfig {
        DisplayConfig {
            num_channels,
            channel_length,
            brightness: 0.5,
        }
    }

    #[test]
    fn test_acquire_twice_fails() {
        let mut driver = MemoryDriver::new(100);
        driver.acquire(&layout(2, 10)).unwrap();
        assert_eq!(
            driver.acquire(&layout(2, 10)),
            Err(DriverError::AlreadyAcquired)
        );

        driver.release();
        assert!(driver.acquire(&layout(1, 10)).is_ok());
        assert_eq!(driver.acquire_count(), 2);
        assert_eq!(driver.release_count(), 1);
    }

    #[test]
    fn test_capacity_exhausted() {
        let mut driver = MemoryDriver::new(16);
        assert_eq!(
            driver.acquire(&layout(2, 10)),
            Err(DriverError::Exhausted {
                requested: 20,
                capacity: 16
            })
        );
        assert!(!driver.is_acquired());
    }

    #[test]
    fn test_show_scales_brightness() {
        let mut driver = MemoryDriver::new(100);
        let handle = driver.clone();

        assert_eq!(driver.show(&[]), Err(DriverError::NotAcquired));

        driver.acquire(&layout(1, 2)).unwrap();
        driver
            .show(&[Color::new(200, 100, 0), Color::new(0, 0, 50)])
            .unwrap();

        assert_eq!(handle.frames_shown(), 1);
        assert_eq!(
            handle.last_frame(),
            Some(vec![Color::new(100, 50, 0), Color::new(0, 0, 25)])
        );
    }

    #[test]
    fn test_show_rejects_wrong_frame_size() {
        let mut driver = MemoryDriver::new(100);
        driver.acquire(&layout(2, 3)).unwrap();
        assert_eq!(
            driver.show(&[Color::default(); 5]),
            Err(DriverError::FrameSize {
                expected: 6,
                actual: 5
            })
        );
        assert_eq!(driver.frames_shown(), 0);
    }
}
