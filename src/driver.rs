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
use crate::color::Color;
use crate::display::DisplayConfig;
use crate::error::DriverError;

pub mod memory;

pub use memory::MemoryDriver;

/// The physical pixel driver. It is a singular resource: it must be released
/// before it can be acquired again with a different layout.
pub trait Driver: Send {
    /// Claims the driver for the given layout.
    fn acquire(&mut self, config: &DisplayConfig) -> Result<(), DriverError>;

    /// Gives the driver back. Releasing a driver that is not acquired does nothing.
    fn release(&mut self);

    /// Pushes a full frame, one color per pixel across all strands.
    fn show(&mut self, frame: &[Color]) -> Result<(), DriverError>;
}
