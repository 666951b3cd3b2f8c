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
use crate::error::BusError;

pub mod mock;

pub use mock::MockBus;

/// A single transaction started by the bus controller. The transaction is released
/// back to the bus when dropped.
pub trait Transaction {
    /// The peripheral address the controller targeted.
    fn address(&self) -> u8;

    /// True when the controller is reading from us, false when it is writing.
    fn is_read(&self) -> bool;

    /// Reads up to `max_len` bytes the controller wrote. Returns an empty buffer
    /// once the controller has nothing more to send.
    fn read(&mut self, max_len: usize) -> Result<Vec<u8>, BusError>;

    /// Answers a controller read.
    fn write(&mut self, data: &[u8]) -> Result<(), BusError>;
}

/// A bus in target mode.
pub trait Bus {
    /// Returns the transaction the controller has started, if any.
    fn pending(&mut self) -> Option<Box<dyn Transaction + '_>>;
}
