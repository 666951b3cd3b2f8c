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
use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::BusError;

use super::{Bus, Transaction};

#[derive(Debug)]
enum Queued {
    Write(VecDeque<Vec<u8>>),
    Read,
    AbandonedRead,
}

#[derive(Debug, Default)]
struct Inner {
    queue: VecDeque<Queued>,
    responses: Vec<Vec<u8>>,
    releases: usize,
}

/// A bus that plays back queued controller transactions. Clones share the queue
/// and the recorded responses.
#[derive(Debug, Clone)]
pub struct MockBus {
    address: u8,
    inner: Arc<Mutex<Inner>>,
}

impl MockBus {
    pub fn new(address: u8) -> MockBus {
        MockBus {
            address,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Queues a controller write made of the given fragments.
    pub fn queue_write(&self, fragments: Vec<Vec<u8>>) {
        self.inner
            .lock()
            .queue
            .push_back(Queued::Write(fragments.into()));
    }

    /// Queues a controller read.
    pub fn queue_read(&self) {
        self.inner.lock().queue.push_back(Queued::Read);
    }

    /// Queues a controller read that is gone before the peripheral answers it.
    pub fn queue_abandoned_read(&self) {
        self.inner.lock().queue.push_back(Queued::AbandonedRead);
    }

    /// Number of transactions not yet handed out.
    pub fn queued(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Everything written back to the controller, in order.
    pub fn responses(&self) -> Vec<Vec<u8>> {
        self.inner.lock().responses.clone()
    }

    /// The most recent response, if any.
    pub fn last_response(&self) -> Option<Vec<u8>> {
        self.inner.lock().responses.last().cloned()
    }

    /// Number of transactions handed out and released.
    pub fn release_count(&self) -> usize {
        self.inner.lock().releases
    }
}

impl Bus for MockBus {
    fn pending(&mut self) -> Option<Box<dyn Transaction + '_>> {
        let queued = self.inner.lock().queue.pop_front()?;
        let kind = match queued {
            Queued::Write(fragments) => Kind::Write(fragments),
            Queued::Read => Kind::Read { answered: false },
            Queued::AbandonedRead => Kind::Read { answered: true },
        };

        Some(Box::new(MockTransaction {
            address: self.address,
            kind,
            inner: self.inner.clone(),
        }))
    }
}

#[derive(Debug)]
enum Kind {
    Write(VecDeque<Vec<u8>>),
    Read { answered: bool },
}

#[derive(Debug)]
struct MockTransaction {
    address: u8,
    kind: Kind,
    inner: Arc<Mutex<Inner>>,
}

impl Transaction for MockTransaction {
    fn address(&self) -> u8 {
        self.address
    }

    fn is_read(&self) -> bool {
        matches!(self.kind, Kind::Read { .. })
    }

    fn read(&mut self, max_len: usize) -> Result<Vec<u8>, BusError> {
        let Kind::Write(fragments) = &mut self.kind else {
            return Err(BusError::Io(
                "cannot read during a controller read".to_string(),
            ));
        };

        let Some(mut fragment) = fragments.pop_front() else {
            return Ok(Vec::new());
        };

        if fragment.len() > max_len {
            let rest = fragment.split_off(max_len);
            fragments.push_front(rest);
        }
        Ok(fragment)
    }

    fn write(&mut self, data: &[u8]) -> Result<(), BusError> {
        match &mut self.kind {
            Kind::Read { answered: true } => Err(BusError::Released),
            Kind::Read { answered } => {
                *answered = true;
                self.inner.lock().responses.push(data.to_vec());
                Ok(())
            }
            Kind::Write(_) => Err(BusError::Io(
                "cannot write during a controller write".to_string(),
            )),
        }
    }
}

impl Drop for MockTransaction {
    fn drop(&mut self) {
        self.inner.lock().releases += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transactions_come_out_in_order() {
        let mut bus = MockBus::new(0x40);
        bus.queue_write(vec![b"abc".to_vec()]);
        bus.queue_read();
        assert_eq!(bus.queued(), 2);

        {
            let transaction = bus.pending().unwrap();
            assert_eq!(transaction.address(), 0x40);
            assert!(!transaction.is_read());
        }
        {
            let transaction = bus.pending().unwrap();
            assert!(transaction.is_read());
        }
        assert!(bus.pending().is_none());
        assert_eq!(bus.release_count(), 2);
    }

    #[test]
    fn test_read_splits_long_fragments() {
        let mut bus = MockBus::new(0x40);
        bus.queue_write(vec![b"abcdef".to_vec(), b"gh".to_vec()]);

        let mut transaction = bus.pending().unwrap();
        assert_eq!(transaction.read(4).unwrap(), b"abcd");
        assert_eq!(transaction.read(4).unwrap(), b"ef");
        assert_eq!(transaction.read(4).unwrap(), b"gh");
        assert!(transaction.read(4).unwrap().is_empty());
        assert!(transaction.write(b"nope").is_err());
    }

    #[test]
    fn test_read_transaction_records_one_response() {
        let mut bus = MockBus::new(0x40);
        let handle = bus.clone();
        bus.queue_read();

        let mut transaction = bus.pending().unwrap();
        transaction.write(b"success").unwrap();
        assert_eq!(transaction.write(b"again"), Err(BusError::Released));
        assert!(transaction.read(10).is_err());
        drop(transaction);

        assert_eq!(handle.responses(), vec![b"success".to_vec()]);
        assert_eq!(handle.last_response(), Some(b"success".to_vec()));
        assert_eq!(handle.release_count(), 1);
    }

    #[test]
    fn test_abandoned_read_refuses_answer() {
        let mut bus = MockBus::new(0x40);
        bus.queue_abandoned_read();

        let mut transaction = bus.pending().unwrap();
        assert!(transaction.is_read());
        assert_eq!(transaction.write(b"success"), Err(BusError::Released));
        drop(transaction);

        assert!(bus.responses().is_empty());
        assert_eq!(bus.release_count(), 1);
    }
}
