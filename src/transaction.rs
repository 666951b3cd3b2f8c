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

use tracing::{debug, error, info, span, warn, Level};

use crate::bus::{Bus, Transaction};
use crate::client::STATUS_SUCCESS;
use crate::display::DisplayManager;
use crate::error::CommandError;
use crate::reassembler::{DecodedCommand, Reassembler};

#[cfg(test)]
mod tests;

/// State carried from one loop iteration to the next.
pub struct Context {
    pub display: DisplayManager,
    pending_error: Option<String>,
}

impl Context {
    fn new(display: DisplayManager) -> Context {
        Context {
            display,
            pending_error: None,
        }
    }

    /// The error text the next controller read will receive.
    pub fn pending_error(&self) -> Option<&str> {
        self.pending_error.as_deref()
    }

    fn record(&mut self, error: &CommandError) {
        error!(err = %error, "Error handling command");
        self.pending_error = Some(error.to_string());
    }

    /// The status the next read receives.
    fn status(&self) -> &str {
        self.pending_error.as_deref().unwrap_or(STATUS_SUCCESS)
    }
}

/// What a single step of the loop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// No transaction was pending.
    Idle,
    /// Answered a controller read.
    Read,
    /// Took in a controller write.
    Write,
}

/// The peripheral's main loop: answer the controller, apply its commands and keep
/// the strands animating.
pub struct TransactionLoop {
    bus: Box<dyn Bus>,
    reassembler: Reassembler,
    context: Context,
}

impl TransactionLoop {
    pub fn new(bus: Box<dyn Bus>, reassembler: Reassembler, display: DisplayManager) -> Self {
        TransactionLoop {
            bus,
            reassembler,
            context: Context::new(display),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn display(&self) -> &DisplayManager {
        &self.context.display
    }

    /// Runs forever.
    pub fn run(&mut self) {
        let span = span!(Level::INFO, "transaction loop");
        let _enter = span.enter();

        info!(
            fragment_size = self.reassembler.fragment_size(),
            max_fetches = self.reassembler.max_fetches(),
            "Waiting for the controller."
        );
        loop {
            self.step();
        }
    }

    /// Runs one iteration as of now.
    pub fn step(&mut self) -> Handled {
        self.step_at(Instant::now())
    }

    /// Runs one iteration: handle the pending transaction, if any, then render.
    pub fn step_at(&mut self, now: Instant) -> Handled {
        let handled = match self.bus.pending() {
            None => Handled::Idle,
            Some(mut transaction) => {
                if transaction.is_read() {
                    answer_read(transaction.as_mut(), &mut self.context);
                    Handled::Read
                } else {
                    handle_write(transaction.as_mut(), &self.reassembler, &mut self.context);
                    Handled::Write
                }
            }
        };

        if let Err(e) = self.context.display.render(now) {
            error!(err = %e, "Error showing frame");
        }
        handled
    }
}

fn answer_read(transaction: &mut dyn Transaction, context: &mut Context) {
    let status = context.status();
    debug!(address = transaction.address(), status, "Answering read");
    match transaction.write(status.as_bytes()) {
        // The error is only cleared once the controller has it.
        Ok(()) => context.pending_error = None,
        Err(e) => warn!(err = %e, "Unable to answer read"),
    }
}

fn handle_write(transaction: &mut dyn Transaction, reassembler: &Reassembler, context: &mut Context) {
    let message = match reassembler.collect(transaction) {
        Ok(message) => message,
        Err(e) => {
            error!(err = %e, "Unable to read from the bus");
            context.pending_error = Some(e.to_string());
            return;
        }
    };

    let decoded = match reassembler.decode(&message) {
        Ok(decoded) => decoded,
        Err(e) => {
            // The message is dropped.
            context.record(&e);
            return;
        }
    };

    match decoded {
        DecodedCommand::Reconfigure(update) => {
            if let Err(e) = context.display.reconfigure(&update) {
                context.record(&e);
            }
        }
        DecodedCommand::Channels(commands) => {
            for (key, command) in commands {
                let result = key
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| CommandError::InvalidChannelKey(key.clone()))
                    .and_then(|index| context.display.dispatch(index, &command));

                if let Err(e) = result {
                    context.record(&e);
                }
            }
        }
    }
}
