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
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{crate_version, Parser, Subcommand};
use tracing::{error, info};

use multiled::bus::MockBus;
use multiled::channel::Behavior;
use multiled::client;
use multiled::config::Peripheral;
use multiled::display::DisplayManager;
use multiled::driver::MemoryDriver;
use multiled::reassembler::{DecodedCommand, Reassembler};
use multiled::transaction::TransactionLoop;

#[derive(Parser)]
#[clap(
    author = "Michael Wilson",
    version = crate_version!(),
    about = "A bus peripheral that drives animated LED strands."
)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plays a file of commands through an in-memory bus and pixel driver.
    Simulate {
        /// The path to the peripheral config.
        config_path: String,
        /// A file with one JSON command per line.
        messages_path: String,
        /// Render steps to run after the last command.
        #[arg(short, long, default_value_t = 10)]
        ticks: usize,
    },
    /// Decodes a file of commands without applying them.
    Check {
        /// A file with one JSON command per line.
        messages_path: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            config_path,
            messages_path,
            ticks,
        } => simulate(&PathBuf::from(config_path), &PathBuf::from(messages_path), ticks)?,
        Commands::Check { messages_path } => {
            let reassembler = Reassembler::default();
            let mut failures = 0;

            for (number, line) in read_messages(&PathBuf::from(messages_path))? {
                match reassembler.decode(line.as_bytes()) {
                    Ok(DecodedCommand::Reconfigure(update)) => {
                        println!("{}: reconfigure {:?}", number, update)
                    }
                    Ok(DecodedCommand::Channels(commands)) => {
                        let strands: Vec<&str> =
                            commands.iter().map(|(key, _)| key.as_str()).collect();
                        println!("{}: strands [{}]", number, strands.join(", "))
                    }
                    Err(e) => {
                        failures += 1;
                        println!("{}: {}", number, e)
                    }
                }
            }

            if failures > 0 {
                return Err(format!("{} invalid messages", failures).into());
            }
        }
    }

    Ok(())
}

/// Non-empty lines of a messages file with their line numbers.
fn read_messages(path: &Path) -> Result<Vec<(usize, String)>, Box<dyn Error>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| (index + 1, line.trim().to_string()))
        .collect())
}

fn simulate(config_path: &Path, messages_path: &Path, ticks: usize) -> Result<(), Box<dyn Error>> {
    let peripheral = Peripheral::deserialize(config_path)?;
    let reassembler = peripheral.reassembler()?;
    let fragment_size = reassembler.fragment_size();

    let driver = MemoryDriver::new(peripheral.driver_capacity());
    let mut display = DisplayManager::new(Box::new(driver.clone()));
    if let Some(update) = peripheral.display() {
        display.reconfigure(update)?;
    }

    let bus = MockBus::new(peripheral.address());
    let mut transactions = TransactionLoop::new(Box::new(bus.clone()), reassembler, display);

    info!(
        address = peripheral.address(),
        capacity = driver.capacity(),
        "Simulating peripheral"
    );

    for (number, line) in read_messages(messages_path)? {
        bus.queue_write(client::fragment(line.as_bytes(), fragment_size));
        bus.queue_read();
        transactions.step();
        transactions.step();

        match bus.last_response() {
            Some(response) => println!("{}: {}", number, client::decode_status(&response)),
            None => error!(line = number, "No response recorded"),
        }
    }

    for _ in 0..ticks {
        transactions.step();
    }

    let display = transactions.display();
    println!(
        "\nFrames shown: {} ({} transactions)",
        driver.frames_shown(),
        bus.release_count()
    );
    for channel in display.channels() {
        let behavior = match channel.behavior() {
            Behavior::Effect(effect) => effect.name().to_string(),
            Behavior::Manual(pixels) => format!("manual ({} pixels)", pixels.len()),
            Behavior::Sequence(sequence) => format!("sequence of {}", sequence.effects().len()),
        };
        println!("- strand {}: {}", channel.index(), behavior);
    }

    Ok(())
}
