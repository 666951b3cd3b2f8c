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

use serde_json::{json, Value};

use super::{Handled, TransactionLoop};
use crate::bus::MockBus;
use crate::channel::Behavior;
use crate::client;
use crate::color::{Color, BLACK, RED};
use crate::display::DisplayManager;
use crate::driver::MemoryDriver;
use crate::effects::{ChannelParameters, EffectName, Pattern};
use crate::reassembler::Reassembler;

struct Harness {
    bus: MockBus,
    driver: MemoryDriver,
    transactions: TransactionLoop,
    start: Instant,
    ticks: u64,
}

impl Harness {
    fn new() -> Harness {
        Harness::with_capacity(4096)
    }

    fn with_capacity(capacity: usize) -> Harness {
        let bus = MockBus::new(0x40);
        let driver = MemoryDriver::new(capacity);
        let transactions = TransactionLoop::new(
            Box::new(bus.clone()),
            Reassembler::new(128, 100, Duration::ZERO),
            DisplayManager::new(Box::new(driver.clone())),
        );

        Harness {
            bus,
            driver,
            transactions,
            start: Instant::now(),
            ticks: 0,
        }
    }

    fn step(&mut self) -> Handled {
        self.ticks += 1;
        let now = self.start + Duration::from_millis(self.ticks * 10);
        self.transactions.step_at(now)
    }

    /// Writes a command the way the controller does and runs one step.
    fn send(&mut self, message: Value) {
        let fragments = client::fragment(&client::encode(&message), 128);
        self.bus.queue_write(fragments);
        assert_eq!(self.step(), Handled::Write);
    }

    /// Reads the status back and runs one step.
    fn status(&mut self) -> String {
        self.bus.queue_read();
        assert_eq!(self.step(), Handled::Read);
        client::decode_status(&self.bus.last_response().unwrap())
    }

    fn reconfigure(&mut self, num_strands: usize, strand_length: usize, brightness: f64) {
        self.send(client::reconfigure_message(
            num_strands,
            strand_length,
            brightness,
        ));
    }

    fn behavior(&self, index: usize) -> &Behavior {
        self.transactions.display().channel(index).unwrap().behavior()
    }
}

#[test]
fn test_idle_step() {
    let mut harness = Harness::new();
    assert_eq!(harness.step(), Handled::Idle);
    assert_eq!(harness.driver.frames_shown(), 0);
}

#[test]
fn test_reconfigure_creates_channels() {
    let mut harness = Harness::new();
    harness.reconfigure(3, 10, 0.3);

    let display = harness.transactions.display();
    assert_eq!(display.channels().len(), 3);
    assert_eq!(display.pixels().len(), 30);
    for (index, channel) in display.channels().iter().enumerate() {
        assert_eq!(channel.range(), index * 10..(index + 1) * 10);
        assert_eq!(channel.last_effect(), Some(EffectName::RainbowComet));
    }
    assert_eq!(harness.status(), client::STATUS_SUCCESS);

    // The default animation is already running.
    assert!(harness.driver.frames_shown() > 0);
}

#[test]
fn test_solid_red_scenario() {
    let mut harness = Harness::new();
    harness.reconfigure(2, 10, 0.3);
    harness.send(json!({"0": {"set_animation": "solid", "color": "red"}}));

    match harness.behavior(0) {
        Behavior::Effect(effect) => assert_eq!(effect.pattern(), &Pattern::Solid { color: RED }),
        other => panic!("expected solid, got {:?}", other),
    }
    let channel = harness.transactions.display().channel(1).unwrap();
    assert_eq!(channel.params(), &ChannelParameters::default());
    assert_eq!(channel.last_effect(), Some(EffectName::RainbowComet));

    assert_eq!(harness.status(), "success");

    let frame = harness.driver.last_frame().unwrap();
    assert_eq!(&frame[..10], &[RED.scale(0.3); 10][..]);
}

#[test]
fn test_error_is_reported_once() {
    let mut harness = Harness::new();
    harness.reconfigure(2, 10, 0.3);
    harness.send(json!({"0": {"frobnicate": 1}}));

    let status = harness.status();
    assert!(status.contains("frobnicate"), "{}", status);
    assert_eq!(harness.status(), "success");
}

#[test]
fn test_last_error_wins_and_other_channels_apply() {
    let mut harness = Harness::new();
    harness.reconfigure(3, 10, 0.3);
    harness.send(json!({
        "0": {"set_animation": "strobe"},
        "1": {"set_animation": "solid", "color": "blue"},
        "7": {"speed": 1},
    }));

    assert!(matches!(
        harness.behavior(1),
        Behavior::Effect(effect) if effect.name() == EffectName::Solid
    ));
    let status = harness.status();
    assert!(status.contains("index 7 out of bound"), "{}", status);
}

#[test]
fn test_error_survives_failed_answer() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 10, 0.3);
    harness.send(json!({"0": {"frobnicate": 1}}));

    harness.bus.queue_abandoned_read();
    assert_eq!(harness.step(), Handled::Read);
    assert!(harness.bus.responses().is_empty());
    assert!(harness.transactions.context().pending_error().is_some());

    let status = harness.status();
    assert!(status.contains("frobnicate"), "{}", status);
    assert_eq!(harness.transactions.context().pending_error(), None);
}

#[test]
fn test_invalid_channel_key() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 10, 0.3);
    harness.send(json!({"first": {"speed": 1}}));

    assert_eq!(harness.status(), "invalid strand index first");
}

#[test]
fn test_command_before_reconfigure() {
    let mut harness = Harness::new();
    harness.send(json!({"0": {"set_animation": "solid"}}));

    assert_eq!(harness.status(), "display has not been configured");
    assert!(!harness.transactions.display().is_configured());
}

#[test]
fn test_malformed_message_is_dropped() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 10, 0.3);

    harness
        .bus
        .queue_write(client::fragment(b"{\"0\": {\"set_anim", 128));
    assert_eq!(harness.step(), Handled::Write);

    let status = harness.status();
    assert!(status.starts_with("invalid json received"), "{}", status);
    assert!(status.contains("set_anim"), "{}", status);
    assert_eq!(
        harness.transactions.display().channel(0).unwrap().last_effect(),
        Some(EffectName::RainbowComet)
    );
}

#[test]
fn test_speed_only_preserves_other_parameters() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 10, 0.3);
    harness.send(json!({"0": {"set_animation": "chase", "size": 3, "colors": ["blue"]}}));
    harness.send(json!({"0": {"speed": 0.5}}));

    let channel = harness.transactions.display().channel(0).unwrap();
    assert_eq!(
        channel.params(),
        &ChannelParameters {
            speed: 0.5,
            size: 3,
            colors: vec![Color::new(0, 0, 255)],
            ..Default::default()
        }
    );
    assert_eq!(channel.last_effect(), Some(EffectName::Chase));
}

#[test]
fn test_manual_pixels_stay_until_set_animation() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 4, 1.0);
    harness.send(json!({"0": {"set_pixel_colors": {"2": [0, 255, 0]}}}));

    let green = Color::new(0, 255, 0);
    for _ in 0..5 {
        harness.step();
    }
    assert_eq!(
        harness.transactions.display().pixels(),
        &[BLACK, BLACK, green, BLACK][..]
    );
    assert!(!harness.transactions.display().is_animating());

    harness.send(json!({"0": {"set_animation": "solid", "color": "red"}}));
    assert!(harness.transactions.display().is_animating());
    assert_eq!(harness.transactions.display().pixels(), &[RED; 4][..]);
}

#[test]
fn test_parameters_on_manual_strand_are_reported() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 4, 1.0);
    harness.send(json!({"0": {"set_pixel_colors": {"1": [255, 0, 0]}}}));
    harness.send(json!({"0": {"speed": 0.5}}));

    let status = harness.status();
    assert!(status.starts_with("invalid animation name"), "{}", status);
    assert_eq!(
        harness.transactions.display().pixels(),
        &[BLACK, RED, BLACK, BLACK][..]
    );
    assert_eq!(harness.status(), "success");
}

#[test]
fn test_chase_without_colors() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 10, 0.3);
    harness.send(json!({"0": {"set_animation": "chase", "colors": []}}));

    assert_eq!(harness.status(), "animation chase requires color");
}

#[test]
fn test_long_message_is_truncated() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 10, 0.3);

    // Far more than 100 fragments of 128 bytes.
    let colors: Vec<Value> = (0..3000).map(|_| json!("red")).collect();
    harness.send(json!({"0": {"colors": colors}}));

    let status = harness.status();
    assert!(status.starts_with("invalid json received"), "{}", status);
}

#[test]
fn test_driver_exhaustion_is_reported() {
    let mut harness = Harness::with_capacity(50);
    harness.reconfigure(2, 10, 0.3);
    harness.reconfigure(10, 10, 0.3);

    let status = harness.status();
    assert!(status.contains("cannot hold 100 pixels"), "{}", status);
    assert!(!harness.transactions.display().is_configured());

    harness.reconfigure(5, 10, 0.3);
    assert_eq!(harness.status(), "success");
    assert_eq!(harness.transactions.display().channels().len(), 5);
    assert_eq!(harness.driver.release_count(), 1);
}

#[test]
fn test_sequence_runs_through_loop() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 3, 1.0);
    harness.send(json!({"0": {"sequence": {
        "animations": [
            {"animation_name": "solid", "colors": ["red"]},
            {"animation_name": "solid", "colors": ["blue"]},
        ],
        "duration": 2,
    }}}));

    // The write step rendered the first tick of the red step.
    let mut shown = vec![harness.transactions.display().pixels()[0]];
    for _ in 0..3 {
        harness.step();
        shown.push(harness.transactions.display().pixels()[0]);
    }
    let blue = Color::new(0, 0, 255);
    assert_eq!(shown, vec![RED, RED, blue, blue]);
}

#[test]
fn test_every_transaction_is_released() {
    let mut harness = Harness::new();
    harness.reconfigure(1, 10, 0.3);
    harness.status();
    harness.send(json!({"0": {"speed": 0.2}}));
    harness.status();

    assert_eq!(harness.bus.release_count(), 4);
    assert_eq!(harness.bus.queued(), 0);
}
