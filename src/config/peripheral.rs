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
use std::path::Path;
use std::time::Duration;

use config::{Config, File};
use duration_string::DurationString;
use serde::Deserialize;

use crate::display::DisplayConfigUpdate;
use crate::reassembler::{
    Reassembler, DEFAULT_FETCH_DELAY, DEFAULT_FRAGMENT_SIZE, DEFAULT_MAX_FETCHES,
};

use super::error::ConfigError;

const DEFAULT_ADDRESS: u8 = 0x40;
const DEFAULT_DRIVER_CAPACITY: usize = 4096;

/// A YAML representation of the peripheral configuration.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Peripheral {
    /// The bus address the peripheral answers on (default: 0x40).
    address: Option<u8>,

    /// Bytes per fragment the controller writes (default: 128).
    fragment_size: Option<usize>,

    /// Reads made for every controller write (default: 100).
    max_fetches: Option<usize>,

    /// Pause before each read, e.g. "2ms".
    fetch_delay: Option<String>,

    /// The most pixels the driver can hold across all strands (default: 4096).
    driver_capacity: Option<usize>,

    /// Layout applied at startup. Without it the peripheral waits for the
    /// controller's first reconfigure.
    display: Option<DisplayConfigUpdate>,
}

impl Peripheral {
    /// Parse a peripheral configuration from a YAML file.
    pub fn deserialize(path: &Path) -> Result<Peripheral, ConfigError> {
        let peripheral = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Peripheral>()?;
        peripheral.validate()?;
        Ok(peripheral)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.fragment_size() == 0 {
            return Err(ConfigError::Invalid(
                "fragment_size must be greater than zero".to_string(),
            ));
        }
        if self.max_fetches() == 0 {
            return Err(ConfigError::Invalid(
                "max_fetches must be greater than zero".to_string(),
            ));
        }
        self.fetch_delay()?;
        Ok(())
    }

    pub fn address(&self) -> u8 {
        self.address.unwrap_or(DEFAULT_ADDRESS)
    }

    pub fn fragment_size(&self) -> usize {
        self.fragment_size.unwrap_or(DEFAULT_FRAGMENT_SIZE)
    }

    pub fn max_fetches(&self) -> usize {
        self.max_fetches.unwrap_or(DEFAULT_MAX_FETCHES)
    }

    /// Returns the pause before each read (default: 2ms).
    pub fn fetch_delay(&self) -> Result<Duration, ConfigError> {
        match &self.fetch_delay {
            Some(fetch_delay) => Ok(DurationString::from_string(fetch_delay.clone())
                .map_err(|source| ConfigError::Duration {
                    value: fetch_delay.clone(),
                    source,
                })?
                .into()),
            None => Ok(DEFAULT_FETCH_DELAY),
        }
    }

    pub fn driver_capacity(&self) -> usize {
        self.driver_capacity.unwrap_or(DEFAULT_DRIVER_CAPACITY)
    }

    pub fn display(&self) -> Option<&DisplayConfigUpdate> {
        self.display.as_ref()
    }

    /// Builds the reassembler for this configuration.
    pub fn reassembler(&self) -> Result<Reassembler, ConfigError> {
        Ok(Reassembler::new(
            self.fragment_size(),
            self.max_fetches(),
            self.fetch_delay()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use config::FileFormat;

    use super::*;

    fn from_yaml(yaml: &str) -> Peripheral {
        Config::builder()
            .add_source(File::from_str(yaml, FileFormat::Yaml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let peripheral = from_yaml("{}");

        assert_eq!(peripheral.address(), 0x40);
        assert_eq!(peripheral.fragment_size(), 128);
        assert_eq!(peripheral.max_fetches(), 100);
        assert_eq!(peripheral.fetch_delay().unwrap(), Duration::from_millis(2));
        assert_eq!(peripheral.driver_capacity(), 4096);
        assert!(peripheral.display().is_none());
    }

    #[test]
    fn test_peripheral_deserialize() {
        let yaml = r#"
            address: 65
            fragment_size: 64
            max_fetches: 20
            fetch_delay: 5ms
            driver_capacity: 300
            display:
              num_strands: 3
              strand_length: 50
              brightness: 0.5
        "#;

        let peripheral = from_yaml(yaml);
        assert_eq!(peripheral.address(), 65);
        assert_eq!(peripheral.driver_capacity(), 300);
        assert_eq!(
            peripheral.display(),
            Some(&DisplayConfigUpdate::new(3, 50, 0.5))
        );

        let reassembler = peripheral.reassembler().unwrap();
        assert_eq!(reassembler.fragment_size(), 64);
        assert_eq!(reassembler.max_fetches(), 20);
        assert_eq!(reassembler.fetch_delay(), Duration::from_millis(5));
        assert_eq!(reassembler.max_message_len(), 1280);
    }

    #[test]
    fn test_bad_fetch_delay() {
        let peripheral = from_yaml("fetch_delay: soon");
        assert!(matches!(
            peripheral.fetch_delay(),
            Err(ConfigError::Duration { .. })
        ));
    }

    #[test]
    fn test_deserialize_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "fragment_size: 32").unwrap();
        writeln!(file, "fetch_delay: 1ms").unwrap();

        let peripheral = Peripheral::deserialize(file.path()).unwrap();
        assert_eq!(peripheral.fragment_size(), 32);
        assert_eq!(peripheral.fetch_delay().unwrap(), Duration::from_millis(1));
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "max_fetches: 0").unwrap();

        assert!(matches!(
            Peripheral::deserialize(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_deserialize_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Peripheral::deserialize(&dir.path().join("missing.yaml")),
            Err(ConfigError::Load(_))
        ));
    }
}
