use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Portion, Product, Result};
use crate::hw::MoveCommand;

/// Machine configuration: catalog, keys, dispense sequence, and timings.
///
/// The defaults describe a two-product cereal machine; embedding
/// applications load their own catalog from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Products on offer
    pub products: Vec<Product>,
    /// Portion sizes on offer
    pub portions: Vec<Portion>,
    /// Key that confirms a selection
    pub confirm_key: char,
    /// Key that cancels a selection
    pub cancel_key: char,
    /// Motor move sequence that dispenses one selection
    pub dispense_moves: Vec<MoveCommand>,
    /// Telemetry window before the moves are queued
    pub dispense_pre_wait: Duration,
    /// Telemetry window after the motor buffer drains
    pub dispense_post_wait: Duration,
    /// Polling intervals, deadlines, and pauses
    pub timings: Timings,
}

/// Timing profile for the vend cycle.
///
/// Deadlines are explicit: `None` waits indefinitely, `Some` bounds the wait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timings {
    /// Pause between keypad polls
    pub key_poll: Duration,
    /// Pause between status polls while authorizing
    pub auth_poll: Duration,
    /// Pause between status polls while waiting for the transaction id
    pub id_poll: Duration,
    /// Deadline for product selection
    pub product_deadline: Option<Duration>,
    /// Deadline for portion selection
    pub portion_deadline: Option<Duration>,
    /// Deadline for confirmation
    pub confirm_deadline: Option<Duration>,
    /// Deadline for an authorization verdict
    pub auth_deadline: Option<Duration>,
    /// Pause after a terminal recovery command
    pub recovery_pause: Duration,
    /// Pause on the farewell or failure screen
    pub farewell_pause: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            key_poll: Duration::from_millis(100),
            auth_poll: Duration::from_millis(500),
            id_poll: Duration::from_millis(100),
            product_deadline: None,
            portion_deadline: Some(Duration::from_secs(30)),
            confirm_deadline: Some(Duration::from_secs(30)),
            auth_deadline: Some(Duration::from_secs(30)),
            recovery_pause: Duration::from_secs(3),
            farewell_pause: Duration::from_secs(5),
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            products: vec![
                Product {
                    key: '1',
                    name: "Lucky Charms".into(),
                    unit_price: 2.00,
                },
                Product {
                    key: '2',
                    name: "Fruit Loops".into(),
                    unit_price: 1.75,
                },
            ],
            portions: vec![
                Portion {
                    key: '1',
                    description: "1/2 cup".into(),
                    multiplier: 0.5,
                },
                Portion {
                    key: '2',
                    description: "1 cup".into(),
                    multiplier: 1.0,
                },
                Portion {
                    key: '3',
                    description: "1 1/2 cup".into(),
                    multiplier: 1.5,
                },
                Portion {
                    key: '4',
                    description: "2 cups".into(),
                    multiplier: 2.0,
                },
            ],
            confirm_key: '1',
            cancel_key: '2',
            dispense_moves: vec![
                MoveCommand {
                    speed: 200,
                    distance: 1400,
                },
                MoveCommand {
                    speed: 100,
                    distance: 50,
                },
            ],
            dispense_pre_wait: Duration::from_millis(500),
            dispense_post_wait: Duration::from_millis(500),
            timings: Timings::default(),
        }
    }
}

impl MachineConfig {
    /// Loads and validates a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<MachineConfig> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: MachineConfig = serde_json::from_str(&contents)
            .map_err(|e| Error::config(format!("invalid machine config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks key uniqueness across the catalog.
    ///
    /// Run once at startup so a bad catalog is rejected before the first
    /// customer, not at selection time.
    pub fn validate(&self) -> Result<()> {
        if self.products.is_empty() {
            return Err(Error::config("no products configured"));
        }
        for (i, product) in self.products.iter().enumerate() {
            if self.products[..i].iter().any(|p| p.key == product.key) {
                return Err(Error::config(format!(
                    "duplicate product key {:?}",
                    product.key
                )));
            }
        }
        for (i, portion) in self.portions.iter().enumerate() {
            if self.portions[..i].iter().any(|p| p.key == portion.key) {
                return Err(Error::config(format!(
                    "duplicate portion key {:?}",
                    portion.key
                )));
            }
        }
        if self.confirm_key == self.cancel_key {
            return Err(Error::config("confirm and cancel keys collide"));
        }
        Ok(())
    }

    /// Looks up the product selected by a key
    pub fn product(&self, key: char) -> Option<&Product> {
        self.products.iter().find(|p| p.key == key)
    }

    /// Looks up the portion selected by a key
    pub fn portion(&self, key: char) -> Option<&Portion> {
        self.portions.iter().find(|p| p.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MachineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.product('1').unwrap().name, "Lucky Charms");
        assert_eq!(config.portion('3').unwrap().multiplier, 1.5);
        assert!(config.product('9').is_none());
    }

    #[test]
    fn test_duplicate_product_key_rejected() {
        let mut config = MachineConfig::default();
        config.products[1].key = '1';
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_duplicate_portion_key_rejected() {
        let mut config = MachineConfig::default();
        config.portions[3].key = '1';
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = MachineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: MachineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.products, config.products);
        assert_eq!(parsed.portions, config.portions);
        assert_eq!(parsed.dispense_moves, config.dispense_moves);
    }
}
