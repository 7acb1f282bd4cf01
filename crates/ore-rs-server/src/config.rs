use serde::Deserialize;
use std::path::Path;

use ore_rs_game::player::{DEFAULT_HOTBAR_CAPACITY, DEFAULT_MAIN_CAPACITY};
use ore_rs_proto::packets::MAX_SLOTS;

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub server: ServerSection,
    #[serde(default)]
    pub inventory: InventorySection,
    #[serde(default)]
    pub items: ItemsSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    pub address: String,
    pub port: u16,
    pub max_players: u32,
}

#[derive(Debug, Deserialize)]
pub struct InventorySection {
    #[serde(default = "default_main_capacity")]
    pub main_capacity: usize,
    #[serde(default = "default_hotbar_capacity")]
    pub hotbar_capacity: usize,
    /// Items placed in every new player's inventory, main slots first.
    #[serde(default)]
    pub starting_items: Vec<StartingItem>,
}

fn default_main_capacity() -> usize {
    DEFAULT_MAIN_CAPACITY
}

fn default_hotbar_capacity() -> usize {
    DEFAULT_HOTBAR_CAPACITY
}

impl Default for InventorySection {
    fn default() -> Self {
        Self {
            main_capacity: default_main_capacity(),
            hotbar_capacity: default_hotbar_capacity(),
            starting_items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StartingItem {
    pub id: u32,
    #[serde(default = "default_starting_quantity")]
    pub quantity: u32,
}

fn default_starting_quantity() -> u32 {
    1
}

#[derive(Debug, Default, Deserialize)]
pub struct ItemsSection {
    /// Path to an item catalog JSON file. The built-in table is used when unset.
    #[serde(default)]
    pub catalog: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    pub level: String,
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server could not serve to a client.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let inv = &self.inventory;
        for (name, capacity) in [
            ("main_capacity", inv.main_capacity),
            ("hotbar_capacity", inv.hotbar_capacity),
        ] {
            // Snapshots larger than this cannot be decoded by a client.
            if !(1..=MAX_SLOTS).contains(&capacity) {
                return Err(format!(
                    "inventory.{name} = {capacity} is outside 1..={MAX_SLOTS}"
                )
                .into());
            }
        }
        Ok(())
    }
}
