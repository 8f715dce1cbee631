use crate::domain::model::{Address, Coordinate, GeocodeOutcome};
use crate::domain::ports::Geocoder;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const NOT_FOUND_MESSAGE: &str = "Location not found. Please check the address.";

/// One known address, as listed under `[[locations]]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    pub address1: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
    pub country_code: Option<String>,
    pub display_name: Option<String>,
}

impl GazetteerEntry {
    fn address(&self) -> Address {
        Address {
            address1: self.address1.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
        }
    }
}

/// Offline geocoder over a fixed table of addresses.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: HashMap<String, GeocodeOutcome>,
}

impl StaticGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[GazetteerEntry]) -> Self {
        let mut geocoder = Self::new();
        for entry in entries {
            geocoder.insert(entry);
        }
        tracing::debug!("Loaded {} gazetteer entries", geocoder.len());
        geocoder
    }

    pub fn insert(&mut self, entry: &GazetteerEntry) {
        let outcome = GeocodeOutcome {
            valid: true,
            coordinate: Coordinate::new(entry.lat, entry.lng),
            country_code: entry.country_code.clone(),
            display_name: entry.display_name.clone(),
            error: None,
        };
        self.entries.insert(search_key(&entry.address()), outcome);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn geocode(&self, address: &Address) -> Result<GeocodeOutcome> {
        let key = search_key(address);
        match self.entries.get(&key) {
            Some(outcome) => Ok(outcome.clone()),
            None => {
                tracing::debug!("No gazetteer match for '{}'", key);
                Ok(GeocodeOutcome::not_found(NOT_FOUND_MESSAGE))
            }
        }
    }
}

/// `address, city, postal, country`, lowercased with runs of whitespace
/// collapsed.
fn search_key(address: &Address) -> String {
    let joined = format!(
        "{}, {}, {}, {}",
        address.address1, address.city, address.postal_code, address.country
    );
    joined
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
