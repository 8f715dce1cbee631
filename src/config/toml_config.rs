use crate::adapters::geocoding::GazetteerEntry;
use crate::domain::model::{RateCard, RateTable, SelectionThresholds};
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_RATE_LIMIT_MS: u64 = 1000;
const DEFAULT_LIMITER_KEY: &str = "gazetteer";

/// File configuration. Every section is optional; an empty file yields the
/// built-in rate table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub logging: Option<LoggingConfig>,
    pub pricing: Option<PricingConfig>,
    pub geocoding: Option<GeocodingConfig>,
    pub locations: Vec<GazetteerEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricingConfig {
    pub standard: Option<RateCardOverride>,
    pub oversized: Option<RateCardOverride>,
    pub international: Option<RateCardOverride>,
    pub thresholds: Option<ThresholdsOverride>,
}

/// Partial rate card; unset fields keep the built-in value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateCardOverride {
    pub base_rate_cents: Option<f64>,
    pub weight_multiplier: Option<f64>,
    pub volume_multiplier: Option<f64>,
    pub per_km_rate: Option<f64>,
    pub surcharge_cents: Option<f64>,
}

impl RateCardOverride {
    fn apply(&self, card: &RateCard) -> RateCard {
        RateCard {
            base_rate_cents: self.base_rate_cents.unwrap_or(card.base_rate_cents),
            weight_multiplier: self.weight_multiplier.unwrap_or(card.weight_multiplier),
            volume_multiplier: self.volume_multiplier.unwrap_or(card.volume_multiplier),
            per_km_rate: self.per_km_rate.unwrap_or(card.per_km_rate),
            surcharge_cents: self.surcharge_cents.unwrap_or(card.surcharge_cents),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThresholdsOverride {
    pub volume_cm3: Option<f64>,
    pub weight_g: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeocodingConfig {
    pub rate_limit_ms: Option<u64>,
    pub limiter_key: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(QuoteError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QuoteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| QuoteError::ConfigError {
            message: format!("env placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn rate_table(&self) -> RateTable {
        let defaults = RateTable::default();
        let Some(pricing) = &self.pricing else {
            return defaults;
        };

        let card = |over: &Option<RateCardOverride>, base: &RateCard| {
            over.as_ref().map(|o| o.apply(base)).unwrap_or(*base)
        };

        let thresholds = match &pricing.thresholds {
            Some(t) => SelectionThresholds {
                volume_cm3: t.volume_cm3.unwrap_or(defaults.thresholds.volume_cm3),
                weight_g: t.weight_g.unwrap_or(defaults.thresholds.weight_g),
            },
            None => defaults.thresholds,
        };

        RateTable {
            standard: card(&pricing.standard, &defaults.standard),
            oversized: card(&pricing.oversized, &defaults.oversized),
            international: card(&pricing.international, &defaults.international),
            thresholds,
        }
    }

    pub fn geocoder_min_interval(&self) -> Duration {
        let ms = self
            .geocoding
            .as_ref()
            .and_then(|g| g.rate_limit_ms)
            .unwrap_or(DEFAULT_RATE_LIMIT_MS);
        Duration::from_millis(ms)
    }

    pub fn limiter_key(&self) -> &str {
        self.geocoding
            .as_ref()
            .and_then(|g| g.limiter_key.as_deref())
            .unwrap_or(DEFAULT_LIMITER_KEY)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn validate_config(&self) -> Result<()> {
        let rates = self.rate_table();
        validation::validate_rate_card("pricing.standard", &rates.standard)?;
        validation::validate_rate_card("pricing.oversized", &rates.oversized)?;
        validation::validate_rate_card("pricing.international", &rates.international)?;
        validation::validate_positive("pricing.thresholds.volume_cm3", rates.thresholds.volume_cm3)?;
        validation::validate_positive("pricing.thresholds.weight_g", rates.thresholds.weight_g)?;

        if let Some(level) = self.log_level() {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(QuoteError::InvalidValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        for (index, location) in self.locations.iter().enumerate() {
            let prefix = format!("locations[{}]", index);
            validation::validate_non_empty_string(&format!("{}.address1", prefix), &location.address1)?;
            validation::validate_non_empty_string(&format!("{}.city", prefix), &location.city)?;
            validation::validate_range(&format!("{}.lat", prefix), location.lat, -90.0, 90.0)?;
            validation::validate_range(&format!("{}.lng", prefix), location.lng, -180.0, 180.0)?;
            if let Some(code) = &location.country_code {
                validation::validate_non_empty_string(&format!("{}.country_code", prefix), code)?;
            }
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
