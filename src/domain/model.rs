use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// True when lat is within [-90, 90] and lng within [-180, 180].
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Package dimensions in centimetres, weight in grams.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub depth_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub weight_g: f64,
}

impl Dimensions {
    pub fn new(depth_cm: f64, width_cm: f64, height_cm: f64, weight_g: f64) -> Self {
        Self {
            depth_cm,
            width_cm,
            height_cm,
            weight_g,
        }
    }

    pub fn volume_cm3(&self) -> f64 {
        self.depth_cm * self.width_cm * self.height_cm
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingVariant {
    Standard,
    Oversized,
    International,
}

impl PricingVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingVariant::Standard => "standard",
            PricingVariant::Oversized => "oversized",
            PricingVariant::International => "international",
        }
    }
}

impl fmt::Display for PricingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coefficients of the fee formula for one pricing variant.
///
/// `price = base_rate_cents + weight_g * weight_multiplier
///        + volume_cm3 * volume_multiplier + distance_km * per_km_rate
///        + surcharge_cents`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    pub base_rate_cents: f64,
    pub weight_multiplier: f64,
    pub volume_multiplier: f64,
    pub per_km_rate: f64,
    pub surcharge_cents: f64,
}

impl RateCard {
    pub const STANDARD: RateCard = RateCard {
        base_rate_cents: 1000.0,
        weight_multiplier: 100.0,
        volume_multiplier: 0.01,
        per_km_rate: 0.05,
        surcharge_cents: 0.0,
    };

    pub const OVERSIZED: RateCard = RateCard {
        base_rate_cents: 2000.0,
        weight_multiplier: 200.0,
        volume_multiplier: 0.02,
        per_km_rate: 0.075,
        surcharge_cents: 0.0,
    };

    pub const INTERNATIONAL: RateCard = RateCard {
        base_rate_cents: 1500.0,
        weight_multiplier: 150.0,
        volume_multiplier: 0.015,
        per_km_rate: 0.06,
        surcharge_cents: 500.0,
    };
}

/// Limits above which a domestic shipment moves to the oversized tier.
/// Either limit alone is enough.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionThresholds {
    pub volume_cm3: f64,
    pub weight_g: f64,
}

impl Default for SelectionThresholds {
    fn default() -> Self {
        Self {
            volume_cm3: 100_000.0,
            weight_g: 30_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub standard: RateCard,
    pub oversized: RateCard,
    pub international: RateCard,
    pub thresholds: SelectionThresholds,
}

impl RateTable {
    pub fn card(&self, variant: PricingVariant) -> &RateCard {
        match variant {
            PricingVariant::Standard => &self.standard,
            PricingVariant::Oversized => &self.oversized,
            PricingVariant::International => &self.international,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            standard: RateCard::STANDARD,
            oversized: RateCard::OVERSIZED,
            international: RateCard::INTERNATIONAL,
            thresholds: SelectionThresholds::default(),
        }
    }
}

/// Individual terms of a computed price, all in cents except the inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub base_cents: f64,
    pub weight_fee_cents: f64,
    pub volume_fee_cents: f64,
    pub distance_fee_cents: f64,
    pub surcharge_cents: f64,
    pub distance_km: f64,
    pub volume_cm3: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub variant: PricingVariant,
    pub raw_cents: f64,
    pub amount_cents: i64,
    pub breakdown: FeeBreakdown,
}

impl PriceQuote {
    pub fn display_amount(&self) -> String {
        crate::domain::money::format_cents(self.amount_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub address1: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Origin,
    Destination,
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressField::Origin => f.write_str("origin"),
            AddressField::Destination => f.write_str("destination"),
        }
    }
}

/// What a geocoder reports for one address. `valid == false` carries an
/// `error` message instead of a usable coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeOutcome {
    pub valid: bool,
    pub coordinate: Coordinate,
    pub country_code: Option<String>,
    pub display_name: Option<String>,
    pub error: Option<String>,
}

impl GeocodeOutcome {
    pub fn found(coordinate: Coordinate) -> Self {
        Self {
            valid: true,
            coordinate,
            country_code: None,
            display_name: None,
            error: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            coordinate: Coordinate::new(0.0, 0.0),
            country_code: None,
            display_name: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub origin: Address,
    pub destination: Address,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub address: Option<Address>,
    pub coordinate: Coordinate,
    pub country_code: String,
    pub display_name: Option<String>,
}

/// A priced offer for one parcel between two locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub origin: ResolvedLocation,
    pub destination: ResolvedLocation,
    pub dimensions: Dimensions,
    pub quote: PriceQuote,
    pub quoted_at: DateTime<Utc>,
}
