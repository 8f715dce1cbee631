pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use config::TomlConfig;

pub use adapters::{RateLimitedGeocoder, RateLimiter, StaticGeocoder};
pub use crate::core::{pricing::PricingEngine, quote::QuoteService};
pub use domain::model::{
    Address, Coordinate, Dimensions, PriceQuote, PricingVariant, Quotation, RateCard, RateTable,
    ShipmentRequest,
};
pub use domain::ports::Geocoder;
pub use utils::error::{QuoteError, Result};
