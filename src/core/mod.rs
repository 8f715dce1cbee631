pub mod distance;
pub mod pricing;
pub mod quote;

pub use crate::domain::model::{
    Coordinate, Dimensions, PriceQuote, PricingVariant, Quotation, RateCard, RateTable,
};
pub use crate::domain::ports::Geocoder;
pub use crate::utils::error::Result;
