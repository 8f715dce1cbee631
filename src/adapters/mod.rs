// Adapters layer: concrete implementations of the domain ports.

pub mod geocoding;
pub mod rate_limit;

pub use geocoding::{GazetteerEntry, StaticGeocoder};
pub use rate_limit::{RateLimitedGeocoder, RateLimiter};
