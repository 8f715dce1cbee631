use crate::domain::model::{Address, GeocodeOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Resolves a postal address to a coordinate.
///
/// An address that simply cannot be found is an `Ok` outcome with
/// `valid == false`. `Err` is reserved for the collaborator itself failing.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &Address) -> Result<GeocodeOutcome>;
}
