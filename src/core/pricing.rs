//! Shipping price computation.
//!
//! One fee formula parameterised by a [`RateCard`]; [`select_variant`] picks
//! which card applies to a shipment. Nothing here returns an error: zero,
//! negative or NaN inputs yield a number, never a panic. Callers validate
//! their input first.

use crate::core::distance::haversine_km;
use crate::domain::model::{
    Coordinate, Dimensions, FeeBreakdown, PriceQuote, PricingVariant, RateCard, RateTable,
    SelectionThresholds,
};

/// Picks the pricing variant. First match wins:
/// different countries, then volume OR weight over threshold, then standard.
pub fn select_variant(
    dimensions: &Dimensions,
    origin_country: &str,
    destination_country: &str,
    thresholds: &SelectionThresholds,
) -> PricingVariant {
    if origin_country != destination_country {
        PricingVariant::International
    } else if dimensions.volume_cm3() > thresholds.volume_cm3
        || dimensions.weight_g > thresholds.weight_g
    {
        PricingVariant::Oversized
    } else {
        PricingVariant::Standard
    }
}

/// Applies one rate card to a distance and a parcel. Returns the unrounded
/// total in cents with its terms.
pub fn compute_fee(card: &RateCard, distance_km: f64, dimensions: &Dimensions) -> (f64, FeeBreakdown) {
    let volume_cm3 = dimensions.volume_cm3();
    let breakdown = FeeBreakdown {
        base_cents: card.base_rate_cents,
        weight_fee_cents: dimensions.weight_g * card.weight_multiplier,
        volume_fee_cents: volume_cm3 * card.volume_multiplier,
        distance_fee_cents: distance_km * card.per_km_rate,
        surcharge_cents: card.surcharge_cents,
        distance_km,
        volume_cm3,
    };

    let total = breakdown.base_cents
        + breakdown.weight_fee_cents
        + breakdown.volume_fee_cents
        + breakdown.distance_fee_cents
        + breakdown.surcharge_cents;

    (total, breakdown)
}

/// Rounds half away from zero. NaN becomes 0 and out-of-range values
/// saturate at the `i64` bounds.
pub fn round_to_cents(raw_cents: f64) -> i64 {
    if raw_cents.is_nan() {
        0
    } else {
        raw_cents.round() as i64
    }
}

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    rates: RateTable,
}

impl PricingEngine {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn select(
        &self,
        dimensions: &Dimensions,
        origin_country: &str,
        destination_country: &str,
    ) -> PricingVariant {
        select_variant(
            dimensions,
            origin_country,
            destination_country,
            &self.rates.thresholds,
        )
    }

    pub fn price(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        dimensions: &Dimensions,
        origin_country: &str,
        destination_country: &str,
    ) -> PriceQuote {
        let variant = self.select(dimensions, origin_country, destination_country);
        let quote = self.price_with_variant(variant, origin, destination, dimensions);

        tracing::debug!(
            "Priced {} -> {} as {} ({:.2} km): {} cents",
            origin_country,
            destination_country,
            variant,
            quote.breakdown.distance_km,
            quote.amount_cents
        );

        quote
    }

    /// Prices with an explicit variant, bypassing selection.
    pub fn price_with_variant(
        &self,
        variant: PricingVariant,
        origin: Coordinate,
        destination: Coordinate,
        dimensions: &Dimensions,
    ) -> PriceQuote {
        let distance_km = haversine_km(origin, destination);
        let (raw_cents, breakdown) = compute_fee(self.rates.card(variant), distance_km, dimensions);

        PriceQuote {
            variant,
            raw_cents,
            amount_cents: round_to_cents(raw_cents),
            breakdown,
        }
    }
}
