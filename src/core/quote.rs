use crate::core::pricing::PricingEngine;
use crate::domain::model::{
    Address, AddressField, Coordinate, Dimensions, Quotation, ResolvedLocation, ShipmentRequest,
};
use crate::domain::ports::Geocoder;
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::Validate;
use chrono::Utc;

/// Turns shipment requests into priced quotations.
///
/// Addresses are resolved through the injected [`Geocoder`]; pricing is pure.
/// Storing the quotation is left to the caller.
pub struct QuoteService<G: Geocoder> {
    geocoder: G,
    pricing: PricingEngine,
}

impl<G: Geocoder> QuoteService<G> {
    pub fn new(geocoder: G, pricing: PricingEngine) -> Self {
        Self { geocoder, pricing }
    }

    pub async fn quote(&self, request: &ShipmentRequest) -> Result<Quotation> {
        request.validate()?;

        let origin = self.resolve(AddressField::Origin, &request.origin).await?;
        let destination = self
            .resolve(AddressField::Destination, &request.destination)
            .await?;

        let quote = self.pricing.price(
            origin.coordinate,
            destination.coordinate,
            &request.dimensions,
            &origin.country_code,
            &destination.country_code,
        );

        tracing::info!(
            "Quoted {} -> {}: {} ({})",
            request.origin.city,
            request.destination.city,
            quote.display_amount(),
            quote.variant
        );

        Ok(Quotation {
            origin,
            destination,
            dimensions: request.dimensions,
            quote,
            quoted_at: Utc::now(),
        })
    }

    async fn resolve(&self, field: AddressField, address: &Address) -> Result<ResolvedLocation> {
        tracing::debug!("Geocoding {} address: {}, {}", field, address.address1, address.city);

        let outcome = self.geocoder.geocode(address).await?;
        if !outcome.valid {
            let message = outcome
                .error
                .unwrap_or_else(|| format!("Invalid {} address", field));
            tracing::warn!("{} address rejected: {}", field, message);
            return Err(QuoteError::InvalidAddress { field, message });
        }

        // a blank code from the geocoder counts as unknown
        let country_code = outcome
            .country_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
            .map(normalize_country)
            .unwrap_or_else(|| normalize_country(&address.country));

        Ok(ResolvedLocation {
            address: Some(address.clone()),
            coordinate: outcome.coordinate,
            country_code,
            display_name: outcome.display_name,
        })
    }
}

/// Prices a shipment whose endpoints are already known coordinates.
pub fn quote_coordinates(
    pricing: &PricingEngine,
    origin: Coordinate,
    origin_country: &str,
    destination: Coordinate,
    destination_country: &str,
    dimensions: Dimensions,
) -> Result<Quotation> {
    origin.validate()?;
    destination.validate()?;
    dimensions.validate()?;

    let origin = ResolvedLocation {
        address: None,
        coordinate: origin,
        country_code: normalize_country(origin_country),
        display_name: None,
    };
    let destination = ResolvedLocation {
        address: None,
        coordinate: destination,
        country_code: normalize_country(destination_country),
        display_name: None,
    };

    let quote = pricing.price(
        origin.coordinate,
        destination.coordinate,
        &dimensions,
        &origin.country_code,
        &destination.country_code,
    );

    Ok(Quotation {
        origin,
        destination,
        dimensions,
        quote,
        quoted_at: Utc::now(),
    })
}

fn normalize_country(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GeocodeOutcome, PricingVariant};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockGeocoder {
        known: HashMap<String, GeocodeOutcome>,
        calls: AtomicUsize,
        fail: bool,
    }

    impl MockGeocoder {
        fn new() -> Self {
            let mut known = HashMap::new();
            let mut downtown = GeocodeOutcome::found(Coordinate::new(45.497, -73.579));
            downtown.country_code = Some("ca".to_string());
            known.insert("Montreal".to_string(), downtown);
            known.insert(
                "Lachine".to_string(),
                GeocodeOutcome::found(Coordinate::new(45.458, -73.639)),
            );
            let mut seattle = GeocodeOutcome::found(Coordinate::new(47.6062, -122.3321));
            seattle.country_code = Some("US".to_string());
            known.insert("Seattle".to_string(), seattle);
            Self {
                known,
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }
    }

    #[async_trait]
    impl Geocoder for MockGeocoder {
        async fn geocode(&self, address: &Address) -> Result<GeocodeOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(QuoteError::GeocodingError {
                    message: "connection refused".to_string(),
                });
            }
            Ok(self
                .known
                .get(&address.city)
                .cloned()
                .unwrap_or_else(|| GeocodeOutcome::not_found("Location not found")))
        }
    }

    fn address(city: &str, country: &str) -> Address {
        Address {
            address1: "1 Main St".to_string(),
            city: city.to_string(),
            postal_code: "H0H 0H0".to_string(),
            country: country.to_string(),
        }
    }

    fn request(from: &str, to: &str, to_country: &str) -> ShipmentRequest {
        ShipmentRequest {
            origin: address(from, "CA"),
            destination: address(to, to_country),
            dimensions: Dimensions::new(30.0, 40.0, 50.0, 1000.0),
        }
    }

    #[tokio::test]
    async fn test_quote_domestic() {
        let service = QuoteService::new(MockGeocoder::new(), PricingEngine::default());
        let quotation = service.quote(&request("Montreal", "Lachine", "ca")).await.unwrap();

        assert_eq!(quotation.origin.country_code, "CA");
        assert_eq!(quotation.destination.country_code, "CA");
        assert_eq!(quotation.quote.variant, PricingVariant::Standard);
        assert_eq!(quotation.quote.amount_cents, 101_600);
        assert_eq!(service.geocoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_geocoder_country_wins_over_request() {
        let service = QuoteService::new(MockGeocoder::new(), PricingEngine::default());
        // request claims CA, geocoder reports US
        let quotation = service.quote(&request("Montreal", "Seattle", "CA")).await.unwrap();

        assert_eq!(quotation.destination.country_code, "US");
        assert_eq!(quotation.quote.variant, PricingVariant::International);
    }

    #[tokio::test]
    async fn test_blank_geocoder_country_falls_back_to_request() {
        let mut geocoder = MockGeocoder::new();
        let mut blank = GeocodeOutcome::found(Coordinate::new(45.497, -73.579));
        blank.country_code = Some("  ".to_string());
        geocoder.known.insert("Montreal".to_string(), blank);
        let mut lachine = GeocodeOutcome::found(Coordinate::new(45.458, -73.639));
        lachine.country_code = Some("CA".to_string());
        geocoder.known.insert("Lachine".to_string(), lachine);
        let service = QuoteService::new(geocoder, PricingEngine::default());

        let quotation = service.quote(&request("Montreal", "Lachine", "CA")).await.unwrap();

        assert_eq!(quotation.origin.country_code, "CA");
        assert_eq!(quotation.quote.variant, PricingVariant::Standard);
    }

    #[tokio::test]
    async fn test_unknown_origin_is_rejected_before_destination() {
        let service = QuoteService::new(MockGeocoder::new(), PricingEngine::default());
        let err = service.quote(&request("Atlantis", "Lachine", "CA")).await.unwrap_err();

        match err {
            QuoteError::InvalidAddress { field, message } => {
                assert_eq!(field, AddressField::Origin);
                assert_eq!(message, "Location not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(service.geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_destination_is_rejected() {
        let service = QuoteService::new(MockGeocoder::new(), PricingEngine::default());
        let err = service.quote(&request("Montreal", "Atlantis", "CA")).await.unwrap_err();

        assert!(matches!(
            err,
            QuoteError::InvalidAddress {
                field: AddressField::Destination,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_dimensions_skip_geocoding() {
        let service = QuoteService::new(MockGeocoder::new(), PricingEngine::default());
        let mut req = request("Montreal", "Lachine", "CA");
        req.dimensions.weight_g = 0.0;

        assert!(service.quote(&req).await.is_err());
        assert_eq!(service.geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_geocoder_failure_propagates() {
        let mut geocoder = MockGeocoder::new();
        geocoder.fail = true;
        let service = QuoteService::new(geocoder, PricingEngine::default());

        let err = service.quote(&request("Montreal", "Lachine", "CA")).await.unwrap_err();
        assert!(matches!(err, QuoteError::GeocodingError { .. }));
    }

    #[test]
    fn test_quote_coordinates() {
        let quotation = quote_coordinates(
            &PricingEngine::default(),
            Coordinate::new(45.497, -73.579),
            "ca",
            Coordinate::new(45.458, -73.639),
            "CA ",
            Dimensions::new(30.0, 40.0, 50.0, 1000.0),
        )
        .unwrap();

        assert_eq!(quotation.quote.variant, PricingVariant::Standard);
        assert_eq!(quotation.destination.country_code, "CA");
        assert!(quotation.origin.address.is_none());
    }

    #[test]
    fn test_quote_coordinates_rejects_out_of_range() {
        let result = quote_coordinates(
            &PricingEngine::default(),
            Coordinate::new(120.0, 0.0),
            "CA",
            Coordinate::new(45.458, -73.639),
            "CA",
            Dimensions::new(30.0, 40.0, 50.0, 1000.0),
        );
        assert!(result.is_err());
    }
}
