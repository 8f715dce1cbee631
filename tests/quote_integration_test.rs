use anyhow::Result;
use parcel_rates::domain::model::AddressField;
use parcel_rates::{
    Address, Dimensions, PricingEngine, PricingVariant, QuoteError, QuoteService,
    RateLimitedGeocoder, RateLimiter, ShipmentRequest, StaticGeocoder, TomlConfig,
};
use std::time::{Duration, Instant};

const CONFIG: &str = r#"
[pricing.international]
surcharge_cents = 600

[geocoding]
rate_limit_ms = 60
limiter_key = "test-gazetteer"

[[locations]]
address1 = "1455 De Maisonneuve Blvd W"
city = "Montreal"
postal_code = "H3G 1M8"
country = "Canada"
lat = 45.497
lng = -73.579
country_code = "CA"
display_name = "Concordia University"

[[locations]]
address1 = "1 Dollard St"
city = "Lachine"
postal_code = "H8S 1M5"
country = "Canada"
lat = 45.458
lng = -73.639
country_code = "CA"

[[locations]]
address1 = "400 Broad St"
city = "Seattle"
postal_code = "98109"
country = "USA"
lat = 47.6205
lng = -122.3493
country_code = "US"
"#;

fn address(address1: &str, city: &str, postal: &str, country: &str) -> Address {
    Address {
        address1: address1.to_string(),
        city: city.to_string(),
        postal_code: postal.to_string(),
        country: country.to_string(),
    }
}

fn concordia() -> Address {
    address("1455 De Maisonneuve Blvd W", "Montreal", "H3G 1M8", "Canada")
}

fn lachine() -> Address {
    address("1 Dollard St", "Lachine", "H8S 1M5", "Canada")
}

fn space_needle() -> Address {
    address("400 Broad St", "Seattle", "98109", "USA")
}

fn service(config: &TomlConfig) -> QuoteService<RateLimitedGeocoder<StaticGeocoder>> {
    let geocoder = RateLimitedGeocoder::new(
        StaticGeocoder::from_entries(&config.locations),
        RateLimiter::new(config.geocoder_min_interval()),
        config.limiter_key(),
    );
    QuoteService::new(geocoder, PricingEngine::new(config.rate_table()))
}

#[tokio::test]
async fn test_domestic_quote_end_to_end() -> Result<()> {
    let config = TomlConfig::from_toml_str(CONFIG)?;
    let service = service(&config);

    let request = ShipmentRequest {
        origin: concordia(),
        destination: lachine(),
        dimensions: Dimensions::new(30.0, 40.0, 50.0, 1000.0),
    };

    let quotation = service.quote(&request).await?;

    assert_eq!(quotation.quote.variant, PricingVariant::Standard);
    assert_eq!(quotation.quote.amount_cents, 101_600);
    assert_eq!(
        quotation.origin.display_name.as_deref(),
        Some("Concordia University")
    );
    assert_eq!(quotation.destination.address.as_ref(), Some(&lachine()));
    Ok(())
}

#[tokio::test]
async fn test_international_quote_uses_configured_surcharge() -> Result<()> {
    let config = TomlConfig::from_toml_str(CONFIG)?;
    let service = service(&config);

    let request = ShipmentRequest {
        origin: concordia(),
        destination: space_needle(),
        dimensions: Dimensions::new(20.0, 20.0, 20.0, 2000.0),
    };

    let quotation = service.quote(&request).await?;
    let quote = quotation.quote;

    assert_eq!(quote.variant, PricingVariant::International);
    assert_eq!(quote.breakdown.surcharge_cents, 600.0);
    assert!(quote.breakdown.distance_km > 3000.0 && quote.breakdown.distance_km < 4000.0);

    let expected = 1500.0 + 2000.0 * 150.0 + 8000.0 * 0.015 + quote.breakdown.distance_km * 0.06 + 600.0;
    assert!((quote.raw_cents - expected).abs() < 1e-6);
    Ok(())
}

#[tokio::test]
async fn test_heavy_domestic_parcel_is_oversized() -> Result<()> {
    let config = TomlConfig::from_toml_str(CONFIG)?;
    let service = service(&config);

    let request = ShipmentRequest {
        origin: concordia(),
        destination: lachine(),
        dimensions: Dimensions::new(10.0, 10.0, 10.0, 31_000.0),
    };

    let quotation = service.quote(&request).await?;
    assert_eq!(quotation.quote.variant, PricingVariant::Oversized);
    Ok(())
}

#[tokio::test]
async fn test_unknown_destination_reports_field() -> Result<()> {
    let config = TomlConfig::from_toml_str(CONFIG)?;
    let service = service(&config);

    let request = ShipmentRequest {
        origin: concordia(),
        destination: address("742 Evergreen Terrace", "Springfield", "", "USA"),
        dimensions: Dimensions::new(10.0, 10.0, 10.0, 500.0),
    };

    match service.quote(&request).await {
        Err(QuoteError::InvalidAddress { field, message }) => {
            assert_eq!(field, AddressField::Destination);
            assert!(message.starts_with("Location not found"));
        }
        other => panic!("expected invalid destination, got {:?}", other),
    }
    Ok(())
}

#[tokio::test]
async fn test_consecutive_quotes_are_rate_limited() -> Result<()> {
    let config = TomlConfig::from_toml_str(CONFIG)?;
    let service = service(&config);

    let request = ShipmentRequest {
        origin: concordia(),
        destination: lachine(),
        dimensions: Dimensions::new(30.0, 40.0, 50.0, 1000.0),
    };

    let start = Instant::now();
    let first = service.quote(&request).await?;
    let second = service.quote(&request).await?;

    // four lookups, three of them spaced by the 60ms limit
    assert!(start.elapsed() >= Duration::from_millis(170));
    assert_eq!(first.quote, second.quote);
    Ok(())
}
