use crate::domain::model::{Address, Coordinate, Dimensions, RateCard, ShipmentRequest};
use crate::utils::error::{QuoteError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(QuoteError::InvalidValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    // written so NaN fails too
    if !(value >= min && value <= max) {
        return Err(QuoteError::InvalidValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(QuoteError::InvalidValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(QuoteError::InvalidValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be zero or greater".to_string(),
        });
    }
    Ok(())
}

pub fn validate_rate_card(prefix: &str, card: &RateCard) -> Result<()> {
    validate_non_negative(&format!("{}.base_rate_cents", prefix), card.base_rate_cents)?;
    validate_non_negative(&format!("{}.weight_multiplier", prefix), card.weight_multiplier)?;
    validate_non_negative(&format!("{}.volume_multiplier", prefix), card.volume_multiplier)?;
    validate_non_negative(&format!("{}.per_km_rate", prefix), card.per_km_rate)?;
    validate_non_negative(&format!("{}.surcharge_cents", prefix), card.surcharge_cents)?;
    Ok(())
}

impl Validate for Dimensions {
    fn validate(&self) -> Result<()> {
        validate_positive("depth", self.depth_cm)?;
        validate_positive("width", self.width_cm)?;
        validate_positive("height", self.height_cm)?;
        validate_positive("weight", self.weight_g)?;
        Ok(())
    }
}

impl Validate for Coordinate {
    fn validate(&self) -> Result<()> {
        validate_range("lat", self.lat, -90.0, 90.0)?;
        validate_range("lng", self.lng, -180.0, 180.0)?;
        Ok(())
    }
}

impl Validate for Address {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("address1", &self.address1)?;
        validate_non_empty_string("city", &self.city)?;
        validate_non_empty_string("country", &self.country)?;
        Ok(())
    }
}

impl Validate for ShipmentRequest {
    fn validate(&self) -> Result<()> {
        self.origin.validate().map_err(|e| prefix_field("origin", e))?;
        self.destination
            .validate()
            .map_err(|e| prefix_field("destination", e))?;
        self.dimensions.validate()
    }
}

fn prefix_field(prefix: &str, err: QuoteError) -> QuoteError {
    match err {
        QuoteError::InvalidValueError {
            field,
            value,
            reason,
        } => QuoteError::InvalidValueError {
            field: format!("{}.{}", prefix, field),
            value,
            reason,
        },
        other => other,
    }
}
