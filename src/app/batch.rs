//! CSV in, CSV out bulk pricing.
//!
//! Input header:
//! `id,origin_lat,origin_lng,origin_country,dest_lat,dest_lng,dest_country,depth_cm,width_cm,height_cm,weight_g`
//!
//! Output header: `id,variant,distance_km,amount_cents,amount_display`

use crate::core::pricing::PricingEngine;
use crate::domain::model::{Coordinate, Dimensions, PricingVariant};
use crate::utils::error::{QuoteError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ShipmentRow {
    id: String,
    origin_lat: f64,
    origin_lng: f64,
    origin_country: String,
    dest_lat: f64,
    dest_lng: f64,
    dest_country: String,
    depth_cm: f64,
    width_cm: f64,
    height_cm: f64,
    weight_g: f64,
}

#[derive(Debug, Serialize)]
struct QuoteRow<'a> {
    id: &'a str,
    variant: PricingVariant,
    distance_km: String,
    amount_cents: i64,
    amount_display: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub total_cents: i64,
    pub by_variant: BTreeMap<PricingVariant, usize>,
}

/// Prices each row of `input` and writes one output row per input row.
/// The first malformed or invalid row aborts the batch.
pub fn quote_csv<R: Read, W: Write>(
    engine: &PricingEngine,
    input: R,
    output: W,
) -> Result<BatchSummary> {
    let mut reader = csv::Reader::from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    for (index, row) in reader.deserialize::<ShipmentRow>().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = row.map_err(|e| QuoteError::BatchRowError {
            line,
            message: e.to_string(),
        })?;

        let origin = Coordinate::new(row.origin_lat, row.origin_lng);
        let destination = Coordinate::new(row.dest_lat, row.dest_lng);
        let dimensions = Dimensions::new(row.depth_cm, row.width_cm, row.height_cm, row.weight_g);

        validate_row(&origin, &destination, &dimensions).map_err(|e| QuoteError::BatchRowError {
            line,
            message: e.to_string(),
        })?;

        let origin_country = row.origin_country.trim().to_ascii_uppercase();
        let dest_country = row.dest_country.trim().to_ascii_uppercase();
        let quote = engine.price(origin, destination, &dimensions, &origin_country, &dest_country);

        writer.serialize(QuoteRow {
            id: &row.id,
            variant: quote.variant,
            distance_km: format!("{:.3}", quote.breakdown.distance_km),
            amount_cents: quote.amount_cents,
            amount_display: quote.display_amount(),
        })?;

        summary.rows += 1;
        summary.total_cents = summary.total_cents.saturating_add(quote.amount_cents);
        *summary.by_variant.entry(quote.variant).or_insert(0) += 1;
    }

    writer.flush()?;
    tracing::info!(
        "Priced {} shipments, total {}",
        summary.rows,
        crate::domain::money::format_cents(summary.total_cents)
    );
    Ok(summary)
}

pub fn quote_csv_file(engine: &PricingEngine, input: &Path, output: &Path) -> Result<BatchSummary> {
    tracing::debug!("Batch input: {}, output: {}", input.display(), output.display());
    let input = File::open(input)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let output = File::create(output)?;

    quote_csv(engine, input, output)
}

fn validate_row(origin: &Coordinate, destination: &Coordinate, dimensions: &Dimensions) -> Result<()> {
    origin.validate()?;
    destination.validate()?;
    dimensions.validate()
}
