use clap::Parser;
use parcel_rates::config::cli::{BatchArgs, GeocodeQuoteArgs, QuoteArgs, TrackArgs};
use parcel_rates::core::quote::quote_coordinates;
use parcel_rates::domain::money::format_amount_cad;
use parcel_rates::domain::tracking::{self, TrackingEvent};
use parcel_rates::utils::error::ErrorSeverity;
use parcel_rates::utils::{logger, validation::Validate};
use parcel_rates::{
    app, CliConfig, Command, PricingEngine, QuoteService, Quotation, RateLimitedGeocoder,
    RateLimiter, StaticGeocoder, TomlConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let config = match &cli.config {
        Some(path) => match TomlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("❌ Failed to load config file '{}': {}", path.display(), e);
                eprintln!("💡 Make sure the file exists and is valid TOML format");
                std::process::exit(1);
            }
        },
        None => TomlConfig::default(),
    };

    if config.json_logging() {
        logger::init_json_logger(config.log_level(), cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting parcel-rates");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let pricing = PricingEngine::new(config.rate_table());

    let result = match cli.command {
        Command::Quote(args) => run_quote(&pricing, args),
        Command::GeocodeQuote(args) => run_geocode_quote(&config, pricing, args).await,
        Command::Batch(args) => run_batch(&pricing, args),
        Command::Rates => print_rates(&pricing),
        Command::Track(args) => run_track(args),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Quote failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

fn run_quote(pricing: &PricingEngine, args: QuoteArgs) -> parcel_rates::Result<()> {
    let quotation = quote_coordinates(
        pricing,
        args.origin,
        &args.origin_country,
        args.dest,
        &args.dest_country,
        args.parcel.dimensions(),
    )?;
    print_quotation(&quotation, args.json)
}

async fn run_geocode_quote(
    config: &TomlConfig,
    pricing: PricingEngine,
    args: GeocodeQuoteArgs,
) -> parcel_rates::Result<()> {
    if config.locations.is_empty() {
        tracing::warn!("No [[locations]] configured; every address will be rejected");
    }

    let limiter = RateLimiter::new(config.geocoder_min_interval());
    tracing::debug!(
        "Geocoder limited to one lookup per {:?} on '{}'",
        limiter.min_interval(),
        config.limiter_key()
    );
    let geocoder = RateLimitedGeocoder::new(
        StaticGeocoder::from_entries(&config.locations),
        limiter,
        config.limiter_key(),
    );
    let service = QuoteService::new(geocoder, pricing);

    let quotation = service.quote(&args.shipment_request()).await?;
    print_quotation(&quotation, args.json)
}

fn run_batch(pricing: &PricingEngine, args: BatchArgs) -> parcel_rates::Result<()> {
    let summary = app::quote_csv_file(pricing, &args.input, &args.output)?;

    println!("✅ Priced {} shipments", summary.rows);
    for (variant, count) in &summary.by_variant {
        println!("   {:<14} {}", variant.as_str(), count);
    }
    println!("📁 Output saved to: {}", args.output.display());
    Ok(())
}

fn run_track(args: TrackArgs) -> parcel_rates::Result<()> {
    let content = std::fs::read_to_string(&args.events)?;
    let events: Vec<TrackingEvent> = serde_json::from_str(&content)?;

    for event in tracking::timeline(&events) {
        println!("{}  {}", event.at.format("%Y-%m-%d %H:%M"), event.status.label());
    }

    match tracking::delivered_at(&events) {
        Some(at) => println!("Delivered:    {}", at.format("%Y-%m-%d %H:%M")),
        None => match tracking::eta(&events, args.eta_days) {
            Some(eta) => println!("ETA:          {}", eta.format("%Y-%m-%d")),
            None => println!("ETA:          not picked up yet"),
        },
    }
    Ok(())
}

fn print_quotation(quotation: &Quotation, json: bool) -> parcel_rates::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(quotation)?);
        return Ok(());
    }

    let quote = &quotation.quote;
    let b = &quote.breakdown;
    println!(
        "{} -> {} ({:.2} km)",
        quotation.origin.country_code, quotation.destination.country_code, b.distance_km
    );
    println!("Variant:      {}", quote.variant);
    println!("Base:         {:.2}", b.base_cents);
    println!("Weight fee:   {:.2}", b.weight_fee_cents);
    println!("Volume fee:   {:.2}", b.volume_fee_cents);
    println!("Distance fee: {:.2}", b.distance_fee_cents);
    println!("Surcharge:    {:.2}", b.surcharge_cents);
    println!(
        "Total:        {} cents ({})",
        quote.amount_cents,
        format_amount_cad(quote.amount_cents)
    );
    Ok(())
}

fn print_rates(pricing: &PricingEngine) -> parcel_rates::Result<()> {
    let rates = pricing.rates();
    println!(
        "{:<14} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "variant", "base", "per_g", "per_cm3", "per_km", "surcharge"
    );
    for variant in [
        parcel_rates::PricingVariant::Standard,
        parcel_rates::PricingVariant::Oversized,
        parcel_rates::PricingVariant::International,
    ] {
        let card = rates.card(variant);
        println!(
            "{:<14} {:>10} {:>10} {:>10} {:>10} {:>10}",
            variant.as_str(),
            card.base_rate_cents,
            card.weight_multiplier,
            card.volume_multiplier,
            card.per_km_rate,
            card.surcharge_cents
        );
    }
    println!(
        "oversized above {} cm3 or {} g",
        rates.thresholds.volume_cm3, rates.thresholds.weight_g
    );
    Ok(())
}
