use crate::domain::model::{Address, Coordinate, Dimensions, ShipmentRequest};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "parcel-rates")]
#[command(about = "Shipping quotes between two addresses")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Price a shipment between two known coordinates
    Quote(QuoteArgs),
    /// Resolve two addresses through the configured gazetteer, then price
    GeocodeQuote(GeocodeQuoteArgs),
    /// Price every row of a CSV file
    Batch(BatchArgs),
    /// Print the active rate table
    Rates,
    /// Show a shipment's tracking timeline and ETA from a JSON event list
    Track(TrackArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ParcelArgs {
    #[arg(long, help = "Depth in cm")]
    pub depth: f64,

    #[arg(long, help = "Width in cm")]
    pub width: f64,

    #[arg(long, help = "Height in cm")]
    pub height: f64,

    #[arg(long, help = "Weight in grams")]
    pub weight: f64,
}

impl ParcelArgs {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.depth, self.width, self.height, self.weight)
    }
}

#[derive(Debug, Clone, Args)]
pub struct QuoteArgs {
    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true, help = "Origin as LAT,LNG")]
    pub origin: Coordinate,

    #[arg(long)]
    pub origin_country: String,

    #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true, help = "Destination as LAT,LNG")]
    pub dest: Coordinate,

    #[arg(long)]
    pub dest_country: String,

    #[command(flatten)]
    pub parcel: ParcelArgs,

    #[arg(long, help = "Print the quotation as JSON")]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct GeocodeQuoteArgs {
    #[arg(long)]
    pub origin_address1: String,
    #[arg(long)]
    pub origin_city: String,
    #[arg(long, default_value = "")]
    pub origin_postal: String,
    #[arg(long)]
    pub origin_country: String,

    #[arg(long)]
    pub dest_address1: String,
    #[arg(long)]
    pub dest_city: String,
    #[arg(long, default_value = "")]
    pub dest_postal: String,
    #[arg(long)]
    pub dest_country: String,

    #[command(flatten)]
    pub parcel: ParcelArgs,

    #[arg(long, help = "Print the quotation as JSON")]
    pub json: bool,
}

impl GeocodeQuoteArgs {
    pub fn shipment_request(&self) -> ShipmentRequest {
        ShipmentRequest {
            origin: Address {
                address1: self.origin_address1.clone(),
                city: self.origin_city.clone(),
                postal_code: self.origin_postal.clone(),
                country: self.origin_country.clone(),
            },
            destination: Address {
                address1: self.dest_address1.clone(),
                city: self.dest_city.clone(),
                postal_code: self.dest_postal.clone(),
                country: self.dest_country.clone(),
            },
            dimensions: self.parcel.dimensions(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct BatchArgs {
    #[arg(short, long)]
    pub input: PathBuf,

    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Debug, Clone, Args)]
pub struct TrackArgs {
    /// JSON array of `{"status": "PICKED_UP_AT_ORIGIN", "at": "<RFC 3339>"}`
    #[arg(short, long)]
    pub events: PathBuf,

    #[arg(long, default_value = "0", help = "Days from pickup to delivery quoted for the shipment")]
    pub eta_days: u32,
}

/// Parses `"LAT,LNG"`.
pub fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lng) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{}'", value))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude '{}': {}", lat.trim(), e))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude '{}': {}", lng.trim(), e))?;
    Ok(Coordinate::new(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(
            parse_coordinate("45.497,-73.579").unwrap(),
            Coordinate::new(45.497, -73.579)
        );
        assert_eq!(
            parse_coordinate(" 45.458 , -73.639 ").unwrap(),
            Coordinate::new(45.458, -73.639)
        );
        assert!(parse_coordinate("45.497").is_err());
        assert!(parse_coordinate("north,west").is_err());
    }

    #[test]
    fn test_quote_command_parses() {
        let cli = CliConfig::try_parse_from([
            "parcel-rates",
            "quote",
            "--origin",
            "45.497,-73.579",
            "--origin-country",
            "CA",
            "--dest",
            "45.458,-73.639",
            "--dest-country",
            "CA",
            "--depth",
            "30",
            "--width",
            "40",
            "--height",
            "50",
            "--weight",
            "1000",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Command::Quote(args) => {
                assert_eq!(args.origin, Coordinate::new(45.497, -73.579));
                assert_eq!(args.parcel.dimensions().volume_cm3(), 60_000.0);
                assert!(args.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = CliConfig::try_parse_from(["parcel-rates", "rates", "--config", "rates.toml", "-v"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("rates.toml")));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Rates));
    }

    #[test]
    fn test_track_command_parses() {
        let cli = CliConfig::try_parse_from([
            "parcel-rates",
            "track",
            "--events",
            "events.json",
            "--eta-days",
            "4",
        ])
        .unwrap();

        let Command::Track(args) = cli.command else {
            panic!("expected track");
        };
        assert_eq!(args.events, PathBuf::from("events.json"));
        assert_eq!(args.eta_days, 4);
    }

    #[test]
    fn test_geocode_quote_builds_request() {
        let cli = CliConfig::try_parse_from([
            "parcel-rates",
            "geocode-quote",
            "--origin-address1",
            "1455 De Maisonneuve Blvd W",
            "--origin-city",
            "Montreal",
            "--origin-country",
            "Canada",
            "--dest-address1",
            "2900 Boul Edouard-Montpetit",
            "--dest-city",
            "Montreal",
            "--dest-postal",
            "H3T 1J4",
            "--dest-country",
            "Canada",
            "--depth",
            "10",
            "--width",
            "10",
            "--height",
            "10",
            "--weight",
            "250",
        ])
        .unwrap();

        let Command::GeocodeQuote(args) = cli.command else {
            panic!("expected geocode-quote");
        };
        let request = args.shipment_request();
        assert_eq!(request.origin.postal_code, "");
        assert_eq!(request.destination.postal_code, "H3T 1J4");
        assert_eq!(request.dimensions.weight_g, 250.0);
    }
}
