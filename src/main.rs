//! Command-line tool for georeferencing floor-plan images.

use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use venue_georef::api::{
    corner_markers, project_feature, project_feature_collection, unproject_feature, unproject_feature_collection,
};
use venue_georef::{
    bounding_box_footprint, geographic_envelope, AppConfig, CalibrationRecord, GeoPoint, Georeference,
    MercatorProjector, PixelPoint,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "venue-georef")]
#[command(about = "Convert coordinates between floor-plan pixels and the map")]
#[command(version)]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Map tile size in pixels; overrides the configuration file.
    #[arg(long, global = true)]
    tile_size: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a calibration record anchoring the image's corners to SW/NE positions.
    Calibrate {
        /// Image width in pixels.
        #[arg(long)]
        width: f64,

        /// Image height in pixels.
        #[arg(long)]
        height: f64,

        /// Position of pixel (0, 0), as LON,LAT.
        #[arg(long, value_parser = parse_lng_lat, allow_hyphen_values = true)]
        sw: GeoPoint,

        /// Position of pixel (width, height), as LON,LAT.
        #[arg(long, value_parser = parse_lng_lat, allow_hyphen_values = true)]
        ne: GeoPoint,

        /// Write the record here instead of stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Map a pixel to its geographic position.
    Project {
        #[command(flatten)]
        calibration: CalibrationArgs,

        #[arg(allow_hyphen_values = true)]
        x: f64,
        #[arg(allow_hyphen_values = true)]
        y: f64,
    },

    /// Map a geographic position to its pixel.
    Unproject {
        #[command(flatten)]
        calibration: CalibrationArgs,

        #[arg(allow_hyphen_values = true)]
        lon: f64,
        #[arg(allow_hyphen_values = true)]
        lat: f64,
    },

    /// Print the geographic corners of the image bounding box.
    Footprint {
        #[command(flatten)]
        calibration: CalibrationArgs,

        /// Emit numbered GeoJSON marker features instead of plain corners.
        #[arg(long)]
        markers: bool,
    },

    /// Print the NW/NE/SE/SW envelope of the given LON,LAT positions.
    Envelope {
        #[arg(required = true, value_parser = parse_lng_lat, allow_hyphen_values = true)]
        points: Vec<GeoPoint>,
    },

    /// Convert a GeoJSON feature or feature collection.
    Feature {
        #[command(flatten)]
        calibration: CalibrationArgs,

        /// GeoJSON input file.
        #[arg(long)]
        input: PathBuf,

        /// Convert geographic coordinates back to pixels.
        #[arg(long)]
        inverse: bool,
    },
}

#[derive(Debug, Clone, Args)]
struct CalibrationArgs {
    /// Calibration record (JSON).
    #[arg(long)]
    calibration: PathBuf,
}

fn parse_lng_lat(s: &str) -> Result<GeoPoint, String> {
    let (lon, lat) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LON,LAT, got '{}'", s))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("invalid longitude '{}': {}", lon, e))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("invalid latitude '{}': {}", lat, e))?;
    Ok(GeoPoint::new(lon, lat))
}

fn load_config(cli: &Cli) -> CliResult<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(tile_size) = cli.tile_size {
        config.projection.tile_size = tile_size;
    }
    config.validate()?;
    Ok(config)
}

fn load_georeference(args: &CalibrationArgs, projector: MercatorProjector) -> CliResult<Georeference> {
    let record = CalibrationRecord::load(&args.calibration)?;
    let georef = record.to_georeference(projector)?;
    info!("loaded calibration from {}", args.calibration.display());
    Ok(georef)
}

fn print_json(value: &serde_json::Value) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let projector = config.projector()?;

    match cli.command {
        Commands::Calibrate { width, height, sw, ne, out } => {
            run_calibrate(width, height, sw, ne, out, projector)
        }
        Commands::Project { calibration, x, y } => run_project(&calibration, x, y, projector),
        Commands::Unproject { calibration, lon, lat } => run_unproject(&calibration, lon, lat, projector),
        Commands::Footprint { calibration, markers } => run_footprint(&calibration, markers, projector),
        Commands::Envelope { points } => run_envelope(&points),
        Commands::Feature { calibration, input, inverse } => {
            run_feature(&calibration, &input, inverse, projector)
        }
    }
}

// ── calibrate ──────────────────────────────────────────────────────────

fn run_calibrate(
    width: f64,
    height: f64,
    sw: GeoPoint,
    ne: GeoPoint,
    out: Option<PathBuf>,
    projector: MercatorProjector,
) -> CliResult<()> {
    let georef = Georeference::from_image_corners(width, height, sw, ne, projector)?;
    let record = CalibrationRecord::from(&georef);

    match out {
        Some(path) => {
            record.save(&path)?;
            info!("calibration written to {}", path.display());
        }
        None => println!("{}", record.to_json()?),
    }
    Ok(())
}

// ── project / unproject ────────────────────────────────────────────────

fn run_project(args: &CalibrationArgs, x: f64, y: f64, projector: MercatorProjector) -> CliResult<()> {
    let georef = load_georeference(args, projector)?;
    let geo = georef.project_point(PixelPoint::new(x, y))?;
    print_json(&json!({ "lon": geo.lon, "lat": geo.lat }))
}

fn run_unproject(args: &CalibrationArgs, lon: f64, lat: f64, projector: MercatorProjector) -> CliResult<()> {
    let georef = load_georeference(args, projector)?;
    let pixel = georef.unproject_point(GeoPoint::new(lon, lat))?;
    print_json(&json!({ "x": pixel.x, "y": pixel.y }))
}

// ── footprint / envelope ───────────────────────────────────────────────

fn run_footprint(args: &CalibrationArgs, markers: bool, projector: MercatorProjector) -> CliResult<()> {
    let georef = load_georeference(args, projector)?;
    let corners = bounding_box_footprint(&georef)?;

    if markers {
        print_json(&corner_markers(&corners))
    } else {
        let coords: Vec<[f64; 2]> = corners.iter().map(|c| c.to_lng_lat()).collect();
        print_json(&json!(coords))
    }
}

fn run_envelope(points: &[GeoPoint]) -> CliResult<()> {
    let corners = geographic_envelope(points)?;
    print_json(&corner_markers(&corners))
}

// ── feature ────────────────────────────────────────────────────────────

fn run_feature(
    args: &CalibrationArgs,
    input: &Path,
    inverse: bool,
    projector: MercatorProjector,
) -> CliResult<()> {
    let georef = load_georeference(args, projector)?;
    let content = fs::read_to_string(input)?;
    let value: serde_json::Value = serde_json::from_str(&content)?;

    let is_collection = value.get("type").and_then(|t| t.as_str()) == Some("FeatureCollection");
    let converted = match (is_collection, inverse) {
        (true, false) => project_feature_collection(&value, &georef)?,
        (true, true) => unproject_feature_collection(&value, &georef)?,
        (false, false) => project_feature(&value, &georef)?,
        (false, true) => unproject_feature(&value, &georef)?,
    };

    print_json(&converted)
}
