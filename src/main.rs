use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use route_tracker::{loader, Options, Registry};

#[derive(Debug, thiserror::Error)]
#[error("{0}: {1}")]
struct RegistryLoadError(PathBuf, #[source] loader::LoadError);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Auto,
    Xml,
    XmlGz,
    XmlBz2,
}

impl From<Format> for loader::FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Auto => Self::Unknown,
            Format::Xml => Self::Xml,
            Format::XmlGz => Self::XmlGz,
            Format::XmlBz2 => Self::XmlBz2,
        }
    }
}

#[derive(Parser)]
struct Cli {
    /// Name of the start location (asked for on stdin if missing)
    start: Option<String>,

    /// Name of the destination (asked for on stdin if missing)
    end: Option<String>,

    /// Path to an XML file with locations, instead of the built-in Karachi landmarks
    #[arg(long)]
    locations: Option<PathBuf>,

    /// Format of the locations file
    #[arg(long, value_enum, default_value_t = Format::Auto)]
    format: Format,

    /// Locations are adjacent if travelling between them costs less than this
    #[arg(long, default_value_t = route_tracker::DEFAULT_MAX_DISTANCE)]
    max_distance: f64,

    /// Locations with more traffic can't be travelled into
    #[arg(long, default_value_t = route_tracker::DEFAULT_BLOCK_THRESHOLD)]
    block_threshold: f64,

    /// Start at the location closest to this position, instead of a named one
    #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    start_at: Option<Vec<f64>>,

    /// End at the location closest to this position, instead of a named one
    #[arg(long, num_args = 2, value_names = ["LAT", "LON"], allow_negative_numbers = true)]
    end_at: Option<Vec<f64>>,

    /// Use a k-d tree to look for neighbors and nearest locations
    #[arg(long)]
    indexed: bool,

    /// Print all known locations and exit
    #[arg(long)]
    list: bool,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    colog::default_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    let registry = match cli.locations {
        Some(ref path) => load_registry(path, cli.format.into())?,
        None => route_tracker::dataset::karachi(),
    };

    if cli.list {
        for loc in registry.iter() {
            println!("{} ({}, {}), traffic {}", loc.name, loc.lat, loc.lon, loc.traffic);
        }
        return Ok(());
    }

    let tree = if cli.indexed {
        Some(route_tracker::KDTree::build(&registry).ok_or("no locations to route over")?)
    } else {
        None
    };

    // With a position given, the positional arguments shift: the only name is the destination
    let (start_name, end_name) = match (&cli.start_at, cli.start, cli.end) {
        (Some(_), end, None) => (None, end),
        (_, start, end) => (start, end),
    };

    let start = match (&cli.start_at, start_name) {
        (Some(pos), _) => nearest(&registry, tree.as_ref(), pos)?,
        (None, Some(name)) => name,
        (None, None) => prompt("Enter the name of your current location: ")?,
    };
    let end = match (&cli.end_at, end_name) {
        (Some(pos), _) => nearest(&registry, tree.as_ref(), pos)?,
        (None, Some(name)) => name,
        (None, None) => prompt("Enter the name of your desired destination: ")?,
    };

    let options = Options {
        max_distance: cli.max_distance,
        block_threshold: cli.block_threshold,
    };

    let route = match tree {
        Some(ref tree) => {
            route_tracker::find_route_indexed(&registry, tree, &start, &end, &options)?
        }
        None => route_tracker::find_route(&registry, &start, &end, &options)?,
    };

    println!("Shortest path from {} to {}:", start, end);
    println!();
    println!("{}", route);

    Ok(())
}

fn nearest(
    registry: &Registry,
    tree: Option<&route_tracker::KDTree<'_>>,
    pos: &[f64],
) -> Result<String, Box<dyn Error>> {
    let &[lat, lon] = pos else {
        return Err("a position needs exactly two coordinates".into());
    };
    let loc = match tree {
        Some(tree) => tree.find_nearest_location(lat, lon),
        None => registry
            .find_nearest_location(lat, lon)
            .ok_or("no locations to route over")?,
    };
    log::info!("using {:?} as the location closest to ({}, {})", loc.name, lat, lon);
    Ok(loc.name.clone())
}

fn prompt(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn load_registry(path: &Path, format: loader::FileFormat) -> Result<Registry, RegistryLoadError> {
    let mut registry = Registry::new();
    match loader::add_locations_from_file(&mut registry, format, path) {
        Ok(count) => {
            log::info!("loaded {} locations from {}", count, path.display());
            Ok(registry)
        }
        Err(e) => Err(RegistryLoadError(PathBuf::from(path), e)),
    }
}
