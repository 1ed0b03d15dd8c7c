extern crate log;
pub mod geofile;
pub mod geometry;
pub mod matching;
pub mod view;
use crate::geofile::geojson::{
    read_boundary_sources, write_markers_to_geojson, BoundaryKeys, BoundarySource,
};
use crate::geofile::records::{read_location_records, write_record_status, RecordKeys};
use crate::geometry::primitives::LatLonBounds;
use crate::matching::filter::RecordFilter;
use crate::matching::tiered_matcher::MatchParams;
use crate::view::map_view::{build_map_view, MapView};
use crate::view::scope::ViewScope;
use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

/// Place uploaded field records on administrative boundaries.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,
}

#[derive(Deserialize, Debug)]
struct Config {
    records_filepath: PathBuf,
    #[serde(default)]
    boundaries: Vec<BoundarySource>,
    output_dir: PathBuf,
    #[serde(default)]
    matching: MatchParams,
    #[serde(default)]
    record_keys: RecordKeys,
    #[serde(default)]
    boundary_keys: BoundaryKeys,
    #[serde(default)]
    scope: ViewScope,
    #[serde(default)]
    filter: RecordFilter,
    #[serde(default)]
    national_bounds: LatLonBounds,
}

/// Read the inputs named by `config`, build the map view and write its outputs.
fn run(config: &Config) -> anyhow::Result<MapView> {
    let records = read_location_records(&config.records_filepath, &config.record_keys)?;
    log::info!("Read {} location records", records.len());

    let features = read_boundary_sources(&config.boundaries, &config.boundary_keys);
    if features.is_empty() {
        log::warn!("No boundary features available, only records with coordinates can be placed");
    }

    let map_view = build_map_view(
        &records,
        &features,
        &config.scope,
        &config.filter,
        &config.matching,
        config.national_bounds,
    );

    std::fs::create_dir_all(&config.output_dir)?;
    let markers_filepath = config.output_dir.join("markers.geojson");
    log::info!(
        "Writing {} markers to {:?}",
        map_view.markers.len(),
        &markers_filepath
    );
    write_markers_to_geojson(&map_view.markers, &markers_filepath)?;

    let status_filepath = config.output_dir.join("record_status.json");
    log::info!(
        "Writing {} record annotations to {:?}",
        map_view.annotations.len(),
        &status_filepath
    );
    write_record_status(&map_view.annotations, &status_filepath)?;
    log::info!("{:?}", map_view.summary);
    log::info!("Viewport {:?}", map_view.bounds);
    Ok(map_view)
}

fn try_main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();

    let args = Args::try_parse()?;
    if !Path::new(&args.config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", &args.config_filepath));
    }
    let config_contents = read_to_string(args.config_filepath)?;
    let config: Config = serde_yaml::from_str(&config_contents)?;

    run(&config)?;
    Ok(())
}

fn main() {
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
