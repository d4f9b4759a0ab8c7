//! `cost`: score a single edge traversal and show each multiplier.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use veloroute_lib::{BikeLane, OptimizerConfig, Preferences, RoadClass};

use super::PreferenceArgs;
use crate::output::{write_cost, CostReport, OutputFormat};
use crate::terminal::ColorPalette;

#[derive(Args, Debug, Clone)]
pub struct CostArgs {
    /// Edge length in meters.
    #[arg(long = "length", value_name = "METERS")]
    pub length_m: f64,
    /// Road class tag, e.g. residential, primary, cycleway.
    #[arg(long, default_value = "residential")]
    pub road: RoadClass,
    /// Whether the edge carries a bike lane.
    #[arg(long, default_value = "no", value_parser = parse_bike_lane)]
    pub bike_lane: BikeLane,
    /// Signed grade in percent.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub incline: f64,
    #[command(flatten)]
    pub preferences: PreferenceArgs,
}

fn parse_bike_lane(raw: &str) -> std::result::Result<BikeLane, String> {
    match BikeLane::from_tag(raw) {
        BikeLane::Unknown => Err(format!("expected yes or no, got '{raw}'")),
        lane => Ok(lane),
    }
}

pub fn build_cost_report(config: &OptimizerConfig, args: &CostArgs) -> Result<CostReport> {
    anyhow::ensure!(
        args.length_m >= 0.0 && args.length_m.is_finite(),
        "--length must be a non-negative number of meters, got {}",
        args.length_m
    );
    let preferences = Preferences::from_percentages(args.preferences.to_array())?;
    let model = config.cost_model();

    Ok(CostReport {
        distance_m: args.length_m,
        road_class: args.road,
        bike_lane: args.bike_lane,
        incline_pct: args.incline,
        preferences,
        distance_multiplier: model.distance_multiplier(preferences.distance),
        bike_multiplier: model.bike_multiplier(args.bike_lane.is_present(), preferences.bicycle),
        road_multiplier: model.road_multiplier(
            args.road,
            preferences.motorway,
            preferences.highway,
            preferences.residential,
        ),
        incline_multiplier: model.incline_multiplier(args.incline),
        cost: model.cost(
            args.length_m,
            args.road,
            args.bike_lane,
            args.incline,
            &preferences,
        ),
    })
}

pub fn handle_cost_command<W: Write>(
    config: &OptimizerConfig,
    args: &CostArgs,
    format: OutputFormat,
    palette: ColorPalette,
    out: &mut W,
) -> Result<()> {
    let report = build_cost_report(config, args)?;
    write_cost(out, &report, format, palette).context("failed to write edge cost")
}
