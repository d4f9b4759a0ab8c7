//! `snap`: report the road node a free point would snap to.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;

use veloroute_lib::{Coordinate, OptimizerConfig, SpatialStore, SubgraphRetriever};

use crate::output::{write_snap, OutputFormat, SnapReport};
use crate::terminal::ColorPalette;

#[derive(Args, Debug, Clone)]
pub struct SnapArgs {
    /// Query point.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub at: Coordinate,
    /// Search radius in meters; defaults to the configured snap radius.
    #[arg(long, value_name = "METERS")]
    pub radius: Option<f64>,
}

pub fn handle_snap_command<S: SpatialStore, W: Write>(
    store: S,
    config: &OptimizerConfig,
    args: &SnapArgs,
    format: OutputFormat,
    palette: ColorPalette,
    out: &mut W,
) -> Result<()> {
    let radius_m = args.radius.unwrap_or(config.snap_radius_m);
    anyhow::ensure!(
        radius_m > 0.0 && radius_m.is_finite(),
        "--radius must be a positive number of meters, got {radius_m}"
    );
    config.validator().check_point(&args.at)?;

    let retriever = SubgraphRetriever::new(store, radius_m, config.edge_limit);
    let node = retriever.snap(&args.at)?;
    let report = SnapReport {
        query: args.at,
        radius_m,
        node,
    };
    write_snap(out, &report, format, palette).context("failed to write snap result")
}
