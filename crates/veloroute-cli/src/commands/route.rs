//! `route`: plan a preference-weighted route between two points.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use veloroute_lib::{
    Coordinate, OptimizerConfig, RouteOptimizer, RouteRequest, RouteSummary, SearchMode,
    SpatialStore,
};

use super::PreferenceArgs;
use crate::output::{write_route, OutputFormat};
use crate::terminal::ColorPalette;

#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Start point.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub from: Coordinate,
    /// Destination point.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
    pub to: Coordinate,
    #[command(flatten)]
    pub preferences: PreferenceArgs,
    /// Search mode; defaults to the configured mode.
    #[arg(long, value_name = "strict|greedy|a-star")]
    pub mode: Option<SearchMode>,
}

impl RouteArgs {
    pub fn to_request(&self) -> RouteRequest {
        let request = RouteRequest::new(self.from, self.to, self.preferences.to_array());
        match self.mode {
            Some(mode) => request.with_mode(mode),
            None => request,
        }
    }
}

/// Plan the route and write it to `out`. Library failures are returned
/// unwrapped so the caller can report their category.
pub fn handle_route_command<S: SpatialStore, W: Write>(
    store: S,
    config: OptimizerConfig,
    args: &RouteArgs,
    format: OutputFormat,
    palette: ColorPalette,
    out: &mut W,
) -> Result<()> {
    let optimizer = RouteOptimizer::new(store, config);
    let plan = optimizer.plan(&args.to_request())?;
    info!(
        mode = %plan.mode,
        hops = plan.hop_count(),
        distance_m = plan.distance_m,
        "route planned"
    );

    let summary = RouteSummary::from_plan(&plan);
    write_route(out, &summary, format, palette).context("failed to write route")
}
