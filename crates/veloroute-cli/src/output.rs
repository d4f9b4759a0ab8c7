//! Output formatting for the CLI subcommands.
//!
//! Every renderer writes into a caller-supplied [`Write`] so the same code
//! drives stdout and the unit tests.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;

use veloroute_lib::{
    BikeLane, Coordinate, Preferences, RoadClass, RouteRenderMode, RouteSummary, SnappedNode,
};

use crate::terminal::{format_meters, ColorPalette};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text with optional ANSI colors.
    #[default]
    Text,
    /// Uncolored listing with one line per route node; other commands use the text view.
    Plain,
    /// Pretty-printed JSON.
    Json,
    /// GeoJSON `Feature` (routes and snaps; other commands fall back to JSON).
    Geojson,
}

/// Format of the diagnostic log lines written to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(io::Error::other)?;
    out.write_all(b"\n")
}

/// Write a planned route in the requested format.
pub fn write_route<W: Write>(
    out: &mut W,
    summary: &RouteSummary,
    format: OutputFormat,
    palette: ColorPalette,
) -> io::Result<()> {
    match format {
        OutputFormat::Text => TextRenderer::new(palette).render(out, summary),
        OutputFormat::Plain => out.write_all(summary.render(RouteRenderMode::PlainText).as_bytes()),
        OutputFormat::Json => write_json(out, summary),
        OutputFormat::Geojson => out.write_all(summary.render(RouteRenderMode::GeoJson).as_bytes()),
    }
}

/// Renderer for the text route view with START/GOAL badges.
pub struct TextRenderer {
    palette: ColorPalette,
}

impl TextRenderer {
    #[must_use]
    pub const fn new(palette: ColorPalette) -> Self {
        Self { palette }
    }

    pub fn render<W: Write>(&self, out: &mut W, summary: &RouteSummary) -> io::Result<()> {
        let p = &self.palette;
        writeln!(
            out,
            "Route from node {}{}{} to node {}{}{} ({} hops; mode: {}):",
            p.white_bold,
            summary.start.id,
            p.reset,
            p.white_bold,
            summary.goal.id,
            p.reset,
            summary.hops,
            summary.mode
        )?;

        let last = summary.steps.len().saturating_sub(1);
        for (i, step) in summary.steps.iter().enumerate() {
            let (tag_color, tag) = if i == 0 {
                (p.tag_start, " STRT ")
            } else if i == last {
                (p.tag_goal, " GOAL ")
            } else {
                ("", "  |   ")
            };
            let reset = if tag_color.is_empty() { "" } else { p.reset };
            write!(
                out,
                "{tag_color}{tag}{reset} {:.6},{:.6} {}(node {}){}",
                step.lat, step.lon, p.gray, step.id, p.reset
            )?;
            if i == 0 && summary.start.snap_offset_m > 0.0 {
                write!(out, " snapped {}", format_meters(summary.start.snap_offset_m))?;
            } else if i == last && i > 0 && summary.goal.snap_offset_m > 0.0 {
                write!(out, " snapped {}", format_meters(summary.goal.snap_offset_m))?;
            }
            writeln!(out)?;
        }

        writeln!(out)?;
        writeln!(out, "{}───────────────────────────────────────{}", p.gray, p.reset)?;
        writeln!(
            out,
            "  {}Distance:{} {}{}{}",
            p.green,
            p.reset,
            p.white_bold,
            format_meters(summary.distance_m),
            p.reset
        )?;
        writeln!(
            out,
            "  {}Weight:{}   {}{:.1}{}",
            p.green, p.reset, p.white_bold, summary.total_weight, p.reset
        )
    }
}

/// Result of a `snap` query.
#[derive(Debug, Clone, Serialize)]
pub struct SnapReport {
    pub query: Coordinate,
    pub radius_m: f64,
    pub node: SnappedNode,
}

pub fn write_snap<W: Write>(
    out: &mut W,
    report: &SnapReport,
    format: OutputFormat,
    palette: ColorPalette,
) -> io::Result<()> {
    let p = &palette;
    match format {
        OutputFormat::Text | OutputFormat::Plain => writeln!(
            out,
            "Nearest node {}{}{} at {:.6},{:.6} ({} from {:.6},{:.6})",
            p.white_bold,
            report.node.id,
            p.reset,
            report.node.coord.lat,
            report.node.coord.lon,
            format_meters(report.node.distance_m),
            report.query.lat,
            report.query.lon
        ),
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Geojson => {
            let feature = json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [report.node.coord.lon, report.node.coord.lat],
                },
                "properties": {
                    "node": report.node.id,
                    "distance_m": report.node.distance_m,
                    "radius_m": report.radius_m,
                },
            });
            writeln!(out, "{feature:#}")
        }
    }
}

/// Per-term breakdown of one edge traversal cost.
#[derive(Debug, Clone, Serialize)]
pub struct CostReport {
    pub distance_m: f64,
    pub road_class: RoadClass,
    pub bike_lane: BikeLane,
    pub incline_pct: f64,
    pub preferences: Preferences,
    pub distance_multiplier: f64,
    pub bike_multiplier: f64,
    pub road_multiplier: f64,
    pub incline_multiplier: f64,
    pub cost: f64,
}

pub fn write_cost<W: Write>(
    out: &mut W,
    report: &CostReport,
    format: OutputFormat,
    palette: ColorPalette,
) -> io::Result<()> {
    if !matches!(format, OutputFormat::Text | OutputFormat::Plain) {
        return write_json(out, report);
    }
    let p = &palette;
    writeln!(
        out,
        "Edge cost: {}{:.4}{} ({:.1} m {}, bike lane {}, incline {:+.1}%)",
        p.white_bold,
        report.cost,
        p.reset,
        report.distance_m,
        report.road_class,
        if report.bike_lane.is_present() { "yes" } else { "no" },
        report.incline_pct
    )?;
    for (label, value) in [
        ("distance multiplier", report.distance_multiplier),
        ("bike multiplier", report.bike_multiplier),
        ("road multiplier", report.road_multiplier),
        ("incline multiplier", report.incline_multiplier),
    ] {
        writeln!(out, "  {}{label:<20}{} {value:>9.4}", p.gray, p.reset)?;
    }
    Ok(())
}

/// Write a failure line to stderr-style output with the category highlighted.
pub fn write_failure<W: Write>(
    out: &mut W,
    category: &str,
    message: &str,
    palette: ColorPalette,
) -> io::Result<()> {
    writeln!(out, "{}[{category}]{} {message}", palette.red, palette.reset)
}
