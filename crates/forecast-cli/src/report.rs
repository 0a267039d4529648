//! Plain-text rendering of forecast results.

use chrono::{DateTime, SecondsFormat};
use std::fmt::Write;

use forecast_core::{Conflict, Plot, TemporalGeoPoint};

/// Epoch milliseconds as an RFC 3339 UTC instant, or the raw value when out
/// of range.
pub fn format_timestamp(timestamp_ms: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| format!("{}ms", timestamp_ms))
}

fn format_point(point: &TemporalGeoPoint) -> String {
    format!("({:.5}, {:.5})", point.lon, point.lat)
}

/// One row per conflict with both trajectories' start and end.
pub fn conflict_table(conflicts: &[Conflict]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6} {:>6}  {:<24}  {:<24}  {:<22}  {:<22}",
        "A", "B", "START", "END", "START A", "START B"
    );
    for conflict in conflicts {
        let end = conflict
            .conflict_end_a
            .map(|point| format_timestamp(point.timestamp))
            .unwrap_or_else(|| "open".to_string());
        let _ = writeln!(
            out,
            "{:>6} {:>6}  {:<24}  {:<24}  {:<22}  {:<22}",
            conflict.trajectory_a,
            conflict.trajectory_b,
            format_timestamp(conflict.conflict_start_a.timestamp),
            end,
            format_point(&conflict.conflict_start_a),
            format_point(&conflict.conflict_start_b),
        );
    }
    let _ = write!(out, "{} conflict(s)", conflicts.len());
    out
}

pub fn plot_line(plot: &Plot) -> String {
    format!(
        "{}  {}  hdg {:6.2}  {:7.2} m/s",
        format_timestamp(plot.position.timestamp),
        format_point(&plot.position),
        plot.heading,
        plot.lateral_speed
    )
}
