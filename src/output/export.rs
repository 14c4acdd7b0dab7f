//! CSV dumps of the plotted numbers, so that a chart can be redrawn with other tools

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::{
    error::{Error, file_access},
    report::{QueryDelta, ReportSet},
};

#[derive(Serialize)]
struct PointRow<'a> {
    series: &'a str,
    x: f64,
    y: f64,
    trend: Option<f64>,
}

/// Writes one row per plotted point. The `trend` column is empty for series without a trend curve.
pub fn export_points(report: &ReportSet, path: &Path) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    for entry in report.plotted() {
        let fitted = entry.trend().map(|t| t.fitted());
        for (i, (x, y)) in entry.series().points().enumerate() {
            wtr.serialize(PointRow {
                series: entry.label(),
                x,
                y,
                trend: fitted.and_then(|f| f.get(i).copied()),
            })?;
        }
    }
    wtr.flush().map_err(|e| file_access(path, e))?;
    info!(path = %path.display(), "exported plotted points");
    Ok(())
}

pub fn export_query_deltas(deltas: &[QueryDelta], path: &Path) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_path(path)?;
    for delta in deltas {
        wtr.serialize(delta)?;
    }
    wtr.flush().map_err(|e| file_access(path, e))?;
    info!(path = %path.display(), "exported query deltas");
    Ok(())
}
