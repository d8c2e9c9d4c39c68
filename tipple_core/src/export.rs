//! CSV export of trend series for external charting tools.

use crate::{Result, TrendPoint};
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    timestamp: String,
    bac: f64,
    normalized: f64,
    total_drinks: f64,
    synthetic: bool,
}

impl From<&TrendPoint> for CsvRow {
    fn from(point: &TrendPoint) -> Self {
        CsvRow {
            timestamp: point.timestamp.to_rfc3339(),
            bac: point.bac,
            normalized: point.normalized(),
            total_drinks: point.total_drinks,
            synthetic: point.synthetic,
        }
    }
}

/// Write trend points as CSV (with headers) to any writer
pub fn write_trend<W: Write>(points: &[TrendPoint], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(writer);
    for point in points {
        writer.serialize(CsvRow::from(point))?;
    }
    writer.flush()?;
    Ok(())
}

/// Replace `path` with a CSV of the trend points
pub fn write_trend_csv(points: &[TrendPoint], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    write_trend(points, &file)?;
    file.sync_all()?;

    tracing::info!("Exported {} trend points to {:?}", points.len(), path);
    Ok(points.len())
}
