//! CSV and JSON output for the presentation layer

use crate::assemble::CombinedSeries;
use crate::error::Result;
use crate::merge::MergedTable;
use crate::pipeline::OutlookReport;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

fn cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Wide CSV: `year,<indicator>,...`; unset cells are empty
pub fn write_merged_csv<W: Write>(table: &MergedTable, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["year".to_string()];
    header.extend(table.indicators().iter().cloned());
    csv.write_record(&header)?;

    for row in table.rows() {
        let mut record = vec![row.year.to_string()];
        record.extend(row.values.iter().map(|v| cell(*v)));
        csv.write_record(&record)?;
    }

    csv.flush()?;
    Ok(())
}

/// Long CSV: `year,value,kind,lower,upper`
pub fn write_combined_csv<W: Write>(series: &CombinedSeries, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(["year", "value", "kind", "lower", "upper"])?;

    for point in series.rows() {
        let (lower, upper) = match point.interval {
            Some((l, u)) => (Some(l), Some(u)),
            None => (None, None),
        };
        csv.write_record([
            point.year.to_string(),
            cell(point.value),
            point.kind.to_string(),
            cell(lower),
            cell(upper),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

/// Pretty-printed JSON of the whole report
pub fn write_report_json<W: Write>(report: &OutlookReport, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

/// File stem for an indicator name: lowercase, non-alphanumerics as `_`
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Write `merged.csv`, one `<indicator>_outlook.csv` per indicator and
/// `report.json` into `dir`, creating it if needed. Returns the paths written.
pub fn write_outputs<P: AsRef<Path>>(report: &OutlookReport, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let merged_path = dir.join("merged.csv");
    write_merged_csv(&report.merged, File::create(&merged_path)?)?;
    written.push(merged_path);

    for outlook in &report.indicators {
        let path = dir.join(format!("{}_outlook.csv", file_stem(&outlook.name)));
        write_combined_csv(&outlook.series, File::create(&path)?)?;
        written.push(path);
    }

    let report_path = dir.join("report.json");
    write_report_json(report, File::create(&report_path)?)?;
    written.push(report_path);

    info!(dir = %dir.display(), files = written.len(), "wrote outlook outputs");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("GDP"), "gdp");
        assert_eq!(file_stem("Real GDP/capita"), "real_gdp_capita");
    }
}
