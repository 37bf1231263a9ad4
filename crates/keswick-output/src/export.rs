//! CSV and JSON export for report types.

use crate::report::{PressReport, RatioTable};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Exported bytes were not valid UTF-8.
    #[error("invalid UTF-8 in exported data: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

impl Exporter for PressReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut output = String::new();

                // Summary lines ride above the table as comments.
                output.push_str(&format!("# Symbol: {}\n", self.symbol));
                output.push_str(&format!(
                    "# Average days per release: {}\n",
                    self.summary.average_days_between_releases
                ));
                output.push_str(&format!(
                    "# Mean %: PC -> 1: {:.4}, PC -> 3: {:.4}, PC -> 5: {:.4}\n",
                    self.summary.mean_pct_1, self.summary.mean_pct_3, self.summary.mean_pct_5
                ));

                let mut wtr = csv::Writer::from_writer(vec![]);
                for row in &self.rows {
                    wtr.serialize(row)?;
                }
                let rows = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)?;
                output.push_str(&rows);
                Ok(output)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

impl Exporter for RatioTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);

                // Period columns are numbered newest (1) to oldest.
                let mut header = vec![self.symbol.clone()];
                header.extend((1..=self.periods).map(|n| n.to_string()));
                wtr.write_record(&header)?;

                for row in &self.rows {
                    let mut record = vec![row.name.clone()];
                    record.extend((0..self.periods).map(|i| {
                        row.values
                            .get(i)
                            .copied()
                            .flatten()
                            .map(|v| v.to_string())
                            .unwrap_or_default()
                    }));
                    wtr.write_record(&record)?;
                }

                Ok(String::from_utf8(
                    wtr.into_inner().map_err(|e| e.into_error())?,
                )?)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{PressEntry, PressReport};
    use keswick_core::PriceTable;

    fn sample_report() -> PressReport {
        let table = PriceTable::from_iso_pairs([
            ("2024-01-02", 100.0),
            ("2024-01-03", 102.0),
            ("2024-01-05", 105.0),
            ("2024-01-08", 110.0),
            ("2024-02-01", 120.0),
            ("2024-03-01", 130.0),
        ])
        .unwrap();
        let entries = vec![
            PressEntry::new("2024-03-01".parse().unwrap(), "third"),
            PressEntry::new("2024-02-01".parse().unwrap(), "second"),
            PressEntry::new("2024-01-02".parse().unwrap(), "first"),
        ];
        PressReport::build("NVDA", &entries, &table, "2024-06-01".parse().unwrap()).unwrap()
    }

    #[test]
    fn test_press_report_csv() {
        let csv = sample_report().export_to_string(ExportFormat::Csv).unwrap();

        assert!(csv.starts_with("# Symbol: NVDA\n"));
        assert!(csv.contains("# Average days per release: 29\n"));
        assert!(csv.contains("Symbol,Date,Title,Previous Close,Days Ahead: 1"));
        assert!(csv.contains("NVDA,2024-01-02,first,100.0,102.0"));
    }

    #[test]
    fn test_press_report_json_roundtrip() {
        let report = sample_report();
        let json = report.export_to_string(ExportFormat::Json).unwrap();
        let parsed: PressReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_ratio_table_csv() {
        let table = RatioTable::new(
            "NVDA",
            vec![
                ("Current Ratio".to_string(), vec![Some(3.52), Some(2.79)]),
                ("P/E".to_string(), vec![Some(60.0), None]),
            ],
        );

        let csv = table.export_to_string(ExportFormat::Csv).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("NVDA,1,2"));
        assert_eq!(lines.next(), Some("Current Ratio,3.52,2.79"));
        assert_eq!(lines.next(), Some("P/E,60,"));
    }

    #[test]
    fn test_extension() {
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Json.extension(), "json");
        assert_eq!(ExportFormat::PrettyJson.extension(), "json");
    }
}
