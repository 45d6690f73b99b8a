//! CSV report writer for batch classification.

use crate::constants::confidence::PERCENT_DECIMAL_PLACES;
use crate::error::{Error, Result};
use crate::inference::PredictionResult;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column header row.
pub const HEADER: [&str; 5] = ["File", "Class index", "Species", "Confidence", "Confidence (%)"];

/// Writes one row per classified file.
pub struct CsvReportWriter<W: Write> {
    writer: csv::Writer<W>,
    path: PathBuf,
}

impl CsvReportWriter<File> {
    /// Create the report file and write the header.
    pub fn create(path: &Path) -> Result<Self> {
        let writer = csv::Writer::from_path(path).map_err(|source| Error::CsvWrite {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_writer(writer, path)
    }
}

impl<W: Write> CsvReportWriter<W> {
    fn with_writer(writer: csv::Writer<W>, path: &Path) -> Result<Self> {
        let mut report = Self {
            writer,
            path: path.to_path_buf(),
        };
        report.write_record(HEADER)?;
        Ok(report)
    }

    /// Append a row for a classified file.
    pub fn write_prediction(&mut self, file: &Path, prediction: &PredictionResult) -> Result<()> {
        let file = file.display().to_string();
        let index = prediction.class_index.to_string();
        let confidence = format!("{:.4}", prediction.confidence);
        let percent = format!(
            "{:.*}",
            PERCENT_DECIMAL_PLACES,
            prediction.confidence_percent()
        );
        self.write_record([
            file.as_str(),
            index.as_str(),
            prediction.species_name(),
            confidence.as_str(),
            percent.as_str(),
        ])
    }

    /// Flush buffered rows.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn write_record<'a>(&mut self, record: impl IntoIterator<Item = &'a str>) -> Result<()> {
        self.writer
            .write_record(record)
            .map_err(|source| Error::CsvWrite {
                path: self.path.clone(),
                source,
            })
    }
}
