//! CSV-backed price table using the `components_cache.csv` column layout.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::{format_timestamp, parse_timestamp, PriceTable};
use crate::config;
use crate::error::Result;
use crate::models::{Category, PriceRecord};

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    component_name: String,
    category: String,
    estimated_new_price_eur: f64,
    estimated_used_price_eur: f64,
    last_updated: String,
    source: String,
}

impl From<&PriceRecord> for CsvRow {
    fn from(r: &PriceRecord) -> Self {
        Self {
            component_name: r.component_name.clone(),
            category: r.category.as_str().to_string(),
            estimated_new_price_eur: r.estimated_new_price,
            estimated_used_price_eur: r.estimated_used_price,
            last_updated: format_timestamp(&r.last_updated),
            source: r.source.clone(),
        }
    }
}

impl From<CsvRow> for PriceRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            component_name: row.component_name,
            category: Category::from_label(&row.category),
            estimated_new_price: row.estimated_new_price_eur,
            estimated_used_price: row.estimated_used_price_eur,
            last_updated: parse_timestamp(&row.last_updated),
            source: row.source,
        }
    }
}

/// A [`PriceTable`] stored as a CSV file with a header row.
///
/// A missing file reads as an empty table. Writes go to a temp file in the
/// same directory which is then renamed over the target, so readers never see
/// a half-written file.
pub struct CsvTable {
    path: PathBuf,
}

impl CsvTable {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceTable for CsvTable {
    fn load(&self) -> Result<Vec<PriceRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let mut records = Vec::new();
        for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
            match row {
                Ok(row) => records.push(PriceRecord::from(row)),
                Err(e) => tracing::warn!(
                    "Skipping unreadable row {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(records)
    }

    fn save(&mut self, records: &[PriceRecord]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut tmp);
            writer.write_record(config::CSV_HEADER)?;
            for record in records {
                writer.serialize(CsvRow::from(record))?;
            }
            writer.flush()?;
        }
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}
