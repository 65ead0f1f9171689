//! Static CSV datasets and their process-lifetime cache.
//!
//! Two read-only files feed the dashboard: the training CSV (only its
//! `ApplicantIncome` column is used, as the histogram's reference
//! population) and the test CSV (client lookup). Each is read at most once
//! per process and never modified afterwards.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::{debug, warn};
use thiserror::Error;

use crate::config::schema::DataConfig;
use crate::lookup::{ClientDataset, LookupError};

/// Column holding the applicant income in both datasets.
pub const INCOME_COLUMN: &str = "ApplicantIncome";

/// Failure to read a static dataset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("Fichier {file} introuvable.")]
    NotFound { file: String },

    #[error("Erreur de lecture de {file} : {message}")]
    Read { file: String, message: String },
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// A CSV file held as strings: one header row, then records.
///
/// Cells are kept verbatim (trimmed); interpretation is left to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Read a CSV file. Short rows are padded with empty cells so every row
    /// has one value per header.
    pub fn from_path(path: &Path) -> Result<Self, DatasetError> {
        let file = display_name(path);
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| classify_csv_error(&file, e))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| classify_csv_error(&file, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| classify_csv_error(&file, e))?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        debug!("loaded {} rows from {}", rows.len(), path.display());
        Ok(Self { headers, rows })
    }

    /// Index of a column, by exact name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Numeric values of a column, skipping blank and non-numeric cells.
    pub fn numeric_column(&self, name: &str) -> Vec<f64> {
        let Some(index) = self.column(name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter_map(|row| row.get(index)?.parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .collect()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn classify_csv_error(file: &str, err: csv::Error) -> DatasetError {
    if let csv::ErrorKind::Io(io_err) = err.kind()
        && io_err.kind() == io::ErrorKind::NotFound
    {
        return DatasetError::NotFound {
            file: file.to_string(),
        };
    }
    DatasetError::Read {
        file: file.to_string(),
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Reference population
// ---------------------------------------------------------------------------

/// Load the income column of the training CSV.
///
/// A missing or unreadable file yields an empty population; the histogram is
/// then simply not shown.
pub fn load_population(path: &Path) -> Vec<f64> {
    match Table::from_path(path) {
        Ok(table) => {
            let incomes = table.numeric_column(INCOME_COLUMN);
            if incomes.is_empty() {
                warn!("{} has no usable {INCOME_COLUMN} values", path.display());
            }
            incomes
        }
        Err(e) => {
            warn!("reference population unavailable: {e}");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Process-lifetime cache
// ---------------------------------------------------------------------------

/// Lazily loaded, read-only datasets shared by every request.
///
/// The first access reads the file; the outcome (including a failure) is
/// kept for the rest of the process.
#[derive(Debug)]
pub struct Datasets {
    train_path: PathBuf,
    test_path: PathBuf,
    population: OnceLock<Vec<f64>>,
    clients: OnceLock<Result<ClientDataset, LookupError>>,
}

impl Datasets {
    pub fn new(train_path: impl Into<PathBuf>, test_path: impl Into<PathBuf>) -> Self {
        Self {
            train_path: train_path.into(),
            test_path: test_path.into(),
            population: OnceLock::new(),
            clients: OnceLock::new(),
        }
    }

    pub fn from_config(config: &DataConfig) -> Self {
        Self::new(&config.train_csv, &config.test_csv)
    }

    /// Applicant incomes of the reference population (possibly empty).
    pub fn population(&self) -> &[f64] {
        self.population
            .get_or_init(|| load_population(&self.train_path))
    }

    /// The client lookup dataset, or why it is unavailable.
    pub fn clients(&self) -> Result<&ClientDataset, &LookupError> {
        self.clients
            .get_or_init(|| {
                let loaded = ClientDataset::load(&self.test_path);
                if let Err(e) = &loaded {
                    warn!("client dataset unavailable: {e}");
                }
                loaded
            })
            .as_ref()
    }

    pub fn train_path(&self) -> &Path {
        &self.train_path
    }

    pub fn test_path(&self) -> &Path {
        &self.test_path
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_csv(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn reads_headers_and_pads_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(dir.path(), "t.csv", "a,b,c\n1,2,3\n4,5\n");
        let table = Table::from_path(&path).unwrap();
        assert_eq!(table.headers, ["a", "b", "c"]);
        assert_eq!(table.rows[1], ["4", "5", ""]);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Table::from_path(&dir.path().join("test.csv")).unwrap_err();
        assert_eq!(
            err,
            DatasetError::NotFound {
                file: "test.csv".to_string()
            }
        );
        assert_eq!(err.to_string(), "Fichier test.csv introuvable.");
    }

    #[test]
    fn numeric_column_skips_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            dir.path(),
            "train.csv",
            "Loan_ID,ApplicantIncome\nLP1,5849\nLP2,\nLP3, 3000 \nLP4,n/a\n",
        );
        let table = Table::from_path(&path).unwrap();
        assert_eq!(table.numeric_column(INCOME_COLUMN), vec![5849.0, 3000.0]);
        assert!(table.numeric_column("Nope").is_empty());
    }

    #[test]
    fn missing_population_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_population(&dir.path().join("train.csv")).is_empty());
    }

    #[test]
    fn datasets_load_once() {
        let dir = tempfile::tempdir().unwrap();
        let train = write_csv(dir.path(), "train.csv", "ApplicantIncome\n100\n200\n");
        let datasets = Datasets::new(&train, dir.path().join("test.csv"));

        assert_eq!(datasets.population(), [100.0, 200.0]);

        // Later changes on disk are not picked up.
        fs::write(&train, "ApplicantIncome\n1\n").unwrap();
        assert_eq!(datasets.population(), [100.0, 200.0]);

        assert!(datasets.clients().is_err());
    }
}
