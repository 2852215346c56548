//! CSV, report text and PDF export.
//!
//! Preparers turn store contents into [`ExportRecord`]s with fixed column
//! sets; [`to_csv`] serialises them. Report builders produce the plain-text
//! body that [`render_pdf`] lays out on A4 pages.

mod csv;
mod pdf;
mod report;

pub use csv::*;
pub use pdf::*;
pub use report::*;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No data to export")]
    Empty,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "pdf" => Ok(ExportFormat::Pdf),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// `prefix-YYYY-MM-DD.ext`
pub fn export_file_name(prefix: &str, date: NaiveDate, format: ExportFormat) -> String {
    format!("{}-{}.{}", prefix, date.format("%Y-%m-%d"), format.extension())
}

/// Write an export into `dir`, creating it if needed.
pub fn save_export(dir: &Path, file_name: &str, bytes: &[u8]) -> ExportResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

/// Rupee amount with thousands separators, e.g. `₹1,350`.
pub fn format_rupees(amount: f64) -> String {
    let plain = crate::models::format_number(amount);
    let (sign, digits) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain.as_str()),
    };
    let (whole, fraction) = match digits.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match fraction {
        Some(f) => format!("{}₹{}.{}", sign, grouped, f),
        None => format!("{}₹{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(export_file_name("inventory", date, ExportFormat::Csv), "inventory-2024-03-05.csv");
        assert_eq!(export_file_name("tasks", date, ExportFormat::Pdf), "tasks-2024-03-05.pdf");
    }

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(450.0), "₹450");
        assert_eq!(format_rupees(1350.0), "₹1,350");
        assert_eq!(format_rupees(1234567.5), "₹1,234,567.5");
        assert_eq!(format_rupees(-2000.0), "-₹2,000");
    }

    #[test]
    fn test_save_export_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("reports");
        let path = save_export(&target, "animals-2024-03-05.csv", b"ID\nA001").unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"ID\nA001");
    }
}
