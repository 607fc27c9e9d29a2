//! CSV export of the sample collection.
//!
//! # Invariants
//! - Header and column order are fixed: `ID` followed by the field labels.
//! - Commas inside descriptive values are replaced by a space, or dropped
//!   when already next to whitespace. Values are never quoted, so the
//!   transform is lossy but keeps one column per field.
//! - Lines are joined with `\n` without a trailing newline.

use crate::model::sample::{Sample, SampleField};
use chrono::{NaiveDate, Utc};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const ID_HEADER: &str = "ID";
const FILE_NAME_PREFIX: &str = "datos_geologicos_";

/// Errors from CSV export.
#[derive(Debug)]
pub enum ExportError {
    /// There are no samples to export.
    EmptyCollection,
    /// Export file could not be written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCollection => write!(f, "nothing to export"),
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyCollection => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// A built CSV document and its download file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
}

/// Current UTC calendar date, used for export file names.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// `datos_geologicos_YYYY-MM-DD.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{FILE_NAME_PREFIX}{}.csv", date.format("%Y-%m-%d"))
}

/// Header line of the export.
pub fn csv_header() -> String {
    std::iter::once(ID_HEADER)
        .chain(SampleField::ALL.into_iter().map(SampleField::label))
        .collect::<Vec<_>>()
        .join(",")
}

/// Builds the CSV document for `samples`.
///
/// Values are never quoted. Each comma in a value becomes one space, or is
/// dropped when it already touches whitespace, so `"a, b"` exports as
/// `"a b"` and `"a,b"` as `"a b"`.
///
/// # Errors
/// - `ExportError::EmptyCollection` when `samples` is empty.
pub fn build_csv_export(samples: &[Sample], date: NaiveDate) -> Result<CsvExport, ExportError> {
    if samples.is_empty() {
        return Err(ExportError::EmptyCollection);
    }

    let mut lines = Vec::with_capacity(samples.len() + 1);
    lines.push(csv_header());
    lines.extend(samples.iter().map(csv_row));

    Ok(CsvExport {
        file_name: export_file_name(date),
        content: lines.join("\n"),
    })
}

/// Writes an export into `dir`, creating it when missing.
///
/// Returns the written file path.
pub fn write_csv_export(dir: impl AsRef<Path>, export: &CsvExport) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(&export.file_name);
    std::fs::write(&path, export.content.as_bytes()).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;

    info!(
        "event=csv_export module=export status=ok file={} bytes={}",
        export.file_name,
        export.content.len()
    );
    Ok(path)
}

fn csv_row(sample: &Sample) -> String {
    std::iter::once(sample.id.to_string())
        .chain(
            SampleField::ALL
                .into_iter()
                .map(|field| strip_commas(sample.field(field))),
        )
        .collect::<Vec<_>>()
        .join(",")
}

fn strip_commas(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len());
    for (index, ch) in chars.iter().enumerate() {
        if *ch != ',' {
            out.push(*ch);
            continue;
        }
        let before = index.checked_sub(1).and_then(|prev| chars.get(prev));
        let after = chars.get(index + 1);
        let next_to_space = before.is_some_and(|c| c.is_whitespace())
            || after.is_some_and(|c| c.is_whitespace());
        if !next_to_space {
            out.push(' ');
        }
    }
    out
}
