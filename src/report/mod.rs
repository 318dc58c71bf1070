//! Monthly Alfa timesheet report pipeline
//!
//! Takes an uploaded timesheet workbook, extracts the rows belonging to a
//! (month, year) period, merges them into the pre-authored report template
//! and serializes the result back to xlsx bytes. Everything is per-request:
//! the upload and the template are opened, used and dropped within one call,
//! with no workbook state shared across requests.

pub mod populate;
pub mod reader;
pub mod serializer;
pub mod sheet;

use std::path::Path;

use chrono::NaiveDate;

use crate::error::{DashboardError, DashboardResult};

pub use reader::extract_rows;
pub use serializer::report_file_name;
pub use sheet::{CellValue, SheetGrid};

/// File name of the report template asset, expected under the configured
/// templates directory.
pub const TEMPLATE_FILE_NAME: &str = "rapportino_alfa.xlsx";

/// MIME type of the generated report.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// One dated row extracted from the uploaded timesheet.
///
/// `fields` holds the text of every upload column except the date column,
/// in source order: field index `i` comes from upload column `i + 2`
/// (1-based). Immutable once produced by the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRow {
    pub date: NaiveDate,
    pub fields: Vec<String>,
}

/// The finished report: xlsx bytes plus the suggested download name.
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Sort rows ascending by date. The sort is stable, so rows sharing a date
/// keep their original extraction order.
pub fn sort_by_date(rows: &mut [ExtractedRow]) {
    rows.sort_by_key(|row| row.date);
}

/// Run the full pipeline: extract, sort, populate the template, serialize.
///
/// Fails with [`DashboardError::NoFileProvided`] on an empty upload,
/// [`DashboardError::NoMatchingData`] when no row falls in the requested
/// period (checked before the template is even opened) and
/// [`DashboardError::TemplateMissing`] when the template asset is absent.
pub fn generate_report(
    template_path: &Path,
    upload: &[u8],
    month: u32,
    year: i32,
    employee_name: &str,
) -> DashboardResult<GeneratedReport> {
    if upload.is_empty() {
        return Err(DashboardError::NoFileProvided);
    }
    if !(1..=12).contains(&month) {
        return Err(DashboardError::InvalidMonth(month));
    }

    let mut rows = reader::extract_rows(upload, month, year)?;
    if rows.is_empty() {
        return Err(DashboardError::NoMatchingData);
    }
    sort_by_date(&mut rows);

    let mut grid = SheetGrid::load_template(template_path)?;
    populate::populate(&mut grid, &rows, month, year, employee_name)?;
    let bytes = serializer::serialize(&grid)?;

    Ok(GeneratedReport {
        bytes,
        file_name: report_file_name(month, year),
    })
}
