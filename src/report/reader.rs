//! Upload extraction: uploaded workbook bytes → dated rows
//!
//! Reads the first worksheet of the upload, parses column 1 as an Italian
//! (day/month/year) date and keeps the rows whose date falls in the target
//! period. Rows whose date cell does not parse are not data rows (headers,
//! separators, blanks) and are skipped silently.

use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};
use chrono::{Datelike, NaiveDate};

use crate::error::{DashboardError, DashboardResult};
use crate::report::ExtractedRow;

/// Absolute index of the upload's date column (column 1 of the sheet).
const DATE_COLUMN_INDEX: u32 = 0;

/// Date formats accepted for textual date cells, tried in order.
const ITALIAN_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y"];

/// Extract all rows of the upload's first worksheet whose date column parses
/// and matches `(month, year)`. Output order is sheet order; sorting is the
/// caller's concern.
///
/// An upload without worksheets or with an empty used range yields an empty
/// vector, not an error.
pub fn extract_rows(data: &[u8], month: u32, year: i32) -> DashboardResult<Vec<ExtractedRow>> {
    let mut workbook = Xlsx::new(Cursor::new(data)).map_err(|e| {
        DashboardError::Spreadsheet(format!("failed to open uploaded workbook: {e}"))
    })?;

    let sheet_names = workbook.sheet_names().to_vec();
    let Some(first_sheet) = sheet_names.first() else {
        return Ok(Vec::new());
    };

    let range = workbook
        .worksheet_range(first_sheet)
        .map_err(|e| DashboardError::Spreadsheet(format!("failed to read worksheet: {e}")))?;

    let Some((end_row, end_col)) = range.end() else {
        // Empty used range: zero rows, handled downstream
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for row in 0..=end_row {
        let Some(date) = range
            .get_value((row, DATE_COLUMN_INDEX))
            .and_then(cell_date)
        else {
            continue;
        };
        if date.month() != month || date.year() != year {
            continue;
        }

        let fields = (DATE_COLUMN_INDEX + 1..=end_col)
            .map(|col| {
                range
                    .get_value((row, col))
                    .map(cell_text)
                    .unwrap_or_default()
            })
            .collect();
        rows.push(ExtractedRow { date, fields });
    }

    Ok(rows)
}

/// Calendar date of a cell, if any. Textual cells go through the Italian
/// formats; native Excel date cells are truncated to day precision.
fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) => parse_italian_date(s),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell.as_date(),
        _ => None,
    }
}

/// Parse a day/month/year date, tolerating a trailing time component.
fn parse_italian_date(text: &str) -> Option<NaiveDate> {
    let token = text.split_whitespace().next()?;
    ITALIAN_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
}

/// Cell text the way a user would read it in the sheet.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}
