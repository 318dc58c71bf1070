//! Template population
//!
//! Cell coordinates and the source-column mapping below are fixed by the
//! pre-authored `rapportino_alfa.xlsx` template and by the upstream
//! timesheet export layout. They are deliberately hard-coded as named
//! constants and must not be made configurable: the template asset is the
//! contract.

use chrono::NaiveDate;

use crate::error::{DashboardError, DashboardResult};
use crate::report::sheet::SheetGrid;
use crate::report::ExtractedRow;

/// First worksheet row holding timesheet data (1-based, template layout).
pub const FIRST_DATA_ROW: u32 = 8;

/// Template data columns, 1-based.
pub const DATE_COLUMN: u16 = 1;
pub const NOTE_COLUMN: u16 = 2;
pub const HOURS_COLUMN: u16 = 3;
pub const REMOTE_WORK_COLUMN: u16 = 4;

/// Header cells as (row, column), 1-based: period start, employee name,
/// end of month.
const PERIOD_CELL: (u32, u16) = (4, 2);
const EMPLOYEE_CELL: (u32, u16) = (5, 2);
const MONTH_END_CELL: (u32, u16) = (45, 2);

/// Source field indices consumed from the upload (0-based, date column
/// excluded): hours worked, workplace, free-text note. Every other field is
/// ignored.
const HOURS_FIELD: usize = 3;
const REMOTE_WORK_FIELD: usize = 5;
const NOTE_FIELD: usize = 6;

/// Workplace value meaning the employee was on-site that day.
const OFFICE_MARKER: &str = "ufficio";

/// Write header cells and data rows into the template grid.
///
/// Precondition: `rows` is non-empty and sorted ascending by date. An empty
/// slice fails with [`DashboardError::NoMatchingData`]; nothing is written
/// in that case.
pub fn populate(
    grid: &mut SheetGrid,
    rows: &[ExtractedRow],
    month: u32,
    year: i32,
    employee_name: &str,
) -> DashboardResult<()> {
    if rows.is_empty() {
        return Err(DashboardError::NoMatchingData);
    }

    write_header(grid, month, year, employee_name)?;
    for (offset, row) in rows.iter().enumerate() {
        write_row(grid, FIRST_DATA_ROW + offset as u32, row);
    }
    Ok(())
}

fn write_header(
    grid: &mut SheetGrid,
    month: u32,
    year: i32,
    employee_name: &str,
) -> DashboardResult<()> {
    let first_day = first_day_of_month(year, month)?;
    let last_day = last_day_of_month(year, month)?;

    set_text(grid, PERIOD_CELL, format_italian_date(first_day));
    set_text(grid, EMPLOYEE_CELL, employee_name);
    set_text(grid, MONTH_END_CELL, format_italian_date(last_day));
    Ok(())
}

fn write_row(grid: &mut SheetGrid, sheet_row: u32, row: &ExtractedRow) {
    set_text(grid, (sheet_row, DATE_COLUMN), format_italian_date(row.date));

    for (field, value) in row.fields.iter().enumerate() {
        match field {
            NOTE_FIELD => set_text(grid, (sheet_row, NOTE_COLUMN), value),
            HOURS_FIELD => set_number(
                grid,
                (sheet_row, HOURS_COLUMN),
                f64::from(parse_hours(value)),
            ),
            // On-site days leave the cell untouched, no explicit 0
            REMOTE_WORK_FIELD if is_remote_work(value) => {
                set_number(grid, (sheet_row, REMOTE_WORK_COLUMN), 1.0)
            }
            _ => {}
        }
    }
}

// Grid cells are 0-based; the template constants above are 1-based like the
// sheet layout they describe.
fn set_text(grid: &mut SheetGrid, (row, col): (u32, u16), text: impl Into<String>) {
    grid.set_text(row - 1, col - 1, text);
}

fn set_number(grid: &mut SheetGrid, (row, col): (u32, u16), value: f64) {
    grid.set_number(row - 1, col - 1, value);
}

/// Hours cell coercion: anything that is not a plain integer counts as 0.
pub(crate) fn parse_hours(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}

/// Any workplace other than "ufficio" (case-insensitive) counts as remote.
pub(crate) fn is_remote_work(value: &str) -> bool {
    !value.eq_ignore_ascii_case(OFFICE_MARKER)
}

pub fn first_day_of_month(year: i32, month: u32) -> DashboardResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(DashboardError::InvalidMonth(month))
}

pub fn last_day_of_month(year: i32, month: u32) -> DashboardResult<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month
        .and_then(|day| day.pred_opt())
        .ok_or(DashboardError::InvalidMonth(month))
}

pub fn format_italian_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
