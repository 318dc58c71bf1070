//! Report serialization: populated grid → xlsx bytes + download name

use rust_xlsxwriter::Workbook;

use crate::error::{DashboardError, DashboardResult};
use crate::report::sheet::SheetGrid;

/// Render the grid to a workbook in memory and return the xlsx bytes.
/// Column widths are auto-fitted for presentation before saving.
pub fn serialize(grid: &SheetGrid) -> DashboardResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    grid.write_to(worksheet)?;
    worksheet.autofit();

    workbook
        .save_to_buffer()
        .map_err(|e| DashboardError::Spreadsheet(format!("failed to serialize report: {e}")))
}

/// Download name of the generated report.
pub fn report_file_name(month: u32, year: i32) -> String {
    format!("rapportino_{month}_{year}.xlsx")
}
