//! In-memory worksheet grid
//!
//! The report template is never mutated on disk: it is read once per request
//! into a [`SheetGrid`], the pipeline writes header and data cells into the
//! grid, and the serializer renders the grid to a fresh workbook.

use std::collections::BTreeMap;
use std::path::Path;

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Worksheet;

use crate::error::{DashboardError, DashboardResult};

/// A typed cell value. Template styling is not carried over; the report
/// contract fixes cell positions and values, not formatting.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// Sparse worksheet: zero-based (row, column) → value.
#[derive(Debug, Clone, Default)]
pub struct SheetGrid {
    name: Option<String>,
    cells: BTreeMap<(u32, u16), CellValue>,
}

impl SheetGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the first worksheet of the template workbook into a grid.
    ///
    /// A template absent from disk is a deployment problem, reported as
    /// [`DashboardError::TemplateMissing`].
    pub fn load_template(path: &Path) -> DashboardResult<Self> {
        if !path.is_file() {
            return Err(DashboardError::TemplateMissing(path.to_path_buf()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
            DashboardError::Spreadsheet(format!("failed to open template workbook: {e}"))
        })?;

        let sheet_names = workbook.sheet_names().to_vec();
        let Some(first_sheet) = sheet_names.first() else {
            return Err(DashboardError::Spreadsheet(
                "template workbook has no worksheets".to_string(),
            ));
        };

        let range = workbook.worksheet_range(first_sheet).map_err(|e| {
            DashboardError::Spreadsheet(format!("failed to read template worksheet: {e}"))
        })?;

        let mut grid = Self {
            name: Some(first_sheet.clone()),
            cells: BTreeMap::new(),
        };

        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        for (row_offset, row) in range.rows().enumerate() {
            for (col_offset, cell) in row.iter().enumerate() {
                let row_idx = start_row + row_offset as u32;
                let col_idx = (start_col as usize + col_offset) as u16;
                match cell {
                    Data::Empty => {}
                    Data::Float(f) => grid.set_number(row_idx, col_idx, *f),
                    Data::Int(i) => grid.set_number(row_idx, col_idx, *i as f64),
                    Data::String(s) => grid.set_text(row_idx, col_idx, s.clone()),
                    other => grid.set_text(row_idx, col_idx, other.to_string()),
                }
            }
        }

        Ok(grid)
    }

    /// Name of the worksheet the grid was loaded from, if any.
    pub fn sheet_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_text(&mut self, row: u32, col: u16, text: impl Into<String>) {
        self.cells.insert((row, col), CellValue::Text(text.into()));
    }

    pub fn set_number(&mut self, row: u32, col: u16, value: f64) {
        self.cells.insert((row, col), CellValue::Number(value));
    }

    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Write every cell into a rust_xlsxwriter worksheet, carrying the
    /// template's sheet name over.
    pub fn write_to(&self, worksheet: &mut Worksheet) -> DashboardResult<()> {
        if let Some(name) = &self.name {
            worksheet.set_name(name).map_err(|e| {
                DashboardError::Spreadsheet(format!("failed to set worksheet name: {e}"))
            })?;
        }

        for ((row, col), value) in &self.cells {
            match value {
                CellValue::Text(s) => worksheet.write_string(*row, *col, s),
                CellValue::Number(n) => worksheet.write_number(*row, *col, *n),
            }
            .map_err(|e| DashboardError::Spreadsheet(format!("failed to write cell: {e}")))?;
        }

        Ok(())
    }
}
