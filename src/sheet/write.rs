use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::error::Result;
use crate::types::EntityKind;

const MIN_COLUMN_WIDTH: usize = 14;

/// One worksheet to write: a bold header row followed by data rows.
#[derive(Debug, Clone)]
pub struct SheetData {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetData {
    #[must_use]
    pub fn for_kind(kind: EntityKind, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: kind.sheet_name().to_string(),
            headers: kind.headers().iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

/// Write a blank upload template for a single entity type.
pub fn write_template(kind: EntityKind, path: &Path) -> Result<()> {
    write_sheets(path, &[SheetData::for_kind(kind, Vec::new())])
}

/// Write a blank term workbook with one sheet per entity type.
pub fn write_term_template(path: &Path) -> Result<()> {
    let sheets: Vec<SheetData> = EntityKind::ORDER
        .iter()
        .map(|kind| SheetData::for_kind(*kind, Vec::new()))
        .collect();
    write_sheets(path, &sheets)
}

pub fn write_sheets(path: &Path, sheets: &[SheetData]) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            let col = col as u16;
            worksheet.write_string_with_format(0, col, header, &bold)?;

            let widest = sheet
                .rows
                .iter()
                .filter_map(|row| row.get(col as usize))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
                .max(MIN_COLUMN_WIDTH);
            worksheet.set_column_width(col, widest as f64 + 2.0)?;
        }

        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let excel_row = row_idx as u32 + 1;
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet.write_string(excel_row, col as u16, value)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
