#![allow(dead_code)]

mod mock_sis;

pub use mock_sis::{MockSis, SCHOOL_YEAR, TERM_ID, TERM_NAME, TOKEN};

use std::path::Path;

use registrar::sheet::{SheetData, write_sheets};
use registrar::types::EntityKind;

/// Write a workbook with one sheet per `(kind, rows)` using the template headers.
pub fn write_workbook(path: &Path, sheets: &[(EntityKind, Vec<Vec<&str>>)]) {
    let sheets: Vec<SheetData> = sheets
        .iter()
        .map(|(kind, rows)| {
            let rows = rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.to_string()).collect())
                .collect();
            SheetData::for_kind(*kind, rows)
        })
        .collect();
    write_sheets(path, &sheets).expect("write workbook");
}
