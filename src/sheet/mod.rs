//! Workbook reading and writing.
//!
//! Reading goes through calamine so `.xlsx`, `.xls`, `.xlsb` and `.ods` all
//! work; writing produces `.xlsx` only.

mod header;
mod write;

pub use header::{HeaderMatch, fuzzy_match, locate_header};
pub use write::{SheetData, write_sheets, write_template, write_term_template};

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use crate::error::{Error, Result};

/// A sheet rendered as rows of trimmed cell text.
pub type Rows = Vec<Vec<String>>;

/// Read every sheet of a workbook, in workbook order.
pub fn read_workbook(path: &Path) -> Result<Vec<(String, Rows)>> {
    let mut workbook = open_workbook_auto(path)?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        sheets.push((name, rows));
    }
    Ok(sheets)
}

/// Read one sheet. Without a name the first sheet is used.
pub fn read_sheet(path: &Path, sheet: Option<&str>) -> Result<Rows> {
    let sheets = read_workbook(path)?;
    if sheets.is_empty() {
        return Err(Error::BadRequest(format!(
            "{} contains no sheets",
            path.display()
        )));
    }

    match sheet {
        None => Ok(sheets.into_iter().next().map(|(_, rows)| rows).unwrap_or_default()),
        Some(wanted) => {
            let index = find_sheet(sheets.iter().map(|(name, _)| name.as_str()), wanted)
                .ok_or_else(|| Error::NotFound(format!("sheet '{wanted}'")))?;
            Ok(sheets.into_iter().nth(index).map(|(_, rows)| rows).unwrap_or_default())
        }
    }
}

/// Index of the sheet named `wanted`: exact (case-insensitive) first, then by containment.
pub fn find_sheet<'a>(names: impl Iterator<Item = &'a str> + Clone, wanted: &str) -> Option<usize> {
    names
        .clone()
        .position(|name| name.trim().eq_ignore_ascii_case(wanted.trim()))
        .or_else(|| names.clone().position(|name| fuzzy_match(name, wanted)))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(n) => n.to_string(),
        Data::Float(f) => format_float(*f),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR({e:?})"),
        // calamine applies the workbook's 1900 or 1904 date system
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| format_float(dt.as_f64())),
        Data::DateTimeIso(s) => s.trim().to_string(),
        Data::DurationIso(s) => s.trim().to_string(),
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{f}")
    }
}
