//! # Registrar
//!
//! Validate and import an academic term's structure (tracks, strands,
//! sections, subjects and faculty/student assignments) from Excel workbooks
//! into a school information system, usable both as a standalone binary and
//! as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! registrar = { version = "0.0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::path::Path;
//! use registrar::api::ApiClient;
//! use registrar::import::{Flow, ImportBatch, ReferenceSnapshot, execute, preview};
//! use registrar::sheet::read_workbook;
//!
//! let client = ApiClient::new("https://sis.example.edu", token, "admin")?;
//! let sheets = read_workbook(Path::new("term.xlsx"))?;
//! let batch = ImportBatch::from_workbook(&sheets);
//!
//! let snapshot = ReferenceSnapshot::fetch(&client, &scope, 1000);
//! let preview = preview(&batch, &snapshot, Flow::TermImport);
//! let report = execute(&client, &preview.plan(&batch), &snapshot);
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes CLI module. Disable with `default-features = false`.

pub mod api;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod sheet;
pub mod types;
