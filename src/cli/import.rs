use std::path::Path;

use serde::Serialize;

use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::import::{
    Flow, ImportBatch, ImportReport, NO_DATA_ROWS, Preview, ReferenceSnapshot, Totals, execute,
    preview,
};
use crate::sheet::{read_sheet, read_workbook};

use super::commands::UploadArgs;
use super::init_client;
use super::pickers::{confirm_action, print_preview, print_report, print_totals};

#[derive(Serialize)]
struct ImportOutput<'a> {
    preview: &'a Preview,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ImportReport>,
    /// Record counts re-read from the system after the import.
    #[serde(skip_serializing_if = "Option::is_none")]
    totals: Option<Totals>,
}

impl<'a> ImportOutput<'a> {
    fn preview(preview: &'a Preview) -> Self {
        Self {
            preview,
            report: None,
            totals: None,
        }
    }
}

fn read_batch(args: &UploadArgs) -> anyhow::Result<(ImportBatch, Flow)> {
    match args.target.kind() {
        Some(kind) => {
            let rows = read_sheet(&args.file, args.sheet.as_deref())?;
            Ok((ImportBatch::from_sheet(kind, &rows), Flow::Standalone))
        }
        None => {
            let sheets = read_workbook(&args.file)?;
            Ok((ImportBatch::from_workbook(&sheets), Flow::TermImport))
        }
    }
}

struct Prepared {
    config: ClientConfig,
    client: ApiClient,
    batch: ImportBatch,
    snapshot: ReferenceSnapshot,
    preview: Preview,
}

/// Read, fetch and validate. `None` when the workbook has no data rows.
fn prepare(config_path: &Path, args: &UploadArgs) -> anyhow::Result<Option<Prepared>> {
    let (config, client) = init_client(config_path)?;
    let scope = config.require_term()?.clone();

    let (batch, flow) = read_batch(args)?;
    if batch.is_empty() {
        if args.json {
            // Keep stdout parseable
            eprintln!("{NO_DATA_ROWS} in {}", args.file.display());
            let empty = Preview {
                flow,
                phases: Vec::new(),
            };
            println!("{}", serde_json::to_string_pretty(&ImportOutput::preview(&empty))?);
        } else {
            println!("{NO_DATA_ROWS} in {}", args.file.display());
        }
        return Ok(None);
    }

    let snapshot = ReferenceSnapshot::fetch(&client, &scope, config.registrant_limit);
    let preview = preview(&batch, &snapshot, flow);

    Ok(Some(Prepared {
        config,
        client,
        batch,
        snapshot,
        preview,
    }))
}

/// Preview only; fails when any row is invalid so scripts can gate on it.
pub fn run_validate(config_path: &Path, args: &UploadArgs) -> anyhow::Result<()> {
    let Some(prepared) = prepare(config_path, args)? else {
        return Ok(());
    };
    let preview = &prepared.preview;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&ImportOutput::preview(preview))?);
    } else {
        print_preview(preview);
    }

    if preview.invalid_count() > 0 {
        anyhow::bail!(
            "{} of {} rows are invalid",
            preview.invalid_count(),
            preview.row_count()
        );
    }

    Ok(())
}

pub fn run_import(
    config_path: &Path,
    args: &UploadArgs,
    yes: bool,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let Some(prepared) = prepare(config_path, args)? else {
        return Ok(());
    };
    let Prepared {
        config,
        client,
        batch,
        snapshot,
        preview,
    } = prepared;

    if !args.json {
        print_preview(&preview);
    }

    if preview.importable_count() == 0 {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&ImportOutput::preview(&preview))?);
        } else {
            println!("Nothing to import.");
        }
        return Ok(());
    }

    let scope = &snapshot.scope;
    let confirmed = confirm_action(
        &format!(
            "Import {} rows into {} {}?",
            preview.importable_count(),
            scope.term_name,
            scope.school_year
        ),
        yes,
        non_interactive,
    )?;

    if !confirmed {
        println!("Cancelled.");
        return Ok(());
    }

    let plan = preview.plan(&batch);
    let report = execute(&client, &plan, &snapshot);

    // The system changed; re-read it for the new totals
    let totals = ReferenceSnapshot::fetch(&client, scope, config.registrant_limit).totals();

    if args.json {
        let output = ImportOutput {
            preview: &preview,
            report: Some(&report),
            totals: Some(totals),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report);
        print_totals(scope, &totals);
    }

    Ok(())
}
