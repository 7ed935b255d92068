use std::path::{Path, PathBuf};

use crate::import::{ReferenceSnapshot, export_term};

use super::init_client;

pub fn run_export(config_path: &Path, output: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, client) = init_client(config_path)?;
    let scope = config.require_term()?;

    let output = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{} {}.xlsx",
            scope.term_name.trim(),
            scope.school_year.trim()
        ))
    });

    let snapshot = ReferenceSnapshot::fetch(&client, scope, config.registrant_limit);
    export_term(&snapshot, &output)?;

    println!();
    println!(
        "Exported {} {} to {}",
        scope.term_name,
        scope.school_year,
        output.display()
    );
    println!();

    Ok(())
}
