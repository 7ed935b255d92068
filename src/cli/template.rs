use std::path::PathBuf;

use crate::sheet::{write_template, write_term_template};

use super::ImportTarget;

pub fn run_template(target: ImportTarget, output: Option<PathBuf>) -> anyhow::Result<()> {
    let output =
        output.unwrap_or_else(|| PathBuf::from(format!("{}-template.xlsx", target.file_stem())));

    match target.kind() {
        Some(kind) => write_template(kind, &output)?,
        None => write_term_template(&output)?,
    }

    println!();
    println!("Wrote template to {}", output.display());
    println!();

    Ok(())
}
