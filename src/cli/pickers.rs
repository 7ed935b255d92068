use inquire::Text;

use crate::import::{ImportReport, Preview, RowStatus, Totals, Verdict};
use crate::types::TermScope;

/// Request confirmation before anything is created
pub fn confirm_action(message: &str, yes: bool, non_interactive: bool) -> anyhow::Result<bool> {
    if yes {
        Ok(true)
    } else if non_interactive {
        anyhow::bail!("--yes is required to import in non-interactive mode");
    } else {
        Ok(inquire::Confirm::new(message)
            .with_default(false)
            .prompt()?)
    }
}

/// Use the flag value, or prompt for it unless running non-interactively.
pub fn required_value(
    value: Option<String>,
    flag: &str,
    prompt: &str,
    non_interactive: bool,
) -> anyhow::Result<String> {
    let value = match value {
        Some(v) => v,
        None if non_interactive => {
            anyhow::bail!("--{flag} is required in non-interactive mode");
        }
        None => Text::new(prompt)
            .with_validator(|input: &str| {
                if input.trim().is_empty() {
                    Ok(inquire::validator::Validation::Invalid(
                        "A value is required".into(),
                    ))
                } else {
                    Ok(inquire::validator::Validation::Valid)
                }
            })
            .prompt()?,
    };

    let value = value.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("--{flag} cannot be empty");
    }
    Ok(value)
}

fn status_label(status: &RowStatus) -> &'static str {
    match status.verdict {
        Verdict::Valid => "ok",
        Verdict::Exists => "skip",
        Verdict::Invalid(_) => "error",
    }
}

pub fn print_preview(preview: &Preview) {
    for phase in &preview.phases {
        println!();
        println!("{} ({} rows)", phase.kind.sheet_name(), phase.rows.len());
        println!("{}", "─".repeat(40));
        for status in &phase.rows {
            println!(
                "  row {:<5} {:<6} {}",
                status.row,
                status_label(status),
                status.message
            );
        }
    }

    println!();
    println!(
        "{} to import, {} already exist, {} invalid",
        preview.importable_count(),
        preview.exists_count(),
        preview.invalid_count()
    );
    println!();
}

pub fn print_report(report: &ImportReport) {
    println!();
    println!(
        "Imported {} rows, skipped {}",
        report.imported_count(),
        report.skipped_count()
    );
    for message in report.skipped_messages() {
        println!("  {message}");
    }
    println!();
}

pub fn print_totals(scope: &TermScope, totals: &Totals) {
    println!("{} {} now has {totals}", scope.term_name, scope.school_year);
    println!();
}
