use std::path::Path;

use crate::config::{load_config, save_config};
use crate::types::TermScope;

use super::pickers::required_value;

pub fn run_term_use(
    config_path: &Path,
    term_id: Option<String>,
    school_year: Option<String>,
    term: Option<String>,
    quarter: Option<String>,
    non_interactive: bool,
) -> anyhow::Result<()> {
    let term_id = required_value(term_id, "term-id", "Term id:", non_interactive)?;
    let school_year = required_value(school_year, "school-year", "School year:", non_interactive)?;
    let term_name = required_value(term, "term", "Term name:", non_interactive)?;
    let quarter_name = quarter
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty());

    let mut config = load_config(config_path)?;
    let scope = TermScope {
        term_id,
        school_year,
        term_name,
        quarter_name,
    };
    println!();
    println!("Using {}", describe(&scope));
    println!();

    config.term = Some(scope);
    save_config(config_path, &config)?;

    Ok(())
}

pub fn run_term_show(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let scope = config.require_term()?;

    if json {
        println!("{}", serde_json::to_string_pretty(scope)?);
    } else {
        println!();
        println!("{}", describe(scope));
        println!("Term id: {}", scope.term_id);
        println!();
    }

    Ok(())
}

fn describe(scope: &TermScope) -> String {
    match &scope.quarter_name {
        Some(quarter) => format!("{} {}, {quarter}", scope.term_name, scope.school_year),
        None => format!("{} {}", scope.term_name, scope.school_year),
    }
}
