use std::path::Path;

use tracing::info;

use super::snapshot::ReferenceSnapshot;
use crate::error::Result;
use crate::sheet::{SheetData, write_sheets};
use crate::types::{EntityKind, RecordStatus};

/// Write the term's active records as a workbook the term import accepts.
pub fn export_term(snapshot: &ReferenceSnapshot, path: &Path) -> Result<()> {
    let sheets = term_sheets(snapshot);
    write_sheets(path, &sheets)?;
    info!(
        "Exported {} rows to {}",
        sheets.iter().map(|s| s.rows.len()).sum::<usize>(),
        path.display()
    );
    Ok(())
}

fn active(status: RecordStatus) -> bool {
    status == RecordStatus::Active
}

fn term_sheets(snapshot: &ReferenceSnapshot) -> Vec<SheetData> {
    EntityKind::ORDER
        .iter()
        .map(|&kind| SheetData::for_kind(kind, rows(kind, snapshot)))
        .collect()
}

/// Rows in the column order of `kind.headers()`.
fn rows(kind: EntityKind, snapshot: &ReferenceSnapshot) -> Vec<Vec<String>> {
    match kind {
        EntityKind::Track => snapshot
            .tracks
            .iter()
            .filter(|t| active(t.status))
            .map(|t| vec![t.track_name.clone()])
            .collect(),
        EntityKind::Strand => snapshot
            .strands
            .iter()
            .filter(|s| active(s.status))
            .map(|s| vec![s.track_name.clone(), s.strand_name.clone()])
            .collect(),
        EntityKind::Section => snapshot
            .sections
            .iter()
            .filter(|s| active(s.status))
            .map(|s| {
                vec![
                    s.track_name.clone(),
                    s.strand_name.clone(),
                    s.section_name.clone(),
                    s.section_code.clone(),
                    s.grade_level.to_string(),
                ]
            })
            .collect(),
        EntityKind::Subject => snapshot
            .subjects
            .iter()
            .filter(|s| active(s.status))
            .map(|s| {
                vec![
                    s.track_name.clone(),
                    s.strand_name.clone(),
                    s.grade_level.to_string(),
                    s.subject_name.clone(),
                ]
            })
            .collect(),
        EntityKind::FacultyAssignment => snapshot
            .faculty_assignments
            .iter()
            .filter(|a| active(a.status))
            .map(|a| {
                // Older records only carry the account id.
                let account = snapshot.faculty_by_id(&a.faculty_id);
                let school_id = if a.faculty_school_id.is_empty() {
                    account.map(|f| f.school_id.clone()).unwrap_or_default()
                } else {
                    a.faculty_school_id.clone()
                };
                let name = if a.faculty_name.is_empty() {
                    account.map(|f| f.full_name()).unwrap_or_default()
                } else {
                    a.faculty_name.clone()
                };
                vec![
                    school_id,
                    name,
                    a.track_name.clone(),
                    a.strand_name.clone(),
                    a.section_name.clone(),
                    a.grade_level.to_string(),
                    a.subject_name.clone(),
                ]
            })
            .collect(),
        EntityKind::StudentAssignment => snapshot
            .student_assignments
            .iter()
            .filter(|a| active(a.status))
            .map(|a| {
                vec![
                    a.student_school_id.clone(),
                    a.first_name.clone(),
                    a.last_name.clone(),
                    a.track_name.clone(),
                    a.strand_name.clone(),
                    a.section_name.clone(),
                    a.grade_level.to_string(),
                    a.enrollment_no.clone().unwrap_or_default(),
                    a.enrollment_date
                        .map(|d| d.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ]
            })
            .collect(),
    }
}
