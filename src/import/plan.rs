use serde::Serialize;

use super::normalize::ImportBatch;
use super::snapshot::ReferenceSnapshot;
use super::validate::validate;
use super::{Flow, RowStatus, Verdict, requests};
use crate::types::EntityKind;

pub const NO_DATA_ROWS: &str = "No data rows found";

/// Validation results for one entity type.
#[derive(Debug, Clone, Serialize)]
pub struct PhasePreview {
    pub kind: EntityKind,
    pub rows: Vec<RowStatus>,
}

/// What an import would do, shown to the user before anything is created.
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub flow: Flow,
    pub phases: Vec<PhasePreview>,
}

/// The rows a confirmed preview will submit.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub flow: Flow,
    pub batch: ImportBatch,
}

impl ImportPlan {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}

/// Validate a batch phase by phase.
///
/// Rows that will be created in an earlier phase are staged into a working
/// copy of the snapshot, so a strand can reference a track that only exists
/// further up the same workbook.
#[must_use]
pub fn preview(batch: &ImportBatch, snapshot: &ReferenceSnapshot, flow: Flow) -> Preview {
    let mut working = snapshot.clone();
    let mut phases = Vec::new();

    for kind in EntityKind::ORDER {
        if batch.count(kind) == 0 {
            continue;
        }
        let rows = validate(kind, batch, &working, flow);
        stage(kind, batch, &rows, &mut working);
        phases.push(PhasePreview { kind, rows });
    }

    Preview { flow, phases }
}

fn planned_id(kind: EntityKind, row: usize) -> String {
    format!("planned:{}:{row}", kind.sheet_name())
}

fn stage(kind: EntityKind, batch: &ImportBatch, rows: &[RowStatus], working: &mut ReferenceSnapshot) {
    let importable = |status: &&RowStatus| status.is_importable();
    match kind {
        EntityKind::Track => {
            for (r, _) in batch.tracks.iter().zip(rows).filter(|(_, s)| importable(s)) {
                let track = requests::track(r, working).into_track(planned_id(kind, r.row));
                working.add_track(track);
            }
        }
        EntityKind::Strand => {
            for (r, _) in batch.strands.iter().zip(rows).filter(|(_, s)| importable(s)) {
                let strand = requests::strand(r, working).into_strand(planned_id(kind, r.row));
                working.add_strand(strand);
            }
        }
        EntityKind::Section => {
            for (r, _) in batch.sections.iter().zip(rows).filter(|(_, s)| importable(s)) {
                if let Some(req) = requests::section(r, working) {
                    working.add_section(req.into_section(planned_id(kind, r.row)));
                }
            }
        }
        EntityKind::Subject => {
            for (r, _) in batch.subjects.iter().zip(rows).filter(|(_, s)| importable(s)) {
                if let Some(req) = requests::subject(r, working) {
                    working.add_subject(req.into_subject(planned_id(kind, r.row)));
                }
            }
        }
        // Nothing references assignments.
        EntityKind::FacultyAssignment | EntityKind::StudentAssignment => {}
    }
}

impl Preview {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.phases.iter().map(|p| p.rows.len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    fn count(&self, pred: impl Fn(&RowStatus) -> bool) -> usize {
        self.phases
            .iter()
            .flat_map(|p| p.rows.iter())
            .filter(|s| pred(s))
            .count()
    }

    /// Rows that will be created.
    #[must_use]
    pub fn importable_count(&self) -> usize {
        self.count(|s| s.verdict == Verdict::Valid)
    }

    /// Rows already in the system that will be skipped.
    #[must_use]
    pub fn exists_count(&self) -> usize {
        self.count(|s| s.verdict == Verdict::Exists)
    }

    #[must_use]
    pub fn invalid_count(&self) -> usize {
        self.count(|s| !s.is_valid())
    }

    #[must_use]
    pub fn phase(&self, kind: EntityKind) -> Option<&PhasePreview> {
        self.phases.iter().find(|p| p.kind == kind)
    }

    /// Keep the rows marked valid. Rows that already exist stay in the plan so
    /// the report can account for them.
    #[must_use]
    pub fn plan(&self, batch: &ImportBatch) -> ImportPlan {
        fn keep<R: Clone>(records: &[R], phase: Option<&PhasePreview>) -> Vec<R> {
            let Some(phase) = phase else {
                return Vec::new();
            };
            records
                .iter()
                .zip(&phase.rows)
                .filter(|(_, status)| status.is_valid())
                .map(|(r, _)| r.clone())
                .collect()
        }

        ImportPlan {
            flow: self.flow,
            batch: ImportBatch {
                tracks: keep(&batch.tracks, self.phase(EntityKind::Track)),
                strands: keep(&batch.strands, self.phase(EntityKind::Strand)),
                sections: keep(&batch.sections, self.phase(EntityKind::Section)),
                subjects: keep(&batch.subjects, self.phase(EntityKind::Subject)),
                faculty_assignments: keep(
                    &batch.faculty_assignments,
                    self.phase(EntityKind::FacultyAssignment),
                ),
                student_assignments: keep(
                    &batch.student_assignments,
                    self.phase(EntityKind::StudentAssignment),
                ),
            },
        }
    }
}
