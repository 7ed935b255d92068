use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::normalize::Record;
use super::plan::ImportPlan;
use super::snapshot::ReferenceSnapshot;
use super::validate::validate;
use super::{RowStatus, Verdict, requests};
use crate::api::SisApi;
use crate::error::Error;
use crate::types::EntityKind;

const ALREADY_EXISTS: &str = "already exists";

#[derive(Debug, Clone, Serialize)]
pub struct CreatedRow {
    pub kind: EntityKind,
    pub row: usize,
    pub label: String,
    pub id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRow {
    pub kind: EntityKind,
    pub row: usize,
    pub label: String,
    pub reason: String,
}

impl SkippedRow {
    /// One line for the end-of-import summary.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{} row {} ({}): {}",
            self.kind.sheet_name(),
            self.row,
            self.label,
            self.reason
        )
    }
}

/// Outcome of an import. Every planned row ends up in exactly one list.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub run_id: String,
    pub created: Vec<CreatedRow>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    #[must_use]
    pub fn imported_count(&self) -> usize {
        self.created.len()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    #[must_use]
    pub fn skipped_messages(&self) -> Vec<String> {
        self.skipped.iter().map(SkippedRow::message).collect()
    }

    #[must_use]
    pub fn created_of(&self, kind: EntityKind) -> usize {
        self.created.iter().filter(|c| c.kind == kind).count()
    }
}

/// Create the planned rows one at a time, parents before children.
///
/// Each phase is validated again against a working snapshot that includes
/// everything created so far. A row whose parent failed to be created is
/// skipped with the validation message instead of being sent.
pub fn execute<A: SisApi + ?Sized>(
    api: &A,
    plan: &ImportPlan,
    snapshot: &ReferenceSnapshot,
) -> ImportReport {
    let run_id = Uuid::new_v4().to_string();
    let mut run = Run {
        api,
        working: snapshot.clone(),
        report: ImportReport {
            run_id: run_id.clone(),
            created: Vec::new(),
            skipped: Vec::new(),
        },
    };

    for kind in EntityKind::ORDER {
        let count = plan.batch.count(kind);
        if count == 0 {
            continue;
        }
        info!(run_id = %run_id, "Importing {count} {} rows", kind.label());
        let statuses = validate(kind, &plan.batch, &run.working, plan.flow);
        run.phase(kind, plan, &statuses);
    }

    info!(
        run_id = %run_id,
        "Import finished: {} created, {} skipped",
        run.report.imported_count(),
        run.report.skipped_count()
    );
    run.report
}

struct Run<'a, A: ?Sized> {
    api: &'a A,
    working: ReferenceSnapshot,
    report: ImportReport,
}

impl<A: SisApi + ?Sized> Run<'_, A> {
    fn phase(&mut self, kind: EntityKind, plan: &ImportPlan, statuses: &[RowStatus]) {
        let batch = &plan.batch;
        match kind {
            EntityKind::Track => {
                for (r, status) in batch.tracks.iter().zip(statuses) {
                    if self.admit(r, status) {
                        let req = requests::track(r, &self.working);
                        match self.api.create_track(&req) {
                            Ok(track) => {
                                self.created(r, &track.id);
                                self.working.add_track(track);
                            }
                            Err(e) => self.failed(r, &e),
                        }
                    }
                }
            }
            EntityKind::Strand => {
                for (r, status) in batch.strands.iter().zip(statuses) {
                    if self.admit(r, status) {
                        let req = requests::strand(r, &self.working);
                        match self.api.create_strand(&req) {
                            Ok(strand) => {
                                self.created(r, &strand.id);
                                self.working.add_strand(strand);
                            }
                            Err(e) => self.failed(r, &e),
                        }
                    }
                }
            }
            EntityKind::Section => {
                for (r, status) in batch.sections.iter().zip(statuses) {
                    if !self.admit(r, status) {
                        continue;
                    }
                    let Some(req) = requests::section(r, &self.working) else {
                        self.skip(r, "Grade Level is invalid".to_string());
                        continue;
                    };
                    match self.api.create_section(&req) {
                        Ok(section) => {
                            self.created(r, &section.id);
                            self.working.add_section(section);
                        }
                        Err(e) => self.failed(r, &e),
                    }
                }
            }
            EntityKind::Subject => {
                for (r, status) in batch.subjects.iter().zip(statuses) {
                    if !self.admit(r, status) {
                        continue;
                    }
                    let Some(req) = requests::subject(r, &self.working) else {
                        self.skip(r, "Grade Level is invalid".to_string());
                        continue;
                    };
                    match self.api.create_subject(&req) {
                        Ok(subject) => {
                            self.created(r, &subject.id);
                            self.working.add_subject(subject);
                        }
                        Err(e) => self.failed(r, &e),
                    }
                }
            }
            EntityKind::FacultyAssignment => {
                for (r, status) in batch.faculty_assignments.iter().zip(statuses) {
                    if !self.admit(r, status) {
                        continue;
                    }
                    let Some(req) = status
                        .faculty_id
                        .as_deref()
                        .and_then(|id| requests::faculty_assignment(r, id, &self.working))
                    else {
                        self.skip(r, "Grade Level is invalid".to_string());
                        continue;
                    };
                    match self.api.create_faculty_assignment(&req) {
                        Ok(assignment) => {
                            self.created(r, &assignment.id);
                            self.working.add_faculty_assignment(assignment);
                        }
                        Err(e) => self.failed(r, &e),
                    }
                }
            }
            EntityKind::StudentAssignment => {
                for (r, status) in batch.student_assignments.iter().zip(statuses) {
                    if !self.admit(r, status) {
                        continue;
                    }
                    let Some(req) =
                        requests::student_assignment(r, status.student_id.as_deref(), &self.working)
                    else {
                        self.skip(r, "Grade Level is invalid".to_string());
                        continue;
                    };
                    match self.api.create_student_assignment(&req) {
                        Ok(assignment) => {
                            self.created(r, &assignment.id);
                            self.working.add_student_assignment(assignment);
                        }
                        Err(e) => self.failed(r, &e),
                    }
                }
            }
        }
    }

    /// Whether the row should be sent; rows that should not are recorded as skipped.
    fn admit<R: Record>(&mut self, r: &R, status: &RowStatus) -> bool {
        match status.verdict {
            Verdict::Valid => true,
            Verdict::Exists => {
                self.skip(r, ALREADY_EXISTS.to_string());
                false
            }
            Verdict::Invalid(_) => {
                self.skip(r, status.message.clone());
                false
            }
        }
    }

    fn skip<R: Record>(&mut self, r: &R, reason: String) {
        warn!(
            run_id = %self.report.run_id,
            "Skipped {} row {} ({}): {reason}",
            R::KIND.label(),
            r.row(),
            r.label()
        );
        self.report.skipped.push(SkippedRow {
            kind: R::KIND,
            row: r.row(),
            label: r.label(),
            reason,
        });
    }

    fn failed<R: Record>(&mut self, r: &R, err: &Error) {
        let reason = match err {
            e if e.is_already_exists() => ALREADY_EXISTS.to_string(),
            Error::Api { message, .. } => message.clone(),
            e => e.to_string(),
        };
        self.skip(r, reason);
    }

    fn created<R: Record>(&mut self, r: &R, id: &str) {
        let scope = &self.working.scope;
        info!(run_id = %self.report.run_id, "Created {} '{}' ({id})", R::KIND.label(), r.label());
        self.api.record_audit(
            &format!("Import {}", R::KIND.label()),
            &format!(
                "Created {} '{}' for {} {} (import {})",
                R::KIND.label(),
                r.label(),
                scope.term_name,
                scope.school_year,
                self.report.run_id
            ),
        );
        self.report.created.push(CreatedRow {
            kind: R::KIND,
            row: r.row(),
            label: r.label(),
            id: id.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::fake::{FakeApi, approved, scope, seeded_api, track};
    use crate::import::normalize::{
        FacultyAssignmentRecord, ImportBatch, StrandRecord, StudentAssignmentRecord, TrackRecord,
    };
    use crate::import::{Flow, preview};

    fn strands(names: &[(&str, &str)]) -> Vec<StrandRecord> {
        names
            .iter()
            .enumerate()
            .map(|(i, (track, strand))| StrandRecord {
                row: i + 2,
                track_name: track.to_string(),
                strand_name: strand.to_string(),
            })
            .collect()
    }

    fn run(api: &FakeApi, batch: &ImportBatch, flow: Flow) -> ImportReport {
        let snapshot = ReferenceSnapshot::fetch(api, &scope(), 100);
        let preview = preview(batch, &snapshot, flow);
        let plan = preview.plan(batch);
        execute(api, &plan, &snapshot)
    }

    #[test]
    fn test_only_valid_rows_are_created() {
        let api = seeded_api();
        let batch = ImportBatch {
            strands: strands(&[("Academic", "HUMSS"), ("Academic", "ABM"), ("Sports", "Coaching")]),
            ..ImportBatch::default()
        };

        let report = run(&api, &batch, Flow::Standalone);

        assert_eq!(report.imported_count(), 2);
        assert_eq!(report.skipped_count(), 0);
        assert_eq!(api.state().strands.len(), 3);
        assert_eq!(api.state().audits.len(), 2);
    }

    #[test]
    fn test_failed_create_is_skipped_and_run_continues() {
        let api = seeded_api();
        api.reject("HUMSS");
        let batch = ImportBatch {
            strands: strands(&[("Academic", "HUMSS"), ("Academic", "ABM")]),
            ..ImportBatch::default()
        };

        let report = run(&api, &batch, Flow::Standalone);

        assert_eq!(report.imported_count(), 1);
        assert_eq!(report.created[0].label, "Academic / ABM");
        assert_eq!(report.skipped[0].reason, "Database unavailable");
        assert!(report.skipped_messages()[0].contains("row 2"));
    }

    #[test]
    fn test_child_of_failed_parent_is_skipped() {
        let api = FakeApi::new();
        api.reject("TVL");
        let batch = ImportBatch {
            tracks: vec![TrackRecord { row: 2, track_name: "TVL".to_string() }],
            strands: strands(&[("TVL", "ICT")]),
            ..ImportBatch::default()
        };

        let report = run(&api, &batch, Flow::TermImport);

        assert_eq!(report.imported_count(), 0);
        assert_eq!(report.skipped_count(), 2);
        assert_eq!(report.skipped[1].kind, EntityKind::Strand);
        assert!(report.skipped[1].reason.contains("does not exist"));
        assert!(api.state().strands.is_empty());
    }

    #[test]
    fn test_children_use_parents_created_in_same_run() {
        let api = FakeApi::new();
        let batch = ImportBatch {
            tracks: vec![TrackRecord { row: 2, track_name: "TVL".to_string() }],
            strands: strands(&[("tvl", "ICT")]),
            ..ImportBatch::default()
        };

        let report = run(&api, &batch, Flow::TermImport);

        assert_eq!(report.imported_count(), 2);
        assert_eq!(api.state().strands[0].track_name, "TVL");
    }

    #[test]
    fn test_term_import_is_rerunnable() {
        let api = seeded_api();
        let batch = ImportBatch {
            tracks: vec![
                TrackRecord { row: 2, track_name: "Academic".to_string() },
                TrackRecord { row: 3, track_name: "TVL".to_string() },
            ],
            strands: strands(&[("TVL", "ICT")]),
            ..ImportBatch::default()
        };

        let first = run(&api, &batch, Flow::TermImport);
        assert_eq!(first.imported_count(), 2);
        assert_eq!(first.skipped[0].reason, ALREADY_EXISTS);

        let second = run(&api, &batch, Flow::TermImport);
        assert_eq!(second.imported_count(), 0);
        assert_eq!(second.skipped_count(), 3);
        assert!(second.skipped.iter().all(|s| s.reason == ALREADY_EXISTS));
    }

    #[test]
    fn test_conflict_with_server_counts_as_already_exists() {
        let api = FakeApi::new();
        let batch = ImportBatch {
            tracks: vec![TrackRecord { row: 2, track_name: "TVL".to_string() }],
            ..ImportBatch::default()
        };
        let snapshot = ReferenceSnapshot::fetch(&api, &scope(), 100);
        let plan = preview(&batch, &snapshot, Flow::Standalone).plan(&batch);

        // Someone else creates the track between preview and execute.
        api.state().tracks.push(track("t9", "TVL"));
        let report = execute(&api, &plan, &snapshot);

        assert_eq!(report.imported_count(), 0);
        assert_eq!(report.skipped[0].reason, ALREADY_EXISTS);
    }

    #[test]
    fn test_assignments_are_created_with_resolved_ids() {
        let api = seeded_api();
        api.state().registrants.push(approved("25-00017"));
        let batch = ImportBatch {
            faculty_assignments: vec![FacultyAssignmentRecord {
                row: 2,
                faculty_school_id: "F001".to_string(),
                faculty_name: String::new(),
                track_name: "academic".to_string(),
                strand_name: "stem".to_string(),
                section_name: "newton".to_string(),
                grade_level: "Grade 11".to_string(),
                subject_name: "general mathematics".to_string(),
            }],
            student_assignments: vec![StudentAssignmentRecord {
                row: 2,
                student_school_id: "25-00017".to_string(),
                first_name: "Ana".to_string(),
                last_name: "Reyes".to_string(),
                track_name: "Academic".to_string(),
                strand_name: "STEM".to_string(),
                section_name: "Newton".to_string(),
                grade_level: "Grade 11".to_string(),
                enrollment_no: "EN-1".to_string(),
                enrollment_date: "2025-06-16".to_string(),
            }],
            ..ImportBatch::default()
        };

        let report = run(&api, &batch, Flow::Standalone);
        assert_eq!(report.imported_count(), 2);

        let state = api.state();
        let faculty = &state.faculty_assignments[0];
        assert_eq!(faculty.faculty_id, "u-f1");
        assert_eq!(faculty.faculty_name, "Maria Santos");
        assert_eq!(faculty.subject_name, "General Mathematics");
        assert_eq!(faculty.section_name, "Newton");
        assert_eq!(faculty.term_id, "term-1");

        let student = &state.student_assignments[0];
        assert_eq!(student.student_id.as_deref(), Some("u-s1"));
        assert_eq!(student.enrollment_no.as_deref(), Some("EN-1"));
    }
}
