//! Row validators. Each record is checked in a fixed order and stops at the
//! first failure: required fields, formats, references (track, strand,
//! section, then subject/people), duplicates within the file, duplicates in
//! the system, then entity-specific rules.

mod assignment;
mod structure;

pub use assignment::{validate_faculty_assignments, validate_student_assignments};
pub use structure::{validate_sections, validate_strands, validate_subjects, validate_tracks};

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;

use super::normalize::ImportBatch;
use super::snapshot::ReferenceSnapshot;
use super::{Flow, Issue, RowStatus, Verdict};
use crate::types::{EntityKind, GradeLevel, Section, Strand, Subject, Track};

/// Validate every record of one entity type in `batch`.
#[must_use]
pub fn validate(
    kind: EntityKind,
    batch: &ImportBatch,
    snapshot: &ReferenceSnapshot,
    flow: Flow,
) -> Vec<RowStatus> {
    match kind {
        EntityKind::Track => validate_tracks(&batch.tracks, snapshot, flow),
        EntityKind::Strand => validate_strands(&batch.strands, snapshot, flow),
        EntityKind::Section => validate_sections(&batch.sections, snapshot, flow),
        EntityKind::Subject => validate_subjects(&batch.subjects, snapshot, flow),
        EntityKind::FacultyAssignment => {
            validate_faculty_assignments(&batch.faculty_assignments, snapshot, flow)
        }
        EntityKind::StudentAssignment => {
            validate_student_assignments(&batch.student_assignments, snapshot, flow)
        }
    }
}

#[derive(Debug)]
pub(crate) struct Rejection {
    issue: Issue,
    message: String,
}

type Check<T> = std::result::Result<T, Rejection>;

fn reject(issue: Issue, message: impl Into<String>) -> Rejection {
    Rejection {
        issue,
        message: message.into(),
    }
}

fn not_found(what: String) -> Rejection {
    reject(
        Issue::ReferenceNotFound,
        format!("{what} does not exist or is not active"),
    )
}

/// A row that passed every check.
struct Accepted {
    verdict: Verdict,
    message: String,
    faculty_id: Option<String>,
    student_id: Option<String>,
}

impl Accepted {
    fn valid(message: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Valid,
            message: message.into(),
            faculty_id: None,
            student_id: None,
        }
    }

    fn with_faculty(mut self, id: &str) -> Self {
        self.faculty_id = Some(id.to_string());
        self
    }

    fn with_student(mut self, id: Option<&str>) -> Self {
        self.student_id = id.map(str::to_string);
        self
    }
}

const READY: &str = "Ready to import";

/// Apply the flow's policy for a record that may already be in the system.
fn existing(flow: Flow, exists: bool, what: &str) -> Check<Accepted> {
    if !exists {
        return Ok(Accepted::valid(READY));
    }
    match flow {
        Flow::Standalone => Err(reject(
            Issue::AlreadyExists,
            format!("{what} already exists"),
        )),
        Flow::TermImport => Ok(Accepted {
            verdict: Verdict::Exists,
            message: format!("{what} already exists, will be skipped"),
            faculty_id: None,
            student_id: None,
        }),
    }
}

fn finish(row: usize, check: Check<Accepted>) -> RowStatus {
    match check {
        Ok(accepted) => RowStatus {
            row,
            verdict: accepted.verdict,
            message: accepted.message,
            faculty_id: accepted.faculty_id,
            student_id: accepted.student_id,
        },
        Err(rejection) => RowStatus {
            row,
            verdict: Verdict::Invalid(rejection.issue),
            message: rejection.message,
            faculty_id: None,
            student_id: None,
        },
    }
}

fn required(value: &str, field: &str) -> Check<()> {
    if value.trim().is_empty() {
        Err(reject(Issue::MissingField, format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn grade(value: &str) -> Check<GradeLevel> {
    value
        .parse()
        .map_err(|message: String| reject(Issue::Format, message))
}

/// Accepts `YYYY-MM-DD` and `MM/DD/YYYY`.
pub(crate) fn parse_enrollment_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%m/%d/%Y"))
        .ok()
}

/// Remembers the first row each key was seen on; later rows with the same key are duplicates.
struct BatchKeys<K> {
    seen: HashMap<K, usize>,
}

impl<K: Hash + Eq> BatchKeys<K> {
    fn new() -> Self {
        Self {
            seen: HashMap::new(),
        }
    }

    fn claim(&mut self, key: K, row: usize) -> Check<()> {
        if let Some(first) = self.seen.get(&key) {
            return Err(reject(
                Issue::DuplicateInBatch,
                format!("Duplicate of row {first} in this file"),
            ));
        }
        self.seen.insert(key, row);
        Ok(())
    }
}

fn require_track<'a>(snapshot: &'a ReferenceSnapshot, track: &str) -> Check<&'a Track> {
    snapshot
        .track(track)
        .ok_or_else(|| not_found(format!("Track '{track}'")))
}

fn require_strand<'a>(
    snapshot: &'a ReferenceSnapshot,
    track: &str,
    strand: &str,
) -> Check<&'a Strand> {
    snapshot
        .strand(track, strand)
        .ok_or_else(|| not_found(format!("Strand '{strand}' under track '{track}'")))
}

fn require_section<'a>(
    snapshot: &'a ReferenceSnapshot,
    track: &str,
    strand: &str,
    section: &str,
    grade: GradeLevel,
) -> Check<&'a Section> {
    snapshot
        .section(track, strand, section, grade)
        .ok_or_else(|| not_found(format!("Section '{section}' ({grade}) under {track} / {strand}")))
}

fn require_subject<'a>(
    snapshot: &'a ReferenceSnapshot,
    track: &str,
    strand: &str,
    grade: GradeLevel,
    subject: &str,
) -> Check<&'a Subject> {
    snapshot
        .subject(track, strand, grade, subject)
        .ok_or_else(|| not_found(format!("Subject '{subject}' for {track} / {strand} ({grade})")))
}
