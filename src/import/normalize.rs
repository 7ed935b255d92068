//! Row normalization: header-indexed sheet rows into typed records.

use serde::Serialize;

use crate::sheet::{HeaderMatch, Rows, find_sheet, locate_header};
use crate::types::EntityKind;

const TRACK: &[&str] = &["Track Name", "Track Name to Add", "Track"];
const STRAND: &[&str] = &["Strand Name", "Strand Name to Add", "Strand"];
const SECTION: &[&str] = &["Section Name", "Section Name to Add", "Section"];
const SECTION_CODE: &[&str] = &["Section Code", "Code"];
const GRADE: &[&str] = &["Grade Level", "Grade", "Year Level"];
const SUBJECT: &[&str] = &["Subject Name", "Subject Name to Add", "Subject"];
const FACULTY_ID: &[&str] = &["Faculty School ID", "Faculty ID", "School ID"];
const FACULTY_NAME: &[&str] = &["Faculty Name", "Teacher Name", "Instructor Name"];
const STUDENT_ID: &[&str] = &["Student School ID", "Student ID", "School ID"];
const FIRST_NAME: &[&str] = &["First Name", "Firstname", "Given Name"];
const LAST_NAME: &[&str] = &["Last Name", "Lastname", "Surname"];
const ENROLLMENT_NO: &[&str] = &["Enrollment No", "Enrollment No.", "Enrollment Number"];
const ENROLLMENT_DATE: &[&str] = &["Enrollment Date", "Date Enrolled"];

/// A typed sheet row. `row` is the 1-based spreadsheet row number.
pub trait Record: Sized {
    const KIND: EntityKind;
    /// Header aliases for each field, in the order `from_values` receives them.
    const FIELDS: &'static [&'static [&'static str]];

    fn from_values(row: usize, values: Vec<String>) -> Self;
    fn row(&self) -> usize;
    /// Short human-readable description used in reports.
    fn label(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackRecord {
    pub row: usize,
    pub track_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrandRecord {
    pub row: usize,
    pub track_name: String,
    pub strand_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionRecord {
    pub row: usize,
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    pub section_code: String,
    pub grade_level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectRecord {
    pub row: usize,
    pub track_name: String,
    pub strand_name: String,
    pub grade_level: String,
    pub subject_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacultyAssignmentRecord {
    pub row: usize,
    pub faculty_school_id: String,
    pub faculty_name: String,
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    pub grade_level: String,
    pub subject_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentAssignmentRecord {
    pub row: usize,
    pub student_school_id: String,
    pub first_name: String,
    pub last_name: String,
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    pub grade_level: String,
    pub enrollment_no: String,
    pub enrollment_date: String,
}

/// Pops values in field order.
struct Values(std::vec::IntoIter<String>);

impl Values {
    fn next(&mut self) -> String {
        self.0.next().unwrap_or_default()
    }
}

impl Record for TrackRecord {
    const KIND: EntityKind = EntityKind::Track;
    const FIELDS: &'static [&'static [&'static str]] = &[TRACK];

    fn from_values(row: usize, values: Vec<String>) -> Self {
        let mut v = Values(values.into_iter());
        Self {
            row,
            track_name: v.next(),
        }
    }

    fn row(&self) -> usize {
        self.row
    }

    fn label(&self) -> String {
        self.track_name.clone()
    }
}

impl Record for StrandRecord {
    const KIND: EntityKind = EntityKind::Strand;
    const FIELDS: &'static [&'static [&'static str]] = &[TRACK, STRAND];

    fn from_values(row: usize, values: Vec<String>) -> Self {
        let mut v = Values(values.into_iter());
        Self {
            row,
            track_name: v.next(),
            strand_name: v.next(),
        }
    }

    fn row(&self) -> usize {
        self.row
    }

    fn label(&self) -> String {
        format!("{} / {}", self.track_name, self.strand_name)
    }
}

impl Record for SectionRecord {
    const KIND: EntityKind = EntityKind::Section;
    const FIELDS: &'static [&'static [&'static str]] =
        &[TRACK, STRAND, SECTION, SECTION_CODE, GRADE];

    fn from_values(row: usize, values: Vec<String>) -> Self {
        let mut v = Values(values.into_iter());
        Self {
            row,
            track_name: v.next(),
            strand_name: v.next(),
            section_name: v.next(),
            section_code: v.next(),
            grade_level: v.next(),
        }
    }

    fn row(&self) -> usize {
        self.row
    }

    fn label(&self) -> String {
        format!("{} ({})", self.section_name, self.grade_level)
    }
}

impl Record for SubjectRecord {
    const KIND: EntityKind = EntityKind::Subject;
    const FIELDS: &'static [&'static [&'static str]] = &[TRACK, STRAND, GRADE, SUBJECT];

    fn from_values(row: usize, values: Vec<String>) -> Self {
        let mut v = Values(values.into_iter());
        Self {
            row,
            track_name: v.next(),
            strand_name: v.next(),
            grade_level: v.next(),
            subject_name: v.next(),
        }
    }

    fn row(&self) -> usize {
        self.row
    }

    fn label(&self) -> String {
        self.subject_name.clone()
    }
}

impl Record for FacultyAssignmentRecord {
    const KIND: EntityKind = EntityKind::FacultyAssignment;
    const FIELDS: &'static [&'static [&'static str]] = &[
        FACULTY_ID,
        FACULTY_NAME,
        TRACK,
        STRAND,
        SECTION,
        GRADE,
        SUBJECT,
    ];

    fn from_values(row: usize, values: Vec<String>) -> Self {
        let mut v = Values(values.into_iter());
        Self {
            row,
            faculty_school_id: v.next(),
            faculty_name: v.next(),
            track_name: v.next(),
            strand_name: v.next(),
            section_name: v.next(),
            grade_level: v.next(),
            subject_name: v.next(),
        }
    }

    fn row(&self) -> usize {
        self.row
    }

    fn label(&self) -> String {
        format!(
            "{}: {} in {}",
            self.faculty_school_id, self.subject_name, self.section_name
        )
    }
}

impl Record for StudentAssignmentRecord {
    const KIND: EntityKind = EntityKind::StudentAssignment;
    const FIELDS: &'static [&'static [&'static str]] = &[
        STUDENT_ID,
        FIRST_NAME,
        LAST_NAME,
        TRACK,
        STRAND,
        SECTION,
        GRADE,
        ENROLLMENT_NO,
        ENROLLMENT_DATE,
    ];

    fn from_values(row: usize, values: Vec<String>) -> Self {
        let mut v = Values(values.into_iter());
        Self {
            row,
            student_school_id: v.next(),
            first_name: v.next(),
            last_name: v.next(),
            track_name: v.next(),
            strand_name: v.next(),
            section_name: v.next(),
            grade_level: v.next(),
            enrollment_no: v.next(),
            enrollment_date: v.next(),
        }
    }

    fn row(&self) -> usize {
        self.row
    }

    fn label(&self) -> String {
        format!("{} in {}", self.student_school_id, self.section_name)
    }
}

/// Locate the header and map every data row below it into `R`.
/// Rows whose mapped cells are all blank are dropped.
pub fn normalize<R: Record>(rows: &Rows) -> Vec<R> {
    let header = locate_header(rows, R::KIND.headers());
    normalize_with_header(rows, &header)
}

pub fn normalize_with_header<R: Record>(rows: &Rows, header: &HeaderMatch) -> Vec<R> {
    if header.headers.is_empty() {
        return Vec::new();
    }
    let columns: Vec<Option<usize>> = R::FIELDS.iter().map(|aliases| header.column(aliases)).collect();

    rows.iter()
        .enumerate()
        .skip(header.row_index + 1)
        .filter_map(|(index, row)| {
            let values: Vec<String> = columns
                .iter()
                .map(|col| {
                    col.and_then(|c| row.get(c))
                        .map(|cell| cell.trim().to_string())
                        .unwrap_or_default()
                })
                .collect();
            if values.iter().all(String::is_empty) {
                return None;
            }
            Some(R::from_values(index + 1, values))
        })
        .collect()
}

/// Every record of an import, grouped by entity type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportBatch {
    pub tracks: Vec<TrackRecord>,
    pub strands: Vec<StrandRecord>,
    pub sections: Vec<SectionRecord>,
    pub subjects: Vec<SubjectRecord>,
    pub faculty_assignments: Vec<FacultyAssignmentRecord>,
    pub student_assignments: Vec<StudentAssignmentRecord>,
}

impl ImportBatch {
    /// A single-sheet upload of one entity type.
    #[must_use]
    pub fn from_sheet(kind: EntityKind, rows: &Rows) -> Self {
        let mut batch = Self::default();
        match kind {
            EntityKind::Track => batch.tracks = normalize(rows),
            EntityKind::Strand => batch.strands = normalize(rows),
            EntityKind::Section => batch.sections = normalize(rows),
            EntityKind::Subject => batch.subjects = normalize(rows),
            EntityKind::FacultyAssignment => batch.faculty_assignments = normalize(rows),
            EntityKind::StudentAssignment => batch.student_assignments = normalize(rows),
        }
        batch
    }

    /// A whole-term workbook: each entity type is read from its own sheet, missing sheets are empty.
    #[must_use]
    pub fn from_workbook(sheets: &[(String, Rows)]) -> Self {
        let mut batch = Self::default();
        for kind in EntityKind::ORDER {
            let names = sheets.iter().map(|(name, _)| name.as_str());
            if let Some(index) = find_sheet(names, kind.sheet_name()) {
                let part = Self::from_sheet(kind, &sheets[index].1);
                batch.merge(part);
            }
        }
        batch
    }

    fn merge(&mut self, other: ImportBatch) {
        self.tracks.extend(other.tracks);
        self.strands.extend(other.strands);
        self.sections.extend(other.sections);
        self.subjects.extend(other.subjects);
        self.faculty_assignments.extend(other.faculty_assignments);
        self.student_assignments.extend(other.student_assignments);
    }

    #[must_use]
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Track => self.tracks.len(),
            EntityKind::Strand => self.strands.len(),
            EntityKind::Section => self.sections.len(),
            EntityKind::Subject => self.subjects.len(),
            EntityKind::FacultyAssignment => self.faculty_assignments.len(),
            EntityKind::StudentAssignment => self.student_assignments.len(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        EntityKind::ORDER.iter().map(|kind| self.count(*kind)).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
