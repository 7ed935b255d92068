//! Turn validated records into create requests.
//!
//! Names are taken from the snapshot where the referenced entity is known, so
//! a row typed as "academic" creates children of the stored "Academic" track.

use super::normalize::{
    FacultyAssignmentRecord, SectionRecord, StrandRecord, StudentAssignmentRecord, SubjectRecord,
    TrackRecord,
};
use super::snapshot::ReferenceSnapshot;
use super::validate::parse_enrollment_date;
use crate::api::{
    NewFacultyAssignment, NewStrand, NewStudentAssignment, NewSubject, NewTrack, NewSection,
};
use crate::types::{GradeLevel, RecordStatus, Section, Strand, Subject, Track};

fn typed(value: &str) -> String {
    value.trim().to_string()
}

fn track_name(r: &str, snapshot: &ReferenceSnapshot) -> String {
    snapshot
        .track(r)
        .map_or_else(|| typed(r), |t| t.track_name.clone())
}

fn strand_name(track: &str, strand: &str, snapshot: &ReferenceSnapshot) -> String {
    snapshot
        .strand(track, strand)
        .map_or_else(|| typed(strand), |s| s.strand_name.clone())
}

fn section_name(
    track: &str,
    strand: &str,
    section: &str,
    grade: GradeLevel,
    snapshot: &ReferenceSnapshot,
) -> String {
    snapshot
        .section(track, strand, section, grade)
        .map_or_else(|| typed(section), |s| s.section_name.clone())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

pub fn track(r: &TrackRecord, snapshot: &ReferenceSnapshot) -> NewTrack {
    let scope = &snapshot.scope;
    NewTrack {
        track_name: typed(&r.track_name),
        school_year: scope.school_year.clone(),
        term_name: scope.term_name.clone(),
        quarter_name: scope.quarter_name.clone(),
    }
}

pub fn strand(r: &StrandRecord, snapshot: &ReferenceSnapshot) -> NewStrand {
    let scope = &snapshot.scope;
    NewStrand {
        track_name: track_name(&r.track_name, snapshot),
        strand_name: typed(&r.strand_name),
        school_year: scope.school_year.clone(),
        term_name: scope.term_name.clone(),
        quarter_name: scope.quarter_name.clone(),
    }
}

/// `None` when the grade level does not parse.
pub fn section(r: &SectionRecord, snapshot: &ReferenceSnapshot) -> Option<NewSection> {
    let grade_level = r.grade_level.parse().ok()?;
    let scope = &snapshot.scope;
    Some(NewSection {
        track_name: track_name(&r.track_name, snapshot),
        strand_name: strand_name(&r.track_name, &r.strand_name, snapshot),
        section_name: typed(&r.section_name),
        section_code: typed(&r.section_code),
        grade_level,
        school_year: scope.school_year.clone(),
        term_name: scope.term_name.clone(),
        quarter_name: scope.quarter_name.clone(),
    })
}

pub fn subject(r: &SubjectRecord, snapshot: &ReferenceSnapshot) -> Option<NewSubject> {
    let grade_level = r.grade_level.parse().ok()?;
    let scope = &snapshot.scope;
    Some(NewSubject {
        track_name: track_name(&r.track_name, snapshot),
        strand_name: strand_name(&r.track_name, &r.strand_name, snapshot),
        grade_level,
        subject_name: typed(&r.subject_name),
        school_year: scope.school_year.clone(),
        term_name: scope.term_name.clone(),
        quarter_name: scope.quarter_name.clone(),
    })
}

/// `faculty_id` is the account validation resolved for the row.
/// `None` when the grade level does not parse.
pub fn faculty_assignment(
    r: &FacultyAssignmentRecord,
    faculty_id: &str,
    snapshot: &ReferenceSnapshot,
) -> Option<NewFacultyAssignment> {
    let grade_level: GradeLevel = r.grade_level.parse().ok()?;
    let subject_name = snapshot
        .subject(&r.track_name, &r.strand_name, grade_level, &r.subject_name)
        .map_or_else(|| typed(&r.subject_name), |s| s.subject_name.clone());
    let faculty_name = optional(&r.faculty_name)
        .or_else(|| snapshot.faculty_by_id(faculty_id).map(|f| f.full_name()))
        .unwrap_or_default();

    Some(NewFacultyAssignment {
        faculty_id: faculty_id.to_string(),
        faculty_school_id: typed(&r.faculty_school_id),
        faculty_name,
        track_name: track_name(&r.track_name, snapshot),
        strand_name: strand_name(&r.track_name, &r.strand_name, snapshot),
        section_name: section_name(
            &r.track_name,
            &r.strand_name,
            &r.section_name,
            grade_level,
            snapshot,
        ),
        grade_level,
        subject_name,
        term_id: snapshot.scope.term_id.clone(),
        quarter_name: snapshot.scope.quarter_name.clone(),
    })
}

/// `student_id` is the account validation resolved, if the student has one yet.
pub fn student_assignment(
    r: &StudentAssignmentRecord,
    student_id: Option<&str>,
    snapshot: &ReferenceSnapshot,
) -> Option<NewStudentAssignment> {
    let grade_level: GradeLevel = r.grade_level.parse().ok()?;

    Some(NewStudentAssignment {
        student_id: student_id.map(str::to_string),
        student_school_id: typed(&r.student_school_id),
        first_name: typed(&r.first_name),
        last_name: typed(&r.last_name),
        track_name: track_name(&r.track_name, snapshot),
        strand_name: strand_name(&r.track_name, &r.strand_name, snapshot),
        section_name: section_name(
            &r.track_name,
            &r.strand_name,
            &r.section_name,
            grade_level,
            snapshot,
        ),
        grade_level,
        enrollment_no: optional(&r.enrollment_no),
        enrollment_date: parse_enrollment_date(&r.enrollment_date),
        term_id: snapshot.scope.term_id.clone(),
        quarter_name: snapshot.scope.quarter_name.clone(),
    })
}

// Planned entities stand in for rows a preview expects to create.

impl NewTrack {
    #[must_use]
    pub fn into_track(self, id: String) -> Track {
        Track {
            id,
            track_name: self.track_name,
            school_year: self.school_year,
            term_name: self.term_name,
            quarter_name: self.quarter_name,
            status: RecordStatus::Active,
        }
    }
}

impl NewStrand {
    #[must_use]
    pub fn into_strand(self, id: String) -> Strand {
        Strand {
            id,
            track_name: self.track_name,
            strand_name: self.strand_name,
            school_year: self.school_year,
            term_name: self.term_name,
            quarter_name: self.quarter_name,
            status: RecordStatus::Active,
        }
    }
}

impl NewSection {
    #[must_use]
    pub fn into_section(self, id: String) -> Section {
        Section {
            id,
            track_name: self.track_name,
            strand_name: self.strand_name,
            section_name: self.section_name,
            section_code: self.section_code,
            grade_level: self.grade_level,
            school_year: self.school_year,
            term_name: self.term_name,
            quarter_name: self.quarter_name,
            status: RecordStatus::Active,
        }
    }
}

impl NewSubject {
    #[must_use]
    pub fn into_subject(self, id: String) -> Subject {
        Subject {
            id,
            track_name: self.track_name,
            strand_name: self.strand_name,
            grade_level: self.grade_level,
            subject_name: self.subject_name,
            school_year: self.school_year,
            term_name: self.term_name,
            quarter_name: self.quarter_name,
            status: RecordStatus::Active,
        }
    }
}
