use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::SisApi;
use crate::error::Result;
use crate::types::*;

/// Case-insensitive comparison key.
pub(crate) fn key(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Name lookups into the snapshot's lists, built once and extended as entities are added.
/// Only active records are indexed.
#[derive(Debug, Clone, Default)]
struct NameIndex {
    tracks: HashMap<String, usize>,
    strands_by_name: HashMap<String, usize>,
    strands: HashMap<(String, String), usize>,
    sections: HashMap<(String, String, String, GradeLevel), usize>,
    subjects_by_name: HashMap<String, usize>,
    subjects: HashMap<(String, String, GradeLevel, String), usize>,
    faculty: HashMap<String, usize>,
    students: HashMap<String, usize>,
    faculty_keys: HashSet<(String, String, String, String, String)>,
    subject_holders: HashMap<(String, String), String>,
    student_keys: HashSet<(String, String, String, String)>,
    approved: HashSet<String>,
}

/// Active record counts for the scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub tracks: usize,
    pub strands: usize,
    pub sections: usize,
    pub subjects: usize,
    pub faculty_assignments: usize,
    pub student_assignments: usize,
}

impl fmt::Display for Totals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tracks, {} strands, {} sections, {} subjects, {} faculty assignments, {} student assignments",
            self.tracks,
            self.strands,
            self.sections,
            self.subjects,
            self.faculty_assignments,
            self.student_assignments
        )
    }
}

/// Point-in-time view of the system an import is validated against.
#[derive(Debug, Clone)]
pub struct ReferenceSnapshot {
    pub scope: TermScope,
    pub tracks: Vec<Track>,
    pub strands: Vec<Strand>,
    pub sections: Vec<Section>,
    pub subjects: Vec<Subject>,
    pub faculty: Vec<UserAccount>,
    pub students: Vec<UserAccount>,
    pub faculty_assignments: Vec<FacultyAssignment>,
    pub student_assignments: Vec<StudentAssignment>,
    pub registrants: Vec<Registrant>,
    index: NameIndex,
}

fn or_empty<T>(what: &str, result: Result<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Could not load {what}, validating against an empty list: {e}");
        Vec::new()
    })
}

impl ReferenceSnapshot {
    #[must_use]
    pub fn new(scope: TermScope) -> Self {
        Self {
            scope,
            tracks: Vec::new(),
            strands: Vec::new(),
            sections: Vec::new(),
            subjects: Vec::new(),
            faculty: Vec::new(),
            students: Vec::new(),
            faculty_assignments: Vec::new(),
            student_assignments: Vec::new(),
            registrants: Vec::new(),
            index: NameIndex::default(),
        }
    }

    /// Fetch everything an import needs. A failed list degrades to empty instead of failing the run.
    pub fn fetch<A: SisApi + ?Sized>(api: &A, scope: &TermScope, registrant_limit: u32) -> Self {
        let mut snapshot = Self::new(scope.clone());

        for track in or_empty("tracks", api.list_tracks(scope)) {
            snapshot.add_track(track);
        }
        for strand in or_empty("strands", api.list_strands(scope)) {
            snapshot.add_strand(strand);
        }
        for section in or_empty("sections", api.list_sections(scope)) {
            snapshot.add_section(section);
        }
        for subject in or_empty("subjects", api.list_subjects(scope)) {
            snapshot.add_subject(subject);
        }
        for user in or_empty("users", api.list_active_users()) {
            snapshot.add_user(user);
        }
        for assignment in or_empty("faculty assignments", api.list_faculty_assignments(scope)) {
            snapshot.add_faculty_assignment(assignment);
        }
        for assignment in or_empty("student assignments", api.list_student_assignments(scope)) {
            snapshot.add_student_assignment(assignment);
        }
        for registrant in or_empty("registrants", api.list_registrants(registrant_limit)) {
            snapshot.add_registrant(registrant);
        }

        info!(
            "Loaded {} tracks, {} strands, {} sections, {} subjects, {} faculty, {} students for {} {}",
            snapshot.tracks.len(),
            snapshot.strands.len(),
            snapshot.sections.len(),
            snapshot.subjects.len(),
            snapshot.faculty.len(),
            snapshot.students.len(),
            scope.term_name,
            scope.school_year
        );
        snapshot
    }

    fn in_scope(&self, school_year: &str, term_name: &str, quarter_name: Option<&str>) -> bool {
        self.scope.contains(school_year, term_name, quarter_name)
    }

    // Registration: used for fetched, planned and newly created records alike.

    pub fn add_track(&mut self, track: Track) {
        if !self.in_scope(&track.school_year, &track.term_name, track.quarter_name.as_deref()) {
            return;
        }
        if track.status == RecordStatus::Active {
            self.index.tracks.insert(key(&track.track_name), self.tracks.len());
        }
        self.tracks.push(track);
    }

    pub fn add_strand(&mut self, strand: Strand) {
        if !self.in_scope(&strand.school_year, &strand.term_name, strand.quarter_name.as_deref()) {
            return;
        }
        if strand.status == RecordStatus::Active {
            let idx = self.strands.len();
            self.index.strands_by_name.insert(key(&strand.strand_name), idx);
            self.index
                .strands
                .insert((key(&strand.track_name), key(&strand.strand_name)), idx);
        }
        self.strands.push(strand);
    }

    pub fn add_section(&mut self, section: Section) {
        if !self.in_scope(&section.school_year, &section.term_name, section.quarter_name.as_deref()) {
            return;
        }
        if section.status == RecordStatus::Active {
            self.index.sections.insert(
                (
                    key(&section.track_name),
                    key(&section.strand_name),
                    key(&section.section_name),
                    section.grade_level,
                ),
                self.sections.len(),
            );
        }
        self.sections.push(section);
    }

    pub fn add_subject(&mut self, subject: Subject) {
        if !self.in_scope(&subject.school_year, &subject.term_name, subject.quarter_name.as_deref()) {
            return;
        }
        if subject.status == RecordStatus::Active {
            let idx = self.subjects.len();
            self.index.subjects_by_name.insert(key(&subject.subject_name), idx);
            self.index.subjects.insert(
                (
                    key(&subject.track_name),
                    key(&subject.strand_name),
                    subject.grade_level,
                    key(&subject.subject_name),
                ),
                idx,
            );
        }
        self.subjects.push(subject);
    }

    /// Sorted into faculty or students by role; inactive and other roles are dropped.
    pub fn add_user(&mut self, user: UserAccount) {
        if !user.is_active() || user.school_id.trim().is_empty() {
            return;
        }
        if user.is_faculty() {
            self.index
                .faculty
                .insert(user.school_id.trim().to_string(), self.faculty.len());
            self.faculty.push(user);
        } else if user.is_student() {
            self.index
                .students
                .insert(user.school_id.trim().to_string(), self.students.len());
            self.students.push(user);
        }
    }

    pub fn add_faculty_assignment(&mut self, assignment: FacultyAssignment) {
        if assignment.term_id != self.scope.term_id {
            return;
        }
        if assignment.status == RecordStatus::Active {
            self.index.faculty_keys.insert((
                assignment.faculty_id.clone(),
                key(&assignment.track_name),
                key(&assignment.strand_name),
                key(&assignment.section_name),
                key(&assignment.subject_name),
            ));
            self.index.subject_holders.insert(
                (key(&assignment.subject_name), key(&assignment.section_name)),
                assignment.faculty_id.clone(),
            );
        }
        self.faculty_assignments.push(assignment);
    }

    pub fn add_student_assignment(&mut self, assignment: StudentAssignment) {
        if assignment.term_id != self.scope.term_id {
            return;
        }
        if assignment.status == RecordStatus::Active {
            let place = (
                key(&assignment.track_name),
                key(&assignment.strand_name),
                key(&assignment.section_name),
            );
            let identities = assignment
                .student_id
                .iter()
                .cloned()
                .chain(std::iter::once(assignment.student_school_id.trim().to_string()))
                .filter(|id| !id.is_empty());
            for identity in identities {
                self.index.student_keys.insert((
                    identity,
                    place.0.clone(),
                    place.1.clone(),
                    place.2.clone(),
                ));
            }
        }
        self.student_assignments.push(assignment);
    }

    /// Only approvals for this scope's term and school year count.
    pub fn add_registrant(&mut self, registrant: Registrant) {
        if registrant.status == RegistrantStatus::Approved
            && registrant.term_name.trim().eq_ignore_ascii_case(self.scope.term_name.trim())
            && registrant.school_year.trim() == self.scope.school_year.trim()
        {
            self.index.approved.insert(registrant.school_id.trim().to_string());
        }
        self.registrants.push(registrant);
    }

    #[must_use]
    pub fn totals(&self) -> Totals {
        fn active<T>(items: &[T], status: impl Fn(&T) -> RecordStatus) -> usize {
            items
                .iter()
                .filter(|item| status(*item) == RecordStatus::Active)
                .count()
        }

        Totals {
            tracks: active(&self.tracks, |t| t.status),
            strands: active(&self.strands, |s| s.status),
            sections: active(&self.sections, |s| s.status),
            subjects: active(&self.subjects, |s| s.status),
            faculty_assignments: active(&self.faculty_assignments, |a| a.status),
            student_assignments: active(&self.student_assignments, |a| a.status),
        }
    }

    // Lookups. All names are matched case-insensitively.

    #[must_use]
    pub fn track(&self, name: &str) -> Option<&Track> {
        self.index.tracks.get(&key(name)).map(|&i| &self.tracks[i])
    }

    #[must_use]
    pub fn strand(&self, track: &str, strand: &str) -> Option<&Strand> {
        self.index
            .strands
            .get(&(key(track), key(strand)))
            .map(|&i| &self.strands[i])
    }

    /// Strand names are unique across tracks.
    #[must_use]
    pub fn strand_named(&self, strand: &str) -> Option<&Strand> {
        self.index
            .strands_by_name
            .get(&key(strand))
            .map(|&i| &self.strands[i])
    }

    #[must_use]
    pub fn section(
        &self,
        track: &str,
        strand: &str,
        section: &str,
        grade: GradeLevel,
    ) -> Option<&Section> {
        self.index
            .sections
            .get(&(key(track), key(strand), key(section), grade))
            .map(|&i| &self.sections[i])
    }

    #[must_use]
    pub fn subject(
        &self,
        track: &str,
        strand: &str,
        grade: GradeLevel,
        subject: &str,
    ) -> Option<&Subject> {
        self.index
            .subjects
            .get(&(key(track), key(strand), grade, key(subject)))
            .map(|&i| &self.subjects[i])
    }

    /// Subject names are unique within the term.
    #[must_use]
    pub fn subject_named(&self, subject: &str) -> Option<&Subject> {
        self.index
            .subjects_by_name
            .get(&key(subject))
            .map(|&i| &self.subjects[i])
    }

    #[must_use]
    pub fn faculty_by_school_id(&self, school_id: &str) -> Option<&UserAccount> {
        self.index
            .faculty
            .get(school_id.trim())
            .map(|&i| &self.faculty[i])
    }

    #[must_use]
    pub fn student_by_school_id(&self, school_id: &str) -> Option<&UserAccount> {
        self.index
            .students
            .get(school_id.trim())
            .map(|&i| &self.students[i])
    }

    #[must_use]
    pub fn faculty_by_id(&self, id: &str) -> Option<&UserAccount> {
        self.faculty.iter().find(|f| f.id == id)
    }

    #[must_use]
    pub fn has_faculty_assignment(
        &self,
        faculty_id: &str,
        track: &str,
        strand: &str,
        section: &str,
        subject: &str,
    ) -> bool {
        self.index.faculty_keys.contains(&(
            faculty_id.to_string(),
            key(track),
            key(strand),
            key(section),
            key(subject),
        ))
    }

    /// The faculty id currently holding `subject` in `section`, if any.
    #[must_use]
    pub fn subject_holder(&self, subject: &str, section: &str) -> Option<&str> {
        self.index
            .subject_holders
            .get(&(key(subject), key(section)))
            .map(String::as_str)
    }

    /// Matches either the linked account id or the school id.
    #[must_use]
    pub fn has_student_assignment(
        &self,
        student_id: Option<&str>,
        school_id: &str,
        track: &str,
        strand: &str,
        section: &str,
    ) -> bool {
        student_id
            .into_iter()
            .chain(std::iter::once(school_id.trim()))
            .filter(|id| !id.is_empty())
            .any(|id| {
                self.index.student_keys.contains(&(
                    id.to_string(),
                    key(track),
                    key(strand),
                    key(section),
                ))
            })
    }

    #[must_use]
    pub fn is_approved_registrant(&self, school_id: &str) -> bool {
        self.index.approved.contains(school_id.trim())
    }
}
