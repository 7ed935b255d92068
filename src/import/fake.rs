//! In-memory `SisApi` for pipeline tests.

use std::cell::{RefCell, RefMut};
use std::collections::HashSet;

use crate::api::*;
use crate::error::{Error, Result};
use crate::types::*;

#[derive(Default)]
pub struct FakeState {
    pub tracks: Vec<Track>,
    pub strands: Vec<Strand>,
    pub sections: Vec<Section>,
    pub subjects: Vec<Subject>,
    pub faculty_assignments: Vec<FacultyAssignment>,
    pub student_assignments: Vec<StudentAssignment>,
    pub users: Vec<UserAccount>,
    pub registrants: Vec<Registrant>,
    pub audits: Vec<String>,
    pub fail_lists: bool,
    /// Names whose create call fails with a server error.
    pub reject: HashSet<String>,
    next_id: usize,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }
}

pub struct FakeApi {
    state: RefCell<FakeState>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(FakeState::default()),
        }
    }

    pub fn state(&self) -> RefMut<'_, FakeState> {
        self.state.borrow_mut()
    }

    pub fn fail_lists(&self) {
        self.state().fail_lists = true;
    }

    pub fn reject(&self, name: &str) {
        self.state().reject.insert(name.to_string());
    }

    fn list<T: Clone>(&self, pick: impl Fn(&FakeState) -> &Vec<T>) -> Result<Vec<T>> {
        let state = self.state.borrow();
        if state.fail_lists {
            return Err(Error::Api {
                status: 503,
                message: "Service unavailable".to_string(),
            });
        }
        Ok(pick(&state).clone())
    }

    fn guard(&self, name: &str, exists: bool, what: &str) -> Result<()> {
        if self.state.borrow().reject.contains(name) {
            return Err(Error::Api {
                status: 500,
                message: "Database unavailable".to_string(),
            });
        }
        if exists {
            return Err(Error::Api {
                status: 409,
                message: format!("{what} already exists"),
            });
        }
        Ok(())
    }
}

fn same(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl SisApi for FakeApi {
    fn list_tracks(&self, _scope: &TermScope) -> Result<Vec<Track>> {
        self.list(|s| &s.tracks)
    }

    fn list_strands(&self, _scope: &TermScope) -> Result<Vec<Strand>> {
        self.list(|s| &s.strands)
    }

    fn list_sections(&self, _scope: &TermScope) -> Result<Vec<Section>> {
        self.list(|s| &s.sections)
    }

    fn list_subjects(&self, _scope: &TermScope) -> Result<Vec<Subject>> {
        self.list(|s| &s.subjects)
    }

    fn create_track(&self, req: &NewTrack) -> Result<Track> {
        let exists = self.state().tracks.iter().any(|t| same(&t.track_name, &req.track_name));
        self.guard(&req.track_name, exists, "Track")?;
        let mut state = self.state();
        let track = Track {
            id: state.next_id("track"),
            track_name: req.track_name.clone(),
            school_year: req.school_year.clone(),
            term_name: req.term_name.clone(),
            quarter_name: req.quarter_name.clone(),
            status: RecordStatus::Active,
        };
        state.tracks.push(track.clone());
        Ok(track)
    }

    fn create_strand(&self, req: &NewStrand) -> Result<Strand> {
        let exists = self.state().strands.iter().any(|s| same(&s.strand_name, &req.strand_name));
        self.guard(&req.strand_name, exists, "Strand")?;
        let mut state = self.state();
        let strand = Strand {
            id: state.next_id("strand"),
            track_name: req.track_name.clone(),
            strand_name: req.strand_name.clone(),
            school_year: req.school_year.clone(),
            term_name: req.term_name.clone(),
            quarter_name: req.quarter_name.clone(),
            status: RecordStatus::Active,
        };
        state.strands.push(strand.clone());
        Ok(strand)
    }

    fn create_section(&self, req: &NewSection) -> Result<Section> {
        let exists = self.state().sections.iter().any(|s| {
            same(&s.section_name, &req.section_name)
                && same(&s.strand_name, &req.strand_name)
                && s.grade_level == req.grade_level
        });
        self.guard(&req.section_name, exists, "Section")?;
        let mut state = self.state();
        let section = Section {
            id: state.next_id("section"),
            track_name: req.track_name.clone(),
            strand_name: req.strand_name.clone(),
            section_name: req.section_name.clone(),
            section_code: req.section_code.clone(),
            grade_level: req.grade_level,
            school_year: req.school_year.clone(),
            term_name: req.term_name.clone(),
            quarter_name: req.quarter_name.clone(),
            status: RecordStatus::Active,
        };
        state.sections.push(section.clone());
        Ok(section)
    }

    fn create_subject(&self, req: &NewSubject) -> Result<Subject> {
        let exists = self.state().subjects.iter().any(|s| same(&s.subject_name, &req.subject_name));
        self.guard(&req.subject_name, exists, "Subject")?;
        let mut state = self.state();
        let subject = Subject {
            id: state.next_id("subject"),
            track_name: req.track_name.clone(),
            strand_name: req.strand_name.clone(),
            grade_level: req.grade_level,
            subject_name: req.subject_name.clone(),
            school_year: req.school_year.clone(),
            term_name: req.term_name.clone(),
            quarter_name: req.quarter_name.clone(),
            status: RecordStatus::Active,
        };
        state.subjects.push(subject.clone());
        Ok(subject)
    }

    fn list_faculty_assignments(&self, _scope: &TermScope) -> Result<Vec<FacultyAssignment>> {
        self.list(|s| &s.faculty_assignments)
    }

    fn list_student_assignments(&self, _scope: &TermScope) -> Result<Vec<StudentAssignment>> {
        self.list(|s| &s.student_assignments)
    }

    fn create_faculty_assignment(&self, req: &NewFacultyAssignment) -> Result<FacultyAssignment> {
        let exists = self.state().faculty_assignments.iter().any(|a| {
            same(&a.subject_name, &req.subject_name) && same(&a.section_name, &req.section_name)
        });
        self.guard(&req.faculty_school_id, exists, "Assignment")?;
        let mut state = self.state();
        let assignment = FacultyAssignment {
            id: state.next_id("fa"),
            faculty_id: req.faculty_id.clone(),
            faculty_school_id: req.faculty_school_id.clone(),
            faculty_name: req.faculty_name.clone(),
            track_name: req.track_name.clone(),
            strand_name: req.strand_name.clone(),
            section_name: req.section_name.clone(),
            grade_level: req.grade_level,
            subject_name: req.subject_name.clone(),
            term_id: req.term_id.clone(),
            status: RecordStatus::Active,
        };
        state.faculty_assignments.push(assignment.clone());
        Ok(assignment)
    }

    fn create_student_assignment(&self, req: &NewStudentAssignment) -> Result<StudentAssignment> {
        let exists = self.state().student_assignments.iter().any(|a| {
            a.student_school_id == req.student_school_id && same(&a.section_name, &req.section_name)
        });
        self.guard(&req.student_school_id, exists, "Student assignment")?;
        let mut state = self.state();
        let assignment = StudentAssignment {
            id: state.next_id("sa"),
            student_id: req.student_id.clone(),
            student_school_id: req.student_school_id.clone(),
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            track_name: req.track_name.clone(),
            strand_name: req.strand_name.clone(),
            section_name: req.section_name.clone(),
            grade_level: req.grade_level,
            enrollment_no: req.enrollment_no.clone(),
            enrollment_date: req.enrollment_date,
            term_id: req.term_id.clone(),
            status: RecordStatus::Active,
        };
        state.student_assignments.push(assignment.clone());
        Ok(assignment)
    }

    fn list_active_users(&self) -> Result<Vec<UserAccount>> {
        self.list(|s| &s.users)
    }

    fn search_users(&self, query: &str) -> Result<Vec<UserAccount>> {
        let query = query.to_lowercase();
        Ok(self
            .state
            .borrow()
            .users
            .iter()
            .filter(|u| {
                u.school_id.to_lowercase().contains(&query)
                    || u.full_name().to_lowercase().contains(&query)
            })
            .cloned()
            .collect())
    }

    fn list_registrants(&self, _limit: u32) -> Result<Vec<Registrant>> {
        self.list(|s| &s.registrants)
    }

    fn record_audit(&self, action: &str, details: &str) {
        self.state().audits.push(format!("{action}: {details}"));
    }
}

pub fn scope() -> TermScope {
    TermScope {
        term_id: "term-1".to_string(),
        school_year: "2025-2026".to_string(),
        term_name: "Term 1".to_string(),
        quarter_name: None,
    }
}

pub fn track(id: &str, name: &str) -> Track {
    Track {
        id: id.to_string(),
        track_name: name.to_string(),
        school_year: "2025-2026".to_string(),
        term_name: "Term 1".to_string(),
        quarter_name: None,
        status: RecordStatus::Active,
    }
}

pub fn strand(id: &str, track: &str, name: &str) -> Strand {
    Strand {
        id: id.to_string(),
        track_name: track.to_string(),
        strand_name: name.to_string(),
        school_year: "2025-2026".to_string(),
        term_name: "Term 1".to_string(),
        quarter_name: None,
        status: RecordStatus::Active,
    }
}

pub fn section(id: &str, track: &str, strand: &str, name: &str, grade: GradeLevel) -> Section {
    Section {
        id: id.to_string(),
        track_name: track.to_string(),
        strand_name: strand.to_string(),
        section_name: name.to_string(),
        section_code: String::new(),
        grade_level: grade,
        school_year: "2025-2026".to_string(),
        term_name: "Term 1".to_string(),
        quarter_name: None,
        status: RecordStatus::Active,
    }
}

pub fn subject(id: &str, track: &str, strand: &str, grade: GradeLevel, name: &str) -> Subject {
    Subject {
        id: id.to_string(),
        track_name: track.to_string(),
        strand_name: strand.to_string(),
        grade_level: grade,
        subject_name: name.to_string(),
        school_year: "2025-2026".to_string(),
        term_name: "Term 1".to_string(),
        quarter_name: None,
        status: RecordStatus::Active,
    }
}

pub fn user(id: &str, school_id: &str, role: &str, first: &str, last: &str) -> UserAccount {
    UserAccount {
        id: id.to_string(),
        school_id: school_id.to_string(),
        firstname: first.to_string(),
        lastname: last.to_string(),
        role: role.to_string(),
        status: Some("active".to_string()),
    }
}

pub fn faculty_assignment(
    faculty_id: &str,
    section: &str,
    subject: &str,
) -> FacultyAssignment {
    FacultyAssignment {
        id: format!("fa-{faculty_id}-{subject}"),
        faculty_id: faculty_id.to_string(),
        faculty_school_id: String::new(),
        faculty_name: String::new(),
        track_name: "Academic".to_string(),
        strand_name: "STEM".to_string(),
        section_name: section.to_string(),
        grade_level: GradeLevel::Grade11,
        subject_name: subject.to_string(),
        term_id: "term-1".to_string(),
        status: RecordStatus::Active,
    }
}

pub fn approved(school_id: &str) -> Registrant {
    Registrant {
        school_id: school_id.to_string(),
        status: RegistrantStatus::Approved,
        term_name: "Term 1".to_string(),
        school_year: "2025-2026".to_string(),
    }
}

/// Academic / STEM / Newton (Grade 11) with General Mathematics, and faculty F001-F002.
pub fn seeded_api() -> FakeApi {
    let api = FakeApi::new();
    {
        let mut state = api.state();
        state.tracks.push(track("t1", "Academic"));
        state.strands.push(strand("s1", "Academic", "STEM"));
        state
            .sections
            .push(section("sec1", "Academic", "STEM", "Newton", GradeLevel::Grade11));
        state.subjects.push(subject(
            "sub1",
            "Academic",
            "STEM",
            GradeLevel::Grade11,
            "General Mathematics",
        ));
        state.users.push(user("u-f1", "F001", "faculty", "Maria", "Santos"));
        state.users.push(user("u-f2", "F002", "faculty", "Jose", "Rizal"));
        state.users.push(user("u-s1", "25-00017", "student", "Ana", "Reyes"));
    }
    api
}
