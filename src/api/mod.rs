mod client;

pub use client::ApiClient;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::*;

/// SisApi is the school information system as the import pipeline sees it.
pub trait SisApi {
    // Term structure
    fn list_tracks(&self, scope: &TermScope) -> Result<Vec<Track>>;
    fn list_strands(&self, scope: &TermScope) -> Result<Vec<Strand>>;
    fn list_sections(&self, scope: &TermScope) -> Result<Vec<Section>>;
    fn list_subjects(&self, scope: &TermScope) -> Result<Vec<Subject>>;
    fn create_track(&self, req: &NewTrack) -> Result<Track>;
    fn create_strand(&self, req: &NewStrand) -> Result<Strand>;
    fn create_section(&self, req: &NewSection) -> Result<Section>;
    fn create_subject(&self, req: &NewSubject) -> Result<Subject>;

    // Assignments
    fn list_faculty_assignments(&self, scope: &TermScope) -> Result<Vec<FacultyAssignment>>;
    fn list_student_assignments(&self, scope: &TermScope) -> Result<Vec<StudentAssignment>>;
    fn create_faculty_assignment(&self, req: &NewFacultyAssignment) -> Result<FacultyAssignment>;
    fn create_student_assignment(&self, req: &NewStudentAssignment) -> Result<StudentAssignment>;

    // People
    fn list_active_users(&self) -> Result<Vec<UserAccount>>;
    fn search_users(&self, query: &str) -> Result<Vec<UserAccount>>;
    fn list_registrants(&self, limit: u32) -> Result<Vec<Registrant>>;

    /// Fire-and-forget: implementations swallow their own failures.
    fn record_audit(&self, action: &str, details: &str);
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTrack {
    pub track_name: String,
    pub school_year: String,
    pub term_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStrand {
    pub track_name: String,
    pub strand_name: String,
    pub school_year: String,
    pub term_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    pub section_code: String,
    pub grade_level: GradeLevel,
    pub school_year: String,
    pub term_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    pub track_name: String,
    pub strand_name: String,
    pub grade_level: GradeLevel,
    pub subject_name: String,
    pub school_year: String,
    pub term_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFacultyAssignment {
    pub faculty_id: String,
    #[serde(rename = "facultySchoolID")]
    pub faculty_school_id: String,
    pub faculty_name: String,
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    pub grade_level: GradeLevel,
    pub subject_name: String,
    pub term_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(rename = "studentSchoolID")]
    pub student_school_id: String,
    pub first_name: String,
    pub last_name: String,
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    pub grade_level: GradeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<NaiveDate>,
    pub term_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub action: String,
    pub details: String,
    pub user_role: String,
}
