use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::GradeLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    #[default]
    Active,
    Archived,
}

/// The school year, term and optional quarter every fetch and create is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermScope {
    pub term_id: String,
    pub school_year: String,
    pub term_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
}

impl TermScope {
    /// Whether an entity stamped with these term fields belongs to this scope.
    /// Entities without a quarter apply to every quarter of the term.
    #[must_use]
    pub fn contains(&self, school_year: &str, term_name: &str, quarter_name: Option<&str>) -> bool {
        if !school_year.trim().eq_ignore_ascii_case(self.school_year.trim())
            || !term_name.trim().eq_ignore_ascii_case(self.term_name.trim())
        {
            return false;
        }
        match (quarter_name, self.quarter_name.as_deref()) {
            (Some(q), Some(scope_q)) => q.trim().eq_ignore_ascii_case(scope_q.trim()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(alias = "_id")]
    pub id: String,
    pub track_name: String,
    pub school_year: String,
    pub term_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strand {
    #[serde(alias = "_id")]
    pub id: String,
    pub track_name: String,
    pub strand_name: String,
    pub school_year: String,
    pub term_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(alias = "_id")]
    pub id: String,
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    #[serde(default)]
    pub section_code: String,
    pub grade_level: GradeLevel,
    pub school_year: String,
    pub term_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(alias = "_id")]
    pub id: String,
    pub track_name: String,
    pub strand_name: String,
    pub grade_level: GradeLevel,
    pub subject_name: String,
    pub school_year: String,
    pub term_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quarter_name: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyAssignment {
    #[serde(alias = "_id")]
    pub id: String,
    pub faculty_id: String,
    #[serde(rename = "facultySchoolID", default)]
    pub faculty_school_id: String,
    #[serde(default)]
    pub faculty_name: String,
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    pub grade_level: GradeLevel,
    pub subject_name: String,
    pub term_id: String,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAssignment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(rename = "studentSchoolID", default)]
    pub student_school_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub track_name: String,
    pub strand_name: String,
    pub section_name: String,
    pub grade_level: GradeLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<NaiveDate>,
    pub term_id: String,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrantStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    #[serde(rename = "schoolID")]
    pub school_id: String,
    pub status: RegistrantStatus,
    pub term_name: String,
    pub school_year: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "schoolID", default)]
    pub school_id: String,
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl UserAccount {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname.trim(), self.lastname.trim())
            .trim()
            .to_string()
    }

    #[must_use]
    pub fn is_faculty(&self) -> bool {
        self.role.eq_ignore_ascii_case("faculty")
    }

    #[must_use]
    pub fn is_student(&self) -> bool {
        self.role.eq_ignore_ascii_case("student")
    }

    /// Accounts without a status field are treated as active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .is_none_or(|s| s.eq_ignore_ascii_case("active"))
    }
}
