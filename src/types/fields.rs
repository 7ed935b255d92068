use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static STUDENT_SCHOOL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-\d{5}$").expect("valid student id pattern"));

static FACULTY_SCHOOL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^F\d{3}$").expect("valid faculty id pattern"));

/// Student school IDs look like `25-00017`.
#[must_use]
pub fn is_student_school_id(id: &str) -> bool {
    STUDENT_SCHOOL_ID.is_match(id)
}

/// Faculty school IDs look like `F001`.
#[must_use]
pub fn is_faculty_school_id(id: &str) -> bool {
    FACULTY_SCHOOL_ID.is_match(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "Grade 11")]
    Grade11,
    #[serde(rename = "Grade 12")]
    Grade12,
}

impl GradeLevel {
    pub const ALL: [GradeLevel; 2] = [GradeLevel::Grade11, GradeLevel::Grade12];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            GradeLevel::Grade11 => "Grade 11",
            GradeLevel::Grade12 => "Grade 12",
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Grade 11" => Ok(GradeLevel::Grade11),
            "Grade 12" => Ok(GradeLevel::Grade12),
            other => Err(format!(
                "Grade level '{other}' must be \"Grade 11\" or \"Grade 12\""
            )),
        }
    }
}
