//! The import pipeline: `normalize -> validate(snapshot) -> plan -> execute`.
//!
//! Only [`ReferenceSnapshot::fetch`] and [`execute`] talk to the API; every
//! other stage is a pure function of its inputs.

mod execute;
mod export;
pub mod normalize;
mod plan;
mod requests;
mod snapshot;
pub mod validate;

#[cfg(test)]
pub(crate) mod fake;

pub use execute::{CreatedRow, ImportReport, SkippedRow, execute};
pub use export::export_term;
pub use normalize::{
    FacultyAssignmentRecord, ImportBatch, Record, SectionRecord, StrandRecord,
    StudentAssignmentRecord, SubjectRecord, TrackRecord,
};
pub use plan::{ImportPlan, NO_DATA_ROWS, PhasePreview, Preview, preview};
pub use snapshot::{ReferenceSnapshot, Totals};

use serde::Serialize;

/// Which upload flow is running. The flows disagree on what "already exists" means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flow {
    /// Single entity upload: additive only, an existing record is a user error.
    Standalone,
    /// Whole-term workbook: re-runnable, existing records are skipped.
    TermImport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Issue {
    MissingField,
    Format,
    ReferenceNotFound,
    DuplicateInBatch,
    AlreadyExists,
    Conflict,
    /// Student is not an approved registrant for the term.
    NotApproved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "issue", rename_all = "kebab-case")]
pub enum Verdict {
    Valid,
    /// Already in the system; valid but will be skipped.
    Exists,
    Invalid(Issue),
}

/// Validation outcome for one sheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowStatus {
    pub row: usize,
    #[serde(flatten)]
    pub verdict: Verdict,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
}

impl RowStatus {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self.verdict, Verdict::Valid | Verdict::Exists)
    }

    /// Valid and not already present.
    #[must_use]
    pub fn is_importable(&self) -> bool {
        self.verdict == Verdict::Valid
    }

    #[must_use]
    pub fn issue(&self) -> Option<Issue> {
        match self.verdict {
            Verdict::Invalid(issue) => Some(issue),
            _ => None,
        }
    }
}
