use std::fmt;

use serde::{Deserialize, Serialize};

/// The entity types an import can create, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Track,
    Strand,
    Section,
    Subject,
    FacultyAssignment,
    StudentAssignment,
}

impl EntityKind {
    /// Creation order: later kinds reference earlier ones by name.
    pub const ORDER: [EntityKind; 6] = [
        EntityKind::Track,
        EntityKind::Strand,
        EntityKind::Section,
        EntityKind::Subject,
        EntityKind::FacultyAssignment,
        EntityKind::StudentAssignment,
    ];

    /// Sheet name used by templates, exports and the term workbook.
    #[must_use]
    pub const fn sheet_name(self) -> &'static str {
        match self {
            EntityKind::Track => "Tracks",
            EntityKind::Strand => "Strands",
            EntityKind::Section => "Sections",
            EntityKind::Subject => "Subjects",
            EntityKind::FacultyAssignment => "Faculty Assignments",
            EntityKind::StudentAssignment => "Student Assignments",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Track => "track",
            EntityKind::Strand => "strand",
            EntityKind::Section => "section",
            EntityKind::Subject => "subject",
            EntityKind::FacultyAssignment => "faculty assignment",
            EntityKind::StudentAssignment => "student assignment",
        }
    }

    /// Canonical template header row.
    #[must_use]
    pub const fn headers(self) -> &'static [&'static str] {
        match self {
            EntityKind::Track => &["Track Name"],
            EntityKind::Strand => &["Track Name", "Strand Name"],
            EntityKind::Section => &[
                "Track Name",
                "Strand Name",
                "Section Name",
                "Section Code",
                "Grade Level",
            ],
            EntityKind::Subject => &["Track Name", "Strand Name", "Grade Level", "Subject Name"],
            EntityKind::FacultyAssignment => &[
                "Faculty School ID",
                "Faculty Name",
                "Track Name",
                "Strand Name",
                "Section Name",
                "Grade Level",
                "Subject Name",
            ],
            EntityKind::StudentAssignment => &[
                "Student School ID",
                "First Name",
                "Last Name",
                "Track Name",
                "Strand Name",
                "Section Name",
                "Grade Level",
                "Enrollment No",
                "Enrollment Date",
            ],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
