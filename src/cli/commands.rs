use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::types::EntityKind;

/// What a template, validate or import command works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImportTarget {
    Tracks,
    Strands,
    Sections,
    Subjects,
    FacultyAssignments,
    StudentAssignments,
    /// A whole-term workbook with one sheet per entity type
    Term,
}

impl ImportTarget {
    /// The single entity type, or `None` for a term workbook.
    #[must_use]
    pub fn kind(self) -> Option<EntityKind> {
        match self {
            ImportTarget::Tracks => Some(EntityKind::Track),
            ImportTarget::Strands => Some(EntityKind::Strand),
            ImportTarget::Sections => Some(EntityKind::Section),
            ImportTarget::Subjects => Some(EntityKind::Subject),
            ImportTarget::FacultyAssignments => Some(EntityKind::FacultyAssignment),
            ImportTarget::StudentAssignments => Some(EntityKind::StudentAssignment),
            ImportTarget::Term => None,
        }
    }

    #[must_use]
    pub fn file_stem(self) -> &'static str {
        match self {
            ImportTarget::Tracks => "tracks",
            ImportTarget::Strands => "strands",
            ImportTarget::Sections => "sections",
            ImportTarget::Subjects => "subjects",
            ImportTarget::FacultyAssignments => "faculty-assignments",
            ImportTarget::StudentAssignments => "student-assignments",
            ImportTarget::Term => "term",
        }
    }
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Save the server URL and API token
    Login {
        /// Server URL (e.g., "https://sis.example.edu")
        #[arg(long)]
        server: Option<String>,

        /// Bearer token sent with every request
        #[arg(long)]
        token: Option<String>,

        /// Role recorded in audit entries
        #[arg(long)]
        role: Option<String>,

        /// Skip interactive prompts (requires --server and --token)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Forget the saved server and token
    Logout,
}

#[derive(Subcommand)]
pub enum TermCommands {
    /// Select the term imports and exports are scoped to
    Use {
        /// Term id used by assignment endpoints
        #[arg(long)]
        term_id: Option<String>,

        /// School year (e.g., "2025-2026")
        #[arg(long)]
        school_year: Option<String>,

        /// Term name (e.g., "Term 1")
        #[arg(long)]
        term: Option<String>,

        /// Quarter name, if the term is split into quarters
        #[arg(long)]
        quarter: Option<String>,

        /// Skip interactive prompts (requires --term-id, --school-year and --term)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Show the selected term
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Search accounts by school ID or name
    Search {
        /// Text to search for
        query: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Arguments shared by `validate` and `import`.
#[derive(clap::Args)]
pub struct UploadArgs {
    /// What the workbook contains
    #[arg(value_enum)]
    pub target: ImportTarget,

    /// Workbook to read (.xlsx, .xls, .xlsb or .ods)
    pub file: PathBuf,

    /// Sheet to read for single-entity uploads (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
