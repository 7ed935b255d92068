mod fields;
mod kind;
mod models;

pub use fields::{GradeLevel, is_faculty_school_id, is_student_school_id};
pub use kind::EntityKind;
pub use models::*;
