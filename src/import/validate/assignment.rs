use super::*;
use crate::import::normalize::{FacultyAssignmentRecord, StudentAssignmentRecord};
use crate::import::snapshot::key;
use crate::types::{is_faculty_school_id, is_student_school_id};

type FacultyKey = (String, String, String, String, String);

/// `(subject, section)` -> `(faculty id, first row)` for rows accepted so far.
type Claims = HashMap<(String, String), (String, usize)>;

pub fn validate_faculty_assignments(
    records: &[FacultyAssignmentRecord],
    snapshot: &ReferenceSnapshot,
    flow: Flow,
) -> Vec<RowStatus> {
    let mut batch = BatchKeys::new();
    let mut claims = Claims::new();
    records
        .iter()
        .map(|r| {
            let check = check_faculty(r, snapshot, flow, &mut batch, &mut claims);
            finish(r.row, check)
        })
        .collect()
}

fn check_faculty(
    r: &FacultyAssignmentRecord,
    snapshot: &ReferenceSnapshot,
    flow: Flow,
    batch: &mut BatchKeys<FacultyKey>,
    claims: &mut Claims,
) -> Check<Accepted> {
    required(&r.faculty_school_id, "Faculty School ID")?;
    required(&r.track_name, "Track Name")?;
    required(&r.strand_name, "Strand Name")?;
    required(&r.section_name, "Section Name")?;
    required(&r.grade_level, "Grade Level")?;
    required(&r.subject_name, "Subject Name")?;

    let school_id = r.faculty_school_id.trim();
    if !is_faculty_school_id(school_id) {
        return Err(reject(
            Issue::Format,
            format!("Invalid faculty school ID '{school_id}' (expected format F001)"),
        ));
    }
    let grade = grade(&r.grade_level)?;

    require_track(snapshot, &r.track_name)?;
    require_strand(snapshot, &r.track_name, &r.strand_name)?;
    require_section(snapshot, &r.track_name, &r.strand_name, &r.section_name, grade)?;
    require_subject(snapshot, &r.track_name, &r.strand_name, grade, &r.subject_name)?;
    let faculty = snapshot
        .faculty_by_school_id(school_id)
        .ok_or_else(|| not_found(format!("Faculty {school_id}")))?;

    batch.claim(
        (
            faculty.id.clone(),
            key(&r.track_name),
            key(&r.strand_name),
            key(&r.section_name),
            key(&r.subject_name),
        ),
        r.row,
    )?;

    let what = format!(
        "Assignment of '{}' in section '{}' to {school_id}",
        r.subject_name, r.section_name
    );
    if snapshot.has_faculty_assignment(
        &faculty.id,
        &r.track_name,
        &r.strand_name,
        &r.section_name,
        &r.subject_name,
    ) {
        return existing(flow, true, &what).map(|a| a.with_faculty(&faculty.id));
    }

    if let Some(holder) = snapshot.subject_holder(&r.subject_name, &r.section_name) {
        if holder != faculty.id {
            let holder = snapshot
                .faculty_by_id(holder)
                .map(|f| f.school_id.clone())
                .unwrap_or_else(|| "another faculty".to_string());
            return Err(reject(
                Issue::Conflict,
                format!(
                    "Subject '{}' in section '{}' is already assigned to {holder}",
                    r.subject_name, r.section_name
                ),
            ));
        }
    }

    let claim = (key(&r.subject_name), key(&r.section_name));
    if let Some((other, first_row)) = claims.get(&claim) {
        if *other != faculty.id {
            return Err(reject(
                Issue::Conflict,
                format!(
                    "Subject '{}' in section '{}' is assigned to another faculty in row {first_row}",
                    r.subject_name, r.section_name
                ),
            ));
        }
    }
    claims.insert(claim, (faculty.id.clone(), r.row));

    Ok(Accepted::valid(format!("{READY} ({})", faculty.full_name())).with_faculty(&faculty.id))
}

pub fn validate_student_assignments(
    records: &[StudentAssignmentRecord],
    snapshot: &ReferenceSnapshot,
    flow: Flow,
) -> Vec<RowStatus> {
    let mut batch = BatchKeys::new();
    records
        .iter()
        .map(|r| finish(r.row, check_student(r, snapshot, flow, &mut batch)))
        .collect()
}

fn check_student(
    r: &StudentAssignmentRecord,
    snapshot: &ReferenceSnapshot,
    flow: Flow,
    batch: &mut BatchKeys<(String, String, String, String)>,
) -> Check<Accepted> {
    required(&r.student_school_id, "Student School ID")?;
    required(&r.first_name, "First Name")?;
    required(&r.last_name, "Last Name")?;
    required(&r.track_name, "Track Name")?;
    required(&r.strand_name, "Strand Name")?;
    required(&r.section_name, "Section Name")?;
    required(&r.grade_level, "Grade Level")?;

    let school_id = r.student_school_id.trim();
    if !is_student_school_id(school_id) {
        return Err(reject(
            Issue::Format,
            format!("Invalid student school ID '{school_id}' (expected format 25-00017)"),
        ));
    }
    let grade = grade(&r.grade_level)?;
    if !r.enrollment_date.trim().is_empty() && parse_enrollment_date(&r.enrollment_date).is_none() {
        return Err(reject(
            Issue::Format,
            format!(
                "Enrollment date '{}' is not a valid date (use YYYY-MM-DD)",
                r.enrollment_date.trim()
            ),
        ));
    }

    require_track(snapshot, &r.track_name)?;
    require_strand(snapshot, &r.track_name, &r.strand_name)?;
    require_section(snapshot, &r.track_name, &r.strand_name, &r.section_name, grade)?;

    // Students may be enrolled before they have an account.
    let student_id = snapshot.student_by_school_id(school_id).map(|s| s.id.as_str());

    batch.claim(
        (
            student_id.unwrap_or(school_id).to_string(),
            key(&r.track_name),
            key(&r.strand_name),
            key(&r.section_name),
        ),
        r.row,
    )?;

    let exists = snapshot.has_student_assignment(
        student_id,
        school_id,
        &r.track_name,
        &r.strand_name,
        &r.section_name,
    );
    let what = format!("Student {school_id} in section '{}'", r.section_name);
    if exists {
        return existing(flow, true, &what).map(|a| a.with_student(student_id));
    }

    if flow == Flow::Standalone && !snapshot.is_approved_registrant(school_id) {
        return Err(reject(
            Issue::NotApproved,
            format!(
                "Student {school_id} is not an approved registrant for {} {}",
                snapshot.scope.term_name, snapshot.scope.school_year
            ),
        ));
    }

    Ok(Accepted::valid(READY).with_student(student_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::fake::{
        approved, faculty_assignment, scope, section, strand, subject, track, user,
    };
    use crate::types::{RecordStatus, StudentAssignment};

    fn snapshot() -> ReferenceSnapshot {
        let mut snapshot = ReferenceSnapshot::new(scope());
        snapshot.add_track(track("t1", "Academic"));
        snapshot.add_strand(strand("s1", "Academic", "STEM"));
        snapshot.add_section(section("sec1", "Academic", "STEM", "Newton", GradeLevel::Grade11));
        snapshot.add_section(section("sec2", "Academic", "STEM", "Curie", GradeLevel::Grade11));
        snapshot.add_subject(subject(
            "sub1",
            "Academic",
            "STEM",
            GradeLevel::Grade11,
            "General Mathematics",
        ));
        snapshot.add_user(user("u-f1", "F001", "faculty", "Maria", "Santos"));
        snapshot.add_user(user("u-f2", "F002", "faculty", "Jose", "Rizal"));
        snapshot.add_user(user("u-s1", "25-00017", "student", "Ana", "Reyes"));
        snapshot
    }

    fn faculty_row(row: usize, faculty: &str, section: &str) -> FacultyAssignmentRecord {
        FacultyAssignmentRecord {
            row,
            faculty_school_id: faculty.to_string(),
            faculty_name: String::new(),
            track_name: "Academic".to_string(),
            strand_name: "STEM".to_string(),
            section_name: section.to_string(),
            grade_level: "Grade 11".to_string(),
            subject_name: "General Mathematics".to_string(),
        }
    }

    fn student_row(row: usize, school_id: &str, section: &str) -> StudentAssignmentRecord {
        StudentAssignmentRecord {
            row,
            student_school_id: school_id.to_string(),
            first_name: "Ana".to_string(),
            last_name: "Reyes".to_string(),
            track_name: "Academic".to_string(),
            strand_name: "STEM".to_string(),
            section_name: section.to_string(),
            grade_level: "Grade 11".to_string(),
            enrollment_no: String::new(),
            enrollment_date: String::new(),
        }
    }

    #[test]
    fn test_faculty_conflict_vs_already_exists() {
        let mut snap = snapshot();
        snap.add_faculty_assignment(faculty_assignment("u-f1", "Newton", "General Mathematics"));

        let statuses = validate_faculty_assignments(
            &[faculty_row(2, "F002", "Newton"), faculty_row(3, "F001", "Newton")],
            &snap,
            Flow::Standalone,
        );

        assert_eq!(statuses[0].issue(), Some(Issue::Conflict));
        assert!(statuses[0].message.contains("F001"));
        assert_eq!(statuses[1].issue(), Some(Issue::AlreadyExists));
    }

    #[test]
    fn test_faculty_resolves_internal_id() {
        let statuses =
            validate_faculty_assignments(&[faculty_row(2, "F001", "Curie")], &snapshot(), Flow::Standalone);

        assert!(statuses[0].is_importable());
        assert_eq!(statuses[0].faculty_id.as_deref(), Some("u-f1"));
        assert_eq!(statuses[0].message, "Ready to import (Maria Santos)");
    }

    #[test]
    fn test_faculty_format_and_reference_checks() {
        let statuses = validate_faculty_assignments(
            &[
                faculty_row(2, "FAC001", "Newton"),
                faculty_row(3, "F009", "Newton"),
                faculty_row(4, "F001", "Pascal"),
            ],
            &snapshot(),
            Flow::Standalone,
        );

        assert_eq!(statuses[0].issue(), Some(Issue::Format));
        assert_eq!(statuses[1].issue(), Some(Issue::ReferenceNotFound));
        assert_eq!(statuses[1].message, "Faculty F009 does not exist or is not active");
        assert_eq!(statuses[2].issue(), Some(Issue::ReferenceNotFound));
    }

    #[test]
    fn test_faculty_conflict_within_file() {
        let statuses = validate_faculty_assignments(
            &[faculty_row(2, "F001", "Curie"), faculty_row(3, "F002", "Curie")],
            &snapshot(),
            Flow::TermImport,
        );

        assert!(statuses[0].is_importable());
        assert_eq!(statuses[1].issue(), Some(Issue::Conflict));
        assert!(statuses[1].message.contains("row 2"));
    }

    #[test]
    fn test_student_requires_approved_registrant_when_standalone() {
        let mut snap = snapshot();
        snap.add_registrant(approved("25-00017"));

        let records = [student_row(2, "25-00017", "Newton"), student_row(3, "25-00018", "Newton")];
        let standalone = validate_student_assignments(&records, &snap, Flow::Standalone);

        assert!(standalone[0].is_importable());
        assert_eq!(standalone[0].student_id.as_deref(), Some("u-s1"));
        assert_eq!(standalone[1].issue(), Some(Issue::NotApproved));

        let term = validate_student_assignments(&records, &snap, Flow::TermImport);
        assert!(term[1].is_importable());
        assert_eq!(term[1].student_id, None);
    }

    #[test]
    fn test_student_format_checks() {
        let mut bad_date = student_row(4, "25-00017", "Newton");
        bad_date.enrollment_date = "sometime".to_string();

        let statuses = validate_student_assignments(
            &[
                student_row(2, "2-500017", "Newton"),
                student_row(3, "AB-12345", "Newton"),
                bad_date,
            ],
            &snapshot(),
            Flow::TermImport,
        );

        assert!(statuses.iter().all(|s| s.issue() == Some(Issue::Format)));
    }

    #[test]
    fn test_student_existing_by_school_id() {
        let mut snap = snapshot();
        snap.add_student_assignment(StudentAssignment {
            id: "sa1".to_string(),
            student_id: None,
            student_school_id: "25-00099".to_string(),
            first_name: "Ben".to_string(),
            last_name: "Cruz".to_string(),
            track_name: "Academic".to_string(),
            strand_name: "STEM".to_string(),
            section_name: "Newton".to_string(),
            grade_level: GradeLevel::Grade11,
            enrollment_no: None,
            enrollment_date: None,
            term_id: "term-1".to_string(),
            status: RecordStatus::Active,
        });

        let records = [student_row(2, "25-00099", "newton"), student_row(3, "25-00099", "Newton")];
        let statuses = validate_student_assignments(&records, &snap, Flow::TermImport);

        assert_eq!(statuses[0].verdict, Verdict::Exists);
        assert_eq!(statuses[1].issue(), Some(Issue::DuplicateInBatch));
    }
}
