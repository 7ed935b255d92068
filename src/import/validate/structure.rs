use super::*;
use crate::import::normalize::{SectionRecord, StrandRecord, SubjectRecord, TrackRecord};
use crate::import::snapshot::key;

pub fn validate_tracks(
    records: &[TrackRecord],
    snapshot: &ReferenceSnapshot,
    flow: Flow,
) -> Vec<RowStatus> {
    let mut batch = BatchKeys::new();
    records
        .iter()
        .map(|r| finish(r.row, check_track(r, snapshot, flow, &mut batch)))
        .collect()
}

fn check_track(
    r: &TrackRecord,
    snapshot: &ReferenceSnapshot,
    flow: Flow,
    batch: &mut BatchKeys<String>,
) -> Check<Accepted> {
    required(&r.track_name, "Track Name")?;
    batch.claim(key(&r.track_name), r.row)?;

    let exists = snapshot.track(&r.track_name).is_some();
    existing(flow, exists, &format!("Track '{}'", r.track_name))
}

pub fn validate_strands(
    records: &[StrandRecord],
    snapshot: &ReferenceSnapshot,
    flow: Flow,
) -> Vec<RowStatus> {
    let mut batch = BatchKeys::new();
    records
        .iter()
        .map(|r| finish(r.row, check_strand(r, snapshot, flow, &mut batch)))
        .collect()
}

fn check_strand(
    r: &StrandRecord,
    snapshot: &ReferenceSnapshot,
    flow: Flow,
    batch: &mut BatchKeys<String>,
) -> Check<Accepted> {
    required(&r.track_name, "Track Name")?;
    required(&r.strand_name, "Strand Name")?;
    require_track(snapshot, &r.track_name)?;
    batch.claim(key(&r.strand_name), r.row)?;

    let exists = snapshot.strand_named(&r.strand_name).is_some();
    existing(flow, exists, &format!("Strand '{}'", r.strand_name))
}

pub fn validate_sections(
    records: &[SectionRecord],
    snapshot: &ReferenceSnapshot,
    flow: Flow,
) -> Vec<RowStatus> {
    let mut batch = BatchKeys::new();
    records
        .iter()
        .map(|r| finish(r.row, check_section(r, snapshot, flow, &mut batch)))
        .collect()
}

fn check_section(
    r: &SectionRecord,
    snapshot: &ReferenceSnapshot,
    flow: Flow,
    batch: &mut BatchKeys<(String, String, String, GradeLevel)>,
) -> Check<Accepted> {
    required(&r.track_name, "Track Name")?;
    required(&r.strand_name, "Strand Name")?;
    required(&r.section_name, "Section Name")?;
    required(&r.grade_level, "Grade Level")?;
    let grade = grade(&r.grade_level)?;
    require_track(snapshot, &r.track_name)?;
    require_strand(snapshot, &r.track_name, &r.strand_name)?;
    batch.claim(
        (
            key(&r.track_name),
            key(&r.strand_name),
            key(&r.section_name),
            grade,
        ),
        r.row,
    )?;

    let exists = snapshot
        .section(&r.track_name, &r.strand_name, &r.section_name, grade)
        .is_some();
    existing(
        flow,
        exists,
        &format!("Section '{}' ({grade})", r.section_name),
    )
}

pub fn validate_subjects(
    records: &[SubjectRecord],
    snapshot: &ReferenceSnapshot,
    flow: Flow,
) -> Vec<RowStatus> {
    let mut batch = BatchKeys::new();
    records
        .iter()
        .map(|r| finish(r.row, check_subject(r, snapshot, flow, &mut batch)))
        .collect()
}

fn check_subject(
    r: &SubjectRecord,
    snapshot: &ReferenceSnapshot,
    flow: Flow,
    batch: &mut BatchKeys<String>,
) -> Check<Accepted> {
    required(&r.track_name, "Track Name")?;
    required(&r.strand_name, "Strand Name")?;
    required(&r.grade_level, "Grade Level")?;
    required(&r.subject_name, "Subject Name")?;
    grade(&r.grade_level)?;
    require_track(snapshot, &r.track_name)?;
    require_strand(snapshot, &r.track_name, &r.strand_name)?;
    batch.claim(key(&r.subject_name), r.row)?;

    let exists = snapshot.subject_named(&r.subject_name).is_some();
    existing(flow, exists, &format!("Subject '{}'", r.subject_name))
}
