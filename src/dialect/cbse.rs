//! CBSE (Central Board of Secondary Education) layout.
//!
//! Identity fields are labelled ("Name of Candidate", "Roll No.", ...).
//! Marks rows carry a three-digit subject code and fixed columns:
//!
//! ```text
//! 301  ENGLISH CORE      074   017   091   NINE ONE   A2
//! code name              theory prac  total words      grade
//! ```
//!
//! Theory and practical may be the placeholder `xxx` or blank. A blank
//! column is still separated by whitespace, so rows are matched on the raw
//! line without collapsing spaces.

use crate::dialect::DialectExtractor;
use crate::pipeline::rules::{
    cleaned_group, finalize_subjects, parse_mark, raw_group, FieldRule, RowTable,
};
use crate::pipeline::scan::{candidate_lines, ScanState, SectionRules};
use crate::pipeline::text::normalize;
use crate::record::{Board, CanonicalRecord, SubjectRecord};
use once_cell::sync::Lazy;
use regex::Captures;
use tracing::debug;

static STUDENT_NAME: Lazy<FieldRule<String>> = Lazy::new(|| {
    FieldRule::new(
        "student_name",
        &[(r"Name of Candidate\s+([A-Z ]+)", cleaned_group)],
    )
});

static ROLL_NUMBER: Lazy<FieldRule<String>> =
    Lazy::new(|| FieldRule::new("roll_number", &[(r"Roll No\.?\s*([0-9]+)", raw_group)]));

static MOTHER_NAME: Lazy<FieldRule<String>> = Lazy::new(|| {
    FieldRule::new(
        "mother_name",
        &[(r"Mother'?s Name\s+([A-Z ]+)", cleaned_group)],
    )
});

static FATHER_NAME: Lazy<FieldRule<String>> = Lazy::new(|| {
    FieldRule::new(
        "father_name",
        &[
            (r"Father'?s/Guardian'?s Name\s+([A-Z ]+)", cleaned_group),
            (r"Father'?s Name\s+([A-Z ]+)", cleaned_group),
        ],
    )
});

/// School code and name are printed together: `School 45123 DELHI PUBLIC SCHOOL`.
static SCHOOL: Lazy<FieldRule<(String, Option<String>)>> = Lazy::new(|| {
    FieldRule::new(
        "school",
        &[
            (r"School\s*([0-9]{5})\s+([A-Z &]+[A-Z ]+)", school_capture),
            (r"([0-9]{5})\s+([A-Z &]+[A-Z ]+)", school_capture),
        ],
    )
});

fn school_capture(caps: &Captures<'_>) -> Option<(String, Option<String>)> {
    let code = caps.get(1)?.as_str().to_string();
    let name = caps.get(2).and_then(|m| normalize(m.as_str()));
    Some((code, name))
}

static SECTION: Lazy<SectionRules> = Lazy::new(|| SectionRules {
    initial: ScanState::InSection,
    header: None,
    row_hint: None,
    noise: None,
    collapse_whitespace: false,
});

static ROWS: Lazy<RowTable> = Lazy::new(|| {
    RowTable::new(&[(
        r"^\s*([0-9]{3})\s+([A-Z &]+?)\s+([0-9]{2,3}|[xX]{3})?\s+([0-9]{2,3}|[xX]{3})?\s+([0-9]{2,3})?\s+([A-Z ]+)?\s*([A-Z][0-9])?\s*$",
        subject_row,
    )])
});

/// Group 6 (the spelled total) is ignored; the words are re-derived from
/// the numeric total so OCR misspellings never reach the record.
fn subject_row(caps: &Captures<'_>) -> Option<SubjectRecord> {
    let code = caps.get(1)?.as_str().to_string();
    let name = normalize(caps.get(2)?.as_str())?;

    let mut subject = SubjectRecord::new(Some(code), name)
        .with_total(parse_mark(caps.get(5).map(|m| m.as_str())));
    subject.theory_marks = parse_mark(caps.get(3).map(|m| m.as_str()));
    subject.practical_marks = parse_mark(caps.get(4).map(|m| m.as_str()));
    subject.grade = caps.get(7).map(|m| m.as_str().to_string());
    Some(subject)
}

/// Extractor for CBSE marksheets.
#[derive(Debug, Clone, Copy, Default)]
pub struct CbseExtractor;

impl DialectExtractor for CbseExtractor {
    fn board(&self) -> Board {
        Board::Cbse
    }

    fn extract(&self, info_text: &str, marks_text: &str) -> CanonicalRecord {
        let mut record = CanonicalRecord::new(Board::Cbse);
        record.student_name = STUDENT_NAME.apply(info_text);
        record.roll_number = ROLL_NUMBER.apply(info_text);
        record.mother_name = MOTHER_NAME.apply(info_text);
        record.father_name = FATHER_NAME.apply(info_text);
        if let Some((code, name)) = SCHOOL.apply(info_text) {
            record.school_code = Some(code);
            record.school_name = name;
        }

        let subjects = candidate_lines(marks_text, &SECTION)
            .iter()
            .filter_map(|line| ROWS.match_line(line))
            .collect();
        record.subjects = finalize_subjects(subjects, true);

        debug!(subjects = record.subjects.len(), "CBSE extraction done");
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(info: &str, marks: &str) -> CanonicalRecord {
        CbseExtractor.extract(info, marks)
    }

    #[test]
    fn full_row() {
        let record = extract(
            "Name of Candidate SATYAM JHA",
            "301 ENGLISH CORE 74 17 91 NINE ONE A2",
        );
        assert_eq!(record.student_name.as_deref(), Some("SATYAM JHA"));

        let s = &record.subjects[0];
        assert_eq!(s.code.as_deref(), Some("301"));
        assert_eq!(s.name, "ENGLISH CORE");
        assert_eq!(s.theory_marks, Some(74));
        assert_eq!(s.practical_marks, Some(17));
        assert_eq!(s.total_marks(), Some(91));
        assert_eq!(s.total_in_words(), Some("NINE ONE"));
        assert_eq!(s.grade.as_deref(), Some("A2"));
    }

    #[test]
    fn placeholder_practical() {
        let record = extract("", "041 MATHEMATICS 080 xxx 080 EIGHT ZERO A1");
        let s = record.subject("MATHEMATICS").expect("row parsed");
        assert_eq!(s.theory_marks, Some(80));
        assert_eq!(s.practical_marks, None);
        assert_eq!(s.total_marks(), Some(80));
        assert_eq!(s.total_in_words(), Some("EIGHT ZERO"));
    }

    #[test]
    fn placeholder_total_has_no_words() {
        let record = extract("", "042 PHYSICS XXX XXX   B1");
        let s = record.subject("PHYSICS").expect("row parsed");
        assert_eq!(s.theory_marks, None);
        assert_eq!(s.practical_marks, None);
        assert_eq!(s.total_marks(), None);
        assert_eq!(s.total_in_words(), None);
        assert_eq!(s.grade.as_deref(), Some("B1"));
    }

    #[test]
    fn identity_fields() {
        let info = "Roll No. 16614513\n\
                    Name of Candidate SATYAM JHA\n\
                    Mother's Name SUNITA JHA\n\
                    Father's/Guardian's Name RAJESH KUMAR JHA\n\
                    School 45123 DELHI PUBLIC SCHOOL R K PURAM\n";
        let record = extract(info, "");
        assert_eq!(record.roll_number.as_deref(), Some("16614513"));
        assert_eq!(record.mother_name.as_deref(), Some("SUNITA JHA"));
        assert_eq!(record.father_name.as_deref(), Some("RAJESH KUMAR JHA"));
        assert_eq!(record.school_code.as_deref(), Some("45123"));
        assert_eq!(
            record.school_name.as_deref(),
            Some("DELHI PUBLIC SCHOOL R K PURAM")
        );
    }

    #[test]
    fn father_fallback_pattern() {
        let record = extract("Fathers Name MOHAN LAL", "");
        assert_eq!(record.father_name.as_deref(), Some("MOHAN LAL"));
    }

    #[test]
    fn unmatched_lines_are_skipped() {
        let marks = "SUB CODE SUBJECT THEORY PRACTICAL\n\
                     301 ENGLISH CORE 74 17 91 NINE ONE A2\n\
                     Result PASS\n\
                     302 HINDI CORE 80 15 95 NINE FIVE A1\n";
        let record = extract("", marks);
        let names: Vec<&str> = record.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["ENGLISH CORE", "HINDI CORE"]);
    }

    #[test]
    fn duplicate_rows_keep_first() {
        let marks = "301 ENGLISH CORE 74 17 91 NINE ONE A2\n\
                     301 ENGLISH CORE 70 10 80 EIGHT ZERO B1\n";
        let record = extract("", marks);
        assert_eq!(record.subjects.len(), 1);
        assert_eq!(record.subjects[0].total_marks(), Some(91));
    }
}
