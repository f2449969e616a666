//! Uttarakhand Board of School Education layout.
//!
//! Marks rows carry a code, a name and two to four bare numbers (or `xxx`
//! placeholders) with no column headers the OCR keeps reliably:
//!
//! ```text
//! 086 SCIENCE        62  18  80
//! 087 SOCIAL SCIENCE 55  20  75
//! 002 HINDI          70  70
//! ```
//!
//! Which number is which depends on the subject: science subjects carry a
//! practical component, social science an internal assessment, languages
//! neither. [`MARKS_POLICY`] maps each validated subject class to its
//! positional layout.

use crate::dialect::DialectExtractor;
use crate::pipeline::rules::{
    cleaned_group, compile, finalize_subjects, parse_mark, FieldRule, RowTable,
};
use crate::pipeline::scan::{candidate_lines, ScanState, SectionRules};
use crate::pipeline::text::normalize;
use crate::record::{Board, CanonicalRecord, SubjectRecord};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, warn};

static STUDENT_NAME: Lazy<FieldRule<String>> = Lazy::new(|| {
    FieldRule::new(
        "student_name",
        &[(r"([A-Z ]+)\s+SonDaughter of", cleaned_group)],
    )
});

static MOTHER_NAME: Lazy<FieldRule<String>> =
    Lazy::new(|| FieldRule::new("mother_name", &[(r"Mrs\. ([A-Z ]+)", cleaned_group)]));

static FATHER_NAME: Lazy<FieldRule<String>> =
    Lazy::new(|| FieldRule::new("father_name", &[(r"Mr\. ([A-Z ]+)", cleaned_group)]));

static SCHOOL_NAME: Lazy<FieldRule<String>> = Lazy::new(|| {
    FieldRule::new(
        "school_name",
        &[(r"from School\s+([A-Z0-9 .&-]+)", cleaned_group)],
    )
});

static SECTION: Lazy<SectionRules> = Lazy::new(|| SectionRules {
    initial: ScanState::InSection,
    header: None,
    row_hint: None,
    noise: Some(compile(
        r"(SUBJECT|GRADE|PASSED|RESULT|POSITIONAL|ADDITIONAL SUBJECT|DATED)",
    )),
    collapse_whitespace: false,
});

static ROWS: Lazy<RowTable> = Lazy::new(|| {
    RowTable::new(&[(
        r"^\s*([0-9]{3})\s+([A-Z .&'-]+?)\s+((?:(?:[0-9]{2,3}|[xX]{3})\s+){1,3}(?:[0-9]{2,3}|[xX]{3}))",
        subject_row,
    )])
});

/// One positional mark; a placeholder keeps its position.
static MARK_TOKEN: Lazy<Regex> = Lazy::new(|| compile(r"[0-9]{2,3}|[xX]{3}"));

// ── Marks-assignment policy ──────────────────────────────────────────────────

/// Column a captured number is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarksSlot {
    Theory,
    Practical,
    Internal,
    Total,
}

use MarksSlot::{Internal, Practical, Theory, Total};

/// Subjects that share a marks layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectClass {
    /// Theory plus internal assessment.
    InternalAssessed,
    /// Theory plus practical.
    LabBearing,
    /// Theory only.
    Language,
}

/// Layout for one subject class.
#[derive(Debug)]
pub struct ClassPolicy {
    pub class: SubjectClass,
    pub subjects: &'static [&'static str],
    /// Layouts keyed by how many numbers the row carried.
    pub by_count: &'static [(usize, &'static [MarksSlot])],
    /// Used for any other count; assigned to the leading numbers.
    pub otherwise: &'static [MarksSlot],
}

/// Validated layouts. A subject missing from this table has no known layout.
pub const MARKS_POLICY: &[ClassPolicy] = &[
    ClassPolicy {
        class: SubjectClass::InternalAssessed,
        subjects: &["SOCIAL SCIENCE"],
        by_count: &[(3, &[Theory, Internal, Total]), (2, &[Theory, Total])],
        otherwise: &[Theory],
    },
    ClassPolicy {
        class: SubjectClass::LabBearing,
        subjects: &["MATHEMATICS", "SCIENCE"],
        by_count: &[(3, &[Theory, Practical, Total]), (2, &[Theory, Total])],
        otherwise: &[Theory],
    },
    ClassPolicy {
        class: SubjectClass::Language,
        subjects: &["HINDI", "ENGLISH", "SANSKRIT"],
        by_count: &[(1, &[Theory])],
        otherwise: &[Theory, Total],
    },
];

/// Find the policy for a normalised subject name.
pub fn policy_for(subject: &str) -> Option<&'static ClassPolicy> {
    MARKS_POLICY.iter().find(|p| p.subjects.contains(&subject))
}

impl ClassPolicy {
    /// Slot layout for a row with `count` numbers.
    pub fn layout(&self, count: usize) -> &'static [MarksSlot] {
        self.by_count
            .iter()
            .find(|(n, _)| *n == count)
            .map(|(_, slots)| *slots)
            .unwrap_or(self.otherwise)
    }
}

fn assign_marks(subject: SubjectRecord, marks: &[Option<u32>]) -> SubjectRecord {
    let Some(policy) = policy_for(&subject.name) else {
        warn!(
            subject = %subject.name,
            numbers = marks.len(),
            "no Uttarakhand marks layout for subject; marks left empty until a policy entry is added"
        );
        return subject;
    };

    let mut subject = subject;
    let mut total = None;
    for (slot, value) in policy.layout(marks.len()).iter().zip(marks) {
        match slot {
            Theory => subject.theory_marks = *value,
            Practical => subject.practical_marks = *value,
            Internal => subject.internal_marks = *value,
            Total => total = *value,
        }
    }
    subject.with_total(total)
}

fn subject_row(caps: &Captures<'_>) -> Option<SubjectRecord> {
    let code = caps.get(1)?.as_str().to_string();
    let name = normalize(caps.get(2)?.as_str())?;
    let marks: Vec<Option<u32>> = MARK_TOKEN
        .find_iter(caps.get(3)?.as_str())
        .map(|m| parse_mark(Some(m.as_str())))
        .collect();
    Some(assign_marks(SubjectRecord::new(Some(code), name), &marks))
}

/// Extractor for Uttarakhand board marksheets.
#[derive(Debug, Clone, Copy, Default)]
pub struct UttarakhandExtractor;

impl DialectExtractor for UttarakhandExtractor {
    fn board(&self) -> Board {
        Board::Uttarakhand
    }

    fn extract(&self, info_text: &str, marks_text: &str) -> CanonicalRecord {
        let mut record = CanonicalRecord::new(Board::Uttarakhand);
        record.student_name = STUDENT_NAME.apply(info_text);
        record.mother_name = MOTHER_NAME.apply(info_text);
        record.father_name = FATHER_NAME.apply(info_text);
        record.school_name = SCHOOL_NAME.apply(info_text);

        let subjects = candidate_lines(marks_text, &SECTION)
            .iter()
            .filter_map(|line| ROWS.match_line(line))
            .collect();
        record.subjects = finalize_subjects(subjects, true);

        debug!(subjects = record.subjects.len(), "Uttarakhand extraction done");
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(marks_line: &str) -> SubjectRecord {
        UttarakhandExtractor
            .extract("", marks_line)
            .subjects
            .into_iter()
            .next()
            .expect("one subject")
    }

    #[test]
    fn lab_subject_three_numbers() {
        let s = subject("086 SCIENCE 62 18 80");
        assert_eq!(s.code.as_deref(), Some("086"));
        assert_eq!(s.theory_marks, Some(62));
        assert_eq!(s.practical_marks, Some(18));
        assert_eq!(s.internal_marks, None);
        assert_eq!(s.total_marks(), Some(80));
        assert_eq!(s.total_in_words(), Some("EIGHT ZERO"));
        assert_eq!(s.grade, None);
    }

    #[test]
    fn internal_assessed_three_numbers() {
        let s = subject("087 SOCIAL SCIENCE 55 20 75");
        assert_eq!(s.name, "SOCIAL SCIENCE");
        assert_eq!(s.theory_marks, Some(55));
        assert_eq!(s.internal_marks, Some(20));
        assert_eq!(s.practical_marks, None);
        assert_eq!(s.total_marks(), Some(75));
    }

    #[test]
    fn lab_subject_two_numbers() {
        let s = subject("041 MATHEMATICS 88 88");
        assert_eq!(s.theory_marks, Some(88));
        assert_eq!(s.practical_marks, None);
        assert_eq!(s.total_marks(), Some(88));
    }

    #[test]
    fn lab_subject_four_numbers_keeps_theory_only() {
        let s = subject("086 SCIENCE 62 18 10 90");
        assert_eq!(s.theory_marks, Some(62));
        assert_eq!(s.practical_marks, None);
        assert_eq!(s.total_marks(), None);
        assert_eq!(s.total_in_words(), None);
    }

    #[test]
    fn language_uses_first_two_numbers() {
        let s = subject("002 HINDI 70 85 99");
        assert_eq!(s.theory_marks, Some(70));
        assert_eq!(s.total_marks(), Some(85));
        assert_eq!(s.total_in_words(), Some("EIGHT FIVE"));
    }

    #[test]
    fn placeholder_keeps_row_and_position() {
        let marks = "086 SCIENCE 58 xxx 78\n002 HINDI XXX 70\n";
        let record = UttarakhandExtractor.extract("", marks);
        let names: Vec<&str> = record.subjects.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["SCIENCE", "HINDI"]);

        let science = &record.subjects[0];
        assert_eq!(science.theory_marks, Some(58));
        assert_eq!(science.practical_marks, None);
        assert_eq!(science.total_marks(), Some(78));
        assert_eq!(science.total_in_words(), Some("SEVEN EIGHT"));

        let hindi = &record.subjects[1];
        assert_eq!(hindi.theory_marks, None);
        assert_eq!(hindi.total_marks(), Some(70));
    }

    #[test]
    fn placeholder_total_has_no_words() {
        let s = subject("087 SOCIAL SCIENCE 60 18 xxx");
        assert_eq!(s.internal_marks, Some(18));
        assert_eq!(s.total_marks(), None);
        assert_eq!(s.total_in_words(), None);
    }

    #[test]
    fn unclassified_subject_keeps_identity_only() {
        let s = subject("095 DRAWING 40 30 70");
        assert_eq!(s.name, "DRAWING");
        assert_eq!(s.code.as_deref(), Some("095"));
        assert_eq!(s.theory_marks, None);
        assert_eq!(s.total_marks(), None);
    }

    #[test]
    fn policy_layout_lookup() {
        let lab = policy_for("SCIENCE").expect("validated subject");
        assert_eq!(lab.class, SubjectClass::LabBearing);
        assert_eq!(lab.layout(3), &[Theory, Practical, Total]);
        assert_eq!(lab.layout(1), &[Theory]);
        assert!(policy_for("PHYSICAL EDUCATION").is_none());
    }

    #[test]
    fn noise_lines_skipped() {
        let marks = "CODE SUBJECT THEORY PRACT TOTAL\n\
                     002 HINDI 70 70\n\
                     RESULT PASSED 1ST DIVISION\n\
                     DATED 25 05 2023\n";
        let record = UttarakhandExtractor.extract("", marks);
        assert_eq!(record.subjects.len(), 1);
        assert_eq!(record.subjects[0].name, "HINDI");
    }

    #[test]
    fn identity_fields() {
        let info = "RAHUL NEGI SonDaughter of\n\
                    Mrs. SUNITA NEGI\n\
                    Mr. MOHAN SINGH NEGI\n\
                    from School GOVT. INTER COLLEGE DEHRADUN\n";
        let record = UttarakhandExtractor.extract(info, "");
        assert_eq!(record.student_name.as_deref(), Some("RAHUL NEGI"));
        assert_eq!(record.mother_name.as_deref(), Some("SUNITA NEGI"));
        assert_eq!(record.father_name.as_deref(), Some("MOHAN SINGH NEGI"));
        assert_eq!(
            record.school_name.as_deref(),
            Some("GOVT. INTER COLLEGE DEHRADUN")
        );
    }
}
