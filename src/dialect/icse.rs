//! ICSE (Council for the Indian School Certificate Examinations) layout.
//!
//! The information block reads as prose rather than labelled fields:
//!
//! ```text
//! Name  ANANYA ROY
//! of    LA MARTINIERE FOR GIRLS, KOLKATA
//! Unique ID 7412589
//! Daughter of
//! Smt REKHA ROY
//! Shri ANIL ROY
//! ```
//!
//! The marks table has no subject codes, and two certificate generations
//! print marks differently: the newer one repeats a zero-padded mark
//! (`HINDI 092 92 NINE TWO`), the older one appends a grade letter
//! (`PHYSICS 83 EIGHT THREE C`). Sub-subjects of a group carry only a mark
//! (`ENGLISH LANGUAGE 076`). Everything above the table header (and a few
//! metadata lines OCR drags into the table region) is skipped.

use crate::dialect::DialectExtractor;
use crate::pipeline::rules::{
    cleaned_group, compile, finalize_subjects, parse_mark, raw_group, FieldRule, ParentWindow,
    RowTable,
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
        &[
            (r"Name\s+([A-Z\s]+)\s+of", cleaned_group),
            (r"Name\s+([A-Z\s]+)\b", cleaned_group),
            (r"^([A-Z\s]+)\s+of\s+[A-Z\s,]+", cleaned_group),
        ],
    )
});

static UNIQUE_ID: Lazy<FieldRule<String>> = Lazy::new(|| {
    FieldRule::new("unique_id", &[(r"(?i)UNIQUE ID\s*([0-9]{7,8})", raw_group)])
});

/// School name runs from an `of` up to the `Unique ID` line or the `<<<`
/// machine-readable strip.
static SCHOOL_NAME: Lazy<FieldRule<String>> = Lazy::new(|| {
    FieldRule::new(
        "school_name",
        &[(
            r"of\s+([A-Z][A-Z\s.&,]+?)(?:\n\s*[Uu]nique|<<<)",
            cleaned_group,
        )],
    )
});

static PARENTS: Lazy<ParentWindow> = Lazy::new(|| {
    ParentWindow::new(
        r"(?i)(Daughter|Son)\s+of",
        4,
        r"(?i)^(?:Smt\.?|Mrs\.?)\s+(.+)$",
        r"(?i)^(?:Shri\.?|Mr\.?)\s+(.+)$",
    )
});

static SECTION: Lazy<SectionRules> = Lazy::new(|| SectionRules {
    initial: ScanState::SeekingSection,
    header: Some(compile(r"(?i)(SUBJECTS|External Examination|Percentage Mark)")),
    row_hint: Some(compile(r"^[A-Z][A-Z &,.'-]+\s+[0-9]")),
    noise: Some(compile(
        r"(?i)(UNIQUE ID|Daughter|Smt|Shri|Mother|Father|Internal Assessment|GRADE|Date of birth|Head of the School|registration|COMMUNITY SERVICE|SUPW|NEW DELHI)",
    )),
    collapse_whitespace: true,
});

static ROWS: Lazy<RowTable> = Lazy::new(|| {
    RowTable::new(&[
        // HINDI 092 92 NINE TWO
        (
            r"^([A-Z][A-Z &,.'-]+?)\s+([0-9]{3}|[xX]{3})\s+([0-9]{2,3}|[xX]{3})\s+([A-Z]+(?:\s+[A-Z]+)+)$",
            marks_row,
        ),
        // ENGLISH 80 EIGHT ZERO
        (
            r"^([A-Z][A-Z &,.'-]+?)\s+([0-9]{2,3}|[xX]{3})\s+([A-Z]+(?:\s+[A-Z]+)+)$",
            marks_row,
        ),
        // MATHEMATICS 79 SEVKN N  (one garbled word, then grade)
        (
            r"^([A-Z][A-Z &,.'-]+?)\s+([0-9]{2,3}|[xX]{3})\s+([A-Z]+)\s+([A-Z])\s*$",
            single_word_graded_row,
        ),
        // PHYSICS 83 EIGHT THREE C
        (
            r"^([A-Z][A-Z &,.'-]+?)\s+([0-9]{2,3}|[xX]{3})\s+([A-Z]+(?:\s+[A-Z]+)+)\s+([A-Z])\s*$",
            marks_row,
        ),
        // ENGLISH LANGUAGE 076, or a placeholder: HINDI xxx
        (r"^([A-Z][A-Z &,.'-]+?)\s+(0?[0-9]{2,3}|[xX]{3})\s*$", marks_row),
    ])
});

/// Name in group 1, mark in group 2. Spelled words and grade letters are
/// not kept; `marks_in_words` is derived from the mark.
fn marks_row(caps: &Captures<'_>) -> Option<SubjectRecord> {
    let name = normalize(caps.get(1)?.as_str())?;
    let marks = parse_mark(caps.get(2).map(|m| m.as_str()));
    Some(SubjectRecord::new(None, name).with_marks(marks))
}

/// A lone short word is more likely a stray token than a spelled mark.
fn single_word_graded_row(caps: &Captures<'_>) -> Option<SubjectRecord> {
    if caps.get(3)?.as_str().chars().count() <= 3 {
        return None;
    }
    marks_row(caps)
}

/// Extractor for ICSE marksheets.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcseExtractor;

impl DialectExtractor for IcseExtractor {
    fn board(&self) -> Board {
        Board::Icse
    }

    fn extract(&self, info_text: &str, marks_text: &str) -> CanonicalRecord {
        let mut record = CanonicalRecord::new(Board::Icse);
        record.student_name = STUDENT_NAME.apply(info_text);
        record.unique_id = UNIQUE_ID.apply(info_text);
        let parents = PARENTS.apply(info_text);
        record.mother_name = parents.mother;
        record.father_name = parents.father;
        record.school_name = SCHOOL_NAME.apply(info_text);

        let subjects = candidate_lines(marks_text, &SECTION)
            .iter()
            .filter_map(|line| ROWS.match_line(line))
            .collect();
        record.subjects = finalize_subjects(subjects, false);

        debug!(subjects = record.subjects.len(), "ICSE extraction done");
        record
    }
}
