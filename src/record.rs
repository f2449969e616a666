//! The canonical record produced by every dialect extractor.
//!
//! Field names are identical across boards so a single JSON schema covers
//! every document; fields a dialect never fills are serialised as `null`.
//! Consumers must treat every field except `board`, `subjects` and
//! [`SubjectRecord::name`] as optional.

use crate::pipeline::text::digits_to_words;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Examination board whose layout a document follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Board {
    Cbse,
    Icse,
    Uttarakhand,
    /// The hint matched no supported board.
    #[default]
    Unknown,
}

impl Board {
    /// Every board with an extractor, in dispatch order.
    pub const SUPPORTED: [Board; 3] = [Board::Cbse, Board::Icse, Board::Uttarakhand];

    pub fn is_known(self) -> bool {
        self != Board::Unknown
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Board::Cbse => "CBSE",
            Board::Icse => "ICSE",
            Board::Uttarakhand => "UTTARAKHAND",
            Board::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// Structured data recovered from one marksheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub board: Board,
    pub student_name: Option<String>,
    /// CBSE roll number.
    pub roll_number: Option<String>,
    /// ICSE unique candidate ID.
    pub unique_id: Option<String>,
    pub mother_name: Option<String>,
    pub father_name: Option<String>,
    pub school_name: Option<String>,
    /// CBSE five-digit school code.
    pub school_code: Option<String>,
    /// Subjects in the order they appear on the certificate.
    pub subjects: Vec<SubjectRecord>,
}

impl CanonicalRecord {
    /// An empty record for `board`.
    pub fn new(board: Board) -> Self {
        Self {
            board,
            ..Self::default()
        }
    }

    /// Look up a subject by its normalised name.
    pub fn subject(&self, name: &str) -> Option<&SubjectRecord> {
        self.subjects.iter().find(|s| s.name == name)
    }
}

/// One row of a marks table.
///
/// The `*_in_words` fields are derived: they can only be set through
/// [`SubjectRecord::with_total`] and [`SubjectRecord::with_marks`], which keep
/// them in step with the numeric value. Deserialising rebuilds them from the
/// numbers and ignores whatever words the JSON carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSubject")]
pub struct SubjectRecord {
    pub code: Option<String>,
    pub name: String,
    pub theory_marks: Option<u32>,
    pub practical_marks: Option<u32>,
    pub internal_marks: Option<u32>,
    total_marks: Option<u32>,
    total_in_words: Option<String>,
    /// Single aggregate mark (ICSE).
    marks: Option<u32>,
    marks_in_words: Option<String>,
    pub grade: Option<String>,
}

/// Wire form of [`SubjectRecord`] without the derived word fields.
#[derive(Deserialize)]
struct RawSubject {
    code: Option<String>,
    name: String,
    theory_marks: Option<u32>,
    practical_marks: Option<u32>,
    internal_marks: Option<u32>,
    total_marks: Option<u32>,
    marks: Option<u32>,
    grade: Option<String>,
}

impl From<RawSubject> for SubjectRecord {
    fn from(raw: RawSubject) -> Self {
        let mut subject = SubjectRecord::new(raw.code, raw.name)
            .with_total(raw.total_marks)
            .with_marks(raw.marks);
        subject.theory_marks = raw.theory_marks;
        subject.practical_marks = raw.practical_marks;
        subject.internal_marks = raw.internal_marks;
        subject.grade = raw.grade;
        subject
    }
}

impl SubjectRecord {
    pub fn new(code: Option<String>, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            theory_marks: None,
            practical_marks: None,
            internal_marks: None,
            total_marks: None,
            total_in_words: None,
            marks: None,
            marks_in_words: None,
            grade: None,
        }
    }

    pub fn with_total(mut self, total: Option<u32>) -> Self {
        self.total_marks = total;
        self.total_in_words = total.map(digits_to_words);
        self
    }

    pub fn with_marks(mut self, marks: Option<u32>) -> Self {
        self.marks = marks;
        self.marks_in_words = marks.map(digits_to_words);
        self
    }

    pub fn total_marks(&self) -> Option<u32> {
        self.total_marks
    }

    pub fn total_in_words(&self) -> Option<&str> {
        self.total_in_words.as_deref()
    }

    pub fn marks(&self) -> Option<u32> {
        self.marks
    }

    pub fn marks_in_words(&self) -> Option<&str> {
        self.marks_in_words.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_serialises_uppercase() {
        let json = serde_json::to_string(&Board::Uttarakhand).expect("serialise");
        assert_eq!(json, "\"UTTARAKHAND\"");
        let back: Board = serde_json::from_str("\"CBSE\"").expect("deserialise");
        assert_eq!(back, Board::Cbse);
    }

    #[test]
    fn words_follow_numeric_fields() {
        let s = SubjectRecord::new(Some("301".into()), "ENGLISH CORE")
            .with_total(Some(91))
            .with_marks(None);
        assert_eq!(s.total_in_words(), Some("NINE ONE"));
        assert_eq!(s.marks_in_words(), None);

        let cleared = s.with_total(None);
        assert_eq!(cleared.total_marks(), None);
        assert_eq!(cleared.total_in_words(), None);
    }

    #[test]
    fn absent_fields_serialise_as_null() {
        let mut record = CanonicalRecord::new(Board::Icse);
        record.student_name = Some("ANANYA ROY".into());
        record
            .subjects
            .push(SubjectRecord::new(None, "HINDI").with_marks(Some(92)));

        let value = serde_json::to_value(&record).expect("serialise");
        assert_eq!(value["board"], "ICSE");
        assert!(value["roll_number"].is_null());
        assert!(value["subjects"][0]["code"].is_null());
        assert_eq!(value["subjects"][0]["marks"], 92);
        assert_eq!(value["subjects"][0]["marks_in_words"], "NINE TWO");
    }

    #[test]
    fn loaded_words_are_rebuilt_from_numbers() {
        let json = r#"{
            "code": "086", "name": "SCIENCE",
            "theory_marks": 3, "practical_marks": null, "internal_marks": null,
            "total_marks": 5, "total_in_words": "NINE NINE",
            "marks": null, "marks_in_words": "ONE",
            "grade": null
        }"#;
        let s: SubjectRecord = serde_json::from_str(json).expect("deserialise");
        assert_eq!(s.total_marks(), Some(5));
        assert_eq!(s.total_in_words(), Some("FIVE"));
        assert_eq!(s.marks(), None);
        assert_eq!(s.marks_in_words(), None);
        assert_eq!(s.theory_marks, Some(3));
    }

    #[test]
    fn record_round_trips_through_json() {
        let mut record = CanonicalRecord::new(Board::Cbse);
        record.roll_number = Some("16614513".into());
        record.subjects.push(
            SubjectRecord::new(Some("041".into()), "MATHEMATICS").with_total(Some(95)),
        );
        let json = serde_json::to_string(&record).expect("serialise");
        let back: CanonicalRecord = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, record);
    }
}
