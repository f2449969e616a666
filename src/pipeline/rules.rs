//! Ordered pattern tables shared by the dialect extractors.
//!
//! Each dialect is data: a handful of [`FieldRule`]s for identity fields, an
//! optional [`ParentWindow`], and a [`RowTable`] for the marks block. All of
//! them evaluate their entries in priority order and stop at the first hit,
//! so adding a pattern is a one-line change in the dialect's table.

use crate::pipeline::text::normalize;
use crate::record::SubjectRecord;
use regex::{Captures, Regex};
use std::collections::HashSet;
use tracing::debug;

/// Reserved token printed in place of a missing mark.
pub const PLACEHOLDER: &str = "xxx";

/// Turns a successful match into a value. `None` means the match carried no
/// usable value (e.g. the capture was only whitespace).
pub type Capture<T> = fn(&Captures<'_>) -> Option<T>;

/// Builds a subject from a row match. `None` rejects the line for this
/// pattern so the next one is tried.
pub type RowBuilder = fn(&Captures<'_>) -> Option<SubjectRecord>;

/// Compile a pattern from a dialect table; a bad literal is a bug.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid rule pattern {pattern:?}: {e}"))
}

// ── Identity fields ──────────────────────────────────────────────────────────

/// Ordered alternatives for one identity field.
pub struct FieldRule<T> {
    field: &'static str,
    patterns: Vec<(Regex, Capture<T>)>,
}

impl<T> FieldRule<T> {
    pub fn new(field: &'static str, patterns: &[(&str, Capture<T>)]) -> Self {
        Self {
            field,
            patterns: patterns
                .iter()
                .map(|(p, capture)| (compile(p), *capture))
                .collect(),
        }
    }

    /// Try each pattern in order; the first one that matches decides.
    pub fn apply(&self, text: &str) -> Option<T> {
        let (idx, value) = self
            .patterns
            .iter()
            .enumerate()
            .find_map(|(idx, (re, capture))| re.captures(text).map(|caps| (idx, capture(&caps))))?;
        debug!(field = self.field, pattern = idx, found = value.is_some(), "identity rule matched");
        value
    }
}

/// First capture group, whitespace-normalised.
pub fn cleaned_group(caps: &Captures<'_>) -> Option<String> {
    caps.get(1).and_then(|m| normalize(m.as_str()))
}

/// First capture group, verbatim (identifiers made of digits).
pub fn raw_group(caps: &Captures<'_>) -> Option<String> {
    caps.get(1)
        .map(|m| m.as_str().to_string())
        .filter(|s| !s.is_empty())
}

// ── Parent names ─────────────────────────────────────────────────────────────

/// Parent names introduced by title tokens on the lines after a marker.
///
/// ```text
/// Daughter of          ← marker
/// Smt REKHA SHARMA     ← mother title
/// Shri ANIL SHARMA     ← father title
/// ```
pub struct ParentWindow {
    marker: Regex,
    /// Number of lines after the marker to search.
    window: usize,
    mother: Regex,
    father: Regex,
}

/// Result of a [`ParentWindow`] scan.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Parents {
    pub mother: Option<String>,
    pub father: Option<String>,
}

impl ParentWindow {
    /// `mother` and `father` must capture the name in group 1.
    pub fn new(marker: &str, window: usize, mother: &str, father: &str) -> Self {
        Self {
            marker: compile(marker),
            window,
            mother: compile(mother),
            father: compile(father),
        }
    }

    /// Only the first marker line is considered.
    pub fn apply(&self, text: &str) -> Parents {
        let lines: Vec<&str> = text.lines().collect();
        let Some(start) = lines.iter().position(|l| self.marker.is_match(l)) else {
            return Parents::default();
        };
        let window = &lines[start + 1..lines.len().min(start + 1 + self.window)];

        let find = |title: &Regex| {
            window
                .iter()
                .find_map(|l| title.captures(l.trim()))
                .and_then(|caps| cleaned_group(&caps))
        };

        Parents {
            mother: find(&self.mother),
            father: find(&self.father),
        }
    }
}

// ── Marks rows ───────────────────────────────────────────────────────────────

/// Ordered row patterns, most specific first.
pub struct RowTable {
    rows: Vec<(Regex, RowBuilder)>,
}

impl RowTable {
    pub fn new(rows: &[(&str, RowBuilder)]) -> Self {
        Self {
            rows: rows
                .iter()
                .map(|(p, build)| (compile(p), *build))
                .collect(),
        }
    }

    /// First pattern that matches and whose builder accepts the line wins.
    pub fn match_line(&self, line: &str) -> Option<SubjectRecord> {
        self.rows.iter().enumerate().find_map(|(idx, (re, build))| {
            let subject = build(&re.captures(line)?)?;
            debug!(pattern = idx, subject = %subject.name, "row matched");
            Some(subject)
        })
    }
}

/// Parse a captured mark.
///
/// The placeholder token (any case), an empty capture or anything that is
/// not a plain non-negative integer resolves to `None`, never to zero.
pub fn parse_mark(raw: Option<&str>) -> Option<u32> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case(PLACEHOLDER) {
        return None;
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Drop invalid subjects and duplicate names, keeping first occurrences in
/// scan order.
pub fn finalize_subjects(subjects: Vec<SubjectRecord>, require_code: bool) -> Vec<SubjectRecord> {
    let mut seen = HashSet::new();
    subjects
        .into_iter()
        .filter(|s| !s.name.is_empty())
        .filter(|s| !require_code || s.code.is_some())
        .filter(|s| {
            let fresh = seen.insert(s.name.clone());
            if !fresh {
                debug!(subject = %s.name, "dropping duplicate subject");
            }
            fresh
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_rule_first_match_wins() {
        let rule: FieldRule<String> = FieldRule::new(
            "father",
            &[
                (r"Father'?s/Guardian'?s Name\s+([A-Z ]+)", cleaned_group),
                (r"Father'?s Name\s+([A-Z ]+)", cleaned_group),
            ],
        );
        assert_eq!(
            rule.apply("Father's Name RAMESH JHA").as_deref(),
            Some("RAMESH JHA")
        );
        assert_eq!(
            rule.apply("Father's/Guardian's Name SURESH JHA\nFather's Name X").as_deref(),
            Some("SURESH JHA")
        );
        assert_eq!(rule.apply("nothing here"), None);
    }

    #[test]
    fn field_rule_stops_at_first_matching_pattern() {
        // The first pattern matches but captures only whitespace; the second
        // pattern is not consulted.
        let rule: FieldRule<String> = FieldRule::new(
            "name",
            &[(r"Name:([ ]*)$", cleaned_group), (r"Name(.*)", cleaned_group)],
        );
        assert_eq!(rule.apply("Name:   "), None);
    }

    #[test]
    fn parent_window_reads_titles() {
        let pw = ParentWindow::new(
            r"(?i)(Daughter|Son)\s+of",
            4,
            r"(?i)^(?:Smt\.?|Mrs\.)\s+(.+)$",
            r"(?i)^(?:Shri\.?|Mr\.)\s+(.+)$",
        );
        let text = "ANANYA ROY\nDaughter of\n  Smt  REKHA   ROY\nShri ANIL ROY\n";
        assert_eq!(
            pw.apply(text),
            Parents {
                mother: Some("REKHA ROY".into()),
                father: Some("ANIL ROY".into()),
            }
        );
    }

    #[test]
    fn parent_window_is_bounded() {
        let pw = ParentWindow::new(r"Son of", 2, r"^Smt\s+(.+)$", r"^Shri\s+(.+)$");
        let text = "Son of\na\nb\nSmt FAR AWAY";
        assert_eq!(pw.apply(text), Parents::default());
    }

    #[test]
    fn placeholder_is_absent_not_zero() {
        assert_eq!(parse_mark(Some("xxx")), None);
        assert_eq!(parse_mark(Some("XXX")), None);
        assert_eq!(parse_mark(Some("")), None);
        assert_eq!(parse_mark(None), None);
        assert_eq!(parse_mark(Some("7O")), None);
        assert_eq!(parse_mark(Some("00")), Some(0));
        assert_eq!(parse_mark(Some("089")), Some(89));
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let subjects = vec![
            SubjectRecord::new(Some("1".into()), "A").with_total(Some(10)),
            SubjectRecord::new(Some("2".into()), "B"),
            SubjectRecord::new(Some("3".into()), "A").with_total(Some(99)),
            SubjectRecord::new(Some("4".into()), "C"),
        ];
        let kept = finalize_subjects(subjects, true);
        let names: Vec<&str> = kept.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
        assert_eq!(kept[0].total_marks(), Some(10));
    }

    #[test]
    fn required_code_filters_before_dedup() {
        let subjects = vec![
            SubjectRecord::new(None, "A"),
            SubjectRecord::new(Some("2".into()), "A"),
        ];
        let kept = finalize_subjects(subjects, true);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code.as_deref(), Some("2"));
    }
}
