//! Line classification over a marks block.
//!
//! The scanner is a two-state machine. [`classify`] is the pure transition
//! function; [`candidate_lines`] drives it over a whole block and yields the
//! lines that row patterns should be tried against.
//!
//! ```text
//!                 header line (discarded)
//!   ┌───────────────┐  or row-like line  ┌─────────────┐
//!   │SeekingSection │ ─────────────────▶ │  InSection  │ ◀─┐ header (discarded)
//!   └───────────────┘                    └─────────────┘ ──┘
//!     preamble skipped                     noise skipped, rest are candidates
//! ```

use regex::Regex;
use std::borrow::Cow;

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    SeekingSection,
    InSection,
}

/// What the scanner decided about one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    /// Empty or whitespace only.
    Blank,
    /// Table header keyword; enters the section, line itself dropped.
    Header,
    /// Before the section; dropped.
    Preamble,
    /// Metadata caught inside the table region; dropped.
    Noise,
    /// Should be tried against the row patterns.
    Candidate,
}

/// Per-dialect classification rules.
#[derive(Debug)]
pub struct SectionRules {
    pub initial: ScanState,
    /// Header keywords, matched against the raw line.
    pub header: Option<Regex>,
    /// A line that already looks like a subject row; enters the section
    /// when no header has been seen.
    pub row_hint: Option<Regex>,
    /// Denylist applied to in-section lines.
    pub noise: Option<Regex>,
    /// Collapse whitespace before noise and row matching. Off for layouts
    /// where column gaps carry meaning.
    pub collapse_whitespace: bool,
}

/// Transition function: classify `line` given the current `state`.
///
/// `line` should already be in the form rows are matched against (see
/// [`SectionRules::collapse_whitespace`]); `raw` is the untouched OCR line
/// used for header detection.
pub fn classify(state: ScanState, raw: &str, line: &str, rules: &SectionRules) -> (ScanState, LineClass) {
    if line.trim().is_empty() {
        return (state, LineClass::Blank);
    }

    if rules.header.as_ref().is_some_and(|re| re.is_match(raw)) {
        return (ScanState::InSection, LineClass::Header);
    }

    let state = match state {
        ScanState::InSection => ScanState::InSection,
        ScanState::SeekingSection => {
            if rules.row_hint.as_ref().is_some_and(|re| re.is_match(line)) {
                ScanState::InSection
            } else {
                return (ScanState::SeekingSection, LineClass::Preamble);
            }
        }
    };

    if rules.noise.as_ref().is_some_and(|re| re.is_match(line)) {
        (state, LineClass::Noise)
    } else {
        (state, LineClass::Candidate)
    }
}

/// Run the scanner over `text` and collect candidate row lines in order.
pub fn candidate_lines<'a>(text: &'a str, rules: &SectionRules) -> Vec<Cow<'a, str>> {
    let mut state = rules.initial;
    let mut out = Vec::new();

    for raw in text.lines() {
        let line: Cow<'a, str> = if rules.collapse_whitespace {
            Cow::Owned(raw.split_whitespace().collect::<Vec<_>>().join(" "))
        } else {
            Cow::Borrowed(raw)
        };

        let (next, class) = classify(state, raw, &line, rules);
        state = next;
        if class == LineClass::Candidate {
            out.push(line);
        }
    }

    out
}
