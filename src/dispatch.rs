//! Single-document entry points.
//!
//! [`dispatch`] is the whole extraction engine for one marksheet: normalise
//! the board hint, pick the matching dialect, run it. It never fails; an
//! unsupported board yields `None`. [`try_dispatch`] is the same call for
//! callers that want the condition named as an error.

use crate::error::MarksheetError;
use crate::pipeline::board::normalize_board;
use crate::record::CanonicalRecord;
use tracing::{debug, warn};

/// Extract a record from one document's information and marks blocks.
///
/// Returns `None` when `board_hint` is missing or names no supported board.
/// Fields a dialect cannot find are absent in the returned record; that is
/// never an error.
///
/// # Example
///
/// ```rust
/// use marksheet_extract::{dispatch, Board};
///
/// let record = dispatch(
///     Some("Central Board of Secondary Education"),
///     "Name of Candidate ANJALI VERMA",
///     "301 ENGLISH CORE 074 017 091 NINE ONE A2",
/// )
/// .expect("CBSE is supported");
///
/// assert_eq!(record.board, Board::Cbse);
/// assert_eq!(record.subjects[0].total_marks(), Some(91));
/// ```
pub fn dispatch(board_hint: Option<&str>, info_text: &str, marks_text: &str) -> Option<CanonicalRecord> {
    let board = normalize_board(board_hint);
    let Some(extractor) = board.extractor() else {
        warn!(hint = ?board_hint, "no extractor for board hint");
        return None;
    };

    debug!(%board, info_len = info_text.len(), marks_len = marks_text.len(), "dispatching");
    Some(extractor.extract(info_text, marks_text))
}

/// Like [`dispatch`], but an unsupported board is [`MarksheetError::UnknownBoard`].
pub fn try_dispatch(
    board_hint: Option<&str>,
    info_text: &str,
    marks_text: &str,
) -> Result<CanonicalRecord, MarksheetError> {
    dispatch(board_hint, info_text, marks_text).ok_or_else(|| MarksheetError::UnknownBoard {
        hint: board_hint.unwrap_or_default().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Board;

    const CBSE_INFO: &str = "Roll No. 16614513\nName of Candidate SATYAM JHA\n";
    const CBSE_MARKS: &str = "301 ENGLISH CORE 74 17 91 NINE ONE A2\n\
                              041 MATHEMATICS 080 xxx 080 EIGHT ZERO A1\n";

    #[test]
    fn routes_by_board_hint() {
        let record = dispatch(Some("CBSE"), CBSE_INFO, CBSE_MARKS).expect("CBSE supported");
        assert_eq!(record.board, Board::Cbse);
        assert_eq!(record.roll_number.as_deref(), Some("16614513"));
        assert_eq!(record.subjects.len(), 2);

        let record = dispatch(Some("cisce"), "", "HINDI 092 92 NINE TWO").expect("ICSE");
        assert_eq!(record.board, Board::Icse);

        let record = dispatch(Some("UK Board"), "", "002 HINDI 70 70").expect("Uttarakhand");
        assert_eq!(record.board, Board::Uttarakhand);
    }

    #[test]
    fn deterministic() {
        let a = dispatch(Some("cbse"), CBSE_INFO, CBSE_MARKS);
        let b = dispatch(Some("cbse"), CBSE_INFO, CBSE_MARKS);
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_board_is_none() {
        assert_eq!(dispatch(Some("State Board of Kerala"), CBSE_INFO, CBSE_MARKS), None);
        assert_eq!(dispatch(None, CBSE_INFO, CBSE_MARKS), None);
        assert_eq!(dispatch(Some(""), "", ""), None);
    }

    #[test]
    fn try_dispatch_names_the_hint() {
        let err = try_dispatch(Some("Kerala"), "", "").unwrap_err();
        assert!(matches!(err, MarksheetError::UnknownBoard { ref hint } if hint == "Kerala"));

        let record = try_dispatch(Some("ICSE"), "", "").expect("ICSE supported");
        assert_eq!(record, CanonicalRecord::new(Board::Icse));
    }
}
