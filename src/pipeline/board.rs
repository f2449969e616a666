//! Board-name normalisation.
//!
//! This is the only place that guesses a board from free-form text. The hint
//! comes from a logo classifier or a manual override and may be anything
//! from `"cbse"` to `"Central Board of Secondary Education, Delhi"`.

use crate::record::Board;

/// Substring rules, tried in order against the lower-cased hint.
///
/// Order matters: `"uk"` is a short, loose token and must stay last.
const BOARD_RULES: &[(&str, Board)] = &[
    ("cbse", Board::Cbse),
    ("central board of secondary education", Board::Cbse),
    ("icse", Board::Icse),
    ("cisce", Board::Icse),
    ("indian school certificate", Board::Icse),
    ("uttarakhand", Board::Uttarakhand),
    ("ubse", Board::Uttarakhand),
    ("uk", Board::Uttarakhand),
];

/// Map a free-form board hint to a [`Board`].
///
/// Absent or unrecognised hints map to [`Board::Unknown`].
pub fn normalize_board(hint: Option<&str>) -> Board {
    let Some(hint) = hint else {
        return Board::Unknown;
    };
    let name = hint.trim().to_lowercase();
    if name.is_empty() {
        return Board::Unknown;
    }
    BOARD_RULES
        .iter()
        .find(|(needle, _)| name.contains(needle))
        .map(|(_, board)| *board)
        .unwrap_or(Board::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tags() {
        assert_eq!(normalize_board(Some("cbse")), Board::Cbse);
        assert_eq!(normalize_board(Some("ICSE")), Board::Icse);
        assert_eq!(normalize_board(Some("UK")), Board::Uttarakhand);
    }

    #[test]
    fn full_names() {
        assert_eq!(
            normalize_board(Some("Central Board of Secondary Education")),
            Board::Cbse
        );
        assert_eq!(
            normalize_board(Some("Council for the Indian School Certificate Examinations")),
            Board::Icse
        );
        assert_eq!(
            normalize_board(Some("  Uttarakhand Board of School Education ")),
            Board::Uttarakhand
        );
    }

    #[test]
    fn first_rule_wins() {
        // Mentions both; CBSE is checked first.
        assert_eq!(normalize_board(Some("cbse / icse equivalence")), Board::Cbse);
    }

    #[test]
    fn absent_and_unrecognised() {
        assert_eq!(normalize_board(None), Board::Unknown);
        assert_eq!(normalize_board(Some("")), Board::Unknown);
        assert_eq!(normalize_board(Some("   ")), Board::Unknown);
        assert_eq!(normalize_board(Some("Some Unrecognized Board")), Board::Unknown);
    }
}
