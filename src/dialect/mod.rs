//! Board-specific extractors.
//!
//! Every board prints its certificates in its own undocumented layout. Each
//! submodule encodes one layout as data (identity-field rules, section rules
//! and a row table) and implements [`DialectExtractor`] on top of the shared
//! machinery in [`crate::pipeline`].
//!
//! Extractors hold no state and are `Send + Sync`; the same `&'static`
//! instance is shared by every call.

pub mod cbse;
pub mod icse;
pub mod uttarakhand;

use crate::record::{Board, CanonicalRecord};

pub use cbse::CbseExtractor;
pub use icse::IcseExtractor;
pub use uttarakhand::UttarakhandExtractor;

/// Turns an information block and a marks block into a [`CanonicalRecord`].
///
/// Implementations never fail: anything a pattern cannot find is left
/// absent, and marks lines that match no pattern are skipped.
pub trait DialectExtractor: Send + Sync {
    /// The board whose layout this extractor understands.
    fn board(&self) -> Board;

    fn extract(&self, info_text: &str, marks_text: &str) -> CanonicalRecord;
}

impl Board {
    /// The extractor for this board, or `None` for [`Board::Unknown`].
    pub fn extractor(self) -> Option<&'static dyn DialectExtractor> {
        match self {
            Board::Cbse => Some(&CbseExtractor),
            Board::Icse => Some(&IcseExtractor),
            Board::Uttarakhand => Some(&UttarakhandExtractor),
            Board::Unknown => None,
        }
    }
}
