//! Building blocks shared by every dialect extractor.
//!
//! ## Data Flow
//!
//! ```text
//! board hint ──▶ board ──▶ (dialect selected)
//! marks text ──▶ scan ──▶ rules::RowTable ──▶ rules::finalize_subjects
//! info text  ──▶ rules::FieldRule / rules::ParentWindow
//!                     └── text::normalize on every capture
//! ```
//!
//! 1. [`board`]: free-form board hint to the closed [`crate::Board`] enum
//! 2. [`scan`]: two-state line classifier that finds the subject table
//! 3. [`rules`]: ordered pattern tables, placeholder policy, deduplication
//! 4. [`text`]: whitespace normalisation and digit spelling

pub mod board;
pub mod rules;
pub mod scan;
pub mod text;
