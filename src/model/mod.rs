//! Data models for notepress.
//!
//! This module contains all domain models:
//! - `DocumentRecord` (remote document metadata)
//! - `Block` / `BlockKind` (content block tree)
//! - `RichTextSpan` (annotated text runs)

pub mod block;
pub mod document;
pub mod richtext;

pub use block::{Block, BlockKind};
pub use document::{DocumentRecord, EligibilityRule};
pub use richtext::RichTextSpan;
