#![forbid(unsafe_code)]

//! Errors raised by the order state.
//!
//! None of these reach the host: the board recovers from them locally by
//! cancelling the drag that produced them.

use thiserror::Error;

use crate::section::SectionId;

pub type Result<T> = std::result::Result<T, ReorderError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("group index {index} out of bounds ({len} groups)")]
    GroupOutOfBounds { index: usize, len: usize },

    #[error("position {position} out of bounds (group has {len} sections)")]
    PositionOutOfBounds { position: usize, len: usize },

    #[error("unknown section: {0}")]
    UnknownSection(SectionId),
}
