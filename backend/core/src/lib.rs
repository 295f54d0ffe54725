//! Core types shared across the SnapGrade workspace.

pub mod error;
pub mod limits;
pub mod sections;
pub mod types;

pub use error::SnapGradeError;
pub use limits::{MAX_IMAGE_BYTES, MAX_PROMPT_CHARS, SECTION_SENTINEL};
pub use sections::split_sections;
pub use types::GradeRequest;
