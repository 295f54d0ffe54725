//! Splitting accumulated model output into its two display sections.

use crate::limits::SECTION_SENTINEL;

/// Split a completed response on the first sentinel occurrence.
///
/// Everything before the sentinel is the description of the photographed
/// work; everything after it is the graded read-out. Input without a
/// sentinel is all description, and any later sentinel occurrences stay
/// inside the second section untouched.
pub fn split_sections(output: &str) -> (&str, &str) {
    match output.find(SECTION_SENTINEL) {
        Some(idx) => (
            &output[..idx],
            &output[idx + SECTION_SENTINEL.len_utf8()..],
        ),
        None => (output, ""),
    }
}
