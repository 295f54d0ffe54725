//! Size ceilings and the section marker, shared by the server, the upload
//! client, and the CLI so they can never drift apart.

/// Maximum accepted length of the `prompt` field in characters.
///
/// A 4.5MB image grows by 4/3 under base64 and then carries the
/// `data:<mime>;base64,` preamble; this is the ceiling for the whole URI.
pub const MAX_PROMPT_CHARS: usize = 6_464_471;

/// Maximum raw image size in bytes (4.5MB) enforced client-side before
/// encoding, and by the CLI before it builds the data URI.
pub const MAX_IMAGE_BYTES: usize = 4_718_592;

/// Marker the model emits between the description of the handwritten work
/// and the graded read-out. The model turn is seeded with exactly this
/// character so generation resumes right after it.
pub const SECTION_SENTINEL: char = '■';
