use serde::{Deserialize, Serialize};

/// Inbound payload for `POST /api/grade`.
///
/// The single field carries the uploaded image as a
/// `data:<mime>;base64,<payload>` string built by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeRequest {
    pub prompt: String,
}
