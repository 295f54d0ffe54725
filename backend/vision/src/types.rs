//! Generative Language API wire types, limited to the
//! `streamGenerateContent` subset the grading flow uses.

use serde::{Deserialize, Serialize};

/// Request body for `models/{model}:streamGenerateContent`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One part of a turn: text or inline image bytes.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Base64 image bytes plus their MIME type.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

// Streaming response chunks. Only the text path is read; everything else
// is tolerated and ignored.

/// One decoded SSE chunk of a streaming response.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateContentChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,

    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ChunkPart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChunkPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentChunk {
    /// Concatenated text of the first candidate's parts, if any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let mut out = String::new();
        for part in &content.parts {
            if let Some(text) = &part.text {
                out.push_str(text);
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_with_camel_case_inline_data() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Role::User,
                parts: vec![
                    Part::Text { text: "grade this".to_string() },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/png".to_string(),
                            data: "iVBORw0KGgo=".to_string(),
                        },
                    },
                ],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "grade this");
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["mimeType"],
            "image/png"
        );
        assert_eq!(
            json["contents"][0]["parts"][1]["inlineData"]["data"],
            "iVBORw0KGgo="
        );
    }

    #[test]
    fn model_role_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Role::Model).unwrap(), "model");
    }

    #[test]
    fn chunk_text_concatenates_first_candidate_parts() {
        let chunk: GenerateContentChunk = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"2x + 3"},{"text":" = 7"}],"role":"model"}}]}"#,
        )
        .unwrap();
        assert_eq!(chunk.text().as_deref(), Some("2x + 3 = 7"));
    }

    #[test]
    fn chunk_without_candidates_has_no_text() {
        let chunk: GenerateContentChunk =
            serde_json::from_str(r#"{"usageMetadata":{"totalTokenCount":12}}"#).unwrap();
        assert!(chunk.text().is_none());
    }

    #[test]
    fn finish_chunk_without_parts_has_no_text() {
        let chunk: GenerateContentChunk = serde_json::from_str(
            r#"{"candidates":[{"finishReason":"STOP","content":{"parts":[]}}]}"#,
        )
        .unwrap();
        assert!(chunk.text().is_none());
        assert_eq!(
            chunk.candidates[0].finish_reason.as_deref(),
            Some("STOP")
        );
    }
}
