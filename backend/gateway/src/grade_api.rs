//! Grading relay endpoint (`POST /api/grade`).
//!
//! Validates the uploaded data URI, opens a streaming model call, and
//! pipes the token stream back to the caller in arrival order. The
//! handler holds no state across requests and never retries upstream
//! failures; dropping the response body cancels the model call.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};
use uuid::Uuid;

use logging::redact_sensitive;
use media::{DataUri, is_supported_image};
use snapgrade_core::{GradeRequest, MAX_PROMPT_CHARS, SnapGradeError};

use crate::server::GatewayState;

/// Handler for `POST /api/grade`.
pub async fn grade(
    State(state): State<GatewayState>,
    Json(request): Json<GradeRequest>,
) -> Response {
    let request_id = Uuid::new_v4();

    let image = match validate_prompt(&request.prompt) {
        Ok(image) => image,
        Err(err) => {
            warn!(%request_id, error = %err, "Rejected grade request");
            return (StatusCode::BAD_REQUEST, err.user_message()).into_response();
        }
    };

    info!(
        %request_id,
        mime = %image.mime_type,
        payload_chars = request.prompt.len(),
        "Relaying grade request to the model"
    );

    let stream = match state.model.stream_grade(image).await {
        Ok(stream) => stream,
        Err(err) => {
            error!(
                %request_id,
                error = %redact_sensitive(&err.to_string()),
                "Model call failed"
            );
            return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to grade image").into_response();
        }
    };

    match Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(stream))
    {
        Ok(response) => response,
        Err(err) => {
            error!(%request_id, "Failed to build streaming response: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to grade image").into_response()
        }
    }
}

/// Fail-fast request validation: size ceiling first, then data-URI shape,
/// then the MIME allow-list. Nothing reaches the model on any failure.
pub fn validate_prompt(prompt: &str) -> Result<DataUri, SnapGradeError> {
    if prompt.len() > MAX_PROMPT_CHARS {
        return Err(SnapGradeError::ImageTooLarge {
            len: prompt.len(),
            max: MAX_PROMPT_CHARS,
        });
    }

    let image = DataUri::parse(prompt).ok_or(SnapGradeError::InvalidImageData)?;

    if !is_supported_image(&image.mime_type) {
        return Err(SnapGradeError::UnsupportedFormat {
            mime: image.mime_type.clone(),
        });
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::to_bytes;

    use snapgrade_vision::{TextStream, VisionError, VisionModel};

    const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    struct ScriptedModel {
        chunks: Vec<&'static str>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(chunks: Vec<&'static str>) -> Self {
            Self {
                chunks,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl VisionModel for ScriptedModel {
        fn model_id(&self) -> &str {
            "scripted"
        }

        async fn stream_grade(&self, _image: DataUri) -> Result<TextStream, VisionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let items: Vec<Result<String, VisionError>> =
                self.chunks.iter().map(|c| Ok((*c).to_string())).collect();
            Ok(Box::pin(futures::stream::iter(items)))
        }
    }

    struct UpstreamFailure;

    #[async_trait]
    impl VisionModel for UpstreamFailure {
        fn model_id(&self) -> &str {
            "failing"
        }

        async fn stream_grade(&self, _image: DataUri) -> Result<TextStream, VisionError> {
            Err(VisionError::Upstream {
                status: 429,
                message: "quota exceeded".to_string(),
            })
        }
    }

    struct BreaksMidStream;

    #[async_trait]
    impl VisionModel for BreaksMidStream {
        fn model_id(&self) -> &str {
            "breaks"
        }

        async fn stream_grade(&self, _image: DataUri) -> Result<TextStream, VisionError> {
            Ok(Box::pin(futures::stream::iter(vec![
                Ok("The photo shows ".to_string()),
                Err(VisionError::Stream("connection reset".to_string())),
            ])))
        }
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn oversize_payload_is_rejected_without_a_model_call() {
        let model = Arc::new(ScriptedModel::new(vec!["never"]));
        let state = GatewayState::new(model.clone());

        let prompt = "a".repeat(MAX_PROMPT_CHARS + 1);
        let response = grade(State(state), Json(GradeRequest { prompt })).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Image too large, maximum file size is 4.5MB."
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn non_data_uri_is_rejected_as_invalid() {
        let model = Arc::new(ScriptedModel::new(vec!["never"]));
        let state = GatewayState::new(model.clone());

        let response = grade(
            State(state),
            Json(GradeRequest {
                prompt: "not-a-data-uri".to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Invalid image data");
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn bmp_payload_is_rejected_as_unsupported() {
        let model = Arc::new(ScriptedModel::new(vec!["never"]));
        let state = GatewayState::new(model.clone());

        let response = grade(
            State(state),
            Json(GradeRequest {
                prompt: "data:image/bmp;base64,Qk1GAAAA".to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            "Unsupported format. Only JPEG, PNG, GIF, and WEBP files are supported."
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_request_streams_chunks_back_in_order() {
        let model = Arc::new(ScriptedModel::new(vec![
            "The student wrote 2x + 3 = 7 and isolated x.",
            "■",
            "Problem: 2x + 3 = 7. Each step is correct. x = 2. Score: 5/5.",
        ]));
        let state = GatewayState::new(model.clone());

        let response = grade(
            State(state),
            Json(GradeRequest {
                prompt: TINY_PNG.to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/plain; charset=utf-8")
        );
        assert_eq!(
            body_text(response).await,
            "The student wrote 2x + 3 = 7 and isolated x.\
             ■\
             Problem: 2x + 3 = 7. Each step is correct. x = 2. Score: 5/5."
        );
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_a_server_error() {
        let state = GatewayState::new(Arc::new(UpstreamFailure));

        let response = grade(
            State(state),
            Json(GradeRequest {
                prompt: TINY_PNG.to_string(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, "Failed to grade image");
    }

    #[tokio::test]
    async fn mid_stream_failure_terminates_the_body() {
        let state = GatewayState::new(Arc::new(BreaksMidStream));

        let response = grade(
            State(state),
            Json(GradeRequest {
                prompt: TINY_PNG.to_string(),
            }),
        )
        .await;

        // Headers are already on the wire when the stream breaks; the
        // failure surfaces as a broken body, not a status change.
        assert_eq!(response.status(), StatusCode::OK);
        assert!(to_bytes(response.into_body(), usize::MAX).await.is_err());
    }

    #[test]
    fn validation_accepts_a_payload_at_the_exact_ceiling() {
        let prefix = "data:image/png;base64,";
        let prompt = format!("{}{}", prefix, "A".repeat(MAX_PROMPT_CHARS - prefix.len()));
        assert_eq!(prompt.len(), MAX_PROMPT_CHARS);
        assert!(validate_prompt(&prompt).is_ok());
    }

    #[test]
    fn validation_checks_size_before_shape() {
        // An oversize payload that is also malformed reports the size error.
        let prompt = "x".repeat(MAX_PROMPT_CHARS + 1);
        assert!(matches!(
            validate_prompt(&prompt),
            Err(SnapGradeError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn validation_extracts_mime_and_payload() {
        let image = validate_prompt("data:image/webp;base64,UklGRg==").unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.data, "UklGRg==");
    }
}
