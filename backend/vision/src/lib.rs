//! Hosted multimodal model access for SnapGrade.
//!
//! Talks to the Generative Language API in streaming mode and exposes the
//! token stream behind the [`VisionModel`] seam so the gateway never knows
//! which vendor sits upstream.

pub mod gemini;
pub mod prompt;
pub mod sse;
pub mod types;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;
use media::DataUri;

pub use gemini::GeminiClient;

/// Ordered stream of text fragments from the model, forwarded verbatim.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, VisionError>> + Send>>;

/// Errors at the hosted-model boundary.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    /// The request never produced a response.
    #[error("model request failed: {0}")]
    Request(String),

    /// The model answered with a non-success status.
    #[error("model returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The byte stream broke mid-response.
    #[error("model stream failed: {0}")]
    Stream(String),

    /// A stream chunk could not be decoded.
    #[error("model stream decode failed: {0}")]
    Decode(String),
}

/// A hosted multimodal model that grades one photographed solution per
/// call. One image in, one streaming text response out; implementations
/// hold no per-request state.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Identifier of the underlying model, for health reporting.
    fn model_id(&self) -> &str;

    /// Open a streaming grade call for one image.
    ///
    /// An `Err` here means the response never started; errors after the
    /// first fragment travel inside the stream.
    async fn stream_grade(&self, image: DataUri) -> Result<TextStream, VisionError>;
}
