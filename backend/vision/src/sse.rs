//! Incremental decoding of the model's SSE byte stream.
//!
//! `streamGenerateContent?alt=sse` frames each chunk as one `data: <json>`
//! line. The wire splits those lines at arbitrary byte boundaries, so the
//! decoder buffers raw bytes until a full line is available; anything that
//! is not a data line (blank keep-alives, comments) is consumed silently.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};

use crate::types::GenerateContentChunk;
use crate::{TextStream, VisionError};

#[derive(Debug, Default)]
pub struct SseDecoder {
    buf: BytesMut,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes from the wire.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next text fragment, if a complete data line holding one is
    /// buffered.
    pub fn next_text(&mut self) -> Result<Option<String>, VisionError> {
        while let Some(line) = self.take_line() {
            if let Some(text) = Self::decode_line(&line)? {
                return Ok(Some(text));
            }
        }
        Ok(None)
    }

    /// Decode whatever remains once the upstream closes; servers may end
    /// the stream without a final newline.
    pub fn finish(&mut self) -> Result<Option<String>, VisionError> {
        if self.buf.is_empty() {
            return Ok(None);
        }
        let rest = self.buf.split();
        let line = String::from_utf8_lossy(&rest).into_owned();
        Self::decode_line(&line)
    }

    fn take_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let line = self.buf.split_to(pos + 1);
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    fn decode_line(line: &str) -> Result<Option<String>, VisionError> {
        let line = line.trim();
        let Some(payload) = line.strip_prefix("data:") else {
            return Ok(None);
        };
        let payload = payload.trim_start();
        if payload.is_empty() || payload == "[DONE]" {
            return Ok(None);
        }
        let chunk: GenerateContentChunk = serde_json::from_str(payload)
            .map_err(|e| VisionError::Decode(format!("bad stream chunk: {e}")))?;
        Ok(chunk.text())
    }
}

/// Turn a raw SSE byte stream into the text fragments it carries, in
/// order, ending when the upstream ends. Each fragment is released as
/// soon as its line is complete; nothing waits for the response to finish.
pub(crate) fn decode_stream<S, E>(bytes: S) -> TextStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let stream = futures::stream::try_unfold(
        (bytes.boxed(), SseDecoder::new()),
        |(mut bytes, mut decoder)| async move {
            loop {
                if let Some(text) = decoder.next_text()? {
                    return Ok(Some((text, (bytes, decoder))));
                }
                match bytes.next().await {
                    Some(Ok(chunk)) => decoder.extend(&chunk),
                    Some(Err(e)) => return Err(VisionError::Stream(e.to_string())),
                    None => {
                        let trailing = decoder.finish()?;
                        return Ok(trailing.map(|text| (text, (bytes, decoder))));
                    }
                }
            }
        },
    );
    Box::pin(stream)
}
