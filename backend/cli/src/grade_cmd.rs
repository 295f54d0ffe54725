//! `grade`: send a local image through a running gateway.
//!
//! Applies the same checks as the upload client (MIME allow-list, raw and
//! encoded size ceilings), streams the response to stdout as it arrives,
//! then re-prints it as labeled sections.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use futures::StreamExt;

use media::{detect_mime_type, is_supported_image, DataUri};
use snapgrade_core::{split_sections, GradeRequest, SnapGradeError, MAX_IMAGE_BYTES, MAX_PROMPT_CHARS};

pub async fn run(image_path: &Path, server: &str) -> Result<()> {
    let bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("Failed to read {}", image_path.display()))?;

    let mime = detect_mime_type(image_path);
    if !is_supported_image(mime) {
        bail!(SnapGradeError::UnsupportedFormat {
            mime: mime.to_string(),
        });
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        bail!(SnapGradeError::ImageTooLarge {
            len: bytes.len(),
            max: MAX_IMAGE_BYTES,
        });
    }

    let prompt = DataUri::from_bytes(mime, &bytes).to_string();
    if prompt.len() > MAX_PROMPT_CHARS {
        bail!(SnapGradeError::ImageTooLarge {
            len: prompt.len(),
            max: MAX_PROMPT_CHARS,
        });
    }

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{server}/api/grade"))
        .json(&GradeRequest { prompt })
        .send()
        .await
        .with_context(|| format!("Failed to reach the gateway at {server}"))?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        bail!("Gateway returned {status}: {message}");
    }

    // Raw bytes go straight to stdout while the full body accumulates for
    // the sectioned re-print; splitting waits for the complete response.
    let mut stream = response.bytes_stream();
    let mut raw = Vec::new();
    let mut stdout = std::io::stdout();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Response stream interrupted")?;
        raw.extend_from_slice(&chunk);
        stdout.write_all(&chunk)?;
        stdout.flush()?;
    }
    println!("\n");

    let output = String::from_utf8_lossy(&raw);
    let (description, text) = split_sections(&output);
    println!("--- Description ---");
    println!("{}", description.trim());
    println!();
    println!("--- Text ---");
    println!("{}", text.trim());

    Ok(())
}
