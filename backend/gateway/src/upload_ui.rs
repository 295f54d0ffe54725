//! Upload UI.
//!
//! Serves the single-page client. Four input channels (file picker, drag
//! and drop, paste, long-press clipboard read) converge on one submit
//! path, the response stream renders incrementally, and the accumulated
//! output splits on the section marker into Description and Text.
//!
//! The page is a template: marker and size ceilings are injected from the
//! shared constants so the client can never disagree with the server.

use axum::{Router, response::Html, routing::get};
use once_cell::sync::Lazy;

use snapgrade_core::{MAX_IMAGE_BYTES, MAX_PROMPT_CHARS, SECTION_SENTINEL};

use crate::server::GatewayState;

static INDEX_HTML: Lazy<String> = Lazy::new(|| {
    INDEX_TEMPLATE
        .replace("__SENTINEL__", &SECTION_SENTINEL.to_string())
        .replace("__MAX_IMAGE_BYTES__", &MAX_IMAGE_BYTES.to_string())
        .replace("__MAX_PROMPT_CHARS__", &MAX_PROMPT_CHARS.to_string())
});

/// Router serving the upload client at the site root.
pub fn ui_router() -> Router<GatewayState> {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML.as_str())
}

const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>SnapGrade</title>
<style>
  * { margin: 0; padding: 0; box-sizing: border-box; }
  body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: #f3f4f8;
    color: #1f2330;
    min-height: 100vh;
    display: flex;
    justify-content: center;
    padding: 32px 16px;
  }
  .container { width: 100%; max-width: 720px; }
  h1 { font-size: 1.6rem; margin-bottom: 4px; }
  .subtitle { color: #5a6072; margin-bottom: 20px; }
  .drop-zone {
    border: 2px dashed #b8bdd0;
    border-radius: 12px;
    background: #ffffff;
    padding: 36px 20px;
    text-align: center;
    cursor: pointer;
    user-select: none;
    -webkit-user-select: none;
    transition: border-color 0.15s, background 0.15s;
  }
  .drop-zone.dragging { border-color: #4655d4; background: #eef0fc; }
  .drop-text { font-size: 1.05rem; margin-bottom: 6px; }
  .drop-hint { color: #7a8095; font-size: 0.85rem; }
  .notice {
    display: none;
    margin-top: 14px;
    padding: 10px 14px;
    border-radius: 8px;
    background: #fdecec;
    color: #9c2b2b;
    font-size: 0.9rem;
  }
  .notice.visible { display: block; }
  .preview { margin-top: 16px; text-align: center; }
  .preview img {
    max-width: 100%;
    max-height: 240px;
    border-radius: 8px;
    border: 1px solid #d9dce8;
  }
  .status { margin-top: 14px; color: #5a6072; font-size: 0.9rem; min-height: 1.2em; }
  .results { margin-top: 10px; }
  .results section {
    background: #ffffff;
    border: 1px solid #d9dce8;
    border-radius: 10px;
    margin-bottom: 14px;
    overflow: hidden;
  }
  .results header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 10px 14px;
    background: #f7f8fc;
    border-bottom: 1px solid #e4e6f0;
    font-weight: 600;
    font-size: 0.9rem;
  }
  .results pre {
    padding: 14px;
    white-space: pre-wrap;
    word-break: break-word;
    font-family: inherit;
    font-size: 0.95rem;
    min-height: 2.4em;
  }
  button {
    border: 1px solid #c4c9dc;
    background: #ffffff;
    color: #343b52;
    border-radius: 6px;
    padding: 5px 12px;
    font-size: 0.82rem;
    cursor: pointer;
  }
  button:hover:not(:disabled) { background: #eef0fc; }
  button:disabled { opacity: 0.45; cursor: default; }
  .copy-both { width: 100%; padding: 10px; font-size: 0.95rem; }
  input[type="file"] { display: none; }
</style>
</head>
<body>
<div class="container">
  <h1>SnapGrade</h1>
  <p class="subtitle">Upload a photo of a handwritten algebra solution and stream back a graded read-out.</p>

  <div class="drop-zone" id="dropZone">
    <div class="drop-text">Click to choose an image, drag one here, or paste it</div>
    <div class="drop-hint">JPEG, PNG, GIF or WEBP, up to 4.5MB. Long-press here to read an image from the clipboard.</div>
  </div>
  <input type="file" id="fileInput" accept="image/jpeg,image/png,image/gif,image/webp">

  <div class="notice" id="notice"></div>
  <div class="preview"><img id="preview" hidden alt="uploaded solution"></div>
  <div class="status" id="status"></div>

  <div class="results" id="results" hidden>
    <section>
      <header><span>Description</span><button id="copyDescription">Copy</button></header>
      <pre id="description"></pre>
    </section>
    <section>
      <header><span>Text</span><button id="copyText">Copy</button></header>
      <pre id="text"></pre>
    </section>
    <button class="copy-both" id="copyBoth" disabled>Copy Both</button>
  </div>
</div>

<script>
const SENTINEL = "__SENTINEL__";
const MAX_IMAGE_BYTES = __MAX_IMAGE_BYTES__;
const MAX_PROMPT_CHARS = __MAX_PROMPT_CHARS__;
const SUPPORTED_TYPES = ["image/jpeg", "image/png", "image/gif", "image/webp"];
const TOO_LARGE_MESSAGE = "Image too large, maximum file size is 4.5MB.";
const UNSUPPORTED_MESSAGE = "Unsupported format. Only JPEG, PNG, GIF, and WEBP files are supported.";
const LONG_PRESS_MS = 600;

const dropZone = document.getElementById("dropZone");
const fileInput = document.getElementById("fileInput");
const noticeEl = document.getElementById("notice");
const previewEl = document.getElementById("preview");
const statusEl = document.getElementById("status");
const resultsEl = document.getElementById("results");
const descriptionEl = document.getElementById("description");
const textEl = document.getElementById("text");
const copyDescriptionBtn = document.getElementById("copyDescription");
const copyTextBtn = document.getElementById("copyText");
const copyBothBtn = document.getElementById("copyBoth");

const state = { description: "", text: "", started: false, finished: false, isLoading: false };

function render() {
  descriptionEl.textContent = state.description;
  textEl.textContent = state.text;
  resultsEl.hidden = !state.started;
  copyBothBtn.disabled = !state.finished;
  statusEl.textContent = state.isLoading ? "Grading..." : state.finished ? "Done" : "";
}

function showNotice(message) {
  noticeEl.textContent = message;
  noticeEl.classList.add("visible");
}

function hideNotice() {
  noticeEl.textContent = "";
  noticeEl.classList.remove("visible");
}

// Every input channel lands here; validation mirrors the server.
function submit(file) {
  if (!file || state.isLoading) return;
  hideNotice();
  if (!SUPPORTED_TYPES.includes(file.type)) {
    showNotice(UNSUPPORTED_MESSAGE);
    return;
  }
  if (file.size > MAX_IMAGE_BYTES) {
    showNotice(TOO_LARGE_MESSAGE);
    return;
  }
  const reader = new FileReader();
  reader.onload = () => {
    const dataUri = reader.result;
    if (dataUri.length > MAX_PROMPT_CHARS) {
      showNotice(TOO_LARGE_MESSAGE);
      return;
    }
    previewEl.src = dataUri;
    previewEl.hidden = false;
    stream(dataUri);
  };
  reader.onerror = () => showNotice("Could not read the selected file.");
  reader.readAsDataURL(file);
}

function applySplit(acc) {
  const idx = acc.indexOf(SENTINEL);
  if (idx === -1) {
    state.description = acc;
    state.text = "";
  } else {
    state.description = acc.slice(0, idx);
    state.text = acc.slice(idx + SENTINEL.length);
  }
}

async function stream(prompt) {
  state.description = "";
  state.text = "";
  state.started = true;
  state.finished = false;
  state.isLoading = true;
  render();
  try {
    const res = await fetch("/api/grade", {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify({ prompt }),
    });
    if (!res.ok) {
      showNotice(await res.text());
      state.started = false;
      return;
    }
    const reader = res.body.getReader();
    const decoder = new TextDecoder();
    let acc = "";
    for (;;) {
      const { value, done } = await reader.read();
      if (done) break;
      acc += decoder.decode(value, { stream: true });
      applySplit(acc);
      render();
    }
    acc += decoder.decode();
    applySplit(acc);
    state.finished = true;
  } catch (err) {
    showNotice("Grading failed: " + err.message);
    state.started = false;
  } finally {
    state.isLoading = false;
    render();
  }
}

async function copyToClipboard(text, button) {
  try {
    await navigator.clipboard.writeText(text);
    const original = button.textContent;
    button.textContent = "Copied";
    setTimeout(() => { button.textContent = original; }, 1200);
  } catch (err) {
    showNotice("Copy was blocked by the browser.");
  }
}

async function readClipboard() {
  try {
    const items = await navigator.clipboard.read();
    for (const item of items) {
      const type = item.types.find((t) => t.startsWith("image/"));
      if (type) {
        const blob = await item.getType(type);
        submit(new File([blob], "clipboard-image", { type }));
        return;
      }
    }
    showNotice("No image found on the clipboard.");
  } catch (err) {
    showNotice("Clipboard read was blocked. Allow clipboard access and try again.");
  }
}

// Channel 1: file picker
fileInput.addEventListener("change", () => {
  submit(fileInput.files[0]);
  fileInput.value = "";
});

// Channel 2: drag and drop
dropZone.addEventListener("dragover", (e) => {
  e.preventDefault();
  dropZone.classList.add("dragging");
});
dropZone.addEventListener("dragleave", () => dropZone.classList.remove("dragging"));
dropZone.addEventListener("drop", (e) => {
  e.preventDefault();
  dropZone.classList.remove("dragging");
  submit(e.dataTransfer.files[0]);
});

// Channel 3: paste anywhere on the page
document.addEventListener("paste", (e) => {
  const item = Array.from(e.clipboardData.items).find((i) => i.type.startsWith("image/"));
  if (item) {
    e.preventDefault();
    submit(item.getAsFile());
  }
});

// Channel 4: long-press reads the clipboard; a short press opens the picker.
let pressTimer = null;
let longPressFired = false;
dropZone.addEventListener("pointerdown", () => {
  longPressFired = false;
  pressTimer = setTimeout(() => {
    longPressFired = true;
    readClipboard();
  }, LONG_PRESS_MS);
});
["pointerup", "pointerleave", "pointercancel"].forEach((evt) =>
  dropZone.addEventListener(evt, () => clearTimeout(pressTimer))
);
dropZone.addEventListener("click", () => {
  if (longPressFired) {
    longPressFired = false;
    return;
  }
  fileInput.click();
});

copyDescriptionBtn.addEventListener("click", () =>
  copyToClipboard(state.description.trim(), copyDescriptionBtn)
);
copyTextBtn.addEventListener("click", () =>
  copyToClipboard(state.text.trim(), copyTextBtn)
);
copyBothBtn.addEventListener("click", () =>
  copyToClipboard((state.description.trim() + "\n\n" + state.text.trim()).trim(), copyBothBtn)
);
</script>
</body>
</html>
"##;
