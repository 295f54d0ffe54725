//! Image payload handling: the data-URI codec and the MIME allow-list.

pub mod data_uri;
pub mod mime;

pub use data_uri::DataUri;
pub use mime::{SUPPORTED_IMAGE_TYPES, detect_mime_type, is_supported_image};
