//! HTTP gateway for SnapGrade.
//!
//! Serves the upload page, the grading relay endpoint, and the health API.

pub mod grade_api;
pub mod health_api;
pub mod server;
pub mod upload_ui;

pub use server::{GatewayState, start_server};
