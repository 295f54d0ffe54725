//! `status`: fetch and pretty-print the health report of a running gateway.

use anyhow::{Context, Result};

pub async fn run(server: &str) -> Result<()> {
    let client = reqwest::Client::new();
    match client.get(format!("{server}/api/health")).send().await {
        Ok(response) => {
            let body: serde_json::Value = response
                .json()
                .await
                .context("Gateway returned a non-JSON health body")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Err(_) => {
            println!("SnapGrade is not running at {server}");
        }
    }
    Ok(())
}
