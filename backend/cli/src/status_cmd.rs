//! CLI Status Command
//!
//! Asks a running server for its health report.

use std::time::Duration;

use anyhow::Result;

use crate::terminal_output::{note_error, note_success};

pub async fn run(base_url: &str) -> Result<()> {
    let url = format!("{}/api/health", base_url.trim_end_matches('/'));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let body: serde_json::Value = resp.json().await?;
            note_success(&format!("Soilcast is running at {base_url}"));
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Ok(resp) => note_error(&format!("{url} answered {}", resp.status())),
        Err(_) => note_error(&format!("Soilcast is not running at {base_url}")),
    }
    Ok(())
}
