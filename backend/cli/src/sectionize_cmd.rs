//! `soilcast sectionize`: split a markdown document into sections offline.

use std::path::Path;

use anyhow::{Context, Result};
use soilcast_core::Section;
use tokio::io::AsyncReadExt;

use crate::terminal_output::{render_sections, supports_color};

pub async fn run(file: Option<&Path>, text: bool) -> Result<()> {
    let markdown = read_source(file).await?;
    let sections = markdown::sectionize(&markdown);
    print!("{}", format_sections(&sections, text)?);
    Ok(())
}

async fn read_source(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            tokio::io::stdin()
                .read_to_string(&mut input)
                .await
                .context("Failed to read markdown from stdin")?;
            Ok(input)
        }
    }
}

fn format_sections(sections: &[Section], text: bool) -> Result<String> {
    if text {
        Ok(render_sections(sections, supports_color()))
    } else {
        let mut json = serde_json::to_string_pretty(sections)?;
        json.push('\n');
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_markdown_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answer.md");
        tokio::fs::write(&path, "Intro\n# Soil\npH 7").await.unwrap();

        let markdown = read_source(Some(&path)).await.unwrap();
        let sections = markdown::sectionize(&markdown);
        let json: serde_json::Value =
            serde_json::from_str(&format_sections(&sections, false).unwrap()).unwrap();
        assert_eq!(json[0]["title"], "Overall Analysis");
        assert_eq!(json[1]["title"], "Soil");
        assert_eq!(json[1]["content"], "pH 7");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let err = read_source(Some(Path::new("/nonexistent/answer.md"))).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/answer.md"));
    }
}
