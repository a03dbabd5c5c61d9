//! PDF rendering collaborator.
//!
//! The workflow asks for an existing artifact first and only renders when
//! none is cached. `TypstRenderer` shells out to the Typst CLI; tests swap
//! in a double instead.

use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::letter::models::Letter;

#[derive(Debug, Error)]
pub enum RendererError {
    #[error("failed to write render source: {0}")]
    WriteSource(#[source] std::io::Error),
    #[error("render command failed to start: {0}")]
    CompilerIo(#[source] std::io::Error),
    #[error("render command exited with status {0}")]
    CompilerExit(i32),
    #[error("artifact lookup failed: {0}")]
    Lookup(#[source] std::io::Error),
}

#[async_trait]
pub trait LetterRenderer: Send + Sync {
    /// Path of a previously rendered artifact for the letter, if any.
    async fn existing_artifact(&self, letter_id: &Uuid) -> Result<Option<PathBuf>, RendererError>;
    /// Render the letter to a fresh artifact and return its path.
    async fn render_artifact(&self, letter: &Letter) -> Result<PathBuf, RendererError>;
}

pub type RendererObject = Arc<dyn LetterRenderer>;

/// Renders letters to PDF with the `typst` CLI.
pub struct TypstRenderer {
    artifact_root: PathBuf,
}

impl TypstRenderer {
    pub fn new(artifact_root: impl Into<PathBuf>) -> Self {
        Self {
            artifact_root: artifact_root.into(),
        }
    }

    fn artifact_path(&self, letter_id: &Uuid) -> PathBuf {
        self.artifact_root.join(format!("letter-{letter_id}.pdf"))
    }

    fn source_path(&self, letter_id: &Uuid) -> PathBuf {
        self.artifact_root.join(format!("letter-{letter_id}.typ"))
    }
}

#[async_trait]
impl LetterRenderer for TypstRenderer {
    async fn existing_artifact(&self, letter_id: &Uuid) -> Result<Option<PathBuf>, RendererError> {
        let path = self.artifact_path(letter_id);
        match path.try_exists() {
            Ok(true) => Ok(Some(path)),
            Ok(false) => Ok(None),
            Err(err) => Err(RendererError::Lookup(err)),
        }
    }

    async fn render_artifact(&self, letter: &Letter) -> Result<PathBuf, RendererError> {
        fs::create_dir_all(&self.artifact_root).map_err(RendererError::WriteSource)?;

        let source_path = self.source_path(&letter.id);
        let output_path = self.artifact_path(&letter.id);
        fs::write(&source_path, letter_source(&letter.content))
            .map_err(RendererError::WriteSource)?;

        let status = Command::new("typst")
            .arg("compile")
            .arg(&source_path)
            .arg(&output_path)
            .status()
            .map_err(RendererError::CompilerIo)?;

        // Leftover source files are only noise.
        let _ = fs::remove_file(&source_path);

        if !status.success() {
            return Err(RendererError::CompilerExit(status.code().unwrap_or(-1)));
        }
        log::info!("rendered letter {} to {}", letter.id, output_path.display());
        Ok(output_path)
    }
}

/// Wrap the letter body in a minimal Typst document.
fn letter_source(content: &str) -> String {
    format!(
        "#set page(margin: 2.5cm)\n#set text(size: 12pt)\n\n{}\n",
        escape_typst_markup(content)
    )
}

/// Escape characters Typst would treat as markup or code.
fn escape_typst_markup(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '#' | '$' | '*' | '_' | '@' | '<' | '>' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_typst_markup() {
        assert_eq!(escape_typst_markup("plain text"), "plain text");
        assert_eq!(escape_typst_markup("a # b"), "a \\# b");
        assert_eq!(escape_typst_markup("user@host"), "user\\@host");
    }

    #[test]
    fn test_letter_source_embeds_content() {
        let source = letter_source("Dear committee,");
        assert!(source.contains("Dear committee,"));
        assert!(source.starts_with("#set page"));
    }
}
