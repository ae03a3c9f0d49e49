//! Cover command for todo images
//!
//! Implements `dodo cover <id> [file]`: with a file it uploads a new
//! cover (replacing and releasing the old one); without one it shows
//! where the current cover is stored.

use crate::commands::Context;
use crate::error::{CliError, CliResult};
use clap::Args;
use dodo_db::{CoverStore, CoverUpload};
use std::path::PathBuf;

/// Set or show the cover image of a todo
#[derive(Debug, Args)]
pub struct CoverCommand {
    /// Todo ID (case-insensitive)
    #[arg(required = true)]
    pub id: String,

    /// Image to upload (JPEG, PNG or WebP, at most 2048 KB)
    pub file: Option<PathBuf>,

    /// Copy the current cover to this path
    #[arg(short, long, conflicts_with = "file")]
    pub output: Option<PathBuf>,
}

impl CoverCommand {
    /// Execute the cover command.
    ///
    /// # Errors
    ///
    /// Returns `CliError::ReadFile` / `CliError::WriteFile` for local file failures.
    /// Returns `CliError::Db` for ownership, validation or storage failures.
    pub async fn execute(&self, ctx: &Context) -> CliResult<String> {
        let user = ctx.user()?;
        let id = self.id.to_lowercase();
        let todos = ctx.db.todos();

        if let Some(file) = &self.file {
            let bytes = std::fs::read(file).map_err(|e| CliError::ReadFile {
                path: file.clone(),
                source: e,
            })?;
            let todo = todos
                .set_cover(user, &id, CoverUpload::new(bytes), &ctx.store)
                .await?;
            return Ok(format!(
                "Cover set for todo {}: {}",
                todo.id,
                todo.cover.unwrap_or_default()
            ));
        }

        let Some(cover) = todos.cover(user, &id).await? else {
            return Ok(format!("Todo {} has no cover", id));
        };

        if let Some(output) = &self.output {
            let bytes = ctx.store.read(&cover)?;
            std::fs::write(output, bytes).map_err(|e| CliError::WriteFile {
                path: output.clone(),
                source: e,
            })?;
            return Ok(format!("Cover written to {}", output.display()));
        }

        Ok(ctx.store.full_path(&cover)?.display().to_string())
    }
}
