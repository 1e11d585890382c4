//! Draft persistence
//!
//! The draft file keeps whatever the user typed until a publish succeeds,
//! so a failed attempt never loses input.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use super::Post;

/// Directory under the site root holding publisher state
pub const STATE_DIR: &str = ".blogpub";

/// Stores the in-progress post between invocations
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    /// Create a store rooted at the site directory
    pub fn new<P: AsRef<Path>>(site_root: P) -> Self {
        Self {
            dir: site_root.as_ref().join(STATE_DIR),
        }
    }

    /// Path of the YAML draft
    pub fn path(&self) -> PathBuf {
        self.dir.join("draft.yml")
    }

    /// Path of the scratch file handed to `$EDITOR`
    pub fn scratch_path(&self) -> PathBuf {
        self.dir.join("draft.html")
    }

    /// Load the saved draft, or an empty post when there is none
    pub fn load(&self) -> Result<Post> {
        let path = self.path();
        if !path.exists() {
            return Ok(Post::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read draft {:?}", path))?;
        let post: Post = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse draft {:?}", path))?;
        tracing::debug!("Loaded draft from {:?}", path);
        Ok(post)
    }

    /// Persist the draft
    pub fn save(&self, post: &Post) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path();
        let yaml = serde_yaml::to_string(post)?;
        fs::write(&path, yaml).with_context(|| format!("Failed to write draft {:?}", path))?;
        tracing::debug!("Saved draft to {:?}", path);
        Ok(())
    }

    /// Remove the draft and the editor scratch file
    pub fn clear(&self) -> Result<()> {
        for path in [self.path(), self.scratch_path()] {
            if path.exists() {
                fs::remove_file(&path)?;
                tracing::debug!("Deleted: {:?}", path);
            }
        }
        Ok(())
    }

    /// Let the user edit `content` in their editor and return the result
    ///
    /// Uses `$VISUAL`, then `$EDITOR`, then `vi`.
    pub fn edit(&self, content: &str) -> Result<String> {
        fs::create_dir_all(&self.dir)?;
        let scratch = self.scratch_path();
        fs::write(&scratch, content)?;

        let editor = editor_command();
        tracing::info!("Opening {:?} with {}", scratch, editor);

        // The editor variable may carry arguments, e.g. "code --wait"
        let mut parts = editor.split_whitespace();
        let program = parts.next().unwrap_or("vi");
        let status = Command::new(program)
            .args(parts)
            .arg(&scratch)
            .status()
            .with_context(|| format!("Failed to launch editor `{}`", editor))?;

        if !status.success() {
            anyhow::bail!("Editor `{}` exited with {}", editor, status);
        }

        Ok(fs::read_to_string(&scratch)?)
    }
}

fn editor_command() -> String {
    std::env::var("VISUAL")
        .or_else(|_| std::env::var("EDITOR"))
        .ok()
        .filter(|e| !e.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}
