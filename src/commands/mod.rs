//! Command implementations behind the CLI

pub mod list;
pub mod preview;
pub mod publish;

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::content::{parse_tags, Post};
use crate::Blog;

/// Post fields given on the command line
///
/// Anything not given falls back to the saved draft.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: Option<String>,
    pub category: Option<String>,
    /// Comma separated
    pub tags: Option<String>,
    /// Content file, `-` for stdin
    pub file: Option<PathBuf>,
    /// Open the content in `$EDITOR`
    pub edit: bool,
}

impl PostInput {
    /// Merge the input over the saved draft and save the result
    pub fn resolve(&self, blog: &Blog) -> Result<Post> {
        let store = blog.drafts();
        let mut post = store.load()?;

        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(category) = &self.category {
            post.category = category.clone();
        }
        if let Some(tags) = &self.tags {
            post.tags = parse_tags(tags);
        }
        if let Some(file) = &self.file {
            post.content = read_content(file)?;
        }
        if self.edit {
            post.content = store.edit(&post.content)?;
        }
        if post.category.trim().is_empty() {
            post.category = blog.config.default_category().to_string();
        }

        if !post.is_blank() {
            store.save(&post)?;
        }
        Ok(post)
    }
}

fn read_content(file: &Path) -> Result<String> {
    if file.as_os_str() == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read content from stdin")?;
        Ok(content)
    } else {
        fs::read_to_string(file).with_context(|| format!("Failed to read content file {:?}", file))
    }
}
