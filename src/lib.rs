//! blogpub: compose blog posts and splice them into a static site
//!
//! The site is a hand-written `index.html` with a blog section. New posts
//! are rendered into a fixed HTML fragment and inserted at the head of that
//! section; the change can then be committed and pushed through the local
//! git checkout. A small static server previews the result.

pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod preview;
pub mod publish;
pub mod render;
pub mod server;
pub mod splice;
pub mod templates;
pub mod vcs;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The site being published to
#[derive(Debug, Clone)]
pub struct Blog {
    /// Publisher configuration
    pub config: config::BlogConfig,
    /// Site root directory
    pub base_dir: PathBuf,
    /// Site document (`index.html`)
    pub index_path: PathBuf,
}

impl Blog {
    /// Open a site directory, reading `_blogpub.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(config::CONFIG_FILE);

        let config = if config_path.exists() {
            tracing::debug!("Loading config from {:?}", config_path);
            config::BlogConfig::load(&config_path)?
        } else {
            config::BlogConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site handle from an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::BlogConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let index_path = base_dir.join(&config.index_file);

        Self {
            config,
            base_dir,
            index_path,
        }
    }

    /// Draft storage for this site
    pub fn drafts(&self) -> content::DraftStore {
        content::DraftStore::new(&self.base_dir)
    }

    /// Renderer options derived from the configuration
    pub fn render_options(&self) -> render::RenderOptions {
        render::RenderOptions::from(&self.config)
    }

    /// Path of the standalone copy of a published fragment
    ///
    /// Named after the first characters of the title; path separators are
    /// replaced so the file always lands in the site root.
    pub fn article_path(&self, title: &str) -> PathBuf {
        let head: String = title
            .chars()
            .take(self.config.article_title_chars)
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.base_dir
            .join(format!("{}{}.html", self.config.article_prefix, head))
    }

    /// Path of the temporary HTML preview
    pub fn preview_path(&self) -> PathBuf {
        self.base_dir.join(&self.config.preview_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.index_path, dir.path().join("index.html"));
        assert_eq!(blog.preview_path(), dir.path().join("temp_preview.html"));
    }

    #[test]
    fn test_new_with_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("_blogpub.yml"),
            "index_file: public/home.html\npreview_file: p.html\n",
        )
        .unwrap();
        let blog = Blog::new(dir.path()).unwrap();
        assert_eq!(blog.index_path, dir.path().join("public/home.html"));
        assert_eq!(blog.preview_path(), dir.path().join("p.html"));
    }

    #[test]
    fn test_article_path() {
        let blog = Blog::with_config("/site", config::BlogConfig::default());
        assert_eq!(
            blog.article_path("Hello World"),
            PathBuf::from("/site/article_Hello World.html")
        );
        assert_eq!(
            blog.article_path("一二三四五六七八九十一二三四五六七八九十超出部分"),
            PathBuf::from("/site/article_一二三四五六七八九十一二三四五六七八九十.html")
        );
        assert_eq!(
            blog.article_path("a/b\\c"),
            PathBuf::from("/site/article_a_b_c.html")
        );
    }
}
