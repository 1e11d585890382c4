//! Site configuration (_blogpub.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the optional configuration file in the site root
pub const CONFIG_FILE: &str = "_blogpub.yml";

/// Main publisher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site document
    pub index_file: String,

    // Writing
    pub categories: Vec<String>,
    pub slug_prefix: String,
    pub excerpt_length: usize,
    pub read_more_label: String,
    pub escape_html: bool,
    pub duplicate_ids: DuplicatePolicy,

    // Side files
    pub article_prefix: String,
    pub article_title_chars: usize,
    pub preview_file: String,

    // Version control
    pub git: bool,
    pub commit_message: String,

    // Preview server
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            index_file: "index.html".to_string(),

            categories: vec!["技术".to_string(), "生活".to_string(), "其他".to_string()],
            slug_prefix: "post-".to_string(),
            excerpt_length: 200,
            read_more_label: "阅读更多".to_string(),
            escape_html: false,
            duplicate_ids: DuplicatePolicy::Allow,

            article_prefix: "article_".to_string(),
            article_title_chars: 20,
            preview_file: "temp_preview.html".to_string(),

            git: true,
            commit_message: "添加新文章: {title}".to_string(),

            server: ServerConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: BlogConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// The category used when none is given
    pub fn default_category(&self) -> &str {
        self.categories.first().map(String::as_str).unwrap_or("")
    }

    /// Whether `category` is one of the configured categories
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Render the commit message for a post title
    pub fn commit_message_for(&self, title: &str) -> String {
        self.commit_message.replace("{title}", title)
    }
}

/// What to do when a new fragment id already exists in the site document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Insert anyway and log a warning
    Allow,
    /// Abort the publish
    Reject,
    /// Append `-2`, `-3`, ... until the id is unique
    Suffix,
}

/// Local preview server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.index_file, "index.html");
        assert_eq!(config.slug_prefix, "post-");
        assert_eq!(config.excerpt_length, 200);
        assert_eq!(config.default_category(), "技术");
        assert_eq!(config.duplicate_ids, DuplicatePolicy::Allow);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
index_file: site/index.html
categories: [Tech, Life]
duplicate_ids: suffix
git: false
server:
  port: 9000
"#;
        let config: BlogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.index_file, "site/index.html");
        assert_eq!(config.default_category(), "Tech");
        assert!(config.has_category("Life"));
        assert!(!config.has_category("技术"));
        assert_eq!(config.duplicate_ids, DuplicatePolicy::Suffix);
        assert!(!config.git);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.ip, "127.0.0.1");
        assert_eq!(config.slug_prefix, "post-");
    }

    #[test]
    fn test_commit_message() {
        let config = BlogConfig::default();
        assert_eq!(config.commit_message_for("Hello"), "添加新文章: Hello");
    }
}
