//! Post model

use serde::{Deserialize, Serialize};

/// A blog post as entered by the user
///
/// This is the "form": it holds raw input, including values that may not
/// pass validation yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Post title, rendered verbatim
    pub title: String,

    /// One of the configured categories
    pub category: String,

    /// Free-form tags
    pub tags: Vec<String>,

    /// Body, usually HTML, rendered verbatim
    pub content: String,
}

impl Post {
    /// Create a post with the given fields and no tags
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            tags: Vec::new(),
            content: content.into(),
        }
    }

    /// Whether nothing has been entered yet
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty() && self.tags.is_empty()
    }

    /// Copy of the post with title and content trimmed
    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            category: self.category.trim().to_string(),
            tags: self.tags.clone(),
            content: self.content.trim().to_string(),
        }
    }
}

/// Split a comma separated tag list, dropping empty entries
///
/// Both ASCII and full-width commas are accepted.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split([',', '，'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags("rust, blog,,  web "), vec!["rust", "blog", "web"]);
        assert_eq!(parse_tags("生活，随笔"), vec!["生活", "随笔"]);
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn test_trimmed() {
        let post = Post::new("  Title ", "技术", "\n body \n");
        let trimmed = post.trimmed();
        assert_eq!(trimmed.title, "Title");
        assert_eq!(trimmed.content, "body");
    }

    #[test]
    fn test_is_blank() {
        assert!(Post::default().is_blank());
        assert!(Post::new(" ", "技术", "\n").is_blank());
        assert!(!Post::new("a", "技术", "").is_blank());
    }
}
