//! Draft previews
//!
//! Neither preview touches the site document.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

use crate::content::Post;
use crate::publish;
use crate::render;
use crate::templates;
use crate::Blog;

/// Write the standalone HTML preview page and return its path
pub fn write_html(blog: &Blog, post: &Post, date: NaiveDate) -> Result<PathBuf> {
    let post = publish::validate(post, &blog.config)?;
    let fragment = render::render_fragment(&post, date, &blog.render_options());
    let page = templates::preview_page(&post.title, &fragment.html);

    let path = blog.preview_path();
    fs::write(&path, page).with_context(|| format!("Failed to write preview {:?}", path))?;
    tracing::debug!("Wrote preview to {:?}", path);
    Ok(path)
}

/// Plain-text summary of a post
pub fn text(blog: &Blog, post: &Post, date: NaiveDate) -> Result<String> {
    let post = publish::validate(post, &blog.config)?;
    let date = date.format(render::DATE_FORMAT).to_string();
    Ok(templates::text_preview(
        &post.title,
        &post.category,
        &date,
        &post.tags,
        &post.content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlogConfig;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_write_html() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), BlogConfig::default());
        let post = Post::new("Preview Me", "技术", "<p>Body</p>");

        let path = write_html(&blog, &post, date()).unwrap();
        assert_eq!(path, dir.path().join("temp_preview.html"));

        let page = fs::read_to_string(&path).unwrap();
        assert!(page.contains("<title>Preview Me - 预览</title>"));
        assert!(page.contains(r#"data-post-id="post-preview-me""#));
        assert!(!dir.path().join("index.html").exists());
    }

    #[test]
    fn test_preview_requires_title_and_content() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), BlogConfig::default());
        assert!(write_html(&blog, &Post::new("", "技术", "body"), date()).is_err());
        assert!(text(&blog, &Post::new("Title", "技术", ""), date()).is_err());
        assert!(!blog.preview_path().exists());
    }

    #[test]
    fn test_text() {
        let blog = Blog::with_config("/site", BlogConfig::default());
        let mut post = Post::new("Title", "", "body");
        post.tags = vec!["rust".to_string()];
        let out = text(&blog, &post, date()).unwrap();
        assert!(out.starts_with("# Title\n\n**分类:** 技术\n**日期:** 2024-01-15\n"));
        assert!(out.contains("**标签:** rust"));
        assert!(out.ends_with("\n\nbody"));
    }
}
