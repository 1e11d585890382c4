//! Built-in HTML templates
//!
//! The fragment shape matches the blog section of the site's `index.html`
//! and must not drift: the splicer and the site's `togglePostContent`
//! script both rely on it.

/// Values substituted into the post fragment
#[derive(Debug, Clone, Copy)]
pub struct FragmentFields<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub date: &'a str,
    pub category: &'a str,
    pub excerpt: &'a str,
    pub content: &'a str,
    pub read_more: &'a str,
}

/// Render a post fragment for the blog list
pub fn post_fragment(f: &FragmentFields<'_>) -> String {
    format!(
        r##"                        <!-- 文章 -->
                        <div class="blog-post-item" data-post-id="{id}">
                            <div class="post-info">
                                <h4 class="post-title"><a href="#{id}" onclick="togglePostContent('{id}'); return false;">{title}</a></h4>
                                <p class="post-meta">{date} • {category}</p>
                                <p class="post-excerpt">{excerpt}...</p>
                                <div class="post-content" style="display: none;">
                                    {content}
                                </div>
                            </div>
                            <div class="post-actions">
                                <a href="#{id}" class="read-more" onclick="togglePostContent('{id}'); return false;">{read_more}</a>
                            </div>
                        </div>"##,
        id = f.id,
        title = f.title,
        date = f.date,
        category = f.category,
        excerpt = f.excerpt,
        content = f.content,
        read_more = f.read_more,
    )
}

/// Wrap a fragment in a standalone page for browser preview
pub fn preview_page(title: &str, fragment: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - 预览</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; }}
        .post {{ border: 1px solid #ddd; padding: 20px; margin: 10px 0; border-radius: 5px; }}
        .post-title {{ color: #667eea; }}
        .post-meta {{ color: #666; font-size: 14px; }}
    </style>
</head>
<body>
    <h1>文章预览</h1>
{fragment}
</body>
</html>
"#,
        title = title,
        fragment = fragment,
    )
}

/// Plain-text summary of a post
pub fn text_preview(
    title: &str,
    category: &str,
    date: &str,
    tags: &[String],
    content: &str,
) -> String {
    let mut out = format!("# {}\n\n**分类:** {}\n**日期:** {}\n", title, category, date);
    if !tags.is_empty() {
        out.push_str(&format!("**标签:** {}\n", tags.join(", ")));
    }
    out.push('\n');
    out.push_str(content);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> FragmentFields<'static> {
        FragmentFields {
            id: "post-hello",
            title: "Hello",
            date: "2024-01-15",
            category: "技术",
            excerpt: "Body",
            content: "<p>Body</p>",
            read_more: "阅读更多",
        }
    }

    #[test]
    fn test_post_fragment_shape() {
        let html = post_fragment(&fields());
        assert!(html.contains(r#"<div class="blog-post-item" data-post-id="post-hello">"#));
        assert!(html.contains("togglePostContent('post-hello')"));
        assert!(html.contains(r#"<p class="post-meta">2024-01-15 • 技术</p>"#));
        assert!(html.contains(r#"<p class="post-excerpt">Body...</p>"#));
        assert!(html.contains("<p>Body</p>"));
        assert!(html.trim_end().ends_with("</div>"));
    }

    #[test]
    fn test_preview_page() {
        let page = preview_page("Hello", "<div>x</div>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Hello - 预览</title>"));
        assert!(page.contains("<div>x</div>"));
        assert!(page.contains("body { font-family"));
    }

    #[test]
    fn test_text_preview() {
        let text = text_preview("T", "生活", "2024-01-15", &["a".into(), "b".into()], "body");
        assert_eq!(
            text,
            "# T\n\n**分类:** 生活\n**日期:** 2024-01-15\n**标签:** a, b\n\nbody"
        );
        let text = text_preview("T", "生活", "2024-01-15", &[], "body");
        assert!(!text.contains("标签"));
    }
}
