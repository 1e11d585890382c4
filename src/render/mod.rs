//! Fragment renderer
//!
//! Pure functions turning a [`Post`] into the HTML block inserted into the
//! site document, plus the slug and excerpt computed along the way.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::BlogConfig;
use crate::content::Post;
use crate::helpers::{collapse_whitespace, html_escape, strip_tags, truncate_chars};
use crate::templates::{self, FragmentFields};

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref NOT_SLUG_CHAR: Regex = Regex::new(r"[^a-z0-9\-]").unwrap();
}

/// Date format used in the post meta line
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rendering knobs taken from the configuration
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub slug_prefix: String,
    pub excerpt_length: usize,
    pub read_more_label: String,
    pub escape_html: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&BlogConfig::default())
    }
}

impl From<&BlogConfig> for RenderOptions {
    fn from(config: &BlogConfig) -> Self {
        Self {
            slug_prefix: config.slug_prefix.clone(),
            excerpt_length: config.excerpt_length,
            read_more_label: config.read_more_label.clone(),
            escape_html: config.escape_html,
        }
    }
}

/// A rendered post fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Value of the `data-post-id` attribute
    pub id: String,
    pub title: String,
    pub category: String,
    pub date: NaiveDate,
    pub excerpt: String,
    /// Full HTML block
    pub html: String,
}

/// Derive a fragment id from a title
///
/// Lower-cases, turns whitespace runs into `-`, drops everything outside
/// `[a-z0-9-]` and prepends `prefix`. Distinct titles can collide.
///
/// # Examples
/// ```ignore
/// slugify("Hello World", "post-") // -> "post-hello-world"
/// ```
pub fn slugify(title: &str, prefix: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lowered, "-");
    let slug = NOT_SLUG_CHAR.replace_all(&hyphenated, "");
    format!("{}{}", prefix, slug)
}

/// Build the plain-text excerpt of a post body
///
/// Tags are removed by pattern, whitespace collapsed, and the result cut
/// to `limit` characters without regard for word boundaries.
pub fn excerpt(content: &str, limit: usize) -> String {
    let text = collapse_whitespace(&strip_tags(content));
    truncate_chars(text.trim(), limit).to_string()
}

/// Render a post into its fragment using the given id
pub fn render_with_id(post: &Post, id: &str, date: NaiveDate, options: &RenderOptions) -> Fragment {
    let excerpt_text = excerpt(&post.content, options.excerpt_length);
    let date_text = date.format(DATE_FORMAT).to_string();

    let (title, category, excerpt_html) = if options.escape_html {
        (
            html_escape(&post.title),
            html_escape(&post.category),
            html_escape(&excerpt_text),
        )
    } else {
        (post.title.clone(), post.category.clone(), excerpt_text.clone())
    };

    let html = templates::post_fragment(&FragmentFields {
        id,
        title: &title,
        date: &date_text,
        category: &category,
        excerpt: &excerpt_html,
        content: &post.content,
        read_more: &options.read_more_label,
    });

    Fragment {
        id: id.to_string(),
        title: post.title.clone(),
        category: post.category.clone(),
        date,
        excerpt: excerpt_text,
        html,
    }
}

/// Render a post into its fragment, deriving the id from the title
pub fn render_fragment(post: &Post, date: NaiveDate, options: &RenderOptions) -> Fragment {
    let id = slugify(&post.title, &options.slug_prefix);
    render_with_id(post, &id, date, options)
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
