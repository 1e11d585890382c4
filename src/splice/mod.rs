//! Document splicer
//!
//! Finds the blog post list inside the site document and inserts a new
//! fragment at its head. Only the handful of structural markers the site
//! template guarantees are inspected; the rest of the document is opaque
//! text and is carried over byte for byte.
//!
//! Post content is embedded as raw HTML, so `<div>` tags inside the list
//! need not balance. Tag matching is only used where it cannot turn a
//! present list into a failure.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Opening tag of the blog section
pub const CONTAINER_MARKER: &str = r#"<div id="blog" class="blog-card">"#;

/// Opening tag of the post list inside the blog section
pub const LIST_MARKER: &str = r#"<div class="blog-posts">"#;

/// Start of every post fragment
pub const FRAGMENT_MARKER: &str = r#"<div class="blog-post-item""#;

/// Last block of every post fragment, after the content
const ACTIONS_MARKER: &str = r#"<div class="post-actions">"#;

lazy_static! {
    static ref DIV_TAG: Regex = Regex::new(r"(?i)</?div\b").unwrap();
    static ref POST_ID: Regex = Regex::new(r#"data-post-id="([^"]*)""#).unwrap();
    static ref POST_TITLE: Regex =
        Regex::new(r#"(?s)<h4 class="post-title">\s*<a[^>]*>(.*?)</a>"#).unwrap();
    static ref POST_META: Regex = Regex::new(r#"(?s)<p class="post-meta">(.*?)</p>"#).unwrap();
}

/// The site document lacks the structure needed for insertion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Blog container not found (expected `{0}`)")]
    MissingContainer(&'static str),

    #[error("Post list not found inside the blog container (expected `{0}`)")]
    MissingList(&'static str),
}

/// Position of the post list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListBounds {
    /// Just past the `>` of the list's opening tag
    pub inner_start: usize,
    /// Start of the list's closing `</div>`, when the tags up to it balance
    pub inner_end: Option<usize>,
}

/// Summary of one fragment found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentSummary {
    pub id: String,
    pub title: String,
    pub meta: String,
}

/// Locate the post list
pub fn find_list(document: &str) -> Result<ListBounds, StructureError> {
    let container = document
        .find(CONTAINER_MARKER)
        .ok_or(StructureError::MissingContainer(CONTAINER_MARKER))?;

    let list_start = document[container..]
        .find(LIST_MARKER)
        .map(|rel| container + rel)
        .ok_or(StructureError::MissingList(LIST_MARKER))?;

    let inner_end = matching_close(document, list_start);
    if inner_end.is_none() {
        tracing::debug!("Post list tags do not balance, searching to the end of the document");
    }

    Ok(ListBounds {
        inner_start: list_start + LIST_MARKER.len(),
        inner_end,
    })
}

/// Offset of the first fragment in the list
fn first_fragment(document: &str, list: &ListBounds) -> Option<usize> {
    let limit = list.inner_end.unwrap_or(document.len());
    document[list.inner_start..limit]
        .find(FRAGMENT_MARKER)
        .map(|rel| list.inner_start + rel)
}

/// Insert `fragment` at the head of the post list
///
/// With existing posts the fragment goes right before the first one,
/// followed by a newline. With an empty list it goes on a new line right
/// after the list's opening tag. The input is never modified; on error no
/// output is produced.
pub fn splice(document: &str, fragment: &str) -> Result<String, StructureError> {
    let list = find_list(document)?;

    let mut out = String::with_capacity(document.len() + fragment.len() + 1);
    match first_fragment(document, &list) {
        Some(at) => {
            tracing::debug!("Inserting before existing post at byte {}", at);
            out.push_str(&document[..at]);
            out.push_str(fragment);
            out.push('\n');
            out.push_str(&document[at..]);
        }
        None => {
            let at = list.inner_start;
            tracing::debug!("Post list is empty, inserting at byte {}", at);
            out.push_str(&document[..at]);
            out.push('\n');
            out.push_str(fragment);
            out.push_str(&document[at..]);
        }
    }

    Ok(out)
}

/// Return the full block of the first fragment with the given id
pub fn find_fragment<'a>(document: &'a str, id: &str) -> Option<&'a str> {
    let attr = format!(r#"data-post-id="{}""#, id);
    let attr_pos = document.find(&attr)?;
    let start = document[..attr_pos].rfind(FRAGMENT_MARKER)?;
    let end = fragment_end(document, start)?;
    Some(&document[start..end])
}

/// Number of fragments carrying the given id
pub fn count_fragments(document: &str, id: &str) -> usize {
    let attr = format!(r#"data-post-id="{}""#, id);
    document.matches(&attr).count()
}

/// Summarise every fragment in the post list, in document order
pub fn list_fragments(document: &str) -> Result<Vec<FragmentSummary>, StructureError> {
    let list = find_list(document)?;
    let mut summaries = Vec::new();
    let mut next = first_fragment(document, &list);

    while let Some(start) = next {
        let end = fragment_end(document, start).unwrap_or(document.len());
        let block = &document[start..end];

        summaries.push(FragmentSummary {
            id: capture(&POST_ID, block),
            title: capture(&POST_TITLE, block),
            meta: capture(&POST_META, block),
        });

        let pos = skip_trivia(document, end);
        next = document[pos..].starts_with(FRAGMENT_MARKER).then_some(pos);
    }

    Ok(summaries)
}

fn capture(re: &Regex, text: &str) -> String {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// End of the fragment starting at `start`, just past its closing `</div>`
///
/// The actions block follows the raw content and holds a single link, so
/// closing from there does not depend on the content's tags. Fragments
/// without one fall back to plain tag matching.
fn fragment_end(document: &str, start: usize) -> Option<usize> {
    let body = start + FRAGMENT_MARKER.len();
    let next = document[body..]
        .find(FRAGMENT_MARKER)
        .map_or(document.len(), |rel| body + rel);

    match document[start..next].find(ACTIONS_MARKER) {
        Some(rel) => {
            let actions_close = matching_close(document, start + rel)?;
            let after = tag_end(document, actions_close)?;
            let item_close = after + document[after..].find("</div>")?;
            tag_end(document, item_close)
        }
        None => {
            let close = matching_close(document, start)?;
            tag_end(document, close)
        }
    }
}

/// Skip whitespace and HTML comments
fn skip_trivia(document: &str, mut pos: usize) -> usize {
    loop {
        let rest = &document[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();
        if !trimmed.starts_with("<!--") {
            return pos;
        }
        match trimmed.find("-->") {
            Some(rel) => pos += rel + 3,
            None => return pos,
        }
    }
}

/// Index just past the `>` closing the tag that starts at `start`
fn tag_end(document: &str, start: usize) -> Option<usize> {
    document[start..].find('>').map(|rel| start + rel + 1)
}

/// Start of the `</div>` matching the `<div` at `open`
fn matching_close(document: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for m in DIV_TAG.find_iter(&document[open..]) {
        if m.as_str().starts_with("</") {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(open + m.start());
            }
        } else {
            depth += 1;
        }
    }
    None
}
