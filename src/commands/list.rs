//! List the posts already in the site document

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;

use crate::splice;
use crate::Blog;

/// Print every post fragment, newest first
pub fn run(blog: &Blog) -> Result<()> {
    let document = fs::read_to_string(&blog.index_path)
        .with_context(|| format!("Failed to read {:?}", blog.index_path))?;
    let posts = splice::list_fragments(&document)?;

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for post in &posts {
        *seen.entry(post.id.as_str()).or_insert(0) += 1;
    }

    println!("Posts ({}):", posts.len());
    for post in &posts {
        let marker = if seen[post.id.as_str()] > 1 {
            " (duplicate id)"
        } else {
            ""
        };
        println!("  {} - {} [{}]{}", post.meta, post.title, post.id, marker);
    }

    Ok(())
}
