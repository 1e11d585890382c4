//! Preview a draft without publishing it

use anyhow::Result;

use super::PostInput;
use crate::helpers::{file_url, open_browser};
use crate::{preview, render, Blog};

/// Print a text preview, or write the HTML preview and open it
pub fn run(blog: &Blog, input: &PostInput, text: bool, open: bool) -> Result<()> {
    let post = input.resolve(blog)?;
    let date = render::today();

    if text {
        println!("{}", preview::text(blog, &post, date)?);
        return Ok(());
    }

    let path = preview::write_html(blog, &post, date)?;
    let path = path.canonicalize().unwrap_or(path);
    println!("Preview written to {:?}", path);

    if open {
        let url = file_url(&path);
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
            println!("Open {} in your browser", url);
        }
    }

    Ok(())
}
