//! Publish a post into the site document

use anyhow::Result;

use super::PostInput;
use crate::publish::{CommitStatus, PublishOutcome, Publisher};
use crate::vcs::GitCli;
use crate::Blog;

/// Publish the resolved draft, committing through git when possible
pub fn run(blog: &Blog, input: &PostInput, use_git: bool) -> Result<PublishOutcome> {
    let post = input.resolve(blog)?;
    let mut publisher = Publisher::new(blog.clone());

    if use_git && blog.config.git {
        match GitCli::detect(&blog.base_dir) {
            Ok(Some(git)) => publisher = publisher.with_vcs(Box::new(git)),
            Ok(None) => tracing::warn!(
                "{:?} is not a git repository; changes will not be committed",
                blog.base_dir
            ),
            Err(e) => tracing::warn!("{}; changes will not be committed", e),
        }
    }

    publisher.set_draft(post);
    let outcome = match publisher.publish() {
        Ok(outcome) => outcome,
        Err(e) => {
            let draft = blog.drafts().path();
            return Err(anyhow::Error::new(e)
                .context(format!("Publish failed; your draft is kept in {:?}", draft)));
        }
    };

    blog.drafts().clear()?;
    report(&outcome);
    Ok(outcome)
}

fn report(outcome: &PublishOutcome) {
    let fragment = &outcome.fragment;
    println!("Published: {}", fragment.title);
    println!("  Category: {}", fragment.category);
    println!("  Post id:  {}", fragment.id);
    println!("  Updated:  {:?}", outcome.index_path);
    println!("  Copy:     {:?}", outcome.article_path);

    match &outcome.commit {
        CommitStatus::Pushed => println!("Committed and pushed to the remote."),
        CommitStatus::Skipped => {
            println!("Git is not available; commit and push the changes manually.")
        }
        CommitStatus::Failed(e) => {
            println!("Partial success: the post was written but git failed: {}", e);
            println!("Commit and push the changes manually.");
        }
    }
}
