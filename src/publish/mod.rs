//! Publish orchestrator
//!
//! Drives one publish attempt through
//! `Idle → Validating → Rendering → Splicing → Writing → (CommitAttempt | Done)`.
//! Everything runs synchronously. Failures before `Writing` leave the disk
//! untouched; failures while writing are reported as-is, without rollback.
//! Version control failures never fail the publish.

use chrono::NaiveDate;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{BlogConfig, DuplicatePolicy};
use crate::content::Post;
use crate::render::{self, Fragment};
use crate::splice::{self, StructureError};
use crate::vcs::{Vcs, VcsError};
use crate::Blog;

/// Why a publish attempt stopped
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Site document structure error: {0}")]
    Structure(#[from] StructureError),

    #[error("Post id `{0}` already exists in the site document")]
    DuplicateId(String),

    #[error("Failed to {action} {path:?}: {source}")]
    Persistence {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PublishError {
    fn read(path: &Path, source: io::Error) -> Self {
        Self::Persistence {
            action: "read",
            path: path.to_path_buf(),
            source,
        }
    }

    fn write(path: &Path, source: io::Error) -> Self {
        Self::Persistence {
            action: "write",
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Where the orchestrator currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Idle,
    Validating,
    Rendering,
    Splicing,
    Writing,
    CommitAttempt,
    Done,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Rendering => "rendering",
            Self::Splicing => "splicing",
            Self::Writing => "writing",
            Self::CommitAttempt => "committing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Result of the version control step
#[derive(Debug)]
pub enum CommitStatus {
    /// Staged, committed and pushed
    Pushed,
    /// No version control attached
    Skipped,
    /// The site document was written but commit or push failed
    Failed(VcsError),
}

/// A completed publish
#[derive(Debug)]
pub struct PublishOutcome {
    pub fragment: Fragment,
    pub index_path: PathBuf,
    pub article_path: PathBuf,
    pub commit: CommitStatus,
}

impl PublishOutcome {
    /// The post is on disk but did not reach the remote
    pub fn is_partial(&self) -> bool {
        matches!(self.commit, CommitStatus::Failed(_))
    }
}

/// Check a post before anything is rendered
///
/// Returns the trimmed post; an empty category falls back to the default.
pub fn validate(post: &Post, config: &BlogConfig) -> Result<Post, PublishError> {
    let mut post = post.trimmed();

    if post.title.is_empty() {
        return Err(PublishError::Validation("title is empty".to_string()));
    }
    if post.content.is_empty() {
        return Err(PublishError::Validation("content is empty".to_string()));
    }

    if post.category.is_empty() {
        post.category = config.default_category().to_string();
    }
    if !config.has_category(&post.category) {
        return Err(PublishError::Validation(format!(
            "unknown category `{}` (expected one of: {})",
            post.category,
            config.categories.join(", ")
        )));
    }

    Ok(post)
}

/// Publishing controller owning the draft
#[derive(Debug)]
pub struct Publisher {
    blog: Blog,
    state: PublishState,
    draft: Post,
    vcs: Option<Box<dyn Vcs>>,
    date: Option<NaiveDate>,
}

impl Publisher {
    /// Create a publisher without version control
    pub fn new(blog: Blog) -> Self {
        Self {
            blog,
            state: PublishState::Idle,
            draft: Post::default(),
            vcs: None,
            date: None,
        }
    }

    /// Attach a version control backend
    pub fn with_vcs(mut self, vcs: Box<dyn Vcs>) -> Self {
        self.vcs = Some(vcs);
        self
    }

    /// Fix the publication date instead of using today
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn state(&self) -> PublishState {
        self.state
    }

    pub fn draft(&self) -> &Post {
        &self.draft
    }

    pub fn set_draft(&mut self, post: Post) {
        self.draft = post;
    }

    /// Publish the current draft
    ///
    /// On success the draft is reset. On failure the draft is kept and the
    /// publisher returns to `Idle`.
    pub fn publish(&mut self) -> Result<PublishOutcome, PublishError> {
        match self.run() {
            Ok(outcome) => {
                self.transition(PublishState::Done);
                self.draft = Post::default();
                Ok(outcome)
            }
            Err(e) => {
                tracing::debug!("Publish failed while {}: {}", self.state, e);
                self.transition(PublishState::Idle);
                Err(e)
            }
        }
    }

    fn transition(&mut self, next: PublishState) {
        tracing::debug!("Publish state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn run(&mut self) -> Result<PublishOutcome, PublishError> {
        self.transition(PublishState::Validating);
        let post = validate(&self.draft, &self.blog.config)?;

        self.transition(PublishState::Rendering);
        let date = self.date.unwrap_or_else(render::today);
        let options = self.blog.render_options();
        let mut fragment = render::render_fragment(&post, date, &options);
        tracing::info!("Rendered post `{}` as {}", post.title, fragment.id);

        self.transition(PublishState::Splicing);
        let index_path = self.blog.index_path.clone();
        let document =
            fs::read_to_string(&index_path).map_err(|e| PublishError::read(&index_path, e))?;

        let id = self.resolve_id(&document, &fragment.id)?;
        if id != fragment.id {
            fragment = render::render_with_id(&post, &id, date, &options);
        }
        let updated = splice::splice(&document, &fragment.html)?;

        self.transition(PublishState::Writing);
        fs::write(&index_path, updated).map_err(|e| PublishError::write(&index_path, e))?;
        tracing::info!("Updated {:?}", index_path);

        let article_path = self.blog.article_path(&post.title);
        fs::write(&article_path, &fragment.html)
            .map_err(|e| PublishError::write(&article_path, e))?;
        tracing::debug!("Saved fragment copy to {:?}", article_path);

        let commit = match self.vcs.take() {
            Some(vcs) => {
                self.transition(PublishState::CommitAttempt);
                let status = self.commit(vcs.as_ref(), &post.title);
                self.vcs = Some(vcs);
                status
            }
            None => CommitStatus::Skipped,
        };

        Ok(PublishOutcome {
            fragment,
            index_path,
            article_path,
            commit,
        })
    }

    /// Apply the duplicate id policy
    fn resolve_id(&self, document: &str, id: &str) -> Result<String, PublishError> {
        if splice::count_fragments(document, id) == 0 {
            return Ok(id.to_string());
        }

        match self.blog.config.duplicate_ids {
            DuplicatePolicy::Allow => {
                tracing::warn!("Post id `{}` already exists; inserting a duplicate", id);
                Ok(id.to_string())
            }
            DuplicatePolicy::Reject => Err(PublishError::DuplicateId(id.to_string())),
            DuplicatePolicy::Suffix => {
                let unique = (2..)
                    .map(|n| format!("{}-{}", id, n))
                    .find(|candidate| splice::count_fragments(document, candidate) == 0)
                    .unwrap_or_else(|| id.to_string());
                tracing::info!("Post id `{}` already exists; using `{}`", id, unique);
                Ok(unique)
            }
        }
    }

    fn commit(&self, vcs: &dyn Vcs, title: &str) -> CommitStatus {
        let index = self
            .blog
            .index_path
            .strip_prefix(&self.blog.base_dir)
            .unwrap_or(&self.blog.index_path);
        let message = self.blog.config.commit_message_for(title);

        let result = vcs
            .stage(index)
            .and_then(|_| vcs.commit(&message))
            .and_then(|_| vcs.push());

        match result {
            Ok(()) => {
                tracing::info!("Committed and pushed: {}", message);
                CommitStatus::Pushed
            }
            Err(e) => {
                tracing::warn!("Version control step failed: {}", e);
                CommitStatus::Failed(e)
            }
        }
    }
}
