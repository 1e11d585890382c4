//! Version control integration
//!
//! Publishing only needs three operations, so they sit behind the [`Vcs`]
//! trait. [`GitCli`] drives the `git` executable of the local checkout;
//! remote, branch and credentials come from the checkout's own config.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Version control failure
///
/// Never fatal to a publish: the site document is already on disk.
#[derive(Error, Debug)]
pub enum VcsError {
    #[error("git executable not found")]
    Unavailable,

    #[error("`{command}` failed ({status}): {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Failed to run `{command}`: {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Minimal version control operations used after a publish
pub trait Vcs: fmt::Debug {
    /// Stage a file, relative to the repository working directory
    fn stage(&self, path: &Path) -> Result<(), VcsError>;

    /// Commit staged changes
    fn commit(&self, message: &str) -> Result<(), VcsError>;

    /// Push to the default remote and branch
    fn push(&self) -> Result<(), VcsError>;
}

/// `git` command line client bound to a working directory
#[derive(Debug, Clone)]
pub struct GitCli {
    git: PathBuf,
    workdir: PathBuf,
}

impl GitCli {
    /// Detect a usable git checkout at `workdir`
    ///
    /// Returns `Ok(None)` when `workdir` is not inside a work tree.
    pub fn detect<P: AsRef<Path>>(workdir: P) -> Result<Option<Self>, VcsError> {
        let git = which::which("git").map_err(|_| VcsError::Unavailable)?;
        let client = Self {
            git,
            workdir: workdir.as_ref().to_path_buf(),
        };

        match client.run(&["rev-parse", "--is-inside-work-tree"]) {
            Ok(out) if out.trim() == "true" => Ok(Some(client)),
            Ok(_) | Err(VcsError::Command { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, VcsError> {
        let command = format!("git {}", args.join(" "));
        tracing::debug!("Running `{}` in {:?}", command, self.workdir);

        let output = Command::new(&self.git)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|source| VcsError::Io {
                command: command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(VcsError::Command {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl Vcs for GitCli {
    fn stage(&self, path: &Path) -> Result<(), VcsError> {
        let path = path.to_string_lossy();
        self.run(&["add", "--", &path]).map(|_| ())
    }

    fn commit(&self, message: &str) -> Result<(), VcsError> {
        self.run(&["commit", "-m", message]).map(|_| ())
    }

    fn push(&self) -> Result<(), VcsError> {
        self.run(&["push"]).map(|_| ())
    }
}
