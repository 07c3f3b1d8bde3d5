//! Constructor repository checkout.
//!
//! Clones the template ("constructor") repository at a fixed reference into
//! a temporary directory. The pipeline changes its working directory into
//! the clone for the rest of the run.

use std::path::PathBuf;

use tracing::{debug, info};

use docforge_shared::{DocforgeError, Result};

use crate::exec;

/// What to clone and where.
#[derive(Debug, Clone)]
pub struct FetchSpec {
    /// HTTPS clone URL.
    pub clone_url: String,
    /// Reference to check out after cloning.
    pub git_ref: String,
    /// Target directory for the clone.
    pub clone_dir: PathBuf,
}

/// Clone the constructor repository and check out the configured reference.
///
/// A stale clone directory from a previous run is removed first. Any git
/// failure is fatal; there is no retry.
pub async fn fetch_constructor(spec: &FetchSpec) -> Result<PathBuf> {
    if spec.clone_dir.exists() {
        debug!(path = %spec.clone_dir.display(), "removing stale clone directory");
        std::fs::remove_dir_all(&spec.clone_dir)
            .map_err(|e| DocforgeError::io(&spec.clone_dir, e))?;
    }

    info!(
        url = %spec.clone_url,
        git_ref = %spec.git_ref,
        dir = %spec.clone_dir.display(),
        "cloning constructor repository"
    );

    let clone_args = vec![
        "clone".to_string(),
        spec.clone_url.clone(),
        spec.clone_dir.to_string_lossy().into_owned(),
    ];
    exec::run("git", &clone_args, None)
        .await
        .map_err(|e| DocforgeError::Fetch(format!("clone of {} failed: {e}", spec.clone_url)))?;

    let checkout_args = vec!["checkout".to_string(), spec.git_ref.clone()];
    exec::run("git", &checkout_args, Some(&spec.clone_dir))
        .await
        .map_err(|e| {
            DocforgeError::Fetch(format!("checkout of '{}' failed: {e}", spec.git_ref))
        })?;

    info!(git_ref = %spec.git_ref, "constructor repository ready");
    Ok(spec.clone_dir.clone())
}
