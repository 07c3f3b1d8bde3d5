//! Template resolution and verification.
//!
//! Exactly one template path is used per run: a user-provided path, the
//! built-in default inside the constructor repository, or a freshly
//! downloaded copy of the remote default. The resolved path is verified
//! to exist before any conversion is attempted.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use docforge_shared::{
    BUILTIN_TEMPLATE_PATH, DocforgeError, REMOTE_TEMPLATE_SENTINEL, Result,
};

/// Where the template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Download the default template from the constructor repository.
    RemoteDefault,
    /// Use a caller-supplied path.
    Provided(PathBuf),
    /// Use the built-in default path inside the constructor repository.
    BuiltinDefault,
}

impl TemplateSource {
    /// Interpret the raw template input.
    ///
    /// The sentinel `remote_template` selects the remote default; an empty
    /// input selects the built-in path; anything else is a literal path.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed == REMOTE_TEMPLATE_SENTINEL {
            Self::RemoteDefault
        } else if trimmed.is_empty() {
            Self::BuiltinDefault
        } else {
            Self::Provided(PathBuf::from(trimmed))
        }
    }
}

/// Inputs for resolving a [`TemplateSource`] to a concrete path.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Raw URL of the remote default template.
    pub remote_url: Url,
    /// Directory receiving the downloaded template file.
    pub download_dir: PathBuf,
}

/// Resolve the template source to a single on-disk path.
///
/// Only `RemoteDefault` performs I/O; the other sources resolve without
/// touching the filesystem. Existence is checked separately by [`verify`].
pub async fn resolve(source: &TemplateSource, opts: &ResolveOptions) -> Result<PathBuf> {
    match source {
        TemplateSource::RemoteDefault => {
            let dest = opts.download_dir.join("template.tex");
            info!(url = %opts.remote_url, dest = %dest.display(), "downloading default template");
            download(&opts.remote_url, &dest).await?;
            Ok(dest)
        }
        TemplateSource::Provided(path) => {
            info!(path = %path.display(), "using provided template path");
            Ok(path.clone())
        }
        TemplateSource::BuiltinDefault => {
            info!(path = BUILTIN_TEMPLATE_PATH, "using built-in template path");
            Ok(PathBuf::from(BUILTIN_TEMPLATE_PATH))
        }
    }
}

/// Confirm the resolved template file exists.
pub fn verify(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(DocforgeError::Template(format!(
            "template file not found at {}",
            path.display()
        )));
    }
    debug!(path = %path.display(), "template file verified");
    Ok(())
}

/// Download the remote template to `dest` and confirm it landed on disk.
async fn download(url: &Url, dest: &Path) -> Result<()> {
    let response = reqwest::get(url.clone()).await.map_err(|e| {
        DocforgeError::Template(format!("Failed to download template from {url}: {e}"))
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DocforgeError::Template(format!(
            "Failed to download template from {url}: HTTP {status}"
        )));
    }

    let body = response.bytes().await.map_err(|e| {
        DocforgeError::Template(format!("Failed to download template from {url}: {e}"))
    })?;

    std::fs::write(dest, &body).map_err(|e| DocforgeError::io(dest, e))?;

    if !dest.exists() {
        return Err(DocforgeError::Template(format!(
            "Failed to download template: downloaded file not found at {}",
            dest.display()
        )));
    }

    if let Ok(text) = std::str::from_utf8(&body) {
        let head: Vec<&str> = text.lines().take(5).collect();
        debug!(first_lines = %head.join("\n"), "template downloaded");
    }

    info!(dest = %dest.display(), bytes = body.len(), "template download complete");
    Ok(())
}
