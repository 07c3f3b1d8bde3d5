//! Artifact publishing for docforge builds.
//!
//! Prepares the artifact directory layout, copies the versioned PDF to the
//! "latest" path with checksum verification, writes the build manifest,
//! and renders step outputs for downstream pipeline consumption.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use docforge_shared::{ArtifactPaths, BuildManifest, DocforgeError, Result, StepOutputs};

/// Name of the manifest file written next to the published artifacts.
pub const MANIFEST_FILE_NAME: &str = "build-manifest.json";

/// Checksum and size of the published artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    /// SHA-256 of the versioned PDF (and, verified, of the latest copy).
    pub sha256: String,
    /// Size of the versioned PDF in bytes.
    pub size_bytes: u64,
}

/// Create the artifact and versions directories, with parents.
pub fn prepare_dirs(paths: &ArtifactPaths) -> Result<()> {
    for dir in [&paths.artifact_dir, &paths.versions_dir] {
        std::fs::create_dir_all(dir).map_err(|e| DocforgeError::io(dir, e))?;
    }
    debug!(dir = %paths.versions_dir.display(), "artifact directories ready");
    Ok(())
}

/// Copy the versioned PDF to the "latest" path and verify the copy.
///
/// The latest artifact is always overwritten; the versioned copy is never
/// touched again. Byte-identity of the two files is checked via SHA-256.
pub fn publish(paths: &ArtifactPaths) -> Result<PublishReceipt> {
    std::fs::copy(&paths.versioned_pdf, &paths.latest_pdf)
        .map_err(|e| DocforgeError::io(&paths.versioned_pdf, e))?;

    let versioned_sha = sha256_file(&paths.versioned_pdf)?;
    let latest_sha = sha256_file(&paths.latest_pdf)?;
    if versioned_sha != latest_sha {
        return Err(DocforgeError::Publish(format!(
            "latest copy at {} does not match versioned artifact {}",
            paths.latest_pdf.display(),
            paths.versioned_pdf.display()
        )));
    }

    let size_bytes = std::fs::metadata(&paths.versioned_pdf)
        .map_err(|e| DocforgeError::io(&paths.versioned_pdf, e))?
        .len();

    info!(
        versioned = %paths.versioned_pdf.display(),
        latest = %paths.latest_pdf.display(),
        sha256 = %versioned_sha,
        "artifacts published"
    );

    Ok(PublishReceipt {
        sha256: versioned_sha,
        size_bytes,
    })
}

/// SHA-256 of a file's contents, lowercase hex.
pub fn sha256_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| DocforgeError::io(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

/// Write the build manifest atomically (write to temp, then rename).
/// Returns the manifest path.
pub fn write_manifest(artifact_dir: &Path, manifest: &BuildManifest) -> Result<PathBuf> {
    let target = artifact_dir.join(MANIFEST_FILE_NAME);
    let temp = artifact_dir.join(format!(".{MANIFEST_FILE_NAME}.tmp"));

    let json = serde_json::to_string_pretty(manifest)
        .map_err(|e| DocforgeError::validation(format!("JSON serialization failed: {e}")))?;

    std::fs::write(&temp, json).map_err(|e| DocforgeError::io(&temp, e))?;
    std::fs::rename(&temp, &target).map_err(|e| DocforgeError::io(&target, e))?;

    debug!(path = %target.display(), "wrote build manifest");
    Ok(target)
}

/// Append step outputs to the CI output file (`GITHUB_OUTPUT` format).
pub fn write_step_outputs(output_file: &Path, outputs: &StepOutputs) -> Result<()> {
    use std::io::Write;

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(output_file)
        .map_err(|e| DocforgeError::io(output_file, e))?;

    file.write_all(outputs.to_output_lines().as_bytes())
        .map_err(|e| DocforgeError::io(output_file, e))?;

    debug!(path = %output_file.display(), "step outputs written");
    Ok(())
}
